use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    models::Product,
    pagination::PageResult,
    response::{
        ApiResponse, EnvelopeStatus, ErrorBody, ErrorPayload, ItemEnvelope, ListingResponse, Meta,
    },
    routes::{health, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product
    ),
    components(
        schemas(
            Product,
            CreateProductRequest,
            UpdateProductRequest,
            PageResult<Product>,
            ListingResponse,
            ErrorBody,
            EnvelopeStatus,
            ErrorPayload,
            ItemEnvelope<Product>,
            ItemEnvelope<String>,
            ItemEnvelope<ErrorPayload>,
            Meta,
            ApiResponse<health::HealthData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalogue endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
