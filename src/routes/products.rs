use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::{AppResult, ManagerError, ManagerResult},
    models::Product,
    response::{ErrorBody, ErrorPayload, ItemEnvelope, ListingResponse},
    routes::params::ListingQuery,
    services::listing,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{pid}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("limit" = Option<u64>, Query, description = "Page size between 1 and 100, default 10"),
        ("page" = Option<u64>, Query, description = "Page number, default 1"),
        ("category" = Option<String>, Query, description = "Exact category match"),
        ("stock" = Option<u64>, Query, description = "Minimum stock"),
        ("sort" = Option<String>, Query, description = "Price order: asc or desc"),
    ),
    responses(
        (status = 200, description = "Paged products", body = ListingResponse),
        (status = 400, description = "Invalid parameter or store failure", body = ErrorBody)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    query: ListingQuery,
) -> AppResult<Json<ListingResponse>> {
    let request = listing::process(&query)?;
    tracing::debug!(filter = ?request.filter, options = ?request.options, "listing products");

    let products = state
        .products
        .paginate(&request.filter, &request.options)
        .await?;
    Ok(Json(ListingResponse { products }))
}

#[utoipa::path(
    get,
    path = "/api/products/{pid}",
    params(
        ("pid" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product, or an error envelope", body = ItemEnvelope<Product>)
    ),
    tag = "Products"
)]
pub async fn get_product(State(state): State<AppState>, Path(pid): Path<String>) -> Response {
    let result = state.manager.get_by_id(&pid).await;
    envelope(&state, result)
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Created product, or an error envelope", body = ItemEnvelope<Product>)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let result = match decode::<CreateProductRequest>(body) {
        Ok(data) => state.manager.add(data).await,
        Err(err) => Err(err),
    };
    envelope(&state, result)
}

#[utoipa::path(
    put,
    path = "/api/products/{pid}",
    params(
        ("pid" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Confirmation message, or an error envelope", body = ItemEnvelope<String>)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let result = match decode::<UpdateProductRequest>(body) {
        Ok(data) => state.manager.update(&pid, data).await,
        Err(err) => Err(err),
    };
    envelope(&state, result.and_then(|product| describe(&product, "actualizado")))
}

#[utoipa::path(
    delete,
    path = "/api/products/{pid}",
    params(
        ("pid" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Confirmation message, or an error envelope", body = ItemEnvelope<String>)
    ),
    tag = "Products"
)]
pub async fn delete_product(State(state): State<AppState>, Path(pid): Path<String>) -> Response {
    let result = state.manager.delete(&pid).await;
    envelope(&state, result.and_then(|product| describe(&product, "eliminado")))
}

/// Body rejections are reported through the envelope like any other bad payload.
fn decode<T: DeserializeOwned>(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ManagerResult<T> {
    let Json(body) = body.map_err(|rejection| ManagerError::InvalidPayload(rejection.body_text()))?;
    serde_json::from_value(body).map_err(|err| ManagerError::InvalidPayload(err.to_string()))
}

/// `Producto {json} <verb>.`
fn describe(product: &Product, verb: &str) -> ManagerResult<String> {
    let json = serde_json::to_string(product)?;
    Ok(format!("Producto {json} {verb}."))
}

/// Item failures are answered with 200 unless conventional codes are enabled.
fn envelope<T: Serialize>(state: &AppState, result: ManagerResult<T>) -> Response {
    match result {
        Ok(payload) => Json(ItemEnvelope::success(payload)).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, kind = err.kind(), "product operation failed");
            let status = if state.conventional_status_codes {
                err.status_code()
            } else {
                StatusCode::OK
            };
            (status, Json(ItemEnvelope::<ErrorPayload>::error(&err))).into_response()
        }
    }
}
