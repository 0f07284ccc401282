use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::{ManagerError, ManagerResult},
    models::Product,
};

/// Single-item CRUD over the product catalogue.
#[async_trait]
pub trait ProductManager: Send + Sync {
    async fn get_by_id(&self, id: &str) -> ManagerResult<Product>;

    async fn add(&self, data: CreateProductRequest) -> ManagerResult<Product>;

    /// Applies the fields present in `data` and returns the updated product.
    async fn update(&self, id: &str, data: UpdateProductRequest) -> ManagerResult<Product>;

    /// Removes the product and returns it as it was before removal.
    async fn delete(&self, id: &str) -> ManagerResult<Product>;
}

pub(crate) fn parse_id(id: &str) -> ManagerResult<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| ManagerError::InvalidId(id.to_string()))
}
