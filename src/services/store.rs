use async_trait::async_trait;

use crate::{
    dto::products::{ListingFilter, ListingOptions},
    error::StoreError,
    models::Product,
    pagination::PageResult,
};

/// Filtered, sorted, paged bulk reads over the product catalogue.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn paginate(
        &self,
        filter: &ListingFilter,
        options: &ListingOptions,
    ) -> Result<PageResult<Product>, StoreError>;
}
