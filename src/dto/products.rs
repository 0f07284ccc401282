use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub price: i64,
    pub status: Option<bool>,
    pub stock: i32,
    pub category: String,
    pub thumbnail: Option<String>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".into());
        }
        if self.code.trim().is_empty() {
            return Err("code must not be empty".into());
        }
        if self.category.trim().is_empty() {
            return Err("category must not be empty".into());
        }
        check_amounts(Some(self.price), Some(self.stock))
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<i64>,
    pub status: Option<bool>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.code.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err("code must not be empty".into());
        }
        check_amounts(self.price, self.stock)
    }
}

fn check_amounts(price: Option<i64>, stock: Option<i32>) -> Result<(), String> {
    if price.is_some_and(|p| p < 0) {
        return Err("price must not be negative".into());
    }
    if stock.is_some_and(|s| s < 0) {
        return Err("stock must not be negative".into());
    }
    Ok(())
}

/// Filter handed to the paginated product store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Exclusive lower bound; a requested `stock=n` becomes `n - 1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_greater_than: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortField {
    #[serde(rename = "price")]
    PriceAscending,
    #[serde(rename = "-price")]
    PriceDescending,
}

impl SortField {
    pub fn token(&self) -> &'static str {
        match self {
            SortField::PriceAscending => "price",
            SortField::PriceDescending => "-price",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingOptions {
    pub page: u64,
    pub limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,
}

impl ListingOptions {
    /// Rows to skip, capped at the largest offset Postgres accepts.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}
