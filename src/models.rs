use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub price: i64,
    pub status: bool,
    pub stock: i32,
    pub category: String,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}
