use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ManagerError, models::Product, pagination::PageResult};

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

/// Generic wrapper used by the service-level endpoints (health, fallback).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

/// Body of a successful product listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    pub products: PageResult<Product>,
}

/// Body of a rejected product listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// `{status, payload}` wrapper for the single-item endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemEnvelope<T> {
    pub status: EnvelopeStatus,
    pub payload: T,
}

impl<T: Serialize> ItemEnvelope<T> {
    pub fn success(payload: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            payload,
        }
    }
}

impl ItemEnvelope<ErrorPayload> {
    pub fn error(err: &ManagerError) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            payload: ErrorPayload::from(err),
        }
    }
}

/// What a manager failure exposes to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

impl From<&ManagerError> for ErrorPayload {
    fn from(err: &ManagerError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
