use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::ErrorBody;

/// A listing query parameter that failed its rule. Variants are checked in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Parameter 'limit' must be a number between 1 and 100")]
    Limit,

    #[error("Parameter 'page' must be a positive integer")]
    Page,

    #[error("Parameter 'category' must be a string")]
    Category,

    #[error("Parameter 'stock' must be a non-negative integer")]
    Stock,

    #[error("Parameter 'sort' must be either 'asc' or 'desc'")]
    Sort,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Orm(#[from] sea_orm::DbErr),
}

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Invalid product id '{0}'")]
    InvalidId(String),

    #[error("Product '{0}' not found")]
    NotFound(String),

    #[error("Invalid product data: {0}")]
    InvalidPayload(String),

    #[error("A product with code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ManagerError {
    pub fn kind(&self) -> &'static str {
        match self {
            ManagerError::InvalidId(_) => "invalid_id",
            ManagerError::NotFound(_) => "not_found",
            ManagerError::InvalidPayload(_) => "invalid_payload",
            ManagerError::DuplicateCode(_) => "duplicate_code",
            ManagerError::Storage(_) => "storage",
            ManagerError::Serialization(_) => "serialization",
        }
    }

    /// Status used when conventional status codes are enabled.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ManagerError::InvalidId(_) | ManagerError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ManagerError::NotFound(_) => StatusCode::NOT_FOUND,
            ManagerError::DuplicateCode(_) => StatusCode::CONFLICT,
            ManagerError::Storage(_) | ManagerError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Failure of the listing endpoint. Validation and store failures alike are
/// answered with 400.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(err) => tracing::error!(error = %err, "rejected product listing"),
            AppError::Store(err) => tracing::error!(error = %err, "product listing failed"),
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
