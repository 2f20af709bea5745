use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Service-wide error taxonomy.
///
/// `Validation` carries a field-keyed detail object (serialized as-is into
/// the 400 body); everything else maps to a `{"detail": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(serde_json::Value),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Single-field validation failure, e.g. `{"slug": ["already in use"]}`.
    pub fn field_validation(field: &str, message: &str) -> Self {
        ApiError::Validation(json!({ field: [message] }))
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized("Authentication credentials were not provided.".to_string())
    }

    pub fn permission_denied() -> Self {
        ApiError::Forbidden("You do not have permission to perform this action.".to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(detail) => HttpResponse::BadRequest().json(detail),
            ApiError::BadRequest(msg) => {
                HttpResponse::BadRequest().json(json!({ "detail": msg }))
            }
            ApiError::Unauthorized(msg) => {
                HttpResponse::Unauthorized().json(json!({ "detail": msg }))
            }
            ApiError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({ "detail": msg })),
            ApiError::NotFound(msg) => HttpResponse::NotFound().json(json!({ "detail": msg })),
            ApiError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "detail": "Internal server error."
                }))
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "detail": "Internal server error."
                }))
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Not found.".to_string()),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let detail = serde_json::to_value(&errors)
            .unwrap_or_else(|_| json!({ "detail": "Invalid input." }));
        ApiError::Validation(detail)
    }
}
