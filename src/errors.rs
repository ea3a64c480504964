use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
///
/// `code` is the machine-readable discriminator; in particular it is what
/// lets clients tell a wrong URL (`not_found`) apart from a valid but empty
/// category (`empty_taxonomy`). Both arrive as HTTP 404.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Conflict")
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Errors produced by the catalog services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The parent exists but has no children at the next taxonomy level.
    /// Deliberately distinct from `NotFound` so clients can tell a wrong URL
    /// from a valid but empty category.
    #[error("Empty taxonomy: {0}")]
    EmptyTaxonomy(String),

    /// A write would violate a scoped slug-uniqueness constraint on an
    /// entity that does not auto-disambiguate (everything except Product).
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    /// Reserved for future variation-grouping validation; nothing raises
    /// this today; cross-category grouping is intentionally permitted.
    #[error("Invalid grouping: {0}")]
    InvalidGrouping(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) | Self::EmptyTaxonomy(_) => StatusCode::NOT_FOUND,
            Self::DuplicateSlug(_) => StatusCode::CONFLICT,
            Self::InvalidGrouping(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable code carried in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) => "database_error",
            Self::NotFound(_) => "not_found",
            Self::EmptyTaxonomy(_) => "empty_taxonomy",
            Self::DuplicateSlug(_) => "duplicate_slug",
            Self::InvalidGrouping(_) => "invalid_grouping",
            Self::ValidationError(_) => "validation_error",
            Self::InternalError(_) => "internal_error",
        }
    }

    /// Message safe to expose to API clients. Database internals are masked.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Errors surfaced directly by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::ServiceError(err) => (err.status_code(), err.code(), err.response_message()),
            ApiError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(%status, "request failed: {}", self);
        }

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            code: code.to_string(),
            message,
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_empty_taxonomy_share_status_but_not_code() {
        let missing = ServiceError::NotFound("Category 'mirrors' not found".into());
        let empty = ServiceError::EmptyTaxonomy("Category 'mirrors' has no children".into());

        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(empty.status_code(), StatusCode::NOT_FOUND);
        assert_ne!(missing.code(), empty.code());
    }

    #[test]
    fn duplicate_slug_maps_to_conflict() {
        let err = ServiceError::DuplicateSlug("section 'bath' already exists".into());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "duplicate_slug");
    }

    #[test]
    fn database_errors_are_masked() {
        let err = ServiceError::DatabaseError(DbErr::Custom("secret dsn".into()));
        assert_eq!(err.response_message(), "Internal server error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
