//! Error types for the Kardex API server.
//!
//! Two layers: [`ServerError`] for process-level failures (config,
//! binding) and [`ApiError`] for per-request failures, which knows how to
//! render itself as the `{"error": "..."}` JSON body the frontend
//! expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use kardex_core::CoreError;

// =============================================================================
// Server Error
// =============================================================================

/// Process-level errors (startup, config).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience type alias for Results with ServerError.
pub type ServerResult<T> = Result<T, ServerError>;

// =============================================================================
// API Error
// =============================================================================

/// Per-request errors, rendered as `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or rejected input. 400.
    #[error("{0}")]
    BadRequest(String),

    /// The addressed resource does not exist. 404.
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// The `Missing field: <name>` rejection for an absent or empty
    /// required field.
    pub fn missing_field(field: &str) -> Self {
        ApiError::BadRequest(format!("Missing field: {}", field))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::ProductNotFound(_) => ApiError::NotFound("Product not found".to_string()),
            // The frontend matches on this exact message.
            CoreError::DuplicateProduct(_) => {
                ApiError::BadRequest("Product with this ID already exists".to_string())
            }
            // Surface the inner message without the "Validation error:"
            // prefix the domain error carries.
            CoreError::Validation(v) => ApiError::BadRequest(v.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kardex_core::ValidationError;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::ProductNotFound("p9".to_string()).into();
        assert_eq!(err.to_string(), "Product not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::DuplicateProduct("p1".to_string()).into();
        assert_eq!(err.to_string(), "Product with this ID already exists");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "sku".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "Missing field: sku");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(
            ApiError::missing_field("price").to_string(),
            "Missing field: price"
        );
    }
}
