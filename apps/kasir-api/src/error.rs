//! Error types for Kasir API.
//!
//! Every failure leaves the server as the same envelope the success path
//! uses, plus a machine-readable `code`:
//!
//! ```json
//! { "meta": { "success": false, "message": "Cart is empty for cashier 1" },
//!   "code": "EMPTY_CART" }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use kasir_core::{CoreError, ValidationError};
use kasir_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or rule-breaking input.
    #[error("{0}")]
    InvalidRequest(String),

    /// Well-formed request refused by a business rule (empty cart, stock).
    #[error("{message}")]
    Rejected { code: &'static str, message: String },

    #[error("{0}")]
    AuthFailed(String),

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Storage failure. The detail is logged, never sent.
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::Rejected { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthFailed(_) | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "VALIDATION_ERROR",
            ApiError::Rejected { code, .. } => *code,
            ApiError::AuthFailed(_) => "UNAUTHORIZED",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text sent to the client.
    fn public_message(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "Request rejected");
        }

        let body = json!({
            "meta": { "success": false, "message": self.public_message() },
            "code": self.code(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::EmptyCart { .. } => ApiError::Rejected {
                code: "EMPTY_CART",
                message,
            },
            CoreError::InsufficientStock { .. } => ApiError::Rejected {
                code: "INSUFFICIENT_STOCK",
                message,
            },
            CoreError::QuantityTooLarge { .. } => ApiError::Rejected {
                code: "QUANTITY_TOO_LARGE",
                message,
            },
            CoreError::InvalidInput { .. } | CoreError::Validation(_) => {
                ApiError::InvalidRequest(message)
            }
            CoreError::ProductNotFound(_)
            | CoreError::CartLineNotFound(_)
            | CoreError::TransactionNotFound(_) => ApiError::NotFound(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => core.into(),
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::ForeignKeyViolation { .. } => {
                ApiError::Conflict("Record is still referenced by other data".to_string())
            }
            other => ApiError::Database(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::EmptyCart { cashier_id: 1 });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "EMPTY_CART");

        let err = ApiError::from(CoreError::ProductNotFound("9".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from(CoreError::invalid_input("cash", "is required"));
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_db_error_mapping() {
        let err = ApiError::from(DbError::duplicate("barcode", "8991"));
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = ApiError::from(DbError::Domain(CoreError::EmptyCart { cashier_id: 1 }));
        assert_eq!(err.code(), "EMPTY_CART");

        let err = ApiError::from(DbError::QueryFailed("disk I/O error".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }
}
