//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::repository::RepositoryError;
use crate::validation::ValidationError;

/// API error response body.
///
/// Every error is returned as `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed path or query input
    BadRequest(String),
    /// Body could not be read as the expected JSON document
    InvalidJson,
    /// Request parsed but failed validation
    Validation(ValidationError),
    Repository(RepositoryError),
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON".to_string()),
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, format!("Invalid data: {}", e)),
            AppError::Repository(e @ RepositoryError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, e.message())
            }
            AppError::Repository(e @ RepositoryError::Rejected { .. }) => {
                (StatusCode::BAD_REQUEST, e.message())
            }
            AppError::Repository(e) => {
                error!(context = %e.context(), "Repository error: {}", e);
                let status = if e.is_retryable() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, "Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ApiError::new(message))).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ErrorContext;
    use crate::models::WalletError;
    use uuid::Uuid;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(AppError::InvalidJson), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(RepositoryError::not_found(
                "Wallet not found: x",
                ErrorContext::new("get_wallet")
            )),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RepositoryError::from(WalletError::InsufficientFunds {
                wallet_id: Uuid::new_v4()
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(RepositoryError::connection(
                "pool exhausted",
                ErrorContext::new("apply_operation")
            )),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(RepositoryError::internal("boom", ErrorContext::default())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_details_are_not_exposed() {
        let err = RepositoryError::query(
            "relation \"wallets\" does not exist",
            ErrorContext::new("find_wallet"),
        );
        let (status, message) = AppError::from(err).status_and_message();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }
}
