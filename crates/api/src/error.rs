//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use helpdesk_shared::TicketStatus;
use serde_json::json;

use crate::store::StoreError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Authentication errors
    #[error("Authentication required")]
    Unauthorized,
    #[error("Insufficient permissions")]
    Forbidden,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition { from: TicketStatus, to: TicketStatus },

    // Internal errors
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),

            // Validation
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),

            // Resources
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", self.to_string())
            }

            // Internal
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", "Database error".to_string()),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", self.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = ?err, "Store error");
        match err {
            StoreError::Database(sqlx::Error::RowNotFound) => ApiError::NotFound,
            StoreError::Database(db_err) => ApiError::Database(db_err.to_string()),
            StoreError::Session(_) | StoreError::Corrupt(_) => ApiError::Internal,
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_is_conflict() {
        let err = ApiError::InvalidTransition {
            from: TicketStatus::InProgress,
            to: TicketStatus::New,
        };
        assert_eq!(err.to_string(), "Cannot change status from IN_PROGRESS to NEW");
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_database_errors_hide_details() {
        let err: ApiError = StoreError::Corrupt("status: CLOSED".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn test_client_error_codes() {
        let cases = [
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (ApiError::Forbidden, StatusCode::FORBIDDEN, "FORBIDDEN"),
            (
                ApiError::Validation("Summary must be at least 5 characters".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (ApiError::NotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ApiError::Conflict("stale".into()), StatusCode::CONFLICT, "CONFLICT"),
        ];

        for (err, status, code) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), status);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"]["code"], code);
        }
    }
}
