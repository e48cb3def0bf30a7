use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::lifecycle::Phase;

#[derive(Debug, ThisError)]
pub enum CrmError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Customer {0} not found")]
    NotFound(i64),

    #[error("E-mail already registered")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Storage(#[from] SqlxError),

    #[error("Schema mismatch: {0}")]
    Schema(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid lifecycle transition: {from:?} -> {to:?}")]
    Lifecycle { from: Phase, to: Phase },
}

impl CrmError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CrmError::Validation(msg.into())
    }

    /// Translate a write failure, surfacing unique-index violations on `email`.
    pub(crate) fn from_write(e: SqlxError) -> Self {
        match &e {
            SqlxError::Database(db) if db.is_unique_violation() => CrmError::DuplicateEmail,
            _ => CrmError::Storage(e),
        }
    }
}

impl IntoResponse for CrmError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            CrmError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".to_string(),
                    message: msg,
                },
            ),
            CrmError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "EMAIL_TAKEN".to_string(),
                    message: "E-mail already registered.".to_string(),
                },
            ),
            CrmError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: format!("Customer {id} not found."),
                },
            ),
            CrmError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiErrorBody {
                    code: "PAYLOAD_TOO_LARGE".to_string(),
                    message: msg,
                },
            ),
            err @ (CrmError::Storage(_)
            | CrmError::Schema(_)
            | CrmError::Config(_)
            | CrmError::Io(_)
            | CrmError::Lifecycle { .. }) => {
                error!(error = %err, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: CrmError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn each_error_maps_to_one_status_class() {
        let (status, body) = render(CrmError::validation("missing `name`")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "missing `name`");

        let (status, body) = render(CrmError::NotFound(7)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, body) = render(CrmError::DuplicateEmail).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMAIL_TAKEN");

        let (status, body) = render(CrmError::PayloadTooLarge("length limit exceeded".into())).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");

        let (status, body) = render(CrmError::Storage(SqlxError::PoolClosed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal server error occurred.");
    }

    #[test]
    fn non_constraint_write_errors_stay_storage_errors() {
        assert!(matches!(
            CrmError::from_write(SqlxError::PoolTimedOut),
            CrmError::Storage(SqlxError::PoolTimedOut)
        ));
    }
}
