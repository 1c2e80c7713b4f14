use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::CreateUserError;

/// Route-level error taxonomy. Every failure a handler can produce maps to
/// exactly one variant, and every variant renders the `{status, error}`
/// envelope clients expect.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("User not found")]
    NotFound,

    #[error("upstream returned {0}")]
    Upstream(StatusCode),

    #[error("Invalid response format from external API")]
    UpstreamFormat(#[source] serde_json::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            // Duplicate email/username answers 400, matching what clients of
            // the original API were built against.
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AppError::Upstream(status) => (
                status,
                "Failed to fetch user data from external API".to_string(),
            ),
            AppError::UpstreamFormat(err) => {
                error!(error = %err, "external api response failed validation");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Invalid response format from external API".to_string(),
                )
            }
            AppError::Internal(err) => {
                error!(error = ?err, "unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "status": false, "error": message }))).into_response()
    }
}

impl From<CreateUserError> for AppError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::EmailTaken => AppError::Conflict("Email already registered"),
            CreateUserError::UsernameTaken => AppError::Conflict("Username already taken"),
            CreateUserError::Store(err) => AppError::Internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn envelope(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn invalid_input_is_400_with_message() {
        let (status, body) = envelope(AppError::InvalidInput("Invalid email".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], false);
        assert_eq!(body["error"], "Invalid email");
    }

    #[tokio::test]
    async fn conflict_is_400_not_409() {
        let (status, body) = envelope(AppError::Conflict("Email already registered")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email already registered");
    }

    #[tokio::test]
    async fn upstream_status_is_mirrored() {
        let (status, body) = envelope(AppError::Upstream(StatusCode::BAD_GATEWAY)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["status"], false);
    }

    #[tokio::test]
    async fn internal_error_does_not_leak_cause() {
        let cause = anyhow::anyhow!("users.json: permission denied at /srv/secrets");
        let (status, body) = envelope(AppError::Internal(cause)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn format_error_is_500_with_fixed_message() {
        let parse_err = serde_json::from_str::<Value>("not json").unwrap_err();
        let (status, body) = envelope(AppError::UpstreamFormat(parse_err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Invalid response format from external API");
    }
}
