use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use tianfu_store::StoreError;

use crate::generator::GenerateError;

/// Errors surfaced by HTTP handlers. Every variant renders as
/// `{"ok": false, "error": "..."}`; internal details are logged, not sent.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Letter text is missing")]
    MissingText,

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerateError),

    #[error("Mailbox storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingText => ApiError::MissingText,
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "請求格式錯誤"),
            ApiError::MissingText => (StatusCode::BAD_REQUEST, "缺少文字內容"),
            ApiError::Generation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AI 生成失敗"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "信箱寫入失敗"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }

        let body = serde_json::json!({
            "ok": false,
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_api_errors() {
        assert!(matches!(ApiError::from(StoreError::MissingText), ApiError::MissingText));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(ApiError::from(StoreError::Io(io)), ApiError::Storage(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingText.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage("disk full".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
