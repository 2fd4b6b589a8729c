use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error carried out of a handler and rendered as a JSON error object with an
/// HTTP status. The `code` values form the wire-level taxonomy; `details` is
/// extra machine-readable context (e.g. the per-field validation list).
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn validation(details: serde_json::Value) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            code: "validation_failed",
            message: "invalid request fields".to_string(),
            details: Some(details),
        }
    }

    pub fn storage_unavailable() -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "storage_unavailable",
            message: "store not available".to_string(),
            details: None,
        }
    }

    pub fn db(code: &'static str, e: impl ToString) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code,
            message: e.to_string(),
            details: None,
        }
    }

    pub fn upload(e: impl ToString) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "upload_failed",
            message: e.to_string(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, "{}", self.message);
        }
        let mut error = json!({
            "code": self.code,
            "message": self.message,
        });
        if let Some(d) = self.details {
            error["details"] = d;
        }
        (self.status, Json(json!({ "error": error }))).into_response()
    }
}
