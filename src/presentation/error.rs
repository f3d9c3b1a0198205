// HTTP error responses
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    /// The snapshot producer could not supply a snapshot
    SourceUnavailable(String),
    /// Response could not be encoded
    Encoding(StatusCode),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::SourceUnavailable(msg) => (
                StatusCode::BAD_GATEWAY,
                Json(ApiError::new("SOURCE_UNAVAILABLE", msg)),
            )
                .into_response(),
            AppError::Encoding(status) => (
                status,
                Json(ApiError::new("ENCODING_ERROR", "failed to encode response")),
            )
                .into_response(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::SourceUnavailable(format!("{:#}", err))
    }
}

impl From<StatusCode> for AppError {
    fn from(status: StatusCode) -> Self {
        AppError::Encoding(status)
    }
}
