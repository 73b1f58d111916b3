//! JSON error responses.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use tracing::error;

use crate::AdminError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidInput(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            AdminError::MissingCredential(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            AdminError::Provider(_) | AdminError::NoImageUrl(_) | AdminError::Download(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Image generation failed".into(),
                details: Some(err.to_string()),
            },
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Internal server error".into(),
                details: Some(other.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, details = ?self.details, "Request failed");
        }
        (self.status, Json(ErrorBody { error: self.message, details: self.details })).into_response()
    }
}
