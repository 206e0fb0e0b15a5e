use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::error_response;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{axis} has {len} values; at most {max} are allowed")]
    AxisTooLong {
        axis: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid JSON payload: {0}")]
    Payload(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AxisTooLong { .. } => StatusCode::BAD_REQUEST,
            ApiError::Payload(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(%status, error = %self, "rejected request");
        error_response(status, &self.to_string())
    }
}
