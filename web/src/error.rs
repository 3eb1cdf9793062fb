use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use petstore_core::GatewayError;

use crate::views;

pub type WebResult<T> = Result<T, WebError>;

/// Front-end error types
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WebError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Gateway(err) => gateway_status(err),
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Status the front end answers with when a gateway call fails.
pub fn gateway_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GatewayError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        GatewayError::UpstreamHttp { status: 404, .. } => StatusCode::NOT_FOUND,
        GatewayError::File { .. } | GatewayError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        GatewayError::Network { .. } | GatewayError::UpstreamHttp { .. } | GatewayError::Decode(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            WebError::Gateway(err) => err.message(),
            other => other.to_string(),
        };
        (status, Html(views::error_page(status, &message))).into_response()
    }
}

impl From<std::io::Error> for WebError {
    fn from(err: std::io::Error) -> Self {
        WebError::Internal(format!("IO error: {err}"))
    }
}

impl From<axum::extract::multipart::MultipartError> for WebError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        WebError::BadRequest(format!("Malformed upload: {err}"))
    }
}
