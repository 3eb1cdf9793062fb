pub mod health;
pub mod pets;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::views;

/// Which flash slot a redirect message goes into.
#[derive(Debug, Clone, Copy)]
pub enum FlashKind {
    Notice,
    Error,
}

impl FlashKind {
    fn param(self) -> &'static str {
        match self {
            FlashKind::Notice => "notice",
            FlashKind::Error => "error",
        }
    }
}

/// 303 redirect to `path` carrying one flash message.
pub fn redirect_with(path: &str, kind: FlashKind, message: &str) -> Redirect {
    let separator = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{path}{separator}{}={}",
        kind.param(),
        urlencoding::encode(message)
    ))
}

/// Fallback handler for unknown paths
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(views::error_page(StatusCode::NOT_FOUND, "Page not found.")),
    )
        .into_response()
}
