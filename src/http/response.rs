//! Response handling.
//!
//! # Responsibilities
//! - Serve forward outcomes as `text/plain; charset=UTF-8`
//! - Serve the health probe as JSON

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::forward::TextResponse;

/// Content type of every forward response.
pub const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=UTF-8";

impl IntoResponse for TextResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF_8))],
            self.body,
        )
            .into_response()
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
