//! Caller-facing plain-text rendering of a forward.

use axum::http::StatusCode;

use crate::forward::error::ForwardError;
use crate::forward::transport::UpstreamResult;

/// Status plus plain-text body returned to whoever triggered the forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TextResponse {
    /// Relay an upstream answer. Always 200: the upstream status is part of
    /// the body, whatever it was.
    pub fn relayed(target_url: &str, upstream: &UpstreamResult) -> Self {
        Self {
            status: StatusCode::OK,
            body: format!(
                "Request sent to: {target_url}\nStatus from API: {}\nResponse body:\n{}\n",
                upstream.status, upstream.body
            ),
        }
    }

    /// Report a forward that never produced an upstream answer.
    pub fn failed(error: &ForwardError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: format!("{error}\n"),
        }
    }
}
