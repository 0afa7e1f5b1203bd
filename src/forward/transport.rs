//! Outbound HTTP transport.
//!
//! # Design Decisions
//! - Single attempt, no retries
//! - No timeout unless one is configured; reqwest's default applies otherwise
//! - Upstream status codes are data, never errors

use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::forward::error::TransportError;
use crate::forward::upload::UploadRequest;

/// What the upstream answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResult {
    pub status: u16,
    /// Response body decoded as text (UTF-8 unless the upstream says otherwise).
    pub body: String,
}

/// Sends an assembled upload to the upstream.
pub trait Transport: Send + Sync {
    fn send(&self, request: UploadRequest) -> BoxFuture<'_, Result<UpstreamResult, TransportError>>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport, optionally capping each call at `timeout`.
    ///
    /// Proxy environment variables are ignored; the upstream is always
    /// dialled directly.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: UploadRequest) -> BoxFuture<'_, Result<UpstreamResult, TransportError>> {
        Box::pin(async move {
            let headers = request
                .headers()
                .map_err(|e| TransportError::Other(format!("invalid upload header: {e}")))?;
            let form = request.upload.into_form()?;

            let response = self
                .client
                .post(&request.url)
                .headers(headers)
                .multipart(form)
                .send()
                .await?;

            let status = response.status().as_u16();
            let body = response.text().await?;

            Ok(UpstreamResult { status, body })
        })
    }
}
