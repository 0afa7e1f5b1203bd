//! File forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! GET /send-file
//!     → payload.rs (read source file into memory)
//!     → upload.rs (multipart body + fileName/mimeType headers)
//!     → transport.rs (single POST to upstream)
//!     → relay.rs (plain-text summary for the caller)
//! ```
//!
//! Two exits fail before anything is relayed: a missing or unreadable
//! source (no upstream call is made) and a transport failure.

pub mod error;
pub mod payload;
pub mod relay;
pub mod transport;
pub mod upload;

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;

use crate::config::{ServiceConfig, SourceConfig, UpstreamConfig};
use crate::observability::metrics;

pub use error::{ForwardError, TransportError};
pub use payload::{load_payload, SourcePayload};
pub use relay::TextResponse;
pub use transport::{ReqwestTransport, Transport, UpstreamResult};
pub use upload::{UploadDescriptor, UploadRequest};

/// The reloadable part of the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardSettings {
    pub source: SourceConfig,
    pub upstream: UpstreamConfig,
}

impl ForwardSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            source: config.source.clone(),
            upstream: config.upstream.clone(),
        }
    }
}

/// Loads the source file, uploads it and relays the answer.
///
/// Each call works on its own snapshot of the settings, so concurrent
/// forwards share nothing mutable and a reload never affects a forward
/// already in flight.
pub struct Forwarder {
    settings: ArcSwap<ForwardSettings>,
    transport: Arc<dyn Transport>,
}

impl Forwarder {
    pub fn new(settings: ForwardSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
            transport,
        }
    }

    /// Build a forwarder with the production reqwest transport.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, TransportError> {
        let timeout = config.upstream.timeout_secs.map(Duration::from_secs);
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::new(ForwardSettings::from_config(config), Arc::new(transport)))
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<ForwardSettings> {
        self.settings.load_full()
    }

    /// Swap in new settings for subsequent forwards.
    pub fn reload(&self, settings: ForwardSettings) {
        tracing::info!(
            url = %settings.upstream.url,
            file_name = %settings.source.file_name,
            fields = settings.upstream.fields.len(),
            "Forwarding settings reloaded"
        );
        self.settings.store(Arc::new(settings));
    }

    /// Run one forward and render the outcome for the caller.
    pub async fn forward(&self) -> TextResponse {
        let start_time = Instant::now();
        let settings = self.settings.load_full();

        let (response, outcome) = match self.try_forward_with(&settings).await {
            Ok(upstream) => {
                metrics::record_upstream_status(upstream.status);
                (TextResponse::relayed(&settings.upstream.url, &upstream), "relayed")
            }
            Err(e) => {
                tracing::error!(error = %e, outcome = e.outcome(), "Forward failed");
                (TextResponse::failed(&e), e.outcome())
            }
        };

        metrics::record_forward(outcome, start_time);
        tracing::info!(
            outcome,
            status = response.status.as_u16(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Forward complete"
        );
        response
    }

    /// Run one forward, returning the upstream answer or the failure.
    pub async fn try_forward(&self) -> Result<UpstreamResult, ForwardError> {
        let settings = self.settings.load_full();
        self.try_forward_with(&settings).await
    }

    async fn try_forward_with(&self, settings: &ForwardSettings) -> Result<UpstreamResult, ForwardError> {
        let source = &settings.source;
        let upstream = &settings.upstream;

        tracing::debug!(
            directory = %source.directory,
            file_name = %source.file_name,
            "Loading source file"
        );
        let payload = load_payload(source).await?;
        tracing::debug!(path = %payload.path.display(), bytes = payload.len(), "Source file loaded");

        let request = UploadRequest::new(upstream, &source.file_name, payload);
        tracing::info!(
            url = %request.url,
            bytes = request.upload.payload.len(),
            fields = request.upload.fields.len(),
            "Sending file upstream"
        );

        let result = self
            .transport
            .send(request)
            .await
            .map_err(|source| ForwardError::TransportFailure {
                url: upstream.url.clone(),
                source,
            })?;

        tracing::info!(
            status = result.status,
            body_bytes = result.body.len(),
            "Upstream response received"
        );
        Ok(result)
    }
}
