//! Errors raised while forwarding the source file upstream.

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of the outbound call, from form assembly to reading the body.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request building, connection, TLS, timeout or body read failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Failure reported by a non-reqwest transport.
    #[error("{0}")]
    Other(String),
}

/// Errors that end a forward before anything is relayed.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The source file does not exist.
    #[error("Could not find file in {directory}: {file_name}")]
    ResourceNotFound { directory: String, file_name: String },

    /// The source file exists but could not be read.
    #[error("Could not read file {}: {source}", .path.display())]
    ResourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The upstream call failed at the transport level.
    #[error("Failed to send file to {url}: {}", error_chain(.source))]
    TransportFailure {
        url: String,
        #[source]
        source: TransportError,
    },
}

impl ForwardError {
    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            ForwardError::ResourceNotFound { .. } => "resource_not_found",
            ForwardError::ResourceUnreadable { .. } => "resource_unreadable",
            ForwardError::TransportFailure { .. } => "transport_failure",
        }
    }
}

/// Render an error and its sources as `outer: cause: root`.
///
/// reqwest's top-level message omits the root cause (e.g. "Connection
/// refused"); it only appears further down the source chain.
pub fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
