//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and header values before they reach the wire
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// Path served by the health probe.
pub const HEALTH_PATH: &str = "/health";

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("endpoint.path must start with '/', got {0:?}")]
    RelativeEndpointPath(String),

    #[error("endpoint.path {0:?} is reserved")]
    ReservedEndpointPath(String),

    #[error("source.file_name must be a bare file name, got {0:?}")]
    InvalidFileName(String),

    #[error("upstream.url {value:?} is not a valid URL: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("upstream.url must use http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("{field} is not a valid header value: {value:?}")]
    InvalidHeaderValue { field: &'static str, value: String },

    #[error("upstream.mime_type {value:?} is not a valid MIME type: {reason}")]
    InvalidMimeType { value: String, reason: String },

    #[error("{0} must not be empty")]
    Empty(String),

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if !config.endpoint.path.starts_with('/') {
        errors.push(ValidationError::RelativeEndpointPath(config.endpoint.path.clone()));
    } else if config.endpoint.path == HEALTH_PATH {
        errors.push(ValidationError::ReservedEndpointPath(config.endpoint.path.clone()));
    }

    let file_name = &config.source.file_name;
    if file_name.is_empty() {
        errors.push(ValidationError::Empty("source.file_name".to_string()));
    } else if file_name.contains(['/', '\\']) || file_name == "." || file_name == ".." {
        errors.push(ValidationError::InvalidFileName(file_name.clone()));
    }

    let upstream = &config.upstream;
    match Url::parse(&upstream.url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidUrl {
            value: upstream.url.clone(),
            reason: e.to_string(),
        }),
    }

    check_header(&mut errors, "upstream.file_name_header", &upstream.file_name_header);
    check_header(&mut errors, "upstream.mime_type", &upstream.mime_type);
    if upstream.mime_type.is_empty() {
        errors.push(ValidationError::Empty("upstream.mime_type".to_string()));
    } else if let Err(e) = upstream.mime_type.parse::<mime::Mime>() {
        errors.push(ValidationError::InvalidMimeType {
            value: upstream.mime_type.clone(),
            reason: e.to_string(),
        });
    }
    if upstream.file_field.is_empty() {
        errors.push(ValidationError::Empty("upstream.file_field".to_string()));
    }
    for (i, field) in upstream.fields.iter().enumerate() {
        if field.name.is_empty() {
            errors.push(ValidationError::Empty(format!("upstream.fields[{i}].name")));
        }
    }

    if upstream.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout { field: "upstream.timeout_secs" });
    }
    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.request_secs" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_header(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::InvalidHeaderValue {
            field,
            value: value.to_string(),
        });
    }
}
