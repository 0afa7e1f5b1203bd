//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the forwarder.
//! All types derive Serde traits for deserialization from config files, and
//! every default reproduces the original hardcoded deployment.

use serde::{Deserialize, Serialize};

/// Spreadsheet MIME type declared on the uploaded file.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DEFAULT_FILE_STEM: &str = "452852-D2-20250929105010198";

/// Root configuration for the forwarder.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Inbound endpoint that triggers a forward.
    pub endpoint: EndpointConfig,

    /// Where the forwarded file is read from.
    pub source: SourceConfig,

    /// Upstream target and the upload it receives.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Inbound endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    /// Path serving `GET` forwards. Must start with `/`.
    pub path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            path: "/send-file".to_string(),
        }
    }
}

/// Local source of the forwarded file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding the file.
    pub directory: String,

    /// Bare file name inside `directory`.
    pub file_name: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            directory: "WEB-INF".to_string(),
            file_name: format!("{DEFAULT_FILE_STEM}.xlsx"),
        }
    }
}

/// Upstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// URL receiving the multipart POST.
    pub url: String,

    /// Value of the `fileName` request header.
    pub file_name_header: String,

    /// Declared type of the binary part, also sent as the `mimeType` header.
    pub mime_type: String,

    /// Multipart field name of the binary part.
    pub file_field: String,

    /// Text fields, sent in this order after the binary part.
    pub fields: Vec<FormField>,

    /// Overall upstream timeout. `None` keeps the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://daa-dev.development.creditguarantee.co.za/api/submissions".to_string(),
            file_name_header: DEFAULT_FILE_STEM.to_string(),
            mime_type: XLSX_MIME_TYPE.to_string(),
            file_field: "file".to_string(),
            fields: vec![
                FormField::new("policyHolderId", "9991234567"),
                FormField::new("reportingPeriodId", "3101"),
                FormField::new("documentId", "af2683d0-18d0-43da-878b-54d5ee8c4bff"),
                FormField::new("accountingPackageId", "1600"),
                FormField::new("policyNumber", "452852"),
                FormField::new("userId", "CGEJA"),
            ],
            timeout_secs: None,
        }
    }
}

/// A plain-text multipart field.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed per inbound request. `None` disables the limit.
    pub request_secs: Option<u64>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
