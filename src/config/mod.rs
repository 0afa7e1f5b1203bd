//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → forwarding settings shared via ArcSwap
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps in new forwarding settings
//! ```
//!
//! # Design Decisions
//! - Every default reproduces the original hardcoded deployment
//! - Listener and transport settings are read once at startup; only
//!   source/upstream settings are reloadable

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    EndpointConfig, FormField, ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig,
    SourceConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
