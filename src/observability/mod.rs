//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every inbound request span
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
