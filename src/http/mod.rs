//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, per-request span)
//!     → forward::Forwarder (load, upload, relay)
//!     → response.rs (plain-text rendering)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::TEXT_PLAIN_UTF_8;
pub use server::{AppState, HttpServer};
