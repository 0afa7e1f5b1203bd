//! File forwarder library.
//!
//! Serves one `GET` endpoint that uploads a local file, together with a
//! fixed set of form fields, to an upstream API and relays the answer.

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use forward::Forwarder;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
