//! Forwarding gateway for an externally hosted prediction service.
//!
//! Accepts image uploads over HTTP, forwards them unmodified to a configured
//! downstream, and relays the downstream's JSON answer.

pub mod config;
pub mod downstream;
pub mod error;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use forward::{Gateway, Prediction, Upload};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
