//! Downstream (prediction service) subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway operation
//!     → request.rs (ForwardRequest: uploads under one field name)
//!     → client.rs (DownstreamClient::forward / probe, with deadline)
//!     → DownstreamResponse or TransportError
//!     → status.rs (probe outcome → DownstreamStatus)
//! ```

pub mod client;
pub mod endpoints;
pub mod request;
pub mod status;

pub use client::{DownstreamClient, DownstreamResponse, HttpDownstream, TransportError};
pub use endpoints::Endpoints;
pub use request::ForwardRequest;
pub use status::DownstreamStatus;
