//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the gateway produce:
//!     → logging.rs (structured log events, body previews)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span via the HTTP layer
//! - Logging is a side channel; nothing depends on it for correctness

pub mod logging;
pub mod metrics;
