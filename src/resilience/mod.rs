//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to downstream:
//!     → timeouts.rs (pick the deadline for this kind of call)
//!     → On timeout: surface immediately, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: a single downstream failure goes straight back to the caller

pub mod timeouts;

pub use timeouts::{CallKind, TimeoutPolicy};
