//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Handler (uploads fully read)
//!     → gateway.rs (forward_single / forward_batch / check_downstream_status)
//!     → downstream client (one call, one deadline)
//!     → Prediction or GatewayError back to the handler
//! ```

pub mod gateway;
pub mod upload;

pub use gateway::{Gateway, Prediction};
pub use upload::Upload;
