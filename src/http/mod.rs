//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (add request ID)
//!     → multipart.rs (read uploads fully into memory)
//!     → handlers.rs (call the gateway)
//!     → Prediction or GatewayError rendered as JSON
//! ```

pub mod handlers;
pub mod multipart;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
