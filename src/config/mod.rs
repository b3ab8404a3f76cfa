//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (GATEWAY_* environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared with the HTTP layer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changing the downstream means a restart
//! - All fields have defaults except the downstream URL, which has none
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, DownstreamConfig, ForwardRouteConfig, GatewayConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, UploadConfig,
};
pub use validation::ValidationError;
