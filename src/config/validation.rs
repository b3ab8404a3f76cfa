//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the downstream address is a usable http(s) URL
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{ForwardRouteConfig, GatewayConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("downstream.base_url is required (set it in the config file or GATEWAY_DOWNSTREAM_URL)")]
    MissingDownstreamUrl,

    #[error("downstream.base_url '{0}' is not an http(s) URL with a host")]
    InvalidDownstreamUrl(String),

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: String, value: String },

    #[error("{0} must be greater than zero")]
    ZeroValue(String),

    #[error("{0} must not be empty")]
    Empty(String),

    #[error("{field} '{value}' must start with '/'")]
    InvalidPath { field: String, value: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_downstream_url(&config.downstream.base_url, &mut errors);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address".to_string(),
            value: config.listener.bind_address.clone(),
        });
    }

    validate_route("downstream.predict", &config.downstream.predict, &mut errors);
    validate_route("downstream.batch", &config.downstream.batch, &mut errors);

    if !config.downstream.status_path.starts_with('/') {
        errors.push(ValidationError::InvalidPath {
            field: "downstream.status_path".to_string(),
            value: config.downstream.status_path.clone(),
        });
    }
    if config.downstream.probe_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("downstream.probe_timeout_secs".to_string()));
    }

    if config.uploads.single_field.is_empty() {
        errors.push(ValidationError::Empty("uploads.single_field".to_string()));
    }
    if config.uploads.batch_field.is_empty() {
        errors.push(ValidationError::Empty("uploads.batch_field".to_string()));
    }
    if config.uploads.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue("uploads.max_body_bytes".to_string()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address".to_string(),
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_downstream_url(raw: &str, errors: &mut Vec<ValidationError>) {
    if raw.trim().is_empty() {
        errors.push(ValidationError::MissingDownstreamUrl);
        return;
    }
    let usable = Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false);
    if !usable {
        errors.push(ValidationError::InvalidDownstreamUrl(raw.to_string()));
    }
}

fn validate_route(prefix: &str, route: &ForwardRouteConfig, errors: &mut Vec<ValidationError>) {
    if !route.path.starts_with('/') {
        errors.push(ValidationError::InvalidPath {
            field: format!("{prefix}.path"),
            value: route.path.clone(),
        });
    }
    if route.field.is_empty() {
        errors.push(ValidationError::Empty(format!("{prefix}.field")));
    }
    if route.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue(format!("{prefix}.timeout_secs")));
    }
}
