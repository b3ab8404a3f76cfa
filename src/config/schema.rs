//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration for the forwarding gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream prediction service.
    pub downstream: DownstreamConfig,

    /// Inbound upload handling.
    pub uploads: UploadConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Downstream service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Base URL of the downstream service (e.g., a tunnel address).
    /// There is no default: it must come from the config file or
    /// `GATEWAY_DOWNSTREAM_URL`.
    pub base_url: String,

    /// Single-item forwarding route.
    #[serde(deserialize_with = "ForwardRouteConfig::deserialize_predict")]
    pub predict: ForwardRouteConfig,

    /// Batch forwarding route.
    #[serde(deserialize_with = "ForwardRouteConfig::deserialize_batch")]
    pub batch: ForwardRouteConfig,

    /// Introspection path probed by the status check.
    pub status_path: String,

    /// Status probe timeout in seconds.
    pub probe_timeout_secs: u64,

    /// Relay non-2xx downstream responses that carry a JSON body instead of
    /// coercing them to 500.
    pub relay_error_status: bool,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            predict: ForwardRouteConfig::predict(),
            batch: ForwardRouteConfig::batch(),
            status_path: "/debug/routes".to_string(),
            probe_timeout_secs: 10,
            relay_error_status: false,
        }
    }
}

/// One outbound forwarding route.
///
/// Defaults differ per route, so a partial `[downstream.predict]` or
/// `[downstream.batch]` table is layered over that route's own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct ForwardRouteConfig {
    /// Path appended to the downstream base URL.
    pub path: String,

    /// Multipart field name the downstream expects for each file.
    pub field: String,

    /// Total time allowed for the downstream call, in seconds.
    pub timeout_secs: u64,

    /// How much of the downstream body to echo into the logs.
    pub log_preview_chars: usize,
}

impl ForwardRouteConfig {
    /// Defaults for `POST /predict`.
    pub fn predict() -> Self {
        Self {
            path: "/predict".to_string(),
            field: "file".to_string(),
            timeout_secs: 60,
            log_preview_chars: 300,
        }
    }

    /// Defaults for `POST /predict_batch`.
    pub fn batch() -> Self {
        Self {
            path: "/predict_batch".to_string(),
            field: "files".to_string(),
            timeout_secs: 300,
            log_preview_chars: 500,
        }
    }

    fn deserialize_predict<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RouteOverrides::deserialize(deserializer).map(|o| o.apply(Self::predict()))
    }

    fn deserialize_batch<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RouteOverrides::deserialize(deserializer).map(|o| o.apply(Self::batch()))
    }
}

/// The keys an operator actually wrote in a route table.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RouteOverrides {
    path: Option<String>,
    field: Option<String>,
    timeout_secs: Option<u64>,
    log_preview_chars: Option<usize>,
}

impl RouteOverrides {
    fn apply(self, defaults: ForwardRouteConfig) -> ForwardRouteConfig {
        ForwardRouteConfig {
            path: self.path.unwrap_or(defaults.path),
            field: self.field.unwrap_or(defaults.field),
            timeout_secs: self.timeout_secs.unwrap_or(defaults.timeout_secs),
            log_preview_chars: self.log_preview_chars.unwrap_or(defaults.log_preview_chars),
        }
    }
}

/// Inbound upload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Field name carrying the file on `POST /predict`.
    pub single_field: String,

    /// Repeated field name carrying the files on `POST /predict_batch`.
    pub batch_field: String,

    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            single_field: "file".to_string(),
            batch_field: "files".to_string(),
            max_body_bytes: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// CORS policy. `"*"` in any list means "any".
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Attach a CORS layer at all.
    pub enabled: bool,
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        let any = vec!["*".to_string()];
        Self {
            enabled: true,
            allow_origins: any.clone(),
            allow_methods: any.clone(),
            allow_headers: any,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "predict_gateway=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
