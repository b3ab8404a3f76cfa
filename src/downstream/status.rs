//! Downstream reachability report.

use serde::Serialize;
use serde_json::Value;

use crate::downstream::client::{DownstreamResponse, TransportError};

/// Outcome of probing the downstream. Every outcome is a value; probing
/// never fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DownstreamStatus {
    Online {
        downstream_url: String,
        /// Whatever the introspection path reported.
        endpoints: Value,
    },
    Offline {
        downstream_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl DownstreamStatus {
    pub fn from_probe(downstream_url: &str, outcome: Result<DownstreamResponse, TransportError>) -> Self {
        let downstream_url = downstream_url.to_string();
        match outcome {
            Ok(response) if response.status.is_success() => {
                // A 2xx that isn't JSON still proves reachability; report the raw text.
                let endpoints = serde_json::from_str(&response.body).unwrap_or(Value::String(response.body));
                DownstreamStatus::Online {
                    downstream_url,
                    endpoints,
                }
            }
            Ok(response) => DownstreamStatus::Offline {
                downstream_url,
                status_code: Some(response.status.as_u16()),
                error: None,
            },
            Err(err) => DownstreamStatus::Offline {
                downstream_url,
                status_code: None,
                error: Some(err.to_string()),
            },
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, DownstreamStatus::Online { .. })
    }
}
