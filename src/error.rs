//! Gateway error model and its HTTP translation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Every way a forwarding operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The caller sent something unusable.
    #[error("{0}")]
    ClientInput(String),

    /// The inbound body exceeded `uploads.max_body_bytes` while being read.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The downstream did not answer within the deadline.
    #[error("Timeout: {route} processing at {url} took longer than {timeout_secs}s")]
    DownstreamTimeout {
        route: &'static str,
        url: String,
        timeout_secs: u64,
    },

    /// The downstream could not be reached or answered with a failure status.
    #[error("Connection error with downstream ({route}) at {url}: {message}")]
    DownstreamConnection {
        route: &'static str,
        url: String,
        message: String,
    },

    /// Anything else, e.g. a downstream body that is not JSON.
    #[error("{0}")]
    Unexpected(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::ClientInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::DownstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::DownstreamConnection { .. } | GatewayError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable name, also used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::ClientInput(_) => "client_input",
            GatewayError::PayloadTooLarge(_) => "payload_too_large",
            GatewayError::DownstreamTimeout { .. } => "downstream_timeout",
            GatewayError::DownstreamConnection { .. } => "downstream_connection",
            GatewayError::Unexpected(_) => "unexpected",
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub kind: &'static str,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
