//! The forwarding gateway.
//!
//! # Responsibilities
//! - Package uploads into a `ForwardRequest` under the configured field name
//! - Send it downstream with the deadline for that kind of call
//! - Pass the downstream JSON through unmodified, or translate the failure
//! - Probe the downstream without ever failing
//!
//! # Design Decisions
//! - The outbound call runs on its own task, so an inbound client hanging up
//!   does not cancel it; it ends by completing, timing out, or failing
//! - Empty batches are rejected before any network activity
//! - No retries, no state carried between calls

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::config::DownstreamConfig;
use crate::downstream::{
    DownstreamClient, DownstreamResponse, DownstreamStatus, Endpoints, ForwardRequest, TransportError,
};
use crate::error::GatewayError;
use crate::forward::Upload;
use crate::observability::{logging::preview, metrics};
use crate::resilience::{CallKind, TimeoutPolicy};

/// A downstream answer ready to hand back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for Prediction {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Forwards uploads to the configured downstream.
pub struct Gateway {
    client: Arc<dyn DownstreamClient>,
    endpoints: Endpoints,
    timeouts: TimeoutPolicy,
    config: DownstreamConfig,
}

impl Gateway {
    pub fn new(config: &DownstreamConfig, client: Arc<dyn DownstreamClient>) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoints: Endpoints::from_config(config)?,
            timeouts: TimeoutPolicy::from_config(config),
            config: config.clone(),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Forward one file to the single-item endpoint.
    pub async fn forward_single(&self, upload: Upload) -> Result<Prediction, GatewayError> {
        tracing::info!(
            filename = %upload.filename(),
            bytes = upload.len(),
            url = %self.endpoints.predict,
            "Forwarding upload to downstream"
        );

        let request = ForwardRequest::new(self.endpoints.predict.clone(), &self.config.predict.field, vec![upload]);
        self.dispatch(CallKind::Single, request).await
    }

    /// Forward every file, in order, to the batch endpoint in one request.
    pub async fn forward_batch(&self, uploads: Vec<Upload>) -> Result<Prediction, GatewayError> {
        if uploads.is_empty() {
            tracing::warn!("Rejecting batch request without files");
            return Err(GatewayError::ClientInput("No files were sent".to_string()));
        }

        tracing::info!(
            count = uploads.len(),
            url = %self.endpoints.batch,
            "Forwarding batch to downstream"
        );

        let request = ForwardRequest::new(self.endpoints.batch.clone(), &self.config.batch.field, uploads);
        self.dispatch(CallKind::Batch, request).await
    }

    /// Probe the downstream introspection path. Never fails.
    pub async fn check_downstream_status(&self) -> DownstreamStatus {
        let outcome = self
            .client
            .probe(&self.endpoints.status, self.timeouts.for_call(CallKind::Probe))
            .await;

        match &outcome {
            Ok(response) => tracing::debug!(status = %response.status, "Downstream probe answered"),
            Err(e) => tracing::warn!(error = %e, "Downstream probe failed"),
        }

        let status = DownstreamStatus::from_probe(self.endpoints.base(), outcome);
        metrics::record_probe(status.is_online());
        status
    }

    async fn dispatch(&self, kind: CallKind, request: ForwardRequest) -> Result<Prediction, GatewayError> {
        let start = Instant::now();
        let uploads = request.uploads().len();
        let url = request.url().to_string();
        let timeout = self.timeouts.for_call(kind);
        tracing::debug!(
            route = kind.label(),
            uploads,
            payload_bytes = request.payload_bytes(),
            timeout_secs = timeout.as_secs(),
            "Dispatching downstream call"
        );

        let client = Arc::clone(&self.client);
        let task = tokio::spawn(async move { client.forward(request, timeout).await });

        let result = match task.await {
            Ok(Ok(response)) => self.interpret(kind, &url, response),
            Ok(Err(e)) => Err(self.transport_failure(kind, &url, e)),
            Err(e) => {
                tracing::error!(route = kind.label(), error = %e, "Forwarding task aborted");
                Err(GatewayError::Unexpected(format!("forwarding task failed: {e}")))
            }
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_forward(kind.label(), outcome, uploads, start);
        result
    }

    fn preview_chars(&self, kind: CallKind) -> usize {
        match kind {
            CallKind::Batch => self.config.batch.log_preview_chars,
            _ => self.config.predict.log_preview_chars,
        }
    }

    fn interpret(&self, kind: CallKind, url: &str, response: DownstreamResponse) -> Result<Prediction, GatewayError> {
        let DownstreamResponse { status, body } = response;

        tracing::info!(
            route = kind.label(),
            status = %status,
            body = preview(&body, self.preview_chars(kind)),
            "Downstream responded"
        );

        if !status.is_success() {
            if self.config.relay_error_status {
                if let Ok(body) = serde_json::from_str::<Value>(&body) {
                    tracing::warn!(route = kind.label(), status = %status, "Relaying downstream error response");
                    return Ok(Prediction { status, body });
                }
            }
            tracing::error!(route = kind.label(), status = %status, url, "Downstream returned an error status");
            return Err(GatewayError::DownstreamConnection {
                route: kind.label(),
                url: url.to_string(),
                message: format!("downstream answered with HTTP {status}"),
            });
        }

        serde_json::from_str(&body)
            .map(|body| Prediction {
                status: StatusCode::OK,
                body,
            })
            .map_err(|e| {
                tracing::error!(route = kind.label(), error = %e, "Downstream body is not JSON");
                GatewayError::Unexpected(format!("downstream response is not valid JSON: {e}"))
            })
    }

    fn transport_failure(&self, kind: CallKind, url: &str, err: TransportError) -> GatewayError {
        if kind.reports_timeout() && err.is_timeout() {
            tracing::error!(route = kind.label(), url, "Downstream call timed out");
            return GatewayError::DownstreamTimeout {
                route: kind.label(),
                url: url.to_string(),
                timeout_secs: self.timeouts.for_call(kind).as_secs(),
            };
        }

        tracing::error!(route = kind.label(), error = %err, "Could not reach downstream");
        GatewayError::DownstreamConnection {
            route: kind.label(),
            url: url.to_string(),
            message: err.message().to_string(),
        }
    }
}
