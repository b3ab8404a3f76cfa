//! Route handlers.

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};

use crate::downstream::DownstreamStatus;
use crate::error::GatewayError;
use crate::forward::Prediction;
use crate::http::multipart::{read_single_upload, read_uploads};
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;

pub const SERVICE_NAME: &str = "Predict Gateway";

/// `POST /predict`
pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Prediction, GatewayError> {
    let upload = read_single_upload(&mut multipart, &state.uploads.single_field).await?;
    tracing::debug!(request_id = %headers.request_id(), filename = %upload.filename(), "Upload received");
    state.gateway.forward_single(upload).await
}

/// `POST /predict_batch`
pub async fn predict_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Prediction, GatewayError> {
    let uploads = read_uploads(&mut multipart, &state.uploads.batch_field).await?;
    tracing::debug!(request_id = %headers.request_id(), count = uploads.len(), "Batch received");
    state.gateway.forward_batch(uploads).await
}

/// `GET /`
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "downstream_url": state.gateway.endpoints().base(),
        "endpoints": {
            "/predict": "Forwards a single image to the downstream service",
            "/predict_batch": "Forwards several images to the downstream service in one request",
            "/health": "Gateway liveness",
            "/debug/downstream-status": "Checks whether the downstream service is reachable",
        },
    }))
}

/// `GET /health`. Does not touch the downstream.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /debug/downstream-status`
pub async fn downstream_status(State(state): State<AppState>) -> Json<DownstreamStatus> {
    Json(state.gateway.check_downstream_status().await)
}
