//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Send a `ForwardRequest` to the downstream with a per-call deadline
//! - Probe the downstream introspection path
//! - Classify transport failures (timeout vs. connection vs. other)
//!
//! # Design Decisions
//! - One client abstraction for every outbound call, so tests can count calls
//! - Response bodies are read to completion so pooled connections are released
//! - Non-2xx statuses are returned as responses, not errors; the caller decides

use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;
use url::Url;

use crate::downstream::request::ForwardRequest;

/// What came back from the downstream. Headers are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

/// A failure to complete the exchange with the downstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to {url} timed out: {message}")]
    Timeout { url: String, message: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    /// The underlying failure text, without the URL prefix.
    pub fn message(&self) -> &str {
        match self {
            TransportError::Timeout { message, .. }
            | TransportError::Connect { message, .. }
            | TransportError::Request { message, .. } => message,
        }
    }

    fn from_reqwest(url: &Url, err: reqwest::Error) -> Self {
        let url = url.to_string();
        let message = error_chain(&err);
        if err.is_timeout() {
            TransportError::Timeout { url, message }
        } else if err.is_connect() {
            TransportError::Connect { url, message }
        } else {
            TransportError::Request { url, message }
        }
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// The single seam through which the gateway talks to the downstream.
#[async_trait]
pub trait DownstreamClient: Send + Sync {
    /// POST a multipart payload, waiting at most `timeout` for the full response.
    async fn forward(&self, request: ForwardRequest, timeout: Duration) -> Result<DownstreamResponse, TransportError>;

    /// GET `url`, waiting at most `timeout`.
    async fn probe(&self, url: &Url, timeout: Duration) -> Result<DownstreamResponse, TransportError>;
}

/// `DownstreamClient` backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpDownstream {
    client: reqwest::Client,
}

impl HttpDownstream {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("predict-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn read(url: &Url, response: reqwest::Response) -> Result<DownstreamResponse, TransportError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;
        Ok(DownstreamResponse { status, body })
    }
}

#[async_trait]
impl DownstreamClient for HttpDownstream {
    async fn forward(&self, request: ForwardRequest, timeout: Duration) -> Result<DownstreamResponse, TransportError> {
        let (url, form) = request.into_form();
        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&url, e))?;
        Self::read(&url, response).await
    }

    async fn probe(&self, url: &Url, timeout: Duration) -> Result<DownstreamResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;
        Self::read(url, response).await
    }
}
