//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, body limit, CORS)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{CorsConfig, GatewayConfig, UploadConfig};
use crate::downstream::{DownstreamClient, HttpDownstream};
use crate::forward::Gateway;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub uploads: Arc<UploadConfig>,
}

/// Failure to assemble the server from a configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid downstream URL: {0}")]
    DownstreamUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server that talks to the downstream over HTTP.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let client = Arc::new(HttpDownstream::new()?);
        Self::with_client(config, client)
    }

    /// Create a server around any downstream client.
    pub fn with_client(config: GatewayConfig, client: Arc<dyn DownstreamClient>) -> Result<Self, ServerError> {
        let gateway = Gateway::new(&config.downstream, client)?;
        let state = AppState {
            gateway: Arc::new(gateway),
            uploads: Arc::new(config.uploads.clone()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(handlers::service_info))
            .route("/health", get(handlers::health))
            .route("/predict", post(handlers::predict))
            .route("/predict_batch", post(handlers::predict_batch))
            .route("/debug/downstream-status", get(handlers::downstream_status))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.uploads.max_body_bytes));

        if config.cors.enabled {
            router = router.layer(cors_layer(&config.cors));
        }

        // Outermost first: the id must exist before the trace span reads it.
        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(propagate_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        request_id = %request.headers().request_id(),
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })),
        )
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            downstream = %self.config.downstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v.trim() == "*")
}

/// Translate the configured policy into a CORS layer. Unparseable entries
/// are logged and skipped.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if is_wildcard(&config.allow_origins) {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.allow_origins.iter().filter_map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| tracing::error!(origin = %o, error = %e, "Invalid CORS origin, skipping"))
                .ok()
        }))
    };

    let methods = if is_wildcard(&config.allow_methods) {
        AllowMethods::any()
    } else {
        AllowMethods::list(config.allow_methods.iter().filter_map(|m| {
            m.parse::<Method>()
                .map_err(|e| tracing::error!(method = %m, error = %e, "Invalid CORS method, skipping"))
                .ok()
        }))
    };

    let headers = if is_wildcard(&config.allow_headers) {
        AllowHeaders::any()
    } else {
        AllowHeaders::list(config.allow_headers.iter().filter_map(|h| {
            h.parse::<HeaderName>()
                .map_err(|e| tracing::error!(header = %h, error = %e, "Invalid CORS header, skipping"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
}
