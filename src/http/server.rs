//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (CORS, tracing, request ID)
//! - Bind server to listener
//! - Stop on OS signal or shutdown broadcast

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::gstr1a::Aggregator;
use crate::http::cors::build_cors_layer;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::{auth, returns};
use crate::lifecycle::signals::shutdown_signal;
use crate::upstream::{ReqwestUpstream, Upstream};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn Upstream>,
    pub aggregator: Arc<Aggregator>,
    pub auth_base_url: Arc<str>,
}

impl AppState {
    pub fn new(config: &GatewayConfig, upstream: Arc<dyn Upstream>) -> Self {
        let aggregator = Arc::new(Aggregator::new(
            Arc::clone(&upstream),
            config.fanout.max_concurrency,
        ));
        Self {
            upstream,
            aggregator,
            auth_base_url: Arc::from(config.upstream.base_url.as_str()),
        }
    }

    /// Outbound URL for an `/authentication/{action}` call.
    pub fn auth_url(&self, action: &str) -> String {
        format!("{}/authentication/{}", self.auth_base_url, action)
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server that talks to the GST API over reqwest.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let upstream = Arc::new(ReqwestUpstream::new(&config.upstream)?);
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create a server with a caller-provided upstream client.
    pub fn with_upstream(config: GatewayConfig, upstream: Arc<dyn Upstream>) -> Self {
        let state = AppState::new(&config, upstream);
        let router = build_router(&config, state);
        Self { router }
    }

    /// Run the server until Ctrl+C/SIGTERM or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {},
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(auth::routes())
        .merge(returns::routes())
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
        .layer(build_cors_layer(&config.cors))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}
