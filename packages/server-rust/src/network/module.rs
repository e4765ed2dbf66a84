//! Network module with deferred startup lifecycle.
//!
//! Implements the deferred startup pattern: `new()` wires the router state,
//! `start()` binds the TCP listener, and `serve()` starts accepting
//! connections. The split lets the caller learn the bound port (useful with
//! port 0) before traffic is accepted.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use placement_core::DocumentStore;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{
    create_stats, delete_stats, get_stats, health_handler, list_stats, liveness_handler,
    readiness_handler, replace_stats, AppState,
};
use super::middleware::apply_http_layers;

/// Methods served by the routes in [`NetworkModule::build_router`]. CORS
/// preflights allow exactly these, so the two must change together.
pub const API_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Manages the HTTP server lifecycle.
///
/// 1. `new()` -- captures configuration and the document store
/// 2. `start()` -- binds TCP listener to the configured address
/// 3. `serve()` -- accepts connections until the shutdown future resolves
pub struct NetworkModule {
    config: NetworkConfig,
    store: Arc<dyn DocumentStore>,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            store,
            listener: None,
        }
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /health` -- detailed health JSON
    /// - `GET /health/live` -- liveness probe
    /// - `GET /health/ready` -- readiness probe
    /// - `GET|POST /api/placement-stats`
    /// - `GET|PUT|DELETE /api/placement-stats/{id}`
    pub fn build_router(&self) -> Router {
        let state = AppState::new(Arc::clone(&self.store), self.config.clone());
        let routes = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route("/api/placement-stats", get(list_stats).post(create_stats))
            .route(
                "/api/placement-stats/{id}",
                get(get_stats).put(replace_stats).delete(delete_stats),
            );

        apply_http_layers(routes, &self.config, &API_METHODS).with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves HTTP until the shutdown future resolves, then waits for
    /// in-flight requests to finish.
    ///
    /// Consumes `self` because the listener is moved into the server.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server
    /// encounters a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .context("start() must be called before serve()")?;
        let router = self.build_router();

        info!("Serving HTTP connections");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}
