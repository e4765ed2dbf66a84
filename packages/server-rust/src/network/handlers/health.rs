//! Health, liveness, and readiness endpoint handlers.
//!
//! These handlers expose server health information for orchestrators
//! (Kubernetes, load balancers) and operational monitoring.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::warn;

use super::AppState;

/// Returns detailed health information as JSON.
///
/// Always returns 200 -- the `state` field in the response body reports
/// whether the document store answered a ping.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let storage = match state.store.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!(error = %e, "storage ping failed");
            "unavailable"
        }
    };
    let uptime_secs = state.start_time.elapsed().as_secs();

    Json(json!({
        "state": if storage == "ok" { "ready" } else { "degraded" },
        "storage": storage,
        "uptime_secs": uptime_secs,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Kubernetes liveness probe -- always returns 200 OK.
///
/// Does not check the document store, because a failed liveness probe
/// triggers a pod restart.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe -- returns 200 when the document store
/// answers a ping, 503 otherwise.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.store.ping().await.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use placement_core::{Document, DocumentStore, FilterExpression, QuerySpec};

    use super::*;
    use crate::network::NetworkConfig;
    use crate::storage::MemoryDocumentStore;

    struct UnreachableStore;

    #[async_trait]
    impl DocumentStore for UnreachableStore {
        async fn find(&self, _: &str, _: &QuerySpec) -> anyhow::Result<Vec<Document>> {
            anyhow::bail!("connection refused")
        }
        async fn count(&self, _: &str, _: &FilterExpression) -> anyhow::Result<u64> {
            anyhow::bail!("connection refused")
        }
        async fn insert(&self, _: &str, _: Document) -> anyhow::Result<Document> {
            anyhow::bail!("connection refused")
        }
        async fn get(&self, _: &str, _: &str) -> anyhow::Result<Option<Document>> {
            anyhow::bail!("connection refused")
        }
        async fn replace(&self, _: &str, _: &str, _: Document) -> anyhow::Result<Option<Document>> {
            anyhow::bail!("connection refused")
        }
        async fn delete(&self, _: &str, _: &str) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused")
        }
        async fn ping(&self) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    fn healthy_state() -> AppState {
        AppState::new(Arc::new(MemoryDocumentStore::default()), NetworkConfig::default())
    }

    fn unreachable_state() -> AppState {
        AppState::new(Arc::new(UnreachableStore), NetworkConfig::default())
    }

    #[tokio::test]
    async fn health_handler_reports_ready_store() {
        let json = health_handler(State(healthy_state())).await.0;
        assert_eq!(json["state"], "ready");
        assert_eq!(json["storage"], "ok");
        assert!(json["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn health_handler_reports_degraded_store() {
        let json = health_handler(State(unreachable_state())).await.0;
        assert_eq!(json["state"], "degraded");
        assert_eq!(json["storage"], "unavailable");
    }

    #[tokio::test]
    async fn liveness_handler_always_returns_200() {
        assert_eq!(liveness_handler().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_store_ping() {
        assert_eq!(readiness_handler(State(healthy_state())).await, StatusCode::OK);
        assert_eq!(
            readiness_handler(State(unreachable_state())).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
