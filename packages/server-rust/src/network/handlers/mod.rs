//! HTTP handler definitions for the placement server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod health;
pub mod placement;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use placement::{create_stats, delete_stats, get_stats, list_stats, replace_stats};

use std::sync::Arc;
use std::time::Instant;

use placement_core::DocumentStore;

use super::NetworkConfig;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Backing document store.
    pub store: Arc<dyn DocumentStore>,
    /// Network configuration (bind address, CORS, timeout).
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: NetworkConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}
