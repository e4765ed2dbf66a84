//! Opens the [`DocumentStore`] named by a database URI.
//!
//! Supported schemes:
//!
//! - `memory://<database>` -- a fresh [`MemoryDocumentStore`]; an empty
//!   database name becomes `default`

use std::sync::Arc;

use anyhow::{bail, Context};
use placement_core::placement::COLLECTION;
use placement_core::DocumentStore;
use tracing::info;

use crate::storage::memory::MemoryDocumentStore;

/// Collection holding institution documents referenced by placement stats.
pub const INSTITUTIONS: &str = "institutions";

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub uri: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "memory://placement".to_string(),
        }
    }
}

/// Opens the store for `config.uri` and registers the placement relations.
///
/// # Errors
///
/// Returns an error if the URI is malformed or names an unsupported scheme.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let (scheme, database) = config
        .uri
        .split_once("://")
        .with_context(|| format!("malformed database uri `{}`", config.uri))?;

    match scheme {
        "memory" => {
            let database = if database.is_empty() { "default" } else { database };
            let store = MemoryDocumentStore::new(database);
            store.register_relation(COLLECTION, "institution", INSTITUTIONS);
            store.ping().await?;
            info!(database, "connected to in-memory document store");
            Ok(Arc::new(store))
        }
        other => bail!("unsupported database scheme `{other}`"),
    }
}
