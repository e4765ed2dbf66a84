//! Storage seam between the query translator and a concrete backend.
//!
//! [`QuerySpec`] values built by the translator are executed through
//! [`DocumentStore`]; the server holds it as `Arc<dyn DocumentStore>`.

use async_trait::async_trait;

use crate::filter::FilterExpression;
use crate::query::QuerySpec;

/// A stored record: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Data-query interface over a document store.
///
/// Implementations support equality/range/set filtering, multi-key sort,
/// include/exclude projection, skip/limit pagination, relation expansion by
/// name, and counting. Errors are returned as-is to the caller; retry policy,
/// if any, belongs to the implementation.
///
/// Used as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the documents of `collection` matching `spec`, sorted,
    /// projected, paginated, and with requested relations expanded.
    async fn find(&self, collection: &str, spec: &QuerySpec) -> anyhow::Result<Vec<Document>>;

    /// Counts the documents of `collection` matching `filter`.
    async fn count(&self, collection: &str, filter: &FilterExpression) -> anyhow::Result<u64>;

    /// Inserts a document, assigning its `id`. Returns the stored document.
    async fn insert(&self, collection: &str, document: Document) -> anyhow::Result<Document>;

    /// Loads a single document by id.
    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<Document>>;

    /// Replaces the document with the given id. Returns `None` if it does
    /// not exist.
    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> anyhow::Result<Option<Document>>;

    /// Deletes a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<bool>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> anyhow::Result<()>;
}
