//! In-memory [`DocumentStore`] implementation backed by [`DashMap`].
//!
//! Each collection is a concurrent map from document id to document. An
//! insertion sequence is kept per document so that unsorted queries return
//! documents in storage order.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::bail;
use async_trait::async_trait;
use dashmap::DashMap;
use placement_core::{Document, DocumentStore, FilterExpression, Projection, QuerySpec, VERSION_FIELD};
use serde_json::Value;
use tracing::debug;

use crate::storage::matcher::{project, sort_documents, CompiledFilter};

#[derive(Debug, Clone)]
struct StoredDocument {
    sequence: u64,
    document: Document,
}

/// Concurrent in-memory document store.
///
/// Relations used by `populate` are registered per collection with
/// [`register_relation`](MemoryDocumentStore::register_relation).
pub struct MemoryDocumentStore {
    database: String,
    collections: DashMap<String, DashMap<String, StoredDocument>>,
    relations: DashMap<(String, String), String>,
    sequence: AtomicU64,
}

impl MemoryDocumentStore {
    /// Creates a new, empty store named `database`.
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: DashMap::new(),
            relations: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Declares that `field` of documents in `collection` holds ids of
    /// documents in `target`.
    pub fn register_relation(&self, collection: &str, field: &str, target: &str) {
        self.relations
            .insert((collection.to_string(), field.to_string()), target.to_string());
    }

    /// Matching documents in storage order.
    fn matching(&self, collection: &str, filter: &FilterExpression) -> anyhow::Result<Vec<Document>> {
        let compiled = CompiledFilter::new(filter)?;
        let Some(documents) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut matched: Vec<StoredDocument> = documents
            .iter()
            .filter(|entry| compiled.matches(&entry.value().document))
            .map(|entry| entry.value().clone())
            .collect();
        matched.sort_by_key(|stored| stored.sequence);
        Ok(matched.into_iter().map(|stored| stored.document).collect())
    }

    fn lookup(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .get(collection)?
            .get(id)
            .map(|entry| project(entry.document.clone(), &Projection::default()))
    }

    fn expand(&self, collection: &str, document: &mut Document, relation: &str) -> anyhow::Result<()> {
        let Some(target) = self
            .relations
            .get(&(collection.to_string(), relation.to_string()))
            .map(|entry| entry.value().clone())
        else {
            bail!("unknown relation `{relation}` on collection `{collection}`");
        };
        let Some(value) = document.get_mut(relation) else {
            return Ok(());
        };
        match value {
            Value::String(id) => {
                *value = self.lookup(&target, id).map_or(Value::Null, Value::Object);
            }
            Value::Array(items) => {
                let resolved = items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|id| self.lookup(&target, id))
                    .map(Value::Object)
                    .collect();
                *items = resolved;
            }
            _ => {}
        }
        Ok(())
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new("default")
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: &str, spec: &QuerySpec) -> anyhow::Result<Vec<Document>> {
        let mut documents = self.matching(collection, &spec.filter)?;
        let matched = documents.len();
        if let Some(sort) = &spec.sort {
            sort_documents(&mut documents, sort);
        }
        if let Some(pagination) = spec.pagination {
            let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
            let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
            documents = documents.into_iter().skip(offset).take(limit).collect();
        }
        for document in &mut documents {
            for relation in &spec.populate {
                self.expand(collection, document, relation)?;
            }
        }
        let documents: Vec<Document> = documents
            .into_iter()
            .map(|document| project(document, &spec.projection))
            .collect();
        debug!(
            database = %self.database,
            collection,
            matched,
            returned = documents.len(),
            "find"
        );
        Ok(documents)
    }

    async fn count(&self, collection: &str, filter: &FilterExpression) -> anyhow::Result<u64> {
        let total = self.matching(collection, filter)?.len();
        Ok(u64::try_from(total)?)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> anyhow::Result<Document> {
        let id = match document.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Null) | None => uuid::Uuid::new_v4().to_string(),
            Some(_) => bail!("document id must be a non-empty string"),
        };
        document.insert("id".to_string(), Value::String(id.clone()));
        document.insert(VERSION_FIELD.to_string(), Value::from(0));

        let documents = self.collections.entry(collection.to_string()).or_default();
        if documents.contains_key(&id) {
            bail!("duplicate id `{id}` in collection `{collection}`");
        }
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        documents.insert(
            id.clone(),
            StoredDocument {
                sequence,
                document: document.clone(),
            },
        );
        debug!(database = %self.database, collection, id, "insert");
        Ok(document)
    }

    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id).map(|entry| entry.document.clone())))
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        mut document: Document,
    ) -> anyhow::Result<Option<Document>> {
        let Some(documents) = self.collections.get(collection) else {
            return Ok(None);
        };
        let Some(mut stored) = documents.get_mut(id) else {
            return Ok(None);
        };
        let version = stored
            .document
            .get(VERSION_FIELD)
            .and_then(Value::as_u64)
            .unwrap_or(0);
        document.insert("id".to_string(), Value::String(id.to_string()));
        document.insert(VERSION_FIELD.to_string(), Value::from(version + 1));
        stored.document = document.clone();
        debug!(database = %self.database, collection, id, version = version + 1, "replace");
        Ok(Some(document))
    }

    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<bool> {
        let removed = self
            .collections
            .get(collection)
            .is_some_and(|documents| documents.remove(id).is_some());
        debug!(database = %self.database, collection, id, removed, "delete");
        Ok(removed)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
