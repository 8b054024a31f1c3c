//! Vector index abstraction and in-memory implementation.
//!
//! The index is an externally-managed shared resource; all mutations are
//! keyed upserts (idempotent, last-write-wins) or scoped deletes, so no
//! client-side locking beyond the store's own is needed.

use crate::embeddings::cosine_similarity;
use crate::record::{EmbeddingRecord, RecordMetadata};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Equality filter over flat metadata fields.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    clauses: Vec<(String, String)>,
}

impl MetadataFilter {
    /// An empty filter matching every record. Only valid for deletes; query
    /// paths require a tenant scope.
    pub fn any() -> Self {
        Self::default()
    }

    /// Add an equality clause.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Whether `metadata` satisfies every clause.
    pub fn matches(&self, metadata: &RecordMetadata) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| metadata.field(field).as_deref() == Some(value.as_str()))
    }

    /// The filter's clauses.
    pub fn clauses(&self) -> &[(String, String)] {
        &self.clauses
    }

    /// Whether the filter has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// A query match: record id, similarity score, and stored metadata.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub id: String,
    pub score: f32,
    pub metadata: RecordMetadata,
}

/// Trait for vector indexes.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace the record with the same id.
    async fn upsert(&self, record: EmbeddingRecord) -> Result<()>;

    /// Nearest-neighbor search restricted to records matching `filter`,
    /// ranked by similarity descending, truncated to `top_k`.
    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>>;

    /// Delete every record in the index. Irreversible.
    async fn delete_all(&self) -> Result<()>;

    /// Delete every record matching `filter`.
    async fn delete_many(&self, filter: &MetadataFilter) -> Result<()>;

    /// Count stored records.
    async fn count(&self) -> Result<usize>;
}

/// In-memory vector index with brute-force cosine search.
///
/// Used by tests and local development; the production index is a managed
/// service behind the same trait.
#[derive(Default)]
pub struct MemoryVectorIndex {
    records: RwLock<HashMap<String, EmbeddingRecord>>,
}

impl MemoryVectorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: &str) -> Option<EmbeddingRecord> {
        let records = self.records.read().await;
        records.get(id).cloned()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn upsert(&self, record: EmbeddingRecord) -> Result<()> {
        // Validate flatness at the boundary, same as the managed index path.
        record.metadata.to_flat_map()?;

        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let records = self.records.read().await;

        let mut results: Vec<ScoredRecord> = records
            .values()
            .filter(|record| filter.matches(&record.metadata))
            .map(|record| ScoredRecord {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.vector),
                metadata: record.metadata.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }

    async fn delete_all(&self) -> Result<()> {
        let mut records = self.records.write().await;
        records.clear();
        Ok(())
    }

    async fn delete_many(&self, filter: &MetadataFilter) -> Result<()> {
        let mut records = self.records.write().await;
        records.retain(|_, record| !filter.matches(&record.metadata));
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let records = self.records.read().await;
        Ok(records.len())
    }
}
