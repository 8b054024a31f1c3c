//! Pinecone-backed vector index.
//!
//! A thin REST client over one Pinecone index host. Two instances are
//! constructed in production: one for the workspace-search index and one for
//! the AI-agent index.

use crate::index::{MetadataFilter, ScoredRecord, VectorIndex};
use crate::record::{EmbeddingRecord, RecordMetadata};
use crate::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Pinecone index client.
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    host: String,
}

impl PineconeIndex {
    /// Create a client for one index host.
    pub fn new(api_key: impl Into<String>, host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            host: host.trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}{}", self.host, path))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::from_status(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }

    fn filter_value(filter: &MetadataFilter) -> Value {
        let clauses: Vec<Value> = filter
            .clauses()
            .iter()
            .map(|(field, value)| json!({ field: { "$eq": value } }))
            .collect();

        match clauses.len() {
            0 => json!({}),
            1 => clauses.into_iter().next().unwrap_or_default(),
            _ => json!({ "$and": clauses }),
        }
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<RecordMetadata>,
}

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: serde_json::Map<String, Value>,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, record: EmbeddingRecord) -> Result<()> {
        let metadata = record.metadata.to_flat_map()?;
        let vector = serde_json::to_value(UpsertVector {
            id: &record.id,
            values: &record.vector,
            metadata,
        })?;
        let body = json!({ "vectors": [vector] });

        self.post("/vectors/upsert", body)
            .await
            .map_err(|err| match err {
                // Index write failures surface as upsert errors; the caller
                // decides between retry-whole-item and skip-and-log.
                PipelineError::Network(e) => PipelineError::upsert(e.to_string()),
                PipelineError::Server { status, message } => {
                    PipelineError::upsert(format!("HTTP {}: {}", status, message))
                }
                other => other,
            })?;

        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        if !filter.is_empty() {
            body["filter"] = Self::filter_value(filter);
        }

        let response: QueryResponse = serde_json::from_value(self.post("/query", body).await?)?;

        Ok(response
            .matches
            .into_iter()
            .filter_map(|m| {
                m.metadata.map(|metadata| ScoredRecord {
                    id: m.id,
                    score: m.score,
                    metadata,
                })
            })
            .collect())
    }

    async fn delete_all(&self) -> Result<()> {
        self.post("/vectors/delete", json!({ "deleteAll": true }))
            .await?;
        Ok(())
    }

    async fn delete_many(&self, filter: &MetadataFilter) -> Result<()> {
        self.post(
            "/vectors/delete",
            json!({ "filter": Self::filter_value(filter) }),
        )
        .await?;
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .post("/describe_index_stats", json!({}))
            .await?;
        Ok(response
            .get("totalVectorCount")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize)
    }
}
