//! # huddle-pipeline
//!
//! The message → embedding → retrieval pipeline behind Huddle's AI
//! assistant.
//!
//! On each new text message the pipeline embeds the content, upserts the
//! vector with flat metadata into a tenant-filtered index, and later
//! retrieves the most similar records to build LLM context. Two logical
//! indexes are maintained: one for general workspace search and one for the
//! AI-agent persona feature.
//!
//! Everything hangs off a [`PipelineContext`] built once at startup; all
//! external services (embedding provider, vector indexes, chat data stores)
//! are injected behind traits so tests can run against fakes.

pub mod context;
pub mod embeddings;
pub mod error;
pub mod firebase;
pub mod index;
pub mod ingest;
pub mod migrate;
pub mod persona;
pub mod pinecone;
pub mod query;
pub mod record;
pub mod retry;
pub mod stores;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{PipelineContext, PipelineContextBuilder};
pub use embeddings::{EmbeddingProvider, OpenAiEmbeddings};
pub use error::PipelineError;
pub use index::{MemoryVectorIndex, MetadataFilter, ScoredRecord, VectorIndex};
pub use migrate::{MigrateOptions, MigrationReport};
pub use query::{RetrievalResult, ScopeFilter, DEFAULT_TOP_K};
pub use record::{EmbeddingRecord, RecordKind, RecordMetadata};
pub use retry::{with_retry, RetryPolicy};
pub use stores::{MessageStore, ProfileStore};

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
