//! Configuration schema definitions.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};

/// Embedding vector dimensionality used across the pipeline.
///
/// This matches the embedding model's output width; every index record is
/// validated against it before upsert.
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Main Huddle configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Embedding provider settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector index settings.
    #[serde(default)]
    pub index: IndexConfig,

    /// Chat data store settings.
    #[serde(default)]
    pub firebase: FirebaseConfig,

    /// Retry/backoff settings for flaky upstream calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Bulk migration settings.
    #[serde(default)]
    pub migration: MigrationConfig,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model name.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// API key for the embedding provider.
    #[serde(default)]
    pub api_key: SecretString,

    /// Override the provider base URL (for compatible APIs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Expected vector dimensionality.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            api_key: SecretString::default(),
            base_url: None,
            dimension: default_dimension(),
        }
    }
}

/// Vector index configuration.
///
/// Two logical indexes are configured: one for general workspace search and
/// one for the AI-agent persona feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    /// API key for the index service.
    #[serde(default)]
    pub api_key: SecretString,

    /// Host URL of the workspace-search index.
    #[serde(default)]
    pub workspace_host: String,

    /// Host URL of the AI-agent index.
    #[serde(default)]
    pub agent_host: String,
}

/// Chat data store (Firebase Realtime Database) configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Database root URL, e.g. `https://myapp.firebaseio.com`.
    #[serde(default)]
    pub database_url: String,

    /// Database auth token, if the rules require one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<SecretString>,
}

/// Retry/backoff configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per call (including the first).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay before the first retry, in milliseconds. Doubles each
    /// attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Cap on the backoff delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Upper bound on the random jitter added to each delay, in
    /// milliseconds.
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
        }
    }
}

/// Bulk migration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// How many items are embedded concurrently. Bounded to avoid
    /// rate-limit storms against the embedding provider.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_dimension() -> usize {
    EMBEDDING_DIMENSION
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_max_jitter_ms() -> u64 {
    1000
}

fn default_concurrency() -> usize {
    4
}
