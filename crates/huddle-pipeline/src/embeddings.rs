//! Embedding generation.
//!
//! Converts arbitrary UTF-8 text into a fixed-length dense vector suitable
//! for cosine similarity search. Text is normalized and truncated before the
//! provider call, and every returned vector is checked against the expected
//! dimensionality so a misbehaving provider can never corrupt the index.

use crate::retry::{with_retry, RetryPolicy};
use crate::{PipelineError, Result};
use async_trait::async_trait;
use huddle_core::config::EMBEDDING_DIMENSION;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Hard ceiling on text length sent to the embedding model, in characters.
pub const MAX_EMBED_CHARS: usize = 8000;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Generate an embedding for one text.
    ///
    /// Implementations receive text already normalized by
    /// [`prepare_text`]; callers should use [`embed_text`] instead of
    /// calling this directly.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Normalize and embed `text` with `provider`, enforcing dimensionality.
///
/// This is the single entry point the rest of the pipeline uses: it trims
/// and collapses whitespace, truncates to [`MAX_EMBED_CHARS`], calls the
/// provider, and fails with [`PipelineError::LengthMismatch`] if the vector
/// width is wrong.
pub async fn embed_text(provider: &dyn EmbeddingProvider, text: &str) -> Result<Vec<f32>> {
    let prepared = prepare_text(text);
    let vector = provider.embed(&prepared).await?;

    let expected = provider.dimension();
    if vector.len() != expected {
        return Err(PipelineError::LengthMismatch {
            expected,
            actual: vector.len(),
        });
    }

    Ok(vector)
}

/// Normalize text for embedding: trim, collapse internal whitespace runs to
/// a single space, truncate to [`MAX_EMBED_CHARS`] characters.
pub fn prepare_text(text: &str) -> String {
    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_EMBED_CHARS)
}

/// Truncate a string to at most `max` characters, respecting char
/// boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// OpenAI embeddings provider.
pub struct OpenAiEmbeddings {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryPolicy,
}

impl OpenAiEmbeddings {
    /// Create a new OpenAI embeddings provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "text-embedding-ada-002".to_string(),
            base_url: "https://api.openai.com".to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Create a provider from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| PipelineError::config("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key))
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the retry policy for transient provider failures.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            input: &'a str,
        }

        #[derive(Deserialize)]
        struct Response {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&Request {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::from_status(status.as_u16(), body));
        }

        let response: Response = response.json().await?;
        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| PipelineError::provider("no embedding returned"))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn dimension(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => EMBEDDING_DIMENSION,
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        with_retry(&self.retry, || self.request_embedding(text)).await
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
