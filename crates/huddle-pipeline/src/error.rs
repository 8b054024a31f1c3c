//! Pipeline error types.

use thiserror::Error;

/// Errors that can occur in the embedding/retrieval pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The embedding provider returned a vector of the wrong
    /// dimensionality. Fatal for the item; never retried, never upserted.
    #[error("Embedding length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Rate limit exceeded at the embedding provider.
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Server-side error from an upstream service.
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-transient embedding provider failure (bad request, auth).
    #[error("Embedding provider error: {0}")]
    Provider(String),

    /// Vector index write failed.
    #[error("Upsert failed: {0}")]
    Upsert(String),

    /// A retrieval query was attempted without a workspace or user scope.
    /// Rejected before any network call; unscoped queries would leak
    /// cross-tenant data.
    #[error("Scope filter required: queries must be scoped to a workspace or user")]
    ScopeRequired,

    /// Profile fetch failed. Non-fatal at ingestion: the record proceeds
    /// with empty profile fields.
    #[error("Profile fetch failed: {0}")]
    Profile(String),

    /// Chat data store read failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Create a rate limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit(message.into())
    }

    /// Create a server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Create an upsert error.
    pub fn upsert(message: impl Into<String>) -> Self {
        Self::Upsert(message.into())
    }

    /// Create a profile fetch error.
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile(message.into())
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Map an upstream HTTP status and body to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if status == 429 {
            Self::RateLimit(body)
        } else if status >= 500 {
            Self::Server {
                status,
                message: body,
            }
        } else {
            Self::Provider(format!("HTTP {}: {}", status, body))
        }
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit(_) | Self::Server { .. } | Self::Network(_)
        )
    }
}
