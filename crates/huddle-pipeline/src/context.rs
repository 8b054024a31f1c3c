//! Pipeline wiring.
//!
//! A [`PipelineContext`] is constructed once at process start and passed to
//! everything that needs the pipeline — no module-level client singletons.
//! Every external service sits behind a trait object so tests can inject
//! fakes.

use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use crate::persona::CompletionProvider;
use crate::stores::{MessageStore, ProfileStore};
use crate::{PipelineError, Result};
use std::sync::Arc;

/// Default bound on concurrent items during bulk migration.
pub const DEFAULT_MIGRATION_CONCURRENCY: usize = 4;

/// Dependency bundle for the embedding/retrieval pipeline.
pub struct PipelineContext {
    pub(crate) embeddings: Arc<dyn EmbeddingProvider>,
    pub(crate) workspace_index: Arc<dyn VectorIndex>,
    pub(crate) agent_index: Arc<dyn VectorIndex>,
    pub(crate) messages: Arc<dyn MessageStore>,
    pub(crate) profiles: Arc<dyn ProfileStore>,
    pub(crate) completions: Arc<dyn CompletionProvider>,
    pub(crate) migration_concurrency: usize,
}

impl PipelineContext {
    /// Start building a context.
    pub fn builder() -> PipelineContextBuilder {
        PipelineContextBuilder::default()
    }

    /// The workspace-search index.
    pub fn workspace_index(&self) -> &Arc<dyn VectorIndex> {
        &self.workspace_index
    }

    /// The AI-agent index.
    pub fn agent_index(&self) -> &Arc<dyn VectorIndex> {
        &self.agent_index
    }
}

/// Builder for [`PipelineContext`].
#[derive(Default)]
pub struct PipelineContextBuilder {
    embeddings: Option<Arc<dyn EmbeddingProvider>>,
    workspace_index: Option<Arc<dyn VectorIndex>>,
    agent_index: Option<Arc<dyn VectorIndex>>,
    messages: Option<Arc<dyn MessageStore>>,
    profiles: Option<Arc<dyn ProfileStore>>,
    completions: Option<Arc<dyn CompletionProvider>>,
    migration_concurrency: usize,
}

impl PipelineContextBuilder {
    /// Set the embedding provider.
    pub fn embeddings(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embeddings = Some(provider);
        self
    }

    /// Set the workspace-search index.
    pub fn workspace_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.workspace_index = Some(index);
        self
    }

    /// Set the AI-agent index.
    pub fn agent_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.agent_index = Some(index);
        self
    }

    /// Set the message store.
    pub fn messages(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.messages = Some(store);
        self
    }

    /// Set the profile store.
    pub fn profiles(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(store);
        self
    }

    /// Set the completion provider used for persona summaries.
    pub fn completions(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completions = Some(provider);
        self
    }

    /// Bound concurrent items during bulk migration.
    pub fn migration_concurrency(mut self, concurrency: usize) -> Self {
        self.migration_concurrency = concurrency;
        self
    }

    /// Build the context, failing if a dependency is missing.
    pub fn build(self) -> Result<PipelineContext> {
        Ok(PipelineContext {
            embeddings: self
                .embeddings
                .ok_or_else(|| PipelineError::config("embedding provider not set"))?,
            workspace_index: self
                .workspace_index
                .ok_or_else(|| PipelineError::config("workspace index not set"))?,
            agent_index: self
                .agent_index
                .ok_or_else(|| PipelineError::config("agent index not set"))?,
            messages: self
                .messages
                .ok_or_else(|| PipelineError::config("message store not set"))?,
            profiles: self
                .profiles
                .ok_or_else(|| PipelineError::config("profile store not set"))?,
            completions: self
                .completions
                .ok_or_else(|| PipelineError::config("completion provider not set"))?,
            migration_concurrency: if self.migration_concurrency == 0 {
                DEFAULT_MIGRATION_CONCURRENCY
            } else {
                self.migration_concurrency
            },
        })
    }
}
