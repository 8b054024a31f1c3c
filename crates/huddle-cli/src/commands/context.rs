//! Wiring from configuration to a live pipeline context.

use huddle_core::Config;
use huddle_pipeline::firebase::FirebaseStore;
use huddle_pipeline::persona::OpenAiCompletions;
use huddle_pipeline::pinecone::PineconeIndex;
use huddle_pipeline::{OpenAiEmbeddings, PipelineContext, RetryPolicy};
use std::sync::Arc;

/// Build a [`PipelineContext`] over the production services named in
/// `config`.
pub fn build(config: &Config) -> anyhow::Result<PipelineContext> {
    let retry = RetryPolicy::from(&config.retry);

    let mut embeddings = OpenAiEmbeddings::new(config.embedding.api_key.expose_secret())
        .with_model(config.embedding.model.as_str())
        .with_retry(retry);
    if let Some(base_url) = &config.embedding.base_url {
        embeddings = embeddings.with_base_url(base_url.as_str());
    }

    let index_key = config.index.api_key.expose_secret();
    let workspace_index = PineconeIndex::new(index_key, config.index.workspace_host.as_str());
    let agent_index = PineconeIndex::new(index_key, config.index.agent_host.as_str());

    let mut firebase = FirebaseStore::new(config.firebase.database_url.as_str());
    if let Some(token) = &config.firebase.auth_token {
        firebase = firebase.with_auth_token(token.expose_secret());
    }
    let firebase = Arc::new(firebase);

    let completions = OpenAiCompletions::new(config.embedding.api_key.expose_secret());

    let context = PipelineContext::builder()
        .embeddings(Arc::new(embeddings))
        .workspace_index(Arc::new(workspace_index))
        .agent_index(Arc::new(agent_index))
        .messages(firebase.clone())
        .profiles(firebase)
        .completions(Arc::new(completions))
        .migration_concurrency(config.migration.concurrency)
        .build()?;

    Ok(context)
}
