//! Shared fixtures for Huddle integration tests.

use async_trait::async_trait;
use huddle_core::{ChannelId, Message, MessageType, ThreadId, UserId, UserProfile, WorkspaceId};
use huddle_pipeline::{
    EmbeddingProvider, MemoryVectorIndex, MessageStore, PipelineContext, PipelineError,
    ProfileStore, Result,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Deterministic embedder for tests: vectors derived from the text bytes,
/// no network.
pub struct StubEmbedder;

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    fn dimension(&self) -> usize {
        4
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let sum: u32 = text.bytes().map(u32::from).sum();
        Ok(vec![
            1.0,
            (sum % 89) as f32 / 89.0,
            (text.len() % 23) as f32 / 23.0,
            0.5,
        ])
    }
}

/// Completion provider that echoes its prompt, so tests can assert on the
/// composed prompt text.
pub struct EchoCompletions;

#[async_trait]
impl huddle_pipeline::persona::CompletionProvider for EchoCompletions {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

/// In-memory chat data store seeded by tests.
#[derive(Default)]
pub struct SeededChatStore {
    pub messages: Vec<Message>,
    pub profiles: HashMap<String, UserProfile>,
}

impl SeededChatStore {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            profiles: HashMap::new(),
        }
    }

    pub fn add_profile(&mut self, profile: UserProfile) {
        self.profiles.insert(profile.user_id.to_string(), profile);
    }
}

#[async_trait]
impl MessageStore for SeededChatStore {
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceId>> {
        let mut workspaces: Vec<WorkspaceId> = Vec::new();
        for message in &self.messages {
            if !workspaces.contains(&message.workspace_id) {
                workspaces.push(message.workspace_id.clone());
            }
        }
        Ok(workspaces)
    }

    async fn list_channels(&self, workspace: &WorkspaceId) -> Result<Vec<ChannelId>> {
        let mut channels: Vec<ChannelId> = Vec::new();
        for message in &self.messages {
            if &message.workspace_id == workspace && !channels.contains(&message.channel_id) {
                channels.push(message.channel_id.clone());
            }
        }
        Ok(channels)
    }

    async fn list_messages(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
    ) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .iter()
            .filter(|m| {
                &m.workspace_id == workspace
                    && &m.channel_id == channel
                    && m.thread_id.is_none()
            })
            .cloned()
            .collect())
    }

    async fn list_threads(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
    ) -> Result<Vec<ThreadId>> {
        let mut threads: Vec<ThreadId> = Vec::new();
        for message in &self.messages {
            if &message.workspace_id == workspace && &message.channel_id == channel {
                if let Some(thread) = &message.thread_id {
                    if !threads.contains(thread) {
                        threads.push(thread.clone());
                    }
                }
            }
        }
        Ok(threads)
    }

    async fn list_thread_messages(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
        thread: &ThreadId,
    ) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .iter()
            .filter(|m| {
                &m.workspace_id == workspace
                    && &m.channel_id == channel
                    && m.thread_id.as_ref() == Some(thread)
            })
            .cloned()
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<UserId>> {
        Ok(self
            .profiles
            .keys()
            .map(|id| UserId::new(id.as_str()))
            .collect())
    }
}

#[async_trait]
impl ProfileStore for SeededChatStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        if user_id.as_str() == "broken-profile" {
            return Err(PipelineError::profile("injected failure"));
        }
        Ok(self.profiles.get(user_id.as_str()).cloned())
    }
}

/// Build a full pipeline over in-memory fakes.
pub fn test_pipeline(store: SeededChatStore) -> PipelineContext {
    let store = Arc::new(store);
    PipelineContext::builder()
        .embeddings(Arc::new(StubEmbedder))
        .workspace_index(Arc::new(MemoryVectorIndex::new()))
        .agent_index(Arc::new(MemoryVectorIndex::new()))
        .messages(store.clone())
        .profiles(store)
        .completions(Arc::new(EchoCompletions))
        .migration_concurrency(2)
        .build()
        .expect("all fakes provided")
}

/// A plain text message.
pub fn message(id: &str, ws: &str, ch: &str, user: &str, content: &str, ts: i64) -> Message {
    Message {
        id: id.into(),
        workspace_id: ws.into(),
        channel_id: ch.into(),
        thread_id: None,
        parent_id: None,
        content: content.to_string(),
        user_id: user.into(),
        message_type: MessageType::Text,
        timestamp: ts,
        reply_count: None,
    }
}

/// A profile with a bio.
pub fn profile_with_bio(user: &str, name: &str, bio: &str) -> UserProfile {
    UserProfile {
        user_id: user.into(),
        display_name: name.to_string(),
        email: format!("{}@example.com", user),
        photo_url: String::new(),
        bio: Some(bio.to_string()),
        role: None,
        status: None,
        last_seen: None,
    }
}
