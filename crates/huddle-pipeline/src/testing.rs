//! Shared test doubles for pipeline unit tests.

use crate::embeddings::EmbeddingProvider;
use crate::persona::CompletionProvider;
use crate::stores::{MessageStore, ProfileStore};
use crate::{MemoryVectorIndex, PipelineContext, PipelineError, Result};
use async_trait::async_trait;
use huddle_core::{ChannelId, Message, ThreadId, UserId, UserProfile, WorkspaceId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Deterministic embedder: no network, vectors derived from the text bytes.
pub struct FakeEmbedder {
    dimension: usize,
    fail_substring: Option<String>,
    /// Last text passed to `embed`, for asserting preprocessing.
    pub last_text: Mutex<Option<String>>,
}

impl FakeEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: 4,
            fail_substring: None,
            last_text: Mutex::new(None),
        }
    }

    /// Fail any embed call whose text contains `needle`.
    pub fn failing_on(needle: impl Into<String>) -> Self {
        Self {
            fail_substring: Some(needle.into()),
            ..Self::new()
        }
    }

    /// The vector this embedder produces for `text`.
    pub fn vector_for(text: &str) -> Vec<f32> {
        let sum: u32 = text.bytes().map(u32::from).sum();
        vec![
            1.0,
            (sum % 97) as f32 / 97.0,
            (text.len() % 31) as f32 / 31.0,
            ((sum / 7) % 13) as f32 / 13.0,
        ]
    }
}

impl Default for FakeEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(needle) = &self.fail_substring {
            if text.contains(needle.as_str()) {
                return Err(PipelineError::provider(format!(
                    "injected failure for text containing '{}'",
                    needle
                )));
            }
        }
        *self.last_text.lock().unwrap() = Some(text.to_string());
        Ok(Self::vector_for(text))
    }
}

/// Canned completion provider.
#[derive(Default)]
pub struct CannedCompletions {
    /// Prompts received, for assertions.
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionProvider for CannedCompletions {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("canned summary".to_string())
    }
}

/// In-memory chat-data fixture implementing both store traits.
#[derive(Default)]
pub struct FixtureStore {
    workspaces: Vec<WorkspaceId>,
    channels: HashMap<String, Vec<ChannelId>>,
    messages: HashMap<String, Vec<Message>>,
    threads: HashMap<String, Vec<ThreadId>>,
    thread_messages: HashMap<String, Vec<Message>>,
    users: Vec<UserId>,
    profiles: HashMap<String, UserProfile>,
    failing_profiles: HashSet<String>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel_key(ws: &WorkspaceId, ch: &ChannelId) -> String {
        format!("{}/{}", ws, ch)
    }

    fn thread_key(ws: &WorkspaceId, ch: &ChannelId, t: &ThreadId) -> String {
        format!("{}/{}/{}", ws, ch, t)
    }

    /// Add a message, registering its workspace and channel.
    pub fn push_message(&mut self, message: Message) {
        if !self.workspaces.contains(&message.workspace_id) {
            self.workspaces.push(message.workspace_id.clone());
        }
        let channels = self
            .channels
            .entry(message.workspace_id.to_string())
            .or_default();
        if !channels.contains(&message.channel_id) {
            channels.push(message.channel_id.clone());
        }

        match &message.thread_id {
            Some(thread) => {
                let key = Self::channel_key(&message.workspace_id, &message.channel_id);
                let threads = self.threads.entry(key).or_default();
                if !threads.contains(thread) {
                    threads.push(thread.clone());
                }
                let key =
                    Self::thread_key(&message.workspace_id, &message.channel_id, thread);
                self.thread_messages.entry(key).or_default().push(message);
            }
            None => {
                let key = Self::channel_key(&message.workspace_id, &message.channel_id);
                self.messages.entry(key).or_default().push(message);
            }
        }
    }

    /// Add a user profile.
    pub fn push_profile(&mut self, profile: UserProfile) {
        if !self.users.contains(&profile.user_id) {
            self.users.push(profile.user_id.clone());
        }
        self.profiles.insert(profile.user_id.to_string(), profile);
    }

    /// Make `get_profile` fail for this user.
    pub fn fail_profile_for(&mut self, user_id: impl Into<UserId>) {
        let user_id = user_id.into();
        if !self.users.contains(&user_id) {
            self.users.push(user_id.clone());
        }
        self.failing_profiles.insert(user_id.to_string());
    }
}

#[async_trait]
impl MessageStore for FixtureStore {
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceId>> {
        Ok(self.workspaces.clone())
    }

    async fn list_channels(&self, workspace: &WorkspaceId) -> Result<Vec<ChannelId>> {
        Ok(self
            .channels
            .get(workspace.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn list_messages(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
    ) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .get(&Self::channel_key(workspace, channel))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_threads(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
    ) -> Result<Vec<ThreadId>> {
        Ok(self
            .threads
            .get(&Self::channel_key(workspace, channel))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_thread_messages(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
        thread: &ThreadId,
    ) -> Result<Vec<Message>> {
        Ok(self
            .thread_messages
            .get(&Self::thread_key(workspace, channel, thread))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_users(&self) -> Result<Vec<UserId>> {
        Ok(self.users.clone())
    }
}

#[async_trait]
impl ProfileStore for FixtureStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        if self.failing_profiles.contains(user_id.as_str()) {
            return Err(PipelineError::profile(format!(
                "injected profile failure for {}",
                user_id
            )));
        }
        Ok(self.profiles.get(user_id.as_str()).cloned())
    }
}

/// Build a context over in-memory fakes.
pub fn context_with(store: FixtureStore) -> PipelineContext {
    let store = Arc::new(store);
    PipelineContext::builder()
        .embeddings(Arc::new(FakeEmbedder::new()))
        .workspace_index(Arc::new(MemoryVectorIndex::new()))
        .agent_index(Arc::new(MemoryVectorIndex::new()))
        .messages(store.clone())
        .profiles(store)
        .completions(Arc::new(CannedCompletions::default()))
        .build()
        .expect("all fakes provided")
}

/// Build a context with a specific embedder, kept shareable so tests can
/// inspect it afterwards.
pub fn context_with_embedder(store: FixtureStore, embedder: Arc<FakeEmbedder>) -> PipelineContext {
    let store = Arc::new(store);
    PipelineContext::builder()
        .embeddings(embedder)
        .workspace_index(Arc::new(MemoryVectorIndex::new()))
        .agent_index(Arc::new(MemoryVectorIndex::new()))
        .messages(store.clone())
        .profiles(store)
        .completions(Arc::new(CannedCompletions::default()))
        .build()
        .expect("all fakes provided")
}

/// A plain text message fixture.
pub fn text_message(id: &str, ws: &str, ch: &str, user: &str, content: &str, ts: i64) -> Message {
    Message {
        id: id.into(),
        workspace_id: ws.into(),
        channel_id: ch.into(),
        thread_id: None,
        parent_id: None,
        content: content.to_string(),
        user_id: user.into(),
        message_type: huddle_core::MessageType::Text,
        timestamp: ts,
        reply_count: None,
    }
}
