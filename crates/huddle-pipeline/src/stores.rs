//! External chat-data collaborators.
//!
//! The pipeline does not own messages or profiles; it reads them from the
//! chat system's store of record through these traits.

use crate::Result;
use async_trait::async_trait;
use huddle_core::{ChannelId, Message, ThreadId, UserId, UserProfile, WorkspaceId};

/// Read access to the chat system's message hierarchy.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// All workspace ids.
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceId>>;

    /// All channel ids in a workspace.
    async fn list_channels(&self, workspace: &WorkspaceId) -> Result<Vec<ChannelId>>;

    /// All top-level messages in a channel.
    async fn list_messages(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
    ) -> Result<Vec<Message>>;

    /// All thread ids in a channel.
    async fn list_threads(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
    ) -> Result<Vec<ThreadId>>;

    /// All messages in a thread.
    async fn list_thread_messages(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
        thread: &ThreadId,
    ) -> Result<Vec<Message>>;

    /// All user ids known to the chat system.
    async fn list_users(&self) -> Result<Vec<UserId>>;
}

/// Read access to user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a user's profile, or `None` if the user has none.
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>>;
}
