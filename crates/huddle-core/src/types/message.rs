//! Chat message types.
//!
//! Messages are owned by the chat system's store of record; this crate only
//! reads them. Field names serialize as camelCase to match the chat
//! application's JSON documents.

use super::{ChannelId, MessageId, ThreadId, UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

/// A chat message as stored by the chat system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID (unique across the system).
    pub id: MessageId,

    /// Workspace the message belongs to.
    pub workspace_id: WorkspaceId,

    /// Channel the message was posted in.
    pub channel_id: ChannelId,

    /// Thread the message belongs to, if it is a thread reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ThreadId>,

    /// Parent message id, for thread replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MessageId>,

    /// Text content (empty for file messages).
    #[serde(default)]
    pub content: String,

    /// Author.
    pub user_id: UserId,

    /// Message kind.
    #[serde(rename = "type", default)]
    pub message_type: MessageType,

    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,

    /// Number of thread replies, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u32>,
}

impl Message {
    /// Whether this message qualifies for embedding.
    ///
    /// Only text messages with non-blank content are embedded. File messages
    /// and typing-indicator pseudo-messages never are.
    pub fn is_embeddable(&self) -> bool {
        self.message_type == MessageType::Text && !self.content.trim().is_empty()
    }
}

/// Kind of chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Plain text message.
    #[default]
    Text,

    /// File attachment message.
    File,

    /// Anything else the chat system emits (typing indicators, system
    /// notices). Never embedded.
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_message(content: &str) -> Message {
        Message {
            id: MessageId::new("m1"),
            workspace_id: WorkspaceId::new("W1"),
            channel_id: ChannelId::new("C1"),
            thread_id: None,
            parent_id: None,
            content: content.to_string(),
            user_id: UserId::new("u1"),
            message_type: MessageType::Text,
            timestamp: 1000,
            reply_count: None,
        }
    }

    #[test]
    fn test_embeddable() {
        assert!(text_message("hello").is_embeddable());
        assert!(!text_message("").is_embeddable());
        assert!(!text_message("   \n\t").is_embeddable());

        let mut file = text_message("photo.png");
        file.message_type = MessageType::File;
        assert!(!file.is_embeddable());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "m1",
            "workspaceId": "W1",
            "channelId": "C1",
            "content": "hello world",
            "userId": "u1",
            "type": "text",
            "timestamp": 1000
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.workspace_id.as_str(), "W1");
        assert_eq!(msg.message_type, MessageType::Text);
        assert!(msg.thread_id.is_none());
    }

    #[test]
    fn test_unknown_type_is_other() {
        let json = r#"{
            "id": "m2",
            "workspaceId": "W1",
            "channelId": "C1",
            "content": "",
            "userId": "u1",
            "type": "typing",
            "timestamp": 2000
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.message_type, MessageType::Other);
        assert!(!msg.is_embeddable());
    }
}
