//! Embedding records and their flat metadata.
//!
//! An [`EmbeddingRecord`] is the stored unit in the vector index: an id, a
//! vector, and flat metadata. The id is derived from the source message or
//! bio, which makes upsert the natural dedup mechanism — one record per
//! source id, last write wins.

use crate::embeddings::truncate_chars;
use crate::{PipelineError, Result};
use huddle_core::{ChannelId, Message, ThreadId, UserProfile, WorkspaceId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Maximum length of the `content` preview stored in metadata, in
/// characters. Independent of (and shorter than) the embedding truncation
/// limit.
pub const MAX_METADATA_CONTENT_CHARS: usize = 1000;

/// Id prefix for bio records, keeping them disjoint from message ids.
const BIO_ID_PREFIX: &str = "bio-";

/// Source tag written into every record's metadata.
const SOURCE_TAG: &str = "huddle";

/// What a record was embedded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// A chat message.
    Message,

    /// A user's profile bio.
    Bio,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Message => f.write_str("message"),
            RecordKind::Bio => f.write_str("bio"),
        }
    }
}

/// Flat metadata stored alongside each vector.
///
/// The underlying index does not support nested metadata, so every field is
/// a string or number. Profile fields are denormalized at embedding time to
/// avoid a join at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Author (or bio owner) user id.
    pub user_id: String,

    /// Content preview, truncated to [`MAX_METADATA_CONTENT_CHARS`].
    pub content: String,

    /// Source timestamp, milliseconds since the Unix epoch.
    pub timestamp: i64,

    /// Human-readable locator: `workspace:<id>/channel:<id>[/thread:<id>]`
    /// or `bio`.
    pub context: String,

    /// Record discriminator (`message` | `bio`).
    pub message_type: RecordKind,

    /// Workspace id, empty for bio records.
    #[serde(default)]
    pub workspace_id: String,

    /// Channel id, empty for bio records.
    #[serde(default)]
    pub channel_id: String,

    /// Denormalized profile: display name.
    #[serde(default)]
    pub display_name: String,

    /// Denormalized profile: email.
    #[serde(default)]
    pub email: String,

    /// Denormalized profile: avatar URL.
    #[serde(default)]
    pub photo_url: String,

    /// Which system wrote the record.
    #[serde(default)]
    pub source: String,
}

impl RecordMetadata {
    /// Build metadata for a chat message.
    pub fn for_message(message: &Message, profile: &UserProfile) -> Self {
        Self {
            user_id: message.user_id.to_string(),
            content: truncate_chars(message.content.trim(), MAX_METADATA_CONTENT_CHARS),
            timestamp: message.timestamp,
            context: context_string(
                &message.workspace_id,
                &message.channel_id,
                message.thread_id.as_ref(),
            ),
            message_type: RecordKind::Message,
            workspace_id: message.workspace_id.to_string(),
            channel_id: message.channel_id.to_string(),
            display_name: profile.display_name.clone(),
            email: profile.email.clone(),
            photo_url: profile.photo_url.clone(),
            source: SOURCE_TAG.to_string(),
        }
    }

    /// Build metadata for a user's bio.
    pub fn for_bio(profile: &UserProfile, bio: &str, timestamp: i64) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            content: truncate_chars(bio.trim(), MAX_METADATA_CONTENT_CHARS),
            timestamp,
            context: "bio".to_string(),
            message_type: RecordKind::Bio,
            workspace_id: String::new(),
            channel_id: String::new(),
            display_name: profile.display_name.clone(),
            email: profile.email.clone(),
            photo_url: profile.photo_url.clone(),
            source: SOURCE_TAG.to_string(),
        }
    }

    /// Serialize to a flat JSON object, rejecting any non-scalar value.
    ///
    /// This is the boundary check the index write goes through: nested
    /// metadata would be silently mangled by the index, so it is an error
    /// here.
    pub fn to_flat_map(&self) -> Result<serde_json::Map<String, Value>> {
        let value = serde_json::to_value(self)?;
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(PipelineError::upsert(format!(
                    "metadata serialized to non-object: {}",
                    other
                )))
            }
        };

        for (key, value) in &map {
            if !matches!(value, Value::String(_) | Value::Number(_)) {
                return Err(PipelineError::upsert(format!(
                    "metadata field '{}' is not a flat string/number value",
                    key
                )));
            }
        }

        Ok(map)
    }

    /// The value of a metadata field as a string, for filter matching.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "user_id" => Some(self.user_id.clone()),
            "workspace_id" => Some(self.workspace_id.clone()),
            "channel_id" => Some(self.channel_id.clone()),
            "message_type" => Some(self.message_type.to_string()),
            "context" => Some(self.context.clone()),
            "source" => Some(self.source.clone()),
            _ => None,
        }
    }
}

/// The stored unit in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Stable id, derived from the source message or bio.
    pub id: String,

    /// Embedding vector.
    pub vector: Vec<f32>,

    /// Flat metadata.
    pub metadata: RecordMetadata,
}

impl EmbeddingRecord {
    /// Record id for a message: the message's own id (unique by
    /// construction).
    pub fn message_id(message: &Message) -> String {
        message.id.to_string()
    }

    /// Record id for a user's bio.
    pub fn bio_id(user_id: &huddle_core::UserId) -> String {
        format!("{}{}", BIO_ID_PREFIX, user_id)
    }
}

/// Build the context locator string for a message position.
pub fn context_string(
    workspace_id: &WorkspaceId,
    channel_id: &ChannelId,
    thread_id: Option<&ThreadId>,
) -> String {
    match thread_id {
        Some(thread) => format!(
            "workspace:{}/channel:{}/thread:{}",
            workspace_id, channel_id, thread
        ),
        None => format!("workspace:{}/channel:{}", workspace_id, channel_id),
    }
}
