//! Message and bio ingestion.
//!
//! The entry point the real-time message-creation hook calls. Each message's
//! ingestion is independent: there is no cross-message ordering requirement,
//! and per-id upsert idempotence is the only invariant, so ingestions may
//! run concurrently without coordination.

use crate::embeddings::embed_text;
use crate::record::{EmbeddingRecord, RecordMetadata};
use crate::{PipelineContext, Result};
use chrono::Utc;
use huddle_core::{Message, UserId, UserProfile};
use tracing::{debug, warn};

impl PipelineContext {
    /// Embed and upsert one message.
    ///
    /// Returns `Ok(false)` if the message does not qualify (file message or
    /// blank content) — no embedding or upsert happens in that case. The
    /// record lands in both the workspace-search index and the agent index
    /// so workspace search and persona retrieval each see it.
    pub async fn ingest_message(&self, message: &Message) -> Result<bool> {
        if !message.is_embeddable() {
            debug!(id = %message.id, "message does not qualify for embedding, skipping");
            return Ok(false);
        }

        let profile = self.profile_for(&message.user_id).await;
        let vector = embed_text(self.embeddings.as_ref(), &message.content).await?;

        let record = EmbeddingRecord {
            id: EmbeddingRecord::message_id(message),
            vector,
            metadata: RecordMetadata::for_message(message, &profile),
        };

        self.workspace_index.upsert(record.clone()).await?;
        self.agent_index.upsert(record).await?;

        debug!(id = %message.id, "message embedded and upserted");
        Ok(true)
    }

    /// Embed and upsert one user's bio into the agent index.
    ///
    /// Returns `Ok(false)` when the profile has no bio text.
    pub async fn ingest_bio(&self, profile: &UserProfile) -> Result<bool> {
        let bio = match profile.bio.as_deref().map(str::trim) {
            Some(bio) if !bio.is_empty() => bio,
            _ => {
                debug!(user = %profile.user_id, "no bio to embed, skipping");
                return Ok(false);
            }
        };

        let vector = embed_text(self.embeddings.as_ref(), bio).await?;
        let record = EmbeddingRecord {
            id: EmbeddingRecord::bio_id(&profile.user_id),
            vector,
            metadata: RecordMetadata::for_bio(profile, bio, Utc::now().timestamp_millis()),
        };

        self.agent_index.upsert(record).await?;

        debug!(user = %profile.user_id, "bio embedded and upserted");
        Ok(true)
    }

    /// Fetch a profile for metadata denormalization.
    ///
    /// Profile data is enrichment, not a hard dependency: on fetch failure
    /// the ingestion proceeds with empty profile fields.
    pub(crate) async fn profile_for(&self, user_id: &UserId) -> UserProfile {
        match self.profiles.get_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::empty(user_id.clone()),
            Err(err) => {
                warn!(user = %user_id, error = %err, "profile fetch failed, using empty profile fields");
                UserProfile::empty(user_id.clone())
            }
        }
    }
}
