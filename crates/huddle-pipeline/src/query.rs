//! Scoped retrieval queries.
//!
//! Every query carries exactly one tenant scope — a workspace or a user.
//! The scope is the security boundary between tenants, so it is enforced
//! twice: once as the index-side metadata filter and again client-side on
//! the returned records, in case the index filter is bypassed or
//! misconfigured.

use crate::embeddings::embed_text;
use crate::index::{MetadataFilter, VectorIndex};
use crate::record::{RecordKind, RecordMetadata};
use crate::{PipelineContext, PipelineError, Result};
use huddle_core::{UserId, WorkspaceId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of results when the caller does not specify a limit.
pub const DEFAULT_TOP_K: usize = 5;

/// Mandatory tenant scope for retrieval queries.
#[derive(Debug, Clone)]
pub enum ScopeFilter {
    /// General workspace search.
    Workspace(WorkspaceId),

    /// AI-agent persona search, optionally narrowed to messages or bios.
    User {
        user_id: UserId,
        message_type: Option<RecordKind>,
    },
}

impl ScopeFilter {
    /// Scope to a workspace.
    pub fn workspace(workspace_id: impl Into<WorkspaceId>) -> Self {
        Self::Workspace(workspace_id.into())
    }

    /// Scope to a user.
    pub fn user(user_id: impl Into<UserId>) -> Self {
        Self::User {
            user_id: user_id.into(),
            message_type: None,
        }
    }

    /// Scope to a user, narrowed to one record kind.
    pub fn user_records(user_id: impl Into<UserId>, kind: RecordKind) -> Self {
        Self::User {
            user_id: user_id.into(),
            message_type: Some(kind),
        }
    }

    /// The index-side metadata filter for this scope.
    pub fn to_metadata_filter(&self) -> MetadataFilter {
        match self {
            Self::Workspace(workspace_id) => {
                MetadataFilter::any().eq("workspace_id", workspace_id.as_str())
            }
            Self::User {
                user_id,
                message_type,
            } => {
                let filter = MetadataFilter::any().eq("user_id", user_id.as_str());
                match message_type {
                    Some(kind) => filter.eq("message_type", kind.to_string()),
                    None => filter,
                }
            }
        }
    }

    /// Client-side check that a returned record belongs to this scope.
    pub fn permits(&self, metadata: &RecordMetadata) -> bool {
        match self {
            Self::Workspace(workspace_id) => metadata.workspace_id == workspace_id.as_str(),
            Self::User {
                user_id,
                message_type,
            } => {
                metadata.user_id == user_id.as_str()
                    && message_type.map_or(true, |kind| metadata.message_type == kind)
            }
        }
    }
}

/// One retrieval match with its denormalized metadata.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    pub id: String,
    pub content: String,
    pub score: f32,
    pub user_id: String,
    pub timestamp: i64,
    pub context: String,
    pub message_type: RecordKind,
    pub display_name: String,
    pub email: String,
    pub photo_url: String,
}

/// Re-sort results by timestamp ascending, for chronological display.
///
/// Selection order (similarity) and display order are distinct concerns;
/// prompt builders usually want chronology.
pub fn sort_chronological(results: &mut [RetrievalResult]) {
    results.sort_by_key(|r| r.timestamp);
}

impl PipelineContext {
    /// Return the K records most similar to `text` within `scope`.
    ///
    /// A missing scope is rejected with [`PipelineError::ScopeRequired`]
    /// before any network call. Zero matches yields an empty list, not an
    /// error.
    pub async fn query_context(
        &self,
        text: &str,
        scope: Option<ScopeFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<RetrievalResult>> {
        let scope = scope.ok_or(PipelineError::ScopeRequired)?;
        let limit = limit.unwrap_or(DEFAULT_TOP_K);

        let vector = embed_text(self.embeddings.as_ref(), text).await?;
        let index = self.index_for(&scope);
        let matches = index
            .query(&vector, &scope.to_metadata_filter(), limit)
            .await?;

        // Never trust the index filter as the sole tenant boundary.
        let mut results = Vec::with_capacity(matches.len());
        for record in matches {
            if !scope.permits(&record.metadata) {
                warn!(
                    id = %record.id,
                    "index returned a record outside the query scope, dropping"
                );
                continue;
            }
            results.push(RetrievalResult {
                id: record.id,
                content: record.metadata.content,
                score: record.score,
                user_id: record.metadata.user_id,
                timestamp: record.metadata.timestamp,
                context: record.metadata.context,
                message_type: record.metadata.message_type,
                display_name: record.metadata.display_name,
                email: record.metadata.email,
                photo_url: record.metadata.photo_url,
            });
        }

        debug!(count = results.len(), "retrieval query complete");
        Ok(results)
    }

    /// Which index a scope queries.
    fn index_for(&self, scope: &ScopeFilter) -> &Arc<dyn VectorIndex> {
        match scope {
            ScopeFilter::Workspace(_) => &self.workspace_index,
            ScopeFilter::User { .. } => &self.agent_index,
        }
    }
}
