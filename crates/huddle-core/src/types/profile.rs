//! User profile types.

use super::UserId;
use serde::{Deserialize, Serialize};

/// A user profile as stored by the chat system.
///
/// Profiles are denormalized into vector metadata at embedding time, so a
/// later profile edit does not update previously embedded records until a
/// migration is re-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID.
    pub user_id: UserId,

    /// Display name shown in the chat UI.
    #[serde(default)]
    pub display_name: String,

    /// Email address.
    #[serde(default)]
    pub email: String,

    /// Avatar URL.
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,

    /// Free-text bio, if the user wrote one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Workspace role, if assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Presence status string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Last-seen time, milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
}

impl UserProfile {
    /// A profile with every enrichment field empty.
    ///
    /// Used when a profile fetch fails during ingestion: profile fields are
    /// enrichment, not a hard dependency.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: String::new(),
            email: String::new(),
            photo_url: String::new(),
            bio: None,
            role: None,
            status: None,
            last_seen: None,
        }
    }
}
