//! Strongly-typed identifiers.
//!
//! All ids are opaque strings assigned by the chat system's store of record;
//! the newtypes exist so a channel id can never be passed where a workspace
//! id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id! {
    /// Workspace identifier.
    WorkspaceId
}

string_id! {
    /// Channel identifier (unique within a workspace).
    ChannelId
}

string_id! {
    /// Thread identifier (unique within a channel).
    ThreadId
}

string_id! {
    /// Message identifier.
    MessageId
}

string_id! {
    /// User identifier.
    UserId
}
