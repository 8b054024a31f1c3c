//! Firebase Realtime Database store client.
//!
//! Read-only REST access to the chat application's data tree:
//!
//! ```text
//! /workspaces/<ws>/channels/<ch>/messages/<id>
//! /workspaces/<ws>/channels/<ch>/threads/<t>/messages/<id>
//! /users/<uid>
//! ```
//!
//! Key enumeration uses `shallow=true` so listing a workspace does not pull
//! every message body over the wire.

use crate::stores::{MessageStore, ProfileStore};
use crate::{PipelineError, Result};
use async_trait::async_trait;
use huddle_core::{ChannelId, Message, ThreadId, UserId, UserProfile, WorkspaceId};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Firebase RTDB REST client implementing the chat store traits.
pub struct FirebaseStore {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    /// Create a client for a database root URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    /// Set the database auth token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    async fn get_node<T: DeserializeOwned>(&self, path: &str, shallow: bool) -> Result<Option<T>> {
        let mut request = self.client.get(format!("{}/{}.json", self.base_url, path));
        if shallow {
            request = request.query(&[("shallow", "true")]);
        }
        if let Some(token) = &self.auth_token {
            request = request.query(&[("auth", token.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::store(format!(
                "GET {} failed with HTTP {}: {}",
                path,
                status.as_u16(),
                body
            )));
        }

        // Firebase returns literal `null` for absent nodes.
        let value: Value = response.json().await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// List the child keys of a node.
    async fn list_keys(&self, path: &str) -> Result<Vec<String>> {
        let node: Option<BTreeMap<String, Value>> = self.get_node(path, true).await?;
        Ok(node.map(|map| map.into_keys().collect()).unwrap_or_default())
    }

    /// Read a node of keyed children into values, injecting the key as the
    /// child's `id` field when the stored document omits it.
    async fn list_children<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let node: Option<BTreeMap<String, Value>> = self.get_node(path, false).await?;
        let Some(node) = node else {
            return Ok(Vec::new());
        };

        let mut items = Vec::with_capacity(node.len());
        for (key, mut value) in node {
            if let Value::Object(map) = &mut value {
                map.entry("id").or_insert_with(|| Value::String(key.clone()));
                for (field, field_value) in extra {
                    map.entry(*field)
                        .or_insert_with(|| Value::String(field_value.to_string()));
                }
            }
            items.push(serde_json::from_value(value)?);
        }
        Ok(items)
    }
}

#[async_trait]
impl MessageStore for FirebaseStore {
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceId>> {
        Ok(self
            .list_keys("workspaces")
            .await?
            .into_iter()
            .map(WorkspaceId::new)
            .collect())
    }

    async fn list_channels(&self, workspace: &WorkspaceId) -> Result<Vec<ChannelId>> {
        Ok(self
            .list_keys(&format!("workspaces/{}/channels", workspace))
            .await?
            .into_iter()
            .map(ChannelId::new)
            .collect())
    }

    async fn list_messages(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
    ) -> Result<Vec<Message>> {
        self.list_children(
            &format!("workspaces/{}/channels/{}/messages", workspace, channel),
            &[
                ("workspaceId", workspace.as_str()),
                ("channelId", channel.as_str()),
            ],
        )
        .await
    }

    async fn list_threads(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
    ) -> Result<Vec<ThreadId>> {
        Ok(self
            .list_keys(&format!("workspaces/{}/channels/{}/threads", workspace, channel))
            .await?
            .into_iter()
            .map(ThreadId::new)
            .collect())
    }

    async fn list_thread_messages(
        &self,
        workspace: &WorkspaceId,
        channel: &ChannelId,
        thread: &ThreadId,
    ) -> Result<Vec<Message>> {
        self.list_children(
            &format!(
                "workspaces/{}/channels/{}/threads/{}/messages",
                workspace, channel, thread
            ),
            &[
                ("workspaceId", workspace.as_str()),
                ("channelId", channel.as_str()),
                ("threadId", thread.as_str()),
            ],
        )
        .await
    }

    async fn list_users(&self) -> Result<Vec<UserId>> {
        Ok(self
            .list_keys("users")
            .await?
            .into_iter()
            .map(UserId::new)
            .collect())
    }
}

#[async_trait]
impl ProfileStore for FirebaseStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        let mut node: Option<Value> = self.get_node(&format!("users/{}", user_id), false).await?;
        if let Some(Value::Object(map)) = &mut node {
            map.entry("userId")
                .or_insert_with(|| Value::String(user_id.to_string()));
        }
        match node {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}
