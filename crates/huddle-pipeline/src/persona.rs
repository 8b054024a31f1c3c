//! AI-agent persona summaries.
//!
//! A downstream consumer of retrieval: the user's embedded messages and bio
//! are pulled from the agent index and composed into a summarization prompt
//! for the chat model.

use crate::query::{sort_chronological, RetrievalResult, ScopeFilter};
use crate::{PipelineContext, PipelineError, Result};
use async_trait::async_trait;
use huddle_core::UserId;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How many records are pulled into a persona summary.
pub const PERSONA_TOP_K: usize = 10;

/// Retrieval query text for persona context.
const PERSONA_QUERY: &str = "who this user is, how they communicate, and what they work on";

/// Trait for chat-completion providers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for a prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// OpenAI chat-completions provider.
pub struct OpenAiCompletions {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiCompletions {
    /// Create a new provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletions {
    async fn complete(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<RequestMessage<'a>>,
        }

        #[derive(Serialize)]
        struct RequestMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            content: String,
        }

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&Request {
                model: &self.model,
                messages: vec![RequestMessage {
                    role: "user",
                    content: prompt,
                }],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::from_status(status.as_u16(), body));
        }

        let response: Response = response.json().await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PipelineError::provider("no completion returned"))
    }
}

impl PipelineContext {
    /// Summarize a user from their embedded messages and bio.
    ///
    /// Retrieval failures degrade to a no-context prompt rather than failing
    /// the request; the prompt then says so explicitly instead of letting
    /// the model fabricate.
    pub async fn generate_persona_summary(&self, user_id: &UserId) -> Result<String> {
        let scope = ScopeFilter::user(user_id.clone());
        let mut results = match self
            .query_context(PERSONA_QUERY, Some(scope), Some(PERSONA_TOP_K))
            .await
        {
            Ok(results) => results,
            Err(err) => {
                warn!(user = %user_id, error = %err, "persona retrieval failed, proceeding without context");
                Vec::new()
            }
        };

        // Chronological reads better than similarity order in a summary.
        sort_chronological(&mut results);

        let prompt = persona_prompt(user_id, &results);
        self.completions.complete(&prompt).await
    }
}

/// Build the persona summarization prompt.
pub fn persona_prompt(user_id: &UserId, results: &[RetrievalResult]) -> String {
    let mut prompt = format!(
        "Summarize user {} based on their chat history and bio below. \
         Describe their interests, tone, and typical topics in a short paragraph.\n\n",
        user_id
    );

    if results.is_empty() {
        prompt.push_str(
            "No workspace context is available for this user. Say so plainly; \
             do not invent details.\n",
        );
        return prompt;
    }

    for result in results {
        prompt.push_str(&format!("[{}] {}\n", result.context, result.content));
    }
    prompt
}
