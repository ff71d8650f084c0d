use serde::Deserialize;
use tracing::debug;

use parley_core::types::Turn;

use crate::error::Result;

/// Model used when no override is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Token ceiling applied to every request regardless of model. Replies are
/// rendered into an embed description, which holds 4096 characters — roughly
/// four characters per token.
const MAX_TOKENS: u32 = 1024;

/// Stateless chat-completions request builder.
///
/// `complete` returns the raw response handle; interpreting the body is the
/// caller's job (via [`CompletionResponse`]), so a malformed upstream body
/// surfaces as an accessor error at the call site rather than a typed
/// failure here.
pub struct CompletionClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    system_prompt: Option<String>,
    base_url: String,
}

impl CompletionClient {
    pub fn new(
        api_key: String,
        model: String,
        system_prompt: Option<String>,
        base_url: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            system_prompt,
            base_url,
        }
    }

    /// Issue a single completion request for the given conversation.
    ///
    /// `user` is the caller identity forwarded upstream for abuse tracking.
    /// The configured system prompt, when non-blank, is injected at the front
    /// of the sequence sent — the caller's `context` is never mutated.
    pub async fn complete(&self, user: &str, context: &[Turn]) -> Result<reqwest::Response> {
        let body = self.build_request_body(user, context);
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!(model = %self.effective_model(), turns = context.len(), "sending completion request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        Ok(resp)
    }

    fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            DEFAULT_MODEL
        } else {
            &self.model
        }
    }

    fn build_request_body(&self, user: &str, context: &[Turn]) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = Vec::with_capacity(context.len() + 1);

        if let Some(system) = self.system_prompt.as_deref() {
            if !system.trim().is_empty() {
                messages.push(serde_json::json!({
                    "role": "system",
                    "content": system,
                }));
            }
        }

        for turn in context {
            messages.push(serde_json::json!({
                "role": turn.role,
                "content": turn.content,
            }));
        }

        serde_json::json!({
            "model": self.effective_model(),
            "max_tokens": MAX_TOKENS,
            "user": user,
            "messages": messages,
        })
    }
}

// Completions API response types — deserialized by the caller.

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}
