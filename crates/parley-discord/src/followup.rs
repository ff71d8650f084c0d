//! Follow-up side channel for deferred replies.
//!
//! A deferred acknowledgement is fulfilled later by PATCHing the original
//! interaction response, addressed by application id + interaction token.
//! No retries: a failed edit surfaces as an error for the caller to log.

use tracing::debug;

use crate::error::{DiscordError, Result};
use crate::response::Embed;

/// Public platform API base.
pub const API_BASE_URL: &str = "https://discord.com/api/v10";

pub struct FollowupClient {
    client: reqwest::Client,
    application_id: String,
    base_url: String,
}

impl FollowupClient {
    pub fn new(application_id: String) -> Self {
        Self::with_base_url(application_id, API_BASE_URL.to_string())
    }

    pub fn with_base_url(application_id: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            application_id,
            base_url,
        }
    }

    /// Replace the deferred placeholder with real content.
    pub async fn edit_original(
        &self,
        token: &str,
        content: &str,
        embeds: Vec<Embed>,
    ) -> Result<()> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.base_url, self.application_id, token
        );

        debug!(application_id = %self.application_id, "editing deferred response");

        let resp = self
            .client
            .patch(&url)
            .header("content-type", "application/json;charset=UTF-8")
            .json(&serde_json::json!({
                "content": content,
                "embeds": embeds,
            }))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DiscordError::Api { status, message });
        }
        Ok(())
    }
}
