//! Slash command surface — definitions, registration, and the invite URL.
//!
//! The webhook handler dispatches on these names; `register_commands` pushes
//! the definitions to the platform over REST (the only place the bot token
//! is used).

use tracing::info;

use crate::error::{DiscordError, Result};

/// Converse with the assistant (deferred completion flow).
pub const CHAT: &str = "chat";
/// Show the stored conversation history for the current chat.
pub const CONTEXT: &str = "context";
/// Clear the stored conversation history for the current chat.
pub const CLEAR: &str = "clear";
/// Get a link to add the bot to a server.
pub const INVITE: &str = "invite";

/// Option type tag for string options in the command schema.
const OPTION_TYPE_STRING: u8 = 3;

/// Permission bitmask requested on invite: Send Messages + Use Application
/// Commands.
const INVITE_PERMISSIONS: u64 = 2147485696;

/// OAuth2 authorization URL for installing the bot.
pub fn invite_url(application_id: &str) -> String {
    format!(
        "https://discord.com/oauth2/authorize?client_id={application_id}&permissions={INVITE_PERMISSIONS}&scope=bot"
    )
}

/// Full command schema pushed on registration.
pub fn command_definitions() -> serde_json::Value {
    serde_json::json!([
        {
            "name": CHAT,
            "description": "Converse with the assistant",
            "options": [
                {
                    "type": OPTION_TYPE_STRING,
                    "name": "query",
                    "description": "What to say to the assistant",
                    "required": true,
                }
            ],
        },
        {
            "name": CONTEXT,
            "description": "Show the stored conversation history for this chat",
        },
        {
            "name": CLEAR,
            "description": "Clear the stored conversation history for this chat",
        },
        {
            "name": INVITE,
            "description": "Get an invite link to add the bot to your server",
        },
    ])
}

/// Bulk-overwrite the application's global commands.
pub async fn register_commands(
    application_id: &str,
    bot_token: &str,
    base_url: &str,
) -> Result<()> {
    let url = format!("{base_url}/applications/{application_id}/commands");

    let resp = reqwest::Client::new()
        .put(&url)
        .header("authorization", format!("Bot {bot_token}"))
        .json(&command_definitions())
        .send()
        .await?;

    let status = resp.status().as_u16();
    if !resp.status().is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(DiscordError::Api { status, message });
    }

    info!(application_id, "slash commands registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_url_embeds_application_id_and_permissions() {
        let url = invite_url("8675309");
        assert_eq!(
            url,
            "https://discord.com/oauth2/authorize?client_id=8675309&permissions=2147485696&scope=bot"
        );
    }

    #[test]
    fn schema_covers_all_four_commands() {
        let defs = command_definitions();
        let names: Vec<&str> = defs
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec![CHAT, CONTEXT, CLEAR, INVITE]);
    }

    #[test]
    fn chat_query_option_is_required() {
        let defs = command_definitions();
        let option = &defs[0]["options"][0];
        assert_eq!(option["name"], "query");
        assert_eq!(option["required"], true);
    }
}
