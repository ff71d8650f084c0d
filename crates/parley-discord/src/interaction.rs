//! Inbound interaction wire format.
//!
//! Only the fields the router needs are modeled; everything else in the
//! payload is ignored on deserialization.

use serde::Deserialize;
use serde_json::Value;

/// Interaction `type` discriminant: connectivity handshake.
pub const INTERACTION_PING: u8 = 1;
/// Interaction `type` discriminant: slash command invocation.
pub const INTERACTION_APPLICATION_COMMAND: u8 = 2;

/// One inbound interaction.
/// Wire: `{ "type": 2, "data": {...}, "member": {...}, "channel_id": "...", "token": "..." }`
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    pub data: Option<CommandData>,
    pub member: Option<Member>,
    pub user: Option<User>,
    pub channel_id: Option<String>,
    /// Opaque per-interaction token addressing the deferred follow-up edit.
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub value: Value,
}

/// Guild-scoped sender wrapper. DMs carry `user` at the top level instead.
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
}

impl Interaction {
    /// Persistence key for this conversation: channel id, falling back to
    /// the DM sender id, falling back to the sentinel "-1".
    pub fn chat_key(&self) -> String {
        self.channel_id
            .clone()
            .or_else(|| self.user.as_ref().map(|u| u.id.clone()))
            .unwrap_or_else(|| "-1".to_string())
    }

    /// Sender identity checked against the allow-list: guild member id,
    /// falling back to the DM sender id, falling back to "-1".
    pub fn sender_id(&self) -> String {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .map(|u| u.id.clone())
            .or_else(|| self.user.as_ref().map(|u| u.id.clone()))
            .unwrap_or_else(|| "-1".to_string())
    }

    /// Lowercased command name, when this interaction carries a command.
    pub fn command_name(&self) -> Option<String> {
        self.data.as_ref().map(|d| d.name.to_lowercase())
    }

    /// All option values joined with single spaces. An all-whitespace result
    /// is indistinguishable from an absent query once trimmed by the caller.
    pub fn query(&self) -> String {
        let Some(data) = self.data.as_ref() else {
            return String::new();
        };
        data.options
            .iter()
            .map(|o| option_text(&o.value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render an option value as text. String options are taken verbatim;
/// numbers and booleans use their JSON rendering.
fn option_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Interaction {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn chat_key_prefers_channel_id() {
        let i = parse(r#"{"type":2,"channel_id":"chan-7","user":{"id":"u-1"}}"#);
        assert_eq!(i.chat_key(), "chan-7");
    }

    #[test]
    fn chat_key_falls_back_to_user_then_sentinel() {
        let i = parse(r#"{"type":2,"user":{"id":"u-1"}}"#);
        assert_eq!(i.chat_key(), "u-1");

        let i = parse(r#"{"type":2}"#);
        assert_eq!(i.chat_key(), "-1");
    }

    #[test]
    fn sender_prefers_guild_member() {
        let i = parse(r#"{"type":2,"member":{"user":{"id":"m-1"}},"user":{"id":"u-1"}}"#);
        assert_eq!(i.sender_id(), "m-1");
    }

    #[test]
    fn sender_falls_back_to_dm_user_then_sentinel() {
        let i = parse(r#"{"type":2,"user":{"id":"u-1"}}"#);
        assert_eq!(i.sender_id(), "u-1");

        let i = parse(r#"{"type":1}"#);
        assert_eq!(i.sender_id(), "-1");
    }

    #[test]
    fn query_joins_option_values_with_spaces() {
        let i = parse(
            r#"{"type":2,"data":{"name":"chat","options":[{"value":"hello"},{"value":"world"}]}}"#,
        );
        assert_eq!(i.query(), "hello world");
    }

    #[test]
    fn query_renders_non_string_options() {
        let i = parse(r#"{"type":2,"data":{"name":"chat","options":[{"value":42},{"value":true}]}}"#);
        assert_eq!(i.query(), "42 true");
    }

    #[test]
    fn query_without_options_is_empty() {
        let i = parse(r#"{"type":2,"data":{"name":"chat"}}"#);
        assert_eq!(i.query(), "");
    }

    #[test]
    fn whitespace_query_trims_to_empty() {
        let i = parse(r#"{"type":2,"data":{"name":"chat","options":[{"value":"  "},{"value":" "}]}}"#);
        assert_eq!(i.query().trim(), "");
    }

    #[test]
    fn command_name_is_lowercased() {
        let i = parse(r#"{"type":2,"data":{"name":"CHAT"}}"#);
        assert_eq!(i.command_name().as_deref(), Some("chat"));
    }
}
