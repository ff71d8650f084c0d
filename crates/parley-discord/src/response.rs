//! Outbound interaction response wire format.

use serde::{Deserialize, Serialize};

/// Callback type: handshake acknowledgement.
pub const PONG: u8 = 1;
/// Callback type: immediate visible message.
pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
/// Callback type: placeholder that promises a later content edit.
pub const DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE: u8 = 5;

/// Message flag: visible only to the invoking user.
pub const EPHEMERAL_FLAG: u32 = 64;

/// Response body for an interaction.
/// Wire: `{ "type": 4, "data": { "content": "...", "flags": 64 } }`
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
}

/// Rich-message fragment; only the description field is used here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embed {
    pub description: String,
}

impl InteractionResponse {
    /// Handshake acknowledgement — no data payload.
    pub fn pong() -> Self {
        Self {
            kind: PONG,
            data: None,
        }
    }

    /// Deferred acknowledgement — the real content arrives via a follow-up
    /// edit on the interaction's webhook.
    pub fn deferred() -> Self {
        Self {
            kind: DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE,
            data: None,
        }
    }

    /// Immediate message visible to the whole channel.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(ResponseData {
                content: Some(content.into()),
                ..Default::default()
            }),
        }
    }

    /// Immediate message visible only to the invoker.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(ResponseData {
                content: Some(content.into()),
                flags: Some(EPHEMERAL_FLAG),
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pong_has_no_data() {
        let json = serde_json::to_string(&InteractionResponse::pong()).unwrap();
        assert_eq!(json, r#"{"type":1}"#);
    }

    #[test]
    fn deferred_has_no_data() {
        let json = serde_json::to_string(&InteractionResponse::deferred()).unwrap();
        assert_eq!(json, r#"{"type":5}"#);
    }

    #[test]
    fn ephemeral_sets_flag() {
        let json = serde_json::to_string(&InteractionResponse::ephemeral("hi")).unwrap();
        assert_eq!(json, r#"{"type":4,"data":{"content":"hi","flags":64}}"#);
    }

    #[test]
    fn visible_message_has_no_flag() {
        let json = serde_json::to_string(&InteractionResponse::message("hi")).unwrap();
        assert_eq!(json, r#"{"type":4,"data":{"content":"hi"}}"#);
    }
}
