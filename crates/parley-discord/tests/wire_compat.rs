// Verify wire format matches the platform's interaction protocol.
// These tests ensure protocol compatibility is never broken.

use parley_discord::interaction::{
    Interaction, INTERACTION_APPLICATION_COMMAND, INTERACTION_PING,
};
use parley_discord::response::{Embed, InteractionResponse, EPHEMERAL_FLAG};

#[test]
fn ping_payload_parses() {
    let json = r#"{"type":1,"token":"tok-1"}"#;
    let interaction: Interaction = serde_json::from_str(json).unwrap();
    assert_eq!(interaction.kind, INTERACTION_PING);
    assert!(interaction.data.is_none());
}

#[test]
fn command_payload_parses_with_all_routing_fields() {
    let json = r#"{
        "type": 2,
        "data": {"name": "chat", "options": [{"value": "hi"}]},
        "member": {"user": {"id": "111"}},
        "channel_id": "222",
        "token": "tok-9"
    }"#;
    let interaction: Interaction = serde_json::from_str(json).unwrap();

    assert_eq!(interaction.kind, INTERACTION_APPLICATION_COMMAND);
    assert_eq!(interaction.command_name().as_deref(), Some("chat"));
    assert_eq!(interaction.sender_id(), "111");
    assert_eq!(interaction.chat_key(), "222");
    assert_eq!(interaction.token, "tok-9");
    assert_eq!(interaction.query(), "hi");
}

#[test]
fn unknown_payload_fields_are_ignored() {
    let json = r#"{
        "type": 2,
        "id": "123456",
        "application_id": "999",
        "version": 1,
        "locale": "en-US",
        "data": {"name": "clear", "id": "777", "type": 1}
    }"#;
    let interaction: Interaction = serde_json::from_str(json).unwrap();
    assert_eq!(interaction.command_name().as_deref(), Some("clear"));
}

#[test]
fn missing_token_defaults_to_empty() {
    let json = r#"{"type":1}"#;
    let interaction: Interaction = serde_json::from_str(json).unwrap();
    assert_eq!(interaction.token, "");
}

#[test]
fn ephemeral_response_serialization() {
    let json = serde_json::to_string(&InteractionResponse::ephemeral("Please provide a query"))
        .unwrap();

    assert!(json.contains(r#""type":4"#));
    assert!(json.contains(&format!(r#""flags":{EPHEMERAL_FLAG}"#)));
    // embeds must be absent when unset
    assert!(!json.contains(r#""embeds""#));
}

#[test]
fn deferred_response_omits_data() {
    let json = serde_json::to_string(&InteractionResponse::deferred()).unwrap();
    assert_eq!(json, r#"{"type":5}"#);
}

#[test]
fn embed_round_trip() {
    let embed = Embed {
        description: "a reply".to_string(),
    };
    let json = serde_json::to_string(&embed).unwrap();
    assert_eq!(json, r#"{"description":"a reply"}"#);

    let back: Embed = serde_json::from_str(&json).unwrap();
    assert_eq!(back.description, "a reply");
}
