//! Interaction ingress endpoint — POST /interactions.
//!
//! Both auth gates (request signature, sender allow-list) run before any
//! command logic; the two failure modes collapse into one 401 on purpose.
//! The chat command answers with a deferred acknowledgement and hands the
//! completion work to a detached task that later edits the placeholder.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use parley_completion::CompletionResponse;
use parley_context::ContextManager;
use parley_core::types::Turn;
use parley_discord::commands;
use parley_discord::interaction::{
    Interaction, INTERACTION_APPLICATION_COMMAND, INTERACTION_PING,
};
use parley_discord::response::{Embed, InteractionResponse};
use parley_discord::verify::{verify_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use parley_discord::allow;

use crate::app::AppState;

type HandlerError = (StatusCode, Json<Value>);
type HandlerResult = Result<Json<InteractionResponse>, HandlerError>;

// ── Public handler ────────────────────────────────────────────────────────────

/// POST /interactions
///
/// Returns 401 on auth failure, 400 on unknown command, 500 on unexpected
/// interaction shape, 200 otherwise with an interaction response body.
pub async fn interactions_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult {
    // Gate 1: request integrity. Missing headers short-circuit inside the
    // predicate; nothing else runs on failure.
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let timestamp = headers.get(TIMESTAMP_HEADER).and_then(|v| v.to_str().ok());
    if !verify_signature(
        &state.config.discord.public_key,
        signature,
        timestamp,
        &body,
    ) {
        warn!("interaction rejected: signature verification failed");
        return Err(unauthorized());
    }

    let interaction: Interaction = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "interaction body failed to parse");
        server_error()
    })?;

    // Gate 2: sender authorization. Same observable outcome as gate 1.
    let sender = interaction.sender_id();
    if !allow::is_allowed(&state.config.discord.allow_users, &sender) {
        warn!(sender = %sender, "interaction rejected: sender not in allow-list");
        return Err(unauthorized());
    }

    match interaction.kind {
        INTERACTION_PING => Ok(Json(InteractionResponse::pong())),
        INTERACTION_APPLICATION_COMMAND => dispatch_command(state, interaction).await,
        kind => {
            warn!(kind, "interaction of unexpected kind");
            Err(server_error())
        }
    }
}

// ── Command dispatch ──────────────────────────────────────────────────────────

async fn dispatch_command(state: Arc<AppState>, interaction: Interaction) -> HandlerResult {
    let Some(name) = interaction.command_name() else {
        warn!("command interaction without data");
        return Err(server_error());
    };

    match name.as_str() {
        commands::CHAT => handle_chat(state, interaction),
        commands::CONTEXT => handle_show_context(&state, &interaction),
        commands::CLEAR => handle_clear(&state, &interaction),
        commands::INVITE => Ok(Json(InteractionResponse::ephemeral(commands::invite_url(
            &state.config.discord.application_id,
        )))),
        other => {
            info!(command = other, "unknown command");
            Err((
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "unknown command"})),
            ))
        }
    }
}

/// The completion command: validate the query, load+extend the history,
/// acknowledge immediately, and finish in the background.
fn handle_chat(state: Arc<AppState>, interaction: Interaction) -> HandlerResult {
    let query = interaction.query().trim().to_string();
    if query.is_empty() {
        return Ok(Json(InteractionResponse::ephemeral(
            "Please provide a query.",
        )));
    }

    let chat_key = interaction.chat_key();
    let mut context = state.context.load(&chat_key).map_err(store_failure)?;
    ContextManager::append(&mut context, Turn::user(query.clone()));

    // Detached continuation: the acknowledgement below returns before these
    // network calls resolve. No cancellation, no retries; every failure arm
    // logs and abandons the deferred edit.
    let sender = interaction.sender_id();
    let token = interaction.token;
    tokio::spawn(complete_and_edit(state, chat_key, sender, token, query, context));

    Ok(Json(InteractionResponse::deferred()))
}

fn handle_show_context(state: &AppState, interaction: &Interaction) -> HandlerResult {
    let context = state
        .context
        .load(&interaction.chat_key())
        .map_err(store_failure)?;

    if context.is_empty() {
        return Ok(Json(InteractionResponse::ephemeral(
            "Context is empty or not available.",
        )));
    }

    let serialized = serde_json::to_string(&context).map_err(|e| {
        warn!(error = %e, "context failed to serialize");
        server_error()
    })?;
    Ok(Json(InteractionResponse::message(format!(
        "```json\n{serialized}\n```"
    ))))
}

fn handle_clear(state: &AppState, interaction: &Interaction) -> HandlerResult {
    state
        .context
        .clear(&interaction.chat_key())
        .map_err(store_failure)?;
    Ok(Json(InteractionResponse::ephemeral(
        "Context for the current chat (if it existed) has been cleared.",
    )))
}

// ── Background completion chain ───────────────────────────────────────────────

/// Call the completion API, extend and persist the history, then fulfil the
/// deferred acknowledgement with a follow-up edit.
async fn complete_and_edit(
    state: Arc<AppState>,
    chat_key: String,
    sender: String,
    token: String,
    query: String,
    mut context: Vec<Turn>,
) {
    let reply = match fetch_reply(&state, &sender, &context).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(chat_key = %chat_key, error = %e, "completion failed, deferred reply abandoned");
            return;
        }
    };

    if state.context.persistence_enabled() {
        ContextManager::append(&mut context, Turn::assistant(reply.clone()));
        if let Err(e) = state.context.persist(&chat_key, &context) {
            warn!(chat_key = %chat_key, error = %e, "context persist failed");
        }
    }

    let edit = state
        .followup
        .edit_original(
            &token,
            &format!("> {query}"),
            vec![Embed { description: reply }],
        )
        .await;
    if let Err(e) = edit {
        warn!(chat_key = %chat_key, error = %e, "follow-up edit failed");
    }
}

/// Issue the completion request and pull the first choice out of the body.
/// The client hands back the raw response; malformed bodies surface here.
async fn fetch_reply(state: &AppState, sender: &str, context: &[Turn]) -> anyhow::Result<String> {
    let response = state.completion.complete(sender, context).await?;
    let body: CompletionResponse = response.json().await?;
    body.choices
        .first()
        .map(|choice| choice.message.content.trim().to_string())
        .ok_or_else(|| anyhow::anyhow!("completion response carried no choices"))
}

// ── Error helpers ─────────────────────────────────────────────────────────────

fn unauthorized() -> HandlerError {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized"})),
    )
}

fn server_error() -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "unexpected interaction"})),
    )
}

fn store_failure(e: parley_context::ContextError) -> HandlerError {
    warn!(error = %e, "context store failure");
    server_error()
}
