use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use parley_completion::CompletionClient;
use parley_context::ContextManager;
use parley_core::ParleyConfig;
use parley_discord::FollowupClient;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: ParleyConfig,
    pub context: ContextManager,
    pub completion: CompletionClient,
    pub followup: FollowupClient,
}

impl AppState {
    pub fn new(
        config: ParleyConfig,
        context: ContextManager,
        completion: CompletionClient,
        followup: FollowupClient,
    ) -> Self {
        Self {
            config,
            context,
            completion,
            followup,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/interactions",
            post(crate::http::interactions::interactions_handler),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
