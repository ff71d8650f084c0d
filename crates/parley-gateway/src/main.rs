use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use parley_context::{ContextManager, ContextStore, SqliteStore};
use parley_gateway::app;

#[derive(Parser)]
#[command(name = "parley-gateway", version, about = "Slash-command to completion-API bridge")]
struct Cli {
    /// Path to parley.toml (default: ~/.parley/parley.toml).
    #[arg(long)]
    config: Option<String>,

    /// Push the slash command definitions to the platform and exit.
    #[arg(long)]
    register_commands: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley_gateway=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    // load config: explicit path > PARLEY_CONFIG env > ~/.parley/parley.toml
    let config_path = cli.config.or_else(|| std::env::var("PARLEY_CONFIG").ok());
    let config = parley_core::ParleyConfig::load(config_path.as_deref())?;

    if cli.register_commands {
        parley_discord::commands::register_commands(
            &config.discord.application_id,
            &config.discord.bot_token,
            parley_discord::followup::API_BASE_URL,
        )
        .await?;
        return Ok(());
    }

    // The store only exists when a positive depth asks for persistence;
    // otherwise histories never survive past a single invocation.
    let store: Option<Arc<dyn ContextStore>> = if config.context.depth > 0 {
        let db_path = &config.database.path;
        ensure_parent_dir(db_path);
        info!(path = %db_path, "opening SQLite database");

        let db = rusqlite::Connection::open(db_path)?;
        db.execute_batch("PRAGMA journal_mode=WAL;")?;
        parley_context::db::init_db(&db)?;

        Some(Arc::new(SqliteStore::new(db)))
    } else {
        info!("context depth <= 0, persistence disabled");
        None
    };

    let context = ContextManager::new(store, config.context.depth);
    let completion = parley_completion::CompletionClient::new(
        config.completion.api_key.clone(),
        config.completion.model.clone(),
        config.completion.system_prompt.clone(),
        config.completion.base_url.clone(),
    );
    let followup = parley_discord::FollowupClient::new(config.discord.application_id.clone());

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let state = Arc::new(app::AppState::new(config, context, completion, followup));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Parley gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
