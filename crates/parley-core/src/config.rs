use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Top-level config (parley.toml + PARLEY_* env overrides).
///
/// Every component receives the section it needs at construction time;
/// nothing reads configuration ambiently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    pub discord: DiscordConfig,
    pub completion: CompletionConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Hex-encoded Ed25519 public key from the application portal.
    pub public_key: String,
    /// Application id — used for the invite URL, command registration,
    /// and addressing follow-up webhook edits.
    pub application_id: String,
    /// Bot token. Only needed for `--register-commands`; the webhook
    /// path never uses it.
    #[serde(default)]
    pub bot_token: String,
    /// Space-delimited user ids permitted to invoke commands.
    /// Empty means open to everyone.
    #[serde(default)]
    pub allow_users: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub api_key: String,
    /// Model identifier. Empty falls back to the client's default model.
    #[serde(default)]
    pub model: String,
    /// Optional system prompt injected (view-time only) ahead of every
    /// conversation sent upstream.
    pub system_prompt: Option<String>,
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Retained-exchange count. A loaded history is capped at
    /// `max(1, 2 * depth)` turns; zero or negative disables persistence
    /// entirely.
    #[serde(default)]
    pub depth: i64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { depth: 0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_completion_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.parley/parley.db", home)
}

impl ParleyConfig {
    /// Load config from a TOML file with PARLEY_* env var overrides.
    ///
    /// Env keys use `__` as the section separator so that field names
    /// containing underscores survive, e.g. PARLEY_DISCORD__PUBLIC_KEY.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ParleyConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("PARLEY_").split("__"))
            .extract()
            .map_err(|e| crate::error::ParleyError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.parley/parley.toml", home)
}
