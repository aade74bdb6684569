//! # Configuration Module
//!
//! Explicitly constructed runtime configuration, loaded from the environment
//! (with `.env` support) at startup and passed into handlers — no global
//! config singleton. Security-relevant values fail fast when missing or left
//! at their placeholder instead of being silently defaulted.

use std::env;
use std::time::Duration;

/// Game bot the relay instructions are addressed to, unless overridden.
pub const DEFAULT_GAME_BOT_USERNAME: &str = "美奈";
/// How long a generated command stays recallable for the repeat button.
pub const DEFAULT_COMMAND_TTL_SECS: u64 = 300;

const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN_HERE";

/// Runtime configuration for the bot process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot API token.
    pub bot_token: String,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Username of the game bot that relay instructions target.
    pub game_bot_username: String,
    /// Expiry for remembered pending commands.
    pub command_ttl: Duration,
}

/// Errors raised while loading configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingBotToken,
    PlaceholderBotToken,
    MissingDatabaseUrl,
    InvalidCommandTtl(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingBotToken => write!(f, "TELEGRAM_BOT_TOKEN must be set"),
            ConfigError::PlaceholderBotToken => {
                write!(f, "TELEGRAM_BOT_TOKEN is still the placeholder value")
            }
            ConfigError::MissingDatabaseUrl => write!(f, "DATABASE_URL must be set"),
            ConfigError::InvalidCommandTtl(raw) => {
                write!(f, "COMMAND_TTL_SECS is not a number of seconds: {raw}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = validate_bot_token(env::var("TELEGRAM_BOT_TOKEN").ok())?;

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => return Err(ConfigError::MissingDatabaseUrl),
        };

        let game_bot_username = env::var("GAME_BOT_USERNAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GAME_BOT_USERNAME.to_string());

        let command_ttl = parse_command_ttl(env::var("COMMAND_TTL_SECS").ok())?;

        Ok(Self {
            bot_token,
            database_url,
            game_bot_username,
            command_ttl,
        })
    }
}

/// Reject a missing, empty, or placeholder bot token.
fn validate_bot_token(raw: Option<String>) -> Result<String, ConfigError> {
    let token = raw.ok_or(ConfigError::MissingBotToken)?;
    let token = token.trim().to_string();

    if token.is_empty() {
        return Err(ConfigError::MissingBotToken);
    }
    if token == TOKEN_PLACEHOLDER {
        return Err(ConfigError::PlaceholderBotToken);
    }

    Ok(token)
}

fn parse_command_ttl(raw: Option<String>) -> Result<Duration, ConfigError> {
    match raw {
        Some(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidCommandTtl(raw.clone()))?;
            Ok(Duration::from_secs(secs))
        }
        None => Ok(Duration::from_secs(DEFAULT_COMMAND_TTL_SECS)),
    }
}
