use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_model: String,
    pub completion_max_tokens: u32,
    pub completion_retries: u32,
    pub completion_timeout_secs: u64,
    /// Directory holding `cl100k_base.json` / `o200k_base.json`. Unset → chars/4 estimate.
    pub tokenizer_dir: Option<String>,
    /// Keyword list TOML overriding the embedded default.
    pub keyword_lists_path: Option<String>,
    pub free_daily_limit: u32,
    pub premium_daily_limit: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            completion_model: env_or("COMPLETION_MODEL", "gpt-4-turbo"),
            completion_max_tokens: parse_env("COMPLETION_MAX_TOKENS", 2000)?,
            completion_retries: parse_env("COMPLETION_RETRIES", 3)?,
            completion_timeout_secs: parse_env("COMPLETION_TIMEOUT_SECS", 60)?,
            tokenizer_dir: optional_env("TOKENIZER_DIR"),
            keyword_lists_path: optional_env("KEYWORD_LISTS_PATH"),
            free_daily_limit: parse_env("FREE_DAILY_LIMIT", 3)?,
            premium_daily_limit: parse_env("PREMIUM_DAILY_LIMIT", 50)?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
