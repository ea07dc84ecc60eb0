use anyhow::{Context, Result};

pub const DEFAULT_SESSION_KEY: &str = "interview:session";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Roster lives in memory only when unset.
    pub database_url: Option<String>,
    /// Session snapshot lives in memory only when unset.
    pub redis_url: Option<String>,
    pub session_key: String,
    /// Remote deployment of the AI endpoints; in-process when unset.
    pub services_base_url: Option<String>,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            redis_url: optional_env("REDIS_URL"),
            session_key: optional_env("SESSION_KEY")
                .unwrap_or_else(|| DEFAULT_SESSION_KEY.to_string()),
            services_base_url: optional_env("SERVICES_BASE_URL"),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
