use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::session::DEFAULT_SESSION_TIMEOUT;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Not checked at startup; an empty key surfaces as failed model calls,
    /// which every caller turns into fallback text.
    pub google_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
    pub session_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: std::env::var("GOOGLE_API_KEY").unwrap_or_default(),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_timeout: match std::env::var("SESSION_TIMEOUT_SECS") {
                Ok(secs) => Duration::from_secs(
                    secs.parse::<u64>()
                        .context("SESSION_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                Err(_) => DEFAULT_SESSION_TIMEOUT,
            },
        })
    }
}
