use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_chat_model: String,
    pub resume_path: PathBuf,
    /// `["*"]` means any origin.
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_api_url: env_or("GROQ_API_URL", DEFAULT_API_URL),
            groq_chat_model: env_or("GROQ_CHAT_MODEL", DEFAULT_MODEL),
            resume_path: PathBuf::from(env_or("RESUME_PATH", "resume/resume.json")),
            allowed_origins: parse_origins(&env_or("ALLOWED_ORIGINS", "*")),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Splits a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}
