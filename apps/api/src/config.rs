use anyhow::{bail, Context, Result};

use crate::recommendation::skill_match::ScoreSource;

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub anthropic_base_url: String,
    /// Transport timeout of the HTTP client, not of the recommendation pipeline.
    pub llm_timeout_secs: u64,
    /// Which score is authoritative for job admission and ranking when a
    /// request does not say.
    pub job_score_source: ScoreSource,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_base_url: std::env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            job_score_source: parse_score_source(
                &std::env::var("JOB_SCORE_SOURCE").unwrap_or_else(|_| "self_reported".to_string()),
            )?,
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

fn parse_score_source(value: &str) -> Result<ScoreSource> {
    match value.trim().to_ascii_lowercase().as_str() {
        "self_reported" => Ok(ScoreSource::SelfReported),
        "skill_overlap" => Ok(ScoreSource::SkillOverlap),
        other => bail!("JOB_SCORE_SOURCE must be 'self_reported' or 'skill_overlap', got '{other}'"),
    }
}
