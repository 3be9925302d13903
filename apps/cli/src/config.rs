use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only the API key is required; every path has a working default.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Directory holding resume, skills, and criteria files.
    pub profile_dir: PathBuf,
    /// Default job listing file when --job-file is not passed.
    pub job_file: PathBuf,
    /// Root directory for exported cover letters (one subdir per company).
    pub output_dir: PathBuf,
    /// Conversation checkpoint file.
    pub context_path: PathBuf,
    /// Append-only session log (JSON Lines).
    pub session_log_path: PathBuf,
    /// Soft cap on refinement iterations — exceeded iterations warn about
    /// API spend but never hard-stop the loop.
    pub max_refinements: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            profile_dir: env_path("COVERFORGE_PROFILE_DIR", "data/profile"),
            job_file: env_path("COVERFORGE_JOB_FILE", "data/input/job_listing.txt"),
            output_dir: env_path("COVERFORGE_OUTPUT_DIR", "output/cover_letters"),
            context_path: env_path("COVERFORGE_CONTEXT_FILE", "temp/context.json"),
            session_log_path: env_path("COVERFORGE_SESSION_LOG", "output/logs/sessions.jsonl"),
            max_refinements: std::env::var("COVERFORGE_MAX_REFINEMENTS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("COVERFORGE_MAX_REFINEMENTS must be a non-negative integer")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
