use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::experiment::runner::{RunnerConfig, DEFAULT_ITERATIONS, DEFAULT_RATE_LIMIT_DELAY};
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_RESULTS_PATH: &str = "research/results/experiment_results.json";

/// Application configuration loaded from environment variables.
/// Only malformed values are errors; a missing API key switches the
/// experiment into demo mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub iterations: u32,
    pub rate_limit_delay: Duration,
    pub results_path: PathBuf,
    pub researcher: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("PROMPTLAB_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            iterations: match get("PROMPTLAB_ITERATIONS") {
                Some(v) => v
                    .parse::<u32>()
                    .context("PROMPTLAB_ITERATIONS must be a non-negative integer")?,
                None => DEFAULT_ITERATIONS,
            },
            rate_limit_delay: match get("PROMPTLAB_RATE_LIMIT_DELAY_SECS") {
                Some(v) => Duration::from_secs_f64(
                    v.parse::<f64>()
                        .ok()
                        .filter(|secs| secs.is_finite() && *secs >= 0.0)
                        .with_context(|| {
                            format!("PROMPTLAB_RATE_LIMIT_DELAY_SECS must be a non-negative number, got '{v}'")
                        })?,
                ),
                None => DEFAULT_RATE_LIMIT_DELAY,
            },
            results_path: get("PROMPTLAB_RESULTS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_PATH)),
            researcher: get("PROMPTLAB_RESEARCHER").unwrap_or_else(|| "unknown".to_string()),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Runner settings derived from this config. The fixed call parameters
    /// (system role, temperature, token cap) keep their defaults.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            model: self.model.clone(),
            iterations: self.iterations,
            rate_limit_delay: self.rate_limit_delay,
            ..RunnerConfig::default()
        }
    }
}
