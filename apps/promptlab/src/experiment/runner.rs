//! Strategy runner: drives K sequential iterations per strategy against the
//! completion service.
//!
//! Per iteration: build prompt → call service → time the call → score.
//! A failed call becomes a `FailedIteration` and the loop moves on; nothing is
//! retried and nothing aborts the strategy. One call is in flight at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::experiment::models::{FailedIteration, IterationRecord, ScoredIteration};
use crate::experiment::prompts::build_prompt;
use crate::experiment::scoring::{score_response, ScoringConfig};
use crate::experiment::strategy::Strategy;
use crate::llm_client::prompts::{INTERVIEWER_SYSTEM, MAX_TOKENS, TEMPERATURE};
use crate::llm_client::{ChatMessage, CompletionRequest, CompletionService, DEFAULT_MODEL};

pub const DEFAULT_ITERATIONS: u32 = 3;
/// Pause between strategies to stay under the provider's rate limit.
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(2);

/// Fixed call parameters and loop settings for a run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub model: String,
    pub iterations: u32,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub rate_limit_delay: Duration,
    pub scoring: ScoringConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            iterations: DEFAULT_ITERATIONS,
            system_prompt: INTERVIEWER_SYSTEM.to_string(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY,
            scoring: ScoringConfig::default(),
        }
    }
}

pub struct StrategyRunner {
    service: Arc<dyn CompletionService>,
    config: RunnerConfig,
}

impl StrategyRunner {
    pub fn new(service: Arc<dyn CompletionService>, config: RunnerConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn request_for(&self, prompt: String) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(self.config.system_prompt.clone()),
                ChatMessage::user(prompt),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Runs every iteration for one strategy and returns one record per iteration.
    pub async fn run_strategy(
        &self,
        strategy: Strategy,
        job_description: &str,
    ) -> Vec<IterationRecord> {
        info!("Testing strategy: {}", strategy);
        let total = self.config.iterations;
        let mut records = Vec::with_capacity(total as usize);

        for iteration in 1..=total {
            info!("{} iteration {}/{}", strategy, iteration, total);
            let request = self.request_for(build_prompt(strategy, job_description));

            let started = Instant::now();
            let outcome = self.service.complete(&request).await;
            let elapsed = started.elapsed();

            let record = match outcome {
                Ok(completion) => {
                    debug!(
                        "{} iteration {} used {} tokens",
                        strategy, iteration, completion.usage.total_tokens
                    );
                    let scores = score_response(&completion.text, strategy, &self.config.scoring);
                    let scored = ScoredIteration::new(iteration, scores, elapsed, &completion.text);
                    info!(
                        "{} iteration {}: relevance={:.1} clarity={:.1} format={:.1} time={:.2}s parseable={}",
                        strategy,
                        iteration,
                        scored.relevance,
                        scored.clarity,
                        scored.format_compliance,
                        scored.generation_time,
                        scored.parsing_success
                    );
                    IterationRecord::Scored(scored)
                }
                Err(e) => {
                    warn!(
                        "{} iteration {} failed (transient={}): {}",
                        strategy,
                        iteration,
                        e.is_transient(),
                        e
                    );
                    IterationRecord::Failed(FailedIteration {
                        iteration,
                        error: e.to_string(),
                        transient: e.is_transient(),
                    })
                }
            };
            records.push(record);
        }

        records
    }

    /// Runs `strategies` in order, pausing for the rate-limit delay between
    /// consecutive strategies.
    pub async fn run_all(
        &self,
        strategies: &[Strategy],
        job_description: &str,
    ) -> Vec<(Strategy, Vec<IterationRecord>)> {
        let mut runs = Vec::with_capacity(strategies.len());

        for (index, strategy) in strategies.iter().enumerate() {
            let records = self.run_strategy(*strategy, job_description).await;
            runs.push((*strategy, records));

            if index + 1 < strategies.len() && !self.config.rate_limit_delay.is_zero() {
                tokio::time::sleep(self.config.rate_limit_delay).await;
            }
        }

        runs
    }
}
