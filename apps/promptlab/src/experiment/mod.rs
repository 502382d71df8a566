// Prompt-strategy experiment: prompt building, scoring, running, aggregation.
// All completion calls go through llm_client::CompletionService.

pub mod aggregator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod runner;
pub mod scoring;
pub mod strategy;

use tracing::{info, warn};

use crate::experiment::aggregator::{aggregate, WinnerWeights};
use crate::experiment::models::ExperimentResult;
use crate::experiment::runner::StrategyRunner;
use crate::experiment::strategy::Strategy;

/// Runs the full experiment: every strategy in order, then aggregation and
/// winner selection.
pub async fn run_experiment(
    runner: &StrategyRunner,
    strategies: &[Strategy],
    job_description: &str,
    weights: &WinnerWeights,
) -> ExperimentResult {
    info!(
        "Running {} strategies × {} iterations (model: {})",
        strategies.len(),
        runner.config().iterations,
        runner.config().model
    );

    let runs = runner.run_all(strategies, job_description).await;
    let result = aggregate(runs, weights);

    for (strategy, records) in &result.detailed_results {
        let failed = records.iter().filter(|r| r.is_failure()).count();
        if failed == records.len() {
            warn!("No successful iterations for {}; it has no summary", strategy);
        } else if failed > 0 {
            warn!("{}: {} of {} iterations failed", strategy, failed, records.len());
        }
    }
    match result.winner {
        Some(winner) => info!("Recommended strategy: {}", winner),
        None => warn!("No strategy produced a summary; no winner"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::experiment::runner::tests::ScriptedService;
    use crate::experiment::runner::RunnerConfig;
    use crate::llm_client::LlmError;

    const XML_RESPONSE: &str = "<questions>\n\
        <question><id>1</id><text>How does FastAPI handle async?</text></question>\n\
        <question><id>2</id><text>How do you tune PostgreSQL?</text></question>\n\
        <question><id>3</id><text>When is MongoDB a better fit?</text></question>\n\
        </questions>";

    const PLAIN_RESPONSE: &str = "Some questions about the role follow below";

    #[tokio::test]
    async fn test_structured_wins_when_it_parses() {
        let service = Arc::new(ScriptedService::new(vec![
            Ok(PLAIN_RESPONSE.to_string()),
            Ok(PLAIN_RESPONSE.to_string()),
            Ok(XML_RESPONSE.to_string()),
            Ok(XML_RESPONSE.to_string()),
        ]));
        let runner = StrategyRunner::new(
            service,
            RunnerConfig {
                iterations: 2,
                rate_limit_delay: Duration::ZERO,
                ..RunnerConfig::default()
            },
        );

        let result = run_experiment(
            &runner,
            &[Strategy::ZeroShot, Strategy::Structured],
            prompts::DEFAULT_JOB_DESCRIPTION,
            &WinnerWeights::default(),
        )
        .await;

        assert_eq!(result.winner, Some(Strategy::Structured));
        let structured = result.summary_for(Strategy::Structured).unwrap();
        assert_eq!(structured.avg_format, 10.0);
        assert_eq!(structured.parse_success_rate, 100.0);
        let zero_shot = result.summary_for(Strategy::ZeroShot).unwrap();
        assert_eq!(zero_shot.avg_format, 5.0);
        assert_eq!(zero_shot.parse_success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_all_failed_strategy_is_missing_from_summaries() {
        let service = Arc::new(ScriptedService::new(vec![
            Err(LlmError::EmptyContent),
            Ok(XML_RESPONSE.to_string()),
        ]));
        let runner = StrategyRunner::new(
            service,
            RunnerConfig {
                iterations: 1,
                rate_limit_delay: Duration::ZERO,
                ..RunnerConfig::default()
            },
        );

        let result = run_experiment(
            &runner,
            &[Strategy::FewShot, Strategy::Structured],
            "",
            &WinnerWeights::default(),
        )
        .await;

        assert!(result.summary_for(Strategy::FewShot).is_none());
        assert_eq!(result.detailed_results[&Strategy::FewShot].len(), 1);
        assert_eq!(result.winner, Some(Strategy::Structured));
    }
}
