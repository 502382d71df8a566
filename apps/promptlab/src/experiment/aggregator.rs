//! Experiment aggregation: reduces iteration records to per-strategy averages
//! and picks the winning strategy.

use std::collections::BTreeMap;

use crate::experiment::models::{
    round_to, ExperimentResult, IterationRecord, ScoredIteration, StrategySummary,
};
use crate::experiment::strategy::Strategy;

/// Weights of the composite score used to pick the winner.
/// The parse rate is a percentage, so it dominates unless every strategy parses equally.
#[derive(Debug, Clone, PartialEq)]
pub struct WinnerWeights {
    pub format: f64,
    pub relevance: f64,
    pub clarity: f64,
    pub parse_rate: f64,
}

impl Default for WinnerWeights {
    fn default() -> Self {
        Self {
            format: 0.4,
            relevance: 0.3,
            clarity: 0.2,
            parse_rate: 0.1,
        }
    }
}

/// Composite score: format·w₁ + relevance·w₂ + clarity·w₃ + parse_rate·w₄
pub fn weighted_score(summary: &StrategySummary, weights: &WinnerWeights) -> f64 {
    weights.format * summary.avg_format
        + weights.relevance * summary.avg_relevance
        + weights.clarity * summary.avg_clarity
        + weights.parse_rate * summary.parse_success_rate
}

/// Averages the scored records of one strategy. Failed records count towards
/// `total_iterations` only. Returns `None` when nothing succeeded.
pub fn summarize(strategy: Strategy, records: &[IterationRecord]) -> Option<StrategySummary> {
    let valid: Vec<&ScoredIteration> = records.iter().filter_map(|r| r.as_scored()).collect();
    if valid.is_empty() {
        return None;
    }

    let count = valid.len() as f64;
    let mean = |metric: fn(&ScoredIteration) -> f64| -> f64 {
        valid.iter().map(|r| metric(r)).sum::<f64>() / count
    };
    let parsed = valid.iter().filter(|r| r.parsing_success).count() as f64;

    Some(StrategySummary {
        strategy,
        avg_relevance: round_to(mean(|r| r.relevance), 2),
        avg_clarity: round_to(mean(|r| r.clarity), 2),
        avg_format: round_to(mean(|r| r.format_compliance), 2),
        avg_time: round_to(mean(|r| r.generation_time), 2),
        parse_success_rate: round_to(parsed / count * 100.0, 0),
        total_iterations: records.len(),
        successful_iterations: valid.len(),
    })
}

/// First summary with the highest weighted score. Ties keep the earlier entry.
pub fn select_winner(summaries: &[StrategySummary], weights: &WinnerWeights) -> Option<Strategy> {
    let mut best: Option<(&StrategySummary, f64)> = None;
    for summary in summaries {
        let score = weighted_score(summary, weights);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((summary, score)),
        }
    }
    best.map(|(summary, _)| summary.strategy)
}

/// Builds the full result from per-strategy records, in run order.
pub fn aggregate(
    runs: Vec<(Strategy, Vec<IterationRecord>)>,
    weights: &WinnerWeights,
) -> ExperimentResult {
    let summaries: Vec<StrategySummary> = runs
        .iter()
        .filter_map(|(strategy, records)| summarize(*strategy, records))
        .collect();
    let winner = select_winner(&summaries, weights);
    let detailed_results: BTreeMap<Strategy, Vec<IterationRecord>> = runs.into_iter().collect();

    ExperimentResult {
        summaries,
        detailed_results,
        winner,
    }
}
