//! Report emitter: persists the experiment result as a JSON artifact enriched
//! with run metadata, and loads it back for the console, chart and HTTP readers.
//!
//! Artifact layout:
//! `{experiment_id, experiment_date, researcher, model_used, iterations_per_strategy,
//!   recommendation, sample_outputs: {structured_example}, summaries,
//!   detailed_results, winner}`
//!
//! Enrichment fields are optional on load, so a bare `{summaries,
//! detailed_results, winner}` file is accepted too.

pub mod chart;
pub mod console;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::experiment::aggregator::{weighted_score, WinnerWeights};
use crate::experiment::models::ExperimentResult;
use crate::experiment::strategy::Strategy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleOutputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_example: Option<String>,
}

/// The persisted artifact: the experiment result plus who/what/when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub researcher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations_per_strategy: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub sample_outputs: SampleOutputs,
    #[serde(flatten)]
    pub result: ExperimentResult,
}

/// Run metadata supplied by the caller.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub researcher: String,
    pub model: String,
    pub iterations: u32,
}

/// Wraps a result with metadata, a recommendation and the first successful
/// structured sample.
pub fn build_report(
    result: ExperimentResult,
    meta: &ReportMeta,
    weights: &WinnerWeights,
    now: DateTime<Utc>,
) -> ExperimentReport {
    let recommendation = build_recommendation(&result, weights);
    let structured_example = result
        .detailed_results
        .get(&Strategy::Structured)
        .and_then(|records| records.iter().find_map(|r| r.as_scored()))
        .map(|r| r.sample_output.clone());

    ExperimentReport {
        experiment_id: Some(Uuid::new_v4()),
        experiment_date: Some(now),
        researcher: Some(meta.researcher.clone()),
        model_used: Some(meta.model.clone()),
        iterations_per_strategy: Some(meta.iterations),
        recommendation: Some(recommendation),
        sample_outputs: SampleOutputs { structured_example },
        result,
    }
}

/// Human-readable recommendation naming the winner and the runner-up.
pub fn build_recommendation(result: &ExperimentResult, weights: &WinnerWeights) -> String {
    let Some(winner) = result.winner_summary() else {
        return "No strategy completed a successful iteration. \
            Check the API key and network access, then rerun the experiment."
            .to_string();
    };

    let mut recommendation = format!(
        "Adopt {} prompting for interview question generation. \
        Overall score {:.1} (format {:.1}/10, relevance {:.1}/10, clarity {:.1}/10, parsing {:.0}%).",
        winner.strategy.label(),
        weighted_score(winner, weights),
        winner.avg_format,
        winner.avg_relevance,
        winner.avg_clarity,
        winner.parse_success_rate,
    );

    let runner_up = result
        .summaries
        .iter()
        .filter(|s| s.strategy != winner.strategy)
        .map(|s| (s, weighted_score(s, weights)))
        .fold(None, |best: Option<(_, f64)>, (s, score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((s, score)),
        });

    if let Some((summary, score)) = runner_up {
        recommendation.push_str(&format!(
            " Runner-up: {} ({:.1}).",
            summary.strategy.label(),
            score
        ));
    }

    recommendation
}

/// Writes the artifact as pretty JSON, creating parent directories.
pub fn write_report(path: &Path, report: &ExperimentReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;

    info!("Results saved to {}", path.display());
    Ok(())
}

pub fn parse_report(json: &str) -> Result<ExperimentReport> {
    serde_json::from_str(json).context("Results file is not a valid experiment report")
}

pub fn load_report(path: &Path) -> Result<ExperimentReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Results file not found: {}", path.display()))?;
    parse_report(&json)
}
