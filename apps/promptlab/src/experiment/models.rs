use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::experiment::scoring::ResponseScores;
use crate::experiment::strategy::Strategy;

/// Max characters of the raw response kept in `sample_output`.
pub const SAMPLE_OUTPUT_CHARS: usize = 200;

/// One scored request/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredIteration {
    pub iteration: u32,
    pub relevance: f64,
    pub clarity: f64,
    pub format_compliance: f64,
    /// Seconds, rounded to 2 dp.
    pub generation_time: f64,
    pub parsing_success: bool,
    /// Characters, not bytes.
    pub response_length: usize,
    pub sample_output: String,
}

impl ScoredIteration {
    pub fn new(iteration: u32, scores: ResponseScores, elapsed: Duration, response: &str) -> Self {
        Self {
            iteration,
            relevance: scores.relevance,
            clarity: scores.clarity,
            format_compliance: scores.format_compliance,
            generation_time: round_to(elapsed.as_secs_f64(), 2),
            parsing_success: scores.parsing_success,
            response_length: response.chars().count(),
            sample_output: truncate_sample(response),
        }
    }
}

/// An iteration whose completion call failed. `iteration` and `transient` are
/// optional on load so bare `{"error": ...}` records still parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedIteration {
    #[serde(default)]
    pub iteration: u32,
    pub error: String,
    #[serde(default)]
    pub transient: bool,
}

/// Per-iteration record. Serialized untagged: a failure is recognised by its
/// `error` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IterationRecord {
    Scored(ScoredIteration),
    Failed(FailedIteration),
}

impl IterationRecord {
    pub fn as_scored(&self) -> Option<&ScoredIteration> {
        match self {
            IterationRecord::Scored(s) => Some(s),
            IterationRecord::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, IterationRecord::Failed(_))
    }
}

/// Averages over the successful iterations of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub avg_relevance: f64,
    pub avg_clarity: f64,
    pub avg_format: f64,
    pub avg_time: f64,
    /// Percentage, 0–100.
    pub parse_success_rate: f64,
    pub total_iterations: usize,
    pub successful_iterations: usize,
}

/// Output of one full run: every summary, every record, and the winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub summaries: Vec<StrategySummary>,
    pub detailed_results: BTreeMap<Strategy, Vec<IterationRecord>>,
    /// `None` only when no strategy produced a summary.
    pub winner: Option<Strategy>,
}

impl ExperimentResult {
    pub fn summary_for(&self, strategy: Strategy) -> Option<&StrategySummary> {
        self.summaries.iter().find(|s| s.strategy == strategy)
    }

    pub fn winner_summary(&self) -> Option<&StrategySummary> {
        self.winner.and_then(|w| self.summary_for(w))
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

fn truncate_sample(response: &str) -> String {
    match response.char_indices().nth(SAMPLE_OUTPUT_CHARS) {
        Some((cut, _)) => format!("{}...", &response[..cut]),
        None => response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scores() -> ResponseScores {
        ResponseScores {
            relevance: 6.0,
            clarity: 8.0,
            format_compliance: 8.0,
            parsing_success: true,
        }
    }

    #[test]
    fn test_scored_iteration_rounds_time_and_truncates_sample() {
        let response = "é".repeat(250);
        let record = ScoredIteration::new(2, scores(), Duration::from_millis(3_456), &response);
        assert_eq!(record.generation_time, 3.46);
        assert_eq!(record.response_length, 250);
        assert_eq!(record.sample_output.chars().count(), SAMPLE_OUTPUT_CHARS + 3);
        assert!(record.sample_output.ends_with("..."));
    }

    #[test]
    fn test_short_sample_is_kept_verbatim() {
        let record = ScoredIteration::new(1, scores(), Duration::ZERO, "1. What is REST?");
        assert_eq!(record.sample_output, "1. What is REST?");
    }

    #[test]
    fn test_failure_record_serializes_with_error_key() {
        let record = IterationRecord::Failed(FailedIteration {
            iteration: 3,
            error: "HTTP error: timed out".to_string(),
            transient: true,
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["error"], "HTTP error: timed out");
        assert!(value.get("relevance").is_none());
    }

    #[test]
    fn test_bare_error_record_deserializes_as_failure() {
        let record: IterationRecord =
            serde_json::from_value(json!({"error": "Connection refused"})).unwrap();
        assert!(record.is_failure());
        assert!(record.as_scored().is_none());
    }

    #[test]
    fn test_scored_record_deserializes_as_scored() {
        let record: IterationRecord = serde_json::from_value(json!({
            "iteration": 1,
            "relevance": 7.5,
            "clarity": 8.0,
            "format_compliance": 10.0,
            "generation_time": 3.2,
            "parsing_success": true,
            "response_length": 842,
            "sample_output": "<questions>..."
        }))
        .unwrap();
        assert_eq!(record.as_scored().unwrap().relevance, 7.5);
    }

    #[test]
    fn test_detailed_results_keyed_by_strategy_name() {
        let mut detailed = BTreeMap::new();
        detailed.insert(Strategy::Structured, vec![]);
        detailed.insert(Strategy::ZeroShot, vec![]);
        let result = ExperimentResult {
            summaries: vec![],
            detailed_results: detailed,
            winner: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""detailed_results":{"zero_shot":[],"structured":[]}"#));
        assert!(json.contains(r#""winner":null"#));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(8.333_333, 2), 8.33);
        assert_eq!(round_to(66.666, 0), 67.0);
    }
}
