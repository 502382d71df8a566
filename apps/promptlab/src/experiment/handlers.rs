//! Axum route handlers for the experiment read API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::experiment::aggregator::weighted_score;
use crate::experiment::models::StrategySummary;
use crate::experiment::prompts::build_prompt;
use crate::experiment::strategy::Strategy;
use crate::report::{parse_report, ExperimentReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WinnerResponse {
    pub strategy: Strategy,
    pub weighted_score: f64,
    pub summary: StrategySummary,
    pub recommendation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromptPreviewResponse {
    pub strategy: Strategy,
    pub prompt: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn read_latest(state: &AppState) -> Result<ExperimentReport, AppError> {
    let json = match tokio::fs::read_to_string(&state.results_path).await {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "No experiment results at {}. Run the experiment first.",
                state.results_path.display()
            )));
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };
    Ok(parse_report(&json)?)
}

/// GET /api/v1/experiments/latest
///
/// Returns the stored experiment artifact as-is.
pub async fn handle_latest_report(
    State(state): State<AppState>,
) -> Result<Json<ExperimentReport>, AppError> {
    Ok(Json(read_latest(&state).await?))
}

/// GET /api/v1/experiments/latest/winner
pub async fn handle_latest_winner(
    State(state): State<AppState>,
) -> Result<Json<WinnerResponse>, AppError> {
    let report = read_latest(&state).await?;
    let summary = report
        .result
        .winner_summary()
        .cloned()
        .ok_or_else(|| AppError::NotFound("The latest experiment has no winner".to_string()))?;

    Ok(Json(WinnerResponse {
        strategy: summary.strategy,
        weighted_score: weighted_score(&summary, &state.weights),
        summary,
        recommendation: report.recommendation,
    }))
}

/// GET /api/v1/prompts/:strategy
///
/// Previews the prompt a strategy would send for the configured job description.
pub async fn handle_prompt_preview(
    State(state): State<AppState>,
    Path(strategy): Path<String>,
) -> Result<Json<PromptPreviewResponse>, AppError> {
    let strategy: Strategy = strategy
        .parse()
        .map_err(|e: crate::experiment::strategy::UnknownStrategy| {
            AppError::Validation(e.to_string())
        })?;

    Ok(Json(PromptPreviewResponse {
        strategy,
        prompt: build_prompt(strategy, &state.job_description),
    }))
}
