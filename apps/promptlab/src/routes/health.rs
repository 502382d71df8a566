use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service version plus the results file being served and whether it exists yet.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let results_available = tokio::fs::try_exists(&state.results_path)
        .await
        .unwrap_or(false);

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "promptlab",
        "results_path": state.results_path.display().to_string(),
        "results_available": results_available
    }))
}
