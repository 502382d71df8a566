use std::path::PathBuf;
use std::sync::Arc;

use crate::experiment::aggregator::WinnerWeights;

/// Shared state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Where the latest experiment artifact is read from.
    pub results_path: PathBuf,
    /// Job description used for prompt previews.
    pub job_description: Arc<str>,
    pub weights: WinnerWeights,
}
