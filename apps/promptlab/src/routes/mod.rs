pub mod health;

use axum::{routing::get, Router};

use crate::experiment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/experiments/latest",
            get(handlers::handle_latest_report),
        )
        .route(
            "/api/v1/experiments/latest/winner",
            get(handlers::handle_latest_winner),
        )
        .route(
            "/api/v1/prompts/:strategy",
            get(handlers::handle_prompt_preview),
        )
        .with_state(state)
}
