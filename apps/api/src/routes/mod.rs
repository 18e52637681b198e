pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailoring::handlers;
use crate::usage::handlers as usage_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tailoring (quota-gated)
        .route("/api/v1/tailor/resume", post(handlers::handle_tailor_resume))
        .route(
            "/api/v1/tailor/cover-letter",
            post(handlers::handle_cover_letter),
        )
        // Analysis of caller-supplied text
        .route("/api/v1/jobs/analyze", post(handlers::handle_analyze_job))
        .route("/api/v1/match-score", post(handlers::handle_match_score))
        .route("/api/v1/ats/optimize", post(handlers::handle_ats_optimize))
        // Documents
        .route(
            "/api/v1/documents/:id",
            get(handlers::handle_get_document).patch(handlers::handle_update_document),
        )
        // Usage
        .route("/api/v1/usage", get(usage_handlers::handle_get_usage))
        .with_state(state)
}
