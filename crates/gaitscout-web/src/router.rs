//! Axum router — maps all URL paths to handlers.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    candidates::{get_candidate, list_candidates, refresh_candidates},
    feedback::{feedback_history, submit_feedback},
    learn::run_learning,
    library::list_library,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/api/candidates",            get(list_candidates))
        .route("/api/candidates/{paper_id}", get(get_candidate))
        .route("/api/candidates/refresh",    post(refresh_candidates))
        .route("/api/feedback",              get(feedback_history).post(submit_feedback))
        .route("/api/library",               get(list_library))
        .route("/api/learn/run",             post(run_learning))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
