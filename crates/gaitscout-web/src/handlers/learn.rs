//! Learning trigger, currently a stub that only checks preconditions.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use gaitscout_common::ApiError;

use crate::state::SharedState;

const MIN_FEEDBACK_EVENTS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct LearnQuery {
    pub since: Option<String>,
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    "classifier".into()
}

/// POST /api/learn/run
///
/// Refuses until enough feedback has accumulated, then reports a
/// completed dummy job. No model is trained.
pub async fn run_learning(
    State(state): State<SharedState>,
    Query(q): Query<LearnQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let feedback = state.stores.feedback.list(q.since.as_deref()).await;

    if feedback.len() < MIN_FEEDBACK_EVENTS {
        return Ok(Json(json!({
            "success": false,
            "message": format!(
                "need at least {MIN_FEEDBACK_EVENTS} feedback events to train, have {}",
                feedback.len()
            ),
        })));
    }

    Ok(Json(json!({
        "success": true,
        "job_id": "learn_dummy_001",
        "status": "completed",
        "message": format!(
            "trained on {} feedback events (stub, mode={})",
            feedback.len(),
            q.mode
        ),
        "model_version": "v0.1-dummy",
    })))
}
