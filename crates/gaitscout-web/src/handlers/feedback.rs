//! Feedback submission and history.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use gaitscout_common::ApiError;
use gaitscout_store::{
    CandidateStatus, FeedbackEvent, FeedbackLabel, LibraryItem, ScoresSnapshot,
};

use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub paper_id: String,
    #[serde(default)]
    pub query_id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub reason_tags: Vec<String>,
    #[serde(default)]
    pub free_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub event_id: String,
    pub message: String,
}

fn parse_label(s: &str) -> Result<FeedbackLabel, ApiError> {
    match s {
        "accept" => Ok(FeedbackLabel::Accept),
        "reject" => Ok(FeedbackLabel::Reject),
        _ => Err(ApiError::Validation(
            "Invalid label. Use 'accept' or 'reject'".into(),
        )),
    }
}

/// POST /api/feedback
///
/// Records a human decision. The snapshot of scores is taken from the
/// candidate at submission time; the event's query_id is always the
/// candidate's own, and a conflicting caller-supplied query_id is refused.
pub async fn submit_feedback(
    State(state): State<SharedState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let label = parse_label(&req.label)?;

    let candidate = state
        .stores
        .candidates
        .get(&req.paper_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Paper not found".into()))?;

    if let Some(requested) = req.query_id.as_deref() {
        if !requested.is_empty() && requested != candidate.query_id {
            return Err(ApiError::Validation(format!(
                "query_id mismatch: request={requested}, candidate={}",
                candidate.query_id
            )));
        }
    }

    let (retrieval_score, rank) = match (candidate.retrieval_score, candidate.rank) {
        (Some(score), Some(rank)) => (score, rank),
        _ => {
            return Err(ApiError::Validation(
                "Candidate missing required fields (retrieval_score or rank). \
                 Cannot record feedback."
                    .into(),
            ))
        }
    };

    // Transition first so feedback is never recorded against a candidate
    // already in a terminal state.
    let new_status = match label {
        FeedbackLabel::Accept => CandidateStatus::Accepted,
        FeedbackLabel::Reject => CandidateStatus::Rejected,
    };
    state
        .stores
        .candidates
        .update_status(&req.paper_id, new_status)
        .await?;

    let event = FeedbackEvent::new(
        req.paper_id.clone(),
        candidate.query_id.clone(),
        label,
        req.reason_tags,
        req.free_text,
        ScoresSnapshot {
            retrieval_score,
            rerank_score: candidate.rerank_score,
            rank,
        },
    );
    let event_id = state.stores.feedback.append(event).await?;

    let message = match label {
        FeedbackLabel::Accept => {
            state
                .stores
                .library
                .add(LibraryItem::from_candidate(&candidate))
                .await?;
            "Paper accepted and added to library"
        }
        FeedbackLabel::Reject => "Paper rejected",
    };

    info!(paper_id = %req.paper_id, label = ?label, event_id, "Feedback recorded");

    Ok(Json(FeedbackResponse {
        success: true,
        event_id,
        message: message.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub since: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub items: Vec<FeedbackEvent>,
    pub total: usize,
}

/// GET /api/feedback
pub async fn feedback_history(
    State(state): State<SharedState>,
    Query(q): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.stores.feedback.list(q.since.as_deref()).await;
    let total = items.len();
    Ok(Json(HistoryResponse { items, total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::extract::State;

    use gaitscout_common::AppConfig;
    use gaitscout_store::CandidatePaper;

    use crate::state::AppState;

    fn candidate(id: &str) -> CandidatePaper {
        CandidatePaper {
            paper_id: id.into(),
            title: format!("Paper {id}"),
            authors: vec!["A. Author".into()],
            year: 2021,
            abstract_text: String::new(),
            venue: None,
            doi: None,
            url_landing: None,
            keywords: vec![],
            query_id: "q_20240101000000_abc123".into(),
            query_text: String::new(),
            retrieval_score: Some(0.7),
            rerank_score: None,
            accept_prob: None,
            rank: Some(1),
            source: "arxiv".into(),
            retrieved_at: String::new(),
            status: CandidateStatus::Pending,
            fingerprint: String::new(),
            is_duplicate_of: None,
            gate_level: "system".into(),
            keywords_hit: vec![],
            tags: vec![],
            system_score: 2.0,
            app_heavy: false,
            tag_evidence: BTreeMap::new(),
            exclude_hit: None,
        }
        .finalize()
    }

    fn request(paper_id: &str, query_id: Option<&str>, label: &str) -> FeedbackRequest {
        FeedbackRequest {
            paper_id: paper_id.into(),
            query_id: query_id.map(String::from),
            label: label.into(),
            reason_tags: vec![],
            free_text: None,
        }
    }

    async fn seeded_state() -> (SharedState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let state = Arc::new(AppState::new(config));
        state
            .stores
            .candidates
            .add_batch(vec![candidate("p1")])
            .await
            .unwrap();
        (state, dir)
    }

    #[test]
    fn test_label_parsing() {
        assert!(matches!(parse_label("accept"), Ok(FeedbackLabel::Accept)));
        assert!(matches!(parse_label("reject"), Ok(FeedbackLabel::Reject)));
        assert!(parse_label("maybe").is_err());
        assert!(parse_label("Accept").is_err());
    }

    #[tokio::test]
    async fn test_mismatched_query_id_is_rejected() {
        let (state, _dir) = seeded_state().await;
        let req = request("p1", Some("q_other"), "accept");

        let err = submit_feedback(State(state.clone()), Json(req)).await;
        assert!(matches!(err, Err(ApiError::Validation(_))));
        assert!(state.stores.feedback.list(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_paper_is_not_found() {
        let (state, _dir) = seeded_state().await;
        let req = request("missing", None, "reject");

        let err = submit_feedback(State(state), Json(req)).await;
        assert!(matches!(err, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_accept_snapshots_scores_and_fills_library() {
        let (state, _dir) = seeded_state().await;
        let req = request("p1", Some("q_20240101000000_abc123"), "accept");

        submit_feedback(State(state.clone()), Json(req)).await.unwrap();

        let events = state.stores.feedback.list(None).await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].scores_snapshot,
            ScoresSnapshot { retrieval_score: 0.7, rerank_score: None, rank: 1 }
        );
        assert_eq!(events[0].query_id, "q_20240101000000_abc123");

        let stored = state.stores.candidates.get("p1").await.unwrap();
        assert_eq!(stored.status, CandidateStatus::Accepted);
        assert_eq!(state.stores.library.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_double_accept_leaves_one_library_entry() {
        let (state, _dir) = seeded_state().await;

        submit_feedback(State(state.clone()), Json(request("p1", None, "accept")))
            .await
            .unwrap();
        let second = submit_feedback(State(state.clone()), Json(request("p1", None, "accept"))).await;

        assert!(matches!(second, Err(ApiError::Validation(_))));
        assert_eq!(state.stores.library.list().await.len(), 1);
        assert_eq!(state.stores.feedback.list(None).await.len(), 1);
    }

    #[tokio::test]
    async fn test_candidate_without_score_or_rank_is_refused() {
        let (state, _dir) = seeded_state().await;
        // Records written before scoring existed carry neither field.
        let mut legacy = candidate("p2");
        legacy.retrieval_score = None;
        legacy.rank = None;
        state.stores.candidates.add_batch(vec![legacy]).await.unwrap();

        let err = submit_feedback(State(state.clone()), Json(request("p2", None, "accept"))).await;

        assert!(matches!(err, Err(ApiError::Validation(_))));
        assert!(state.stores.feedback.list(None).await.is_empty());
        assert!(state.stores.library.list().await.is_empty());
        let stored = state.stores.candidates.get("p2").await.unwrap();
        assert_eq!(stored.status, CandidateStatus::Pending);
    }

    #[tokio::test]
    async fn test_reject_does_not_touch_the_library() {
        let (state, _dir) = seeded_state().await;

        submit_feedback(State(state.clone()), Json(request("p1", None, "reject")))
            .await
            .unwrap();

        let stored = state.stores.candidates.get("p1").await.unwrap();
        assert_eq!(stored.status, CandidateStatus::Rejected);
        assert!(state.stores.library.list().await.is_empty());
    }
}
