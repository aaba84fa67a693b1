//! Candidate queue endpoints: listing, detail, and refresh.

use std::cmp::Ordering;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use gaitscout_common::ApiError;
use gaitscout_ingestion::{RetrievalOptions, RetrievalReport};
use gaitscout_store::{CandidateFilter, CandidatePaper, CandidateStatus};

use super::{Page, Pagination};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CandidateQuery {
    pub status: Option<String>,
    pub query_id: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn parse_status(s: &str) -> Result<CandidateStatus, ApiError> {
    match s {
        "pending"   => Ok(CandidateStatus::Pending),
        "accepted"  => Ok(CandidateStatus::Accepted),
        "rejected"  => Ok(CandidateStatus::Rejected),
        "duplicate" => Ok(CandidateStatus::Duplicate),
        other => Err(ApiError::Validation(format!("unknown status: {other}"))),
    }
}

/// Review ordering: application-heavy papers sink, then higher system
/// score first, then retrieval score, accept probability, and finally
/// rank and paper_id as stable tie-breaks.
pub fn sort_for_review(items: &mut [CandidatePaper]) {
    fn desc(a: f64, b: f64) -> Ordering {
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    }

    items.sort_by(|a, b| {
        a.app_heavy
            .cmp(&b.app_heavy)
            .then(desc(a.system_score, b.system_score))
            .then(desc(a.retrieval_score.unwrap_or(0.0), b.retrieval_score.unwrap_or(0.0)))
            .then(desc(a.accept_prob.unwrap_or(0.0), b.accept_prob.unwrap_or(0.0)))
            .then(a.rank.unwrap_or(i64::MAX).cmp(&b.rank.unwrap_or(i64::MAX)))
            .then(a.paper_id.cmp(&b.paper_id))
    });
}

/// GET /api/candidates
pub async fn list_candidates(
    State(state): State<SharedState>,
    Query(q): Query<CandidateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, page_size) = Pagination { page: q.page, page_size: q.page_size }.resolve()?;
    let status = q.status.as_deref().map(parse_status).transpose()?;

    let filter = CandidateFilter {
        status,
        query_id: q.query_id,
        include_duplicates: status == Some(CandidateStatus::Duplicate),
    };

    let mut candidates = state.stores.candidates.list(&filter).await;
    sort_for_review(&mut candidates);

    Ok(Json(Page::slice(candidates, page, page_size)))
}

/// GET /api/candidates/{paper_id}
pub async fn get_candidate(
    State(state): State<SharedState>,
    Path(paper_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let candidate = state
        .stores
        .candidates
        .get(&paper_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Paper not found".into()))?;
    Ok(Json(candidate))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefreshRequest {
    pub max_results: usize,
    pub sources: Vec<String>,
    pub query_override: Option<String>,
}

impl Default for RefreshRequest {
    fn default() -> Self {
        Self {
            max_results: 5,
            sources: vec!["arxiv".into(), "pubmed".into(), "semanticscholar".into()],
            query_override: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: RetrievalReport,
}

/// POST /api/candidates/refresh
///
/// Runs one retrieval round. Throttled per client IP; the whole round is
/// bounded by the configured timeout and surfaces as 504 when exceeded.
pub async fn refresh_candidates(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Option<Json<RefreshRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.unwrap_or_default();

    if let Err(retry_after_secs) = state.refresh_limiter.check(addr.ip()).await {
        return Err(ApiError::RateLimited { retry_after_secs });
    }

    let opts = RetrievalOptions {
        max_results: req.max_results,
        sources: req.sources,
        query_override: req.query_override,
    };

    info!(ip = %addr.ip(), max_results = opts.max_results, "Refresh round requested");

    let timeout = Duration::from_secs(state.config.refresh.timeout_secs);
    let report = tokio::time::timeout(
        timeout,
        state.retriever.generate_candidates(&state.stores.candidates, &opts),
    )
    .await
    .map_err(|_| ApiError::Timeout("retrieval timed out, try again later".into()))??;

    Ok(Json(RefreshResponse { success: true, report }))
}
