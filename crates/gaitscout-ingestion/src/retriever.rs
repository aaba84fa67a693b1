//! Candidate generation: fan out to the search sources, screen, and store.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use gaitscout_common::{AppConfig, Result};
use gaitscout_store::{CandidatePaper, CandidateStatus, CandidateStore};

use crate::sources::{
    arxiv::ArxivClient, fetch_screened, pubmed::PubMedClient,
    semanticscholar::SemanticScholarClient, ScreenedPaper, SearchSource,
};
use crate::throttle::RateLimiter;

const DEFAULT_QUERY_TEXT: &str = "gait analysis system (auto-generated)";

/// Knobs for one retrieval round.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalOptions {
    /// Per-source result cap.
    pub max_results: usize,
    /// Which sources to query. Unknown names are ignored.
    pub sources: Vec<String>,
    /// Replaces the canonical query pair on every source when set.
    pub query_override: Option<String>,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            sources: vec!["arxiv".into(), "pubmed".into(), "semanticscholar".into()],
            query_override: None,
        }
    }
}

/// Per-source result annotation: a count on success, a reason on failure.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SourceOutcome {
    Fetched(usize),
    Failed(String),
}

/// Summary of one retrieval round.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalReport {
    pub query_id: String,
    /// New candidates registered (duplicates excluded).
    pub added: usize,
    /// Papers that passed screening across all sources, duplicates included.
    pub total_retrieved: usize,
    pub by_source: BTreeMap<String, SourceOutcome>,
}

/// Time-sortable query identifier: `q_{UTC second stamp}_{6 hex}`.
pub fn generate_query_id() -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix = &Uuid::new_v4().simple().to_string()[..6];
    format!("q_{stamp}_{suffix}")
}

/// Owns the three source clients and drives retrieval rounds.
pub struct Retriever {
    arxiv: ArxivClient,
    pubmed: PubMedClient,
    semantic_scholar: SemanticScholarClient,
}

impl Retriever {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("gaitscout/0.1 (mailto:{})", config.contact_email))
            .build()
            .unwrap_or_default();
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
            config.throttle.min_interval_ms,
        )));

        Self {
            arxiv: ArxivClient::new(client.clone()),
            pubmed: PubMedClient::new(client.clone(), config.pubmed_api_key.clone()),
            semantic_scholar: SemanticScholarClient::new(
                client,
                limiter,
                config.throttle.max_retries,
            ),
        }
    }

    /// Run one retrieval round and append the results to the store.
    /// Source failures degrade to per-source annotations; the round as a
    /// whole only fails if the store write does.
    #[instrument(skip(self, store))]
    pub async fn generate_candidates(
        &self,
        store: &CandidateStore,
        opts: &RetrievalOptions,
    ) -> Result<RetrievalReport> {
        let query_id = generate_query_id();
        let query_text = opts
            .query_override
            .clone()
            .unwrap_or_else(|| DEFAULT_QUERY_TEXT.to_string());

        let (arxiv, pubmed, semantic) = tokio::join!(
            self.run_source(&self.arxiv, opts),
            self.run_source(&self.pubmed, opts),
            self.run_source(&self.semantic_scholar, opts),
        );

        let mut by_source = BTreeMap::new();
        let mut candidates: Vec<CandidatePaper> = Vec::new();
        let mut rank = 0i64;

        for (name, result) in [
            ("arxiv", arxiv),
            ("pubmed", pubmed),
            ("semanticscholar", semantic),
        ] {
            let Some(result) = result else { continue };
            match result {
                Ok(screened) => {
                    by_source.insert(name.to_string(), SourceOutcome::Fetched(screened.len()));
                    for paper in screened {
                        rank += 1;
                        candidates.push(to_candidate(paper, &query_id, &query_text, rank, name));
                    }
                }
                Err(e) => {
                    warn!(source = name, error = %e, "Source failed, continuing without it");
                    by_source.insert(name.to_string(), SourceOutcome::Failed(format!("error: {e}")));
                }
            }
        }

        let total_retrieved = candidates.len();
        let report = store.add_batch(candidates).await?;

        info!(
            query_id,
            added = report.added,
            total_retrieved,
            "Retrieval round complete"
        );

        Ok(RetrievalReport {
            query_id,
            added: report.added,
            total_retrieved,
            by_source,
        })
    }

    /// None when the source was not requested.
    async fn run_source(
        &self,
        source: &dyn SearchSource,
        opts: &RetrievalOptions,
    ) -> Option<anyhow::Result<Vec<ScreenedPaper>>> {
        if !opts.sources.iter().any(|s| s == source.name()) {
            return None;
        }
        Some(fetch_screened(source, opts.query_override.as_deref(), opts.max_results).await)
    }
}

/// Map a screened paper into a stored candidate. The retrieval score is a
/// monotone function of the system score, floored at 0.1.
fn to_candidate(
    paper: ScreenedPaper,
    query_id: &str,
    query_text: &str,
    rank: i64,
    source: &str,
) -> CandidatePaper {
    let ScreenedPaper { raw, outcome } = paper;
    let retrieval_score = f64::max(0.5 + outcome.system_score * 0.1, 0.1);

    CandidatePaper {
        paper_id: raw.paper_id,
        title: raw.title,
        authors: raw.authors,
        year: raw.year,
        abstract_text: raw.abstract_text,
        venue: raw.venue,
        doi: raw.doi,
        url_landing: raw.url_landing,
        keywords: outcome.keywords_hit.clone(),
        query_id: query_id.to_string(),
        query_text: query_text.to_string(),
        retrieval_score: Some(retrieval_score),
        rerank_score: None,
        accept_prob: None,
        rank: Some(rank),
        source: source.to_string(),
        retrieved_at: String::new(),
        status: CandidateStatus::Pending,
        fingerprint: String::new(),
        is_duplicate_of: None,
        gate_level: outcome.gate_level.as_str().to_string(),
        keywords_hit: outcome.keywords_hit,
        tags: outcome.tags.iter().map(|t| t.as_str().to_string()).collect(),
        system_score: outcome.system_score,
        app_heavy: outcome.app_heavy,
        tag_evidence: outcome.tag_evidence,
        exclude_hit: outcome.exclude_hit,
    }
    .finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaitscout_screen::{GateLevel, ScreenOutcome};
    use gaitscout_store::CandidateFilter;
    use crate::sources::RawPaper;

    fn screened(id: &str, system_score: f64) -> ScreenedPaper {
        ScreenedPaper {
            raw: RawPaper {
                paper_id: id.into(),
                title: format!("Paper {id}"),
                authors: vec!["A. Author".into()],
                year: 2021,
                abstract_text: "A gait software system.".into(),
                venue: None,
                doi: None,
                url_landing: None,
            },
            outcome: ScreenOutcome {
                gate_level: GateLevel::System,
                keywords_hit: vec!["gait".into()],
                exclude_hit: None,
                tags: vec![],
                system_score,
                app_heavy: false,
                tag_evidence: BTreeMap::new(),
            },
        }
    }

    #[test]
    fn test_query_id_shape() {
        let id = generate_query_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "q");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_retrieval_score_tracks_system_score() {
        let c = to_candidate(screened("a", 3.0), "q1", "text", 1, "arxiv");
        assert_eq!(c.retrieval_score, Some(0.8));
        assert_eq!(c.rank, Some(1));
        assert_eq!(c.status, CandidateStatus::Pending);
        assert!(!c.fingerprint.is_empty());
        assert!(!c.retrieved_at.is_empty());
    }

    #[test]
    fn test_retrieval_score_is_floored() {
        // A deeply negative score still yields the 0.1 floor.
        let c = to_candidate(screened("a", -10.0), "q1", "text", 1, "arxiv");
        assert_eq!(c.retrieval_score, Some(0.1));
    }

    #[test]
    fn test_source_outcome_serializes_flat() {
        let mut by_source = BTreeMap::new();
        by_source.insert("arxiv".to_string(), SourceOutcome::Fetched(4));
        by_source.insert(
            "pubmed".to_string(),
            SourceOutcome::Failed("error: timeout".into()),
        );

        let json = serde_json::to_value(&by_source).unwrap();
        assert_eq!(json["arxiv"], 4);
        assert_eq!(json["pubmed"], "error: timeout");
    }

    #[tokio::test]
    async fn test_ranks_span_the_merged_stream() {
        let dir = tempfile::tempdir().unwrap();
        let store = CandidateStore::new(dir.path().join("candidates.json"));

        let batch: Vec<CandidatePaper> = (0..3)
            .map(|i| {
                to_candidate(
                    screened(&format!("p{i}"), 1.0),
                    "q1",
                    "text",
                    i as i64 + 1,
                    "arxiv",
                )
            })
            .collect();
        store.add_batch(batch).await.unwrap();

        let stored = store.list(&CandidateFilter::default()).await;
        let mut ranks: Vec<i64> = stored.iter().filter_map(|c| c.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);
    }
}
