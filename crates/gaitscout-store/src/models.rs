//! Persisted record shapes for the triage queue.
//!
//! Records are flat JSON objects. Fields added after the first release are
//! `#[serde(default)]` so older persisted files keep deserializing.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::fingerprint;

/// Review status of a candidate.
///
/// `pending → {accepted, rejected}`; `duplicate` is assigned at creation
/// time only and nothing transitions out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Pending,
    Accepted,
    Rejected,
    Duplicate,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Pending   => "pending",
            CandidateStatus::Accepted  => "accepted",
            CandidateStatus::Rejected  => "rejected",
            CandidateStatus::Duplicate => "duplicate",
        }
    }
}

/// Human decision label on a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLabel {
    Accept,
    Reject,
}

/// A retrieved paper awaiting human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePaper {
    pub paper_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    #[serde(default)]
    pub abstract_text: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url_landing: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,

    // Retrieval metadata
    #[serde(default)]
    pub query_id: String,
    #[serde(default)]
    pub query_text: String,
    #[serde(default)]
    pub retrieval_score: Option<f64>,
    #[serde(default)]
    pub rerank_score: Option<f64>,
    #[serde(default)]
    pub accept_prob: Option<f64>,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub retrieved_at: String,

    // Status and dedup
    pub status: CandidateStatus,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub is_duplicate_of: Option<String>,

    // Classification outputs
    #[serde(default)]
    pub gate_level: String,
    #[serde(default)]
    pub keywords_hit: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub system_score: f64,
    #[serde(default)]
    pub app_heavy: bool,
    #[serde(default)]
    pub tag_evidence: BTreeMap<String, String>,
    #[serde(default)]
    pub exclude_hit: Option<String>,
}

impl CandidatePaper {
    /// Fill derived fields not set at construction: fingerprint and
    /// retrieval timestamp.
    pub fn finalize(mut self) -> Self {
        if self.fingerprint.is_empty() {
            self.fingerprint = fingerprint::fingerprint(&self.title, self.year, &self.authors);
        }
        if self.retrieved_at.is_empty() {
            self.retrieved_at = Utc::now().to_rfc3339();
        }
        self
    }
}

/// An accepted paper promoted to the reference library.
/// Uniqueness is by `paper_id` only, unlike candidate dedup which is by
/// content fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryItem {
    pub paper_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    #[serde(default)]
    pub abstract_text: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url_landing: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub query_id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub gate_level: String,
    #[serde(default)]
    pub added_at: String,
    #[serde(default = "default_added_by")]
    pub added_by: String,
}

fn default_added_by() -> String {
    "human".to_string()
}

impl LibraryItem {
    /// Build a library entry from an accepted candidate.
    pub fn from_candidate(c: &CandidatePaper) -> Self {
        Self {
            paper_id: c.paper_id.clone(),
            title: c.title.clone(),
            authors: c.authors.clone(),
            year: c.year,
            abstract_text: c.abstract_text.clone(),
            venue: c.venue.clone(),
            doi: c.doi.clone(),
            url_landing: c.url_landing.clone(),
            keywords: c.keywords.clone(),
            query_id: c.query_id.clone(),
            source: c.source.clone(),
            gate_level: c.gate_level.clone(),
            added_at: Utc::now().to_rfc3339(),
            added_by: default_added_by(),
        }
    }
}

/// Scores captured at the moment a decision was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoresSnapshot {
    pub retrieval_score: f64,
    #[serde(default)]
    pub rerank_score: Option<f64>,
    pub rank: i64,
}

/// Immutable record of one human accept/reject decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub event_id: String,
    pub paper_id: String,
    pub query_id: String,
    pub label: FeedbackLabel,
    #[serde(default)]
    pub reason_tags: Vec<String>,
    #[serde(default)]
    pub free_text: Option<String>,
    pub scores_snapshot: ScoresSnapshot,
    pub created_at: String,
    #[serde(default = "default_added_by")]
    pub created_by: String,
}

impl FeedbackEvent {
    /// Create a feedback event, stamping created_at and deriving event_id.
    pub fn new(
        paper_id: String,
        query_id: String,
        label: FeedbackLabel,
        reason_tags: Vec<String>,
        free_text: Option<String>,
        scores_snapshot: ScoresSnapshot,
    ) -> Self {
        let created_at = Utc::now().to_rfc3339();
        let event_id = fingerprint::event_id(&paper_id, &created_at);
        Self {
            event_id,
            paper_id,
            query_id,
            label,
            reason_tags,
            free_text,
            scores_snapshot,
            created_at,
            created_by: default_added_by(),
        }
    }
}
