//! Whole-file JSON stores with per-store mutual exclusion.
//!
//! Each collection is one JSON array on disk. Mutations are
//! load-modify-save under the store's own `tokio::sync::Mutex`, so two
//! handlers can never interleave a read-modify-write on the same file.
//! Malformed or missing files read as empty collections, never as errors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use gaitscout_common::{GaitscoutError, Result};

use crate::models::{CandidatePaper, CandidateStatus, FeedbackEvent, LibraryItem};

// ── File helpers ──────────────────────────────────────────────────────────────

async fn load_vec<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed store file, treating as empty");
                Vec::new()
            }
        },
        Err(_) => Vec::new(),
    }
}

async fn save_vec<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let raw = serde_json::to_string_pretty(items)?;
    tokio::fs::write(path, raw).await?;
    Ok(())
}

// ── Candidates ────────────────────────────────────────────────────────────────

/// Filters for listing candidates.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub status: Option<CandidateStatus>,
    pub query_id: Option<String>,
    /// Duplicate-status records are hidden from review by default.
    pub include_duplicates: bool,
}

/// Outcome of one dedup-aware batch add.
#[derive(Debug, Clone, Copy)]
pub struct AddReport {
    /// Newly registered candidates (fingerprint unseen before).
    pub added: usize,
    /// Records appended with duplicate status.
    pub duplicates: usize,
}

/// The candidate review queue.
pub struct CandidateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CandidateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    pub async fn list(&self, filter: &CandidateFilter) -> Vec<CandidatePaper> {
        let _guard = self.lock.lock().await;
        let all: Vec<CandidatePaper> = load_vec(&self.path).await;
        all.into_iter()
            .filter(|c| filter.include_duplicates || c.status != CandidateStatus::Duplicate)
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .filter(|c| {
                filter
                    .query_id
                    .as_deref()
                    .map_or(true, |q| c.query_id == q)
            })
            .collect()
    }

    /// Look up one candidate by paper_id. Duplicate-status records are not
    /// addressable for review.
    pub async fn get(&self, paper_id: &str) -> Option<CandidatePaper> {
        let _guard = self.lock.lock().await;
        let all: Vec<CandidatePaper> = load_vec(&self.path).await;
        all.into_iter()
            .find(|c| c.status != CandidateStatus::Duplicate && c.paper_id == paper_id)
    }

    /// Append a batch of scored candidates, marking fingerprint repeats as
    /// duplicates of the first-seen owner. Never drops a record; duplicates
    /// stay queryable for audit and do not count toward `added`.
    pub async fn add_batch(&self, batch: Vec<CandidatePaper>) -> Result<AddReport> {
        let _guard = self.lock.lock().await;
        let mut all: Vec<CandidatePaper> = load_vec(&self.path).await;

        // First occurrence of each fingerprint owns it, duplicates included
        // so re-running the same query keeps pointing at the original owner.
        let mut owner_by_fp: HashMap<String, String> = HashMap::new();
        for c in &all {
            owner_by_fp
                .entry(c.fingerprint.clone())
                .or_insert_with(|| c.paper_id.clone());
        }

        let mut report = AddReport { added: 0, duplicates: 0 };

        for mut c in batch {
            match owner_by_fp.get(&c.fingerprint) {
                Some(owner) => {
                    c.status = CandidateStatus::Duplicate;
                    c.is_duplicate_of = Some(owner.clone());
                    report.duplicates += 1;
                    all.push(c);
                }
                None => {
                    owner_by_fp.insert(c.fingerprint.clone(), c.paper_id.clone());
                    report.added += 1;
                    all.push(c);
                }
            }
        }

        save_vec(&self.path, &all).await?;
        debug!(added = report.added, duplicates = report.duplicates, "Candidate batch stored");
        Ok(report)
    }

    /// Transition a pending candidate to accepted or rejected.
    /// Terminal states (accepted, rejected, duplicate) never transition.
    pub async fn update_status(&self, paper_id: &str, status: CandidateStatus) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut all: Vec<CandidatePaper> = load_vec(&self.path).await;

        let candidate = all
            .iter_mut()
            .find(|c| c.status != CandidateStatus::Duplicate && c.paper_id == paper_id)
            .ok_or_else(|| GaitscoutError::NotFound(format!("candidate {paper_id}")))?;

        if candidate.status != CandidateStatus::Pending {
            return Err(GaitscoutError::Validation(format!(
                "candidate {paper_id} is already {}, cannot transition to {}",
                candidate.status.as_str(),
                status.as_str()
            )));
        }

        candidate.status = status;
        save_vec(&self.path, &all).await
    }
}

// ── Library ───────────────────────────────────────────────────────────────────

/// The accepted-paper reference library. Append-only, unique by paper_id.
pub struct LibraryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LibraryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    pub async fn list(&self) -> Vec<LibraryItem> {
        let _guard = self.lock.lock().await;
        load_vec(&self.path).await
    }

    /// Idempotent append: returns false without writing if the paper_id is
    /// already present.
    pub async fn add(&self, item: LibraryItem) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut all: Vec<LibraryItem> = load_vec(&self.path).await;

        if all.iter().any(|i| i.paper_id == item.paper_id) {
            return Ok(false);
        }

        all.push(item);
        save_vec(&self.path, &all).await?;
        Ok(true)
    }
}

// ── Feedback ──────────────────────────────────────────────────────────────────

/// Append-only human decision log.
pub struct FeedbackStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FeedbackStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    /// List events, optionally only those at or after an RFC 3339 timestamp
    /// (lexicographic comparison, which is order-preserving for RFC 3339).
    pub async fn list(&self, since: Option<&str>) -> Vec<FeedbackEvent> {
        let _guard = self.lock.lock().await;
        let all: Vec<FeedbackEvent> = load_vec(&self.path).await;
        match since {
            Some(ts) => all.into_iter().filter(|f| f.created_at.as_str() >= ts).collect(),
            None => all,
        }
    }

    pub async fn append(&self, event: FeedbackEvent) -> Result<String> {
        let _guard = self.lock.lock().await;
        let mut all: Vec<FeedbackEvent> = load_vec(&self.path).await;
        let event_id = event.event_id.clone();
        all.push(event);
        save_vec(&self.path, &all).await?;
        Ok(event_id)
    }
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

/// All three stores rooted at one data directory.
pub struct Stores {
    pub candidates: CandidateStore,
    pub library: LibraryStore,
    pub feedback: FeedbackStore,
}

impl Stores {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            candidates: CandidateStore::new(data_dir.join("candidates.json")),
            library: LibraryStore::new(data_dir.join("library.json")),
            feedback: FeedbackStore::new(data_dir.join("feedback.json")),
        }
    }
}
