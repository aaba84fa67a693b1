//! gaitscout-store — Data models and whole-file JSON persistence for the
//! triage queue.
//!
//! Three independent collections (candidates, library, feedback), each a
//! flat JSON array rewritten as a whole on every mutation. Every store
//! holds its own async mutex across the full load-modify-save cycle, so
//! concurrent handlers cannot lose updates to each other.

pub mod fingerprint;
pub mod models;
pub mod store;

pub use models::{
    CandidatePaper, CandidateStatus, FeedbackEvent, FeedbackLabel, LibraryItem, ScoresSnapshot,
};
pub use store::{AddReport, CandidateFilter, CandidateStore, FeedbackStore, LibraryStore, Stores};
