//! gaitscout-ingestion — Candidate retrieval from academic search APIs.
//!
//! Three source adapters (arXiv, PubMed, Semantic Scholar) behind one
//! `SearchSource` trait, each issuing the dual canonical query pair and
//! screening results before they reach the store. The retriever fans out
//! to all requested sources concurrently and tolerates per-source failure.

pub mod queries;
pub mod retriever;
pub mod sources;
pub mod throttle;

pub use retriever::{RetrievalOptions, RetrievalReport, Retriever, SourceOutcome};
pub use sources::{RawPaper, ScreenedPaper, SearchSource};
pub use throttle::RateLimiter;
