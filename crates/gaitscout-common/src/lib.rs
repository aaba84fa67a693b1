//! gaitscout-common — Shared error types and configuration used across all Gaitscout crates.

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{ApiError, GaitscoutError, Result};
