//! Shared application state for the web server.

use std::sync::Arc;
use std::time::Duration;

use gaitscout_common::AppConfig;
use gaitscout_ingestion::Retriever;
use gaitscout_store::Stores;

use crate::ratelimit::RollingWindow;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: AppConfig,
    pub stores: Stores,
    pub retriever: Retriever,
    /// Per-IP limit on refresh rounds.
    pub refresh_limiter: RollingWindow,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let stores = Stores::open(&config.data_dir);
        let retriever = Retriever::new(&config);
        let refresh_limiter =
            RollingWindow::new(config.refresh.max_per_minute, Duration::from_secs(60));

        Self { config, stores, retriever, refresh_limiter }
    }
}

pub type SharedState = Arc<AppState>;
