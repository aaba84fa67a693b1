//! Application configuration.
//!
//! Loaded from an optional `gaitscout.toml` file, then overridden by
//! environment variables (`GAITSCOUT_*`). A `.env` file is honoured via
//! dotenvy.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GaitscoutError, Result};

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding candidates.json / library.json / feedback.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the web server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Optional NCBI API key for higher PubMed rate limits
    pub pubmed_api_key: Option<String>,

    /// Contact email sent in User-Agent headers (API etiquette)
    #[serde(default = "default_contact_email")]
    pub contact_email: String,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub throttle: ThrottleConfig,
}

/// Limits for the user-facing refresh operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Max refresh invocations per caller per rolling 60-second window
    pub max_per_minute: usize,
    /// Overall timeout for one refresh run, in seconds
    pub timeout_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { max_per_minute: 2, timeout_secs: 120 }
    }
}

/// Self-throttling parameters for external API clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum interval between consecutive calls to one provider, in ms
    pub min_interval_ms: u64,
    /// Bounded retry count on rate-limit / server-error responses
    pub max_retries: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { min_interval_ms: 1000, max_retries: 3 }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_contact_email() -> String {
    "gaitscout@example.com".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_addr: default_bind_addr(),
            pubmed_api_key: None,
            contact_email: default_contact_email(),
            refresh: RefreshConfig::default(),
            throttle: ThrottleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults ← optional TOML file ← environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg = match path {
            Some(p) if p.exists() => Self::from_toml_file(p)?,
            Some(p) => {
                return Err(GaitscoutError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )))
            }
            None => {
                let default_path = Path::new("gaitscout.toml");
                if default_path.exists() {
                    Self::from_toml_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        cfg.apply_env();
        Ok(cfg)
    }

    fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| GaitscoutError::Config(format!("{}: {e}", path.display())))
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("GAITSCOUT_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("GAITSCOUT_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Ok(v) = std::env::var("GAITSCOUT_PUBMED_API_KEY") {
            if !v.is_empty() {
                self.pubmed_api_key = Some(v);
            }
        }
        if let Ok(v) = std::env::var("GAITSCOUT_CONTACT_EMAIL") {
            self.contact_email = v;
        }
    }
}
