//! Semantic Scholar Graph API client.
//!
//! Endpoint: https://api.semanticscholar.org/graph/v1/paper/search
//!
//! The public tier rate-limits aggressively, so every call goes through a
//! minimum-interval throttle and 429/5xx responses retry with exponential
//! backoff (10s, 20s, 40s).

use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::{RawPaper, SearchSource};
use crate::queries;
use crate::throttle::{backoff_delay, RateLimiter};

const SS_SEARCH_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
const SS_FIELDS: &str =
    "title,abstract,authors,year,venue,citationCount,url,externalIds,publicationTypes";

pub struct SemanticScholarClient {
    client: Client,
    limiter: Arc<RateLimiter>,
    max_retries: u32,
}

impl SemanticScholarClient {
    pub fn new(client: Client, limiter: Arc<RateLimiter>, max_retries: u32) -> Self {
        Self { client, limiter, max_retries }
    }
}

#[async_trait]
impl SearchSource for SemanticScholarClient {
    fn name(&self) -> &'static str {
        "semanticscholar"
    }

    fn default_queries(&self) -> Vec<String> {
        vec![
            queries::SEMANTIC_SCHOLAR_SYSTEM.to_string(),
            queries::SEMANTIC_SCHOLAR_PIPELINE.to_string(),
        ]
    }

    fn overfetch_factor(&self) -> usize {
        2
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<RawPaper>> {
        let params = [
            ("query", query),
            ("fields", SS_FIELDS),
            ("offset", "0"),
            ("limit", &limit.to_string()),
        ];

        for retry in 0..=self.max_retries {
            if retry > 0 {
                let wait = backoff_delay(retry);
                warn!(retry, ?wait, "Retrying Semantic Scholar after backoff");
                tokio::time::sleep(wait).await;
            }

            self.limiter.acquire().await;

            let resp = self.client.get(SS_SEARCH_URL).query(&params).send().await?;
            let status = resp.status();

            if status.is_success() {
                let body: serde_json::Value = resp.json().await?;
                let papers = parse_search_response(&body);
                debug!(count = papers.len(), "Semantic Scholar search returned papers");
                return Ok(papers);
            }

            if status.as_u16() == 429 || status.is_server_error() {
                warn!(%status, "Semantic Scholar transient error");
                continue;
            }

            bail!("Semantic Scholar returned HTTP {status}");
        }

        bail!("Semantic Scholar retries exhausted")
    }
}

/// Extract RawPaper records from a Graph API search response.
/// Falls back to a DOI link when the record carries no URL.
fn parse_search_response(body: &serde_json::Value) -> Vec<RawPaper> {
    let results = body["data"].as_array().cloned().unwrap_or_default();

    results
        .iter()
        .filter_map(|r| {
            let paper_id = r["paperId"].as_str()?.to_string();

            let authors = r["authors"]
                .as_array()
                .unwrap_or(&vec![])
                .iter()
                .filter_map(|a| a["name"].as_str().map(String::from))
                .collect();

            let doi = r["externalIds"]["DOI"].as_str().map(String::from);
            let url = match r["url"].as_str() {
                Some(u) if !u.is_empty() => Some(u.to_string()),
                _ => doi.as_ref().map(|d| format!("https://doi.org/{d}")),
            };

            Some(RawPaper {
                paper_id,
                title: r["title"].as_str().unwrap_or("").to_string(),
                authors,
                year: r["year"].as_i64().unwrap_or(0) as i32,
                abstract_text: r["abstract"].as_str().unwrap_or("").to_string(),
                venue: r["venue"].as_str().filter(|v| !v.is_empty()).map(String::from),
                doi,
                url_landing: url,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_response() {
        let body = json!({
            "total": 1,
            "data": [{
                "paperId": "abc123",
                "title": "A gait analysis platform",
                "abstract": "Open-source software.",
                "year": 2020,
                "venue": "Sensors",
                "url": "https://www.semanticscholar.org/paper/abc123",
                "authors": [{"authorId": "1", "name": "Jane Roe"}],
                "externalIds": {"DOI": "10.3390/s20010001"}
            }]
        });

        let papers = parse_search_response(&body);
        assert_eq!(papers.len(), 1);
        let p = &papers[0];
        assert_eq!(p.paper_id, "abc123");
        assert_eq!(p.year, 2020);
        assert_eq!(p.venue.as_deref(), Some("Sensors"));
        assert_eq!(p.authors, vec!["Jane Roe"]);
        assert_eq!(p.url_landing.as_deref(), Some("https://www.semanticscholar.org/paper/abc123"));
    }

    #[test]
    fn test_doi_fallback_when_url_missing() {
        let body = json!({
            "data": [{
                "paperId": "abc123",
                "title": "T",
                "externalIds": {"DOI": "10.1/xyz"}
            }]
        });

        let papers = parse_search_response(&body);
        assert_eq!(papers[0].url_landing.as_deref(), Some("https://doi.org/10.1/xyz"));
    }

    #[test]
    fn test_records_without_paper_id_are_dropped() {
        let body = json!({ "data": [{"title": "No id"}] });
        assert!(parse_search_response(&body).is_empty());
    }

    #[test]
    fn test_null_abstract_reads_as_empty() {
        let body = json!({
            "data": [{"paperId": "x", "title": "T", "abstract": null}]
        });
        assert_eq!(parse_search_response(&body)[0].abstract_text, "");
    }
}
