//! arXiv Atom API client.
//!
//! Endpoint: http://export.arxiv.org/api/query
//! Results come back as an Atom feed; parsed with a quick-xml event reader.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::{RawPaper, SearchSource};
use crate::queries;

const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

pub struct ArxivClient {
    client: Client,
}

impl ArxivClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchSource for ArxivClient {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    fn default_queries(&self) -> Vec<String> {
        vec![queries::ARXIV_SYSTEM.to_string(), queries::ARXIV_PIPELINE.to_string()]
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<RawPaper>> {
        let params = [
            ("search_query", query),
            ("start", "0"),
            ("max_results", &limit.to_string()),
            ("sortBy", "relevance"),
        ];

        let xml = self
            .client
            .get(ARXIV_API_URL)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let papers = parse_arxiv_atom(&xml)?;
        debug!(count = papers.len(), "arXiv search returned entries");
        Ok(papers)
    }
}

/// Parse an arXiv Atom feed into RawPaper entries.
/// The feed element carries its own <title> and <id>, so fields are only
/// collected inside <entry>.
fn parse_arxiv_atom(xml: &str) -> anyhow::Result<Vec<RawPaper>> {
    let mut papers = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current: Option<RawPaper> = None;
    let mut in_title     = false;
    let mut in_summary   = false;
    let mut in_id        = false;
    let mut in_published = false;
    let mut in_name      = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                match e.name().as_ref() {
                    b"entry" => {
                        current = Some(RawPaper {
                            paper_id: String::new(),
                            title: String::new(),
                            authors: vec![],
                            year: 0,
                            abstract_text: String::new(),
                            venue: None,
                            doi: None,
                            url_landing: None,
                        });
                    }
                    b"title"     if current.is_some() => in_title = true,
                    b"summary"   if current.is_some() => in_summary = true,
                    b"id"        if current.is_some() => in_id = true,
                    b"published" if current.is_some() => in_published = true,
                    b"name"      if current.is_some() => in_name = true,
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                if let Some(ref mut p) = current {
                    if in_title     { p.title = text.clone(); }
                    if in_summary   { p.abstract_text = text.clone(); }
                    if in_name      { p.authors.push(text.clone()); }
                    if in_published { p.year = text.get(..4).and_then(|y| y.parse().ok()).unwrap_or(0); }
                    if in_id {
                        p.paper_id = text.clone();
                        p.url_landing = Some(text.clone());
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                match e.name().as_ref() {
                    b"title"     => in_title = false,
                    b"summary"   => in_summary = false,
                    b"id"        => in_id = false,
                    b"published" => in_published = false,
                    b"name"      => in_name = false,
                    b"entry" => {
                        if let Some(p) = current.take() {
                            if !p.title.is_empty() && !p.paper_id.is_empty() {
                                papers.push(p);
                            } else {
                                warn!("Skipping arXiv entry with missing title or id");
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("Atom parse error: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_atom_feed() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <id>http://arxiv.org/api/feed</id>
  <entry>
    <id>http://arxiv.org/abs/2103.01234v1</id>
    <title>A real-time gait analysis system</title>
    <summary>We present an open-source platform.</summary>
    <published>2021-03-02T00:00:00Z</published>
    <author><name>Jane Roe</name></author>
    <author><name>Sam Poe</name></author>
  </entry>
</feed>"#;

        let papers = parse_arxiv_atom(xml).unwrap();
        assert_eq!(papers.len(), 1);
        let p = &papers[0];
        assert_eq!(p.paper_id, "http://arxiv.org/abs/2103.01234v1");
        assert_eq!(p.title, "A real-time gait analysis system");
        assert_eq!(p.year, 2021);
        assert_eq!(p.authors, vec!["Jane Roe", "Sam Poe"]);
        assert_eq!(p.url_landing.as_deref(), Some("http://arxiv.org/abs/2103.01234v1"));
    }

    #[test]
    fn test_feed_level_title_is_not_an_entry() {
        let xml = r#"<feed><title>Results</title><id>feed-id</id></feed>"#;
        assert!(parse_arxiv_atom(xml).unwrap().is_empty());
    }
}
