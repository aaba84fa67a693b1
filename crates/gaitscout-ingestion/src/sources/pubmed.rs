//! PubMed E-utilities client.
//!
//! Endpoints used:
//!   esearch: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi
//!   efetch:  https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::{RawPaper, SearchSource};
use crate::queries;

const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";
const EFETCH_URL:  &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

pub struct PubMedClient {
    client: Client,
    api_key: Option<String>,
}

impl PubMedClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    /// Search PubMed and return a list of PMIDs.
    #[instrument(skip(self))]
    async fn esearch(&self, query: &str, max: usize) -> anyhow::Result<Vec<String>> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmax", max.to_string()),
            ("retmode", "json".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let resp: serde_json::Value = self
            .client
            .get(ESEARCH_URL)
            .query(&params)
            .send()
            .await?
            .json()
            .await?;

        let ids = resp["esearchresult"]["idlist"]
            .as_array()
            .unwrap_or(&vec![])
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();

        debug!(?ids, "PubMed esearch returned PMIDs");
        Ok(ids)
    }

    /// Fetch PubMed XML for a list of PMIDs and parse into RawPaper records.
    #[instrument(skip(self))]
    async fn efetch_abstracts(&self, pmids: &[String]) -> anyhow::Result<Vec<RawPaper>> {
        if pmids.is_empty() {
            return Ok(vec![]);
        }

        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("id", pmids.join(",")),
            ("rettype", "abstract".to_string()),
            ("retmode", "xml".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }

        let xml = self
            .client
            .get(EFETCH_URL)
            .query(&params)
            .send()
            .await?
            .text()
            .await?;

        parse_pubmed_xml(&xml)
    }
}

#[async_trait]
impl SearchSource for PubMedClient {
    fn name(&self) -> &'static str {
        "pubmed"
    }

    fn default_queries(&self) -> Vec<String> {
        vec![queries::PUBMED_SYSTEM.to_string(), queries::PUBMED_PIPELINE.to_string()]
    }

    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<RawPaper>> {
        let pmids = self.esearch(query, limit).await?;
        self.efetch_abstracts(&pmids).await
    }
}

fn landing_url(pmid: &str) -> String {
    format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/")
}

/// Parse PubMed XML (efetch abstract mode) into RawPaper records.
/// Handles the <PubmedArticleSet><PubmedArticle> structure.
fn parse_pubmed_xml(xml: &str) -> anyhow::Result<Vec<RawPaper>> {
    let mut papers = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // State machine for XML parsing
    let mut current: Option<RawPaper> = None;
    let mut in_pmid       = false;
    let mut in_title      = false;
    let mut in_abstract   = false;
    let mut in_author     = false;
    let mut in_last_name  = false;
    let mut in_fore_name  = false;
    let mut in_journal    = false;
    let mut in_pub_date   = false;
    let mut in_year       = false;
    let mut in_doi        = false;
    let mut current_last  = String::new();
    let mut current_fore  = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                match e.name().as_ref() {
                    b"PubmedArticle" => {
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
                    b"PMID" if current.as_ref().is_some_and(|p| p.paper_id.is_empty()) => {
                        in_pmid = true;
                    }
                    b"ArticleTitle" => in_title = true,
                    b"AbstractText" => {
                        in_abstract = true;
                        // Structured abstracts carry one section per element;
                        // keep a space between them.
                        if let Some(ref mut p) = current {
                            if !p.abstract_text.is_empty() {
                                p.abstract_text.push(' ');
                            }
                        }
                    }
                    b"Author"       => { in_author = true; current_last.clear(); current_fore.clear(); }
                    b"LastName"     => in_last_name = true,
                    b"ForeName"     => in_fore_name = true,
                    b"Title"        => in_journal = true,
                    b"PubDate"      => in_pub_date = true,
                    b"Year" if in_pub_date => in_year = true,
                    b"ELocationID" => {
                        in_doi = e.attributes().flatten().any(|a| {
                            a.key.as_ref() == b"EIdType" && a.value.as_ref() == b"doi"
                        });
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                if let Some(ref mut p) = current {
                    if in_pmid {
                        p.paper_id = landing_url(&text);
                        p.url_landing = Some(landing_url(&text));
                    }
                    if in_title     { p.title = text.clone(); }
                    if in_abstract  { p.abstract_text.push_str(&text); }
                    if in_last_name { current_last = text.clone(); }
                    if in_fore_name { current_fore = text.clone(); }
                    if in_journal   { p.venue = Some(text.clone()); }
                    if in_year      { p.year = text.parse().unwrap_or(0); }
                    if in_doi       { p.doi = Some(text.clone()); }
                }
            }
            Ok(Event::End(ref e)) => {
                match e.name().as_ref() {
                    b"PMID"         => in_pmid = false,
                    b"ArticleTitle" => in_title = false,
                    b"AbstractText" => in_abstract = false,
                    b"LastName"     => in_last_name = false,
                    b"ForeName"     => in_fore_name = false,
                    b"Title"        => in_journal = false,
                    b"PubDate"      => in_pub_date = false,
                    b"Year"         => in_year = false,
                    b"ELocationID"  => in_doi = false,
                    b"Author" => {
                        if in_author {
                            if let Some(ref mut p) = current {
                                let name = if current_fore.is_empty() {
                                    current_last.clone()
                                } else {
                                    format!("{} {}", current_fore, current_last)
                                };
                                p.authors.push(name);
                            }
                            in_author = false;
                        }
                    }
                    b"PubmedArticle" => {
                        if let Some(p) = current.take() {
                            if !p.title.is_empty() && !p.paper_id.is_empty() {
                                papers.push(p);
                            } else {
                                warn!("Skipping PubMed record with empty title or PMID");
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("XML parse error: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(papers)
}
