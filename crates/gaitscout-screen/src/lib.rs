//! gaitscout-screen — Keyword-based relevance screening for gait-analysis papers.
//!
//! A rule-based classifier applied to paper metadata (title + abstract):
//!   - gate filter: admit/reject on domain and exclusion keywords
//!   - tag extractor: four topical category labels
//!   - system score: heuristic priority score for sorting
//!   - app-heavy detector: flags clinical/application-focused papers
//!   - evidence extraction: first matching sentence per tag
//!
//! All functions are deterministic and stateless: identical text always
//! yields identical output.

pub mod apps;
pub mod evidence;
pub mod gate;
pub mod keywords;
pub mod score;
pub mod tags;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use gate::{gate_filter, GateLevel, GateResult};
pub use tags::TagCategory;

/// Full screening output for a paper that passed the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenOutcome {
    pub gate_level: GateLevel,
    pub keywords_hit: Vec<String>,
    pub exclude_hit: Option<String>,
    pub tags: Vec<TagCategory>,
    pub system_score: f64,
    pub app_heavy: bool,
    pub tag_evidence: BTreeMap<String, String>,
}

/// Run the full screening pipeline on one paper.
/// Returns `None` if the paper fails the gate.
pub fn screen(title: &str, abstract_text: &str) -> Option<ScreenOutcome> {
    let gate = gate_filter(title, abstract_text);
    if !gate.pass {
        return None;
    }

    Some(ScreenOutcome {
        gate_level: gate.level,
        keywords_hit: gate.hits.iter().map(|s| s.to_string()).collect(),
        exclude_hit: gate.exclude_hit.map(str::to_string),
        tags: tags::compute_tags(title, abstract_text),
        system_score: score::system_score(title, abstract_text),
        app_heavy: apps::detect_app_heavy(title, abstract_text),
        tag_evidence: evidence::tag_evidence(title, abstract_text),
    })
}

/// Lowercased `title + " " + abstract`, the text all matchers scan.
pub(crate) fn combined_text(title: &str, abstract_text: &str) -> String {
    format!("{} {}", title.to_lowercase(), abstract_text.to_lowercase())
}
