//! Relaxed gate filter: admit broadly, never kill a systems paper at the door.

use serde::{Deserialize, Serialize};

use crate::combined_text;
use crate::keywords::{
    any_match, exclusion_hit, DOMAIN_KEYWORDS, REPRODUCIBILITY_KEYWORDS, STRONG_SYSTEM_KEYWORDS,
};

/// Gate verdict level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateLevel {
    Reject,
    Base,
    System,
}

impl GateLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateLevel::Reject => "reject",
            GateLevel::Base   => "base",
            GateLevel::System => "system",
        }
    }
}

/// Outcome of the gate filter. Pure function of (title, abstract).
#[derive(Debug, Clone, Serialize)]
pub struct GateResult {
    pub pass: bool,
    pub level: GateLevel,
    /// Matched strong-system and reproducibility keywords, in table order.
    pub hits: Vec<&'static str>,
    /// Exclusion term that matched but was overridden by a strong-system hit.
    pub exclude_hit: Option<&'static str>,
}

impl GateResult {
    fn reject(exclude_hit: Option<&'static str>) -> Self {
        Self { pass: false, level: GateLevel::Reject, hits: vec![], exclude_hit }
    }
}

/// Apply the gate to one paper.
///
/// 1. Reject if no domain keyword appears in `title + " " + abstract`.
/// 2. An exclusion keyword matching as a whole word rejects, unless a
///    strong-system keyword is also present — then the paper passes with
///    the exclusion term recorded for downstream downweighting.
/// 3. Otherwise pass; level is `System` if a strong-system keyword is
///    present, else `Base`.
pub fn gate_filter(title: &str, abstract_text: &str) -> GateResult {
    let text = combined_text(title, abstract_text);

    if !any_match(&text, DOMAIN_KEYWORDS) {
        return GateResult::reject(None);
    }

    let strong_system = any_match(&text, STRONG_SYSTEM_KEYWORDS);

    let exclude_hit = match exclusion_hit(&text) {
        Some(term) if strong_system => Some(term),
        Some(term) => return GateResult::reject(Some(term)),
        None => None,
    };

    let hits = STRONG_SYSTEM_KEYWORDS
        .iter()
        .chain(REPRODUCIBILITY_KEYWORDS.iter())
        .filter(|kw| text.contains(**kw))
        .copied()
        .collect();

    let level = if strong_system { GateLevel::System } else { GateLevel::Base };

    GateResult { pass: true, level, hits, exclude_hit }
}
