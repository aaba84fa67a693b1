//! Topical tag extraction. Tags group papers for display; they never
//! decide pass/fail.

use serde::{Deserialize, Serialize};

use crate::combined_text;
use crate::keywords::{any_match, TAG_ACQUISITION, TAG_DATA, TAG_PIPELINE, TAG_SOFTWARE};

/// The four tag dimensions, in fixed declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagCategory {
    Acquisition,
    Pipeline,
    Software,
    Data,
}

impl TagCategory {
    pub const ALL: [TagCategory; 4] = [
        TagCategory::Acquisition,
        TagCategory::Pipeline,
        TagCategory::Software,
        TagCategory::Data,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::Acquisition => "Acquisition",
            TagCategory::Pipeline    => "Pipeline",
            TagCategory::Software    => "Software",
            TagCategory::Data        => "Data",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            TagCategory::Acquisition => TAG_ACQUISITION,
            TagCategory::Pipeline    => TAG_PIPELINE,
            TagCategory::Software    => TAG_SOFTWARE,
            TagCategory::Data        => TAG_DATA,
        }
    }
}

/// Tags whose keyword set matches the combined text, in declaration order.
pub fn compute_tags(title: &str, abstract_text: &str) -> Vec<TagCategory> {
    let text = combined_text(title, abstract_text);
    TagCategory::ALL
        .iter()
        .filter(|cat| any_match(&text, cat.keywords()))
        .copied()
        .collect()
}
