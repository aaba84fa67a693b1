//! Evidence extraction: for each tag, the first sentence containing one of
//! its keywords, truncated for display.

use std::collections::BTreeMap;

use crate::tags::TagCategory;

/// Maximum evidence sentence length before truncation.
const EVIDENCE_MAX_LEN: usize = 200;

/// Split text into sentences on `.`, `!` or `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            // Sentence ends here if followed by whitespace (or end of text).
            let next = bytes.get(i + 1);
            if next.is_none() || next.is_some_and(|b| b.is_ascii_whitespace()) {
                let sent = text[start..=i].trim();
                if !sent.is_empty() {
                    sentences.push(sent);
                }
                start = i + 1;
            }
        }
        i += 1;
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// First sentence containing any keyword of `table` (case-insensitive), if any.
fn first_matching_sentence<'a>(sentences: &[&'a str], table: &[&str]) -> Option<&'a str> {
    for kw in table {
        for sent in sentences {
            if sent.to_lowercase().contains(kw) {
                return Some(sent);
            }
        }
    }
    None
}

fn truncate(sent: &str) -> String {
    if sent.len() > EVIDENCE_MAX_LEN {
        let mut end = EVIDENCE_MAX_LEN;
        while !sent.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &sent[..end])
    } else {
        sent.to_string()
    }
}

/// One evidence sentence per tag category, keyed by tag name.
/// Categories with no matching sentence map to an empty string.
pub fn tag_evidence(title: &str, abstract_text: &str) -> BTreeMap<String, String> {
    let text = format!("{} {}", title, abstract_text);
    let sentences = split_sentences(&text);

    TagCategory::ALL
        .iter()
        .map(|cat| {
            let ev = first_matching_sentence(&sentences, cat.keywords())
                .map(truncate)
                .unwrap_or_default();
            (cat.as_str().to_string(), ev)
        })
        .collect()
}
