//! Content fingerprinting for candidate deduplication.
//!
//! The fingerprint is the sole dedup key: hash collisions across distinct
//! papers are accepted as a known limitation.

use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
const FINGERPRINT_LEN: usize = 16;

/// Fingerprint of (title, year, first 3 sorted lowercase author names).
///
/// Identical bibliographic content from different sources collapses to the
/// same key; title casing and author order never matter.
pub fn fingerprint(title: &str, year: i32, authors: &[String]) -> String {
    let mut first_authors: Vec<String> = authors
        .iter()
        .take(3)
        .map(|a| a.to_lowercase())
        .collect();
    first_authors.sort();

    let text = format!(
        "{}|{}|{}",
        title.to_lowercase().trim(),
        year,
        first_authors.join(",")
    );

    let digest = Sha256::digest(text.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..FINGERPRINT_LEN].to_string()
}

/// Short deterministic event id from (paper_id, created_at).
pub fn event_id(paper_id: &str, created_at: &str) -> String {
    let digest = Sha256::digest(format!("{paper_id}{created_at}").as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_content_same_fingerprint() {
        let a = fingerprint("Gait Platform", 2022, &authors(&["Alice Li", "Bob Wu"]));
        let b = fingerprint("gait platform", 2022, &authors(&["alice li", "bob wu"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_author_order_does_not_matter() {
        let a = fingerprint("Gait Platform", 2022, &authors(&["Alice Li", "Bob Wu"]));
        let b = fingerprint("Gait Platform", 2022, &authors(&["Bob Wu", "Alice Li"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_only_first_three_authors_count() {
        let a = fingerprint("P", 2020, &authors(&["A", "B", "C", "D"]));
        let b = fingerprint("P", 2020, &authors(&["A", "B", "C", "E"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_year_changes_fingerprint() {
        let a = fingerprint("P", 2020, &authors(&["A"]));
        let b = fingerprint("P", 2021, &authors(&["A"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_is_16_hex_chars() {
        let fp = fingerprint("Some title", 2023, &authors(&["X Y"]));
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
