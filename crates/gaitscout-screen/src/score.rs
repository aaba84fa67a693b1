//! System-relevance score. Used for sorting the review queue; a paper's
//! score must be bit-for-bit reproducible given identical text.

use crate::combined_text;
use crate::keywords::{
    any_match, match_count, APP_HEAVY_KEYWORDS, REALTIME_KEYWORDS, REPRODUCIBILITY_KEYWORDS,
    STRONG_SYSTEM_KEYWORDS, TAG_DATA, TAG_SOFTWARE,
};

/// Maximum penalty from application strong-signal words.
const APP_PENALTY_CAP: usize = 3;

/// Compute the system-development score for one paper.
///
/// +2 any strong-system keyword (capped, not summed per keyword)
/// +2 any reproducibility keyword
/// +1 any software-tag keyword
/// +1 any data-tag keyword
/// +1 any real-time/deployment keyword
/// −min(app-heavy match count, 3)
///
/// No upper bound; typical range is roughly −3 to +7.
pub fn system_score(title: &str, abstract_text: &str) -> f64 {
    let text = combined_text(title, abstract_text);
    let mut score = 0.0;

    if any_match(&text, STRONG_SYSTEM_KEYWORDS) {
        score += 2.0;
    }
    if any_match(&text, REPRODUCIBILITY_KEYWORDS) {
        score += 2.0;
    }
    if any_match(&text, TAG_SOFTWARE) {
        score += 1.0;
    }
    if any_match(&text, TAG_DATA) {
        score += 1.0;
    }
    if any_match(&text, REALTIME_KEYWORDS) {
        score += 1.0;
    }

    score -= match_count(&text, APP_HEAVY_KEYWORDS).min(APP_PENALTY_CAP) as f64;

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_score_for_systems_paper() {
        let score = system_score(
            "VIGMA: An Open-Source Framework for Visual Gait Analytics",
            "We developed a GitHub-available visualization dashboard for gait analysis \
             with a public dataset and real-time display.",
        );
        assert!(score > 5.0, "expected > 5, got {score}");
    }

    #[test]
    fn test_negative_score_for_clinical_paper() {
        let score = system_score(
            "Gait analysis in stroke survivors",
            "This clinical trial evaluated rehabilitation outcomes in a patient cohort.",
        );
        assert!(score < 0.0, "expected < 0, got {score}");
    }

    #[test]
    fn test_score_is_pure() {
        let t = "A gait platform";
        let a = "Software with dataset and dashboard.";
        assert_eq!(system_score(t, a).to_bits(), system_score(t, a).to_bits());
    }

    #[test]
    fn test_strong_system_adds_once_not_per_keyword() {
        let one = system_score("A gait system", "");
        let many = system_score("A gait system platform framework software toolkit pipeline", "");
        assert_eq!(one, many);
    }

    #[test]
    fn test_penalty_grows_then_caps_at_three() {
        let base = "gait system";
        let s0 = system_score(base, "");
        let s1 = system_score(base, "patient");
        let s2 = system_score(base, "patient cohort");
        let s3 = system_score(base, "patient cohort intervention");
        let s4 = system_score(base, "patient cohort intervention therapy symptom");
        assert_eq!(s0 - s1, 1.0);
        assert_eq!(s1 - s2, 1.0);
        assert_eq!(s2 - s3, 1.0);
        assert_eq!(s3, s4, "penalty must cap at 3");
    }
}
