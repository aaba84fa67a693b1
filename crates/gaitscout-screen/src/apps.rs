//! App-heavy detection: flags papers that are clinical/application work
//! rather than system or tooling work. Never a gate rejection, only a
//! sort/display downweight.

use crate::combined_text;
use crate::keywords::{
    any_match, match_count, APP_HEAVY_KEYWORDS, REPRODUCIBILITY_KEYWORDS, STRONG_SYSTEM_KEYWORDS,
};

/// Minimum application-signal matches to qualify as app-heavy.
const APP_HEAVY_THRESHOLD: usize = 3;

/// True iff the application signal is strong (≥ 3 keyword matches) and
/// no strong-system or reproducibility keyword is present.
pub fn detect_app_heavy(title: &str, abstract_text: &str) -> bool {
    let text = combined_text(title, abstract_text);

    let app_hits = match_count(&text, APP_HEAVY_KEYWORDS);
    if app_hits < APP_HEAVY_THRESHOLD {
        return false;
    }

    !any_match(&text, STRONG_SYSTEM_KEYWORDS) && !any_match(&text, REPRODUCIBILITY_KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clinical_paper_is_app_heavy() {
        assert!(detect_app_heavy(
            "Gait outcomes in stroke rehabilitation",
            "This clinical trial included 50 patients with intervention and cohort comparison.",
        ));
    }

    #[test]
    fn test_systems_paper_is_not_app_heavy() {
        assert!(!detect_app_heavy(
            "Open-source gait analysis platform",
            "Our GitHub-available system provides a visualization dashboard.",
        ));
    }

    #[test]
    fn test_system_keyword_overrides_strong_app_signal() {
        // Strong clinical signal, but "platform" keeps the flag off.
        assert!(!detect_app_heavy(
            "A gait platform for stroke patients",
            "Clinical trial with patient cohort and rehabilitation therapy.",
        ));
    }

    #[test]
    fn test_two_app_hits_are_not_enough() {
        assert!(!detect_app_heavy(
            "Gait in stroke survivors",
            "We measured walking speed in patients.",
        ));
    }
}
