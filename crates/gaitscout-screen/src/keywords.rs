//! Static keyword taxonomy for the screening pipeline.
//!
//! All tables are lowercase. Everything matches as a case-insensitive
//! substring except the exclusion table, which matches whole words only
//! (precompiled regexes, built once).

use lazy_static::lazy_static;
use regex::Regex;

/// Domain words: a paper must hit at least one to pass Gate-1.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "gait", "walking", "locomotion", "stride", "step",
    "spatiotemporal", "step detection", "gait event",
    "gait analysis",
];

/// Strong-system words: +2 to the system score, and they protect a paper
/// from exclusion-word rejection.
pub const STRONG_SYSTEM_KEYWORDS: &[&str] = &[
    "system", "platform", "framework", "software", "toolkit", "pipeline",
];

/// Open-source / reproducibility words: +2 to the system score.
pub const REPRODUCIBILITY_KEYWORDS: &[&str] = &[
    "github", "open-source", "open source", "code available",
    "dataset", "public", "benchmark", "reproducibility",
];

/// Tag-A: acquisition and hardware interface.
pub const TAG_ACQUISITION: &[&str] = &[
    "sensor", "imu", "wearable", "pressure", "optical", "camera",
    "depth", "synchronized", "calibration", "accelerometer", "gyroscope",
];

/// Tag-B: algorithm pipeline.
pub const TAG_PIPELINE: &[&str] = &[
    "preprocessing", "filtering", "segmentation", "event detection",
    "stride length", "cadence", "spatiotemporal", "feature extraction",
    "classification", "cnn", "transformer", "model deployment",
    "deep learning", "machine learning", "neural network", "algorithm",
];

/// Tag-C: software system and interaction.
pub const TAG_SOFTWARE: &[&str] = &[
    "gui", "visualization", "dashboard", "interface", "app",
    "usability", "interactive", "feedback", "display", "user experience",
];

/// Tag-D: data and reporting.
pub const TAG_DATA: &[&str] = &[
    "database", "data management", "cloud", "report", "ehr",
    "logging", "export", "standardization", "electronic health record",
];

/// Real-time / deployment words: +1 to the system score.
pub const REALTIME_KEYWORDS: &[&str] = &[
    "real-time", "online", "latency", "embedded", "edge",
];

/// Application strong-signal words: score penalty and app-heavy detection.
pub const APP_HEAVY_KEYWORDS: &[&str] = &[
    "patient", "clinical trial", "cohort", "intervention",
    "rehabilitation", "postoperative", "diagnosis", "outcome", "symptom",
    "parkinson", "stroke", "cerebral palsy", "osteoarthritis",
    "therapy", "treatment", "recovery",
];

/// Exclusion words: reject unless a strong-system word is also present.
/// Animal studies, molecular biology, and pure robotics.
pub const EXCLUDE_KEYWORDS: &[&str] = &[
    "rat", "mouse", "animal", "quadruped",
    "gene", "cell", "molecular",
    "robot", "robotic", "prosthesis design",
];

lazy_static! {
    /// Whole-word regex per exclusion keyword, paired with the source term.
    pub static ref EXCLUDE_PATTERNS: Vec<(&'static str, Regex)> = EXCLUDE_KEYWORDS
        .iter()
        .map(|kw| {
            let pattern = format!(r"\b{}\b", regex::escape(kw));
            (*kw, Regex::new(&pattern).expect("static exclusion pattern"))
        })
        .collect();
}

/// True iff any keyword of `table` substring-matches the (lowercased) text.
pub fn any_match(text: &str, table: &[&str]) -> bool {
    table.iter().any(|kw| text.contains(kw))
}

/// Count of keywords in `table` that substring-match the text.
pub fn match_count(text: &str, table: &[&str]) -> usize {
    table.iter().filter(|kw| text.contains(*kw)).count()
}

/// First exclusion keyword matching the text as a whole word, if any.
pub fn exclusion_hit(text: &str) -> Option<&'static str> {
    EXCLUDE_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(kw, _)| *kw)
}
