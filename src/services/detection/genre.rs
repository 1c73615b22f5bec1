// Genre Classification
// Rule-based genre buckets used to pick a calibration profile

use serde::{Deserialize, Serialize};

use crate::services::lexicon::phrase_alternation;
use crate::services::text_processor::TextSample;

const ADMIN_SIGNALS: &[&str] = &[
    "supervisor",
    "neptun",
    "submission",
    "grade",
    "complaint",
    "appeal",
    "to whom it may concern",
    "sincerely",
    "regards",
    "registrar",
    "enrollment",
];

const TECH_SIGNALS: &[&str] = &[
    "data",
    "system",
    "performance",
    "optimization",
    "parameter",
    "software",
    "implementation",
    "hardware",
    "latency",
    "algorithm",
    "database",
    "server",
    "compiler",
    "runtime",
];

const NARRATIVE_SIGNALS: &[&str] = &[
    "i felt",
    "walked",
    "thought",
    "happened",
    "suddenly",
    "because i was",
    "decided",
    "remember",
    "grandfather",
    "grandmother",
];

const ACADEMIC_SIGNALS: &[&str] = &[
    "study",
    "research",
    "hypothesis",
    "findings",
    "methodology",
    "literature",
    "thesis",
    "et al",
    "journal",
    "participants",
    "empirical",
    "theoretical",
];

static_regex!(fn admin_signal_re => format!(r"(?i)\b(?:{})\b", phrase_alternation(ADMIN_SIGNALS)));
static_regex!(fn tech_signal_re => format!(r"(?i)\b(?:{})\b", phrase_alternation(TECH_SIGNALS)));
static_regex!(fn narrative_signal_re => format!(r"(?i)\b(?:{})\b", phrase_alternation(NARRATIVE_SIGNALS)));
static_regex!(fn academic_signal_re => format!(r"(?i)\b(?:{})\b", phrase_alternation(ACADEMIC_SIGNALS)));
static_regex!(fn id_code_re => r"(?i)\b(?:neptun|id|code)\s*:\s*[a-z0-9]+\b");
static_regex!(fn numbered_scoring_re => r"(?i)\b\d{1,3}\s*(?:points|marks)\b|\b(?:grade|mark)\s*\(\d\)");
static_regex!(fn code_token_re => r"(?m)\b\w+\(\)|::|=>|\b[a-z]+_[a-z_]+\b|^\s*(?:fn|def|class|import|#include)\s|[{}]\s*$");
static_regex!(fn citation_hint_re => r"\[\d{1,3}\]|\([A-Z][A-Za-z\s&.\-]+,\s*\d{4}[a-z]?\)");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Academic,
    Technical,
    Narrative,
    FormalAdmin,
    #[default]
    Default,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Academic,
        Genre::Technical,
        Genre::Narrative,
        Genre::FormalAdmin,
        Genre::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Academic => "academic",
            Genre::Technical => "technical",
            Genre::Narrative => "narrative",
            Genre::FormalAdmin => "formal_admin",
            Genre::Default => "default",
        }
    }

    pub fn from_str(val: &str) -> Option<Self> {
        match val.trim().to_lowercase().replace('-', "_").as_str() {
            "academic" => Some(Genre::Academic),
            "technical" => Some(Genre::Technical),
            "narrative" => Some(Genre::Narrative),
            "formal_admin" | "admin" => Some(Genre::FormalAdmin),
            "default" => Some(Genre::Default),
            _ => None,
        }
    }
}

/// Number of distinct signal phrases present in the text
fn distinct_signals(re: &regex::Regex, text: &str) -> usize {
    let mut found: Vec<String> = re
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase().split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    found.sort();
    found.dedup();
    found.len()
}

/// Pick a genre bucket with simple keyword and pattern checks, first match wins
pub fn classify_genre(sample: &TextSample) -> Genre {
    let text = sample.source();

    let admin = distinct_signals(admin_signal_re(), text);
    if admin >= 2 || id_code_re().is_match(text) || numbered_scoring_re().is_match(text) {
        return Genre::FormalAdmin;
    }

    let tech = distinct_signals(tech_signal_re(), text);
    let narrative = distinct_signals(narrative_signal_re(), text);
    if code_token_re().is_match(text) || (tech > 2 && tech > narrative) {
        return Genre::Technical;
    }
    if narrative > 2 {
        return Genre::Narrative;
    }

    if citation_hint_re().is_match(text) || distinct_signals(academic_signal_re(), text) >= 2 {
        return Genre::Academic;
    }
    Genre::Default
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre_of(text: &str) -> Genre {
        classify_genre(&TextSample::new(text))
    }

    #[test]
    fn test_formal_admin_signals() {
        assert_eq!(
            genre_of("To whom it may concern, I would like to appeal my grade. Sincerely, Anna"),
            Genre::FormalAdmin
        );
        assert_eq!(genre_of("My Neptun: AB12CD request."), Genre::FormalAdmin);
        assert_eq!(genre_of("A score of 52 points is passed grade (2)."), Genre::FormalAdmin);
    }

    #[test]
    fn test_technical_signals() {
        assert_eq!(
            genre_of("The server latency depends on database performance and the algorithm."),
            Genre::Technical
        );
        assert_eq!(genre_of("Call parse_config() before start."), Genre::Technical);
    }

    #[test]
    fn test_narrative_signals() {
        assert_eq!(
            genre_of("I felt cold. Suddenly something happened, so I walked home."),
            Genre::Narrative
        );
    }

    #[test]
    fn test_academic_signals() {
        assert_eq!(genre_of("Prior work shows this (Smith, 2020)."), Genre::Academic);
        assert_eq!(genre_of("The study confirms the hypothesis."), Genre::Academic);
    }

    #[test]
    fn test_default_fallback() {
        assert_eq!(genre_of("We went to the market and bought apples."), Genre::Default);
        assert_eq!(genre_of(""), Genre::Default);
    }

    #[test]
    fn test_genre_from_str() {
        assert_eq!(Genre::from_str("formal-admin"), Some(Genre::FormalAdmin));
        assert_eq!(Genre::from_str(" Technical "), Some(Genre::Technical));
        assert_eq!(Genre::from_str("poetry"), None);
    }
}
