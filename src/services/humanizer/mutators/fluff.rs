// Fluff and Noise
// Student phrasing, filler words, typos and punctuation flattening

use super::{lower_opener, rewrite_matches, Mutated, Mutator, SentenceStarts};
use crate::services::humanizer::config::HumanizerConfig;
use crate::services::humanizer::random::{pick, RandomSource};
use crate::services::lexicon::phrase_alternation;
use crate::services::text_processor::match_case;

const FILLER_THRESHOLD: f64 = 0.7;
const TYPO_THRESHOLD: f64 = 0.92;
const COMMA_DROP_THRESHOLD: f64 = 0.9;
const COMMA_FUSION_THRESHOLD: f64 = 0.8;
const FLATTEN_MIN_INTENSITY: u8 = 50;

const STUDENT_PHRASES: &[(&str, &str)] = &[
    ("according to", "as I checked in"),
    ("due to the fact that", "because"),
    ("in conclusion", "so, basically,"),
    ("it is important to note that", "I think it's important that"),
    ("on the other hand", "but then again,"),
];

const FILLERS: &[&str] = &[" basically,", " I guess,", " honestly,", " like,"];

const TYPOS: &[(&str, &[&str])] = &[
    ("the", &["teh"]),
    ("and", &["adn", "annd"]),
    ("really", &["realy"]),
    ("their", &["there"]),
    ("about", &["abount"]),
];

static_regex!(fn student_phrase_re => format!(
    r"(?i)\b(?:{})\b",
    phrase_alternation(&STUDENT_PHRASES.iter().map(|(k, _)| *k).collect::<Vec<_>>())
));
static_regex!(fn filler_slot_re => r"\.\s+([A-Z]\w*)");
static_regex!(fn typo_re => format!(
    r"\b(?:{})\b",
    TYPOS.iter().map(|(w, _)| *w).collect::<Vec<_>>().join("|")
));
static_regex!(fn comma_re => r",(\s)");
static_regex!(fn dash_re => r"\s*[—–]\s*");
static_regex!(fn double_comma_re => r",\s*,");

pub struct StudentPhrases;

impl Mutator for StudentPhrases {
    fn name(&self) -> &'static str {
        "student_phrases"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.fluff || (cfg.grammar && cfg.is_lazy_student())
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, _rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(student_phrase_re(), text, &mut edits, |caps| {
            let key = caps[0].split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
            STUDENT_PHRASES
                .iter()
                .find(|(phrase, _)| *phrase == key)
                .map(|(_, plain)| match_case(&caps[0], plain))
        });
        Mutated { text, edits }
    }
}

/// ". Next" -> ", basically, next"
pub struct SubjectiveFluff;

impl Mutator for SubjectiveFluff {
    fn name(&self) -> &'static str {
        "subjective_fluff"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.fluff
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let starts = SentenceStarts::of(text);
        let text = rewrite_matches(filler_slot_re(), text, &mut edits, |caps| {
            if !starts.at_group(caps, 1) || !rng.roll(FILLER_THRESHOLD) {
                return None;
            }
            let filler = pick(rng, FILLERS)?;
            Some(format!(",{} {}", filler, lower_opener(&caps[1], text)))
        });
        Mutated { text, edits }
    }
}

pub struct Typos;

impl Mutator for Typos {
    fn name(&self) -> &'static str {
        "typos"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.typo
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(typo_re(), text, &mut edits, |caps| {
            if !rng.roll(TYPO_THRESHOLD) {
                return None;
            }
            let (_, variants) = TYPOS.iter().find(|(w, _)| *w == &caps[0])?;
            pick(rng, variants).map(|v| v.to_string())
        });
        Mutated { text, edits }
    }
}

pub struct CommaDrop;

impl Mutator for CommaDrop {
    fn name(&self) -> &'static str {
        "comma_drop"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.typo
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(comma_re(), text, &mut edits, |caps| {
            rng.roll(COMMA_DROP_THRESHOLD).then(|| caps[1].to_string())
        });
        Mutated { text, edits }
    }
}

/// Em/en dashes become commas and some sentence ends fuse with ", and".
pub struct PunctuationFlatten;

impl Mutator for PunctuationFlatten {
    fn name(&self) -> &'static str {
        "punctuation_flatten"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.burst || cfg.intensity > FLATTEN_MIN_INTENSITY
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(dash_re(), text, &mut edits, |_| Some(", ".to_string()));
        let text = rewrite_matches(double_comma_re(), &text, &mut edits, |_| Some(",".to_string()));
        let starts = SentenceStarts::of(&text);
        let text = rewrite_matches(filler_slot_re(), &text, &mut edits, |caps| {
            (starts.at_group(caps, 1) && rng.roll(COMMA_FUSION_THRESHOLD))
                .then(|| format!(", and {}", lower_opener(&caps[1], &text)))
        });
        Mutated { text, edits }
    }
}

pub fn mutators() -> Vec<Box<dyn Mutator + Send + Sync>> {
    vec![
        Box::new(StudentPhrases),
        Box::new(SubjectiveFluff),
        Box::new(Typos),
        Box::new(CommaDrop),
        Box::new(PunctuationFlatten),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanizer::config::Persona;
    use crate::services::humanizer::random::ScriptedRandom;

    #[test]
    fn test_student_phrases_keep_case() {
        let out = StudentPhrases.apply(
            "In conclusion it works due to the fact that it is simple.",
            &HumanizerConfig::default(),
            &mut ScriptedRandom::always(0.0),
        );
        assert_eq!(out.text, "So, basically, it works because it is simple.");
        assert_eq!(out.edits, 2);
    }

    #[test]
    fn test_student_phrases_gate() {
        let cfg = HumanizerConfig::default();
        assert!(!StudentPhrases.enabled(&cfg));
        let lazy = HumanizerConfig { persona: Persona::LazyStudent, ..cfg };
        assert!(StudentPhrases.enabled(&lazy));
    }

    #[test]
    fn test_filler_lowercases_next_sentence() {
        let out = SubjectiveFluff.apply(
            "We tried. The test passed.",
            &HumanizerConfig::default(),
            &mut ScriptedRandom::always(0.999),
        );
        assert_eq!(out.text, "We tried, like, the test passed.");
    }

    #[test]
    fn test_filler_skips_titles_and_keeps_names() {
        let cfg = HumanizerConfig::default();
        let out = SubjectiveFluff.apply(
            "We asked Dr. Smith. Jones replied to Mr. Jones.",
            &cfg,
            &mut ScriptedRandom::always(0.999),
        );
        assert_eq!(out.text, "We asked Dr. Smith, like, Jones replied to Mr. Jones.");

        let out = PunctuationFlatten.apply("Ask Mr. Jones. He knows.", &cfg, &mut ScriptedRandom::always(0.999));
        assert_eq!(out.text, "Ask Mr. Jones, and he knows.");
    }

    #[test]
    fn test_typos_only_whole_words() {
        let out = Typos.apply(
            "the theory and band",
            &HumanizerConfig::default(),
            &mut ScriptedRandom::always(0.999),
        );
        assert_eq!(out.text, "teh theory annd band");
    }

    #[test]
    fn test_dashes_flatten() {
        let out = PunctuationFlatten.apply(
            "It works \u{2014} mostly.",
            &HumanizerConfig::default(),
            &mut ScriptedRandom::always(0.0),
        );
        assert_eq!(out.text, "It works, mostly.");
        assert_eq!(out.edits, 1);
    }
}
