// ESL Noise
// Article drops, preposition swaps, uncountable plurals and agreement slips

use super::{group, rewrite_matches, Mutated, Mutator};
use crate::services::humanizer::config::HumanizerConfig;
use crate::services::humanizer::random::RandomSource;

const THE_DROP_THRESHOLD: f64 = 0.88;
const A_DROP_THRESHOLD: f64 = 0.95;
const PREPOSITION_THRESHOLD: f64 = 0.85;
const PLURAL_THRESHOLD: f64 = 0.5;
const AGREEMENT_THRESHOLD: f64 = 0.7;
const LOWERCASE_I_THRESHOLD: f64 = 0.8;
const LOWERCASE_I_MIN_INTENSITY: u8 = 40;

const PREPOSITION_SWAPS: &[(&str, &str)] = &[
    ("in", "on"),
    ("on", "at"),
    ("at", "in"),
    ("for", "to"),
    ("to", "for"),
];

const UNCOUNTABLE_NOUNS: &[&str] = &[
    "information",
    "software",
    "music",
    "advice",
    "knowledge",
    "equipment",
    "homework",
];

/// Third-person forms that read as broken rather than slipped when the `s` goes.
const AGREEMENT_KEEP: &[&str] = &["is", "was", "has", "does", "goes"];

static_regex!(fn article_re => r"(\s)(the|a|an)\s+([A-Za-z]+)\b");
static_regex!(fn preposition_re => r"\b(in|on|at|for|to)\b");
static_regex!(fn uncountable_re => format!(r"(?i)\b(?:{})\b", UNCOUNTABLE_NOUNS.join("|")));
static_regex!(fn agreement_re => r"\b(he|she|it|He|She|It)\s+([a-z]+s)\b");
static_regex!(fn pronoun_i_re => r"\bI\b");

fn grammar_enabled(cfg: &HumanizerConfig) -> bool {
    cfg.grammar
}

pub struct ArticleDrop;

impl Mutator for ArticleDrop {
    fn name(&self) -> &'static str {
        "article_drop"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        grammar_enabled(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(article_re(), text, &mut edits, |caps| {
            let threshold = if &caps[2] == "the" { THE_DROP_THRESHOLD } else { A_DROP_THRESHOLD };
            rng.roll(threshold).then(|| format!("{}{}", &caps[1], &caps[3]))
        });
        Mutated { text, edits }
    }
}

pub struct PrepositionSwap;

impl Mutator for PrepositionSwap {
    fn name(&self) -> &'static str {
        "preposition_swap"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        grammar_enabled(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(preposition_re(), text, &mut edits, |caps| {
            if !rng.roll(PREPOSITION_THRESHOLD) {
                return None;
            }
            PREPOSITION_SWAPS
                .iter()
                .find(|(from, _)| *from == &caps[1])
                .map(|(_, to)| to.to_string())
        });
        Mutated { text, edits }
    }
}

pub struct UncountablePlural;

impl Mutator for UncountablePlural {
    fn name(&self) -> &'static str {
        "uncountable_plural"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        grammar_enabled(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(uncountable_re(), text, &mut edits, |caps| {
            if !rng.roll(PLURAL_THRESHOLD) {
                return None;
            }
            let word = &caps[0];
            let suffix = if word.chars().all(|c| c.is_uppercase()) { "S" } else { "s" };
            Some(format!("{}{}", word, suffix))
        });
        Mutated { text, edits }
    }
}

pub struct AgreementSlip;

impl Mutator for AgreementSlip {
    fn name(&self) -> &'static str {
        "verb_agreement"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        grammar_enabled(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(agreement_re(), text, &mut edits, |caps| {
            let verb = &caps[2];
            let stem = &verb[..verb.len() - 1];
            if AGREEMENT_KEEP.contains(&verb) || stem.len() < 3 {
                return None;
            }
            rng.roll(AGREEMENT_THRESHOLD)
                .then(|| format!("{} {}", group(caps, 1), stem))
        });
        Mutated { text, edits }
    }
}

pub struct LowercaseI;

impl Mutator for LowercaseI {
    fn name(&self) -> &'static str {
        "lowercase_i"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.grammar && cfg.intensity > LOWERCASE_I_MIN_INTENSITY
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(pronoun_i_re(), text, &mut edits, |_| {
            rng.roll(LOWERCASE_I_THRESHOLD).then(|| "i".to_string())
        });
        Mutated { text, edits }
    }
}

pub fn mutators() -> Vec<Box<dyn Mutator + Send + Sync>> {
    vec![
        Box::new(ArticleDrop),
        Box::new(PrepositionSwap),
        Box::new(UncountablePlural),
        Box::new(AgreementSlip),
        Box::new(LowercaseI),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanizer::random::ScriptedRandom;

    fn fire_all(m: &dyn Mutator, text: &str) -> Mutated {
        m.apply(text, &HumanizerConfig::default(), &mut ScriptedRandom::always(0.999))
    }

    #[test]
    fn test_article_drop_skips_text_start() {
        let out = fire_all(&ArticleDrop, "The cat saw the dog and a bird.");
        assert_eq!(out.text, "The cat saw dog and bird.");
        assert_eq!(out.edits, 2);
    }

    #[test]
    fn test_preposition_swap_map() {
        let out = fire_all(&PrepositionSwap, "We met in town to talk.");
        assert_eq!(out.text, "We met on town for talk.");
    }

    #[test]
    fn test_preposition_swap_adjacent_pair() {
        let out = fire_all(&PrepositionSwap, "We moved in to town.");
        assert_eq!(out.text, "We moved on for town.");
        assert_eq!(out.edits, 2);
        assert_eq!(fire_all(&PrepositionSwap, "Lean into it.").text, "Lean into it.");
    }

    #[test]
    fn test_uncountable_plural_keeps_case() {
        let out = fire_all(&UncountablePlural, "Software needs advice and MUSIC.");
        assert_eq!(out.text, "Softwares needs advices and MUSICS.");
    }

    #[test]
    fn test_agreement_slip_skips_auxiliaries() {
        let out = fire_all(&AgreementSlip, "She works late. It is fine. He goes home. It fits.");
        assert_eq!(out.text, "She work late. It is fine. He goes home. It fit.");
        assert_eq!(out.edits, 2);
    }

    #[test]
    fn test_no_draw_no_change() {
        let text = "The team said that he works in the lab and I agree.";
        let cfg = HumanizerConfig::default();
        for m in mutators() {
            let out = m.apply(text, &cfg, &mut ScriptedRandom::always(0.0));
            assert_eq!(out.text, text, "{}", m.name());
            assert_eq!(out.edits, 0);
        }
    }

    #[test]
    fn test_gates() {
        let mut cfg = HumanizerConfig::default();
        cfg.grammar = false;
        assert!(mutators().iter().all(|m| !m.enabled(&cfg)));
        cfg.grammar = true;
        cfg.intensity = 40;
        assert!(!LowercaseI.enabled(&cfg));
    }
}
