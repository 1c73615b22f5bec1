// Vocabulary Mutators
// Plain-word simplification, context-aware rare synonyms, formal-word swaps

use super::{rewrite_matches, Mutated, Mutator};
use crate::services::humanizer::config::{HumanizerConfig, Persona};
use crate::services::humanizer::random::{pick, RandomSource};
use crate::services::lexicon::{banned_vocab_re, phrase_alternation, BANNED_VOCABULARY};
use crate::services::text_processor::match_case;

/// Share of rare-synonym slots swapped at full intensity.
const RARE_SYNONYM_RATE: f64 = 0.5;
const EXTREME_VOCAB_INTENSITY: u8 = 85;

const PLAIN_WORDS: &[(&str, &str)] = &[
    ("consequently", "so"),
    ("furthermore", "also"),
    ("moreover", "plus"),
    ("however", "but"),
    ("therefore", "so"),
    ("utilize", "use"),
    ("utilizes", "uses"),
    ("demonstrate", "show"),
    ("demonstrates", "shows"),
    ("facilitate", "help"),
    ("implement", "do"),
    ("implementation", "doing"),
    ("methodology", "method"),
    ("approximately", "about"),
    ("subsequently", "then"),
    ("nevertheless", "still"),
    ("regarding", "about"),
    ("assistance", "help"),
    ("objective", "goal"),
];

struct RareSynonyms {
    word: &'static str,
    options: &'static [&'static str],
    /// Followers that make the swap read wrong ("big growth").
    forbidden_followers: &'static [&'static str],
    extreme: &'static [&'static str],
}

const RARE_SYNONYMS: &[RareSynonyms] = &[
    RareSynonyms {
        word: "significant",
        options: &["huge", "big", "main"],
        forbidden_followers: &["growth", "increase", "difference"],
        extreme: &["crazy", "wild", "massive"],
    },
    RareSynonyms { word: "increase", options: &["bump", "jump", "spike"], forbidden_followers: &[], extreme: &[] },
    RareSynonyms { word: "decrease", options: &["drop", "dip", "crash"], forbidden_followers: &[], extreme: &[] },
    RareSynonyms { word: "important", options: &["key", "big", "main"], forbidden_followers: &[], extreme: &[] },
    RareSynonyms { word: "very", options: &["pretty", "kinda"], forbidden_followers: &[], extreme: &["insanely", "super"] },
    RareSynonyms { word: "good", options: &["solid", "decent", "okay"], forbidden_followers: &[], extreme: &["killer", "awesome"] },
    RareSynonyms { word: "bad", options: &["rough", "messy", "janky"], forbidden_followers: &[], extreme: &["trash", "garbage"] },
    RareSynonyms { word: "difficult", options: &["tough", "hard", "tricky"], forbidden_followers: &[], extreme: &[] },
    RareSynonyms { word: "interesting", options: &["cool", "weird", "wild"], forbidden_followers: &[], extreme: &["insane", "baller"] },
];

const SEMANTIC_SIMPLIFICATIONS: &[(&str, &str)] = &[
    ("high-conductivity", "strong signal"),
    ("fundamental shift", "big change"),
    ("paradigm", "way of thinking"),
    ("implementation", "setup"),
    ("infrastructure", "base system"),
    ("methodology", "way of doing it"),
];

fn keys(pairs: &[(&'static str, &'static str)]) -> Vec<&'static str> {
    pairs.iter().map(|(k, _)| *k).collect()
}

static_regex!(fn plain_words_re => format!(r"(?i)\b(?:{})\b", phrase_alternation(&keys(PLAIN_WORDS))));
static_regex!(fn rare_synonym_re => format!(
    r"(?i)\b({})\s+([a-z]+)\b",
    RARE_SYNONYMS.iter().map(|r| r.word).collect::<Vec<_>>().join("|")
));
static_regex!(fn semantic_re => format!(
    r"(?i)\b(?:{})\b",
    phrase_alternation(&keys(SEMANTIC_SIMPLIFICATIONS))
));

/// Draw threshold for a swap; intensity 0 never swaps, 100 swaps `rate` of the slots.
fn swap_threshold(cfg: &HumanizerConfig, rate: f64) -> f64 {
    1.0 - rate * f64::from(cfg.intensity.min(100)) / 100.0
}

fn lookup<'a>(table: &'a [(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    let key = key.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub struct PlainWords;

impl Mutator for PlainWords {
    fn name(&self) -> &'static str {
        "plain_words"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.vocab || cfg.simplify
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let threshold = swap_threshold(cfg, 1.0);
        let mut edits = 0;
        let text = rewrite_matches(plain_words_re(), text, &mut edits, |caps| {
            if !rng.roll(threshold) {
                return None;
            }
            lookup(PLAIN_WORDS, &caps[0]).map(|plain| match_case(&caps[0], plain))
        });
        Mutated { text, edits }
    }
}

pub struct RareSynonym;

impl Mutator for RareSynonym {
    fn name(&self) -> &'static str {
        "rare_synonym"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.vocab
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let extreme = cfg.intensity > EXTREME_VOCAB_INTENSITY || cfg.persona == Persona::LazyStudent;
        let threshold = swap_threshold(cfg, RARE_SYNONYM_RATE);
        let mut edits = 0;
        let text = rewrite_matches(rare_synonym_re(), text, &mut edits, |caps| {
            let target = &caps[1];
            let follower = &caps[2];
            let entry = RARE_SYNONYMS.iter().find(|r| r.word.eq_ignore_ascii_case(target))?;
            if entry.forbidden_followers.contains(&follower.to_lowercase().as_str()) {
                return None;
            }
            if !rng.roll(threshold) {
                return None;
            }
            let mut pool: Vec<&str> = entry.options.to_vec();
            if extreme {
                pool.extend_from_slice(entry.extreme);
            }
            let chosen = pick(rng, &pool)?;
            Some(format!("{} {}", match_case(target, chosen), follower))
        });
        Mutated { text, edits }
    }
}

/// Swaps AI-associated formal words for plain ones; each distinct word is decided once.
pub struct FormalVocabulary;

impl Mutator for FormalVocabulary {
    fn name(&self) -> &'static str {
        "formal_vocabulary"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.vocab
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let threshold = swap_threshold(cfg, 1.0);
        let mut decided: Vec<(String, bool)> = Vec::new();
        let mut edits = 0;
        let text = rewrite_matches(banned_vocab_re(), text, &mut edits, |caps| {
            let key = caps[0].to_lowercase();
            let swap = match decided.iter().find(|(w, _)| *w == key) {
                Some((_, swap)) => *swap,
                None => {
                    let swap = rng.roll(threshold);
                    decided.push((key.clone(), swap));
                    swap
                }
            };
            if !swap {
                return None;
            }
            BANNED_VOCABULARY
                .iter()
                .find(|(formal, _)| *formal == key)
                .map(|(_, plain)| match_case(&caps[0], plain))
        });
        Mutated { text, edits }
    }
}

pub struct SemanticSimplifier;

impl Mutator for SemanticSimplifier {
    fn name(&self) -> &'static str {
        "semantic_simplifier"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.vocab && (cfg.simplify || cfg.persona != Persona::Academic)
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let threshold = swap_threshold(cfg, 1.0);
        let mut edits = 0;
        let text = rewrite_matches(semantic_re(), text, &mut edits, |caps| {
            if !rng.roll(threshold) {
                return None;
            }
            lookup(SEMANTIC_SIMPLIFICATIONS, &caps[0]).map(|plain| match_case(&caps[0], plain))
        });
        Mutated { text, edits }
    }
}

pub fn mutators() -> Vec<Box<dyn Mutator + Send + Sync>> {
    vec![
        Box::new(PlainWords),
        Box::new(RareSynonym),
        Box::new(FormalVocabulary),
        Box::new(SemanticSimplifier),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanizer::random::ScriptedRandom;

    #[test]
    fn test_plain_words_keep_case() {
        let out = PlainWords.apply(
            "Moreover, we utilize it. However it works.",
            &HumanizerConfig::default(),
            &mut ScriptedRandom::always(0.999),
        );
        assert_eq!(out.text, "Plus, we use it. But it works.");
        assert_eq!(out.edits, 3);
    }

    #[test]
    fn test_rare_synonym_respects_forbidden_followers() {
        let cfg = HumanizerConfig { intensity: 50, ..HumanizerConfig::default() };
        let out = RareSynonym.apply(
            "A significant growth and a significant result.",
            &cfg,
            &mut ScriptedRandom::always(0.999),
        );
        assert_eq!(out.text, "A significant growth and a main result.");
    }

    #[test]
    fn test_formal_vocabulary_decides_once_per_word() {
        // First draw swaps "robust", second draw keeps "leverage"; repeats reuse the decision.
        let mut rng = ScriptedRandom::new(vec![0.99, 0.0]);
        let cfg = HumanizerConfig { intensity: 50, ..HumanizerConfig::default() };
        let out = FormalVocabulary.apply(
            "Robust tools leverage robust data and leverage habits.",
            &cfg,
            &mut rng,
        );
        assert_eq!(out.text, "Strong tools leverage strong data and leverage habits.");
        assert_eq!(out.edits, 2);
    }

    #[test]
    fn test_zero_intensity_never_swaps_formal_words() {
        let cfg = HumanizerConfig { intensity: 0, ..HumanizerConfig::default() };
        let out = FormalVocabulary.apply("We leverage it.", &cfg, &mut ScriptedRandom::always(0.999));
        assert_eq!(out.text, "We leverage it.");
    }

    #[test]
    fn test_semantic_simplifier_gate() {
        let academic = HumanizerConfig { persona: Persona::Academic, ..HumanizerConfig::default() };
        assert!(!SemanticSimplifier.enabled(&academic));
        let out = SemanticSimplifier.apply(
            "A fundamental shift in infrastructure.",
            &HumanizerConfig::default(),
            &mut ScriptedRandom::always(0.999),
        );
        assert_eq!(out.text, "A big change in base system.");
    }

    #[test]
    fn test_plain_word_swaps_scale_with_intensity() {
        let text = "Moreover we utilize it, however we demonstrate it, therefore we facilitate it, \
            subsequently we implement it, regarding the objective.";
        let swaps = |intensity: u8| {
            let cfg = HumanizerConfig { intensity, ..HumanizerConfig::default() };
            let mut rng = ScriptedRandom::new(vec![0.05, 0.25, 0.45, 0.65, 0.95]);
            PlainWords.apply(text, &cfg, &mut rng).edits
        };
        assert_eq!(swaps(90), 8);
        assert_eq!(swaps(10), 2);
        assert_eq!(swaps(0), 0);
    }

    #[test]
    fn test_zero_intensity_keeps_vocabulary() {
        let cfg = HumanizerConfig { intensity: 0, ..HumanizerConfig::default() };
        let mut rng = ScriptedRandom::always(0.999);
        assert_eq!(SemanticSimplifier.apply("A paradigm.", &cfg, &mut rng).edits, 0);
        assert_eq!(RareSynonym.apply("A very good result.", &cfg, &mut rng).edits, 0);
        let cfg = HumanizerConfig { intensity: 100, ..cfg };
        assert_eq!(RareSynonym.apply("A very good result.", &cfg, &mut rng).edits, 1);
    }
}
