// Re-narration
// Aggressive rewrites for very high intensity or the lazy-student persona

use super::{join_pieces, lower_opener, rewrite_matches, sentence_pieces, Mutated, Mutator, SentenceStarts};
use crate::services::humanizer::config::HumanizerConfig;
use crate::services::humanizer::random::{pick, RandomSource};

const RENARRATE_MIN_INTENSITY: u8 = 85;
const MERGE_THRESHOLD: f64 = 0.5;
const FAT_FINGER_THRESHOLD: f64 = 0.88;
const SUBJECTIVITY_THRESHOLD: f64 = 0.85;
const FUSION_THRESHOLD: f64 = 0.6;

const CONNECTOR_SWAPS: &[(&str, &str)] = &[
    ("Therefore,", "So,"),
    ("Thus,", "Anyway,"),
    ("Moreover,", "Plus,"),
    ("In conclusion,", "Basically,"),
    ("Finally,", "Lastly,"),
    ("However,", "But,"),
];

const FAT_FINGERS: &[(&str, &str)] = &[
    ("the", "teh"),
    ("and", "adn"),
    ("because", "cuz"),
    ("really", "rly"),
    ("that", "taht"),
    ("with", "wth"),
];

const OPENERS: &[&str] = &["Honestly, ", "I mean, ", "To be fair, ", "Actually, "];

static_regex!(fn merge_re => r"\.\n\n([A-Z])");
static_regex!(fn connector_re => r"\b(?:Therefore|Thus|Moreover|In conclusion|Finally|However),");
static_regex!(fn fat_finger_re => format!(
    r"\b(?:{})\b",
    FAT_FINGERS.iter().map(|(w, _)| *w).collect::<Vec<_>>().join("|")
));
static_regex!(fn opener_slot_re => r"(^|[.!?]\s+)([A-Z][a-z]*)");
static_regex!(fn fusion_tail_re => r"\w\.$");
static_regex!(fn fusion_head_re => r"^[A-Z][a-z]+\b");

fn renarrates(cfg: &HumanizerConfig) -> bool {
    cfg.intensity > RENARRATE_MIN_INTENSITY || cfg.is_lazy_student()
}

pub struct ParagraphMerge;

impl Mutator for ParagraphMerge {
    fn name(&self) -> &'static str {
        "paragraph_merge"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        renarrates(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(merge_re(), text, &mut edits, |caps| {
            rng.roll(MERGE_THRESHOLD).then(|| format!(". {}", &caps[1]))
        });
        Mutated { text, edits }
    }
}

pub struct ConnectorSwap;

impl Mutator for ConnectorSwap {
    fn name(&self) -> &'static str {
        "connector_swap"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        renarrates(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, _rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(connector_re(), text, &mut edits, |caps| {
            CONNECTOR_SWAPS
                .iter()
                .find(|(formal, _)| *formal == &caps[0])
                .map(|(_, casual)| casual.to_string())
        });
        Mutated { text, edits }
    }
}

pub struct FatFinger;

impl Mutator for FatFinger {
    fn name(&self) -> &'static str {
        "fat_finger"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        renarrates(cfg) && cfg.typo
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(fat_finger_re(), text, &mut edits, |caps| {
            if !rng.roll(FAT_FINGER_THRESHOLD) {
                return None;
            }
            FAT_FINGERS
                .iter()
                .find(|(w, _)| *w == &caps[0])
                .map(|(_, typo)| typo.to_string())
        });
        Mutated { text, edits }
    }
}

/// Sentence openers like "Honestly, " ahead of a capitalized sentence start.
pub struct SubjectivityInjection;

impl Mutator for SubjectivityInjection {
    fn name(&self) -> &'static str {
        "subjectivity_injection"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        renarrates(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let starts = SentenceStarts::of(text);
        let text = rewrite_matches(opener_slot_re(), text, &mut edits, |caps| {
            let slot = caps.get(2)?;
            if slot.start() > 0 && !starts.contains(slot.start()) {
                return None;
            }
            let word = slot.as_str();
            if OPENERS.iter().any(|o| o.starts_with(word)) || !rng.roll(SUBJECTIVITY_THRESHOLD) {
                return None;
            }
            let opener = pick(rng, OPENERS)?;
            // Lowercase with the rest of the sentence in view so "Dr." keeps its case.
            let lowered = lower_opener(&text[slot.start()..], text);
            let word = lowered.get(..word.len()).unwrap_or(word);
            Some(format!("{}{}{}", &caps[1], opener, word))
        });
        Mutated { text, edits }
    }
}

/// "done. Then" -> "done, then"
pub struct ClauseFusion;

impl Mutator for ClauseFusion {
    fn name(&self) -> &'static str {
        "clause_fusion"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        renarrates(cfg) && (cfg.burst || cfg.typo)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut pieces = sentence_pieces(text);
        let mut edits = 0;
        for i in 1..pieces.len() {
            let fusable = fusion_tail_re().is_match(&pieces[i - 1].body)
                && !pieces[i - 1].trail.is_empty()
                && !pieces[i - 1].trail.contains('\n')
                && fusion_head_re().is_match(&pieces[i].body);
            if fusable && rng.roll(FUSION_THRESHOLD) {
                let body = &pieces[i - 1].body;
                pieces[i - 1].body = format!("{},", &body[..body.len() - 1]);
                pieces[i].body = lower_opener(&pieces[i].body, text);
                edits += 1;
            }
        }
        Mutated { text: join_pieces(&pieces), edits }
    }
}

pub fn mutators() -> Vec<Box<dyn Mutator + Send + Sync>> {
    vec![
        Box::new(ParagraphMerge),
        Box::new(ConnectorSwap),
        Box::new(FatFinger),
        Box::new(SubjectivityInjection),
        Box::new(ClauseFusion),
    ]
}
