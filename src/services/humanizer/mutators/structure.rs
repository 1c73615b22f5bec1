// Structural Mutators
// Sentence splitting and fusion, clause reordering, hedges, paragraph breaks, frames
//
// All of these run only when the configuration reshapes structure
// (`structure` or `burst`). Hedge, mood and interrupt injection never reuse
// a phrase within one paragraph.

use super::{
    group, join_pieces, lower_opener, map_sentences, rewrite_matches, sentence_pieces, Mutated, Mutator,
    SentenceStarts,
};
use crate::services::humanizer::config::{HumanizerConfig, Persona};
use crate::services::humanizer::random::{pick, RandomSource};
use crate::services::text_processor::{capitalize_first, lowercase_first, map_paragraphs, word_count};

const PASSIVE_THRESHOLD: f64 = 0.6;
const HEDGE_THRESHOLD: f64 = 0.96;
const HEDGE_MIN_INTENSITY: u8 = 70;
const RELATIVE_SPLIT_THRESHOLD: f64 = 0.6;
const CONJUNCTION_SPLIT_THRESHOLD: f64 = 0.7;
const SKELETON_RESULT_THRESHOLD: f64 = 0.5;
const SKELETON_BY_THRESHOLD: f64 = 0.6;
const SKELETON_MIN_INTENSITY: u8 = 40;
const MOOD_THRESHOLD: f64 = 0.78;
const JITTER_SPLIT_THRESHOLD: f64 = 0.4;
const JITTER_FUSE_THRESHOLD: f64 = 0.5;
const JITTER_LONG_SENTENCE: usize = 30;
const JITTER_SHORT_PAIR: usize = 25;
const REDUNDANCY_THRESHOLD: f64 = 0.8;
const REDUNDANCY_MIN_INTENSITY: u8 = 90;
const POSSESSIVE_THRESHOLD: f64 = 0.5;
const INTERRUPT_THRESHOLD: f64 = 0.6;
const INTERRUPT_STACK_THRESHOLD: f64 = 0.85;
const INTERRUPT_STACK_MIN_INTENSITY: u8 = 80;
const PARAGRAPH_BREAK_THRESHOLD: f64 = 0.65;
const ASIDE_THRESHOLD: f64 = 0.75;
const ASIDE_CASUAL_INTENSITY: u8 = 85;
const CHUNK_THRESHOLD: f64 = 0.6;
const OUTRO_THRESHOLD: f64 = 0.7;

const CASUAL_HEDGES: &[&str] = &["like,", "basically,", "literally,", "actually,", "sort of", "i guess", "honestly,"];
const ACADEMIC_HEDGES: &[&str] = &["essentially,", "arguably,", "technically,", "practically,", "in a sense,", "fundamentally,"];

/// Words a hedge must never follow; they read as terms, not prose.
const HEDGE_SKIP_WORDS: &[&str] = &[
    "digital", "outdated", "previous", "manual", "automated", "consistent", "technical", "early",
    "lightweight", "original", "controlled", "structured", "reliable", "requirements", "smells",
    "processes", "syntax", "documents", "traceability", "review",
];

const CASUAL_MOODS: &[&str] = &["surprisingly,", "sadly,", "luckily,", "weirdly,", "thankfully,", "ironically,", "honestly,"];
const ACADEMIC_MOODS: &[&str] = &["notably,", "interestingly,", "significantly,", "crucially,", "historically,", "conversely,"];

const ACADEMIC_INTERRUPTS: &[&str] = &[", I think,", ", arguably,", ", technically,", ", in a sense,"];
const CASUAL_INTERRUPTS: &[&str] = &[", like,", ", I guess,", ", honestly,"];

const CASUAL_ASIDES: &[&str] = &[
    " honestly it reminds me of class.",
    " my professor mentioned this once.",
    " weirdly enough.",
    " I was reading about this yesterday.",
    " strangely.",
    " for real though.",
];
const ACADEMIC_ASIDES: &[&str] = &[
    " which is a point worth noting.",
    " as discussed in early lectures.",
    " in my view, this is key.",
    " something I've noted before.",
    " essentially.",
    " curiously.",
];

const CASUAL_INTROS: &[&str] = &["So, looking at this,", "Honestly,", "Basically,", "If you think about it,", "I feel like,"];
const ACADEMIC_INTROS: &[&str] = &[
    "For example,",
    "In this case,",
    "It is clear that,",
    "If you look at,",
    "I have found that,",
    "Of the many factors,",
    "In my view,",
    "Essentially,",
    "Broadly speaking,",
    "From my perspective,",
];
/// Openers that count as an existing frame.
const KNOWN_INTROS: &[&str] = &[
    "So, looking at this,", "Honestly,", "Basically,", "If you think about it,", "I feel like,",
    "In a sense, looking at this,", "Essentially,", "Broadly speaking,", "From my perspective,",
    "As I see it,", "Notably,", "Interestingly,", "Interestingly enough,",
];
const OUTROS: &[&str] = &[" I guess that's it.", " pretty much.", " at least I think so.", " hopefully that makes sense."];

static_regex!(fn bullet_re => r"(?m)^[ \t]*[-*•][ \t]+(.+?)[ \t]*$");
static_regex!(fn header_re => r"(?m)^#+[ \t]+(.+?)[ \t]*$");
static_regex!(fn passive_clause_re =>
    r"\b([Tt]he|[Aa]n?|[Tt]his|[Tt]hat)\s+([a-z]+)\s+was\s+([a-z]+ed)\s+by\s+(the\s+)?([A-Za-z]+)\b");
static_regex!(fn hedge_slot_re => r"(\w+)(\s)");
static_regex!(fn relative_clause_re => r",\s*which\s+(is|are|was|were)\s+([^,.!?]+)([.!?])");
static_regex!(fn conjunction_split_re => r",?\s+and\s+(we|I|they|he|she|it)\s+");
static_regex!(fn because_forward_re => r"^([A-Z][^.!?]*?)\s+because\s+([^.!?]+?)([.!?]+)$");
static_regex!(fn because_reverse_re => r"^(?:Since|Because)\s+([^,.!?]+),\s+([^.!?]+?)([.!?]+)$");
static_regex!(fn result_of_re => r"([^.!?\s][^.!?]*?)\s+(?i:is\s+a\s+result\s+of)\s+([^.!?]+)([.!?])");
static_regex!(fn by_means_re => r"\bBy\s+([^,.!?]+),\s+([^.!?]+)([.!?])");
static_regex!(fn sentence_start_re => r"\.(\s+)([A-Z]\w*)");
static_regex!(fn long_sentence_split_re => r",?\s+(?:and|but|which)\s+(\w)");
static_regex!(fn redundancy_re => r"(\w+)\s+(was|is|are|were)\s+(?:(?:very|really|quite)\s+)?([a-z]+)\.");
static_regex!(fn possessive_re => r"\bthe\s+([a-z]+)\s+of\s+the\s+([a-z]+)\b");
static_regex!(fn interrupt_slot_re =>
    r"(\s+)(is|are|was|were|shows|show|means|argues|argued|claims|suggests)(\s+)");
static_regex!(fn paragraph_slot_re => r"\.[ \t]+([A-Z])");
static_regex!(fn aside_slot_re => r"\.(\s+)([A-Z])");
static_regex!(fn chunk_re => r"\s+(?:because|but|so)\s+([a-z])");

fn reshapes(cfg: &HumanizerConfig) -> bool {
    cfg.reshapes_structure()
}

/// Pick an unused phrase from `pool`, marking it used.
fn fresh_pick(rng: &mut dyn RandomSource, pool: &[&'static str], used: &mut Vec<&'static str>) -> Option<&'static str> {
    let available: Vec<&'static str> = pool.iter().copied().filter(|p| !used.contains(p)).collect();
    let picked = *pick(rng, &available)?;
    used.push(picked);
    Some(picked)
}

fn strip_terminal(body: &str) -> &str {
    body.trim_end_matches(['.', '!', '?'])
}

pub struct MarkdownFlatten;

impl Mutator for MarkdownFlatten {
    fn name(&self) -> &'static str {
        "markdown_flatten"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        cfg.structure
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(bullet_re(), text, &mut edits, |caps| {
            let item = strip_terminal(&caps[1]);
            Some(if rng.roll(0.5) {
                format!("Also, {}.", lower_opener(item, item))
            } else {
                format!("{}.", item)
            })
        });
        let text = rewrite_matches(header_re(), &text, &mut edits, |caps| {
            Some(format!("{}.", strip_terminal(&caps[1])))
        });
        Mutated { text, edits }
    }
}

/// "The report was reviewed by the committee" -> "The committee reviewed the report"
pub struct PassiveToActive;

impl Mutator for PassiveToActive {
    fn name(&self) -> &'static str {
        "passive_to_active"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(passive_clause_re(), text, &mut edits, |caps| {
            if !rng.roll(PASSIVE_THRESHOLD) {
                return None;
            }
            let det = &caps[1];
            let agent = format!("{}{}", group(caps, 4), &caps[5]);
            Some(format!(
                "{} {} {} {}",
                match_det_case(det, &agent),
                &caps[3],
                lowercase_first(det),
                &caps[2]
            ))
        });
        Mutated { text, edits }
    }
}

fn match_det_case(det: &str, agent: &str) -> String {
    if det.starts_with(char::is_uppercase) {
        capitalize_first(agent)
    } else {
        agent.to_string()
    }
}

pub struct HedgeInjection;

impl Mutator for HedgeInjection {
    fn name(&self) -> &'static str {
        "hedge_injection"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg) && cfg.intensity > HEDGE_MIN_INTENSITY
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let pool = if cfg.casual_voice() { CASUAL_HEDGES } else { ACADEMIC_HEDGES };
        let mut edits = 0;
        let text = map_paragraphs(text, |paragraph| {
            let mut used = Vec::new();
            rewrite_matches(hedge_slot_re(), paragraph, &mut edits, |caps| {
                let word = &caps[1];
                if word.chars().count() < 5 || HEDGE_SKIP_WORDS.contains(&word.to_lowercase().as_str()) {
                    return None;
                }
                if !rng.roll(HEDGE_THRESHOLD) {
                    return None;
                }
                let hedge = fresh_pick(rng, pool, &mut used)?;
                Some(format!("{} {}{}", word, hedge, &caps[2]))
            })
        });
        Mutated { text, edits }
    }
}

/// ", which is X." -> ". It is X."
pub struct RelativeClauseSplit;

impl Mutator for RelativeClauseSplit {
    fn name(&self) -> &'static str {
        "relative_clause_split"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(relative_clause_re(), text, &mut edits, |caps| {
            if !rng.roll(RELATIVE_SPLIT_THRESHOLD) {
                return None;
            }
            let copula = &caps[1];
            let subject = if copula == "are" || copula == "were" { "They" } else { "It" };
            Some(format!(". {} {} {}{}", subject, copula, caps[2].trim(), &caps[3]))
        });
        Mutated { text, edits }
    }
}

pub struct ConjunctionSplit;

impl Mutator for ConjunctionSplit {
    fn name(&self) -> &'static str {
        "conjunction_split"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(conjunction_split_re(), text, &mut edits, |caps| {
            rng.roll(CONJUNCTION_SPLIT_THRESHOLD)
                .then(|| format!(". {} ", capitalize_first(&caps[1])))
        });
        Mutated { text, edits }
    }
}

/// "X because Y." <-> "Since Y, x." decided sentence by sentence
pub struct ClauseInversion;

impl Mutator for ClauseInversion {
    fn name(&self) -> &'static str {
        "clause_inversion"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let threshold = if cfg.intensity > 70 { 0.3 } else { 0.6 };
        let mut edits = 0;
        let text = map_sentences(text, &mut edits, |sentence| {
            if let Some(caps) = because_forward_re().captures(sentence) {
                return rng.roll(threshold).then(|| {
                    format!("Since {}, {}{}", caps[2].trim(), lower_opener(caps[1].trim(), text), &caps[3])
                });
            }
            if let Some(caps) = because_reverse_re().captures(sentence) {
                return rng.roll(threshold).then(|| {
                    format!(
                        "{} because {}{}",
                        capitalize_first(caps[2].trim()),
                        lower_opener(caps[1].trim(), text),
                        &caps[3]
                    )
                });
            }
            None
        });
        Mutated { text, edits }
    }
}

/// "X is a result of Y." -> "Y resulted in x." and "By A, B." -> "B by A."
pub struct SkeletonShuffle;

impl Mutator for SkeletonShuffle {
    fn name(&self) -> &'static str {
        "skeleton_shuffle"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg) && (cfg.structure || cfg.intensity > SKELETON_MIN_INTENSITY)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(result_of_re(), text, &mut edits, |caps| {
            rng.roll(SKELETON_RESULT_THRESHOLD).then(|| {
                format!(
                    "{} resulted in {}{}",
                    capitalize_first(caps[2].trim()),
                    lower_opener(caps[1].trim(), text),
                    &caps[3]
                )
            })
        });
        let text = rewrite_matches(by_means_re(), &text, &mut edits, |caps| {
            rng.roll(SKELETON_BY_THRESHOLD).then(|| {
                format!("{} by {}{}", capitalize_first(caps[2].trim()), caps[1].trim(), &caps[3])
            })
        });
        Mutated { text, edits }
    }
}

pub struct MoodInjection;

impl Mutator for MoodInjection {
    fn name(&self) -> &'static str {
        "mood_injection"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let pool = if cfg.casual_voice() { CASUAL_MOODS } else { ACADEMIC_MOODS };
        let mut edits = 0;
        let text = map_paragraphs(text, |paragraph| {
            let mut used = Vec::new();
            let starts = SentenceStarts::of(paragraph);
            rewrite_matches(sentence_start_re(), paragraph, &mut edits, |caps| {
                if !starts.at_group(caps, 2) || !rng.roll(MOOD_THRESHOLD) {
                    return None;
                }
                let mood = fresh_pick(rng, pool, &mut used)?;
                Some(format!(".{}{} {}", &caps[1], capitalize_first(mood), lower_opener(&caps[2], paragraph)))
            })
        });
        Mutated { text, edits }
    }
}

/// Splits very long sentences and fuses short neighbours with ", and".
pub struct RhythmJitter;

impl Mutator for RhythmJitter {
    fn name(&self) -> &'static str {
        "rhythm_jitter"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut pieces = sentence_pieces(text);
        if pieces.iter().filter(|p| !p.body.is_empty()).count() <= 3 {
            return Mutated::unchanged(text);
        }

        let mut edits = 0;
        let mut i = 0;
        while i + 1 < pieces.len() {
            let len_a = word_count(&pieces[i].body);
            if len_a > JITTER_LONG_SENTENCE && rng.roll(JITTER_SPLIT_THRESHOLD) {
                if let Some(split) = split_long_sentence(&pieces[i].body) {
                    pieces[i].body = split;
                    edits += 1;
                }
            }

            let len_b = word_count(&pieces[i + 1].body);
            let fusable = pieces[i].body.ends_with(['.', '!', '?'])
                && !pieces[i].trail.contains('\n')
                && !pieces[i + 1].body.is_empty();
            if fusable && len_a + len_b < JITTER_SHORT_PAIR && rng.roll(JITTER_FUSE_THRESHOLD) {
                pieces[i].body = format!("{}, and", strip_terminal(&pieces[i].body));
                pieces[i + 1].body = lower_opener(&pieces[i + 1].body, text);
                edits += 1;
                i += 2;
                continue;
            }
            i += 1;
        }

        Mutated { text: join_pieces(&pieces), edits }
    }
}

fn split_long_sentence(body: &str) -> Option<String> {
    let caps = long_sentence_split_re().captures(body)?;
    let whole = caps.get(0)?;
    Some(format!(
        "{}. {}{}",
        &body[..whole.start()],
        caps[1].to_uppercase(),
        &body[whole.end()..]
    ))
}

/// "X is good." -> "X is good. I mean, good."
pub struct RedundancyLoop;

impl Mutator for RedundancyLoop {
    fn name(&self) -> &'static str {
        "redundancy_loop"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg) && (cfg.is_lazy_student() || cfg.intensity > REDUNDANCY_MIN_INTENSITY)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let starts = SentenceStarts::of(text);
        let text = rewrite_matches(redundancy_re(), text, &mut edits, |caps| {
            let closes = caps.get(0).is_some_and(|m| starts.closes_at(text, m.end()));
            (closes && rng.roll(REDUNDANCY_THRESHOLD))
                .then(|| format!("{} I mean, {}.", &caps[0], &caps[3]))
        });
        Mutated { text, edits }
    }
}

/// "the X of the Y" -> "the Y's X"
pub struct PossessiveRewrite;

impl Mutator for PossessiveRewrite {
    fn name(&self) -> &'static str {
        "possessive_rewrite"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(possessive_re(), text, &mut edits, |caps| {
            rng.roll(POSSESSIVE_THRESHOLD)
                .then(|| format!("the {}'s {}", &caps[2], &caps[1]))
        });
        Mutated { text, edits }
    }
}

/// Parenthetical interrupts after reporting verbs and copulas.
pub struct InterruptStacking;

impl Mutator for InterruptStacking {
    fn name(&self) -> &'static str {
        "interrupt_stacking"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let pool = if cfg.casual_voice() { CASUAL_INTERRUPTS } else { ACADEMIC_INTERRUPTS };
        let may_stack = cfg.intensity > INTERRUPT_STACK_MIN_INTENSITY || cfg.persona == Persona::Academic;
        let mut edits = 0;
        let text = map_paragraphs(text, |paragraph| {
            let mut used = Vec::new();
            rewrite_matches(interrupt_slot_re(), paragraph, &mut edits, |caps| {
                let (lead, verb, tail) = (&caps[1], &caps[2], &caps[3]);
                if may_stack && rng.roll(INTERRUPT_STACK_THRESHOLD) {
                    let mut trial = used.clone();
                    if let (Some(h1), Some(h2)) =
                        (fresh_pick(rng, pool, &mut trial), fresh_pick(rng, pool, &mut trial))
                    {
                        used = trial;
                        return Some(format!("{}{}{} {}{}", lead, verb, h1, h2.trim_start_matches(", "), tail));
                    }
                }
                let mut trial = used.clone();
                let interrupt = fresh_pick(rng, pool, &mut trial)?;
                if verb.to_lowercase().starts_with("argu") && interrupt.contains("argu") {
                    return None;
                }
                if !rng.roll(INTERRUPT_THRESHOLD) {
                    return None;
                }
                used = trial;
                Some(format!("{}{}{}{}", lead, verb, interrupt, tail))
            })
        });
        Mutated { text, edits }
    }
}

pub struct ParagraphBreak;

impl Mutator for ParagraphBreak {
    fn name(&self) -> &'static str {
        "paragraph_break"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let starts = SentenceStarts::of(text);
        let text = rewrite_matches(paragraph_slot_re(), text, &mut edits, |caps| {
            (starts.at_group(caps, 1) && rng.roll(PARAGRAPH_BREAK_THRESHOLD))
                .then(|| format!(".\n\n{}", &caps[1]))
        });
        Mutated { text, edits }
    }
}

/// Personal asides dropped between sentences.
pub struct AsideInjection;

impl Mutator for AsideInjection {
    fn name(&self) -> &'static str {
        "aside_injection"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let casual = cfg.is_lazy_student() || cfg.intensity > ASIDE_CASUAL_INTENSITY;
        let pool = if casual { CASUAL_ASIDES } else { ACADEMIC_ASIDES };
        let mut edits = 0;
        let starts = SentenceStarts::of(text);
        let text = rewrite_matches(aside_slot_re(), text, &mut edits, |caps| {
            if !starts.at_group(caps, 2) || !rng.roll(ASIDE_THRESHOLD) {
                return None;
            }
            let aside = pick(rng, pool)?;
            Some(format!(".{}{}{}", aside, &caps[1], &caps[2]))
        });
        Mutated { text, edits }
    }
}

pub struct SentenceChunking;

impl Mutator for SentenceChunking {
    fn name(&self) -> &'static str {
        "sentence_chunking"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, _cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let mut edits = 0;
        let text = rewrite_matches(chunk_re(), text, &mut edits, |caps| {
            rng.roll(CHUNK_THRESHOLD)
                .then(|| format!(". {}", caps[1].to_uppercase()))
        });
        Mutated { text, edits }
    }
}

/// Opener unless one is already present, sometimes a closing remark.
pub struct FrameInjection;

impl Mutator for FrameInjection {
    fn name(&self) -> &'static str {
        "frame_injection"
    }

    fn enabled(&self, cfg: &HumanizerConfig) -> bool {
        reshapes(cfg)
    }

    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated {
        let body = text.trim();
        if body.is_empty() {
            return Mutated::unchanged(text);
        }

        let mut edits = 0;
        let mut out = if KNOWN_INTROS.iter().any(|intro| body.starts_with(intro)) {
            body.to_string()
        } else {
            let pool = if cfg.casual_voice() { CASUAL_INTROS } else { ACADEMIC_INTROS };
            match pick(rng, pool) {
                Some(intro) => {
                    edits += 1;
                    format!("{} {}", intro, lower_opener(body, body))
                }
                None => body.to_string(),
            }
        };
        if rng.roll(OUTRO_THRESHOLD) {
            if let Some(outro) = pick(rng, OUTROS) {
                out.push_str(outro);
                edits += 1;
            }
        }
        Mutated { text: out, edits }
    }
}

pub fn mutators() -> Vec<Box<dyn Mutator + Send + Sync>> {
    vec![
        Box::new(MarkdownFlatten),
        Box::new(PassiveToActive),
        Box::new(HedgeInjection),
        Box::new(RelativeClauseSplit),
        Box::new(ConjunctionSplit),
        Box::new(ClauseInversion),
        Box::new(SkeletonShuffle),
        Box::new(MoodInjection),
        Box::new(RhythmJitter),
        Box::new(RedundancyLoop),
        Box::new(PossessiveRewrite),
        Box::new(InterruptStacking),
        Box::new(ParagraphBreak),
        Box::new(AsideInjection),
        Box::new(SentenceChunking),
        Box::new(FrameInjection),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanizer::random::ScriptedRandom;

    fn cfg() -> HumanizerConfig {
        HumanizerConfig { intensity: 60, ..HumanizerConfig::default() }
    }

    fn fire(m: &dyn Mutator, text: &str) -> String {
        m.apply(text, &cfg(), &mut ScriptedRandom::always(0.999)).text
    }

    #[test]
    fn test_markdown_flatten_headers() {
        let out = MarkdownFlatten.apply("# Results\nplain line", &cfg(), &mut ScriptedRandom::always(0.0));
        assert_eq!(out.text, "Results.\nplain line");
        let out = fire(&MarkdownFlatten, "- First item\n- Second item.");
        assert_eq!(out, "Also, first item.\nAlso, second item.");
    }

    #[test]
    fn test_passive_to_active() {
        assert_eq!(
            fire(&PassiveToActive, "The report was reviewed by the committee."),
            "The committee reviewed the report."
        );
        assert_eq!(
            fire(&PassiveToActive, "Then a change was approved by Maria."),
            "Then Maria approved a change."
        );
    }

    #[test]
    fn test_relative_clause_split() {
        assert_eq!(
            fire(&RelativeClauseSplit, "We used the tool, which is fast."),
            "We used the tool. It is fast."
        );
        assert_eq!(
            fire(&RelativeClauseSplit, "We met the teams, which were tired."),
            "We met the teams. They were tired."
        );
    }

    #[test]
    fn test_clause_inversion_both_directions() {
        let out = fire(&ClauseInversion, "We stayed inside because it rained. Since the bus was late, we walked.");
        assert_eq!(out, "Since it rained, we stayed inside. We walked because the bus was late.");
    }

    #[test]
    fn test_skeleton_shuffle() {
        assert_eq!(
            fire(&SkeletonShuffle, "The delay is a result of poor planning."),
            "Poor planning resulted in the delay."
        );
        assert_eq!(
            fire(&SkeletonShuffle, "By reading daily, we learn more."),
            "We learn more by reading daily."
        );
    }

    #[test]
    fn test_mood_injection_dedupes_within_paragraph() {
        let text = "One. Two. Three. Four. Five. Six. Seven. Eight.";
        let out = fire(&MoodInjection, text);
        for mood in ACADEMIC_MOODS {
            let cap = capitalize_first(mood);
            assert!(out.matches(cap.as_str()).count() <= 1, "{}", out);
        }
        assert_eq!(ACADEMIC_MOODS.iter().filter(|m| out.contains(&capitalize_first(m))).count(), 6);
    }

    #[test]
    fn test_rhythm_jitter_fuses_short_pairs() {
        let text = "It was cold. We left early. The road was icy. Nobody spoke.";
        let out = fire(&RhythmJitter, text);
        assert_eq!(out, "It was cold, and we left early. The road was icy, and nobody spoke.");
    }

    #[test]
    fn test_rhythm_jitter_needs_four_sentences() {
        let text = "It was cold. We left early. Nobody spoke.";
        assert_eq!(fire(&RhythmJitter, text), text);
    }

    #[test]
    fn test_possessive_rewrite() {
        assert_eq!(fire(&PossessiveRewrite, "the end of the day"), "the day's end");
    }

    #[test]
    fn test_interrupts_never_repeat_in_paragraph() {
        let text = "It is big and it is red and it is old and it is new and it is odd and it is fun.";
        let out = fire(&InterruptStacking, text);
        for interrupt in ACADEMIC_INTERRUPTS {
            let bare = interrupt.trim_start_matches(", ");
            assert!(out.matches(bare).count() <= 1, "{}", out);
        }
    }

    #[test]
    fn test_paragraph_break_and_chunking() {
        assert_eq!(fire(&ParagraphBreak, "One. Two."), "One.\n\nTwo.");
        assert_eq!(fire(&SentenceChunking, "We left but they stayed."), "We left. They stayed.");
    }

    #[test]
    fn test_frame_injection_respects_existing_intro() {
        let out = FrameInjection.apply("Honestly, it works.", &cfg(), &mut ScriptedRandom::always(0.0));
        assert_eq!(out.text, "Honestly, it works.");
        assert_eq!(out.edits, 0);

        let out = FrameInjection.apply("The plan works.", &cfg(), &mut ScriptedRandom::always(0.0));
        assert_eq!(out.text, "For example, the plan works.");
        assert_eq!(out.edits, 1);
    }

    #[test]
    fn test_frame_injection_outro_is_gated() {
        let out = FrameInjection.apply("The plan works.", &cfg(), &mut ScriptedRandom::always(0.999));
        assert_eq!(out.text, "From my perspective, the plan works. hopefully that makes sense.");
        assert_eq!(out.edits, 2);

        let out = FrameInjection.apply("Honestly, it works.", &cfg(), &mut ScriptedRandom::new(vec![0.5]));
        assert!(!out.text.contains("that's it"), "{}", out.text);
    }

    #[test]
    fn test_frame_injection_keeps_title_case() {
        let out = FrameInjection.apply("Dr. Smith approved it.", &cfg(), &mut ScriptedRandom::always(0.0));
        assert_eq!(out.text, "For example, Dr. Smith approved it.");
        let out = FrameInjection.apply("Smith approved it, and Smith signed.", &cfg(), &mut ScriptedRandom::always(0.0));
        assert_eq!(out.text, "For example, Smith approved it, and Smith signed.");
    }

    #[test]
    fn test_sentence_slots_skip_title_abbreviations() {
        let text = "Dr. Smith met Mr. Jones. They talked.";
        assert_eq!(fire(&ParagraphBreak, text), "Dr. Smith met Mr. Jones.\n\nThey talked.");

        let out = fire(&AsideInjection, text);
        assert!(out.starts_with("Dr. Smith met Mr. Jones."), "{}", out);
        assert!(!out.contains("Dr.,") && !out.contains("Mr.,"), "{}", out);

        let out = fire(&MoodInjection, text);
        assert!(out.contains("Dr. Smith met Mr. Jones."), "{}", out);
        assert!(!out.contains("dr.") && !out.contains("mr.") && !out.contains(" jones"), "{}", out);
    }

    #[test]
    fn test_rhythm_jitter_keeps_names_capitalized() {
        let text = "It was cold. Anna left early. The road was icy. We called Anna.";
        let out = fire(&RhythmJitter, text);
        assert_eq!(out, "It was cold, and Anna left early. The road was icy, and we called Anna.");
    }

    #[test]
    fn test_structure_gates() {
        let off = HumanizerConfig { structure: false, burst: false, ..cfg() };
        assert!(mutators().iter().all(|m| !m.enabled(&off)));
        let low = HumanizerConfig { intensity: 70, ..cfg() };
        assert!(!HedgeInjection.enabled(&low));
        assert!(!RedundancyLoop.enabled(&low));
    }
}
