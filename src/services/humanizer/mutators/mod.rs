// Rewrite Mutators
// Independently toggleable text mutations, grouped by pipeline stage:
// - esl: grammar noise typical of second-language writers
// - vocabulary: simplification and synonym swaps
// - structure: sentence and paragraph reshaping, hedges, frames
// - fluff: filler phrases and typos
// - renarrate: aggressive re-narration at high intensity

use regex::{Captures, Regex};

use super::config::HumanizerConfig;
use super::random::RandomSource;
use crate::services::text_processor::{lowercase_first, sentence_spans};

pub mod esl;
pub mod vocabulary;
pub mod structure;
pub mod fluff;
pub mod renarrate;

/// Rewritten text plus the number of edits made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutated {
    pub text: String,
    pub edits: usize,
}

impl Mutated {
    pub fn unchanged(text: &str) -> Self {
        Self { text: text.to_string(), edits: 0 }
    }
}

pub trait Mutator {
    /// Stable identifier used in rewrite statistics.
    fn name(&self) -> &'static str;

    fn enabled(&self, cfg: &HumanizerConfig) -> bool;

    /// Must treat "nothing matched" as a no-op.
    fn apply(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> Mutated;
}

/// Rebuild `text`, replacing each match for which `f` returns a replacement.
pub fn rewrite_matches<F>(re: &Regex, text: &str, edits: &mut usize, mut f: F) -> String
where
    F: FnMut(&Captures) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        match f(&caps) {
            Some(replacement) => {
                *edits += 1;
                out.push_str(&replacement);
            }
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Capture group text or "" when the group did not participate.
pub(crate) fn group<'t>(caps: &Captures<'t>, idx: usize) -> &'t str {
    caps.get(idx).map_or("", |m| m.as_str())
}

/// Byte offsets where the tokenizer starts a new sentence, so "Dr. Smith" is never a slot.
pub(crate) struct SentenceStarts {
    text_len: usize,
    starts: Vec<usize>,
}

impl SentenceStarts {
    pub fn of(text: &str) -> Self {
        let starts = sentence_spans(text)
            .into_iter()
            .map(|(start, _)| start)
            .filter(|&start| start > 0 && start < text.len())
            .collect();
        Self { text_len: text.len(), starts }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.starts.binary_search(&offset).is_ok()
    }

    /// Whether capture `idx` begins a sentence.
    pub fn at_group(&self, caps: &Captures, idx: usize) -> bool {
        caps.get(idx).is_some_and(|m| self.contains(m.start()))
    }

    /// Whether the terminator ending just before `offset` closes a sentence.
    pub fn closes_at(&self, text: &str, offset: usize) -> bool {
        let rest = &text[offset..];
        let next = offset + (rest.len() - rest.trim_start().len());
        next >= self.text_len || self.contains(next)
    }
}

/// Leading run of letters, e.g. "Smith" in "Smith's report".
fn leading_word(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_alphabetic()).unwrap_or(s.len());
    &s[..end]
}

/// Capitalized somewhere in `context` other than a sentence start.
fn is_proper_noun(word: &str, context: &str) -> bool {
    if word.chars().count() < 2 || !word.starts_with(|c: char| c.is_uppercase()) {
        return false;
    }
    let starts = SentenceStarts::of(context);
    context.match_indices(word).any(|(at, _)| {
        let before = context[..at].chars().next_back();
        let after = context[at + word.len()..].chars().next();
        at > 0
            && !starts.contains(at)
            && before.is_some_and(|c| !c.is_alphanumeric() && c != '\n')
            && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Lowercase a sentence opener moved mid-sentence; names and titles keep their case.
pub(crate) fn lower_opener(s: &str, context: &str) -> String {
    if is_proper_noun(leading_word(s), context) {
        return s.to_string();
    }
    lowercase_first(s)
}

/// One sentence span split into surrounding whitespace and trimmed body.
#[derive(Debug, Clone)]
pub(crate) struct SentencePiece {
    pub lead: String,
    pub body: String,
    pub trail: String,
}

pub(crate) fn sentence_pieces(text: &str) -> Vec<SentencePiece> {
    sentence_spans(text)
        .into_iter()
        .map(|(start, end)| {
            let raw = &text[start..end];
            let body = raw.trim();
            let lead_len = raw.len() - raw.trim_start().len();
            let trail_start = lead_len + body.len();
            SentencePiece {
                lead: raw[..lead_len].to_string(),
                body: body.to_string(),
                trail: raw[trail_start..].to_string(),
            }
        })
        .collect()
}

pub(crate) fn join_pieces(pieces: &[SentencePiece]) -> String {
    pieces
        .iter()
        .map(|p| format!("{}{}{}", p.lead, p.body, p.trail))
        .collect()
}

/// Rewrite sentence bodies one at a time, keeping the whitespace between them.
pub(crate) fn map_sentences<F>(text: &str, edits: &mut usize, mut f: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut pieces = sentence_pieces(text);
    for piece in pieces.iter_mut().filter(|p| !p.body.is_empty()) {
        if let Some(rewritten) = f(&piece.body) {
            *edits += 1;
            piece.body = rewritten;
        }
    }
    join_pieces(&pieces)
}

/// Pipeline in execution order
pub fn default_pipeline() -> Vec<Box<dyn Mutator + Send + Sync>> {
    let mut pipeline: Vec<Box<dyn Mutator + Send + Sync>> = Vec::new();
    pipeline.extend(esl::mutators());
    pipeline.extend(vocabulary::mutators());
    pipeline.extend(structure::mutators());
    pipeline.extend(fluff::mutators());
    pipeline.extend(renarrate::mutators());
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;

    static_regex!(fn digits_re => r"\d+");

    #[test]
    fn test_rewrite_matches_counts_edits() {
        let mut edits = 0;
        let out = rewrite_matches(digits_re(), "a1 b22 c333", &mut edits, |caps| {
            (caps[0].len() > 1).then(|| "#".to_string())
        });
        assert_eq!(out, "a1 b# c#");
        assert_eq!(edits, 2);
    }

    #[test]
    fn test_map_sentences_keeps_whitespace() {
        let mut edits = 0;
        let text = "  One here.\n\nTwo there.  ";
        let out = map_sentences(text, &mut edits, |s| s.starts_with("Two").then(|| "2.".to_string()));
        assert_eq!(out, "  One here.\n\n2.  ");
        assert_eq!(edits, 1);
        assert_eq!(join_pieces(&sentence_pieces(text)), text);
    }

    #[test]
    fn test_sentence_starts_follow_tokenizer() {
        let text = "Dr. Smith met Mr. Jones. They left.";
        let starts = SentenceStarts::of(text);
        assert!(!starts.contains(text.find("Smith").unwrap_or(0)));
        assert!(!starts.contains(text.find("Jones").unwrap_or(0)));
        assert!(starts.contains(text.find("They").unwrap_or(0)));
        assert!(starts.closes_at(text, text.find(" They").unwrap_or(0)));
        assert!(starts.closes_at(text, text.len()));
        assert!(!starts.closes_at(text, text.find(" Smith").unwrap_or(0)));
    }

    #[test]
    fn test_lower_opener_keeps_names() {
        let text = "Anna wrote it. We thanked Anna. The end.";
        assert_eq!(lower_opener("Anna wrote it.", text), "Anna wrote it.");
        assert_eq!(lower_opener("The end.", text), "the end.");
        assert_eq!(lower_opener("Dr. Smith came.", text), "Dr. Smith came.");
        assert_eq!(lower_opener("Annals matter.", text), "annals matter.");
    }

    #[test]
    fn test_pipeline_names_are_unique() {
        let pipeline = default_pipeline();
        let mut names: Vec<&str> = pipeline.iter().map(|m| m.name()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
