// Sentence Flagger
// Highlights sentences with model-like length or vocabulary; never feeds the score

use crate::services::lexicon::banned_hits;
use crate::services::text_processor::TextSample;

/// Exclusive bounds of the uniform-length band typical of generated prose.
pub const SUSPICIOUS_MIN_WORDS: usize = 15;
pub const SUSPICIOUS_MAX_WORDS: usize = 30;

pub fn is_suspicious(sentence: &str, word_count: usize) -> bool {
    (word_count > SUSPICIOUS_MIN_WORDS && word_count < SUSPICIOUS_MAX_WORDS)
        || banned_hits(sentence) > 0
}

/// Flagged sentences in document order, verbatim (trimmed)
pub fn flag_sentences(sample: &TextSample) -> Vec<String> {
    sample
        .sentences()
        .filter(|s| is_suspicious(&s.text, s.word_count))
        .map(|s| s.text.clone())
        .collect()
}
