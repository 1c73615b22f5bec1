// Text Processing Service
// Normalization, word tokenization and sentence segmentation

use serde::{Deserialize, Serialize};

/// Titles whose trailing period never ends a sentence.
const TITLE_ABBREVIATIONS: &[&str] = &["Dr", "Mr", "Mrs", "Ms", "Prof", "Sr", "Jr", "St", "vs"];

static_regex!(fn clause_marker_re =>
    r"(?i),|\b(?:and|or|but|because|although|while|if|when|that|which|who)\b");
static_regex!(fn paragraph_break_re => r"\n[ \t]*\n\s*");

/// Normalize typographic punctuation to plain ASCII equivalents
pub fn normalize_punctuation(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let s = text
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace('\u{2026}', "...")
        .replace(['\u{00A0}', '\u{3000}'], " ")
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    s.lines()
        .map(|ln| ln.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Lowercase, whitespace-delimited words with empty tokens removed
pub fn tokenize_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Commas plus coordinating/subordinating cue words
pub fn count_clause_markers(text: &str) -> usize {
    clause_marker_re().find_iter(text).count()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    /// Trimmed sentence text.
    pub text: String,
    /// UTF-8 byte offset of the span start (span includes trailing whitespace).
    pub start: usize,
    /// UTF-8 byte offset, end-exclusive.
    pub end: usize,
    pub word_count: usize,
    pub clause_markers: usize,
}

impl Sentence {
    pub fn clause_count(&self) -> usize {
        self.clause_markers + 1
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
}

fn is_abbreviation(text: &str, dot_at: usize) -> bool {
    let head = &text[..dot_at];
    let word = head
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());

    let mut chars = word.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        return only.is_uppercase();
    }
    TITLE_ABBREVIATIONS.contains(&word)
}

/// Byte spans that partition `text` into sentences, trailing whitespace included.
pub fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |idx: usize| chars.get(idx).map(|(b, _)| *b).unwrap_or(text.len());

    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        if !is_terminator(chars[i].1) {
            i += 1;
            continue;
        }

        let mut j = i;
        while j < chars.len() && is_terminator(chars[j].1) {
            j += 1;
        }
        let single_period = j - i == 1 && chars[i].1 == '.';
        while j < chars.len() && is_closer(chars[j].1) {
            j += 1;
        }

        let boundary = j >= chars.len() || chars[j].1.is_whitespace();
        if !boundary || (single_period && is_abbreviation(text, chars[i].0)) {
            i = j;
            continue;
        }

        while j < chars.len() && chars[j].1.is_whitespace() {
            j += 1;
        }
        let end = byte_at(j);
        spans.push((start, end));
        start = end;
        i = j;
    }

    if start < text.len() || spans.is_empty() {
        spans.push((start, text.len()));
    }
    spans
}

/// Segment text into sentences whose spans cover the source in order
pub fn identify_sentences(text: &str) -> Vec<Sentence> {
    sentence_spans(text)
        .into_iter()
        .map(|(start, end)| {
            let body = text[start..end].trim();
            Sentence {
                text: body.to_string(),
                start,
                end,
                word_count: word_count(body),
                clause_markers: count_clause_markers(body),
            }
        })
        .collect()
}

/// Apply `f` to every paragraph while keeping the original paragraph separators.
pub fn map_paragraphs<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    for sep in paragraph_break_re().find_iter(text) {
        out.push_str(&f(&text[last..sep.start()]));
        out.push_str(sep.as_str());
        last = sep.end();
    }
    out.push_str(&f(&text[last..]));
    out
}

/// Immutable input text plus its derived words and sentences
#[derive(Debug, Clone)]
pub struct TextSample {
    source: String,
    words: Vec<String>,
    sentences: Vec<Sentence>,
}

impl TextSample {
    pub fn new(text: &str) -> Self {
        Self {
            source: text.to_string(),
            words: tokenize_words(text),
            sentences: identify_sentences(text),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Sentences that contain at least one word
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> + '_ {
        self.sentences.iter().filter(|s| s.word_count > 0)
    }

    pub fn all_sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences().count()
    }

    pub fn char_count(&self) -> usize {
        self.source.trim().chars().count()
    }

    pub fn sentence_lengths(&self) -> Vec<f64> {
        self.sentences().map(|s| s.word_count as f64).collect()
    }

    pub fn clause_counts(&self) -> Vec<f64> {
        self.sentences().map(|s| s.clause_count() as f64).collect()
    }
}

/// Population standard deviation; 0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Dr." or "J." at the start of `s`.
fn starts_with_abbreviation(s: &str) -> bool {
    let word_end = s.find(|c: char| !c.is_alphabetic()).unwrap_or(s.len());
    if !s[word_end..].starts_with('.') {
        return false;
    }
    let word = &s[..word_end];
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(only), None) => only.is_uppercase(),
        _ => TITLE_ABBREVIATIONS.contains(&word),
    }
}

/// Lowercase the first letter unless the word is "I", a title abbreviation or an acronym.
pub fn lowercase_first(s: &str) -> String {
    if starts_with_abbreviation(s) {
        return s.to_string();
    }
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let second = chars.clone().next();
    let keeps_case = match second {
        Some(c) if c.is_uppercase() => true,
        Some(c) if first == 'I' && !c.is_alphanumeric() => true,
        None if first == 'I' => true,
        _ => false,
    };
    if keeps_case {
        return s.to_string();
    }
    first.to_lowercase().chain(chars).collect()
}

/// Carry the capitalization of `original`'s first letter over to `replacement`.
pub fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().next().is_some_and(|c| c.is_uppercase()) {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(text: &str) -> String {
        sentence_spans(text)
            .into_iter()
            .map(|(s, e)| &text[s..e])
            .collect()
    }

    #[test]
    fn test_normalize_punctuation() {
        let input = "He said \u{201c}fine\u{201d}\u{2026}\r\nok";
        assert_eq!(normalize_punctuation(input), "He said \"fine\"...\nok");
    }

    #[test]
    fn test_tokenize_words_lowercases_and_drops_empty() {
        let words = tokenize_words("  The Cat\n\tsat   ");
        assert_eq!(words, vec!["the", "cat", "sat"]);
        assert!(tokenize_words("   ").is_empty());
    }

    #[test]
    fn test_split_on_terminators() {
        let sentences = identify_sentences("One here. Two there! Three? Four");
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["One here.", "Two there!", "Three?", "Four"]);
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let text = "Dr. Smith met Mr. Jones and J. Doe. They talked.";
        let sentences = identify_sentences(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Dr. Smith met Mr. Jones and J. Doe.");
    }

    #[test]
    fn test_decimals_and_urls_do_not_split() {
        let sentences = identify_sentences("Pi is 3.14 and example.com works. Done.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_closing_quote_stays_with_sentence() {
        let sentences = identify_sentences("She said \"stop.\" Then left.");
        assert_eq!(sentences[0].text, "She said \"stop.\"");
        assert_eq!(sentences[1].text, "Then left.");
    }

    #[test]
    fn test_no_terminator_yields_whole_text() {
        let sentences = identify_sentences("just a fragment");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "just a fragment");

        let empty = identify_sentences("");
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].word_count, 0);
    }

    #[test]
    fn test_spans_partition_text() {
        let samples = [
            "",
            "   ",
            "A. B. C.",
            "  Leading space. Trailing space.   ",
            "Wait... what?! Really.\n\nNew paragraph here",
            "Ünïcödé text. Ends here.",
        ];
        for text in samples {
            assert_eq!(reconstruct(text), text);
            let spans = sentence_spans(text);
            for pair in spans.windows(2) {
                assert_eq!(pair[0].1, pair[1].0);
            }
        }
    }

    #[test]
    fn test_clause_markers_use_whole_words() {
        assert_eq!(count_clause_markers("Understanding form, and more"), 2);
        assert_eq!(count_clause_markers("Nothing here"), 0);
        let sentences = identify_sentences("We left because it rained, but I stayed.");
        assert_eq!(sentences[0].clause_markers, 3);
        assert_eq!(sentences[0].clause_count(), 4);
    }

    #[test]
    fn test_map_paragraphs_keeps_separators() {
        let text = "first one\n\nsecond one\n  \nthird";
        let out = map_paragraphs(text, |p| p.to_uppercase());
        assert_eq!(out, "FIRST ONE\n\nSECOND ONE\n  \nTHIRD");
    }

    #[test]
    fn test_text_sample_counts() {
        let sample = TextSample::new("One two three. Four five.");
        assert_eq!(sample.word_count(), 5);
        assert_eq!(sample.sentence_count(), 2);
        assert_eq!(sample.sentence_lengths(), vec![3.0, 2.0]);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[]), 0.0);
        assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(capitalize_first("hello"), "Hello");
        assert_eq!(lowercase_first("Hello"), "hello");
        assert_eq!(lowercase_first("I think"), "I think");
        assert_eq!(lowercase_first("NASA said"), "NASA said");
        assert_eq!(lowercase_first("Dr. Smith agreed."), "Dr. Smith agreed.");
        assert_eq!(lowercase_first("J. Doe left."), "J. Doe left.");
        assert_eq!(lowercase_first("Drive on."), "drive on.");
        assert_eq!(match_case("Robust", "strong"), "Strong");
        assert_eq!(match_case("robust", "strong"), "strong");
    }
}
