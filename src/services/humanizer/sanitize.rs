// Sanity Pass
// Punctuation, filler and whitespace cleanup applied after every rewrite

use std::sync::OnceLock;

use regex::Regex;

use super::mutators::{join_pieces, sentence_pieces};
use crate::services::lexicon::phrase_alternation;

const MAX_PASSES: usize = 32;

const REPEATABLE_FILLERS: &[&str] = &[
    "from my perspective",
    "i think",
    "arguably",
    "technically",
    "essentially",
    "broadly speaking",
    "mostly",
    "basically",
    "literally",
    "i mean",
    "weirdly enough",
    "actually",
    "in a sense",
    "honestly it reminds me of class",
];

const SENTENCE_ADVERBS: &[&str] = &[
    "surprisingly", "sadly", "luckily", "weirdly", "thankfully", "ironically", "honestly",
    "notably", "interestingly", "significantly", "crucially", "historically", "conversely",
    "essentially", "arguably", "technically", "practically",
];

static_regex!(fn comma_period_re => r",\.");
static_regex!(fn double_comma_re => r",,");
static_regex!(fn double_period_re => r"\.\.");
static_regex!(fn space_before_punct_re => r"[ \t]+([.,])");
static_regex!(fn adverb_re => format!(r"(?i)\b({})\b,?\s*", SENTENCE_ADVERBS.join("|")));
static_regex!(fn inline_space_re => r"[ \t]+");
static_regex!(fn line_edge_re => r"[ \t]*\n[ \t]*");
static_regex!(fn excess_breaks_re => r"\n{3,}");

fn filler_repeat_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        REPEATABLE_FILLERS
            .iter()
            .map(|phrase| {
                let p = phrase_alternation(&[*phrase]);
                Regex::new(&format!(r"(?i)\b({p},?\s+)(?:{p},?\s+)+")).expect("filler repeat regex")
            })
            .collect()
    })
}

fn clean_punctuation(text: &str) -> String {
    let text = comma_period_re().replace_all(text, ".");
    let text = double_comma_re().replace_all(&text, ",");
    let text = double_period_re().replace_all(&text, ".");
    space_before_punct_re().replace_all(&text, "$1").into_owned()
}

fn collapse_fillers(text: &str) -> String {
    filler_repeat_res()
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, "${1}").into_owned())
}

/// Keep only the first occurrence of each sentence adverb in a sentence.
fn dedupe_adverbs(sentence: &str) -> String {
    let mut seen: Vec<String> = Vec::new();
    let mut out = String::with_capacity(sentence.len());
    let mut last = 0usize;
    for caps in adverb_re().captures_iter(sentence) {
        let (Some(whole), Some(word)) = (caps.get(0), caps.get(1)) else { continue };
        let key = word.as_str().to_lowercase();
        out.push_str(&sentence[last..whole.start()]);
        if seen.contains(&key) {
            last = whole.end();
            continue;
        }
        seen.push(key);
        out.push_str(whole.as_str());
        last = whole.end();
    }
    out.push_str(&sentence[last..]);
    out
}

fn normalize_whitespace(text: &str) -> String {
    let text = inline_space_re().replace_all(text, " ");
    let text = line_edge_re().replace_all(&text, "\n");
    let text = excess_breaks_re().replace_all(&text, "\n\n");
    text.trim().to_string()
}

fn sanitize_once(text: &str) -> String {
    let text = clean_punctuation(text);
    let text = collapse_fillers(&text);
    let mut pieces = sentence_pieces(&text);
    for piece in pieces.iter_mut() {
        piece.body = dedupe_adverbs(&piece.body);
    }
    normalize_whitespace(&join_pieces(&pieces))
}

/// Clean up rewrite residue; repeated until the text stops changing.
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_PASSES {
        let next = sanitize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_cleanup() {
        assert_eq!(sanitize("Done ,. Next,, then.. end ."), "Done. Next, then. end.");
    }

    #[test]
    fn test_repeated_fillers_collapse() {
        assert_eq!(
            sanitize("It is basically, basically, basically fine. I think I think so."),
            "It is basically, fine. I think so."
        );
    }

    #[test]
    fn test_adverbs_deduped_per_sentence() {
        assert_eq!(
            sanitize("Notably, it grew and notably it shrank. Notably, it ended."),
            "Notably, it grew and it shrank. Notably, it ended."
        );
    }

    #[test]
    fn test_whitespace_keeps_paragraphs() {
        assert_eq!(
            sanitize("  One \t two.  \n\n\n\n  Three.\nFour.  "),
            "One two.\n\nThree.\nFour."
        );
    }

    #[test]
    fn test_idempotent() {
        let messy = "Well ,, honestly, honestly, it is fine ,. Sadly, sadly it ends..\n\n\n Next.";
        let once = sanitize(messy);
        assert_eq!(sanitize(&once), once);
    }
}
