// Lexicon
// Word lists shared by the feature extractor, the sentence flagger and the rewriter

/// AI-associated formal vocabulary and the plain word a rewrite swaps in.
pub const BANNED_VOCABULARY: &[(&str, &str)] = &[
    ("delve", "dig"),
    ("leverage", "use"),
    ("utilize", "use"),
    ("showcase", "show"),
    ("pivotal", "key"),
    ("testament", "proof"),
    ("landscape", "scene"),
    ("crucial", "important"),
    ("facilitate", "help"),
    ("opt", "choose"),
    ("employ", "use"),
    ("orchestrate", "set up"),
    ("demonstrate", "show"),
    ("illustrate", "show"),
    ("subsequently", "later"),
    ("consequently", "so"),
    ("furthermore", "also"),
    ("moreover", "plus"),
    ("regarding", "about"),
    ("robust", "strong"),
    ("meticulous", "careful"),
    ("scrutinize", "check"),
    ("ascertain", "find out"),
    ("endeavor", "try"),
    ("proficient", "good"),
    ("adequate", "enough"),
    ("foster", "help"),
    ("augment", "add to"),
    ("commence", "start"),
    ("terminate", "end"),
    ("initiate", "start"),
    ("necessitate", "need"),
    ("manifest", "show"),
    ("signifies", "means"),
    ("depict", "show"),
    ("exemplify", "show"),
    ("comprise", "have"),
    ("constitute", "make up"),
    ("diminish", "drop"),
    ("yield", "give"),
    ("elucidate", "explain"),
    ("expedite", "speed up"),
    ("fabricate", "make"),
    ("fluctuate", "change"),
    ("generate", "make"),
    ("implement", "do"),
    ("objective", "goal"),
    ("perceive", "see"),
    ("predominantly", "mostly"),
    ("prevalent", "common"),
    ("procedure", "step"),
    ("prohibit", "stop"),
];

pub const STOPWORDS: &[&str] = &[
    "the", "and", "is", "of", "in", "to", "a", "that", "it", "for", "on", "with", "as", "are",
    "this", "but", "be", "by", "not", "what", "all", "at", "from", "or", "your", "have", "new",
    "more", "an", "was", "we", "will",
];

/// First-person hedges and references to accountable people or records.
pub const ACCOUNTABILITY_MARKERS: &[&str] = &[
    "i think",
    "i believe",
    "i feel",
    "i guess",
    "honestly",
    "actually",
    "in my view",
    "in my opinion",
    "to be honest",
    "my supervisor",
    "professor",
    "the department",
    "reference number",
];

/// Hedges and discourse markers that rewriting tools over-inject.
pub const HUMANIZER_ARTIFACTS: &[&str] = &[
    "arguably",
    "technically",
    "in a sense",
    "essentially",
    "fundamentally",
    "practically",
    "basically",
    "literally",
    "i mean",
    "curiously",
    "interestingly",
    "notably",
    "crucially",
    "conversely",
    "weirdly enough",
    "at least i think so",
    "broadly speaking",
    "from my perspective",
    "pretty much",
];

/// Over-polished phrasing typical of unedited model output.
pub const PERFECTION_PATTERNS: &[&str] = &[
    "it is important to note",
    "it is worth noting",
    "in conclusion",
    "in summary",
    "additionally",
    "plays a crucial role",
    "plays a pivotal role",
    "in today's",
    "a testament to",
    "ever-evolving",
    "rich tapestry",
    "navigate the complexities",
    "seamlessly",
    "first and foremost",
    "in the realm of",
];

/// Regex alternation over literal phrases; inner spaces match any whitespace run.
pub fn phrase_alternation(phrases: &[&str]) -> String {
    phrases
        .iter()
        .map(|p| regex::escape(p).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}

fn whole_word_pattern(phrases: &[&str]) -> String {
    format!(r"(?i)\b(?:{})\b", phrase_alternation(phrases))
}

static_regex!(pub fn banned_vocab_re => whole_word_pattern(
    &BANNED_VOCABULARY.iter().map(|(w, _)| *w).collect::<Vec<_>>()
));
static_regex!(pub fn accountability_re => whole_word_pattern(ACCOUNTABILITY_MARKERS));
static_regex!(pub fn artifact_re => whole_word_pattern(HUMANIZER_ARTIFACTS));
static_regex!(pub fn perfection_re => whole_word_pattern(PERFECTION_PATTERNS));

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

pub fn banned_hits(text: &str) -> usize {
    banned_vocab_re().find_iter(text).count()
}
