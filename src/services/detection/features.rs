// Feature Extraction
// Fixed-schema stylometric feature vector, computed once per text sample
//
// Every function here is total: degenerate input (too few words or sentences)
// resolves to 0 instead of NaN, and `FeatureVector::is_measurable` reports
// which features had enough input to mean anything.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::services::lexicon::{accountability_re, artifact_re, banned_hits, is_stopword, perfection_re};
use crate::services::text_processor::{std_dev, TextSample};

pub const MTLD_TTR_THRESHOLD: f64 = 0.72;
pub const MIN_WORDS_FOR_MTLD: usize = 50;
pub const MIN_SENTENCES_FOR_BURSTINESS: usize = 3;
pub const MIN_SENTENCES_FOR_PLANNING: usize = 4;
pub const MIN_SENTENCES_FOR_SLOPE: usize = 3;
pub const MIN_WORDS_FOR_DRIFT: usize = 50;
pub const MIN_CONTENT_WORDS_FOR_DRIFT: usize = 20;
pub const DRIFT_WINDOW: usize = 20;
pub const VOCAB_HIT_WEIGHT: f64 = 15.0;

const DRIFT_SCALE: f64 = 800.0;
const SLOPE_CHANGE_SCALE: f64 = 40.0;
const FEATURE_CAP: f64 = 100.0;
/// Inclusive upper bounds of the first four sentence-length buckets; the fifth is open.
const LENGTH_BUCKETS: [f64; 4] = [10.0, 20.0, 30.0, 45.0];

static_regex!(fn passive_re =>
    r"(?i)\b(?:was|were)\s+(?:\w+ly\s+)?\w+(?:ed|en|wn|ght|lt)\s+by\b");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    LexicalComplexity,
    Burstiness,
    PlanningEntropy,
    ClauseVariance,
    SemanticDrift,
    ComplexitySlope,
    PassiveVoice,
    VocabHitRate,
    Accountability,
    PerfectionPoint,
}

/// Which side of the calibrated mean points toward machine authorship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    AiWhenLow,
    AiWhenHigh,
    AiWhenDistant,
}

impl Polarity {
    /// Distance from the mean in the AI direction; 0 on the human side.
    pub fn ai_distance(self, value: f64, mean: f64) -> f64 {
        match self {
            Polarity::AiWhenLow => (mean - value).max(0.0),
            Polarity::AiWhenHigh => (value - mean).max(0.0),
            Polarity::AiWhenDistant => (value - mean).abs(),
        }
    }
}

impl Feature {
    /// Features normalized against calibration and combined by weight.
    pub const SCORED: [Feature; 8] = [
        Feature::PlanningEntropy,
        Feature::LexicalComplexity,
        Feature::Burstiness,
        Feature::VocabHitRate,
        Feature::SemanticDrift,
        Feature::ComplexitySlope,
        Feature::ClauseVariance,
        Feature::PassiveVoice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::LexicalComplexity => "lexicalComplexity",
            Feature::Burstiness => "burstiness",
            Feature::PlanningEntropy => "planningEntropy",
            Feature::ClauseVariance => "clauseVariance",
            Feature::SemanticDrift => "semanticDrift",
            Feature::ComplexitySlope => "complexitySlope",
            Feature::PassiveVoice => "passiveVoice",
            Feature::VocabHitRate => "vocabHitRate",
            Feature::Accountability => "accountability",
            Feature::PerfectionPoint => "perfectionPoint",
        }
    }

    pub fn polarity(self) -> Polarity {
        match self {
            Feature::LexicalComplexity => Polarity::AiWhenDistant,
            Feature::Burstiness
            | Feature::PlanningEntropy
            | Feature::ClauseVariance
            | Feature::SemanticDrift
            | Feature::Accountability => Polarity::AiWhenLow,
            // Complexity slope is inverted: smooth transitions push it up.
            Feature::ComplexitySlope
            | Feature::PassiveVoice
            | Feature::VocabHitRate
            | Feature::PerfectionPoint => Polarity::AiWhenHigh,
        }
    }

    /// Aggregation weight; bonus signals carry none.
    pub fn weight(self) -> f64 {
        match self {
            Feature::PlanningEntropy => 0.30,
            Feature::LexicalComplexity => 0.20,
            Feature::Burstiness => 0.12,
            Feature::VocabHitRate => 0.12,
            Feature::SemanticDrift => 0.08,
            Feature::ComplexitySlope => 0.08,
            Feature::ClauseVariance => 0.06,
            Feature::PassiveVoice => 0.04,
            Feature::Accountability | Feature::PerfectionPoint => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub words: usize,
    pub sentences: usize,
    pub content_words: usize,
}

/// Humanizer-artifact counts feeding the stylistic surcharge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactProfile {
    pub hits: usize,
    /// Sentences carrying two or more artifacts.
    pub stacked_sentences: usize,
    /// Distinct artifact phrases used three or more times.
    pub repeated_phrases: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub lexical_complexity: f64,
    pub burstiness: f64,
    pub planning_entropy: f64,
    pub clause_variance: f64,
    pub semantic_drift: f64,
    pub complexity_slope: f64,
    pub passive_voice: f64,
    pub vocab_hit_rate: f64,
    pub accountability: f64,
    pub perfection_point: f64,
    #[serde(default)]
    pub artifacts: ArtifactProfile,
    #[serde(default)]
    pub coverage: Coverage,
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::LexicalComplexity => self.lexical_complexity,
            Feature::Burstiness => self.burstiness,
            Feature::PlanningEntropy => self.planning_entropy,
            Feature::ClauseVariance => self.clause_variance,
            Feature::SemanticDrift => self.semantic_drift,
            Feature::ComplexitySlope => self.complexity_slope,
            Feature::PassiveVoice => self.passive_voice,
            Feature::VocabHitRate => self.vocab_hit_rate,
            Feature::Accountability => self.accountability,
            Feature::PerfectionPoint => self.perfection_point,
        }
    }

    /// Whether the sample was large enough for `feature` to carry signal.
    pub fn is_measurable(&self, feature: Feature) -> bool {
        let c = &self.coverage;
        match feature {
            Feature::LexicalComplexity => c.words >= MIN_WORDS_FOR_MTLD,
            Feature::Burstiness => c.sentences >= MIN_SENTENCES_FOR_BURSTINESS,
            Feature::ComplexitySlope => c.sentences >= MIN_SENTENCES_FOR_SLOPE,
            Feature::PlanningEntropy | Feature::ClauseVariance => {
                c.sentences >= MIN_SENTENCES_FOR_PLANNING
            }
            Feature::SemanticDrift => {
                c.words >= MIN_WORDS_FOR_DRIFT
                    && c.content_words >= MIN_CONTENT_WORDS_FOR_DRIFT
                    && c.content_words > DRIFT_WINDOW
            }
            Feature::PassiveVoice
            | Feature::VocabHitRate
            | Feature::Accountability
            | Feature::PerfectionPoint => c.words > 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == FeatureVector::default()
    }
}

/// Compute the full feature vector for a sample
pub fn extract_features(sample: &TextSample) -> FeatureVector {
    let words = sample.words();
    let lengths = sample.sentence_lengths();
    let clauses = sample.clause_counts();
    let source = sample.source();

    FeatureVector {
        lexical_complexity: mtld(words),
        burstiness: burstiness(&lengths),
        planning_entropy: planning_entropy(&lengths),
        clause_variance: clause_variance(&clauses),
        semantic_drift: semantic_drift(words),
        complexity_slope: complexity_slope(&clauses),
        passive_voice: passive_voice(sample),
        vocab_hit_rate: vocab_hit_rate(source),
        accountability: accountability_re().find_iter(source).count() as f64,
        perfection_point: perfection_re().find_iter(source).count() as f64,
        artifacts: artifact_profile(sample),
        coverage: Coverage {
            words: words.len(),
            sentences: lengths.len(),
            content_words: content_words(words).len(),
        },
    }
}

/// MTLD-style lexical diversity, averaged over a forward and a reverse pass
pub fn mtld(words: &[String]) -> f64 {
    if words.len() < MIN_WORDS_FOR_MTLD {
        return 0.0;
    }
    let forward = mtld_pass(words.iter().map(String::as_str));
    let backward = mtld_pass(words.iter().rev().map(String::as_str));
    (forward + backward) / 2.0
}

fn mtld_pass<'a>(words: impl Iterator<Item = &'a str>) -> f64 {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut window = 0usize;
    let mut total_len = 0usize;
    let mut windows = 0usize;

    for word in words {
        window += 1;
        seen.insert(word);
        if (seen.len() as f64 / window as f64) < MTLD_TTR_THRESHOLD {
            total_len += window;
            windows += 1;
            window = 0;
            seen.clear();
        }
    }
    // The trailing partial window counts as a segment.
    if window > 0 {
        total_len += window;
        windows += 1;
    }

    if windows == 0 {
        0.0
    } else {
        total_len as f64 / windows as f64
    }
}

pub fn burstiness(sentence_lengths: &[f64]) -> f64 {
    if sentence_lengths.len() < MIN_SENTENCES_FOR_BURSTINESS {
        return 0.0;
    }
    std_dev(sentence_lengths)
}

/// Shannon entropy (bits) of the sentence-length bucket distribution
pub fn planning_entropy(sentence_lengths: &[f64]) -> f64 {
    if sentence_lengths.len() < MIN_SENTENCES_FOR_PLANNING {
        return 0.0;
    }
    let mut buckets = [0usize; LENGTH_BUCKETS.len() + 1];
    for &len in sentence_lengths {
        let idx = LENGTH_BUCKETS
            .iter()
            .position(|&max| len <= max)
            .unwrap_or(LENGTH_BUCKETS.len());
        buckets[idx] += 1;
    }

    let total = sentence_lengths.len() as f64;
    let entropy: f64 = buckets
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();
    entropy.max(0.0)
}

pub fn clause_variance(clause_counts: &[f64]) -> f64 {
    if clause_counts.len() < MIN_SENTENCES_FOR_PLANNING {
        return 0.0;
    }
    std_dev(clause_counts)
}

/// Inverted volatility of clause counts between neighbouring sentences.
pub fn complexity_slope(clause_counts: &[f64]) -> f64 {
    if clause_counts.len() < MIN_SENTENCES_FOR_SLOPE {
        return 0.0;
    }
    let total_change: f64 = clause_counts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .sum();
    let avg_change = total_change / (clause_counts.len() - 1) as f64;
    (FEATURE_CAP - avg_change * SLOPE_CHANGE_SCALE).max(0.0)
}

fn content_words(words: &[String]) -> Vec<&str> {
    words
        .iter()
        .map(String::as_str)
        .filter(|w| !is_stopword(w) && w.chars().count() > 3)
        .collect()
}

/// Spread of the per-window novelty rate across the text, scaled to 0..=100
pub fn semantic_drift(words: &[String]) -> f64 {
    if words.len() < MIN_WORDS_FOR_DRIFT {
        return 0.0;
    }
    let content = content_words(words);
    if content.len() < MIN_CONTENT_WORDS_FOR_DRIFT {
        return 0.0;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let novelty: Vec<f64> = content
        .chunks(DRIFT_WINDOW)
        .map(|chunk| {
            let fresh = chunk.iter().filter(|w| seen.insert(**w)).count();
            fresh as f64 / chunk.len() as f64
        })
        .collect();

    if novelty.len() < 2 {
        return 0.0;
    }
    (std_dev(&novelty) * DRIFT_SCALE).min(FEATURE_CAP)
}

/// Percentage of sentences with a `was/were <participle> by` construction
pub fn passive_voice(sample: &TextSample) -> f64 {
    let total = sample.sentence_count();
    if total == 0 {
        return 0.0;
    }
    let passive = sample
        .sentences()
        .filter(|s| passive_re().is_match(&s.text))
        .count();
    passive as f64 / total as f64 * 100.0
}

pub fn vocab_hit_rate(text: &str) -> f64 {
    (banned_hits(text) as f64 * VOCAB_HIT_WEIGHT).min(FEATURE_CAP)
}

fn artifact_profile(sample: &TextSample) -> ArtifactProfile {
    let mut per_phrase: BTreeMap<String, usize> = BTreeMap::new();
    let mut profile = ArtifactProfile::default();

    for sentence in sample.sentences() {
        let mut in_sentence = 0usize;
        for m in artifact_re().find_iter(&sentence.text) {
            in_sentence += 1;
            let key = m
                .as_str()
                .split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(" ");
            *per_phrase.entry(key).or_insert(0) += 1;
        }
        profile.hits += in_sentence;
        if in_sentence >= 2 {
            profile.stacked_sentences += 1;
        }
    }

    profile.repeated_phrases = per_phrase.values().filter(|&&n| n >= 3).count();
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        crate::services::text_processor::tokenize_words(text)
    }

    #[test]
    fn test_mtld_requires_fifty_words() {
        assert_eq!(mtld(&words(&"alpha ".repeat(49))), 0.0);
    }

    #[test]
    fn test_mtld_repetitive_text_closes_short_windows() {
        // TTR drops to 0.5 on the second repeat, so every window is 2 words long.
        assert!((mtld(&words(&"same ".repeat(60))) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mtld_diverse_text_keeps_one_window() {
        let text: Vec<String> = (0..60).map(|i| format!("w{}", i)).collect();
        assert!((mtld(&text) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_burstiness() {
        assert_eq!(burstiness(&[5.0, 25.0]), 0.0);
        assert_eq!(burstiness(&[10.0, 10.0, 10.0]), 0.0);
        assert!((burstiness(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_planning_entropy_buckets() {
        assert_eq!(planning_entropy(&[5.0, 15.0, 25.0]), 0.0);
        assert_eq!(planning_entropy(&[12.0, 13.0, 19.0, 20.0]), 0.0);
        assert!((planning_entropy(&[5.0, 15.0, 25.0, 40.0]) - 2.0).abs() < 1e-9);
        // 10 and 11 fall on different sides of the first bucket edge.
        assert!((planning_entropy(&[10.0, 10.0, 11.0, 11.0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_complexity_slope_is_inverted() {
        assert_eq!(complexity_slope(&[2.0, 2.0]), 0.0);
        assert_eq!(complexity_slope(&[2.0, 2.0, 2.0]), 100.0);
        assert!((complexity_slope(&[1.0, 3.0, 1.0]) - 20.0).abs() < 1e-9);
        assert_eq!(complexity_slope(&[1.0, 5.0, 1.0]), 0.0);
    }

    #[test]
    fn test_clause_variance_floor() {
        assert_eq!(clause_variance(&[1.0, 5.0, 9.0]), 0.0);
        assert!((clause_variance(&[1.0, 3.0, 1.0, 3.0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_semantic_drift_degenerate_inputs() {
        assert_eq!(semantic_drift(&words("too short to drift")), 0.0);
        // Fifty words but only stopwords: no content words at all.
        assert_eq!(semantic_drift(&words(&"the and of ".repeat(20))), 0.0);
    }

    #[test]
    fn test_semantic_drift_uneven_novelty() {
        let mut text: Vec<String> = (0..20).map(|i| format!("fresh{}", i)).collect();
        text.extend((0..20).map(|_| "repeat".to_string()));
        text.extend((0..20).map(|_| "again".to_string()));
        let drift = semantic_drift(&text);
        assert!(drift > 0.0 && drift <= 100.0);
    }

    #[test]
    fn test_passive_voice_ratio() {
        let sample = TextSample::new("The report was written by the team. We read it.");
        assert!((passive_voice(&sample) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_vocab_hit_rate_caps() {
        assert_eq!(vocab_hit_rate("We utilize robust tools."), 30.0);
        let heavy = "delve leverage utilize showcase pivotal testament landscape crucial";
        assert_eq!(vocab_hit_rate(heavy), 100.0);
    }

    #[test]
    fn test_artifact_profile_counts_stacks_and_repeats() {
        let sample = TextSample::new(
            "Arguably, it is technically fine in a sense. Plain one here. Arguably wrong, arguably.",
        );
        let profile = artifact_profile(&sample);
        assert_eq!(profile.hits, 5);
        assert_eq!(profile.stacked_sentences, 2);
        assert_eq!(profile.repeated_phrases, 1);
    }

    #[test]
    fn test_polarity_of_every_scored_feature() {
        assert_eq!(Feature::LexicalComplexity.polarity(), Polarity::AiWhenDistant);
        assert_eq!(Feature::Burstiness.polarity(), Polarity::AiWhenLow);
        assert_eq!(Feature::PlanningEntropy.polarity(), Polarity::AiWhenLow);
        assert_eq!(Feature::ClauseVariance.polarity(), Polarity::AiWhenLow);
        assert_eq!(Feature::SemanticDrift.polarity(), Polarity::AiWhenLow);
        assert_eq!(Feature::ComplexitySlope.polarity(), Polarity::AiWhenHigh);
        assert_eq!(Feature::PassiveVoice.polarity(), Polarity::AiWhenHigh);
        assert_eq!(Feature::VocabHitRate.polarity(), Polarity::AiWhenHigh);
    }

    #[test]
    fn test_ai_distance_respects_polarity() {
        assert_eq!(Polarity::AiWhenLow.ai_distance(12.0, 10.0), 0.0);
        assert_eq!(Polarity::AiWhenLow.ai_distance(4.0, 10.0), 6.0);
        assert_eq!(Polarity::AiWhenHigh.ai_distance(4.0, 10.0), 0.0);
        assert_eq!(Polarity::AiWhenHigh.ai_distance(90.0, 40.0), 50.0);
        assert_eq!(Polarity::AiWhenDistant.ai_distance(4.0, 10.0), 6.0);
        assert_eq!(Polarity::AiWhenDistant.ai_distance(16.0, 10.0), 6.0);
    }

    #[test]
    fn test_scored_weights_sum_to_one() {
        let total: f64 = Feature::SCORED.iter().map(|f| f.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(Feature::SCORED.iter().all(|f| f.weight() <= Feature::PlanningEntropy.weight()));
    }

    #[test]
    fn test_extract_features_measurability() {
        let vector = extract_features(&TextSample::new("Short. Text."));
        assert!(!vector.is_measurable(Feature::LexicalComplexity));
        assert!(!vector.is_measurable(Feature::Burstiness));
        assert!(vector.is_measurable(Feature::VocabHitRate));
        assert!(FeatureVector::default().is_zero());
    }
}
