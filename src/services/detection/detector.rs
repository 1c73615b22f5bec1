// Detector
// Full scoring pipeline: sample -> features -> genre -> aggregation (+ flags)

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::calibration::CalibrationSet;
use super::features::{extract_features, FeatureVector};
use super::flagger::flag_sentences;
use super::genre::{classify_genre, Genre};
use super::scoring::{aggregate, Aggregation, ScoringConfig};
use crate::services::config_store::AppConfig;
use crate::services::text_processor::TextSample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub final_score: f64,
    pub features: FeatureVector,
    pub genre: Genre,
    pub flagged_sentences: Vec<String>,
    pub aggregation: Aggregation,
}

impl ScoreResult {
    fn short_text() -> Self {
        Self {
            final_score: 0.0,
            features: FeatureVector::default(),
            genre: Genre::Default,
            flagged_sentences: Vec::new(),
            aggregation: Aggregation::default(),
        }
    }
}

/// Scoring engine bound to one immutable configuration
#[derive(Debug, Clone, Copy)]
pub struct Detector<'a> {
    calibration: &'a CalibrationSet,
    scoring: &'a ScoringConfig,
    short_text_chars: usize,
}

impl<'a> Detector<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            calibration: &config.calibration,
            scoring: &config.scoring,
            short_text_chars: config.detection.short_text_chars,
        }
    }

    pub fn calibration(&self) -> &'a CalibrationSet {
        self.calibration
    }

    pub fn score_text(&self, text: &str) -> ScoreResult {
        self.score_text_as(text, None)
    }

    /// Score with an optional genre override; below the short-text floor the result is all zero.
    pub fn score_text_as(&self, text: &str, genre: Option<Genre>) -> ScoreResult {
        let sample = TextSample::new(text);
        if sample.char_count() < self.short_text_chars {
            debug!(
                "[DETECTOR] {} chars is below the {} char floor, scoring 0",
                sample.char_count(),
                self.short_text_chars
            );
            return ScoreResult::short_text();
        }

        let features = extract_features(&sample);
        let genre = genre.unwrap_or_else(|| classify_genre(&sample));
        let aggregation = aggregate(&features, genre, self.calibration, self.scoring);

        debug!(
            "[DETECTOR] genre={} words={} sentences={} base={:.1} final={:.1}",
            genre.as_str(),
            features.coverage.words,
            features.coverage.sentences,
            aggregation.base_score,
            aggregation.final_score
        );

        ScoreResult {
            final_score: aggregation.final_score,
            flagged_sentences: flag_sentences(&sample),
            features,
            genre,
            aggregation,
        }
    }

    /// Score only; skips flagging. Used by the optimization loop.
    pub fn score(&self, text: &str) -> f64 {
        let sample = TextSample::new(text);
        if sample.char_count() < self.short_text_chars {
            return 0.0;
        }
        let features = extract_features(&sample);
        let genre = classify_genre(&sample);
        aggregate(&features, genre, self.calibration, self.scoring).final_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_scores_zero() {
        let config = AppConfig::default();
        let detector = Detector::new(&config);
        let result = detector.score_text("Too short to judge at all.");
        assert_eq!(result.final_score, 0.0);
        assert!(result.features.is_zero());
        assert!(result.flagged_sentences.is_empty());
    }

    #[test]
    fn test_genre_override_is_used() {
        let config = AppConfig::default();
        let detector = Detector::new(&config);
        let text = "We walked along the river for a while. The water was cold and grey. \
                    Nobody said much on the way back home that evening.";
        let result = detector.score_text_as(text, Some(Genre::Technical));
        assert_eq!(result.genre, Genre::Technical);
    }

    #[test]
    fn test_score_matches_full_result() {
        let config = AppConfig::default();
        let detector = Detector::new(&config);
        let text = "The committee met on Tuesday to review the budget. Several members raised concerns \
                    about travel costs. After a short debate, they agreed to revisit the matter in spring.";
        let full = detector.score_text(text);
        assert_eq!(detector.score(text), full.final_score);
        assert!((0.0..=99.9).contains(&full.final_score));
    }
}
