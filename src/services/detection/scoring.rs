// Score Aggregation
// Genre-calibrated z-score penalties combined into a human-likeness score
//
// Each scored feature is measured by its absolute distance from the calibrated
// baseline, clamped, and weighted. `Polarity` marks which side of the mean
// reads as machine-written; scoring ignores it unless `one_sided` is set. Humanizer
// artifacts then cost points and plausible first-person hedging earns a
// small bonus back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calibration::CalibrationSet;
use super::features::{Feature, FeatureVector};
use super::genre::Genre;

pub const MAX_SCORE: f64 = 99.9;
pub const NEUTRAL_AI_LIKELIHOOD: f64 = 0.5;

/// Tunable penalty and bonus constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    #[serde(default = "default_max_z")]
    pub max_z: f64,
    #[serde(default = "default_std_dev_floor")]
    pub std_dev_floor: f64,
    /// Artifact hits tolerated per sentence before the surcharge starts.
    #[serde(default = "default_artifact_allowance")]
    pub artifact_allowance_per_sentence: f64,
    #[serde(default = "default_artifact_hit_penalty")]
    pub artifact_hit_penalty: f64,
    #[serde(default = "default_stacked_penalty")]
    pub stacked_sentence_penalty: f64,
    #[serde(default = "default_repeated_penalty")]
    pub repeated_phrase_penalty: f64,
    #[serde(default = "default_surcharge_cap")]
    pub surcharge_cap: f64,
    #[serde(default = "default_perfection_penalty")]
    pub perfection_penalty: f64,
    #[serde(default = "default_perfection_cap")]
    pub perfection_cap: f64,
    #[serde(default = "default_accountability_bonus")]
    pub accountability_bonus: f64,
    #[serde(default = "default_accountability_cap")]
    pub accountability_cap: f64,
    /// Markers per sentence above which hedging reads as injected.
    #[serde(default = "default_accountability_density")]
    pub accountability_max_density: f64,
    /// Penalize only deviations on the AI side of the mean.
    #[serde(default)]
    pub one_sided: bool,
}

fn default_max_z() -> f64 { 2.5 }
fn default_std_dev_floor() -> f64 { 0.01 }
fn default_artifact_allowance() -> f64 { 0.2 }
fn default_artifact_hit_penalty() -> f64 { 4.0 }
fn default_stacked_penalty() -> f64 { 6.0 }
fn default_repeated_penalty() -> f64 { 5.0 }
fn default_surcharge_cap() -> f64 { 80.0 }
fn default_perfection_penalty() -> f64 { 4.0 }
fn default_perfection_cap() -> f64 { 20.0 }
fn default_accountability_bonus() -> f64 { 5.0 }
fn default_accountability_cap() -> f64 { 15.0 }
fn default_accountability_density() -> f64 { 0.5 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_z: default_max_z(),
            std_dev_floor: default_std_dev_floor(),
            artifact_allowance_per_sentence: default_artifact_allowance(),
            artifact_hit_penalty: default_artifact_hit_penalty(),
            stacked_sentence_penalty: default_stacked_penalty(),
            repeated_phrase_penalty: default_repeated_penalty(),
            surcharge_cap: default_surcharge_cap(),
            perfection_penalty: default_perfection_penalty(),
            perfection_cap: default_perfection_cap(),
            accountability_bonus: default_accountability_bonus(),
            accountability_cap: default_accountability_cap(),
            accountability_max_density: default_accountability_density(),
            one_sided: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureContribution {
    pub value: f64,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub z: f64,
    pub penalty: f64,
    pub weight: f64,
    pub measurable: bool,
    /// Deviation lies on the machine-like side of the mean.
    pub toward_ai: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    pub surcharge: f64,
    pub perfection_penalty: f64,
    pub accountability_bonus: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub final_score: f64,
    pub base_score: f64,
    pub ai_likelihood: f64,
    pub contributions: BTreeMap<Feature, FeatureContribution>,
    pub adjustments: Adjustments,
}

fn contribution(
    features: &FeatureVector,
    feature: Feature,
    genre: Genre,
    calibration: &CalibrationSet,
    scoring: &ScoringConfig,
) -> FeatureContribution {
    let value = features.get(feature);
    let measurable = features.is_measurable(feature);

    match calibration.baseline(genre, feature) {
        Some(baseline) => {
            let spread = baseline.spread(scoring.std_dev_floor);
            let ai_distance = feature.polarity().ai_distance(value, baseline.mean);
            let distance = if scoring.one_sided { ai_distance } else { (value - baseline.mean).abs() };
            let z = (distance / spread).min(scoring.max_z);
            let z = if z.is_finite() { z } else { scoring.max_z };
            FeatureContribution {
                value,
                mean: Some(baseline.mean),
                std_dev: Some(spread),
                z,
                penalty: z / scoring.max_z,
                weight: feature.weight(),
                measurable,
                toward_ai: ai_distance > 0.0,
            }
        }
        None => FeatureContribution {
            value,
            mean: None,
            std_dev: None,
            z: 0.0,
            penalty: NEUTRAL_AI_LIKELIHOOD,
            weight: feature.weight(),
            measurable,
            toward_ai: false,
        },
    }
}

fn stylistic_surcharge(features: &FeatureVector, scoring: &ScoringConfig) -> f64 {
    let artifacts = &features.artifacts;
    let allowance =
        (scoring.artifact_allowance_per_sentence * features.coverage.sentences as f64).floor();
    let excess = (artifacts.hits as f64 - allowance).max(0.0);

    let surcharge = excess * scoring.artifact_hit_penalty
        + artifacts.stacked_sentences as f64 * scoring.stacked_sentence_penalty
        + artifacts.repeated_phrases as f64 * scoring.repeated_phrase_penalty;
    surcharge.min(scoring.surcharge_cap)
}

fn accountability_bonus(features: &FeatureVector, scoring: &ScoringConfig) -> f64 {
    let markers = features.accountability;
    if markers <= 0.0 {
        return 0.0;
    }
    let sentences = features.coverage.sentences.max(1) as f64;
    if markers / sentences > scoring.accountability_max_density {
        return 0.0;
    }
    (markers * scoring.accountability_bonus).min(scoring.accountability_cap)
}

/// Combine a feature vector into a bounded human-likeness score.
///
/// Never fails: unmeasurable features drop out with their weight renormalized,
/// missing baselines contribute a neutral penalty.
pub fn aggregate(
    features: &FeatureVector,
    genre: Genre,
    calibration: &CalibrationSet,
    scoring: &ScoringConfig,
) -> Aggregation {
    let contributions: BTreeMap<Feature, FeatureContribution> = Feature::SCORED
        .iter()
        .map(|&f| (f, contribution(features, f, genre, calibration, scoring)))
        .collect();

    let (weighted, total_weight) = contributions
        .values()
        .filter(|c| c.measurable)
        .fold((0.0, 0.0), |(sum, w), c| (sum + c.penalty * c.weight, w + c.weight));

    let ai_likelihood = if total_weight > 0.0 {
        (weighted / total_weight).clamp(0.0, 1.0)
    } else {
        NEUTRAL_AI_LIKELIHOOD
    };
    let base_score = 100.0 * (1.0 - ai_likelihood);

    let adjustments = Adjustments {
        surcharge: stylistic_surcharge(features, scoring),
        perfection_penalty: (features.perfection_point * scoring.perfection_penalty)
            .min(scoring.perfection_cap),
        accountability_bonus: accountability_bonus(features, scoring),
    };

    let final_score = (base_score - adjustments.surcharge - adjustments.perfection_penalty
        + adjustments.accountability_bonus)
        .clamp(0.0, MAX_SCORE);

    Aggregation {
        final_score,
        base_score,
        ai_likelihood,
        contributions,
        adjustments,
    }
}
