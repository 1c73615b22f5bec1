// Detection Module
// Stylometric scoring core organized into specialized submodules:
// - features: fixed-schema feature vector extraction
// - genre: rule-based genre buckets
// - calibration: genre-conditioned baselines (embedded document)
// - scoring: z-score aggregation, surcharge and bonus
// - verdict: named score bands, labels and confidence
// - flagger: per-sentence highlighting
// - detector: the end-to-end pipeline

pub mod features;
pub mod genre;
pub mod calibration;
pub mod scoring;
pub mod verdict;
pub mod flagger;
pub mod detector;

// Re-export commonly used items
pub use features::{extract_features, ArtifactProfile, Coverage, Feature, FeatureVector, Polarity};
pub use genre::{classify_genre, Genre};
pub use calibration::{Baseline, CalibrationProfile, CalibrationSet};
pub use scoring::{aggregate, Adjustments, Aggregation, FeatureContribution, ScoringConfig};
pub use verdict::{
    confidence,
    Category,
    Label,
    AI_BAND_MAX,
    HUMAN_LEANING_MIN,
    LIKELY_HUMAN_MAX,
    MIXED_BAND_MAX,
};
pub use flagger::flag_sentences;
pub use detector::{Detector, ScoreResult};
