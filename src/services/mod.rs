// Proseprint Core Services
// Scoring engine, rewrite engine and the text utilities they share

/// Declares a lazily compiled regex accessor backed by a `OnceLock`.
macro_rules! static_regex {
    ($vis:vis fn $name:ident => $pattern:expr) => {
        $vis fn $name() -> &'static regex::Regex {
            static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            RE.get_or_init(|| {
                regex::Regex::new(&$pattern).expect(concat!(stringify!($name), " regex"))
            })
        }
    };
}

pub mod text_processor;
pub mod lexicon;
pub mod config_store;
pub mod oracle;
pub mod detection;
pub mod humanizer;

pub use text_processor::*;
pub use config_store::*;
pub use oracle::*;

pub use detection::{
    classify_genre,
    extract_features,
    flag_sentences,
    aggregate,
    Detector,
    Feature,
    FeatureVector,
    Genre,
    Label,
    Category,
    ScoreResult,
    CalibrationSet,
};
pub use humanizer::{
    optimize,
    rewrite,
    sanitize,
    Candidate,
    HumanizerConfig,
    HumanizerOverrides,
    OptimizationLoop,
    OptimizationReport,
    Persona,
    RewriteEngine,
    RewriteOutput,
    RewriteStats,
};
