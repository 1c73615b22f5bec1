// Humanizer
// Adversarial rewrite engine and the optimization loop built on top of it

pub mod config;
pub mod random;
pub mod citations;
pub mod mutators;
pub mod sanitize;
pub mod engine;
pub mod optimizer;

pub use config::{HumanizerConfig, HumanizerOverrides, HumanizerProfile, Persona, MAX_INTENSITY};
pub use random::{pick, RandomSource, ScriptedRandom};
pub use citations::{citation_re, CitationVault};
pub use mutators::{default_pipeline, Mutated, Mutator};
pub use sanitize::sanitize;
pub use engine::{rewrite, RewriteEngine, RewriteOutput, RewriteStats};
pub use optimizer::{
    escalate,
    optimize,
    AttemptOutcome,
    AttemptRecord,
    Candidate,
    OptimizationLoop,
    OptimizationReport,
    OptimizerConfig,
};
