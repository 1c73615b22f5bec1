// Rewrite Engine
// Citation protection -> enabled mutators in pipeline order -> sanity pass -> restore

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::citations::{CitationVault, ENGINE_MARKERS};
use super::config::HumanizerConfig;
use super::mutators::{default_pipeline, Mutator};
use super::random::RandomSource;
use super::sanitize::sanitize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteStats {
    /// Edits per mutator name; mutators that changed nothing are absent.
    pub edits: BTreeMap<String, usize>,
    pub total_edits: usize,
    pub citations_protected: usize,
    pub citation_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteOutput {
    pub text: String,
    pub stats: RewriteStats,
}

pub struct RewriteEngine {
    pipeline: Vec<Box<dyn Mutator + Send + Sync>>,
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::new(default_pipeline())
    }
}

impl RewriteEngine {
    pub fn new(pipeline: Vec<Box<dyn Mutator + Send + Sync>>) -> Self {
        Self { pipeline }
    }

    pub fn mutator_names(&self) -> Vec<&'static str> {
        self.pipeline.iter().map(|m| m.name()).collect()
    }

    /// Rewrite `text` under `cfg`. Citations come back byte-identical or the
    /// input is returned untouched with `citation_fallback` set.
    pub fn rewrite(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> RewriteOutput {
        let (protected, vault) = CitationVault::protect(text, ENGINE_MARKERS);
        let mut stats = RewriteStats {
            citations_protected: vault.len(),
            ..RewriteStats::default()
        };

        let mut working = protected;
        for mutator in self.pipeline.iter().filter(|m| m.enabled(cfg)) {
            let mutated = mutator.apply(&working, cfg, rng);
            if mutated.edits > 0 {
                *stats.edits.entry(mutator.name().to_string()).or_insert(0) += mutated.edits;
                stats.total_edits += mutated.edits;
            }
            working = mutated.text;
        }
        let cleaned = sanitize(&working);

        match vault.restore(&cleaned) {
            Some(restored) if vault.is_intact(&restored) => {
                debug!(
                    "[REWRITE] {} edits across {} mutators, {} citations",
                    stats.total_edits,
                    stats.edits.len(),
                    stats.citations_protected
                );
                RewriteOutput { text: restored, stats }
            }
            _ => {
                warn!(
                    "[REWRITE] citation guard tripped ({} protected); returning input unchanged",
                    vault.len()
                );
                RewriteOutput {
                    text: text.to_string(),
                    stats: RewriteStats {
                        citations_protected: vault.len(),
                        citation_fallback: true,
                        ..RewriteStats::default()
                    },
                }
            }
        }
    }
}

/// Rewrite with the default pipeline.
pub fn rewrite(text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> RewriteOutput {
    RewriteEngine::default().rewrite(text, cfg, rng)
}
