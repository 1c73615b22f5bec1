// Optimization Loop
// Repeated rewrites of the original text, escalating the configuration,
// keeping the single best-scoring candidate

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::citations::{CitationVault, LOOP_MARKERS};
use super::config::{HumanizerConfig, MAX_INTENSITY};
use super::engine::RewriteEngine;
use super::random::RandomSource;
use crate::services::detection::Detector;

const FIRST_ESCALATION_AFTER: usize = 10;
const SECOND_ESCALATION_AFTER: usize = 30;
const ESCALATED_MIN_INTENSITY: u8 = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_target_score")]
    pub target_score: f64,
    /// Wall-clock budget; the loop returns its best candidate once exceeded.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

fn default_max_attempts() -> usize { 50 }
fn default_target_score() -> f64 { 80.0 }

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            target_score: default_target_score(),
            deadline_ms: None,
        }
    }
}

/// Configuration used for attempt `attempt` (numbered from 1).
pub fn escalate(base: &HumanizerConfig, attempt: usize) -> HumanizerConfig {
    let mut cfg = base.clone();
    if attempt > FIRST_ESCALATION_AFTER {
        cfg.intensity = cfg.intensity.max(ESCALATED_MIN_INTENSITY);
    }
    if attempt > SECOND_ESCALATION_AFTER {
        cfg.intensity = MAX_INTENSITY;
        cfg.typo = true;
        cfg.burst = true;
    }
    cfg
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Accepted,
    Rejected,
    CitationLoss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub attempt: usize,
    pub intensity: u8,
    pub score: f64,
    pub outcome: AttemptOutcome,
}

/// A scored text; attempt 0 is the unmodified original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub text: String,
    pub score: f64,
    pub attempt: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub best: Candidate,
    pub original_score: f64,
    pub attempts_run: usize,
    pub reached_target: bool,
    pub deadline_hit: bool,
    pub history: Vec<AttemptRecord>,
}

pub struct OptimizationLoop<'a> {
    detector: Detector<'a>,
    engine: RewriteEngine,
    settings: OptimizerConfig,
}

impl<'a> OptimizationLoop<'a> {
    pub fn new(detector: Detector<'a>, settings: OptimizerConfig) -> Self {
        Self::with_engine(detector, RewriteEngine::default(), settings)
    }

    pub fn with_engine(detector: Detector<'a>, engine: RewriteEngine, settings: OptimizerConfig) -> Self {
        Self { detector, engine, settings }
    }

    pub fn run(&self, text: &str, cfg: &HumanizerConfig, rng: &mut dyn RandomSource) -> OptimizationReport {
        let started = Instant::now();
        let deadline = self.settings.deadline_ms.map(Duration::from_millis);
        let target = self.settings.target_score;

        let (protected, vault) = CitationVault::protect(text, LOOP_MARKERS);
        let original_score = self.detector.score(text);
        let mut best = Candidate { text: text.to_string(), score: original_score, attempt: 0 };
        let mut history = Vec::new();
        let mut deadline_hit = false;

        info!(
            "[OPTIMIZER] start: score={:.1} target={:.1} max_attempts={} citations={}",
            original_score,
            target,
            self.settings.max_attempts,
            vault.len()
        );

        for attempt in 1..=self.settings.max_attempts {
            if best.score > target {
                break;
            }
            if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                deadline_hit = true;
                warn!("[OPTIMIZER] deadline reached after {} attempts", history.len());
                break;
            }

            let attempt_cfg = escalate(cfg, attempt);
            let rewritten = self.engine.rewrite(&protected, &attempt_cfg, rng);

            let restored = vault
                .restore(&rewritten.text)
                .filter(|restored| vault.is_intact(restored));
            let Some(candidate_text) = restored else {
                warn!("[OPTIMIZER] attempt {} lost a citation, discarded", attempt);
                history.push(AttemptRecord {
                    attempt,
                    intensity: attempt_cfg.intensity,
                    score: 0.0,
                    outcome: AttemptOutcome::CitationLoss,
                });
                continue;
            };

            let score = self.detector.score(&candidate_text);
            let outcome = if score > best.score {
                best = Candidate { text: candidate_text, score, attempt };
                AttemptOutcome::Accepted
            } else {
                AttemptOutcome::Rejected
            };
            debug!(
                "[OPTIMIZER] attempt {} intensity={} score={:.1} {:?}",
                attempt, attempt_cfg.intensity, score, outcome
            );
            history.push(AttemptRecord { attempt, intensity: attempt_cfg.intensity, score, outcome });
        }

        let reached_target = best.score > target;
        info!(
            "[OPTIMIZER] done: best={:.1} (attempt {}) after {} attempts, reached_target={}",
            best.score,
            best.attempt,
            history.len(),
            reached_target
        );

        OptimizationReport {
            best,
            original_score,
            attempts_run: history.len(),
            reached_target,
            deadline_hit,
            history,
        }
    }
}

/// Run the loop without a deadline and return only the winning candidate.
pub fn optimize(
    detector: Detector<'_>,
    text: &str,
    cfg: &HumanizerConfig,
    max_attempts: usize,
    target_score: f64,
    rng: &mut dyn RandomSource,
) -> Candidate {
    let settings = OptimizerConfig { max_attempts, target_score, deadline_ms: None };
    OptimizationLoop::new(detector, settings).run(text, cfg, rng).best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config_store::AppConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const AI_TEXT: &str = "Moreover, it is important to note that the framework leverages a robust and \
        comprehensive methodology (Smith, 2020). Furthermore, the implementation utilizes a seamless \
        pipeline that facilitates optimal outcomes for all stakeholders. Additionally, the results \
        demonstrate a significant improvement in overall efficiency and reliability [2]. Consequently, \
        the approach delivers a holistic solution that addresses every critical requirement.";

    #[test]
    fn test_escalation_schedule() {
        let base = HumanizerConfig { intensity: 40, typo: false, burst: false, ..HumanizerConfig::default() };
        assert_eq!(escalate(&base, 10).intensity, 40);
        assert_eq!(escalate(&base, 11).intensity, 80);
        let late = escalate(&base, 31);
        assert_eq!(late.intensity, 100);
        assert!(late.typo && late.burst);
        let hot = HumanizerConfig { intensity: 95, ..base };
        assert_eq!(escalate(&hot, 11).intensity, 95);
    }

    #[test]
    fn test_best_never_below_original() {
        let config = AppConfig::default();
        let detector = Detector::new(&config);
        let settings = OptimizerConfig { max_attempts: 12, target_score: 101.0, deadline_ms: None };
        let report = OptimizationLoop::new(detector, settings)
            .run(AI_TEXT, &HumanizerConfig::default(), &mut StdRng::seed_from_u64(3));

        assert!(report.best.score >= report.original_score);
        assert_eq!(report.attempts_run, 12);
        assert!(!report.reached_target);
        assert!(report.best.text.contains("(Smith, 2020)"));
        assert!(report.best.text.contains("[2]"));

        let mut best = report.original_score;
        for record in &report.history {
            match record.outcome {
                AttemptOutcome::Accepted => {
                    assert!(record.score > best);
                    best = record.score;
                }
                AttemptOutcome::Rejected => assert!(record.score <= best),
                AttemptOutcome::CitationLoss => {}
            }
        }
        assert_eq!(best, report.best.score);
    }

    #[test]
    fn test_stops_when_original_already_beats_target() {
        let config = AppConfig::default();
        let detector = Detector::new(&config);
        let candidate = optimize(
            detector,
            AI_TEXT,
            &HumanizerConfig::default(),
            50,
            -1.0,
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(candidate.attempt, 0);
        assert_eq!(candidate.text, AI_TEXT);
    }

    #[test]
    fn test_zero_deadline_returns_original() {
        let config = AppConfig::default();
        let detector = Detector::new(&config);
        let settings = OptimizerConfig { max_attempts: 50, target_score: 101.0, deadline_ms: Some(0) };
        let report = OptimizationLoop::new(detector, settings)
            .run(AI_TEXT, &HumanizerConfig::default(), &mut StdRng::seed_from_u64(9));
        assert!(report.deadline_hit);
        assert_eq!(report.attempts_run, 0);
        assert_eq!(report.best.attempt, 0);
    }

    #[test]
    fn test_zero_attempts_returns_original() {
        let config = AppConfig::default();
        let candidate = optimize(
            Detector::new(&config),
            AI_TEXT,
            &HumanizerConfig::default(),
            0,
            80.0,
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(candidate.attempt, 0);
    }
}
