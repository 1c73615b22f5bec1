// Request-level entry points
// Validation, persona resolution and response assembly around the core engines

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{
    DetectRequest, DetectResponse, FeatureBreakdown, HumanizeRequest, HumanizeResponse, OptimizeRequest,
    OptimizeResponse, OracleReport,
};
use crate::services::detection::{confidence, Category, Detector, Genre, Label, ScoreResult};
use crate::services::humanizer::{
    rewrite, HumanizerConfig, HumanizerOverrides, OptimizationLoop, OptimizerConfig, Persona,
};
use crate::services::{blend_scores, AppConfig, ConfigError, ConfigStore, OracleClient};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Load the configuration from `dir`, or from the default config directory.
pub fn load_config(dir: Option<PathBuf>) -> Result<AppConfig, ApiError> {
    let Some(dir) = dir.or_else(ConfigStore::default_config_dir) else {
        warn!("[CONFIG] no config directory available, using defaults");
        return Ok(AppConfig::default());
    };
    Ok(ConfigStore::new(dir).load()?)
}

fn validate_text(text: &str, config: &AppConfig) -> Result<(), ApiError> {
    let min = config.detection.min_request_chars;
    let len = text.trim().chars().count();
    if len < min {
        return Err(ApiError::Validation(format!(
            "text must be at least {} characters (got {})",
            min, len
        )));
    }
    Ok(())
}

fn explain(result: &ScoreResult) -> Vec<String> {
    let mut lines: Vec<String> = result
        .aggregation
        .contributions
        .iter()
        .map(|(feature, c)| {
            if !c.measurable {
                return format!("{}: not measurable ({:.2}), excluded", feature.as_str(), c.value);
            }
            match c.mean {
                Some(mean) => format!(
                    "{}: value {:.2} vs mean {:.2} ({} side), z {:.2}, penalty {:.2} x weight {:.2}",
                    feature.as_str(),
                    c.value,
                    mean,
                    if c.toward_ai { "ai" } else { "human" },
                    c.z,
                    c.penalty,
                    c.weight
                ),
                None => format!("{}: no calibration entry, neutral penalty {:.2}", feature.as_str(), c.penalty),
            }
        })
        .collect();

    let adj = result.aggregation.adjustments;
    if adj.surcharge > 0.0 {
        lines.push(format!("stylistic surcharge: -{:.1}", adj.surcharge));
    }
    if adj.perfection_penalty > 0.0 {
        lines.push(format!("perfection penalty: -{:.1}", adj.perfection_penalty));
    }
    if adj.accountability_bonus > 0.0 {
        lines.push(format!("accountability bonus: +{:.1}", adj.accountability_bonus));
    }
    lines
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Re-derive every score-dependent field from `human_score`.
fn apply_score(response: &mut DetectResponse, human_score: f64, char_count: usize, suppress_above: f64) {
    let human_score = round1(human_score.clamp(0.0, 100.0));
    response.human_score = human_score;
    response.ai_score = round1(100.0 - human_score);
    response.label = Label::from_score(human_score);
    response.category = Category::from_score(human_score);
    response.confidence = confidence(human_score, char_count);
    if human_score >= suppress_above {
        response.flagged_sentences.clear();
    }
}

/// Heuristic scoring call.
pub fn detect_text(req: &DetectRequest, config: &AppConfig) -> Result<DetectResponse, ApiError> {
    validate_text(&req.text, config)?;

    let genre_override = req.genre.as_deref().and_then(Genre::from_str);
    if req.genre.is_some() && genre_override.is_none() {
        warn!("[DETECT] unknown genre override {:?}, classifying instead", req.genre);
    }

    let detector = Detector::new(config);
    let result = detector.score_text_as(&req.text, genre_override);
    let char_count = req.text.chars().count();

    let mut response = DetectResponse {
        request_id: uuid::Uuid::new_v4().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        human_score: 0.0,
        ai_score: 100.0,
        confidence: 0,
        label: Label::Ai,
        category: Category::Ai,
        genre: result.genre.as_str().to_string(),
        calibration_version: detector.calibration().version.clone(),
        flagged_sentences: result.flagged_sentences.clone(),
        explanations: explain(&result),
        feature_breakdown: FeatureBreakdown {
            values: result.features.clone(),
            contributions: result.aggregation.contributions.clone(),
            base_score: result.aggregation.base_score,
            ai_likelihood: result.aggregation.ai_likelihood,
            adjustments: result.aggregation.adjustments,
        },
        oracle: OracleReport::default(),
    };
    apply_score(&mut response, result.final_score, char_count, config.detection.suppress_flags_above);

    info!(
        "[DETECT] {} chars, genre={}, human={:.1}, label={}",
        char_count,
        response.genre,
        response.human_score,
        response.label.as_str()
    );
    Ok(response)
}

/// Scoring call that blends in the secondary oracle when requested; oracle failures only annotate.
pub async fn detect_text_hybrid(req: &DetectRequest, config: &AppConfig) -> Result<DetectResponse, ApiError> {
    let mut response = detect_text(req, config)?;
    if !req.use_oracle {
        return Ok(response);
    }

    let client = OracleClient::new(config.oracle.clone());
    match client.ai_probability(&req.text).await {
        Ok(p) => {
            let heuristic = response.human_score;
            let blended = blend_scores(heuristic, p, client.weight());
            apply_score(
                &mut response,
                blended,
                req.text.chars().count(),
                config.detection.suppress_flags_above,
            );
            response.explanations.push(format!(
                "oracle: ai probability {:.3} blended at weight {:.2} ({:.1} -> {:.1})",
                p,
                client.weight(),
                heuristic,
                response.human_score
            ));
            response.oracle = OracleReport { used: true, ai_probability: Some(p), error: None };
        }
        Err(e) => {
            warn!("[DETECT] oracle unavailable, keeping heuristic score: {}", e);
            response.oracle = OracleReport { used: false, ai_probability: None, error: Some(e.to_string()) };
        }
    }
    Ok(response)
}

fn resolve_humanizer(req: &HumanizeRequest, config: &AppConfig) -> Result<HumanizerConfig, ApiError> {
    let persona = if req.persona.trim().is_empty() {
        Persona::Standard
    } else {
        Persona::from_str(&req.persona)
            .ok_or_else(|| ApiError::Validation(format!("unknown persona: {}", req.persona)))?
    };
    let overrides = HumanizerOverrides {
        intensity: req.intensity,
        vocab: req.vocab,
        grammar: req.grammar,
        structure: req.structure,
        burst: req.burst,
        fluff: req.fluff,
        typo: req.typo,
        simplify: req.simplify,
    };
    Ok(HumanizerConfig::resolve(&config.humanizer.base, persona, &overrides))
}

fn request_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Single rewrite pass.
pub fn humanize_text(req: &HumanizeRequest, config: &AppConfig) -> Result<HumanizeResponse, ApiError> {
    validate_text(&req.text, config)?;
    let cfg = resolve_humanizer(req, config)?;
    let mut rng = request_rng(req.seed);

    let output = rewrite(&req.text, &cfg, &mut rng);
    info!(
        "[REWRITE] persona={} intensity={} edits={} fallback={}",
        cfg.persona.as_str(),
        cfg.intensity,
        output.stats.total_edits,
        output.stats.citation_fallback
    );

    Ok(HumanizeResponse {
        request_id: uuid::Uuid::new_v4().to_string(),
        text: output.text,
        persona: cfg.persona.as_str().to_string(),
        intensity: cfg.intensity,
        stats: output.stats,
    })
}

/// Rewrite-and-score search for a passing candidate.
pub fn optimize_text(req: &OptimizeRequest, config: &AppConfig) -> Result<OptimizeResponse, ApiError> {
    validate_text(&req.rewrite.text, config)?;
    let cfg = resolve_humanizer(&req.rewrite, config)?;
    let settings = OptimizerConfig {
        max_attempts: req.max_attempts.unwrap_or(config.optimizer.max_attempts),
        target_score: req.target_score.unwrap_or(config.optimizer.target_score),
        deadline_ms: req.deadline_ms.or(config.optimizer.deadline_ms),
    };
    let mut rng = request_rng(req.rewrite.seed);

    let report = OptimizationLoop::new(Detector::new(config), settings).run(&req.rewrite.text, &cfg, &mut rng);

    Ok(OptimizeResponse {
        request_id: uuid::Uuid::new_v4().to_string(),
        text: report.best.text,
        score: round1(report.best.score),
        best_attempt: report.best.attempt,
        original_score: round1(report.original_score),
        attempts_run: report.attempts_run,
        reached_target: report.reached_target,
        deadline_hit: report.deadline_hit,
        history: report.history,
    })
}
