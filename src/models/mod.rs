// Proseprint Data Models
// Request/response schemas for scoring, rewriting and optimization

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::services::detection::{Adjustments, Category, Feature, FeatureContribution, FeatureVector, Label};
use crate::services::humanizer::{AttemptRecord, RewriteStats};

// ============ Detection Request ============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    pub text: String,
    /// Genre override ("academic", "technical", ...); unknown names fall back to the classifier.
    #[serde(default)]
    pub genre: Option<String>,
    /// Blend in the secondary oracle when one is configured.
    #[serde(default)]
    pub use_oracle: bool,
}

// ============ Detection Response ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureBreakdown {
    pub values: FeatureVector,
    pub contributions: BTreeMap<Feature, FeatureContribution>,
    pub base_score: f64,
    pub ai_likelihood: f64,
    pub adjustments: Adjustments,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleReport {
    pub used: bool,
    pub ai_probability: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    pub request_id: String,
    pub timestamp: String,
    pub human_score: f64,
    pub ai_score: f64,
    pub confidence: u8,
    pub label: Label,
    pub category: Category,
    pub genre: String,
    pub calibration_version: String,
    pub flagged_sentences: Vec<String>,
    pub feature_breakdown: FeatureBreakdown,
    pub explanations: Vec<String>,
    #[serde(default)]
    pub oracle: OracleReport,
}

// ============ Rewrite ============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeRequest {
    pub text: String,
    #[serde(default = "default_persona")]
    pub persona: String,
    pub intensity: Option<i64>,
    pub vocab: Option<bool>,
    pub grammar: Option<bool>,
    pub structure: Option<bool>,
    pub burst: Option<bool>,
    pub fluff: Option<bool>,
    pub typo: Option<bool>,
    pub simplify: Option<bool>,
    /// Fixed RNG seed for reproducible output.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeResponse {
    pub request_id: String,
    pub text: String,
    pub persona: String,
    pub intensity: u8,
    pub stats: RewriteStats,
}

// ============ Optimization ============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(flatten)]
    pub rewrite: HumanizeRequest,
    pub max_attempts: Option<usize>,
    pub target_score: Option<f64>,
    pub deadline_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub request_id: String,
    pub text: String,
    pub score: f64,
    pub best_attempt: usize,
    pub original_score: f64,
    pub attempts_run: usize,
    pub reached_target: bool,
    pub deadline_hit: bool,
    pub history: Vec<AttemptRecord>,
}

// ============ Default Value Functions ============

fn default_persona() -> String { "standard".to_string() }
