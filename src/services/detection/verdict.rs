// Score Bands
// Named thresholds turning a human-likeness score into labels and confidence

use serde::{Deserialize, Serialize};

pub const AI_BAND_MAX: f64 = 35.0;
pub const HUMAN_LEANING_MIN: f64 = 50.0;
pub const MIXED_BAND_MAX: f64 = 65.0;
pub const LIKELY_HUMAN_MAX: f64 = 80.0;

const CONFIDENCE_BASE: f64 = 0.55;
const CONFIDENCE_LENGTH_GAIN_MAX: f64 = 0.35;
const CONFIDENCE_LENGTH_SCALE: f64 = 1800.0;
const BORDERLINE_MARGIN: f64 = 10.0;
const BORDERLINE_PENALTY: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Ai,
    LikelyAi,
    Mixed,
    LikelyHuman,
    Human,
}

impl Label {
    pub fn from_score(score: f64) -> Self {
        if score <= AI_BAND_MAX {
            Label::Ai
        } else if score <= HUMAN_LEANING_MIN {
            Label::LikelyAi
        } else if score <= MIXED_BAND_MAX {
            Label::Mixed
        } else if score <= LIKELY_HUMAN_MAX {
            Label::LikelyHuman
        } else {
            Label::Human
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ai => "ai",
            Label::LikelyAi => "likely_ai",
            Label::Mixed => "mixed",
            Label::LikelyHuman => "likely_human",
            Label::Human => "human",
        }
    }

    pub fn is_human_leaning(self) -> bool {
        matches!(self, Label::Mixed | Label::LikelyHuman | Label::Human)
    }
}

/// Coarse three-way bucket used by summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ai,
    Mixed,
    Human,
}

impl Category {
    pub fn from_score(score: f64) -> Self {
        if score <= AI_BAND_MAX {
            Category::Ai
        } else if score > MIXED_BAND_MAX {
            Category::Human
        } else {
            Category::Mixed
        }
    }
}

/// Confidence percentage: grows with text length, drops near the 50 line.
pub fn confidence(score: f64, char_count: usize) -> u8 {
    let length_gain = (char_count as f64 / CONFIDENCE_LENGTH_SCALE).min(CONFIDENCE_LENGTH_GAIN_MAX);
    let borderline = if (score - HUMAN_LEANING_MIN).abs() < BORDERLINE_MARGIN {
        BORDERLINE_PENALTY
    } else {
        0.0
    };
    let raw = (CONFIDENCE_BASE + length_gain - borderline).clamp(0.05, 0.95);
    (raw * 100.0).round() as u8
}
