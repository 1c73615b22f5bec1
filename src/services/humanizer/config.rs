// Humanizer Configuration
// Persona presets resolved once into a fully populated rewrite configuration

use serde::{Deserialize, Serialize};

pub const MAX_INTENSITY: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    Standard,
    LazyStudent,
    Esl,
    Academic,
}

impl Persona {
    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Standard => "standard",
            Persona::LazyStudent => "lazy_student",
            Persona::Esl => "esl",
            Persona::Academic => "academic",
        }
    }

    pub fn from_str(val: &str) -> Option<Self> {
        match val.trim().to_lowercase().replace('-', "_").as_str() {
            "standard" | "base" => Some(Persona::Standard),
            "lazy_student" | "student" => Some(Persona::LazyStudent),
            "esl" => Some(Persona::Esl),
            "academic" => Some(Persona::Academic),
            _ => None,
        }
    }
}

/// Fully resolved rewrite settings; mutators only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizerConfig {
    #[serde(default = "default_intensity")]
    pub intensity: u8,
    #[serde(default = "default_true")]
    pub vocab: bool,
    #[serde(default = "default_true")]
    pub grammar: bool,
    #[serde(default = "default_true")]
    pub structure: bool,
    #[serde(default = "default_true")]
    pub burst: bool,
    #[serde(default)]
    pub fluff: bool,
    #[serde(default)]
    pub typo: bool,
    #[serde(default)]
    pub simplify: bool,
    #[serde(default)]
    pub persona: Persona,
}

fn default_intensity() -> u8 { 85 }
fn default_true() -> bool { true }

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            intensity: default_intensity(),
            vocab: true,
            grammar: true,
            structure: true,
            burst: true,
            fluff: false,
            typo: false,
            simplify: false,
            persona: Persona::Standard,
        }
    }
}

/// Optional per-request overrides applied after the persona preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizerOverrides {
    pub intensity: Option<i64>,
    pub vocab: Option<bool>,
    pub grammar: Option<bool>,
    pub structure: Option<bool>,
    pub burst: Option<bool>,
    pub fluff: Option<bool>,
    pub typo: Option<bool>,
    pub simplify: Option<bool>,
}

impl HumanizerConfig {
    /// Overlay a persona preset on the base configuration.
    pub fn for_persona(base: &HumanizerConfig, persona: Persona) -> Self {
        let mut cfg = HumanizerConfig { persona, ..base.clone() };
        match persona {
            Persona::Standard => {}
            Persona::LazyStudent => {
                cfg.intensity = 80;
                cfg.fluff = true;
                cfg.typo = true;
                cfg.simplify = true;
            }
            Persona::Esl => {
                cfg.intensity = 60;
                cfg.burst = false;
                cfg.structure = false;
                cfg.grammar = true;
            }
            Persona::Academic => {
                cfg.intensity = 45;
                cfg.fluff = false;
                cfg.typo = false;
                cfg.simplify = false;
                cfg.grammar = false;
            }
        }
        cfg
    }

    /// Persona preset first, then explicit overrides; intensity clamped to 0..=100.
    pub fn resolve(base: &HumanizerConfig, persona: Persona, overrides: &HumanizerOverrides) -> Self {
        let mut cfg = Self::for_persona(base, persona);
        if let Some(intensity) = overrides.intensity {
            cfg.intensity = intensity.clamp(0, MAX_INTENSITY as i64) as u8;
        }
        cfg.vocab = overrides.vocab.unwrap_or(cfg.vocab);
        cfg.grammar = overrides.grammar.unwrap_or(cfg.grammar);
        cfg.structure = overrides.structure.unwrap_or(cfg.structure);
        cfg.burst = overrides.burst.unwrap_or(cfg.burst);
        cfg.fluff = overrides.fluff.unwrap_or(cfg.fluff);
        cfg.typo = overrides.typo.unwrap_or(cfg.typo);
        cfg.simplify = overrides.simplify.unwrap_or(cfg.simplify);
        cfg.intensity = cfg.intensity.min(MAX_INTENSITY);
        cfg
    }

    /// Casual register (fillers, slang) instead of academic hedging.
    pub fn casual_voice(&self) -> bool {
        self.persona == Persona::LazyStudent || self.intensity > 90
    }

    pub fn is_lazy_student(&self) -> bool {
        self.persona == Persona::LazyStudent
    }

    pub fn reshapes_structure(&self) -> bool {
        self.structure || self.burst
    }
}

/// Versioned base configuration artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizerProfile {
    #[serde(default = "default_profile_version")]
    pub version: String,
    #[serde(default)]
    pub base: HumanizerConfig,
}

fn default_profile_version() -> String { "humanizer-v1".to_string() }

impl Default for HumanizerProfile {
    fn default() -> Self {
        Self {
            version: default_profile_version(),
            base: HumanizerConfig::default(),
        }
    }
}

impl HumanizerProfile {
    /// Next artifact version: a trailing `-vN` is incremented, anything else gets `-v2`.
    pub fn bumped_version(&self) -> String {
        if let Some((stem, n)) = self.version.rsplit_once("-v") {
            if let Ok(n) = n.parse::<u32>() {
                return format!("{}-v{}", stem, n + 1);
            }
        }
        format!("{}-v2", self.version)
    }
}
