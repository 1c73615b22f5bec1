// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::services::detection::{CalibrationSet, ScoringConfig};
use crate::services::humanizer::{HumanizerProfile, OptimizerConfig};
use crate::services::oracle::OracleConfig;

const CONFIG_FILE: &str = "config.json";
const BACKUPS_TO_KEEP: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError + '_ {
    move |source| ConfigError::Io { path: path.to_path_buf(), source }
}

/// Process-wide configuration; immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub calibration: CalibrationSet,
    #[serde(default)]
    pub humanizer: HumanizerProfile,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            detection: DetectionConfig::default(),
            scoring: ScoringConfig::default(),
            calibration: CalibrationSet::default(),
            humanizer: HumanizerProfile::default(),
            optimizer: OptimizerConfig::default(),
            oracle: OracleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    /// Requests shorter than this (after trimming) are rejected.
    #[serde(default = "default_min_request_chars")]
    pub min_request_chars: usize,
    #[serde(default = "default_suppress_flags_above")]
    pub suppress_flags_above: f64,
    /// Texts shorter than this score 0 with no features.
    #[serde(default = "default_short_text_chars")]
    pub short_text_chars: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_request_chars: default_min_request_chars(),
            suppress_flags_above: default_suppress_flags_above(),
            short_text_chars: default_short_text_chars(),
        }
    }
}

fn default_version() -> String { "1.0.0".to_string() }
fn default_min_request_chars() -> usize { 10 }
fn default_suppress_flags_above() -> f64 { 70.0 }
fn default_short_text_chars() -> usize { 50 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join(CONFIG_FILE);
        Self { config_dir, config_file }
    }

    /// `PROSEPRINT_CONFIG_DIR`, else the platform config dir
    pub fn default_config_dir() -> Option<PathBuf> {
        match std::env::var("PROSEPRINT_CONFIG_DIR") {
            Ok(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir)),
            _ => dirs::config_dir().map(|p| p.join("proseprint")),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir).map_err(io_err(&self.config_dir))
    }

    /// Load configuration; a missing file yields the defaults.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_file.exists() {
            info!("[CONFIG] {} not found, using defaults", self.config_file.display());
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file).map_err(io_err(&self.config_file))?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.config_file.clone(),
            source,
        })?;
        info!(
            "[CONFIG] loaded {} (calibration {}, humanizer {})",
            self.config_file.display(),
            config.calibration.version,
            config.humanizer.version
        );
        Ok(config)
    }

    /// Write configuration as pretty JSON, backing up the previous file first.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, content).map_err(io_err(&self.config_file))?;
        info!("[CONFIG] saved {}", self.config_file.display());
        Ok(())
    }

    fn create_backup(&self) -> Result<(), ConfigError> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir).map_err(io_err(&backup_dir))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file).map_err(io_err(&backup_file))?;

        self.cleanup_old_backups(&backup_dir, BACKUPS_TO_KEEP)
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), ConfigError> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(io_err(backup_dir))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Timestamped names sort chronologically
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            if let Err(e) = fs::remove_file(entry.path()) {
                warn!("[CONFIG] failed to remove old backup {}: {}", entry.path().display(), e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (PathBuf, ConfigStore) {
        let dir = std::env::temp_dir().join(format!("proseprint-config-{}", uuid::Uuid::new_v4()));
        (dir.clone(), ConfigStore::new(dir))
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.detection.min_request_chars, 10);
        assert_eq!(config.detection.short_text_chars, 50);
        assert_eq!(config.optimizer.max_attempts, 50);
        assert!(!config.oracle.enabled);
        assert_eq!(config.calibration.version, "calibration-v3");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"detection": {"shortTextChars": 20}, "optimizer": {"targetScore": 90}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.detection.short_text_chars, 20);
        assert_eq!(config.detection.min_request_chars, 10);
        assert_eq!(config.optimizer.target_score, 90.0);
        assert_eq!(config.humanizer.base.intensity, 85);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_save_load_and_backup_rotation() {
        let (dir, store) = temp_store();
        let mut config = AppConfig::default();
        for i in 0..13 {
            config.version = format!("1.0.{}", i);
            store.save(&config).unwrap();
        }
        assert_eq!(store.load().unwrap().version, "1.0.12");

        let backups = fs::read_dir(dir.join("backups")).unwrap().count();
        assert!(backups <= BACKUPS_TO_KEEP);
        assert!(backups >= 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_parse_error_names_file() {
        let (dir, store) = temp_store();
        store.ensure_dir().unwrap();
        fs::write(store.config_file(), "{ not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
        let _ = fs::remove_dir_all(&dir);
    }
}
