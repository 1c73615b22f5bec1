// Secondary Oracle Service
// Runs an external classifier process: text on stdin, AI probability on stdout

use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle is disabled or has no command configured")]
    Disabled,
    #[error("Failed to start oracle process: {0}")]
    Spawn(std::io::Error),
    #[error("Oracle I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Oracle timed out after {0} ms")]
    Timeout(u64),
    #[error("Oracle exited with status {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("Oracle output is not a number: {0:?}")]
    Unparseable(String),
    #[error("Oracle probability out of range: {0}")]
    OutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Share of the blended score taken from the oracle, 0..=1.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_timeout_ms() -> u64 { 5_000 }
fn default_weight() -> f64 { 0.5 }

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: String::new(),
            args: Vec::new(),
            timeout_ms: default_timeout_ms(),
            weight: default_weight(),
        }
    }
}

pub struct OracleClient {
    config: OracleConfig,
}

impl OracleClient {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.command.trim().is_empty()
    }

    pub fn weight(&self) -> f64 {
        self.config.weight.clamp(0.0, 1.0)
    }

    /// Ask the oracle for an AI probability in 0..=1.
    pub async fn ai_probability(&self, text: &str) -> Result<f64, OracleError> {
        if !self.is_enabled() {
            return Err(OracleError::Disabled);
        }

        let started = Instant::now();
        let timeout_ms = self.config.timeout_ms;
        let result = tokio::time::timeout(Duration::from_millis(timeout_ms), self.run(text)).await;

        match result {
            Ok(Ok(p)) => {
                info!(
                    "[ORACLE] probability={:.3} elapsed_ms={}",
                    p,
                    started.elapsed().as_millis()
                );
                Ok(p)
            }
            Ok(Err(e)) => {
                warn!("[ORACLE] call failed: {}", e);
                Err(e)
            }
            Err(_) => {
                warn!("[ORACLE] timed out after {} ms", timeout_ms);
                Err(OracleError::Timeout(timeout_ms))
            }
        }
    }

    async fn run(&self, text: &str) -> Result<f64, OracleError> {
        let mut child = Command::new(&self.config.command)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(OracleError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A classifier may exit without draining stdin; that is not a failure by itself.
            match stdin.write_all(text.as_bytes()).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("[ORACLE] stdin closed early by child");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(OracleError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_probability(&String::from_utf8_lossy(&output.stdout))
    }
}

/// First non-empty stdout line as a probability
pub fn parse_probability(stdout: &str) -> Result<f64, OracleError> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let p: f64 = line
        .parse()
        .map_err(|_| OracleError::Unparseable(line.to_string()))?;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(OracleError::OutOfRange(p));
    }
    Ok(p)
}

/// Blend a heuristic human score with an oracle AI probability.
pub fn blend_scores(heuristic: f64, ai_probability: f64, weight: f64) -> f64 {
    let w = weight.clamp(0.0, 1.0);
    ((1.0 - w) * heuristic + w * (1.0 - ai_probability) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str, timeout_ms: u64) -> OracleClient {
        OracleClient::new(OracleConfig {
            enabled: true,
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            timeout_ms,
            weight: 0.5,
        })
    }

    #[test]
    fn test_parse_probability() {
        assert_eq!(parse_probability("0.25\n").unwrap(), 0.25);
        assert_eq!(parse_probability("\n  0.9  \n").unwrap(), 0.9);
        assert!(matches!(parse_probability("nope"), Err(OracleError::Unparseable(_))));
        assert!(matches!(parse_probability("1.5"), Err(OracleError::OutOfRange(_))));
        assert!(matches!(parse_probability(""), Err(OracleError::Unparseable(_))));
    }

    #[test]
    fn test_blend_scores() {
        assert!((blend_scores(80.0, 0.25, 0.5) - 77.5).abs() < 1e-9);
        assert_eq!(blend_scores(80.0, 0.9, 0.0), 80.0);
        assert!((blend_scores(80.0, 0.9, 1.0) - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_disabled_oracle() {
        let client = OracleClient::new(OracleConfig::default());
        assert!(matches!(client.ai_probability("text").await, Err(OracleError::Disabled)));
    }

    #[tokio::test]
    async fn test_reads_probability_from_stdout() {
        let client = shell("cat >/dev/null; echo 0.25", 5_000);
        assert_eq!(client.ai_probability("some text").await.unwrap(), 0.25);
    }

    #[tokio::test]
    async fn test_non_numeric_output_is_unparseable() {
        let client = shell("echo nope", 5_000);
        assert!(matches!(
            client.ai_probability("text").await,
            Err(OracleError::Unparseable(_))
        ));
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails() {
        let client = shell("exit 3", 5_000);
        assert!(matches!(
            client.ai_probability("text").await,
            Err(OracleError::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn test_slow_oracle_times_out() {
        let client = shell("sleep 5", 200);
        assert!(matches!(
            client.ai_probability("text").await,
            Err(OracleError::Timeout(200))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let client = OracleClient::new(OracleConfig {
            enabled: true,
            command: "/nonexistent/proseprint-oracle".to_string(),
            ..OracleConfig::default()
        });
        assert!(matches!(client.ai_probability("text").await, Err(OracleError::Spawn(_))));
    }
}
