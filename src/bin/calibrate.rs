// Builds a calibration document from directories of human-written samples:
//   <dir>/<genre>/*.txt  ->  genre -> feature -> {mean, stdDev}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use proseprint_lib::services::detection::{extract_features, CalibrationSet, FeatureVector, Genre};
use proseprint_lib::services::text_processor::{normalize_punctuation, TextSample};

#[derive(Parser)]
#[command(name = "calibrate")]
#[command(about = "Compute per-genre feature baselines from human-written samples")]
struct Cli {
    /// Directory with one sub-directory per genre (academic, technical, narrative, formal_admin, default)
    #[arg(value_name = "DIR")]
    samples: PathBuf,

    /// Version string for the new calibration document
    #[arg(long, default_value = "calibration-custom")]
    version: String,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,
}

fn sample_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    Ok(files)
}

fn main() -> Result<()> {
    proseprint_lib::init_logging();
    let cli = Cli::parse();

    let mut samples: BTreeMap<Genre, Vec<FeatureVector>> = BTreeMap::new();
    for genre in Genre::ALL {
        let dir = cli.samples.join(genre.as_str());
        if !dir.is_dir() {
            continue;
        }
        let mut vectors = Vec::new();
        for path in sample_files(&dir)? {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let features = extract_features(&TextSample::new(&normalize_punctuation(&raw)));
            if features.is_zero() {
                warn!("[CALIBRATE] {} is too short to measure, skipped", path.display());
                continue;
            }
            vectors.push(features);
        }
        info!("[CALIBRATE] {}: {} samples", genre.as_str(), vectors.len());
        if !vectors.is_empty() {
            samples.insert(genre, vectors);
        }
    }

    if samples.is_empty() {
        bail!("no usable samples under {}", cli.samples.display());
    }
    if !samples.contains_key(&Genre::Default) {
        warn!("[CALIBRATE] no default-genre samples; lookups will miss the fallback profile");
    }

    let calibration = CalibrationSet::from_samples(&cli.version, &samples);
    let json = serde_json::to_string_pretty(&calibration).context("Failed to serialize calibration")?;

    match &cli.out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("[CALIBRATE] wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
