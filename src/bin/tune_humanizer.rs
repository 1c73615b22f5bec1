// Offline random search over humanizer settings.
// Produces a new config artifact with a bumped humanizer version; the running
// config is never touched in place.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use proseprint_lib::services::humanizer::{rewrite, HumanizerConfig};
use proseprint_lib::services::{ConfigStore, Detector};

const MUTATE_INTENSITY_ABOVE: f64 = 0.3;
const TOGGLE_ABOVE: f64 = 0.5;

#[derive(Parser)]
#[command(name = "tune_humanizer")]
#[command(about = "Random-search humanizer settings against the detector and save the winner")]
struct Cli {
    /// Directory of *.txt samples (model-generated paragraphs)
    #[arg(value_name = "DIR")]
    samples: PathBuf,

    /// Config directory to read and write (defaults to PROSEPRINT_CONFIG_DIR or the platform config dir)
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 50)]
    iterations: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Print the winning settings without saving
    #[arg(long)]
    dry_run: bool,
}

fn load_samples(dir: &Path) -> Result<Vec<String>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();
    paths
        .iter()
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display())))
        .collect()
}

fn mean_score(detector: &Detector<'_>, samples: &[String], cfg: &HumanizerConfig, rng: &mut StdRng) -> f64 {
    let total: f64 = samples
        .iter()
        .map(|text| detector.score(&rewrite(text, cfg, rng).text))
        .sum();
    total / samples.len() as f64
}

fn mutate(best: &HumanizerConfig, rng: &mut StdRng) -> HumanizerConfig {
    let mut cfg = best.clone();
    if rng.gen::<f64>() > MUTATE_INTENSITY_ABOVE {
        cfg.intensity = rng.gen_range(40..100);
    }
    if rng.gen::<f64>() > TOGGLE_ABOVE {
        cfg.burst = !cfg.burst;
    }
    if rng.gen::<f64>() > TOGGLE_ABOVE {
        cfg.vocab = !cfg.vocab;
    }
    if rng.gen::<f64>() > TOGGLE_ABOVE {
        cfg.structure = !cfg.structure;
    }
    // Typos cost readability more than they gain
    cfg.typo = false;
    cfg
}

fn main() -> Result<()> {
    proseprint_lib::init_logging();
    let cli = Cli::parse();

    let samples = load_samples(&cli.samples)?;
    if samples.is_empty() {
        bail!("no *.txt samples in {}", cli.samples.display());
    }

    let Some(config_dir) = cli.config_dir.or_else(ConfigStore::default_config_dir) else {
        bail!("no config directory; pass --config-dir");
    };
    let store = ConfigStore::new(config_dir);
    let config = store.load().context("Failed to load configuration")?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let detector = Detector::new(&config);
    let mut best = config.humanizer.base.clone();
    let mut best_score = mean_score(&detector, &samples, &best, &mut rng);
    info!("[TUNE] baseline {:.1} over {} samples", best_score, samples.len());

    for generation in 0..cli.iterations {
        let candidate = mutate(&best, &mut rng);
        let score = mean_score(&detector, &samples, &candidate, &mut rng);
        if score > best_score {
            info!(
                "[TUNE] gen {}: new best {:.1} (intensity={}, burst={}, vocab={}, structure={})",
                generation, score, candidate.intensity, candidate.burst, candidate.vocab, candidate.structure
            );
            best_score = score;
            best = candidate;
        }
    }

    println!("{}", serde_json::to_string_pretty(&best).context("Failed to serialize settings")?);
    if cli.dry_run {
        return Ok(());
    }

    let mut next = config.clone();
    next.humanizer.version = config.humanizer.bumped_version();
    next.humanizer.base = best;
    store.save(&next).context("Failed to save tuned configuration")?;
    info!("[TUNE] saved humanizer {} (mean score {:.1})", next.humanizer.version, best_score);
    Ok(())
}
