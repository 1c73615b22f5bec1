use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use proseprint_lib::api::{detect_text_hybrid, humanize_text, load_config, optimize_text};
use proseprint_lib::models::{DetectRequest, HumanizeRequest, OptimizeRequest};

#[derive(Parser)]
#[command(name = "proseprint")]
#[command(about = "Score prose for human-likeness and search for human-looking rewrites", version)]
struct Cli {
    /// Directory holding config.json (defaults to PROSEPRINT_CONFIG_DIR or the platform config dir)
    #[arg(long, value_name = "DIR", global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a text and print the verdict as JSON
    Detect {
        #[command(flatten)]
        input: InputArgs,

        /// Force a genre instead of classifying (academic, technical, narrative, formal_admin, default)
        #[arg(long)]
        genre: Option<String>,

        /// Blend in the configured secondary oracle
        #[arg(long)]
        oracle: bool,
    },
    /// Run one rewrite pass
    Humanize {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        rewrite: RewriteArgs,
    },
    /// Rewrite and re-score until the target is reached or the budget runs out
    Optimize {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        rewrite: RewriteArgs,

        #[arg(long)]
        max_attempts: Option<usize>,

        /// Stop once the human score exceeds this
        #[arg(long)]
        target: Option<f64>,

        /// Wall-clock budget in milliseconds
        #[arg(long)]
        deadline_ms: Option<u64>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Read text from file (stdin when omitted)
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,
}

#[derive(Args)]
struct RewriteArgs {
    /// standard, lazy_student, esl or academic
    #[arg(long, default_value = "standard")]
    persona: String,

    /// 0-100, overrides the persona preset
    #[arg(long)]
    intensity: Option<i64>,

    #[arg(long)]
    vocab: Option<bool>,
    #[arg(long)]
    grammar: Option<bool>,
    #[arg(long)]
    structure: Option<bool>,
    #[arg(long)]
    burst: Option<bool>,
    #[arg(long)]
    fluff: Option<bool>,
    #[arg(long)]
    typo: Option<bool>,
    #[arg(long)]
    simplify: Option<bool>,

    /// Fixed RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

impl RewriteArgs {
    fn into_request(self, text: String) -> HumanizeRequest {
        HumanizeRequest {
            text,
            persona: self.persona,
            intensity: self.intensity,
            vocab: self.vocab,
            grammar: self.grammar,
            structure: self.structure,
            burst: self.burst,
            fluff: self.fluff,
            typo: self.typo,
            simplify: self.simplify,
            seed: self.seed,
        }
    }
}

fn read_input(input: &InputArgs) -> Result<String> {
    if let Some(path) = &input.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    proseprint_lib::init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config_dir).context("Failed to load configuration")?;

    match cli.command {
        Command::Detect { input, genre, oracle } => {
            let req = DetectRequest { text: read_input(&input)?, genre, use_oracle: oracle };
            print_json(&detect_text_hybrid(&req, &config).await?)
        }
        Command::Humanize { input, rewrite } => {
            let req = rewrite.into_request(read_input(&input)?);
            print_json(&humanize_text(&req, &config)?)
        }
        Command::Optimize { input, rewrite, max_attempts, target, deadline_ms } => {
            let req = OptimizeRequest {
                rewrite: rewrite.into_request(read_input(&input)?),
                max_attempts,
                target_score: target,
                deadline_ms,
            };
            print_json(&optimize_text(&req, &config)?)
        }
    }
}
