//! Multiple regression predictor CLI
//!
//! Trains a predictor from CSV data and answers simulate, log-density and
//! inspection queries against a saved model.

use anyhow::{anyhow, bail, Context, Result};
use bdbcontrib_regression_core::{AppConfig, Conditions, FittedState, Value};
use bdbcontrib_regression_trainer::{Dataset, RegressionTrainer};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "bdb-regress")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multiple regression foreign predictor", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit a model from a CSV dataset
    Train {
        /// Input CSV dataset path (header row required)
        #[arg(short, long)]
        input: PathBuf,

        /// Target column, optionally `name:stattype`
        #[arg(short, long)]
        target: String,

        /// Numerical condition columns
        #[arg(long, value_delimiter = ',')]
        numerical: Vec<String>,

        /// Categorical condition columns
        #[arg(long, value_delimiter = ',')]
        categorical: Vec<String>,

        /// Output model path; the fingerprint goes next to it as `.hash`
        #[arg(short, long, default_value = "model.json")]
        output: PathBuf,

        /// Cell text to treat as missing, in addition to the configured tokens
        #[arg(long)]
        nullify: Vec<String>,
    },

    /// Draw samples of the target
    Simulate {
        #[arg(short, long)]
        model: PathBuf,

        /// Condition value as `column=value`
        #[arg(short, long)]
        given: Vec<String>,

        /// Number of samples (default from config)
        #[arg(short)]
        n: Option<usize>,

        /// Random seed (default from config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Log density of a target value
    Logpdf {
        #[arg(short, long)]
        model: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        value: f64,

        #[arg(short, long)]
        given: Vec<String>,
    },

    /// Summarize a saved model
    Inspect {
        #[arg(short, long)]
        model: PathBuf,
    },
}

#[derive(Serialize)]
struct ModelSummary<'a> {
    target: &'a str,
    numerical_conditions: &'a [String],
    categorical_conditions: &'a [String],
    categories: Vec<(&'a str, usize)>,
    partial_coefficients: usize,
    partial_noise: f64,
    full_coefficients: usize,
    full_noise: f64,
    fingerprint: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path).context("Failed to load configuration")?,
        None => AppConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        config
            .logging
            .level
            .parse::<Level>()
            .map_err(|_| anyhow!("unknown log level {:?}", config.logging.level))?
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(config.logging.with_target)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    debug!(?config, "configuration");

    match args.command {
        Command::Train {
            input,
            target,
            numerical,
            categorical,
            output,
            nullify,
        } => {
            info!("Loading dataset from: {}", input.display());
            let mut dataset = Dataset::from_csv(&input, &config.trainer.missing_tokens)
                .context("Failed to load dataset")?;
            for token in &nullify {
                let changed = dataset.nullify(token);
                info!("Nullified {} cells matching {:?}", changed, token);
            }
            info!(
                "Loaded {} rows with {} columns",
                dataset.len(),
                dataset.columns().len()
            );

            let targets = [target_spec(&target)];
            let conditions: Vec<(String, String)> = numerical
                .iter()
                .map(|c| (c.clone(), "numerical".to_string()))
                .chain(categorical.iter().map(|c| (c.clone(), "categorical".to_string())))
                .collect();

            let trainer = RegressionTrainer::new(config.trainer.clone());
            let state = trainer.train(&dataset, &targets[..], &conditions[..])?;
            save_model(&state, &output)?;
        }
        Command::Simulate {
            model,
            given,
            n,
            seed,
        } => {
            let state = load_model(&model)?;
            let conditions = parse_given(&given, &config.trainer.missing_tokens)?;
            let n = n.unwrap_or(config.sampling.samples);
            let seed = seed.unwrap_or(config.sampling.seed);
            debug!(n, seed, "simulating");

            let mut rng = StdRng::seed_from_u64(seed);
            for sample in state.simulate(&conditions, n, &mut rng)? {
                println!("{}", sample);
            }
        }
        Command::Logpdf {
            model,
            value,
            given,
        } => {
            let state = load_model(&model)?;
            let conditions = parse_given(&given, &config.trainer.missing_tokens)?;
            println!("{}", state.logpdf(value, &conditions)?);
        }
        Command::Inspect { model } => {
            let state = load_model(&model)?;
            let summary = ModelSummary {
                target: state.target(),
                numerical_conditions: state.numerical_conditions(),
                categorical_conditions: state.categorical_conditions(),
                categories: state
                    .lookups()
                    .iter()
                    .map(|(column, lookup)| (column.as_str(), lookup.len()))
                    .collect(),
                partial_coefficients: state.partial().model.n_features(),
                partial_noise: state.partial().noise,
                full_coefficients: state.full().model.n_features(),
                full_noise: state.full().noise,
                fingerprint: state.hash_hex()?,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// `name` or `name:stattype`; a bare name is numerical.
fn target_spec(raw: &str) -> (String, String) {
    match raw.split_once(':') {
        Some((name, stattype)) => (name.trim().to_string(), stattype.trim().to_string()),
        None => (raw.trim().to_string(), "numerical".to_string()),
    }
}

fn parse_given(pairs: &[String], missing_tokens: &[String]) -> Result<Conditions> {
    let mut conditions = Conditions::new();
    for pair in pairs {
        let (column, raw) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("expected column=value, got {:?}", pair))?;
        let column = column.trim();
        if column.is_empty() {
            bail!("empty column name in {:?}", pair);
        }
        conditions.insert(column.to_string(), Value::parse(raw, missing_tokens));
    }
    Ok(conditions)
}

fn save_model(state: &FittedState, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    info!("Saving model to: {}", output.display());
    let bytes = state.serialize().context("Failed to serialize model")?;
    std::fs::write(output, &bytes).context("Failed to write model file")?;

    let hash_hex = state.hash_hex()?;
    let hash_path = output.with_extension("hash");
    info!("Saving hash to: {}", hash_path.display());
    std::fs::write(&hash_path, &hash_hex).context("Failed to write hash file")?;

    info!("✓ Training completed successfully");
    info!("  Model: {}", output.display());
    info!("  Hash: {} ({})", hash_path.display(), hash_hex);
    Ok(())
}

fn load_model(path: &Path) -> Result<FittedState> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read model {}", path.display()))?;
    let state = FittedState::deserialize(&bytes).context("Failed to load model")?;
    debug!(fingerprint = %state.hash_hex()?, "loaded model");
    Ok(state)
}
