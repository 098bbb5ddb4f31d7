//! Configuration for training, sampling and logging
//!
//! Loaded from TOML, then overridden from `BDB_REGRESS_*` environment
//! variables. Every knob is an explicit field; nothing is process-global.

use crate::errors::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "BDB_REGRESS_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub trainer: TrainerConfig,
    pub sampling: SamplingConfig,
    pub logging: LoggingConfig,
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Relative cutoff for small singular values in least squares. `None`
    /// uses machine epsilon times the larger matrix dimension.
    pub rcond: Option<f64>,
    /// Cell texts read as missing when loading CSV data
    pub missing_tokens: Vec<String>,
}

/// Defaults for the `simulate` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub seed: u64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    pub with_target: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            rcond: None,
            missing_tokens: ["", "NaN", "nan", "NA", "NULL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            samples: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing sections and fields
    /// keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| PredictorError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `BDB_REGRESS_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Apply overrides from any key lookup (keys without the prefix).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(seed) = lookup("SEED") {
            self.sampling.seed = parse_override("SEED", &seed)?;
        }
        if let Some(samples) = lookup("SAMPLES") {
            self.sampling.samples = parse_override("SAMPLES", &samples)?;
        }
        if let Some(rcond) = lookup("RCOND") {
            self.trainer.rcond = Some(parse_override("RCOND", &rcond)?);
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(rcond) = self.trainer.rcond {
            if !(rcond.is_finite() && rcond > 0.0) {
                return Err(PredictorError::Config(format!(
                    "trainer.rcond must be positive, got {}",
                    rcond
                )));
            }
        }
        if self.sampling.samples == 0 {
            return Err(PredictorError::Config(
                "sampling.samples must be at least 1".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(PredictorError::Config("logging.level is empty".to_string()));
        }
        if self.trainer.missing_tokens.is_empty() {
            warn!("no missing tokens configured, every CSV cell will be kept");
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        PredictorError::Config(format!("{}{} has invalid value {:?}", ENV_PREFIX, key, raw))
    })
}
