//! Multiple regression trainer and predictor registry
//!
//! Loads tabular data, fits the partial and full least-squares regressions
//! behind the multiple regression foreign predictor, and exposes the
//! host-facing predictor contract.

pub mod dataset;
pub mod design;
pub mod foreign;
pub mod lstsq;
pub mod trainer;

use bdbcontrib_regression_core::{FittedState, Result, TrainerConfig};
use std::path::Path;

pub use dataset::{Column, Dataset};
pub use design::TrainingSet;
pub use foreign::{
    ForeignPredictor, MultipleRegression, MultipleRegressionFactory, PredictorFactory,
    PredictorRegistry, MULTIPLE_REGRESSION,
};
pub use trainer::{train, RegressionTrainer};

/// Load a CSV file and train on it in one step.
pub fn train_from_csv<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    targets: &[(S, S)],
    conditions: &[(S, S)],
    config: TrainerConfig,
) -> Result<FittedState> {
    let dataset = Dataset::from_csv(path, &config.missing_tokens)?;
    RegressionTrainer::new(config).train(&dataset, targets, conditions)
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
