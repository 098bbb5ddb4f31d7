//! Multiple regression trainer
//!
//! Fits two ordinary least-squares regressions of the target on the
//! condition columns: a partial one on the numerical conditions and a full
//! one that also sees the one-hot categorical blocks.

use bdbcontrib_regression_core::{
    FittedState, RegressionFit, Result, Schema, TrainerConfig,
};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::design::TrainingSet;
use crate::lstsq::{fit_ols, residual_noise};

/// Multiple regression trainer
#[derive(Clone, Debug, Default)]
pub struct RegressionTrainer {
    config: TrainerConfig,
}

impl RegressionTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train from `(name, stattype)` pairs. Exactly one numerical target
    /// and at least one condition are required.
    pub fn train<S: AsRef<str>>(
        &self,
        dataset: &Dataset,
        targets: &[(S, S)],
        conditions: &[(S, S)],
    ) -> Result<FittedState> {
        let schema = Schema::from_specs(targets, conditions)?;
        self.train_schema(dataset, &schema)
    }

    pub fn train_schema(&self, dataset: &Dataset, schema: &Schema) -> Result<FittedState> {
        info!(
            target = schema.target(),
            numerical = schema.numerical().len(),
            categorical = schema.categorical().len(),
            rows = dataset.len(),
            "Training multiple regression"
        );

        let set = TrainingSet::build(dataset, schema)?;

        let partial_model = fit_ols(&set.x_numerical, &set.y, self.config.rcond)?;
        let partial_noise = residual_noise(&partial_model, &set.x_numerical, &set.y)?;
        debug!(noise = partial_noise, "fitted partial regression");

        let x_full = set.full_design();
        let full_model = fit_ols(&x_full, &set.y, self.config.rcond)?;
        let full_noise = residual_noise(&full_model, &x_full, &set.y)?;
        debug!(noise = full_noise, "fitted full regression");

        let state = FittedState::new(
            schema.target(),
            schema.numerical().to_vec(),
            schema.categorical().to_vec(),
            RegressionFit::new(partial_model, partial_noise),
            RegressionFit::new(full_model, full_noise),
            set.lookup,
        )?;

        info!(
            rows = set.y.len(),
            dropped = set.dropped_rows,
            one_hot_width = state.one_hot_width(),
            "Training complete"
        );
        Ok(state)
    }
}

/// Train with the default configuration.
pub fn train<S: AsRef<str>>(
    dataset: &Dataset,
    targets: &[(S, S)],
    conditions: &[(S, S)],
) -> Result<FittedState> {
    RegressionTrainer::default().train(dataset, targets, conditions)
}
