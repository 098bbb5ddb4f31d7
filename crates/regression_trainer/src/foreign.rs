//! Host-facing predictor contract and registry
//!
//! A host creates predictors by name from a dataset and a column schema,
//! persists them as bytes, and later revives them by name to answer
//! simulate and log-density queries.

use bdbcontrib_regression_core::{
    Conditions, FittedState, PredictorError, Result, TrainerConfig,
};
use rand::RngCore;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

use crate::dataset::Dataset;
use crate::trainer::RegressionTrainer;

/// Registered name of the multiple regression predictor
pub const MULTIPLE_REGRESSION: &str = "multiple_regression";

/// A trained predictor for one target column.
pub trait ForeignPredictor: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Opaque persistent form, readable by the matching factory.
    fn serialize(&self) -> Result<Vec<u8>>;

    fn simulate(&self, n: usize, conditions: &Conditions, rng: &mut dyn RngCore) -> Result<Vec<f64>>;

    fn logpdf(&self, value: f64, conditions: &Conditions) -> Result<f64>;
}

/// Builds and revives predictors of one kind.
pub trait PredictorFactory: Send + Sync {
    fn name(&self) -> &str;

    fn create(
        &self,
        dataset: &Dataset,
        targets: &[(&str, &str)],
        conditions: &[(&str, &str)],
    ) -> Result<Box<dyn ForeignPredictor>>;

    fn deserialize(&self, bytes: &[u8]) -> Result<Box<dyn ForeignPredictor>>;
}

/// Multiple regression predictor over a fitted state
#[derive(Clone, Debug, PartialEq)]
pub struct MultipleRegression {
    state: FittedState,
}

impl MultipleRegression {
    pub fn new(state: FittedState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &FittedState {
        &self.state
    }

    pub fn into_state(self) -> FittedState {
        self.state
    }
}

impl ForeignPredictor for MultipleRegression {
    fn name(&self) -> &str {
        MULTIPLE_REGRESSION
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        self.state.serialize()
    }

    fn simulate(&self, n: usize, conditions: &Conditions, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        self.state.simulate(conditions, n, rng)
    }

    fn logpdf(&self, value: f64, conditions: &Conditions) -> Result<f64> {
        self.state.logpdf(value, conditions)
    }
}

/// Factory side of [`MultipleRegression`]
#[derive(Clone, Debug, Default)]
pub struct MultipleRegressionFactory {
    trainer: RegressionTrainer,
}

impl MultipleRegressionFactory {
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            trainer: RegressionTrainer::new(config),
        }
    }
}

impl PredictorFactory for MultipleRegressionFactory {
    fn name(&self) -> &str {
        MULTIPLE_REGRESSION
    }

    fn create(
        &self,
        dataset: &Dataset,
        targets: &[(&str, &str)],
        conditions: &[(&str, &str)],
    ) -> Result<Box<dyn ForeignPredictor>> {
        let state = self.trainer.train(dataset, targets, conditions)?;
        Ok(Box::new(MultipleRegression::new(state)))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Box<dyn ForeignPredictor>> {
        let state = FittedState::deserialize(bytes)?;
        Ok(Box::new(MultipleRegression::new(state)))
    }
}

/// Name-keyed predictor factories
#[derive(Default)]
pub struct PredictorRegistry {
    factories: BTreeMap<String, Box<dyn PredictorFactory>>,
}

impl PredictorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in predictors.
    pub fn with_defaults() -> Self {
        Self::with_config(TrainerConfig::default())
    }

    pub fn with_config(config: TrainerConfig) -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(MULTIPLE_REGRESSION.to_string(), Box::new(MultipleRegressionFactory::new(config)));
        registry
    }

    pub fn register(&mut self, factory: Box<dyn PredictorFactory>) -> Result<()> {
        let name = factory.name().to_string();
        if self.factories.contains_key(&name) {
            return Err(PredictorError::DuplicatePredictor(name));
        }
        info!("Registering predictor: {}", name);
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn create(
        &self,
        name: &str,
        dataset: &Dataset,
        targets: &[(&str, &str)],
        conditions: &[(&str, &str)],
    ) -> Result<Box<dyn ForeignPredictor>> {
        self.factory(name)?.create(dataset, targets, conditions)
    }

    pub fn deserialize(&self, name: &str, bytes: &[u8]) -> Result<Box<dyn ForeignPredictor>> {
        self.factory(name)?.deserialize(bytes)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    fn factory(&self, name: &str) -> Result<&dyn PredictorFactory> {
        self.factories
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| PredictorError::UnknownPredictor(name.to_string()))
    }
}

impl fmt::Debug for PredictorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictorRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
