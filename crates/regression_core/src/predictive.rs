//! Predictive Gaussian for a fitted state
//!
//! A query selects the full regression when every categorical condition
//! value was seen during training, a missing value included when training
//! had missing cells in that column, and falls back to the partial
//! (numerical-only) regression otherwise. The chosen model's point
//! prediction and residual noise form Normal(mean, scale).

use crate::errors::{ConditionError, PredictorError, Result};
use crate::gaussian;
use crate::state::FittedState;
use crate::value::{Conditions, Value};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// Which regression answered a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    Full,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictiveDistribution {
    pub mean: f64,
    pub scale: f64,
    pub model: ModelChoice,
}

impl PredictiveDistribution {
    pub fn logpdf(&self, value: f64) -> Result<f64> {
        gaussian::logpdf(value, self.mean, self.scale)
    }

    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>> {
        gaussian::sample(self.mean, self.scale, n, rng)
    }
}

impl FittedState {
    /// Conditional mean and noise scale of the target.
    ///
    /// Every condition column used in training must be present in
    /// `conditions`; extra keys are ignored.
    pub fn predict_distribution(&self, conditions: &Conditions) -> Result<PredictiveDistribution> {
        let missing: Vec<String> = self
            .conditions()
            .filter(|column| !conditions.contains_key(column.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ConditionError::Incomplete { missing }.into());
        }

        let mut features = Vec::with_capacity(self.full().model.n_features());
        for column in self.numerical_conditions() {
            features.push(numeric_condition(column, &conditions[column.as_str()])?);
        }

        let unseen = self.categorical_conditions().iter().find(|column| {
            let key = conditions[column.as_str()].category_key();
            self.lookup(column)
                .map_or(true, |lookup| !lookup.contains(key.as_deref()))
        });

        let (fit, model) = match unseen {
            Some(column) => {
                debug!(column = %column, "unseen category, using partial regression");
                (self.partial(), ModelChoice::Partial)
            }
            None => {
                for column in self.categorical_conditions() {
                    let key = conditions[column.as_str()].category_key();
                    if let Some(lookup) = self.lookup(column) {
                        lookup.one_hot_into(key.as_deref(), &mut features);
                    }
                }
                (self.full(), ModelChoice::Full)
            }
        };

        Ok(PredictiveDistribution {
            mean: fit.model.predict(&features)?,
            scale: fit.noise,
            model,
        })
    }

    /// Draw `n` independent values of the target given `conditions`.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        conditions: &Conditions,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        self.predict_distribution(conditions)?.sample(n, rng)
    }

    /// Log density of `value` for the target given `conditions`.
    pub fn logpdf(&self, value: f64, conditions: &Conditions) -> Result<f64> {
        self.predict_distribution(conditions)?.logpdf(value)
    }
}

fn numeric_condition(column: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(x) if x.is_finite() => Ok(*x),
        Value::Number(x) => Err(invalid_value(column, format!("{} is not finite", x))),
        Value::Text(s) => Err(invalid_value(column, format!("{:?} is not a number", s))),
        Value::Missing => Err(invalid_value(column, "numerical conditions cannot be missing")),
    }
}

fn invalid_value(column: &str, reason: impl Into<String>) -> PredictorError {
    ConditionError::InvalidValue {
        column: column.to_string(),
        reason: reason.into(),
    }
    .into()
}
