//! Fitted linear model
//!
//! Evaluation accumulates `intercept + Σ coefᵢ·xᵢ` left to right, so a model
//! restored from its serialized form produces bit-identical predictions.

use crate::errors::{ConditionError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Model with no features, always predicting `intercept`.
    pub fn intercept_only(intercept: f64) -> Self {
        Self::new(Vec::new(), intercept)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.coefficients.iter().all(|c| c.is_finite())
    }

    /// Predict the target for one feature row.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(ConditionError::InvalidValue {
                column: "<features>".to_string(),
                reason: format!(
                    "expected {} features, received {}",
                    self.coefficients.len(),
                    features.len()
                ),
            }
            .into());
        }
        Ok(self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (c, x)| acc + c * x))
    }
}
