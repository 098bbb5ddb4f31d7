//! Fitted predictor state
//!
//! The unit of persistence for the multiple regression predictor: column
//! layout, both regressions with their residual noise, and the frozen
//! category lookups. Created once by the trainer and immutable afterwards.
//!
//! # Serialized format
//!
//! Canonical JSON, keys sorted, no whitespace:
//!
//! ```json
//! {
//!   "categorical_conditions": ["orbit"],
//!   "full": {"model": {"coefficients": [0.5, 1.0, -1.0], "intercept": 2.0}, "noise": 0.01},
//!   "lookup": {"orbit": ["LEO", "GEO"]},
//!   "numerical_conditions": ["period"],
//!   "partial": {"model": {"coefficients": [0.5], "intercept": 2.0}, "noise": 0.1},
//!   "target": "apogee",
//!   "version": 1
//! }
//! ```

use crate::errors::{PredictorError, Result};
use crate::linear::LinearModel;
use crate::lookup::CategoryLookup;
use crate::serde_canon::{hash_canonical_hex, to_canonical_json};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Current serialized state version
pub const STATE_VERSION: u32 = 1;

/// A regression together with its residual noise scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionFit {
    pub model: LinearModel,
    /// `‖y − ŷ‖₂ / n` over the training rows
    pub noise: f64,
}

impl RegressionFit {
    pub fn new(model: LinearModel, noise: f64) -> Self {
        Self { model, noise }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedState {
    version: u32,
    target: String,
    numerical_conditions: Vec<String>,
    categorical_conditions: Vec<String>,
    /// Numerical conditions only
    partial: RegressionFit,
    /// Numerical conditions plus one-hot categorical blocks
    full: RegressionFit,
    lookup: BTreeMap<String, CategoryLookup>,
}

impl FittedState {
    /// Assemble and validate a fitted state.
    pub fn new(
        target: impl Into<String>,
        numerical_conditions: Vec<String>,
        categorical_conditions: Vec<String>,
        partial: RegressionFit,
        full: RegressionFit,
        lookup: BTreeMap<String, CategoryLookup>,
    ) -> Result<Self> {
        let state = Self {
            version: STATE_VERSION,
            target: target.into(),
            numerical_conditions,
            categorical_conditions,
            partial,
            full,
            lookup,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check internal consistency: version, column layout against
    /// coefficient counts, lookup coverage and noise values.
    pub fn validate(&self) -> Result<()> {
        if self.version != STATE_VERSION {
            return Err(PredictorError::UnsupportedVersion(self.version));
        }
        if self.numerical_conditions.is_empty() && self.categorical_conditions.is_empty() {
            return Err(invalid("no condition columns"));
        }

        let mut seen = HashSet::new();
        seen.insert(self.target.as_str());
        for column in self.conditions() {
            if !seen.insert(column.as_str()) {
                return Err(invalid(format!("column {} listed twice", column)));
            }
        }

        let lookup_columns: HashSet<&str> = self.lookup.keys().map(String::as_str).collect();
        let categorical: HashSet<&str> =
            self.categorical_conditions.iter().map(String::as_str).collect();
        if lookup_columns != categorical {
            return Err(invalid("lookup columns do not match categorical conditions"));
        }

        if self.partial.model.n_features() != self.numerical_conditions.len() {
            return Err(invalid(format!(
                "partial model has {} coefficients for {} numerical conditions",
                self.partial.model.n_features(),
                self.numerical_conditions.len()
            )));
        }
        let full_width = self.numerical_conditions.len() + self.one_hot_width();
        if self.full.model.n_features() != full_width {
            return Err(invalid(format!(
                "full model has {} coefficients, layout needs {}",
                self.full.model.n_features(),
                full_width
            )));
        }

        for (label, fit) in [("partial", &self.partial), ("full", &self.full)] {
            if !fit.model.is_finite() {
                return Err(invalid(format!("{} model has non-finite parameters", label)));
            }
            if !fit.noise.is_finite() || fit.noise < 0.0 {
                return Err(invalid(format!("{} noise {} is not a valid scale", label, fit.noise)));
            }
        }

        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn numerical_conditions(&self) -> &[String] {
        &self.numerical_conditions
    }

    pub fn categorical_conditions(&self) -> &[String] {
        &self.categorical_conditions
    }

    /// Every condition column, numerical first, in training order.
    pub fn conditions(&self) -> impl Iterator<Item = &String> {
        self.numerical_conditions
            .iter()
            .chain(self.categorical_conditions.iter())
    }

    pub fn partial(&self) -> &RegressionFit {
        &self.partial
    }

    pub fn full(&self) -> &RegressionFit {
        &self.full
    }

    pub fn lookup(&self, column: &str) -> Option<&CategoryLookup> {
        self.lookup.get(column)
    }

    pub fn lookups(&self) -> &BTreeMap<String, CategoryLookup> {
        &self.lookup
    }

    /// Total number of one-hot indicator columns in the full model.
    pub fn one_hot_width(&self) -> usize {
        self.lookup.values().map(CategoryLookup::len).sum()
    }

    /// Encode as canonical JSON bytes.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(to_canonical_json(self)?.into_bytes())
    }

    /// Decode bytes produced by [`FittedState::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let state: FittedState = serde_json::from_slice(bytes)?;
        state.validate()?;
        Ok(state)
    }

    /// BLAKE3 fingerprint of the canonical encoding, hex encoded.
    pub fn hash_hex(&self) -> Result<String> {
        Ok(hash_canonical_hex(self)?)
    }
}

fn invalid(reason: impl Into<String>) -> PredictorError {
    PredictorError::InvalidState(reason.into())
}
