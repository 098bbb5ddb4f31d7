//! Multiple regression foreign predictor: fitted state and inference
//!
//! Answers simulate / log-density queries for one numerical target
//! conditioned on numerical and categorical columns, from a frozen state
//! produced by the trainer.
//!
//! Modules:
//! - `schema`: Typed target/condition columns
//! - `value`: Cell and condition values
//! - `lookup`: First-occurrence category codes
//! - `linear`: Linear model evaluation
//! - `state`: Fitted state and its canonical serialization
//! - `predictive`: Full/partial routing and the predictive Gaussian
//! - `gaussian`: Normal log density and sampling
//! - `config`: TOML + environment configuration

pub mod config;
pub mod errors;
pub mod gaussian;
pub mod linear;
pub mod lookup;
pub mod predictive;
pub mod schema;
pub mod serde_canon;
pub mod state;
pub mod value;

pub use config::{AppConfig, LoggingConfig, SamplingConfig, TrainerConfig};
pub use errors::{
    ConditionError, DatasetError, MathError, PredictorError, Result, SchemaError, TrainingError,
};
pub use linear::LinearModel;
pub use lookup::CategoryLookup;
pub use predictive::{ModelChoice, PredictiveDistribution};
pub use schema::{ColumnSpec, Schema, StatType};
pub use state::{FittedState, RegressionFit, STATE_VERSION};
pub use value::{Conditions, Value};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
