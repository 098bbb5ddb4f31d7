//! Error types for the regression predictor

use thiserror::Error;

/// Malformed target/condition specification, raised at training time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Exactly one target is supported
    #[error("expected exactly one target column, received {0}")]
    TargetCount(usize),

    /// The target must be numerical
    #[error("target column {column} must be numerical, received {stattype}")]
    TargetType { column: String, stattype: String },

    /// At least one condition column is required
    #[error("at least one condition column is required")]
    NoConditions,

    /// Statistical type that is neither numerical nor categorical
    #[error("column {column} has unrecognized statistical type {stattype}")]
    UnknownStattype { column: String, stattype: String },

    /// A column named twice, or used both as target and condition
    #[error("column {0} appears more than once in the schema")]
    DuplicateColumn(String),
}

/// A prediction, sampling or density call with unusable conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// Conditions must cover every column used in training
    #[error("incomplete conditions, missing values for: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },

    /// A supplied value cannot be used for its column
    #[error("invalid value for condition {column}: {reason}")]
    InvalidValue { column: String, reason: String },
}

/// Degenerate fit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrainingError {
    #[error("no rows left to train on after dropping missing targets")]
    EmptyDataset,

    /// Mean imputation needs at least one observed value
    #[error("numerical condition {0} has no observed values")]
    AllMissing(String),

    #[error("non-finite values in {0}")]
    NonFinite(String),

    #[error("least squares solver failed: {0}")]
    Solver(String),
}

/// Invalid distribution parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("scale must be strictly positive, received {0}")]
    NonPositiveScale(f64),

    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
}

/// Tabular input problems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("dataset has no column named {0}")]
    MissingColumn(String),

    #[error("column {column}, row {row}: expected a number, found {value:?}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("dataset column {0} appears more than once")]
    DuplicateColumn(String),

    #[error("columns have differing lengths")]
    RaggedColumns,

    #[error("CSV error: {0}")]
    Csv(String),
}

/// Errors surfaced by the regression predictor
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("condition error: {0}")]
    Condition(#[from] ConditionError),

    #[error("training error: {0}")]
    Training(#[from] TrainingError),

    #[error("math error: {0}")]
    Math(#[from] MathError),

    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Serialized state with a version this build cannot read
    #[error("unsupported state version: {0}")]
    UnsupportedVersion(u32),

    /// Structurally inconsistent fitted state
    #[error("invalid fitted state: {0}")]
    InvalidState(String),

    #[error("no predictor registered under the name {0}")]
    UnknownPredictor(String),

    #[error("a predictor named {0} is already registered")]
    DuplicatePredictor(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for predictor operations
pub type Result<T> = std::result::Result<T, PredictorError>;
