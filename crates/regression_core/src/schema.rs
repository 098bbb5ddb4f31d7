//! Column schema for the regression predictor
//!
//! Hosts describe columns with free-form `(name, stattype)` string pairs. They
//! are normalized once here into [`StatType`] so the rest of the pipeline
//! never compares strings again.

use crate::errors::{Result, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Logical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    Numerical,
    Categorical,
}

impl StatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatType::Numerical => "numerical",
            StatType::Categorical => "categorical",
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatType {
    type Err = ();

    /// Case-insensitive; whitespace is not stripped.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        match lowered.as_str() {
            "numerical" => Ok(StatType::Numerical),
            "categorical" => Ok(StatType::Categorical),
            _ => Err(()),
        }
    }
}

/// A typed column reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub stattype: StatType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, stattype: StatType) -> Self {
        Self {
            name: name.into(),
            stattype,
        }
    }

    pub fn numerical(name: impl Into<String>) -> Self {
        Self::new(name, StatType::Numerical)
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self::new(name, StatType::Categorical)
    }
}

/// Validated schema: one numerical target, conditions split by type.
///
/// Within each partition the order of the input conditions is preserved;
/// that order fixes the layout of the design matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    target: String,
    numerical: Vec<String>,
    categorical: Vec<String>,
}

impl Schema {
    /// Normalize host-supplied `(name, stattype)` pairs.
    pub fn from_specs<S: AsRef<str>>(targets: &[(S, S)], conditions: &[(S, S)]) -> Result<Self> {
        if targets.len() != 1 {
            return Err(SchemaError::TargetCount(targets.len()).into());
        }
        let (target_name, target_type) = (&targets[0].0, &targets[0].1);
        if target_type.as_ref().parse::<StatType>() != Ok(StatType::Numerical) {
            return Err(SchemaError::TargetType {
                column: target_name.as_ref().to_string(),
                stattype: target_type.as_ref().to_string(),
            }
            .into());
        }

        if conditions.is_empty() {
            return Err(SchemaError::NoConditions.into());
        }

        let specs = conditions
            .iter()
            .map(|(name, stattype)| {
                let parsed = stattype.as_ref().parse::<StatType>().map_err(|_| {
                    SchemaError::UnknownStattype {
                        column: name.as_ref().to_string(),
                        stattype: stattype.as_ref().to_string(),
                    }
                })?;
                Ok(ColumnSpec::new(name.as_ref(), parsed))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(target_name.as_ref(), &specs)
    }

    /// Build from already-typed condition columns.
    pub fn new(target: impl Into<String>, conditions: &[ColumnSpec]) -> Result<Self> {
        let target = target.into();
        if conditions.is_empty() {
            return Err(SchemaError::NoConditions.into());
        }

        let mut seen = HashSet::with_capacity(conditions.len() + 1);
        seen.insert(target.as_str());
        let mut numerical = Vec::new();
        let mut categorical = Vec::new();
        for spec in conditions {
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(spec.name.clone()).into());
            }
            match spec.stattype {
                StatType::Numerical => numerical.push(spec.name.clone()),
                StatType::Categorical => categorical.push(spec.name.clone()),
            }
        }

        Ok(Self {
            target,
            numerical,
            categorical,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn numerical(&self) -> &[String] {
        &self.numerical
    }

    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    /// Numerical conditions followed by categorical conditions.
    pub fn conditions(&self) -> impl Iterator<Item = &String> {
        self.numerical.iter().chain(self.categorical.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PredictorError;

    fn pairs(items: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        items.to_vec()
    }

    fn schema_err(result: Result<Schema>) -> SchemaError {
        match result {
            Err(PredictorError::Schema(err)) => err,
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_missing_target() {
        let err = schema_err(Schema::from_specs(&pairs(&[]), &pairs(&[("a", "numerical")])));
        assert_eq!(err, SchemaError::TargetCount(0));
    }

    #[test]
    fn test_rejects_two_targets() {
        let err = schema_err(Schema::from_specs(
            &pairs(&[("y", "numerical"), ("z", "numerical")]),
            &pairs(&[("a", "numerical")]),
        ));
        assert_eq!(err, SchemaError::TargetCount(2));
    }

    #[test]
    fn test_rejects_categorical_target() {
        let err = schema_err(Schema::from_specs(
            &pairs(&[("y", "categorical")]),
            &pairs(&[("a", "numerical")]),
        ));
        assert!(matches!(err, SchemaError::TargetType { ref column, .. } if column == "y"));
    }

    #[test]
    fn test_rejects_empty_conditions() {
        let err = schema_err(Schema::from_specs(&pairs(&[("y", "numerical")]), &pairs(&[])));
        assert_eq!(err, SchemaError::NoConditions);
    }

    #[test]
    fn test_rejects_unknown_stattype() {
        let err = schema_err(Schema::from_specs(
            &pairs(&[("y", "numerical")]),
            &pairs(&[("a", "cyclic")]),
        ));
        assert_eq!(
            err,
            SchemaError::UnknownStattype {
                column: "a".to_string(),
                stattype: "cyclic".to_string()
            }
        );
    }

    #[test]
    fn test_stattype_ignores_case_but_not_padding() {
        assert_eq!("NuMeRiCaL".parse::<StatType>(), Ok(StatType::Numerical));
        assert_eq!("CATEGORICAL".parse::<StatType>(), Ok(StatType::Categorical));
        assert!(" numerical ".parse::<StatType>().is_err());
        assert!("categorical\n".parse::<StatType>().is_err());

        let err = schema_err(Schema::from_specs(
            &pairs(&[("y", "numerical")]),
            &pairs(&[("a", " Numerical ")]),
        ));
        assert!(matches!(err, SchemaError::UnknownStattype { ref column, .. } if column == "a"));
    }

    #[test]
    fn test_rejects_target_reused_as_condition() {
        let err = schema_err(Schema::from_specs(
            &pairs(&[("y", "numerical")]),
            &pairs(&[("y", "numerical")]),
        ));
        assert_eq!(err, SchemaError::DuplicateColumn("y".to_string()));
    }

    #[test]
    fn test_partitions_preserving_order() {
        let schema = Schema::from_specs(
            &pairs(&[("y", "NUMERICAL")]),
            &pairs(&[
                ("c2", "Categorical"),
                ("a", "numerical"),
                ("c1", "categorical"),
                ("b", "Numerical"),
            ]),
        )
        .unwrap();

        assert_eq!(schema.target(), "y");
        assert_eq!(schema.numerical(), ["a", "b"]);
        assert_eq!(schema.categorical(), ["c2", "c1"]);
        let all: Vec<&String> = schema.conditions().collect();
        assert_eq!(all, ["a", "b", "c2", "c1"]);
    }
}
