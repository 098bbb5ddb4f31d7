//! Design matrices for the two regressions
//!
//! 1. Project onto the schema columns, drop rows with a missing target
//! 2. Category lookups from the kept rows, first occurrence order, a
//!    missing cell counting as a category
//! 3. One-hot categorical block, K columns per categorical condition
//! 4. Numerical block with per-column mean imputation

use bdbcontrib_regression_core::{
    CategoryLookup, DatasetError, Result, Schema, TrainingError, Value,
};
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::dataset::Dataset;

/// Prepared training data
#[derive(Clone, Debug)]
pub struct TrainingSet {
    /// n × p, imputed
    pub x_numerical: DMatrix<f64>,
    /// n × ΣK, indicators
    pub x_categorical: DMatrix<f64>,
    pub y: DVector<f64>,
    pub lookup: BTreeMap<String, CategoryLookup>,
    /// Imputation value per numerical condition
    pub column_means: Vec<f64>,
    /// Rows discarded because the target was missing
    pub dropped_rows: usize,
}

impl TrainingSet {
    pub fn build(dataset: &Dataset, schema: &Schema) -> Result<Self> {
        let target = dataset.require(schema.target())?;

        // Listwise deletion on the target only
        let mut kept = Vec::with_capacity(target.len());
        let mut y = Vec::with_capacity(target.len());
        for (row, value) in target.iter().enumerate() {
            match value {
                Value::Missing => {}
                Value::Number(x) => {
                    kept.push(row);
                    y.push(*x);
                }
                Value::Text(s) => return Err(non_numeric(schema.target(), row, s)),
            }
        }
        let dropped_rows = target.len() - kept.len();
        if dropped_rows > 0 {
            warn!(
                dropped = dropped_rows,
                target = schema.target(),
                "dropping rows with a missing target"
            );
        }
        if kept.is_empty() {
            return Err(TrainingError::EmptyDataset.into());
        }
        let n = kept.len();

        let mut lookup = BTreeMap::new();
        let mut categorical_columns = Vec::with_capacity(schema.categorical().len());
        for name in schema.categorical() {
            let column = dataset.require(name)?;
            let keys: Vec<Option<String>> = kept
                .iter()
                .map(|&row| column[row].category_key().map(|k| k.into_owned()))
                .collect();
            let column_lookup = CategoryLookup::from_observed(keys.iter().map(Option::as_deref));
            debug!(column = %name, categories = column_lookup.len(), "built category lookup");
            lookup.insert(name.clone(), column_lookup);
            categorical_columns.push(keys);
        }

        let width: usize = lookup.values().map(CategoryLookup::len).sum();
        let mut x_categorical = DMatrix::zeros(n, width);
        let mut offset = 0;
        for (name, keys) in schema.categorical().iter().zip(&categorical_columns) {
            let column_lookup = &lookup[name];
            for (i, key) in keys.iter().enumerate() {
                if let Some(code) = column_lookup.code(key.as_deref()) {
                    x_categorical[(i, offset + code)] = 1.0;
                }
            }
            offset += column_lookup.len();
        }

        let p = schema.numerical().len();
        let mut x_numerical = DMatrix::zeros(n, p);
        let mut column_means = Vec::with_capacity(p);
        for (j, name) in schema.numerical().iter().enumerate() {
            let column = dataset.require(name)?;
            let mut observed = Vec::with_capacity(n);
            for (i, &row) in kept.iter().enumerate() {
                match &column[row] {
                    Value::Number(x) => observed.push((i, *x)),
                    Value::Missing => {}
                    Value::Text(s) => return Err(non_numeric(name, row, s)),
                }
            }
            if observed.is_empty() {
                return Err(TrainingError::AllMissing(name.clone()).into());
            }
            let mean = observed.iter().map(|(_, x)| x).sum::<f64>() / observed.len() as f64;
            for i in 0..n {
                x_numerical[(i, j)] = mean;
            }
            for (i, x) in observed {
                x_numerical[(i, j)] = x;
            }
            column_means.push(mean);
        }

        Ok(Self {
            x_numerical,
            x_categorical,
            y: DVector::from_vec(y),
            lookup,
            column_means,
            dropped_rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.y.len()
    }

    /// `[X_numerical | X_categorical]`
    pub fn full_design(&self) -> DMatrix<f64> {
        let p = self.x_numerical.ncols();
        DMatrix::from_fn(self.n_rows(), p + self.x_categorical.ncols(), |i, j| {
            if j < p {
                self.x_numerical[(i, j)]
            } else {
                self.x_categorical[(i, j - p)]
            }
        })
    }
}

fn non_numeric(column: &str, row: usize, value: &str) -> bdbcontrib_regression_core::PredictorError {
    DatasetError::NonNumeric {
        column: column.to_string(),
        row,
        value: value.to_string(),
    }
    .into()
}
