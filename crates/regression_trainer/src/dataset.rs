//! Tabular dataset loading
//!
//! Named, equally long columns of [`Value`] cells. CSV input needs a header
//! row; cells matching a configured missing token load as missing.

use bdbcontrib_regression_core::{DatasetError, PredictorError, Result, Value};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Ordered rows, named columns
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        if columns.iter().any(|c| c.values.len() != rows) {
            return Err(DatasetError::RaggedColumns.into());
        }
        let mut names = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(DatasetError::DuplicateColumn(column.name.clone()).into());
            }
        }
        Ok(Self { columns, rows })
    }

    /// Load dataset from CSV file
    pub fn from_csv<P: AsRef<Path>, T: AsRef<str>>(path: P, missing_tokens: &[T]) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file, missing_tokens)
    }

    /// Read CSV with a header row from any reader.
    pub fn from_reader<R: Read, T: AsRef<str>>(reader: R, missing_tokens: &[T]) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().map_err(csv_error)?.clone();
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|name| Column::new(name, Vec::new()))
            .collect();

        for record in rdr.records() {
            let record = record.map_err(csv_error)?;
            for (column, cell) in columns.iter_mut().zip(record.iter()) {
                column.values.push(Value::parse(cell, missing_tokens));
            }
        }

        Self::new(columns)
    }

    /// Get number of rows
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Like [`Dataset::column`], failing with `MissingColumn`.
    pub fn require(&self, name: &str) -> Result<&[Value]> {
        self.column(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()).into())
    }

    /// Keep only `names`, in the given order.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Result<Dataset> {
        let columns = names
            .iter()
            .map(|name| {
                let values = self.require(name.as_ref())?.to_vec();
                Ok(Column::new(name.as_ref(), values))
            })
            .collect::<Result<Vec<_>>>()?;
        Dataset::new(columns)
    }

    /// Replace every cell whose text form equals `token` with a missing
    /// value. Returns how many cells changed.
    pub fn nullify(&mut self, token: &str) -> usize {
        let mut changed = 0;
        for value in self.columns.iter_mut().flat_map(|c| c.values.iter_mut()) {
            let matches = match &*value {
                Value::Missing => false,
                other => other.to_string() == token,
            };
            if matches {
                *value = Value::Missing;
                changed += 1;
            }
        }
        changed
    }
}

fn csv_error(err: csv::Error) -> PredictorError {
    DatasetError::Csv(err.to_string()).into()
}
