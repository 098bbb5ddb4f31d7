//! Cell values shared by datasets and prediction conditions

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// A single table cell or conditioning value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

/// Conditioning values keyed by column name.
pub type Conditions = HashMap<String, Value>;

impl Value {
    /// Parse a raw text cell. Cells equal to one of `missing_tokens` become
    /// [`Value::Missing`], parseable numbers become [`Value::Number`].
    pub fn parse<T: AsRef<str>>(cell: &str, missing_tokens: &[T]) -> Value {
        let cell = cell.trim();
        if missing_tokens.iter().any(|token| token.as_ref() == cell) {
            return Value::Missing;
        }
        match cell.parse::<f64>() {
            Ok(number) if number.is_finite() => Value::Number(number),
            _ => Value::Text(cell.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// Textual form used as a category key. Numbers use their shortest
    /// display form, so `2.0` and `"2"` name the same category.
    pub fn category_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Number(x) => Some(Cow::Owned(x.to_string())),
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::Missing => f.write_str("NULL"),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}
