//! Category-to-code lookup for one categorical condition
//!
//! Codes are dense (`0..K`) and assigned in first-occurrence order. A
//! missing cell is a category of its own. The serialized form is the
//! ordered category list, `null` standing for missing, where the position
//! of a category is its code.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<String>>", into = "Vec<Option<String>>")]
pub struct CategoryLookup {
    categories: Vec<Option<String>>,
    codes: HashMap<String, usize>,
    missing: Option<usize>,
}

impl CategoryLookup {
    /// Enumerate distinct values in the order they are first seen. `None`
    /// is the missing category.
    pub fn from_observed<'a, I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Option<&'a str>>,
    {
        let mut lookup = CategoryLookup::default();
        for value in values {
            let value = value.into();
            if !lookup.contains(value) {
                lookup.insert(value.map(str::to_string));
            }
        }
        lookup
    }

    fn insert(&mut self, category: Option<String>) {
        let code = self.categories.len();
        match &category {
            Some(label) => {
                self.codes.insert(label.clone(), code);
            }
            None => self.missing = Some(code),
        }
        self.categories.push(category);
    }

    pub fn code<'a>(&self, category: impl Into<Option<&'a str>>) -> Option<usize> {
        match category.into() {
            Some(label) => self.codes.get(label).copied(),
            None => self.missing,
        }
    }

    pub fn contains<'a>(&self, category: impl Into<Option<&'a str>>) -> bool {
        self.code(category).is_some()
    }

    /// Number of distinct categories, K.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in code order.
    pub fn categories(&self) -> &[Option<String>] {
        &self.categories
    }

    /// Category labels in code order, `None` for missing.
    pub fn labels(&self) -> impl Iterator<Item = Option<&str>> {
        self.categories.iter().map(Option::as_deref)
    }

    /// Append the K-wide indicator block for `category`. A category outside
    /// the lookup yields an all-zero block.
    pub fn one_hot_into(&self, category: Option<&str>, out: &mut Vec<f64>) {
        let hot = self.code(category);
        out.extend((0..self.len()).map(|code| if Some(code) == hot { 1.0 } else { 0.0 }));
    }
}

impl TryFrom<Vec<Option<String>>> for CategoryLookup {
    type Error = String;

    fn try_from(categories: Vec<Option<String>>) -> Result<Self, Self::Error> {
        let mut lookup = CategoryLookup::default();
        for category in categories {
            if lookup.contains(category.as_deref()) {
                return Err(format!("duplicate category {:?} in lookup", category));
            }
            lookup.insert(category);
        }
        Ok(lookup)
    }
}

impl From<CategoryLookup> for Vec<Option<String>> {
    fn from(lookup: CategoryLookup) -> Self {
        lookup.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_occurrence_order() {
        let lookup = CategoryLookup::from_observed(["b", "a", "b", "c"]);
        assert_eq!(lookup.code("b"), Some(0));
        assert_eq!(lookup.code("a"), Some(1));
        assert_eq!(lookup.code("c"), Some(2));
        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup.labels().collect::<Vec<_>>(), [Some("b"), Some("a"), Some("c")]);
        assert!(!lookup.contains(None::<&str>));
    }

    #[test]
    fn test_missing_is_a_category() {
        let lookup = CategoryLookup::from_observed([Some("a"), None, Some("b"), Some("a"), None]);
        assert_eq!(lookup.len(), 3);
        assert_eq!(lookup.code(None::<&str>), Some(1));
        assert_eq!(lookup.code("b"), Some(2));
        assert_eq!(lookup.labels().collect::<Vec<_>>(), [Some("a"), None, Some("b")]);
    }

    #[test]
    fn test_one_hot_blocks() {
        let lookup = CategoryLookup::from_observed(["x", "y"]);
        let mut row = vec![9.0];
        lookup.one_hot_into(Some("y"), &mut row);
        lookup.one_hot_into(Some("z"), &mut row);
        lookup.one_hot_into(None, &mut row);
        assert_eq!(row, vec![9.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);

        let with_missing = CategoryLookup::from_observed([None, Some("x")]);
        let mut row = Vec::new();
        with_missing.one_hot_into(None, &mut row);
        assert_eq!(row, vec![1.0, 0.0]);
    }

    #[test]
    fn test_rejects_duplicate_categories() {
        let result = CategoryLookup::try_from(vec![Some("a".to_string()), Some("a".to_string())]);
        assert!(result.is_err());
        let result = CategoryLookup::try_from(vec![None, Some("a".to_string()), None]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_ordered_list() {
        let lookup = CategoryLookup::from_observed(["LEO", "GEO", "MEO"]);
        let json = serde_json::to_string(&lookup).unwrap();
        assert_eq!(json, r#"["LEO","GEO","MEO"]"#);
        let restored: CategoryLookup = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, lookup);

        let lookup = CategoryLookup::from_observed([Some("LEO"), None]);
        let json = serde_json::to_string(&lookup).unwrap();
        assert_eq!(json, r#"["LEO",null]"#);
        let restored: CategoryLookup = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.code(None::<&str>), Some(1));
    }

    proptest! {
        #[test]
        fn codes_are_contiguous(values in prop::collection::vec("[a-e]{1,2}", 0..40)) {
            let lookup = CategoryLookup::from_observed(values.iter().map(String::as_str));
            let mut codes: Vec<usize> = values.iter().map(|v| lookup.code(v.as_str()).unwrap()).collect();
            codes.sort_unstable();
            codes.dedup();
            prop_assert_eq!(codes, (0..lookup.len()).collect::<Vec<_>>());
        }
    }
}
