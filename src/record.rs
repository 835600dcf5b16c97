//! Loosely-typed rows as produced by the parser.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coerce;

/// A single scalar cell. CSV input only ever yields [`RawValue::Text`];
/// JSON input may carry numbers and booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Renders the cell as text. Whole numbers print without a fraction.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawValue::Text(s) => Cow::Borrowed(s.as_str()),
            RawValue::Bool(b) => Cow::Owned(b.to_string()),
            RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Cow::Owned(format!("{}", *n as i64))
            }
            RawValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            RawValue::Number(_) | RawValue::Bool(_) => None,
            RawValue::Text(s) => coerce::parse_int(s),
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n).filter(|v| v.is_finite()),
            RawValue::Bool(_) => None,
            RawValue::Text(s) => coerce::parse_float(s),
        }
    }

    pub fn as_currency(&self) -> Option<f64> {
        match self {
            RawValue::Text(s) => coerce::parse_currency(s),
            other => other.as_float(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

/// An ordered mapping from column name to an optional cell.
///
/// Column names are matched exactly; a misspelt header silently reads as
/// absent and the normalizer falls back to the field default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: IndexMap<String, Option<RawValue>>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling rows by hand.
    pub fn with(mut self, column: &str, value: impl Into<RawValue>) -> Self {
        self.insert(column, Some(value.into()));
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Option<RawValue>) {
        self.fields.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.fields.get(column).and_then(Option::as_ref)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Trimmed text of `column`, or `default` when absent or blank.
    pub fn text_or(&self, column: &str, default: &str) -> String {
        self.get(column)
            .map(|v| v.as_text().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Categorical text, defaulting to [`coerce::MISSING`].
    pub fn category(&self, column: &str) -> String {
        self.text_or(column, coerce::MISSING)
    }

    pub fn int_or(&self, column: &str, default: i64) -> i64 {
        self.get(column)
            .and_then(RawValue::as_int)
            .unwrap_or(default)
    }

    pub fn float_or(&self, column: &str, default: f64) -> f64 {
        self.get(column)
            .and_then(RawValue::as_float)
            .unwrap_or(default)
    }

    pub fn currency_or(&self, column: &str, default: f64) -> f64 {
        self.get(column)
            .and_then(RawValue::as_currency)
            .unwrap_or(default)
    }

    /// Comma-separated multi-select cell; empty when absent.
    pub fn list(&self, column: &str) -> Vec<String> {
        self.get(column)
            .map(|v| coerce::split_list(&v.as_text()))
            .unwrap_or_default()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<RawValue>)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, Option<RawValue>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let row = RawRecord::new()
            .with("Genre", "Fantasy")
            .with("Role", "   ")
            .with("Year", 2006i64);

        assert_eq!(row.category("Genre"), "Fantasy");
        assert_eq!(row.category("Role"), "N/A");
        assert_eq!(row.category("Missing"), "N/A");
        assert_eq!(row.text_or("Year", ""), "2006");
    }

    #[test]
    fn test_numeric_defaults_never_nan() {
        let row = RawRecord::new()
            .with("Rating", "not sure")
            .with("Price", "$")
            .with("Flag", true);

        assert_eq!(row.int_or("Rating", 0), 0);
        assert_eq!(row.currency_or("Price", 0.0), 0.0);
        assert_eq!(row.float_or("Flag", 0.0), 0.0);
        assert_eq!(row.float_or("Absent", 0.0), 0.0);
    }

    #[test]
    fn test_null_cell_reads_as_absent() {
        let mut row = RawRecord::new();
        row.insert("Age", None);

        assert_eq!(row.len(), 1);
        assert!(row.get("Age").is_none());
        assert_eq!(row.int_or("Age", 0), 0);
    }

    #[test]
    fn test_json_numbers_coerce() {
        let row = RawRecord::new().with("Sales", 3.75).with("Rank", 12.0);
        assert_eq!(row.float_or("Sales", 0.0), 3.75);
        assert_eq!(row.int_or("Rank", 0), 12);
        assert_eq!(row.int_or("Sales", 0), 3);
    }

    #[test]
    fn test_list_split() {
        let row = RawRecord::new().with("Interests", "Dice,Books, Minis");
        assert_eq!(row.list("Interests"), vec!["Dice", "Books", "Minis"]);
        assert!(row.list("Missing").is_empty());
    }

    #[test]
    fn test_column_order_preserved() {
        let row: RawRecord = vec![("b", None), ("a", Some(RawValue::from("x")))]
            .into_iter()
            .collect();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
