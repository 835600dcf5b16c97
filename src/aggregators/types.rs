//! Data types shared by the aggregation components.

use serde::Serialize;

use crate::coerce;

/// A named numeric accessor on a normalized record.
///
/// `name` is the camel-case field name; averaged series derive their display
/// label from it.
pub struct Field<T> {
    pub name: &'static str,
    pub select: fn(&T) -> f64,
}

impl<T> Field<T> {
    pub const fn new(name: &'static str, select: fn(&T) -> f64) -> Self {
        Self { name, select }
    }

    /// A field worth 1 on every record, turning sums into counts.
    pub const fn count(name: &'static str) -> Self {
        Self {
            name,
            select: one::<T>,
        }
    }

    pub fn value(&self, record: &T) -> f64 {
        (self.select)(record)
    }

    pub fn label(&self) -> String {
        coerce::humanize_field_name(self.name)
    }
}

fn one<T>(_: &T) -> f64 {
    1.0
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

/// One category and how many records carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub value: u64,
}

impl NamedCount {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One label and a derived measure (average, sum).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A histogram bucket with one counter per parallel series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketRow {
    pub label: String,
    pub counts: Vec<u64>,
}

/// Buckets in declaration order; `series[i]` names `rows[_].counts[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketResult {
    pub series: Vec<String>,
    pub rows: Vec<BucketRow>,
}

impl BucketResult {
    /// Counts of a single series across all buckets, in bucket order.
    pub fn series_counts(&self, series: usize) -> Vec<u64> {
        self.rows
            .iter()
            .map(|row| row.counts.get(series).copied().unwrap_or(0))
            .collect()
    }
}

/// A group with its highest-ranked members and the total over every member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTabGroup {
    pub label: String,
    pub top_members: Vec<NamedCount>,
    pub total: u64,
}

/// One key of an ordinal series with a sum per requested field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub key: String,
    pub values: Vec<f64>,
}

/// Points in the natural order of their key; `fields[i]` names `values[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesResult {
    pub fields: Vec<String>,
    pub points: Vec<SeriesPoint>,
}

impl SeriesResult {
    pub fn keys(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.key.as_str()).collect()
    }

    pub fn field_values(&self, field: usize) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| p.values.get(field).copied().unwrap_or(0.0))
            .collect()
    }
}
