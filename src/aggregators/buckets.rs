//! Fixed-partition histograms.
//!
//! Buckets are declared once, in display order, before any record is seen.
//! The output always lists every declared bucket in that order, including
//! empty ones.

use serde::{Deserialize, Serialize};

use crate::aggregators::types::{BucketResult, BucketRow, Field};
use crate::coerce;

/// Inclusive upper edge of a numeric bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpperBound {
    AtMost(f64),
    /// Catches every value above the previous bucket.
    Open,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub upper: UpperBound,
}

impl Bucket {
    pub fn at_most(label: impl Into<String>, upper: f64) -> Self {
        Self {
            label: label.into(),
            upper: UpperBound::AtMost(upper),
        }
    }

    pub fn open(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            upper: UpperBound::Open,
        }
    }
}

/// What happens to a value that fits no bucket: non-numeric, below the plan's
/// minimum, above every closed bound, or an unmatched label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum UnplacedPolicy {
    /// Leave it out of every bucket.
    #[default]
    Drop,
    /// Count it in an extra trailing bucket with this label.
    Unknown { label: String },
}

impl UnplacedPolicy {
    pub fn unknown(label: impl Into<String>) -> Self {
        UnplacedPolicy::Unknown {
            label: label.into(),
        }
    }

    fn label(&self) -> Option<&str> {
        match self {
            UnplacedPolicy::Drop => None,
            UnplacedPolicy::Unknown { label } => Some(label),
        }
    }
}

/// Where a value landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Bucket(usize),
    Unplaced,
}

/// Ordered numeric buckets plus the rules for values that do not fit.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketPlan {
    buckets: Vec<Bucket>,
    minimum: Option<f64>,
    unplaced: UnplacedPolicy,
}

impl BucketPlan {
    /// Buckets must be given with ascending upper bounds.
    pub fn new(buckets: Vec<Bucket>) -> Self {
        Self {
            buckets,
            minimum: None,
            unplaced: UnplacedPolicy::Drop,
        }
    }

    /// Accept values from `minimum` (inclusive) instead of any positive value.
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_unplaced(mut self, policy: UnplacedPolicy) -> Self {
        self.unplaced = policy;
        self
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.minimum {
            Some(min) => value >= min,
            None => value > 0.0,
        }
    }

    fn place(&self, value: f64) -> Placement {
        if !self.accepts(value) {
            return Placement::Unplaced;
        }

        self.buckets
            .iter()
            .position(|b| match b.upper {
                UpperBound::AtMost(upper) => value <= upper,
                UpperBound::Open => true,
            })
            .map_or(Placement::Unplaced, Placement::Bucket)
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets
            .iter()
            .map(|b| b.label.as_str())
            .chain(self.unplaced.label())
    }
}

/// Counts each record once per series into the first bucket whose upper
/// bound is at least the value.
///
/// A value equal to a bound lands in that bucket. By default values that are
/// zero, negative or not finite are left out entirely.
pub fn build_buckets<T>(records: &[T], plan: &BucketPlan, series: &[Field<T>]) -> BucketResult {
    let rows = plan.labels().count();
    let mut counts = vec![vec![0u64; series.len()]; rows];
    let unknown_row = plan.unplaced.label().map(|_| plan.buckets.len());

    for record in records {
        for (s, field) in series.iter().enumerate() {
            let row = match plan.place(field.value(record)) {
                Placement::Bucket(i) => Some(i),
                Placement::Unplaced => unknown_row,
            };
            if let Some(row) = row {
                counts[row][s] += 1;
            }
        }
    }

    BucketResult {
        series: series.iter().map(|f| f.label()).collect(),
        rows: plan
            .labels()
            .zip(counts)
            .map(|(label, counts)| BucketRow {
                label: label.to_string(),
                counts,
            })
            .collect(),
    }
}

/// A categorical bucket matched by case-insensitive substrings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBucket {
    pub label: String,
    pub patterns: Vec<String>,
}

impl LabelBucket {
    pub fn new(label: impl Into<String>, patterns: &[&str]) -> Self {
        Self {
            label: label.into(),
            patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    fn matches(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.patterns.iter().any(|p| value.contains(p.as_str()))
    }
}

/// Buckets free-text answers such as `"$51-200"` by substring match.
///
/// The first bucket with a matching pattern wins. Blank and `"N/A"` answers
/// are never counted; other unmatched answers follow `unplaced`.
pub fn build_label_buckets<T, F>(
    records: &[T],
    buckets: &[LabelBucket],
    unplaced: &UnplacedPolicy,
    series: &str,
    field: F,
) -> BucketResult
where
    F: Fn(&T) -> &str,
{
    let mut counts = vec![0u64; buckets.len()];
    let mut unknown = 0u64;

    for record in records {
        let value = field(record);
        if coerce::is_blank_or_sentinel(value) {
            continue;
        }
        match buckets.iter().position(|b| b.matches(value)) {
            Some(i) => counts[i] += 1,
            None => unknown += 1,
        }
    }

    let mut rows: Vec<BucketRow> = buckets
        .iter()
        .zip(counts)
        .map(|(b, count)| BucketRow {
            label: b.label.clone(),
            counts: vec![count],
        })
        .collect();

    if let Some(label) = unplaced.label() {
        rows.push(BucketRow {
            label: label.to_string(),
            counts: vec![unknown],
        });
    }

    BucketResult {
        series: vec![series.to_string()],
        rows,
    }
}
