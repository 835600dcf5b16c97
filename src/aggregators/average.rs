use serde::Serialize;

use crate::aggregators::types::{Field, NamedValue};
use crate::coerce::{is_valid_measure, round_to};

/// Averages each field over its valid observations, rounded to one decimal.
///
/// An observation is valid only when finite and greater than zero, so a zero
/// (the normalizer's "not answered" default) is left out of both the sum and
/// the count. Fields without valid observations report 0. Results follow the
/// order of `fields` and are labelled from the field name.
pub fn average_of<T>(records: &[T], fields: &[Field<T>]) -> Vec<NamedValue> {
    let mut sums = vec![0.0; fields.len()];
    let mut counts = vec![0u64; fields.len()];

    for record in records {
        for (i, field) in fields.iter().enumerate() {
            let value = field.value(record);
            if is_valid_measure(value) {
                sums[i] += value;
                counts[i] += 1;
            }
        }
    }

    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let value = if counts[i] > 0 {
                round_to(sums[i] / counts[i] as f64, 1)
            } else {
                0.0
            };
            NamedValue::new(field.label(), value)
        })
        .collect()
}

/// Plain sums of each field over all records, skipping non-finite values.
/// Labels are the raw field names.
pub fn totals<T>(records: &[T], fields: &[Field<T>]) -> Vec<NamedValue> {
    fields
        .iter()
        .map(|field| {
            let total = records
                .iter()
                .map(|r| field.value(r))
                .filter(|v| v.is_finite())
                .sum();
            NamedValue::new(field.name, total)
        })
        .collect()
}

/// Headline figures for a single numeric field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub records: usize,
    pub total: f64,
    /// `total / records`, or 0 for an empty dataset.
    pub mean: f64,
}

pub fn summary<T>(records: &[T], field: Field<T>) -> Summary {
    let total: f64 = records
        .iter()
        .map(|r| field.value(r))
        .filter(|v| v.is_finite())
        .sum();

    let mean = if records.is_empty() {
        0.0
    } else {
        total / records.len() as f64
    };

    Summary {
        records: records.len(),
        total,
        mean,
    }
}
