//! Per-category sums and averages, and top-N records by value.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::aggregators::types::{Field, NamedValue};
use crate::coerce::{self, is_valid_measure, round_to};

/// Sums `value` per distinct `key`, largest total first.
///
/// Equal totals keep first-seen order. Blank and `"N/A"` keys are skipped,
/// as are non-finite values.
pub fn sum_by<T, K>(records: &[T], key: K, value: Field<T>) -> Vec<NamedValue>
where
    K: Fn(&T) -> &str,
{
    let mut sums: IndexMap<&str, f64> = IndexMap::new();

    for record in records {
        let k = key(record);
        if coerce::is_blank_or_sentinel(k) {
            continue;
        }
        let v = value.value(record);
        let entry = sums.entry(k).or_insert(0.0);
        if v.is_finite() {
            *entry += v;
        }
    }

    let mut result: Vec<NamedValue> = sums
        .into_iter()
        .map(|(name, total)| NamedValue::new(name, total))
        .collect();
    result.sort_by(|a, b| descending(a.value, b.value));
    result
}

/// Mean of the valid (finite, positive) values of `value` per `key`, rounded
/// to one decimal, highest first.
///
/// Groups without a single valid value are left out.
pub fn average_by<T, K>(records: &[T], key: K, value: Field<T>) -> Vec<NamedValue>
where
    K: Fn(&T) -> &str,
{
    let mut stats: IndexMap<&str, (f64, u64)> = IndexMap::new();

    for record in records {
        let k = key(record);
        let v = value.value(record);
        if coerce::is_blank_or_sentinel(k) || !is_valid_measure(v) {
            continue;
        }
        let (sum, count) = stats.entry(k).or_insert((0.0, 0));
        *sum += v;
        *count += 1;
    }

    let mut result: Vec<NamedValue> = stats
        .into_iter()
        .map(|(name, (sum, count))| NamedValue::new(name, round_to(sum / count as f64, 1)))
        .collect();
    result.sort_by(|a, b| descending(a.value, b.value));
    result
}

/// The `n` records with the largest `value`, ties in input order.
pub fn top_records<'a, T>(records: &'a [T], value: Field<T>, n: usize) -> Vec<&'a T> {
    let mut ranked: Vec<&T> = records.iter().collect();
    ranked.sort_by(|a, b| descending(value.value(a), value.value(b)));
    ranked.truncate(n);
    ranked
}

/// Descending order that puts non-finite values last.
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}
