use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::aggregators::types::NamedCount;
use crate::coerce;

/// Output order of a categorical count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most frequent first; equal counts keep first-seen order.
    ByValue,
    /// Alphabetical by category name.
    ByName,
}

/// Counts the distinct values of `field` across `records`.
///
/// Blank values and the `"N/A"` placeholder are not counted. Truncating to
/// a top-N is left to the caller.
pub fn count_occurrences<T, F>(records: &[T], field: F, order: SortOrder) -> Vec<NamedCount>
where
    F: Fn(&T) -> &str,
{
    let mut counts: IndexMap<&str, u64> = IndexMap::new();

    for record in records {
        let value = field(record);
        if coerce::is_blank_or_sentinel(value) {
            continue;
        }
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut result: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, value)| NamedCount::new(name, value))
        .collect();

    match order {
        // sort_by is stable, so ties stay in insertion order.
        SortOrder::ByValue => result.sort_by(|a, b| b.value.cmp(&a.value)),
        SortOrder::ByName => result.sort_by(|a, b| compare_labels(&a.name, &b.name)),
    }

    result
}

/// Case-insensitive label order. Labels that differ only in case put the
/// lowercase form first.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(result: &[NamedCount]) -> Vec<&str> {
        result.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_counts_sorted_by_value() {
        let rows = vec!["A", "A", "B"];
        let result = count_occurrences(&rows, |r| *r, SortOrder::ByValue);

        assert_eq!(result, vec![NamedCount::new("A", 2), NamedCount::new("B", 1)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let rows = vec!["Zed", "Alpha", "Mid", "Alpha", "Zed", "Mid", "Solo"];
        let result = count_occurrences(&rows, |r| *r, SortOrder::ByValue);

        assert_eq!(names(&result), vec!["Zed", "Alpha", "Mid", "Solo"]);
    }

    #[test]
    fn test_sorted_by_name() {
        let rows = vec!["weekly", "Monthly", "Daily", "Monthly"];
        let result = count_occurrences(&rows, |r| *r, SortOrder::ByName);

        assert_eq!(names(&result), vec!["Daily", "Monthly", "weekly"]);
        assert_eq!(result[1].value, 2);
    }

    #[test]
    fn test_case_variants_put_lowercase_first() {
        let rows = vec!["Weekly", "weekly", "Annually"];
        let result = count_occurrences(&rows, |r| *r, SortOrder::ByName);

        assert_eq!(names(&result), vec!["Annually", "weekly", "Weekly"]);
        assert_eq!(compare_labels("weekly", "Weekly"), Ordering::Less);
    }

    #[test]
    fn test_skips_blank_and_placeholder() {
        let rows = vec!["", "  ", "N/A", "GM", "GM"];
        let result = count_occurrences(&rows, |r| *r, SortOrder::ByValue);

        assert_eq!(result, vec![NamedCount::new("GM", 2)]);
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<&str> = vec![];
        assert!(count_occurrences(&rows, |r| *r, SortOrder::ByValue).is_empty());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let rows = vec!["b", "a", "c", "a", "b", "d"];
        let first = count_occurrences(&rows, |r| *r, SortOrder::ByValue);
        let second = count_occurrences(&rows, |r| *r, SortOrder::ByValue);
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_n_by_slicing() {
        let rows = vec!["a", "a", "a", "b", "b", "c"];
        let top: Vec<_> = count_occurrences(&rows, |r| *r, SortOrder::ByValue)
            .into_iter()
            .take(2)
            .collect();
        assert_eq!(names(&top), vec!["a", "b"]);
    }
}
