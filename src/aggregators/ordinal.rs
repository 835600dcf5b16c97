use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregators::types::{Field, SeriesPoint, SeriesResult};

/// Canonical season order used for seasonal series.
pub const SEASONS: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];

/// The ordering key a record contributes to an ordinal series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrdinalKey<'a> {
    Number(i64),
    Label(&'a str),
}

/// The keys a series accepts, and the order they are emitted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDomain {
    /// Whole numbers between `min` and `max` inclusive, ascending.
    Range { min: i64, max: i64 },
    /// Exactly these labels, in this order.
    Canonical(Vec<String>),
}

impl KeyDomain {
    pub fn range(min: i64, max: i64) -> Self {
        KeyDomain::Range { min, max }
    }

    pub fn canonical<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyDomain::Canonical(labels.into_iter().map(Into::into).collect())
    }

    pub fn seasons() -> Self {
        Self::canonical(SEASONS)
    }

    /// Sort position and display label of `key`, or `None` when outside the
    /// domain.
    fn locate(&self, key: OrdinalKey<'_>) -> Option<(i64, String)> {
        match self {
            KeyDomain::Range { min, max } => {
                let n = match key {
                    OrdinalKey::Number(n) => n,
                    OrdinalKey::Label(s) => s.trim().parse().ok()?,
                };
                (*min..=*max).contains(&n).then(|| (n, n.to_string()))
            }
            KeyDomain::Canonical(labels) => {
                let wanted = match key {
                    OrdinalKey::Label(s) => s.trim().to_string(),
                    OrdinalKey::Number(n) => n.to_string(),
                };
                labels
                    .iter()
                    .position(|l| *l == wanted)
                    .map(|i| (i as i64, labels[i].clone()))
            }
        }
    }
}

/// Groups records by an ordinal key and sums each field per key.
///
/// Records whose key falls outside `domain` are excluded before grouping, so
/// they contribute to no sum. Points come out in the domain's order (numeric
/// ascending, or canonical list order), never in first-seen order. Keys
/// without records are not emitted.
pub fn build_ordinal_series<T, K>(
    records: &[T],
    key: K,
    domain: &KeyDomain,
    fields: &[Field<T>],
) -> SeriesResult
where
    K: Fn(&T) -> OrdinalKey<'_>,
{
    let mut groups: BTreeMap<i64, (String, Vec<f64>)> = BTreeMap::new();

    for record in records {
        let Some((position, label)) = domain.locate(key(record)) else {
            continue;
        };
        let (_, sums) = groups
            .entry(position)
            .or_insert_with(|| (label, vec![0.0; fields.len()]));

        for (i, field) in fields.iter().enumerate() {
            let value = field.value(record);
            if value.is_finite() {
                sums[i] += value;
            }
        }
    }

    SeriesResult {
        fields: fields.iter().map(|f| f.name.to_string()).collect(),
        points: groups
            .into_values()
            .map(|(key, values)| SeriesPoint { key, values })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sale {
        season: &'static str,
        year: i64,
        amount: f64,
    }

    fn sale(season: &'static str, year: i64, amount: f64) -> Sale {
        Sale {
            season,
            year,
            amount,
        }
    }

    fn amount() -> Field<Sale> {
        Field::new("amount", |s: &Sale| s.amount)
    }

    #[test]
    fn test_canonical_order_not_insertion_order() {
        let records = vec![sale("Winter", 0, 10.0), sale("Spring", 0, 5.0)];

        let result = build_ordinal_series(
            &records,
            |s| OrdinalKey::Label(s.season),
            &KeyDomain::seasons(),
            &[amount()],
        );

        assert_eq!(result.keys(), vec!["Spring", "Winter"]);
        assert_eq!(result.field_values(0), vec![5.0, 10.0]);
    }

    #[test]
    fn test_unknown_canonical_key_excluded() {
        let records = vec![
            sale("Autumn", 0, 100.0),
            sale("Fall", 0, 1.0),
            sale("Fall", 0, 2.0),
        ];

        let result = build_ordinal_series(
            &records,
            |s| OrdinalKey::Label(s.season),
            &KeyDomain::seasons(),
            &[amount()],
        );

        assert_eq!(result.keys(), vec!["Fall"]);
        assert_eq!(result.field_values(0), vec![3.0]);
    }

    #[test]
    fn test_year_range_sorted_and_bounded() {
        let records = vec![
            sale("", 2001, 1.0),
            sale("", 1979, 50.0),
            sale("", 1985, 2.0),
            sale("", 2001, 4.0),
            sale("", 2021, 50.0),
            sale("", 0, 50.0),
        ];

        let result = build_ordinal_series(
            &records,
            |s| OrdinalKey::Number(s.year),
            &KeyDomain::range(1980, 2020),
            &[amount(), Field::count("games")],
        );

        assert_eq!(result.keys(), vec!["1985", "2001"]);
        assert_eq!(result.field_values(0), vec![2.0, 5.0]);
        assert_eq!(result.field_values(1), vec![1.0, 2.0]);
        assert_eq!(result.fields, vec!["amount", "games"]);
    }

    #[test]
    fn test_range_accepts_numeric_labels() {
        let records = vec![sale("3", 0, 1.0), sale("x", 0, 1.0)];

        let result = build_ordinal_series(
            &records,
            |s| OrdinalKey::Label(s.season),
            &KeyDomain::range(1, 5),
            &[Field::count("reviews")],
        );

        assert_eq!(result.keys(), vec!["3"]);
    }

    #[test]
    fn test_empty_input() {
        let result = build_ordinal_series::<Sale, _>(
            &[],
            |s| OrdinalKey::Number(s.year),
            &KeyDomain::range(1980, 2020),
            &[amount()],
        );
        assert!(result.points.is_empty());
    }
}
