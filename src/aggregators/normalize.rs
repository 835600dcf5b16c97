use tracing::debug;

use crate::record::RawRecord;

/// A fixed-shape record built from a loosely-typed row.
///
/// `from_raw` must never fail: missing or malformed cells take the field
/// default (`0` for numbers, `"N/A"` for categories, empty for lists).
pub trait Normalize: Sized {
    /// Raw column that identifies a row. Rows where it is blank are dropped.
    const IDENTITY_COLUMN: &'static str;

    fn from_raw(raw: &RawRecord) -> Self;

    fn identity(&self) -> &str;

    /// Whether a raw row is complete enough to keep. Checked before
    /// `from_raw`; rejected rows are dropped like rows without identity.
    fn accepts(_raw: &RawRecord) -> bool {
        true
    }
}

/// Normalizes every accepted row, keeping only those with a non-blank
/// identity.
///
/// Survivors keep their relative order.
pub fn normalize<T: Normalize>(rows: &[RawRecord]) -> Vec<T> {
    let records: Vec<T> = rows
        .iter()
        .filter(|raw| T::accepts(raw))
        .map(T::from_raw)
        .filter(|r| !r.identity().trim().is_empty())
        .collect();

    let dropped = rows.len() - records.len();
    if dropped > 0 {
        debug!(
            dropped,
            kept = records.len(),
            identity = T::IDENTITY_COLUMN,
            "Dropped incomplete rows"
        );
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Response {
        timestamp: String,
        rating: i64,
        genre: String,
        interests: Vec<String>,
    }

    impl Normalize for Response {
        const IDENTITY_COLUMN: &'static str = "Timestamp";

        fn from_raw(raw: &RawRecord) -> Self {
            Self {
                timestamp: raw.text_or(Self::IDENTITY_COLUMN, ""),
                rating: raw.int_or("Rating", 0),
                genre: raw.category("Genre"),
                interests: raw.list("Interests"),
            }
        }

        fn identity(&self) -> &str {
            &self.timestamp
        }
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let rows = vec![RawRecord::new().with("Timestamp", "2024-01-01")];
        let records: Vec<Response> = normalize(&rows);

        assert_eq!(
            records,
            vec![Response {
                timestamp: "2024-01-01".into(),
                rating: 0,
                genre: "N/A".into(),
                interests: vec![],
            }]
        );
    }

    #[test]
    fn test_unparseable_number_takes_default() {
        let rows = vec![
            RawRecord::new()
                .with("Timestamp", "t1")
                .with("Rating", "   "),
            RawRecord::new()
                .with("Timestamp", "t2")
                .with("Rating", "stars"),
        ];
        let records: Vec<Response> = normalize(&rows);

        assert!(records.iter().all(|r| r.rating == 0));
    }

    #[test]
    fn test_rows_without_identity_are_dropped_in_order() {
        let rows = vec![
            RawRecord::new().with("Timestamp", "t1").with("Genre", "Horror"),
            RawRecord::new().with("Genre", "Fantasy"),
            RawRecord::new().with("Timestamp", "t3").with("Genre", "Sci-Fi"),
            RawRecord::new().with("Timestamp", "  ").with("Genre", "Western"),
            RawRecord::new().with("Timestamp", "t5").with("Genre", "Noir"),
        ];
        let records: Vec<Response> = normalize(&rows);

        assert_eq!(records.len(), 3);
        let ids: Vec<_> = records.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3", "t5"]);
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Response> = normalize(&[]);
        assert!(records.is_empty());
    }
}
