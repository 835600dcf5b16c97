//! Failures that cross from data loading into the presentation layer.
//!
//! Only load and parse failures are errors. Malformed individual values are
//! absorbed by the normalizer, and an empty dataset is a state, not an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to fetch {location}: {message}")]
    Fetch { location: String, message: String },

    #[error("{location} responded with status {status}")]
    Status { location: String, status: u16 },

    #[error("failed to read {location}: {message}")]
    Io { location: String, message: String },

    #[error("failed to parse data: {0}")]
    Parse(String),
}

impl LoadError {
    /// Load failures (taxonomy a) as opposed to structural parse failures (b).
    pub fn is_load_failure(&self) -> bool {
        !matches!(self, LoadError::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = LoadError::Status {
            location: "https://example.org/ttrpg.csv".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "https://example.org/ttrpg.csv responded with status 404"
        );
        assert!(err.is_load_failure());
    }

    #[test]
    fn test_parse_is_not_load_failure() {
        assert!(!LoadError::Parse("bad quote".into()).is_load_failure());
    }
}
