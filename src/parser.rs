//! CSV and JSON parsing into [`RawRecord`] rows.
//!
//! Parsing never fails outright. Structural problems are collected in
//! [`ParseOutcome::errors`] next to whatever rows could be recovered, and the
//! caller decides whether an outcome with errors is still usable.

use serde_json::Value;
use tracing::debug;

use crate::record::{RawRecord, RawValue};

/// Input format of a static data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// Picks the format from a path or URL, looking past a trailing `.gz`.
    pub fn detect(location: &str) -> Format {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let path = path.strip_suffix(".gz").unwrap_or(path);

        if path.to_ascii_lowercase().ends_with(".json") {
            Format::Json
        } else {
            Format::Csv
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// 1-based data row the error refers to, when known.
    pub row: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub data: Vec<RawRecord>,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    fn fatal(message: String) -> Self {
        Self {
            data: Vec::new(),
            errors: vec![ParseError { message, row: None }],
        }
    }

    /// All error messages joined for logging.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| match e.row {
                Some(row) => format!("row {}: {}", row, e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn parse(text: &str, format: Format) -> ParseOutcome {
    match format {
        Format::Csv => parse_csv(text),
        Format::Json => parse_json(text),
    }
}

/// Parses CSV text whose first row holds the column names.
///
/// Blank lines are skipped. Rows with a different field count than the
/// header are kept (missing columns read as absent) and reported.
pub fn parse_csv(text: &str) -> ParseOutcome {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => return ParseOutcome::fatal(e.to_string()),
    };

    let mut outcome = ParseOutcome::default();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                outcome.errors.push(ParseError {
                    message: e.to_string(),
                    row: Some(row),
                });
                continue;
            }
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        if record.len() != headers.len() {
            outcome.errors.push(ParseError {
                message: format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    record.len()
                ),
                row: Some(row),
            });
        }

        let raw: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(column, field)| (column, Some(RawValue::from(field))))
            .collect();
        outcome.data.push(raw);
    }

    debug!(
        rows = outcome.data.len(),
        errors = outcome.errors.len(),
        "CSV parsed"
    );
    outcome
}

/// Parses a JSON array of flat objects.
///
/// `null` cells read as absent; nested arrays and objects are kept as their
/// JSON text. Array elements that are not objects are reported and skipped.
pub fn parse_json(text: &str) -> ParseOutcome {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => return ParseOutcome::fatal(e.to_string()),
    };

    let Value::Array(items) = value else {
        return ParseOutcome::fatal("expected a top-level JSON array".to_string());
    };

    let mut outcome = ParseOutcome::default();

    for (i, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            outcome.errors.push(ParseError {
                message: "expected an object".to_string(),
                row: Some(i + 1),
            });
            continue;
        };

        let raw: RawRecord = map
            .into_iter()
            .map(|(column, cell)| (column, json_cell(cell)))
            .collect();
        outcome.data.push(raw);
    }

    debug!(
        rows = outcome.data.len(),
        errors = outcome.errors.len(),
        "JSON parsed"
    );
    outcome
}

fn json_cell(cell: Value) -> Option<RawValue> {
    match cell {
        Value::Null => None,
        Value::Bool(b) => Some(RawValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(RawValue::Number),
        Value::String(s) => Some(RawValue::Text(s)),
        nested => Some(RawValue::Text(nested.to_string())),
    }
}
