//! Output formatting and persistence for dashboard reports.
//!
//! Reports are written as a JSON envelope, or flattened to one CSV row per
//! chart point.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::chart::ChartData;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// A report with the metadata needed to interpret it later.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a, R: Serialize> {
    pub schema_version: u32,
    pub dashboard: &'a str,
    pub source: &'a str,
    pub generated_at: DateTime<Utc>,
    pub records: usize,
    pub report: &'a R,
    pub charts: IndexMap<&'static str, ChartData>,
}

impl<'a, R: Serialize> ReportEnvelope<'a, R> {
    pub fn new(
        dashboard: &'a str,
        source: &'a str,
        records: usize,
        report: &'a R,
        charts: Vec<(&'static str, ChartData)>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            dashboard,
            source,
            generated_at: Utc::now(),
            records,
            report,
            charts: charts.into_iter().collect(),
        }
    }
}

/// One point of one dataset of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow<'a> {
    pub chart: &'a str,
    pub label: &'a str,
    pub dataset: &'a str,
    pub value: f64,
}

/// Flattens charts into rows, chart by chart, dataset by dataset.
pub fn chart_rows<'a>(charts: &'a IndexMap<&'static str, ChartData>) -> Vec<ChartRow<'a>> {
    let mut rows = Vec::new();

    for (chart, data) in charts {
        for dataset in &data.datasets {
            for (label, value) in data.labels.iter().zip(&dataset.data) {
                rows.push(ChartRow {
                    chart: *chart,
                    label,
                    dataset: &dataset.label,
                    value: *value,
                });
            }
        }
    }

    rows
}

pub fn write_json<W: Write, R: Serialize>(mut writer: W, envelope: &ReportEnvelope<'_, R>) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, envelope)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_chart_csv<W: Write>(writer: W, charts: &IndexMap<&'static str, ChartData>) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for row in chart_rows(charts) {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the envelope in `format` to `path`, or to stdout when no path is
/// given.
pub fn emit<R: Serialize>(
    envelope: &ReportEnvelope<'_, R>,
    format: OutputFormat,
    path: Option<&str>,
) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }
            let file = File::create(path).with_context(|| format!("failed to create {}", path))?;
            debug!(path, ?format, "Writing report");
            write_to(BufWriter::new(file), envelope, format)?;
            info!(path, dashboard = envelope.dashboard, "Report written");
        }
        None => write_to(std::io::stdout().lock(), envelope, format)?,
    }
    Ok(())
}

fn write_to<W: Write, R: Serialize>(
    writer: W,
    envelope: &ReportEnvelope<'_, R>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(writer, envelope),
        OutputFormat::Csv => write_chart_csv(writer, &envelope.charts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartDataset;
    use std::fs;

    fn charts() -> Vec<(&'static str, ChartData)> {
        vec![
            (
                "Gender",
                ChartData {
                    labels: vec!["Male".into(), "Female".into()],
                    datasets: vec![ChartDataset::new("Customers", vec![3.0, 2.0])],
                },
            ),
            (
                "Price",
                ChartData {
                    labels: vec!["$0-$10".into()],
                    datasets: vec![
                        ChartDataset::new("Digital", vec![4.0]),
                        ChartDataset::new("Hardback", vec![1.0]),
                    ],
                },
            ),
        ]
    }

    #[test]
    fn test_chart_rows_flatten_every_dataset() {
        let map: IndexMap<&'static str, ChartData> = charts().into_iter().collect();
        let rows = chart_rows(&map);

        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[3],
            ChartRow {
                chart: "Price",
                label: "$0-$10",
                dataset: "Hardback",
                value: 1.0,
            }
        );
    }

    #[test]
    fn test_emit_csv_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/charts.csv");
        let report = vec![1, 2];
        let envelope = ReportEnvelope::new("shopping", "fixture.csv", 2, &report, charts());

        emit(&envelope, OutputFormat::Csv, path.to_str()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "chart,label,dataset,value");
        assert_eq!(lines[1], "Gender,Male,Customers,3.0");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_emit_json_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = vec!["a"];
        let envelope = ReportEnvelope::new("survey", "ttrpg.csv", 1, &report, charts());

        emit(&envelope, OutputFormat::Json, path.to_str()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["dashboard"], "survey");
        assert_eq!(value["records"], 1);
        assert_eq!(value["charts"]["Gender"]["labels"][1], "Female");
        assert!(value["generated_at"].is_string());
    }
}
