//! Projection of aggregation results into parallel label/value arrays.
//!
//! Colours come from an explicit [`Palette`] passed in by the caller, so
//! aggregation never depends on styling.

use serde::{Deserialize, Serialize};

use crate::aggregators::{BucketResult, CrossTabGroup, NamedCount, NamedValue, SeriesResult};

const DEFAULT_COLORS: [&str; 10] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8", "#82ca9d", "#ffc658", "#8dd1e1",
    "#d0ed57", "#a4de6c",
];

/// Colours handed to charts, cycled when a chart has more points than colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Palette {
    pub fn color(&self, index: usize) -> Option<&str> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[index % self.colors.len()].as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

impl ChartDataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            colors: Vec::new(),
        }
    }
}

/// The shape a charting library consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// Single-dataset charts get one colour per point, multi-dataset charts
    /// one colour per dataset.
    pub fn with_palette(mut self, palette: &Palette) -> Self {
        if self.datasets.len() == 1 {
            let points = self.labels.len();
            self.datasets[0].colors = (0..points)
                .filter_map(|i| palette.color(i).map(str::to_string))
                .collect();
        } else {
            for (i, dataset) in self.datasets.iter_mut().enumerate() {
                dataset.colors = palette.color(i).map(str::to_string).into_iter().collect();
            }
        }
        self
    }
}

/// Converts a result into [`ChartData`]; `label` names the dataset when the
/// result carries no series names of its own.
pub trait ToChart {
    fn to_chart(&self, label: &str) -> ChartData;
}

impl ToChart for [NamedCount] {
    fn to_chart(&self, label: &str) -> ChartData {
        ChartData {
            labels: self.iter().map(|c| c.name.clone()).collect(),
            datasets: vec![ChartDataset::new(
                label,
                self.iter().map(|c| c.value as f64).collect(),
            )],
        }
    }
}

impl ToChart for [NamedValue] {
    fn to_chart(&self, label: &str) -> ChartData {
        ChartData {
            labels: self.iter().map(|v| v.name.clone()).collect(),
            datasets: vec![ChartDataset::new(
                label,
                self.iter().map(|v| v.value).collect(),
            )],
        }
    }
}

impl ToChart for BucketResult {
    fn to_chart(&self, label: &str) -> ChartData {
        let datasets = if self.series.len() == 1 {
            vec![ChartDataset::new(label, counts_as_f64(self.series_counts(0)))]
        } else {
            self.series
                .iter()
                .enumerate()
                .map(|(i, name)| ChartDataset::new(name.as_str(), counts_as_f64(self.series_counts(i))))
                .collect()
        };

        ChartData {
            labels: self.rows.iter().map(|r| r.label.clone()).collect(),
            datasets,
        }
    }
}

impl ToChart for [CrossTabGroup] {
    fn to_chart(&self, label: &str) -> ChartData {
        ChartData {
            labels: self.iter().map(|g| g.label.clone()).collect(),
            datasets: vec![ChartDataset::new(
                label,
                self.iter().map(|g| g.total as f64).collect(),
            )],
        }
    }
}

impl ToChart for SeriesResult {
    fn to_chart(&self, label: &str) -> ChartData {
        let datasets = if self.fields.len() == 1 {
            vec![ChartDataset::new(label, self.field_values(0))]
        } else {
            self.fields
                .iter()
                .enumerate()
                .map(|(i, name)| ChartDataset::new(name.as_str(), self.field_values(i)))
                .collect()
        };

        ChartData {
            labels: self.keys().into_iter().map(str::to_string).collect(),
            datasets,
        }
    }
}

fn counts_as_f64(counts: Vec<u64>) -> Vec<f64> {
    counts.into_iter().map(|c| c as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregators::{BucketRow, SeriesPoint};

    #[test]
    fn test_counts_to_chart() {
        let counts = vec![NamedCount::new("A", 2), NamedCount::new("B", 1)];
        let chart = counts.to_chart("Category");

        assert_eq!(chart.labels, vec!["A", "B"]);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].label, "Category");
        assert_eq!(chart.datasets[0].data, vec![2.0, 1.0]);
    }

    #[test]
    fn test_parallel_buckets_to_chart() {
        let buckets = BucketResult {
            series: vec!["Digital".into(), "Hardback".into()],
            rows: vec![
                BucketRow {
                    label: "$0-$10".into(),
                    counts: vec![3, 1],
                },
                BucketRow {
                    label: "$76+".into(),
                    counts: vec![0, 2],
                },
            ],
        };
        let chart = buckets.to_chart("Price");

        assert_eq!(chart.labels, vec!["$0-$10", "$76+"]);
        assert_eq!(chart.datasets[0].label, "Digital");
        assert_eq!(chart.datasets[1].data, vec![1.0, 2.0]);
    }

    #[test]
    fn test_series_to_chart() {
        let series = SeriesResult {
            fields: vec!["Global_Sales".into()],
            points: vec![
                SeriesPoint {
                    key: "1985".into(),
                    values: vec![2.0],
                },
                SeriesPoint {
                    key: "1986".into(),
                    values: vec![3.5],
                },
            ],
        };
        let chart = series.to_chart("Sales");

        assert_eq!(chart.labels, vec!["1985", "1986"]);
        assert_eq!(chart.datasets[0].label, "Sales");
        assert_eq!(chart.datasets[0].data, vec![2.0, 3.5]);
    }

    #[test]
    fn test_palette_per_point_and_per_dataset() {
        let palette = Palette {
            colors: vec!["red".into(), "blue".into()],
        };

        let single = vec![
            NamedCount::new("a", 1),
            NamedCount::new("b", 1),
            NamedCount::new("c", 1),
        ]
        .to_chart("x")
        .with_palette(&palette);
        assert_eq!(single.datasets[0].colors, vec!["red", "blue", "red"]);

        let multi = ChartData {
            labels: vec!["k".into()],
            datasets: vec![
                ChartDataset::new("one", vec![1.0]),
                ChartDataset::new("two", vec![2.0]),
            ],
        }
        .with_palette(&palette);
        assert_eq!(multi.datasets[1].colors, vec!["blue"]);
    }

    #[test]
    fn test_empty_palette() {
        let palette = Palette { colors: vec![] };
        assert_eq!(palette.color(3), None);
    }
}
