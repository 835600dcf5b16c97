use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregators::UnplacedPolicy;
use crate::chart::Palette;

/// Dashboard settings, read from a JSON file. Every field is optional:
///
/// ```json
/// {
///   "palette": { "colors": ["#0088FE", "#00C49F"] },
///   "year_range": { "min": 1980, "max": 2020 },
///   "top_n": { "systems": 10, "cross_tab_groups": 5 },
///   "unplaced_values": { "policy": "unknown", "label": "Unknown" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub palette: Palette,
    pub year_range: YearRange,
    pub top_n: TopN,
    /// Applies to price buckets, where non-positive answers mean "no answer".
    pub unplaced_values: UnplacedPolicy,
}

/// Inclusive bounds for year-keyed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearRange {
    pub min: i64,
    pub max: i64,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 1980,
            max: 2020,
        }
    }
}

/// Truncation sizes for ranked series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopN {
    pub systems: usize,
    pub genres: usize,
    pub genre_satisfaction: usize,
    pub publishers: usize,
    pub platforms: usize,
    pub game_genres: usize,
    pub locations: usize,
    pub games: usize,
    pub cross_tab_groups: usize,
    pub cross_tab_members: usize,
}

impl Default for TopN {
    fn default() -> Self {
        Self {
            systems: 10,
            genres: 10,
            genre_satisfaction: 10,
            publishers: 10,
            platforms: 10,
            game_genres: 10,
            locations: 10,
            games: 10,
            cross_tab_groups: 5,
            cross_tab_members: 3,
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path))?;
        debug!(path, "Loaded dashboard config");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"year_range": {{"max": 2016}}, "top_n": {{"systems": 3}}}}"#
        )
        .unwrap();

        let config = DashboardConfig::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.year_range, YearRange { min: 1980, max: 2016 });
        assert_eq!(config.top_n.systems, 3);
        assert_eq!(config.top_n.cross_tab_members, 3);
        assert_eq!(config.palette, Palette::default());
        assert_eq!(config.unplaced_values, UnplacedPolicy::Drop);
    }

    #[test]
    fn test_unknown_policy_from_json() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{"unplaced_values": {"policy": "unknown", "label": "No answer"}}"#,
        )
        .unwrap();

        assert_eq!(config.unplaced_values, UnplacedPolicy::unknown("No answer"));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(DashboardConfig::load("/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let config = DashboardConfig::load_or_default(None).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
