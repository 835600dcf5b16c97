//! The concrete dashboards: typed records plus the series each one shows.

pub mod games;
pub mod shopping;
pub mod survey;

use serde::Serialize;

use crate::aggregators::Normalize;
use crate::chart::{ChartData, Palette};
use crate::config::DashboardConfig;

pub use games::GameSale;
pub use shopping::ShoppingRecord;
pub use survey::SurveyResponse;

/// A dashboard over one dataset shape.
pub trait Dashboard: Normalize + Send + Sync + 'static {
    /// Name used on the command line and in output.
    const NAME: &'static str;

    type Report: Serialize;

    /// Computes every series the dashboard shows.
    fn build_report(records: &[Self], config: &DashboardConfig) -> Self::Report;

    /// Chart-ready projections of a report, keyed by chart title.
    fn charts(report: &Self::Report, palette: &Palette) -> Vec<(&'static str, ChartData)>;
}
