//! Video game sales, in millions of units.

use serde::Serialize;

use crate::aggregators::{
    Field, KeyDomain, NamedValue, Normalize, OrdinalKey, SeriesResult, build_ordinal_series,
    sum_by, top_records, totals,
};
use crate::chart::{ChartData, ChartDataset, Palette, ToChart};
use crate::config::DashboardConfig;
use crate::datasets::Dashboard;
use crate::record::{RawRecord, RawValue};

pub const RANK: &str = "Rank";
pub const NAME: &str = "Name";
pub const PLATFORM: &str = "Platform";
pub const YEAR: &str = "Year";
pub const GENRE: &str = "Genre";
pub const PUBLISHER: &str = "Publisher";
pub const NA_SALES: &str = "NA_Sales";
pub const EU_SALES: &str = "EU_Sales";
pub const JP_SALES: &str = "JP_Sales";
pub const OTHER_SALES: &str = "Other_Sales";
pub const GLOBAL_SALES: &str = "Global_Sales";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSale {
    pub rank: i64,
    pub name: String,
    pub platform: String,
    pub year: i64,
    pub genre: String,
    pub publisher: String,
    pub na_sales: f64,
    pub eu_sales: f64,
    pub jp_sales: f64,
    pub other_sales: f64,
    pub global_sales: f64,
}

impl Normalize for GameSale {
    const IDENTITY_COLUMN: &'static str = NAME;

    fn from_raw(raw: &RawRecord) -> Self {
        Self {
            rank: raw.int_or(RANK, 0),
            name: raw.text_or(NAME, ""),
            platform: raw.category(PLATFORM),
            year: raw.int_or(YEAR, 0),
            genre: raw.category(GENRE),
            publisher: raw.category(PUBLISHER),
            na_sales: raw.float_or(NA_SALES, 0.0),
            eu_sales: raw.float_or(EU_SALES, 0.0),
            jp_sales: raw.float_or(JP_SALES, 0.0),
            other_sales: raw.float_or(OTHER_SALES, 0.0),
            global_sales: raw.float_or(GLOBAL_SALES, 0.0),
        }
    }

    fn identity(&self) -> &str {
        &self.name
    }

    /// Rank, year and global sales must all be numeric, otherwise the row
    /// is left out of every series.
    fn accepts(raw: &RawRecord) -> bool {
        let numeric = |column: &str| raw.get(column).and_then(RawValue::as_float).is_some();
        numeric(RANK)
            && numeric(GLOBAL_SALES)
            && raw.get(YEAR).and_then(RawValue::as_int).is_some()
    }
}

const GLOBAL: Field<GameSale> = Field::new(GLOBAL_SALES, |g: &GameSale| g.global_sales);

const REGIONAL: [Field<GameSale>; 4] = [
    Field::new(NA_SALES, |g: &GameSale| g.na_sales),
    Field::new(EU_SALES, |g: &GameSale| g.eu_sales),
    Field::new(JP_SALES, |g: &GameSale| g.jp_sales),
    Field::new(OTHER_SALES, |g: &GameSale| g.other_sales),
];

const YEARLY: [Field<GameSale>; 5] = [GLOBAL, REGIONAL[0], REGIONAL[1], REGIONAL[2], REGIONAL[3]];

const REGIONS: [Field<GameSale>; 4] = [
    Field::new("North America", REGIONAL[0].select),
    Field::new("Europe", REGIONAL[1].select),
    Field::new("Japan", REGIONAL[2].select),
    Field::new("Other Regions", REGIONAL[3].select),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamesReport {
    pub top_games: Vec<GameSale>,
    pub sales_by_platform: Vec<NamedValue>,
    pub top_publishers: Vec<NamedValue>,
    pub sales_by_genre: Vec<NamedValue>,
    pub yearly_sales: SeriesResult,
    pub regional_totals: Vec<NamedValue>,
}

impl Dashboard for GameSale {
    const NAME: &'static str = "games";

    type Report = GamesReport;

    fn build_report(records: &[Self], config: &DashboardConfig) -> GamesReport {
        let top_n = &config.top_n;

        let mut sales_by_platform = sum_by(records, |g| g.platform.as_str(), GLOBAL);
        sales_by_platform.truncate(top_n.platforms);

        let mut top_publishers = sum_by(records, |g| g.publisher.as_str(), GLOBAL);
        top_publishers.truncate(top_n.publishers);

        let mut sales_by_genre = sum_by(records, |g| g.genre.as_str(), GLOBAL);
        sales_by_genre.truncate(top_n.game_genres);

        GamesReport {
            top_games: top_records(records, GLOBAL, top_n.games)
                .into_iter()
                .cloned()
                .collect(),
            sales_by_platform,
            top_publishers,
            sales_by_genre,
            yearly_sales: build_ordinal_series(
                records,
                |g| OrdinalKey::Number(g.year),
                &KeyDomain::range(config.year_range.min, config.year_range.max),
                &YEARLY,
            ),
            regional_totals: totals(records, &REGIONS),
        }
    }

    fn charts(report: &GamesReport, palette: &Palette) -> Vec<(&'static str, ChartData)> {
        let top_games = ChartData {
            labels: report.top_games.iter().map(|g| g.name.clone()).collect(),
            datasets: vec![ChartDataset::new(
                GLOBAL_SALES,
                report.top_games.iter().map(|g| g.global_sales).collect(),
            )],
        };

        vec![
            ("Top Games", top_games),
            ("Sales by Platform", report.sales_by_platform.to_chart(GLOBAL_SALES)),
            ("Top Publishers", report.top_publishers.to_chart(GLOBAL_SALES)),
            ("Sales by Genre", report.sales_by_genre.to_chart(GLOBAL_SALES)),
            ("Sales by Year", report.yearly_sales.to_chart(GLOBAL_SALES)),
            ("Regional Sales", report.regional_totals.to_chart("Sales")),
        ]
        .into_iter()
        .map(|(title, chart)| (title, chart.with_palette(palette)))
        .collect()
    }
}
