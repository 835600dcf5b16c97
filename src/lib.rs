pub mod aggregators;
pub mod chart;
pub mod coerce;
pub mod config;
pub mod dashboard;
pub mod datasets;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod record;
