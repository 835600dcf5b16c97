//! CLI entry point for the dashboard series builder.
//!
//! Provides one subcommand per dashboard, each turning a static CSV or JSON
//! dataset into chart-ready series, plus a generic category count.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use dashboard_series::{
    aggregators::{SortOrder, count_occurrences},
    config::DashboardConfig,
    dashboard::{LoadState, load},
    datasets::{Dashboard, GameSale, ShoppingRecord, SurveyResponse},
    error::LoadError,
    fetch::{BasicClient, load_source},
    output::{OutputFormat, ReportEnvelope, emit},
    parser::{Format, parse},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "dashboard_series")]
#[command(about = "Builds chart series from static survey and sales datasets", long_about = None)]
struct Cli {
    /// JSON config file; falls back to DASHBOARD_CONFIG, then to defaults
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReportArgs {
    /// Path to file or URL to fetch
    #[arg(value_name = "FILE_OR_URL")]
    source: String,

    /// File to write the report to (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// JSON report, or one CSV row per chart point
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Tabletop roleplaying sentiment survey
    Survey(ReportArgs),
    /// Customer shopping trends
    Shopping(ReportArgs),
    /// Video game sales
    Games(ReportArgs),
    /// Count the distinct values of any column
    Count {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Column header, matched exactly
        #[arg(short, long)]
        field: String,

        /// Sort alphabetically instead of by count
        #[arg(long, default_value_t = false)]
        by_name: bool,

        /// Keep only the first N entries
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/dashboard_series.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("dashboard_series.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| std::env::var("DASHBOARD_CONFIG").ok());
    let config = DashboardConfig::load_or_default(config_path.as_deref())?;

    match cli.command {
        Commands::Survey(args) => run::<SurveyResponse>(&args, &config).await?,
        Commands::Shopping(args) => run::<ShoppingRecord>(&args, &config).await?,
        Commands::Games(args) => run::<GameSale>(&args, &config).await?,
        Commands::Count {
            source,
            field,
            by_name,
            top,
        } => count(&source, &field, by_name, top).await?,
    }

    Ok(())
}

/// Loads a dataset and writes the report of dashboard `D`.
#[tracing::instrument(skip(args, config), fields(dashboard = D::NAME, source = %args.source))]
async fn run<D: Dashboard>(args: &ReportArgs, config: &DashboardConfig) -> Result<()> {
    let client = BasicClient::new();

    let dataset = match load::<D, _>(&client, &args.source).await {
        LoadState::Ready(dataset) => dataset,
        LoadState::Empty => {
            warn!("No data: every row was filtered out during normalization");
            return Ok(());
        }
        LoadState::Failed(e) => {
            return Err(e).with_context(|| format!("failed to load {}", args.source));
        }
        LoadState::Loading => bail!("load of {} did not complete", args.source),
    };

    info!(records = dataset.len(), "Dataset loaded");

    let report = D::build_report(dataset.rows(), config);
    let charts = D::charts(&report, &config.palette);
    let envelope = ReportEnvelope::new(D::NAME, &args.source, dataset.len(), &report, charts);

    emit(&envelope, args.format, args.output.as_deref())
}

/// Counts one raw column without normalizing into a dashboard record.
#[tracing::instrument(skip(by_name, top))]
async fn count(source: &str, field: &str, by_name: bool, top: Option<usize>) -> Result<()> {
    let bytes = load_source(&BasicClient::new(), source)
        .await
        .with_context(|| format!("failed to load {}", source))?;
    let outcome = parse(&String::from_utf8_lossy(&bytes), Format::detect(source));

    if !outcome.errors.is_empty() {
        if outcome.data.is_empty() {
            return Err(LoadError::Parse(outcome.error_summary()).into());
        }
        warn!(errors = outcome.errors.len(), details = %outcome.error_summary(), "Parse errors in dataset");
    }

    if !outcome.data.iter().any(|row| row.get(field).is_some()) {
        warn!("Column not present in any row");
    }

    let values: Vec<String> = outcome.data.iter().map(|row| row.category(field)).collect();
    let order = if by_name {
        SortOrder::ByName
    } else {
        SortOrder::ByValue
    };

    let mut counts = count_occurrences(&values, |v| v.as_str(), order);
    if let Some(n) = top {
        counts.truncate(n);
    }

    if counts.is_empty() {
        warn!("No data: no row has a value in this column");
        return Ok(());
    }

    info!(categories = counts.len(), rows = values.len(), "Counted column");
    println!("{}", serde_json::to_string_pretty(&counts)?);
    Ok(())
}
