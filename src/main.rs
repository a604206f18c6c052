//! CLI entry point for the ZHVI rent mapper.
//!
//! Reads a wide-format metro home value table, derives a current value and
//! trend per metro, converts home values to monthly rent estimates, renames
//! metros into the application's city vocabulary, and writes the city-keyed
//! JSON dataset.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use zhvi_rent_mapper::{
    estimate::extract_estimates, naming::CityMapping, output::write_records, table::MetroTable,
};

#[derive(Parser)]
#[command(name = "zhvi_rent_mapper")]
#[command(about = "Derives per-city rent estimates from a ZHVI metro table", long_about = None)]
struct Cli {
    /// Source ZHVI CSV table
    #[arg(
        value_name = "CSV",
        default_value = "Metro_zhvi_uc_sfrcondo_tier_0.33_0.67_sm_sa_month.csv"
    )]
    input: PathBuf,

    /// JSON file mapping metro names to city names
    #[arg(short, long, default_value = "data/city_mapping.json")]
    mapping: PathBuf,

    /// JSON artifact to write the city records to
    #[arg(short, long, default_value = "data/sources/zillow_data.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/zhvi_rent_mapper.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("zhvi_rent_mapper.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let table = MetroTable::load(&cli.input)?;
    let reference = table.periods.first().map(|p| p.date);
    info!(
        rows = table.rows.len(),
        periods = table.periods.len(),
        reference = ?reference,
        "source table parsed"
    );

    let estimates = extract_estimates(&table);
    info!(metros = estimates.len(), "metro estimates derived");

    let mapping = CityMapping::load(&cli.mapping)?;
    let records = mapping.apply(&estimates);
    info!(
        cities = records.len(),
        mapped = mapping.mapped_len(),
        "metros matched to cities"
    );

    write_records(&cli.output, &records)?;
    info!(path = %cli.output.display(), "artifact written");

    for record in records.values().take(5) {
        info!(
            city = %record.city_name,
            rent = record.estimate.rent_estimate,
            trend = %record.estimate.trend,
            "sample"
        );
    }

    Ok(())
}
