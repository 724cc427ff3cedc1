use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod backtest;
mod config;
mod data;
mod model;

use config::{Config, ReportFormat, SourceKind};
use data::{load_matches, JsonFileSource, MatchSource, SqliteSource, TeamNames};

fn main() -> Result<()> {
    // Initialise tracing / logging (stderr; stdout carries the report)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let source: Box<dyn MatchSource> = match config.source {
        SourceKind::Json => Box::new(JsonFileSource::new(&config.input)),
        SourceKind::Sqlite => Box::new(SqliteSource::open(&config.input)?),
    };
    let names = TeamNames::with_aliases(&config.aliases)?;
    let filter = config.season_filter();
    info!(
        "Backtesting {} (seasons {:?}..={:?}, playoffs {}, {} team aliases)",
        source.name(),
        filter.start_season,
        filter.end_season,
        if filter.include_playoffs { "included" } else { "excluded" },
        names.len()
    );

    let matches = load_matches(source.as_ref(), &filter, &names)?;
    info!("Loaded {} matches", matches.len());

    let report = backtest::engine::backtest(&matches)?;

    let rendered = match config.format {
        ReportFormat::Text => report.to_string(),
        ReportFormat::Json => report.to_json()?,
    };

    match &config.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path))?;
            info!("Report written to {}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
