use clap::{Parser, ValueEnum};

use crate::data::normalize::parse_alias;
use crate::data::SeasonFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Backtest of the recent-form motivation heuristic
#[derive(Parser, Debug, Clone)]
#[command(name = "motivation-backtest", version, about)]
pub struct Config {
    /// Path of the stored match results
    #[arg(long, env = "MATCHES_PATH")]
    pub input: String,

    /// Storage format of the input
    #[arg(long, env = "MATCHES_SOURCE", value_enum, default_value = "json")]
    pub source: SourceKind,

    /// First season (by end year) to include
    #[arg(long, env = "START_SEASON")]
    pub start_season: Option<i32>,

    /// Last season (by end year) to include
    #[arg(long, env = "END_SEASON")]
    pub end_season: Option<i32>,

    /// Keep playoff games (regular season only by default)
    #[arg(long, env = "INCLUDE_PLAYOFFS", default_value = "false")]
    pub include_playoffs: bool,

    /// Extra team alias FROM=TO, repeatable
    #[arg(long = "alias", env = "TEAM_ALIASES", value_delimiter = ',')]
    pub aliases: Vec<String>,

    /// Report format
    #[arg(long, env = "REPORT_FORMAT", value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Write the report here instead of stdout
    #[arg(long, env = "REPORT_PATH")]
    pub output: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let (Some(start), Some(end)) = (self.start_season, self.end_season) {
            if start > end {
                anyhow::bail!("start_season ({}) must not be after end_season ({})", start, end);
            }
        }
        for alias in &self.aliases {
            parse_alias(alias)?;
        }
        if self.input.trim().is_empty() {
            anyhow::bail!("input path must not be empty");
        }
        Ok(())
    }

    pub fn season_filter(&self) -> SeasonFilter {
        SeasonFilter {
            start_season: self.start_season,
            end_season: self.end_season,
            include_playoffs: self.include_playoffs,
        }
    }
}
