//! Match supply for the backtest: reads stored game rows, keeps the wanted
//! seasons, normalises team names and hands back one chronological stream.

pub mod json;
pub mod models;
pub mod normalize;
pub mod source;
pub mod sqlite;

pub use json::JsonFileSource;
pub use models::{GameRecord, MatchResult};
pub use normalize::TeamNames;
pub use source::MatchSource;
pub use sqlite::SqliteSource;

use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

/// Which stored games take part in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeasonFilter {
    pub start_season: Option<i32>,
    pub end_season: Option<i32>,
    pub include_playoffs: bool,
}

impl SeasonFilter {
    pub fn accepts(&self, record: &GameRecord) -> bool {
        if record.playoffs && !self.include_playoffs {
            return false;
        }
        if self.start_season.is_some_and(|s| record.season < s) {
            return false;
        }
        if self.end_season.is_some_and(|e| record.season > e) {
            return false;
        }
        true
    }
}

/// Fetch, filter and order every game from `source`.
///
/// Seasons come out in ascending order, each season sorted by date with ties
/// kept in source order. Repeated (date, away, home) rows inside a season are
/// dropped. Nothing is reordered across seasons.
pub fn load_matches(
    source: &dyn MatchSource,
    filter: &SeasonFilter,
    names: &TeamNames,
) -> Result<Vec<MatchResult>> {
    let records = source.fetch_records()?;
    info!("Fetched {} game records from {}", records.len(), source.name());

    let mut seasons: BTreeMap<i32, Vec<MatchResult>> = BTreeMap::new();
    for record in records.into_iter().filter(|r| filter.accepts(r)) {
        seasons.entry(record.season).or_default().push(MatchResult {
            date: record.date,
            away: names.normalize(&record.away),
            home: names.normalize(&record.home),
            away_score: record.away_goals,
            home_score: record.home_goals,
        });
    }

    if let (Some(start), Some(end)) = (filter.start_season, filter.end_season) {
        for season in start..=end {
            if !seasons.contains_key(&season) {
                warn!("No games found for season {}", season);
            }
        }
    }

    let mut matches = Vec::new();
    for (season, mut games) in seasons {
        games.sort_by_key(|g| g.date);
        let before = games.len();
        let mut seen = HashSet::new();
        games.retain(|g| seen.insert((g.date, g.away.clone(), g.home.clone())));
        if games.len() < before {
            warn!(
                "Season {}: dropped {} duplicate game(s)",
                season,
                before - games.len()
            );
        }
        info!("Season {}: {} games", season, games.len());
        matches.extend(games);
    }
    Ok(matches)
}
