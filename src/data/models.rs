use chrono::NaiveDate;
use serde::Deserialize;

/// A completed game as handed to the backtest: names already normalised,
/// records already in date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub date: NaiveDate,
    pub away: String,
    pub home: String,
    pub away_score: u32,
    pub home_score: u32,
}

impl MatchResult {
    /// Side that actually won. A level score counts for the away side.
    pub fn winner(&self) -> Side {
        if self.home_score > self.away_score {
            Side::Home
        } else {
            Side::Away
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Away,
    Home,
}

/// Raw game row as stored by a match source, before filtering and name
/// normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameRecord {
    /// Season identified by the calendar year it ends in
    pub season: i32,
    pub date: NaiveDate,
    pub away: String,
    pub home: String,
    pub away_goals: u32,
    pub home_goals: u32,
    #[serde(default)]
    pub playoffs: bool,
}
