pub mod history;
pub mod motivation;
pub mod scoring;

pub use history::{HistoryEntry, TeamHistory, LOOKBACK};
pub use motivation::MatchupScores;
