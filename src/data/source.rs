use anyhow::Result;

use super::models::GameRecord;

/// Trait that every match-history source must implement.
pub trait MatchSource {
    /// All stored game rows, in whatever order the source keeps them.
    fn fetch_records(&self) -> Result<Vec<GameRecord>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
