use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::models::GameRecord;
use super::source::MatchSource;

/// Match source backed by a JSON file holding an array of game records.
pub struct JsonFileSource {
    path: PathBuf,
    label: String,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = format!("json:{}", path.display());
        JsonFileSource { path, label }
    }
}

impl MatchSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch_records(&self) -> Result<Vec<GameRecord>> {
        debug!("Reading game records from {}", self.path.display());
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        parse_records(&raw).with_context(|| format!("Invalid game records in {}", self.path.display()))
    }
}

fn parse_records(raw: &str) -> Result<Vec<GameRecord>> {
    let records: Vec<GameRecord> = serde_json::from_str(raw)?;
    Ok(records)
}
