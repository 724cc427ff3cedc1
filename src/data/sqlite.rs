use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags, Row};

use super::models::GameRecord;
use super::source::MatchSource;

/// Match source reading the `games` table of a SQLite database.
pub struct SqliteSource {
    conn: Connection,
    label: String,
}

impl SqliteSource {
    /// Open an existing database read-only.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Failed to open SQLite database {}", path))?;
        Ok(Self::from_connection(conn, format!("sqlite:{}", path)))
    }

    pub fn from_connection(conn: Connection, label: String) -> Self {
        SqliteSource { conn, label }
    }
}

impl MatchSource for SqliteSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch_records(&self) -> Result<Vec<GameRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT season, date, away, home, away_goals, home_goals, playoffs
                 FROM games ORDER BY season, date, rowid",
            )
            .context("Failed to query games table")?;
        let records = stmt
            .query_map([], map_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<GameRecord> {
    let playoffs: Option<i64> = row.get(6)?;
    Ok(GameRecord {
        season: row.get(0)?,
        date: row.get::<_, NaiveDate>(1)?,
        away: row.get(2)?,
        home: row.get(3)?,
        away_goals: row.get(4)?,
        home_goals: row.get(5)?,
        playoffs: playoffs.unwrap_or(0) != 0,
    })
}
