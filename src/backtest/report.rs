use serde::Serialize;
use std::fmt;

use crate::model::LOOKBACK;

use super::bins::BinAccumulator;
use super::engine::RunState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinLine {
    pub range: String,
    pub lo: u32,
    pub hi: u32,
    pub successes: u64,
    pub total: u64,
    /// Percent of successful picks, `None` for an empty bin
    pub win_rate: Option<f64>,
}

/// Final figures of a backtest run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub level: Vec<BinLine>,
    pub diff: Vec<BinLine>,
    pub picks: u64,
    pub correct: u64,
    pub accuracy: Option<f64>,
    pub skipped: u64,
    pub ties: u64,
    pub processed: u64,
}

fn bin_lines(acc: &BinAccumulator) -> Vec<BinLine> {
    acc.iter()
        .map(|(range, counts)| BinLine {
            range: range.label(),
            lo: range.lo,
            hi: range.hi,
            successes: counts.successes,
            total: counts.total,
            win_rate: counts.win_rate(),
        })
        .collect()
}

impl Report {
    pub fn from_state(state: &RunState) -> Self {
        let accuracy = if state.picks == 0 {
            None
        } else {
            Some(100.0 * state.correct as f64 / state.picks as f64)
        };
        Report {
            level: bin_lines(&state.level),
            diff: bin_lines(&state.diff),
            picks: state.picks,
            correct: state.correct,
            accuracy,
            skipped: state.skipped,
            ties: state.ties,
            processed: state.processed,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn write_bins(f: &mut fmt::Formatter<'_>, header: &str, lines: &[BinLine]) -> fmt::Result {
    writeln!(f, "{}", header)?;
    for line in lines {
        match line.win_rate {
            Some(rate) => writeln!(
                f,
                "{}% : {:.2}% ({}/{})",
                line.range, rate, line.successes, line.total
            )?,
            None => writeln!(f, "{}% : N/A (0/0)", line.range)?,
        }
    }
    writeln!(f)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bins(
            f,
            "Motivation Level Bins (picked team, home boost included)",
            &self.level,
        )?;
        write_bins(
            f,
            "Motivation Difference Bins (|away - boosted home|)",
            &self.diff,
        )?;
        match self.accuracy {
            Some(acc) => writeln!(
                f,
                "Overall Accuracy: {:.2}% ({}/{})",
                acc, self.correct, self.picks
            )?,
            None => writeln!(f, "Overall Accuracy: N/A (0 picks)")?,
        }
        writeln!(
            f,
            "Matchups skipped (insufficient {}-game history): {}",
            LOOKBACK, self.skipped
        )?;
        writeln!(f, "Matchups tied (no pick): {}", self.ties)?;
        writeln!(f, "Matchups processed: {}", self.processed)
    }
}
