use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::data::models::{MatchResult, Side};
use crate::model::{HistoryEntry, MatchupScores, TeamHistory};

use super::bins::{BinAccumulator, BinRange};
use super::report::Report;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BacktestError {
    #[error("match #{index} dated {date} arrives after a match dated {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },
}

/// Everything a single backtest run accumulates.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub histories: HashMap<String, TeamHistory>,
    /// Keyed by the picked side's own percentage
    pub level: BinAccumulator,
    /// Keyed by |away - boosted home|
    pub diff: BinAccumulator,
    pub skipped: u64,
    pub ties: u64,
    pub picks: u64,
    pub correct: u64,
    pub processed: u64,
}

impl RunState {
    fn history_mut(&mut self, team: &str) -> &mut TeamHistory {
        self.histories.entry(team.to_string()).or_default()
    }

    fn snapshot(&mut self, team: &str) -> Vec<HistoryEntry> {
        self.history_mut(team).snapshot()
    }

    fn record_result(&mut self, m: &MatchResult) {
        let home = HistoryEntry::from_score(m.home_score, m.away_score);
        let away = HistoryEntry::from_score(m.away_score, m.home_score);
        self.history_mut(&m.home).push(home);
        self.history_mut(&m.away).push(away);
    }
}

/// A scored pick for one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub side: Side,
    /// Picked side's final percentage (home includes its adjustment)
    pub pct: f64,
    pub diff_pct: f64,
    pub correct: bool,
    pub level_bin: BinRange,
    pub diff_bin: BinRange,
}

/// How a single match was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchDecision {
    /// One side had fewer than a full window of prior games
    Skipped,
    Tie { pct: f64 },
    Picked(Pick),
}

/// Sequential backtest over a date-ordered stream of results.
#[derive(Debug, Default)]
pub struct BacktestEngine {
    state: RunState,
    last_date: Option<NaiveDate>,
}

impl BacktestEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Resolve one match and then fold its result into both teams' windows.
    ///
    /// A match dated before the previous one is rejected and leaves the state
    /// unchanged.
    pub fn process(&mut self, m: &MatchResult) -> Result<MatchDecision, BacktestError> {
        if let Some(previous) = self.last_date {
            if m.date < previous {
                return Err(BacktestError::OutOfOrder {
                    index: self.state.processed as usize,
                    previous,
                    date: m.date,
                });
            }
        }
        self.last_date = Some(m.date);

        let away_prev = self.state.snapshot(&m.away);
        let home_prev = self.state.snapshot(&m.home);

        let decision = if !self.state.histories[&m.away].is_full()
            || !self.state.histories[&m.home].is_full()
        {
            self.state.skipped += 1;
            MatchDecision::Skipped
        } else {
            let scores = MatchupScores::compute(&away_prev, &home_prev);
            if scores.away == scores.home {
                self.state.ties += 1;
                MatchDecision::Tie { pct: scores.away }
            } else {
                MatchDecision::Picked(self.score_pick(m, &scores))
            }
        };

        self.state.record_result(m);
        self.state.processed += 1;
        Ok(decision)
    }

    fn score_pick(&mut self, m: &MatchResult, scores: &MatchupScores) -> Pick {
        let (side, pct) = if scores.away > scores.home {
            (Side::Away, scores.away)
        } else {
            (Side::Home, scores.home)
        };
        let diff_pct = scores.diff();
        let correct = side == m.winner();

        self.state.picks += 1;
        if correct {
            self.state.correct += 1;
        }
        let level_bin = self.state.level.record(pct, correct);
        let diff_bin = self.state.diff.record(diff_pct, correct);

        Pick {
            side,
            pct,
            diff_pct,
            correct,
            level_bin,
            diff_bin,
        }
    }

    /// Feed every match in order, stopping at the first ordering violation.
    pub fn run<'a, I>(&mut self, matches: I) -> Result<(), BacktestError>
    where
        I: IntoIterator<Item = &'a MatchResult>,
    {
        for m in matches {
            match self.process(m)? {
                MatchDecision::Skipped => {}
                MatchDecision::Tie { pct } => {
                    debug!("{} {} @ {}: tie at {:.1}%, no pick", m.date, m.away, m.home, pct);
                }
                MatchDecision::Picked(pick) => {
                    debug!(
                        "{} {} @ {}: {:?} at {:.1}% (gap {:.1}%, bins {}/{}) -> {}",
                        m.date,
                        m.away,
                        m.home,
                        pick.side,
                        pick.pct,
                        pick.diff_pct,
                        pick.level_bin.label(),
                        pick.diff_bin.label(),
                        if pick.correct { "hit" } else { "miss" }
                    );
                }
            }
        }
        Ok(())
    }

    /// Close the run and build its report. The run state is dropped here.
    pub fn finish(self) -> Report {
        let state = self.state;
        info!(
            "Backtest finished: {} matches, {} picks ({} correct), {} skipped, {} ties, {} teams",
            state.processed,
            state.picks,
            state.correct,
            state.skipped,
            state.ties,
            state.histories.len()
        );
        Report::from_state(&state)
    }
}

/// Run a full backtest over `matches` and return its report.
pub fn backtest(matches: &[MatchResult]) -> Result<Report, BacktestError> {
    let mut engine = BacktestEngine::new();
    engine.run(matches)?;
    Ok(engine.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::history::Outcome;
    use crate::model::LOOKBACK;
    use crate::backtest::bins::BinCounts;
    use approx::assert_relative_eq;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 1).unwrap() + chrono::Duration::days(n as i64)
    }

    fn game(n: u32, away: &str, home: &str, away_score: u32, home_score: u32) -> MatchResult {
        MatchResult {
            date: day(n),
            away: away.into(),
            home: home.into(),
            away_score,
            home_score,
        }
    }

    /// Engine whose histories are preset, bypassing the warm-up games.
    fn engine_with(histories: &[(&str, &[(u32, u32)])]) -> BacktestEngine {
        let mut engine = BacktestEngine::new();
        for (team, results) in histories {
            let h = engine.state.history_mut(team);
            for &(own, opp) in results.iter() {
                h.push(HistoryEntry::from_score(own, opp));
            }
        }
        engine
    }

    /// Small league where every team plays every other team at home and away.
    fn round_robin(teams: &[&str], rounds: u32) -> Vec<MatchResult> {
        let mut out = Vec::new();
        let mut n = 0;
        for r in 0..rounds {
            for (i, home) in teams.iter().enumerate() {
                for (j, away) in teams.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let seed = (r as usize * 7 + i * 3 + j * 5) % 6;
                    let (a, h) = match seed {
                        0 => (1, 2),
                        1 => (3, 2),
                        2 => (0, 4),
                        3 => (2, 2),
                        4 => (5, 1),
                        _ => (1, 3),
                    };
                    out.push(game(n / 3, away, home, a, h));
                    n += 1;
                }
            }
        }
        out
    }

    #[test]
    fn test_first_games_are_skipped_but_recorded() {
        let mut engine = BacktestEngine::new();
        for n in 0..5 {
            let d = engine.process(&game(n, "A", "B", 2, 1)).unwrap();
            assert_eq!(d, MatchDecision::Skipped);
        }
        let s = engine.state();
        assert_eq!(s.skipped, 5);
        assert_eq!(s.picks, 0);
        assert_eq!(s.level.total(), 0);
        assert_eq!(s.diff.total(), 0);
        assert_eq!(s.histories["A"].len(), 5);
        assert_eq!(s.histories["B"].len(), 5);
    }

    #[test]
    fn test_skip_when_only_one_side_is_new() {
        let full: &[(u32, u32)] = &[(3, 2); LOOKBACK];
        let mut engine = engine_with(&[("A", full)]);
        let d = engine.process(&game(0, "A", "Fresh", 1, 0)).unwrap();
        assert_eq!(d, MatchDecision::Skipped);
        assert_eq!(engine.state().histories["Fresh"].len(), 1);
        assert_eq!(engine.state().histories["A"].len(), LOOKBACK);
    }

    #[test]
    fn test_home_pick_against_boosted_home() {
        // Away raw 24.0; home raw 20.0 boosted to 22.2 -> away picked.
        let losing: &[(u32, u32)] = &[(1, 2); LOOKBACK];
        let winning: &[(u32, u32)] = &[(3, 2); LOOKBACK];
        let mut engine = engine_with(&[("Away", losing), ("Home", winning)]);
        let d = engine.process(&game(0, "Away", "Home", 1, 4)).unwrap();
        match d {
            MatchDecision::Picked(p) => {
                assert_eq!(p.side, Side::Away);
                assert_relative_eq!(p.pct, 24.0);
                assert_relative_eq!(p.diff_pct, 1.8, epsilon = 1e-9);
                assert!(!p.correct);
                assert_eq!(p.level_bin, BinRange { lo: 20, hi: 29 });
                assert_eq!(p.diff_bin, BinRange { lo: 0, hi: 9 });
            }
            other => panic!("Expected a pick, got {:?}", other),
        }
        let s = engine.state();
        assert_eq!((s.picks, s.correct), (1, 0));
        assert_eq!(s.level.get(BinRange { lo: 20, hi: 29 }).total, 1);
        assert_eq!(s.diff.get(BinRange { lo: 0, hi: 9 }).successes, 0);
    }

    #[test]
    fn test_home_adjustment_flips_the_pick() {
        // Away raw 26.0 beats home raw 24.0, but the home bonus lifts it to 26.2.
        let away: &[(u32, u32)] = &[(4, 1); LOOKBACK];
        let home: &[(u32, u32)] = &[(2, 1), (2, 1), (1, 2), (0, 3), (2, 1), (0, 3)];
        let mut engine = engine_with(&[("Away", away), ("Home", home)]);
        let d = engine.process(&game(0, "Away", "Home", 2, 3)).unwrap();
        match d {
            MatchDecision::Picked(p) => {
                assert_eq!(p.side, Side::Home);
                assert_relative_eq!(p.pct, 26.2, epsilon = 1e-9);
                assert_relative_eq!(p.diff_pct, 0.2, epsilon = 1e-9);
                assert!(p.correct);
                assert_eq!(p.level_bin, BinRange { lo: 20, hi: 29 });
                assert_eq!(p.diff_bin, BinRange { lo: 0, hi: 9 });
            }
            other => panic!("Expected a pick, got {:?}", other),
        }
        let s = engine.state();
        assert_eq!((s.picks, s.correct), (1, 1));
        assert_eq!(s.diff.get(BinRange { lo: 0, hi: 9 }).successes, 1);
    }

    #[test]
    fn test_diff_between_ranges_lands_in_lowest_bin() {
        // Away raw 42.0 against home raw 20.0 boosted to 22.2: gap 19.8.
        let away: &[(u32, u32)] = &[(4, 1), (4, 1), (4, 1), (4, 1), (1, 2), (1, 2)];
        let home: &[(u32, u32)] = &[(4, 1), (4, 1), (2, 1), (2, 1), (1, 2), (0, 3)];
        let mut engine = engine_with(&[("Away", away), ("Home", home)]);
        let d = engine.process(&game(0, "Away", "Home", 3, 1)).unwrap();
        match d {
            MatchDecision::Picked(p) => {
                assert_eq!(p.side, Side::Away);
                assert_relative_eq!(p.pct, 42.0);
                assert_relative_eq!(p.diff_pct, 19.8, epsilon = 1e-9);
                assert!(p.correct);
                assert_eq!(p.level_bin, BinRange { lo: 40, hi: 49 });
                assert_eq!(p.diff_bin, BinRange { lo: 0, hi: 9 });
            }
            other => panic!("Expected a pick, got {:?}", other),
        }
        let s = engine.state();
        assert_eq!(s.diff.get(BinRange { lo: 0, hi: 9 }), BinCounts { total: 1, successes: 1 });
        assert_eq!(s.diff.get(BinRange { lo: 10, hi: 19 }).total, 0);
    }

    #[test]
    fn test_exact_tie_counts_as_neither() {
        // Both sides score 72.0 and the 70-79 band carries no home bonus.
        let away: &[(u32, u32)] = &[(4, 1), (4, 1), (2, 1), (1, 2), (1, 2), (1, 2)];
        let home: &[(u32, u32)] = &[(2, 1), (1, 2), (2, 1), (1, 2), (0, 3), (0, 3)];
        let mut engine = engine_with(&[("Away", away), ("Home", home)]);
        let d = engine.process(&game(0, "Away", "Home", 0, 1)).unwrap();
        match d {
            MatchDecision::Tie { pct } => assert_relative_eq!(pct, 72.0),
            other => panic!("Expected a tie, got {:?}", other),
        }
        let s = engine.state();
        assert_eq!(s.ties, 1);
        assert_eq!(s.skipped, 0);
        assert_eq!(s.picks, 0);
        assert_eq!(s.level.total(), 0);
        assert_eq!(
            s.histories["Away"].snapshot().last().map(|e| e.outcome),
            Some(Outcome::Loss)
        );
        assert_eq!(
            s.histories["Home"].snapshot().last().map(|e| e.differential),
            Some(1)
        );
    }

    #[test]
    fn test_scoring_uses_pre_match_window() {
        let losing: &[(u32, u32)] = &[(1, 2); LOOKBACK];
        let winning: &[(u32, u32)] = &[(3, 2); LOOKBACK];
        let mut engine = engine_with(&[("Away", losing), ("Home", winning)]);
        let first = engine.process(&game(0, "Away", "Home", 5, 0)).unwrap();
        let MatchDecision::Picked(first) = first else {
            panic!("expected a pick");
        };
        assert_relative_eq!(first.pct, 24.0);
        // Away's streak is now broken by the 5-0 win.
        let away_last = engine.state().histories["Away"].snapshot();
        assert_eq!(away_last.last().map(|e| e.differential), Some(5));
        assert_eq!(away_last.len(), LOOKBACK);
    }

    #[test]
    fn test_out_of_order_is_rejected_without_mutation() {
        let mut engine = BacktestEngine::new();
        engine.process(&game(3, "A", "B", 1, 0)).unwrap();
        let err = engine.process(&game(2, "B", "A", 1, 0)).unwrap_err();
        assert_eq!(
            err,
            BacktestError::OutOfOrder {
                index: 1,
                previous: day(3),
                date: day(2),
            }
        );
        assert_eq!(engine.state().processed, 1);
        assert_eq!(engine.state().histories["A"].len(), 1);
        // Same-day games are fine.
        assert!(engine.process(&game(3, "C", "D", 1, 0)).is_ok());
    }

    #[test]
    fn test_empty_run() {
        let report = backtest(&[]).unwrap();
        assert_eq!(report.picks, 0);
        assert!(report.accuracy.is_none());
        assert!(report.level.iter().all(|b| b.win_rate.is_none()));
        assert!(report.diff.iter().all(|b| b.win_rate.is_none()));
    }

    #[test]
    fn test_counters_partition_matches() {
        let matches = round_robin(&["A", "B", "C", "D"], 6);
        let mut engine = BacktestEngine::new();
        engine.run(&matches).unwrap();
        let s = engine.state();
        assert_eq!(s.processed, matches.len() as u64);
        assert_eq!(s.picks + s.ties + s.skipped, s.processed);
        assert_eq!(s.level.total(), s.picks);
        assert_eq!(s.diff.total(), s.picks);
        assert!(s.correct <= s.picks);
        assert!(s.picks > 0);
        for (_, c) in s.level.iter().chain(s.diff.iter()) {
            assert!(c.successes <= c.total);
        }
        for h in s.histories.values() {
            assert_eq!(h.len(), LOOKBACK);
        }
    }

    #[test]
    fn test_reruns_are_identical() {
        let matches = round_robin(&["A", "B", "C", "D", "E"], 4);
        let a = backtest(&matches).unwrap().to_string();
        let b = backtest(&matches).unwrap().to_string();
        assert_eq!(a, b);
    }
}
