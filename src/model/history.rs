use std::collections::VecDeque;

/// Number of completed games a team needs before it can be scored.
pub const LOOKBACK: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

/// One completed game from a team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub outcome: Outcome,
    /// Own goals minus opponent goals
    pub differential: i32,
}

impl HistoryEntry {
    /// Build the entry for a side that scored `own` against `opp`.
    ///
    /// A drawn score is recorded as a loss: only a strictly higher score wins.
    pub fn from_score(own: u32, opp: u32) -> Self {
        let outcome = if own > opp {
            Outcome::Win
        } else {
            Outcome::Loss
        };
        HistoryEntry {
            outcome,
            differential: own as i32 - opp as i32,
        }
    }

    fn is_one_goal(&self) -> bool {
        self.differential.abs() == 1
    }
}

/// Rolling window of a team's last [`LOOKBACK`] results, oldest first.
#[derive(Debug, Clone, Default)]
pub struct TeamHistory {
    entries: VecDeque<HistoryEntry>,
}

impl TeamHistory {
    /// Copy of the current window in chronological order.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().copied().collect()
    }

    /// Record a completed game, evicting the oldest entry once the window is full.
    pub fn append(&mut self, outcome: Outcome, differential: i32) {
        if self.entries.len() == LOOKBACK {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            outcome,
            differential,
        });
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.append(entry.outcome, entry.differential);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= LOOKBACK
    }
}

/// Counts read off a window snapshot. Always recomputed from the entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowStats {
    /// Trailing losses counted back from the most recent game
    pub consecutive_losses: u32,
    pub one_goal_losses: u32,
    pub one_goal_wins: u32,
    pub losses: u32,
}

impl WindowStats {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let consecutive_losses = entries
            .iter()
            .rev()
            .take_while(|e| e.outcome == Outcome::Loss)
            .count() as u32;
        let mut stats = WindowStats {
            consecutive_losses,
            ..Default::default()
        };
        for e in entries {
            match e.outcome {
                Outcome::Loss => {
                    stats.losses += 1;
                    if e.is_one_goal() {
                        stats.one_goal_losses += 1;
                    }
                }
                Outcome::Win => {
                    if e.is_one_goal() {
                        stats.one_goal_wins += 1;
                    }
                }
            }
        }
        stats
    }
}
