use super::history::{HistoryEntry, WindowStats};
use super::scoring::{
    consecutive_loss_points, home_adjustment, one_goal_loss_points, one_goal_win_points,
    opp_total_loss_points, total_loss_points,
};

/// Fixed scale applied to the summed step points.
const POINTS_TO_PCT: f64 = 2.0;

/// Raw motivation percentage for the team whose window is `own`, facing the
/// team whose window is `opp`. Argument order matters: call once per side.
pub fn score(own: &[HistoryEntry], opp: &[HistoryEntry]) -> f64 {
    let own = WindowStats::from_entries(own);
    let opp = WindowStats::from_entries(opp);
    let points = consecutive_loss_points(own.consecutive_losses)
        + one_goal_loss_points(own.one_goal_losses)
        + one_goal_win_points(opp.one_goal_wins)
        + total_loss_points(own.losses)
        + opp_total_loss_points(opp.losses);
    points as f64 * POINTS_TO_PCT
}

/// Both sides' percentages for one matchup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchupScores {
    pub away: f64,
    /// Home raw plus its home adjustment. Comparisons always use this value.
    pub home: f64,
}

impl MatchupScores {
    pub fn compute(away: &[HistoryEntry], home: &[HistoryEntry]) -> Self {
        MatchupScores {
            away: score(away, home),
            home: final_home_pct(score(home, away)),
        }
    }

    /// Gap between away and boosted home.
    pub fn diff(&self) -> f64 {
        (self.away - self.home).abs()
    }
}

/// Home side's percentage after the home adjustment. The bonus depends only on
/// the home side's own raw value.
pub fn final_home_pct(home_raw: f64) -> f64 {
    home_raw + home_adjustment(home_raw)
}
