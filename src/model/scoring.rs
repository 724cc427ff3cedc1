//! Point tables for the motivation heuristic.
//!
//! Each step maps one small count taken from a six-game window to a fixed
//! number of points. The tables are plain lookups with no interpolation, and
//! their shapes are irregular on purpose (see `total_loss_points`).

/// Points for the current losing streak (most recent games, stopping at the
/// first win).
pub fn consecutive_loss_points(streak: u32) -> i32 {
    match streak {
        0 | 1 => 0,
        2 => 5,
        3 => 10,
        4 => 5,
        5 => -5,
        _ => -10,
    }
}

/// Points for own one-goal losses in the window.
pub fn one_goal_loss_points(count: u32) -> i32 {
    match count {
        0 => 0,
        1 => 5,
        2 => 8,
        _ => 10,
    }
}

/// Points for the opponent's one-goal wins in the window. Same table as
/// [`one_goal_loss_points`].
pub fn one_goal_win_points(opp_count: u32) -> i32 {
    one_goal_loss_points(opp_count)
}

/// Points for own total losses in the window.
///
/// Drops back to zero at six losses; that cliff is part of the heuristic.
pub fn total_loss_points(losses: u32) -> i32 {
    match losses {
        0..=2 => 0,
        3 => 5,
        4 | 5 => 10,
        _ => 0,
    }
}

/// Points for the opponent's total losses in the window.
pub fn opp_total_loss_points(opp_losses: u32) -> i32 {
    match opp_losses {
        0 => 2,
        1 | 2 => 0,
        3 | 4 => 3,
        5 => 8,
        _ => 10,
    }
}

// ── Home adjustment ──────────────────────────────────────────────────────────

/// Bonus bands keyed on the home side's raw percentage: (lo, hi, bonus).
const HOME_BANDS: [(f64, f64, f64); 8] = [
    (70.0, 79.0, 0.0),
    (60.0, 69.0, 5.0),
    (50.0, 59.0, 4.2),
    (40.0, 49.0, 4.3),
    (30.0, 39.0, 3.0),
    (20.0, 29.0, 2.2),
    (10.0, 19.0, 1.8),
    (0.0, 9.0, 2.1),
];

/// Additive bonus for the home side, looked up on its own raw percentage.
///
/// Bands have integer bounds. A value outside every band (above 79,
/// negative, or between two bands such as 69.5) gets no bonus.
pub fn home_adjustment(raw_home_pct: f64) -> f64 {
    HOME_BANDS
        .iter()
        .find(|(lo, hi, _)| *lo <= raw_home_pct && raw_home_pct <= *hi)
        .map(|(_, _, bonus)| *bonus)
        .unwrap_or(0.0)
}
