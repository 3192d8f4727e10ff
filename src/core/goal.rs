//! Progress of the running profit towards the stored goal.

use crate::core::error::{Result, positive};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Between 0 and 100.
    pub percent: f64,
    pub achieved: bool,
    /// Profit still missing, zero once achieved.
    pub remaining: f64,
}

/// Losses count as no progress and anything beyond the goal counts as 100%.
/// A goal that is not a positive amount is rejected.
pub fn progress(current_profit: f64, goal: f64) -> Result<GoalProgress> {
    let goal = positive("goal", goal)?;
    let percent = (current_profit.max(0.0) / goal * 100.0).min(100.0);

    Ok(GoalProgress {
        percent,
        achieved: current_profit >= goal,
        remaining: (goal - current_profit).max(0.0),
    })
}
