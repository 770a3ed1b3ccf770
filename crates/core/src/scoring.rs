//! Scoring module - line clears, combos, drops and speed progression
//!
//! Rules:
//! - 1/2/3/4 rows cleared award 100/300/500/800 points times the level.
//! - A lock that clears at least one row while the combo counter is above 1
//!   adds `50 * combo * level`.
//! - Soft drop awards 1 point per row, hard drop 2 points per row.
//! - The level is `lines / 10 + 1`; gravity starts at 500ms per row and speeds
//!   up by 20ms per level down to 100ms.

use crate::types::{
    COMBO_POINTS, HARD_DROP_POINTS, INITIAL_DROP_MS, LINES_PER_LEVEL, LINE_SCORES, MIN_DROP_MS,
    SOFT_DROP_POINTS, SPEED_FACTOR_MS,
};

/// Points awarded for one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Base points for the rows cleared
    pub line_clear_score: u32,
    /// Combo bonus added on top of `line_clear_score`
    pub combo_bonus: u32,
    pub total: u32,
}

/// Base points for clearing `lines` rows at `level`
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    match lines {
        1..=4 => LINE_SCORES[lines as usize].saturating_mul(level),
        _ => 0,
    }
}

/// Combo bonus for a lock that cleared `lines` rows with the updated `combo` counter
pub fn combo_bonus(combo: u32, lines: u32, level: u32) -> u32 {
    if combo > 1 && lines > 0 {
        COMBO_POINTS.saturating_mul(combo).saturating_mul(level)
    } else {
        0
    }
}

/// Score a lock
///
/// `level` is the level in effect before the cleared rows are counted and
/// `combo` is the counter after this lock updated it.
pub fn score_lock(lines: u32, level: u32, combo: u32) -> ScoreResult {
    let line_clear_score = line_clear_points(lines, level);
    let combo_bonus = combo_bonus(combo, lines, level);
    ScoreResult {
        line_clear_score,
        combo_bonus,
        total: line_clear_score.saturating_add(combo_bonus),
    }
}

/// Calculate drop score
pub fn drop_points(cells: u32, is_hard_drop: bool) -> u32 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    cells.saturating_mul(per_cell)
}

/// Level for a running line total (starts at 1)
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval for a level (in milliseconds)
pub fn drop_interval_ms(level: u32) -> u32 {
    let speed_up = level.saturating_sub(1).saturating_mul(SPEED_FACTOR_MS);
    INITIAL_DROP_MS.saturating_sub(speed_up).max(MIN_DROP_MS)
}
