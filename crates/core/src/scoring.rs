//! Scoring module - line-clear points and the level/speed curve
//!
//! - A lock that clears N rows scores `LINE_SCORES[N] * level` once, using the level in
//!   force before the clear.
//! - Level is `lines / lines_per_level + 1`, so it starts at 1 and only grows.
//! - Gravity speeds up by a fixed step per level and never drops below the floor.

use crate::config::GravityConfig;
use crate::types::LINE_SCORES;

/// Calculate line clear score
/// lines: number of lines cleared in one lock; more than 4 scores as a tetris
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    let base = LINE_SCORES[lines.min(LINE_SCORES.len() - 1)];
    base.saturating_mul(level)
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells * 2
    } else {
        cells
    }
}

/// Level for a running line total (1-based)
pub fn calculate_level(total_lines: u32, lines_per_level: u32) -> u32 {
    total_lines / lines_per_level.max(1) + 1
}

/// Gravity interval for a level (in milliseconds), clamped at the configured floor
pub fn get_drop_interval_ms(level: u32, gravity: &GravityConfig) -> u32 {
    let reduction = level
        .saturating_sub(1)
        .saturating_mul(gravity.interval_step_ms);
    gravity
        .base_interval_ms
        .saturating_sub(reduction)
        .max(gravity.min_interval_ms)
        .max(1)
}
