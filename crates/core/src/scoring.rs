//! Scoring module - line-clear tiers, level multiplier and the fall bonus
//!
//! A lock that clears `rows` rows at `level` earns
//! `LINE_SCORES[rows - 1] + level * (10 + 10 * rows)`.
//! Each piece also carries a fall bonus that starts at 20 and loses a tenth of
//! its value (integer division) for every second the piece stays in play.

use fallblock_types::{
    BASE_FALL_MS, FALL_BONUS_DECAY_MS, FALL_BONUS_START, FALL_INTERVAL_FLOOR_MS,
    LINES_PER_LEVEL, LINE_SCORES,
};

/// Points for a single lock clearing `rows` rows at `level`.
/// Counts above 4 use the 4-row tier with the real count in the multiplier.
pub fn line_clear_points(rows: u32, level: u32) -> u32 {
    if rows == 0 {
        return 0;
    }
    let tier = LINE_SCORES[(rows.min(4) - 1) as usize];
    tier.saturating_add(level.saturating_mul(10 + 10 * rows))
}

/// Gravity interval in milliseconds for a level
pub fn fall_interval_ms(level: u32) -> u32 {
    let interval = if level < 10 {
        BASE_FALL_MS - 100 * level
    } else {
        100u32.saturating_sub(10u32.saturating_mul(level - 10))
    };
    interval.max(FALL_INTERVAL_FLOOR_MS)
}

/// Level derived from lines cleared.
///
/// A default start always follows `starting + lines / 10`; a chosen start
/// only moves once that value exceeds the starting level. `current` is
/// returned when nothing applies.
pub fn compute_level(starting: u32, lines: u32, is_default_start: bool, current: u32) -> u32 {
    let computed = starting.saturating_add(lines / LINES_PER_LEVEL);
    if is_default_start || computed > starting {
        computed
    } else {
        current
    }
}

/// Accumulated score plus the transient rows-cleared count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTracker {
    total: u32,
    pending_rows: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn pending_rows(&self) -> u32 {
        self.pending_rows
    }

    /// Record rows cleared by the current action
    pub fn record_rows(&mut self, rows: u32) {
        self.pending_rows = self.pending_rows.saturating_add(rows);
    }

    /// Score pending rows once and reset the count.
    /// Returns `(rows, points)`; `(0, 0)` when nothing was pending.
    pub fn consume(&mut self, level: u32) -> (u32, u32) {
        let rows = std::mem::take(&mut self.pending_rows);
        let points = line_clear_points(rows, level);
        self.total = self.total.saturating_add(points);
        (rows, points)
    }

    pub fn add(&mut self, points: u32) {
        self.total = self.total.saturating_add(points);
    }

    /// Overwrite the total (debug override)
    pub fn set_total(&mut self, total: u32) {
        self.total = total;
    }
}

/// Per-piece decaying bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallBonus {
    value: u32,
    timer_ms: u32,
}

impl FallBonus {
    pub fn new() -> Self {
        Self {
            value: FALL_BONUS_START,
            timer_ms: 0,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn timer_ms(&self) -> u32 {
        self.timer_ms
    }

    /// Advance the decay clock by one tick
    pub fn tick(&mut self, elapsed_ms: u32) {
        if self.timer_ms < FALL_BONUS_DECAY_MS {
            self.timer_ms = self.timer_ms.saturating_add(elapsed_ms);
        } else {
            self.timer_ms = 0;
            self.value -= self.value / 10;
        }
    }

    /// Restore the starting value for a new piece
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for FallBonus {
    fn default() -> Self {
        Self::new()
    }
}
