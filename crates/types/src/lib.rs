//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the simulation core, the input
//! layer and the terminal presentation alike.
//!
//! # Grid Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Visible height**: 20 rows (indexed 0-19, bottom to top)
//! - **Ceiling**: row 20; anything at or above it is the invisible spawn buffer
//! - **Spawn anchor**: (5, 20)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep of the interactive runner (~60 FPS) |
//! | `REPEAT_WAIT_MS` | 200 | Pause after the immediate move before auto-repeat |
//! | `HORIZONTAL_REPEAT_MS` | 100 | Auto-repeat interval for left/right |
//! | `SOFT_DROP_REPEAT_MS` | 50 | Auto-repeat interval for soft drop |
//! | `FALL_BONUS_DECAY_MS` | 1000 | Fall bonus decay period |
//!
//! # Fall Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0 | 1000ms |
//! | 1..=9 | 1000 - 100 * level |
//! | 10..=14 | 100 - 10 * (level - 10) |
//! | 15+ | 50ms floor |
//!
//! # Examples
//!
//! ```
//! use fallblock_types::{Orientation, PieceKind, GRID_WIDTH, VISIBLE_HEIGHT};
//!
//! let kind = PieceKind::from_str("t").unwrap();
//! assert_eq!(kind, PieceKind::T);
//!
//! assert_eq!(Orientation::Deg0.rotate_ccw(), Orientation::Deg90);
//! assert_eq!(GRID_WIDTH, 10);
//! assert_eq!(VISIBLE_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Grid width in cells (10 columns)
pub const GRID_WIDTH: u8 = 10;

/// Visible grid height in cells (20 rows). Also the ceiling row index.
pub const VISIBLE_HEIGHT: u8 = 20;

/// Anchor (column, row) every new piece spawns at.
pub const SPAWN_ANCHOR: (i8, i8) = (5, 20);

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay after the immediate move before a held direction starts repeating.
pub const REPEAT_WAIT_MS: u32 = 200;

/// Repeat interval for a held left/right direction.
pub const HORIZONTAL_REPEAT_MS: u32 = 100;

/// Repeat interval for a held soft drop.
pub const SOFT_DROP_REPEAT_MS: u32 = 50;

/// Gravity interval at level 0.
pub const BASE_FALL_MS: u32 = 1000;

/// Gravity interval never drops below this.
pub const FALL_INTERVAL_FLOOR_MS: u32 = 50;

/// Lines needed per level step.
pub const LINES_PER_LEVEL: u32 = 10;

/// Points for 1, 2, 3 and 4 rows cleared by a single lock.
pub const LINE_SCORES: [u32; 4] = [50, 150, 300, 1200];

/// Fall bonus every new piece starts with.
pub const FALL_BONUS_START: u32 = 20;

/// Period after which the fall bonus loses a tenth of its value.
pub const FALL_BONUS_DECAY_MS: u32 = 1000;

/// Level floor pinned by the debug override.
pub const DEBUG_OVERRIDE_LEVEL: u32 = 15;

/// Score set by the debug override.
pub const DEBUG_OVERRIDE_SCORE: u32 = 9999;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Stable 1-based code used by the `u8` grid export (0 = empty).
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Piece orientation in degrees, counter-clockwise with the row axis pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "0")]
    Deg0,
    #[serde(rename = "90")]
    Deg90,
    #[serde(rename = "180")]
    Deg180,
    #[serde(rename = "270")]
    Deg270,
}

impl Orientation {
    /// Rotate by +90 degrees
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Orientation::Deg0 => Orientation::Deg90,
            Orientation::Deg90 => Orientation::Deg180,
            Orientation::Deg180 => Orientation::Deg270,
            Orientation::Deg270 => Orientation::Deg0,
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// Number of +90 degree quarter turns from `Deg0`.
    pub fn quarter_turns(&self) -> u8 {
        (self.degrees() / 90) as u8
    }
}

/// Discrete commands the simulation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

impl GameAction {
    /// Parse action from string (replay scripts)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "softdrop" | "down" => Some(GameAction::SoftDrop),
            "rotate" | "up" => Some(GameAction::Rotate),
            _ => None,
        }
    }
}

/// Input sampled once per tick.
///
/// `left`, `right` and `down` are "held" states; `rotate` is "pressed this tick".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub rotate: bool,
}

impl InputFrame {
    pub const IDLE: InputFrame = InputFrame {
        left: false,
        right: false,
        down: false,
        rotate: false,
    };

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }

    /// Mark the key behind `action` as held (or pressed, for rotate)
    pub fn press(&mut self, action: GameAction) {
        match action {
            GameAction::MoveLeft => self.left = true,
            GameAction::MoveRight => self.right = true,
            GameAction::SoftDrop => self.down = true,
            GameAction::Rotate => self.rotate = true,
        }
    }
}

/// Named sound cues fired synchronously by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioCue {
    Moved,
    Rotated,
    Landed,
    LineCleared,
    CheatUnlocked,
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Moved => "moved",
            AudioCue::Rotated => "rotated",
            AudioCue::Landed => "landed",
            AudioCue::LineCleared => "lineCleared",
            AudioCue::CheatUnlocked => "cheatUnlocked",
        }
    }
}

/// Cell on the grid (None = empty, Some = locked with that piece's skin)
pub type Cell = Option<PieceKind>;
