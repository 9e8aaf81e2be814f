//! Read-only views of a session for presentation and tooling

use serde::{Deserialize, Serialize};

use fallblock_types::{Orientation, PieceKind, GRID_WIDTH, VISIBLE_HEIGHT};

use crate::grid::U8Grid;
use crate::piece::{Piece, PieceShape};

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub orientation: Orientation,
    pub col: i8,
    pub row: i8,
    pub cells: PieceShape,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            orientation: value.orientation,
            col: value.col,
            row: value.row,
            cells: value.cells(),
        }
    }
}

/// Score, level and lines as shown by a HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

/// Full session view. `grid[row][col]`, row 0 at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub grid: U8Grid,
    pub active: Option<ActiveSnapshot>,
    pub preview: Option<PieceKind>,
    pub phase: Phase,
    pub episode_id: u32,
    pub piece_id: u32,
    pub seed: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub starting_level: u32,
    pub fall_interval_ms: u32,
    pub fall_bonus: u32,
}

impl GameSnapshot {
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            level: self.level,
            lines: self.lines,
        }
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Piece code at (col, row), counting the active piece
    pub fn cell_with_active(&self, col: u8, row: u8) -> u8 {
        if col >= GRID_WIDTH || row >= VISIBLE_HEIGHT {
            return 0;
        }
        if let Some(active) = &self.active {
            if active
                .cells
                .iter()
                .any(|&(c, r)| c == col as i8 && r == row as i8)
            {
                return active.kind.code();
            }
        }
        self.grid[row as usize][col as usize]
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            grid: [[0u8; GRID_WIDTH as usize]; VISIBLE_HEIGHT as usize],
            active: None,
            preview: None,
            phase: Phase::Spawning,
            episode_id: 0,
            piece_id: 0,
            seed: 0,
            score: 0,
            level: 0,
            lines: 0,
            starting_level: 0,
            fall_interval_ms: 0,
            fall_bonus: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_with_active_overlays_piece() {
        let mut snap = GameSnapshot::default();
        snap.grid[0][0] = PieceKind::I.code();
        snap.active = Some(Piece::new(PieceKind::O, 4, 5, Orientation::Deg0).into());

        assert_eq!(snap.cell_with_active(0, 0), PieceKind::I.code());
        assert_eq!(snap.cell_with_active(5, 6), PieceKind::O.code());
        assert_eq!(snap.cell_with_active(3, 5), 0);
        assert_eq!(snap.cell_with_active(10, 0), 0);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = GameSnapshot::default();
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(json["phase"], "spawning");
        assert_eq!(json["grid"].as_array().unwrap().len(), 20);
        assert!(json["active"].is_null());
    }
}
