//! Piece module - tetromino shapes, rotation rules and candidate positions
//!
//! Shapes are stored as four pivot-relative offsets with the row axis pointing
//! up. A +90 degree turn maps an offset `(dx, dy)` to `(-dy, dx)`.
//! There are no wall kicks: a rotation either fits where it is or is refused.

use fallblock_types::{Orientation, PieceKind, SPAWN_ANCHOR};

use crate::grid::Grid;

/// Offset of a single mino relative to the pivot
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets (or absolute cells)
pub type PieceShape = [MinoOffset; 4];

/// How a piece kind responds to the rotate command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationRule {
    /// Every press turns +90 degrees
    Free,
    /// Toggles between 0 and 90 degrees
    Limited,
    /// Never rotates
    Fixed,
}

/// Per-kind shape data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeData {
    pub offsets: PieceShape,
    pub rotation: RotationRule,
}

const I_SHAPE: ShapeData = ShapeData {
    offsets: [(-1, 0), (0, 0), (1, 0), (2, 0)],
    rotation: RotationRule::Limited,
};

const O_SHAPE: ShapeData = ShapeData {
    offsets: [(0, 0), (1, 0), (0, 1), (1, 1)],
    rotation: RotationRule::Fixed,
};

const T_SHAPE: ShapeData = ShapeData {
    offsets: [(-1, 0), (0, 0), (1, 0), (0, 1)],
    rotation: RotationRule::Free,
};

const S_SHAPE: ShapeData = ShapeData {
    offsets: [(-1, 0), (0, 0), (0, 1), (1, 1)],
    rotation: RotationRule::Limited,
};

const Z_SHAPE: ShapeData = ShapeData {
    offsets: [(-1, 1), (0, 1), (0, 0), (1, 0)],
    rotation: RotationRule::Limited,
};

const J_SHAPE: ShapeData = ShapeData {
    offsets: [(-1, 1), (-1, 0), (0, 0), (1, 0)],
    rotation: RotationRule::Free,
};

const L_SHAPE: ShapeData = ShapeData {
    offsets: [(-1, 0), (0, 0), (1, 0), (1, 1)],
    rotation: RotationRule::Free,
};

/// Shape data for a piece kind
pub fn shape_data(kind: PieceKind) -> &'static ShapeData {
    match kind {
        PieceKind::I => &I_SHAPE,
        PieceKind::O => &O_SHAPE,
        PieceKind::T => &T_SHAPE,
        PieceKind::S => &S_SHAPE,
        PieceKind::Z => &Z_SHAPE,
        PieceKind::J => &J_SHAPE,
        PieceKind::L => &L_SHAPE,
    }
}

/// Get the mino offsets for a piece kind and orientation
pub fn get_shape(kind: PieceKind, orientation: Orientation) -> PieceShape {
    let mut shape = shape_data(kind).offsets;
    for _ in 0..orientation.quarter_turns() {
        for offset in &mut shape {
            *offset = (-offset.1, offset.0);
        }
    }
    shape
}

/// Absolute cells of `kind` anchored at `anchor` in `orientation`
pub fn cells_at(kind: PieceKind, anchor: (i8, i8), orientation: Orientation) -> PieceShape {
    let (x, y) = anchor;
    get_shape(kind, orientation).map(|(dx, dy)| (x.saturating_add(dx), y.saturating_add(dy)))
}

/// Like [`cells_at`] but `None` when an offset leaves the `i8` range
pub fn checked_cells_at(
    kind: PieceKind,
    anchor: (i8, i8),
    orientation: Orientation,
) -> Option<PieceShape> {
    let (x, y) = anchor;
    let mut cells = get_shape(kind, orientation);
    for cell in &mut cells {
        *cell = (x.checked_add(cell.0)?, y.checked_add(cell.1)?);
    }
    Some(cells)
}

/// Like [`cells_at`] but accepts a fractional anchor, rounded to the nearest
/// integer with ties going to the even neighbour.
pub fn cells_at_point(kind: PieceKind, x: f32, y: f32, orientation: Orientation) -> PieceShape {
    let anchor = (x.round_ties_even() as i8, y.round_ties_even() as i8);
    cells_at(kind, anchor, orientation)
}

/// Orientation after one rotate command, or `None` for kinds that never rotate
pub fn next_orientation(kind: PieceKind, current: Orientation) -> Option<Orientation> {
    match shape_data(kind).rotation {
        RotationRule::Free => Some(current.rotate_ccw()),
        RotationRule::Limited => Some(match current {
            Orientation::Deg0 => Orientation::Deg90,
            _ => Orientation::Deg0,
        }),
        RotationRule::Fixed => None,
    }
}

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub col: i8,
    pub row: i8,
    pub orientation: Orientation,
}

impl Piece {
    /// Create a piece at the spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        Self::new(kind, SPAWN_ANCHOR.0, SPAWN_ANCHOR.1, Orientation::Deg0)
    }

    pub fn new(kind: PieceKind, col: i8, row: i8, orientation: Orientation) -> Self {
        Self {
            kind,
            col,
            row,
            orientation,
        }
    }

    /// Absolute cells occupied by this piece
    pub fn cells(&self) -> PieceShape {
        cells_at(self.kind, (self.col, self.row), self.orientation)
    }

    /// Candidate translated by (dx, dy); `self` is untouched
    pub fn moved(&self, dx: i8, dy: i8) -> Self {
        Self {
            col: self.col.saturating_add(dx),
            row: self.row.saturating_add(dy),
            ..*self
        }
    }

    /// Candidate after one rotate command; equals `self` for fixed kinds
    pub fn rotated(&self) -> Self {
        match next_orientation(self.kind, self.orientation) {
            Some(orientation) => Self {
                orientation,
                ..*self
            },
            None => *self,
        }
    }

    /// Every cell is inside the field and free
    pub fn is_valid(&self, grid: &Grid) -> bool {
        match checked_cells_at(self.kind, (self.col, self.row), self.orientation) {
            Some(cells) => cells.iter().all(|&(col, row)| grid.is_valid(col, row)),
            None => false,
        }
    }

    /// Any cell at or above `ceiling`
    pub fn reaches(&self, ceiling: i8) -> bool {
        self.cells().iter().any(|&(_, row)| row >= ceiling)
    }
}
