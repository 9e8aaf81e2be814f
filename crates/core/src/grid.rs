//! Grid module - the persistent occupancy matrix of locked cells
//!
//! The grid is 10 columns wide with 20 visible rows stored in a flat array.
//! Coordinates: (col, row) where col ranges 0..9 (left to right) and row 0 is
//! the bottom row, growing upward. Rows at or above the ceiling (row 20) are
//! never stored; queries there always report a free cell so pieces can spawn
//! and rotate above the visible field.

use arrayvec::ArrayVec;

use fallblock_types::{Cell, PieceKind, GRID_WIDTH, VISIBLE_HEIGHT};

/// Total number of stored cells
const GRID_SIZE: usize = (GRID_WIDTH as usize) * (VISIBLE_HEIGHT as usize);

/// Row indices reported by a scan or a clear, bottom first.
pub type RowList = ArrayVec<u8, { VISIBLE_HEIGHT as usize }>;

/// Grid export used by snapshots: `rows[row][col]`, row 0 at the bottom,
/// 0 = empty, otherwise [`PieceKind::code`].
pub type U8Grid = [[u8; GRID_WIDTH as usize]; VISIBLE_HEIGHT as usize];

/// The locked-cell grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_SIZE],
        }
    }

    /// Build a grid from text rows, `rows[0]` being the bottom row.
    ///
    /// `.` and spaces are empty, a piece letter (`i o t s z j l`) fills the
    /// cell with that skin and any other mark fills it with the `O` skin.
    /// Rows beyond the visible height and columns beyond the width are ignored.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut grid = Self::new();
        for (row, line) in rows.iter().enumerate().take(VISIBLE_HEIGHT as usize) {
            for (col, ch) in line.chars().enumerate().take(GRID_WIDTH as usize) {
                let cell = match ch {
                    '.' | ' ' => None,
                    other => Some(
                        PieceKind::from_str(other.encode_utf8(&mut [0u8; 4]))
                            .unwrap_or(PieceKind::O),
                    ),
                };
                grid.set(col as i8, row as i8, cell);
            }
        }
        grid
    }

    #[inline(always)]
    fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= GRID_WIDTH as i8 || row < 0 || row >= VISIBLE_HEIGHT as i8 {
            return None;
        }
        Some((row as usize) * (GRID_WIDTH as usize) + (col as usize))
    }

    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> u8 {
        VISIBLE_HEIGHT
    }

    /// Occupancy query.
    ///
    /// Returns `None` outside `[0, width) x [0, +inf)`, `Some(false)` for any
    /// row at or above the ceiling, and the stored occupancy otherwise.
    pub fn occupied_at(&self, col: i8, row: i8) -> Option<bool> {
        if col < 0 || col >= GRID_WIDTH as i8 || row < 0 {
            return None;
        }
        match Self::index(col, row) {
            Some(idx) => Some(self.cells[idx].is_some()),
            None => Some(false),
        }
    }

    /// Check if a piece cell may sit at (col, row): inside the field and free
    pub fn is_valid(&self, col: i8, row: i8) -> bool {
        self.occupied_at(col, row) == Some(false)
    }

    /// Get the stored cell at (col, row).
    /// Returns None outside the stored (visible) area.
    pub fn get(&self, col: i8, row: i8) -> Option<Cell> {
        Self::index(col, row).map(|idx| self.cells[idx])
    }

    /// Set the cell at (col, row).
    /// Returns false outside the stored area.
    pub fn set(&mut self, col: i8, row: i8, cell: Cell) -> bool {
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// The cells of one visible row, left to right
    pub fn row_cells(&self, row: u8) -> Option<&[Cell]> {
        if row >= VISIBLE_HEIGHT {
            return None;
        }
        let start = row as usize * GRID_WIDTH as usize;
        Some(&self.cells[start..start + GRID_WIDTH as usize])
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: u8) -> bool {
        self.row_cells(row)
            .map(|cells| cells.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Full rows, bottom to top. Pure; the caller decides what to count.
    pub fn scan_full_rows(&self) -> RowList {
        (0..VISIBLE_HEIGHT).filter(|&row| self.is_row_full(row)).collect()
    }

    /// Mark each cell as occupied with `skin`.
    ///
    /// Cells at or above the ceiling are not stored; the session checks for
    /// them (game over) before integrating.
    pub fn integrate(&mut self, cells: &[(i8, i8)], skin: PieceKind) {
        for &(col, row) in cells {
            let stored = self.set(col, row, Some(skin));
            debug_assert!(stored || row >= VISIBLE_HEIGHT as i8, "integrate outside grid");
        }
    }

    /// Delete every full row and compact the rows above it downward.
    ///
    /// Returns the cleared rows in pre-clear coordinates, bottom first.
    /// A two-pointer pass gives the same result as deleting a row and
    /// re-testing the same index until it is no longer full.
    pub fn clear_and_compact(&mut self) -> RowList {
        let mut cleared = RowList::new();
        let width = GRID_WIDTH as usize;
        let mut write_row = 0usize;

        for read_row in 0..VISIBLE_HEIGHT {
            if self.is_row_full(read_row) {
                cleared.push(read_row);
                continue;
            }
            let read = read_row as usize;
            if write_row != read {
                self.cells
                    .copy_within(read * width..(read + 1) * width, write_row * width);
            }
            write_row += 1;
        }

        for cell in &mut self.cells[write_row * width..] {
            *cell = None;
        }

        cleared
    }

    /// Export the grid as piece codes for snapshots
    pub fn write_u8_grid(&self, out: &mut U8Grid) {
        for (row, out_row) in out.iter_mut().enumerate() {
            let start = row * GRID_WIDTH as usize;
            for (col, out_cell) in out_row.iter_mut().enumerate() {
                *out_cell = self.cells[start + col].map(|k| k.code()).unwrap_or(0);
            }
        }
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
