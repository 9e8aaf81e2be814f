//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O). Grid row 0 is the bottom row, so screen rows run the other
//! way: grid row `r` lands on screen line `top + 1 + (19 - r)`.

use crate::core::{get_shape, GameSnapshot};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Orientation, PieceKind, GRID_WIDTH, VISIBLE_HEIGHT};

/// Board cell width in terminal columns; 2x1 roughly squares typical glyphs.
const CELL_W: u16 = 2;
const FRAME_W: u16 = GRID_WIDTH as u16 * CELL_W + 2;
const FRAME_H: u16 = VISIBLE_HEIGHT as u16 + 2;
const PANEL_GAP: u16 = 2;
const PANEL_W: u16 = 12;

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Where the board frame and the side panel go for a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub frame_x: u16,
    pub frame_y: u16,
    /// `None` when the viewport is too narrow for the panel.
    pub panel_x: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GameView;

impl GameView {
    pub fn new() -> Self {
        Self
    }

    pub fn layout(&self, viewport: Viewport) -> Layout {
        let with_panel = FRAME_W + PANEL_GAP + PANEL_W;
        let fits_panel = viewport.width >= with_panel;
        let total_w = if fits_panel { with_panel } else { FRAME_W };
        let frame_x = viewport.width.saturating_sub(total_w) / 2;
        Layout {
            frame_x,
            frame_y: viewport.height.saturating_sub(FRAME_H) / 2,
            panel_x: fits_panel.then_some(frame_x + FRAME_W + PANEL_GAP),
        }
    }

    /// Screen position of the left column of grid cell (col, row).
    pub fn cell_origin(&self, layout: &Layout, col: u8, row: u8) -> (u16, u16) {
        (
            layout.frame_x + 1 + col as u16 * CELL_W,
            layout.frame_y + 1 + (VISIBLE_HEIGHT - 1 - row) as u16,
        )
    }

    /// Render a snapshot into an existing framebuffer (resized to the viewport).
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let layout = self.layout(viewport);
        self.draw_border(fb, &layout);

        let empty = CellStyle::new(Rgb::new(90, 90, 100), FIELD_BG).into_cell('·');
        for row in 0..VISIBLE_HEIGHT {
            for col in 0..GRID_WIDTH {
                let (x, y) = self.cell_origin(&layout, col, row);
                let cell = match PieceKind::from_code(snap.cell_with_active(col, row)) {
                    Some(kind) => piece_style(kind).into_cell('█'),
                    None => empty,
                };
                fb.fill_rect(x, y, CELL_W, 1, cell);
            }
        }

        if let Some(panel_x) = layout.panel_x {
            self.draw_panel(fb, snap, panel_x, layout.frame_y);
        }

        if snap.game_over() {
            let style = CellStyle::new(Rgb::new(255, 255, 255), BLACK).bold();
            let mid = layout.frame_y + FRAME_H / 2;
            centered(fb, layout.frame_x, mid, "GAME OVER", style);
            centered(fb, layout.frame_x, mid + 1, "r: restart", style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: &Layout) {
        let style = CellStyle::new(Rgb::new(200, 200, 200), BLACK);
        let (x, y) = (layout.frame_x, layout.frame_y);
        let (right, bottom) = (x + FRAME_W - 1, y + FRAME_H - 1);

        for dx in 1..FRAME_W - 1 {
            fb.set(x + dx, y, style.into_cell('─'));
            fb.set(x + dx, bottom, style.into_cell('─'));
        }
        for dy in 1..FRAME_H - 1 {
            fb.set(x, y + dy, style.into_cell('│'));
            fb.set(right, y + dy, style.into_cell('│'));
        }
        fb.set(x, y, style.into_cell('┌'));
        fb.set(right, y, style.into_cell('┐'));
        fb.set(x, bottom, style.into_cell('└'));
        fb.set(right, bottom, style.into_cell('┘'));
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, top: u16) {
        let label = CellStyle::new(Rgb::new(220, 220, 220), BLACK).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), BLACK);
        let hud = snap.hud();

        let mut y = top;
        for (name, v) in [("SCORE", hud.score), ("LEVEL", hud.level), ("LINES", hud.lines)] {
            fb.put_str(x, y, name, label);
            fb.put_str(x, y + 1, &v.to_string(), value);
            y += 3;
        }

        fb.put_str(x, y, "NEXT", label);
        if let Some(kind) = snap.preview {
            // preview drawn with the pivot one cell in, top row first
            for (dx, dy) in get_shape(kind, Orientation::Deg0) {
                let px = x + ((dx + 1) as u16) * CELL_W;
                let py = y + 2 - dy as u16;
                fb.fill_rect(px, py, CELL_W, 1, piece_style(kind).into_cell('█'));
            }
        }
    }
}

fn centered(fb: &mut FrameBuffer, frame_x: u16, y: u16, text: &str, style: CellStyle) {
    let w = text.chars().count() as u16;
    fb.put_str(frame_x + FRAME_W.saturating_sub(w) / 2, y, text, style);
}

fn piece_style(kind: PieceKind) -> CellStyle {
    let fg = match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    };
    CellStyle::new(fg, FIELD_BG)
}
