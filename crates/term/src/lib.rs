//! Terminal presentation sink.
//!
//! A small, game-oriented rendering layer: [`GameView`] draws a
//! [`GameSnapshot`](fallblock_core::GameSnapshot) into a [`FrameBuffer`], and
//! [`TerminalRenderer`] flushes that buffer to the terminal with crossterm,
//! rewriting only the cells that changed since the previous frame.

pub mod fb;
pub mod renderer;
pub mod view;

pub use fallblock_core as core;
pub use fallblock_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use view::{GameView, Layout, Viewport};
