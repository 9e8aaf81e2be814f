//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events to game keys, turns presses and releases into
//! the per-tick [`InputFrame`](fallblock_types::InputFrame) the simulation
//! samples (including terminals without key-release events), and watches for
//! the cheat sequence.

pub mod cheat;
pub mod keyboard;
pub mod map;

pub use fallblock_types as types;

pub use cheat::{CheatMatcher, CHEAT_SEQUENCE};
pub use keyboard::KeyboardState;
pub use map::{is_restart, map_key, should_quit, Key};
