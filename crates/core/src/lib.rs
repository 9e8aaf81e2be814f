//! Core simulation - pure, deterministic, and testable
//!
//! This crate contains the piece/grid rules, the session state machine and
//! the scoring. It has **zero dependencies** on terminals or other I/O:
//!
//! - **Deterministic**: Same seed and the same input frames give the same game
//! - **Testable**: Every rule is reachable through plain method calls
//! - **Portable**: Runs interactively, headless, or inside tests
//!
//! # Module Structure
//!
//! - [`grid`]: 10x20 locked-cell grid with occupancy queries and row clearing
//! - [`piece`]: tetromino shapes, rotation rules and candidate positions
//! - [`timing`]: held/pressed input to discrete actions with repeat delays
//! - [`scoring`]: tiered line scores, fall interval curve, level rule, fall bonus
//! - [`rng`]: uniform piece randomizer
//! - [`session`]: spawn/fall/lock/game-over state machine
//! - [`snapshot`]: read-only views for presentation
//!
//! # Rules
//!
//! - **Uniform randomizer** with a one-piece preview
//! - **No wall kicks**: an obstructed rotation is simply refused
//! - **No lock delay**: a piece locks on the first blocked downward move
//! - **Game over** when a piece locks with any cell at or above row 20
//!
//! # Example
//!
//! ```
//! use fallblock_core::{GameSession, SessionConfig};
//! use fallblock_types::{GameAction, InputFrame};
//!
//! let mut session = GameSession::new(SessionConfig::new(0).with_seed(12345));
//! session.start();
//!
//! session.apply_action(GameAction::MoveRight);
//! session.tick(InputFrame::IDLE, 16);
//!
//! assert_eq!(session.score(), 0);
//! assert!(session.active().is_some());
//! ```
//!
//! # Timing
//!
//! Call [`GameSession::tick`](session::GameSession::tick) every frame with the
//! elapsed milliseconds and the sampled [`InputFrame`](fallblock_types::InputFrame).
//! Gravity fires every 1000ms at level 0 and speeds up with the level down to
//! a 50ms floor.

pub mod grid;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod timing;

pub use fallblock_types as types;

pub use grid::{Grid, RowList, U8Grid};
pub use piece::{cells_at, cells_at_point, checked_cells_at, get_shape, Piece, PieceShape, RotationRule};
pub use rng::{Randomizer, SimpleRng};
pub use scoring::{compute_level, fall_interval_ms, line_clear_points, FallBonus, ScoreTracker};
pub use session::{GameSession, SessionConfig, SessionEvent};
pub use snapshot::{ActiveSnapshot, GameSnapshot, HudSnapshot, Phase};
pub use timing::{AxisRepeat, HorizontalDirection, InputTiming};
