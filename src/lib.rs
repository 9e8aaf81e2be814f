//! Fallblock (workspace facade crate).
//!
//! Re-exports the workspace crates as `fallblock::{core,input,term,types}` and
//! hosts the replay script format shared by the `replay` binary and tests.

pub mod script;

pub use fallblock_core as core;
pub use fallblock_input as input;
pub use fallblock_term as term;
pub use fallblock_types as types;
