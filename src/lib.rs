//! TUI capsule puzzle (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_capsule::{core,input,term,types}`
//! and holds the binary's command-line parsing.

pub mod cli;

pub use tui_capsule_core as core;
pub use tui_capsule_input as input;
pub use tui_capsule_term as term;
pub use tui_capsule_types as types;
