//! Terminal input (engine-facing).
//!
//! Maps `crossterm` key events to [`crate::types::GameAction`] and repeats
//! held movement keys with DAS/ARR timing. Works in terminals that never
//! report key releases.

pub mod handler;
pub mod map;

pub use tui_capsule_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, held_key, should_quit, HeldKey};
