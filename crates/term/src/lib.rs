//! Terminal rendering for the bottle.
//!
//! A small game-oriented rendering layer: the game is drawn into a plain
//! framebuffer of styled characters, which is then flushed to the terminal
//! as a diff against the previous frame. No widget or layout toolkit.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_capsule_core as core;
pub use tui_capsule_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
