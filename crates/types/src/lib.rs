//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, input decoding, terminal rendering).
//!
//! # Grid Dimensions
//!
//! The bottle is a fixed 8x16 grid:
//!
//! - **Width**: 8 columns (indexed 0-7)
//! - **Height**: 16 rows (indexed 0-15, row 0 is the top)
//! - **Spawn position**: (3, 0), horizontal, so the capsule covers columns 3 and 4
//! - **Bottleneck**: any landed piece in rows `0..BOTTLENECK_ROW` ends the round
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SOFT_DROP_INTERVAL_MS` | 40 | Fall interval while soft dropping |
//! | `CLEAR_ANIM_MS` | 200 | Wait after a clear phase |
//! | `GRAVITY_STEP_MS` | 120 | Wait after a gravity phase |
//! | `SETTLE_MS` | 150 | Wait before re-detecting matches |
//!
//! # Examples
//!
//! ```
//! use tui_capsule_types::{Color, Direction, Orientation, GameAction, GRID_WIDTH, GRID_HEIGHT};
//!
//! assert_eq!(Color::from_str("R"), Some(Color::Red));
//! assert_eq!(Orientation::Horizontal.rotate_cw(), Orientation::Vertical);
//! assert_eq!(Direction::Down.delta(), (0, 1));
//! assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
//!
//! assert_eq!(GRID_WIDTH, 8);
//! assert_eq!(GRID_HEIGHT, 16);
//! ```

/// Grid width in cells (8 columns)
pub const GRID_WIDTH: u8 = 8;

/// Grid height in cells (16 rows)
pub const GRID_HEIGHT: u8 = 16;

/// Total number of cells in the grid
pub const GRID_CELLS: usize = (GRID_WIDTH as usize) * (GRID_HEIGHT as usize);

/// Rows `0..BOTTLENECK_ROW` form the bottle neck. A settled piece there is a loss.
pub const BOTTLENECK_ROW: u8 = 1;

/// Column of the first half of a freshly spawned capsule
pub const SPAWN_COL: i8 = 3;

/// Row of a freshly spawned capsule
pub const SPAWN_ROW: i8 = 0;

/// Minimum straight run length that clears
pub const MIN_MATCH_LEN: u8 = 4;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Fall interval while the player holds soft drop
pub const SOFT_DROP_INTERVAL_MS: u32 = 40;

/// Capsules spawned between each fall speed-up
pub const SPEED_UP_EVERY: u32 = 10;

/// Fall interval reduction applied at each speed-up
pub const SPEED_UP_STEP_MS: u32 = 20;

/// Fall interval never goes below this
pub const DROP_INTERVAL_FLOOR_MS: u32 = 100;

/// Pause after matched pieces are removed (pop animation)
pub const CLEAR_ANIM_MS: u32 = 200;

/// Pause after a gravity phase moved pieces
pub const GRAVITY_STEP_MS: u32 = 120;

/// Pause between gravity and the next match detection
pub const SETTLE_MS: u32 = 150;

/// Default points awarded per cleared piece
pub const POINTS_PER_PIECE: u32 = 100;

/// Highest selectable level
pub const MAX_LEVEL: u32 = 20;

/// Upper bound on pathogens placed for a level
pub const MAX_PATHOGENS: u32 = 84;

/// DAS (Delayed Auto Shift) delay in milliseconds.
pub const DEFAULT_DAS_MS: u32 = 150;

/// ARR (Auto Repeat Rate) in milliseconds.
pub const DEFAULT_ARR_MS: u32 = 50;


/// Piece colors
///
/// The engine only ever compares colors for equality, so adding a color here
/// needs no change to matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Yellow,
    Blue,
}

impl Color {
    /// Every color, in a stable order
    pub const ALL: [Color; 3] = [Color::Red, Color::Yellow, Color::Blue];

    /// Color for an index, wrapping around [`Color::ALL`]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % Self::ALL.len()]
    }

    /// Parse color from string (case-insensitive, full name or initial)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_capsule_types::Color;
    ///
    /// assert_eq!(Color::from_str("red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("y"), Some(Color::Yellow));
    /// assert_eq!(Color::from_str("B"), Some(Color::Blue));
    /// assert_eq!(Color::from_str("green"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" | "r" => Some(Color::Red),
            "yellow" | "y" => Some(Color::Yellow),
            "blue" | "b" => Some(Color::Blue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
        }
    }
}

/// Capsule orientation
///
/// A horizontal capsule puts its second half right of the first,
/// a vertical one puts it directly below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Orientation after a 90° clockwise turn
    pub fn rotate_cw(&self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Offset of the second half relative to the first
    pub fn second_offset(&self) -> (i8, i8) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }
}

/// Capsule movement directions. There is no upward movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// (dcol, drow) for one step in this direction
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Capsule fall speed setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Speed {
    Low,
    #[default]
    Med,
    Hi,
}

impl Speed {
    /// Fall interval for the first capsules of a round
    pub fn base_interval_ms(&self) -> u32 {
        match self {
            Speed::Low => 800,
            Speed::Med => 500,
            Speed::Hi => 300,
        }
    }

    /// Parse speed from string
    ///
    /// Accepts "low" | "l", "med" | "medium" | "m", "hi" | "high" | "h" (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" | "l" => Some(Speed::Low),
            "med" | "medium" | "m" => Some(Speed::Med),
            "hi" | "high" | "h" => Some(Speed::Hi),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Speed::Low => "low",
            Speed::Med => "med",
            Speed::Hi => "hi",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These actions are produced by the input decoder and consumed by the
/// round controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Shift capsule one cell left
    MoveLeft,
    /// Shift capsule one cell right
    MoveRight,
    /// Drop capsule one cell down, landing it if blocked
    SoftDrop,
    /// Rotate capsule 90° clockwise
    RotateCw,
    /// Toggle pause state
    Pause,
    /// Continue to the next level after a win, or restart after a loss
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_capsule_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("softdrop"), Some(GameAction::SoftDrop));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}
