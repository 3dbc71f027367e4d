//! Core game logic - pure, deterministic, and testable
//!
//! Everything needed to play a round of the capsule/pathogen puzzle lives
//! here, with no dependencies on terminal, input or I/O code.
//!
//! # Module Structure
//!
//! - [`grid`]: 8x16 bottle of cells, each empty or holding one piece
//! - [`piece`]: pathogens and capsule halves, with their identities and links
//! - [`capsule`]: the falling two-cell capsule, its movement and rotation,
//!   and the registry of landed capsules
//! - [`playfield`]: grid + capsule registry + id allocation, and landing
//! - [`resolve`]: the detect → clear → gravity → re-check match engine
//! - [`level`]: pathogen count and placement per level
//! - [`rng`]: seeded LCG and the capsule color queue
//! - [`scoring`]: points per resolution and fall speed
//! - [`game_state`]: the round controller tying it all together
//!
//! # Example
//!
//! ```
//! use tui_capsule_core::{MatchEngine, Playfield};
//!
//! // Four red pathogens on the floor, next to a yellow one
//! let mut field = Playfield::from_rows(&["RRRRY..."]);
//! let stats = MatchEngine::default().resolve(&mut field);
//!
//! assert_eq!(stats.total_cleared, 4);
//! assert_eq!(stats.chain_count, 1);
//! assert_eq!(field.grid.count_pathogens(), 1);
//! ```
//!
//! # Timing
//!
//! [`GameState::tick`](game_state::GameState::tick) is called every frame
//! with the elapsed time. The active capsule falls on the speed's interval;
//! while the match engine runs, the clear, gravity and settle phases are
//! paced by their animation waits instead.

pub mod capsule;
pub mod game_state;
pub mod grid;
pub mod level;
pub mod piece;
pub mod playfield;
pub mod resolve;
pub mod rng;
pub mod scoring;

pub use tui_capsule_types as types;

// Re-export commonly used types for convenience
pub use capsule::{can_move, rotate, try_move, Capsule, CapsuleRegistry, HalfSlot};
pub use game_state::{GameConfig, GameState, GameStatus};
pub use grid::Grid;
pub use piece::{CapsuleId, HalfLink, HalfRole, Piece, PieceId, PieceKind};
pub use playfield::Playfield;
pub use resolve::{
    find_matches, ClearedPiece, EngineConfig, GravityPolicy, MatchEngine, MatchSet, Phase,
    PhaseOutcome, PieceMove, ResolveStats,
};
pub use rng::{CapsuleQueue, SimpleRng};
pub use scoring::{calculate_score, get_drop_interval_ms};
