//! Scoring module - points for cleared pieces and fall speed
//!
//! Scoring is deliberately flat: every cleared piece is worth the same,
//! regardless of chain depth or whether it was a pathogen.

use crate::resolve::ResolveStats;
use crate::types::{Speed, DROP_INTERVAL_FLOOR_MS, SPEED_UP_EVERY, SPEED_UP_STEP_MS};

/// Points for one resolution: `total_cleared × points_per_piece`
pub fn calculate_score(stats: &ResolveStats, points_per_piece: u32) -> u32 {
    stats.total_cleared.saturating_mul(points_per_piece)
}

/// Fall interval in milliseconds after `capsules_spawned` capsules this round.
///
/// Starts at the speed's base interval and shortens every
/// [`SPEED_UP_EVERY`] capsules, never below [`DROP_INTERVAL_FLOOR_MS`].
pub fn get_drop_interval_ms(speed: Speed, capsules_spawned: u32) -> u32 {
    let steps = capsules_spawned / SPEED_UP_EVERY;
    speed
        .base_interval_ms()
        .saturating_sub(steps.saturating_mul(SPEED_UP_STEP_MS))
        .max(DROP_INTERVAL_FLOOR_MS)
}
