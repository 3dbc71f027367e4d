//! Match resolution - detect, clear, gravity, re-check
//!
//! After a capsule lands, [`MatchEngine`] runs the board to quiescence:
//!
//! 1. **Detect**: every straight horizontal or vertical run of at least
//!    `min_match_len` same-colored pieces is collected into one set of cells.
//!    Runs are measured rightward and downward from each cell, so L, T and
//!    plus shaped clusters only match if they contain a straight run.
//! 2. **Clear**: matched pieces leave the grid. Capsules that lost a half are
//!    dissolved and their surviving half becomes detached.
//! 3. **Gravity**: unsupported pieces fall (see [`GravityPolicy`]).
//! 4. **Settle**: a pause, then back to Detect.
//!
//! Capsules landed since the last resolution fall as linked units while it
//! runs. When Detect finds nothing, every capsule still registered is
//! separated, so a quiet grid holds only pathogens and detached halves.
//!
//! Each phase that has visible side effects returns a [`PhaseOutcome`] from
//! [`MatchEngine::advance`]. The caller animates it and calls `advance` again
//! when done; grid state is already final for that phase when `advance`
//! returns. [`MatchEngine::resolve`] drives the whole cycle without waiting.

use arrayvec::ArrayVec;

use crate::capsule::can_move;
use crate::grid::Grid;
use crate::piece::{CapsuleId, PieceId, PieceKind};
use crate::playfield::Playfield;
use crate::types::{Color, Direction, GRID_CELLS, GRID_HEIGHT, GRID_WIDTH, MIN_MATCH_LEN};

/// How far pieces fall in one gravity phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityPolicy {
    /// Linked capsules drop one row per gravity phase, detached halves drop
    /// their whole empty run. A capsule can be left hanging when no further
    /// match follows.
    Stepwise,
    /// Gravity passes repeat until nothing moves, so every piece is resting
    /// before the next detect.
    #[default]
    Settle,
}

impl GravityPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stepwise" | "step" => Some(GravityPolicy::Stepwise),
            "settle" => Some(GravityPolicy::Settle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GravityPolicy::Stepwise => "stepwise",
            GravityPolicy::Settle => "settle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub min_match_len: u8,
    pub gravity: GravityPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_match_len: MIN_MATCH_LEN,
            gravity: GravityPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_gravity(mut self, gravity: GravityPolicy) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_min_match_len(mut self, len: u8) -> Self {
        self.min_match_len = len.max(1);
        self
    }
}

/// A piece removed by a clear phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedPiece {
    pub id: PieceId,
    pub col: i8,
    pub row: i8,
    pub color: Color,
    pub was_pathogen: bool,
}

/// A piece moved by a gravity phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceMove {
    pub id: PieceId,
    pub from: (i8, i8),
    pub to: (i8, i8),
}

impl PieceMove {
    pub fn rows(&self) -> i8 {
        self.to.1 - self.from.1
    }
}

/// Result of a full resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveStats {
    pub total_cleared: u32,
    /// Number of detect/clear iterations that cleared something
    pub chain_count: u32,
    /// Pathogens among the cleared pieces
    pub pathogens_cleared: u32,
}

/// Cells matched by one detect pass.
///
/// Unique and in row-major order.
#[derive(Debug, Clone)]
pub struct MatchSet {
    mask: [bool; GRID_CELLS],
    cells: ArrayVec<(i8, i8), GRID_CELLS>,
}

impl MatchSet {
    fn new() -> Self {
        Self {
            mask: [false; GRID_CELLS],
            cells: ArrayVec::new(),
        }
    }

    fn reset(&mut self) {
        self.mask = [false; GRID_CELLS];
        self.cells.clear();
    }

    pub fn cells(&self) -> &[(i8, i8)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, col: i8, row: i8) -> bool {
        Grid::index(col, row).is_some_and(|i| self.mask[i])
    }

    fn finish(&mut self) {
        self.cells.clear();
        for row in 0..GRID_HEIGHT as i8 {
            for col in 0..GRID_WIDTH as i8 {
                if self.contains(col, row) {
                    self.cells.push((col, row));
                }
            }
        }
    }
}

/// Length of the same-colored run starting at (col, row) going (dc, dr)
fn run_length(grid: &Grid, col: i8, row: i8, dc: i8, dr: i8) -> u8 {
    let Some(color) = grid.color_at(col, row) else {
        return 0;
    };
    let mut len = 1u8;
    while grid.color_at(col + dc * len as i8, row + dr * len as i8) == Some(color) {
        len += 1;
    }
    len
}

fn detect_into(grid: &Grid, min_len: u8, out: &mut MatchSet) {
    out.reset();
    for row in 0..GRID_HEIGHT as i8 {
        for col in 0..GRID_WIDTH as i8 {
            if !grid.is_occupied(col, row) {
                continue;
            }
            for (dc, dr) in [(1, 0), (0, 1)] {
                let len = run_length(grid, col, row, dc, dr);
                if len >= min_len {
                    for k in 0..len as i8 {
                        if let Some(i) = Grid::index(col + dc * k, row + dr * k) {
                            out.mask[i] = true;
                        }
                    }
                }
            }
        }
    }
    out.finish();
}

/// Every cell on a straight same-color run of at least `min_len`
pub fn find_matches(grid: &Grid, min_len: u8) -> MatchSet {
    let mut set = MatchSet::new();
    detect_into(grid, min_len.max(1), &mut set);
    set
}

/// Most capsules that can be linked in the grid at once: each holds two cells
const MAX_LINKED: usize = GRID_CELLS / 2;

/// One gravity pass over all columns, bottom to top. Returns pieces dropped
/// (2 per capsule moved, 1 per detached half).
fn gravity_pass(field: &mut Playfield, moves: &mut Vec<PieceMove>) -> u32 {
    let mut dropped = 0;
    let mut seen: ArrayVec<CapsuleId, MAX_LINKED> = ArrayVec::new();

    for col in 0..GRID_WIDTH as i8 {
        for row in (0..GRID_HEIGHT as i8).rev() {
            let Some(piece) = field.grid.get(col, row).copied() else {
                continue;
            };
            match piece.kind {
                PieceKind::Pathogen { .. } => {}
                PieceKind::Half { link: Some(link), .. } => {
                    if seen.contains(&link.capsule) {
                        continue;
                    }
                    seen.push(link.capsule);
                    dropped += drop_capsule(field, link.capsule, moves);
                }
                PieceKind::Half { link: None, .. } => {
                    let mut dist = 0;
                    while field.grid.is_empty(col, row + dist + 1) {
                        dist += 1;
                    }
                    if dist > 0 && field.grid.move_piece((col, row), (col, row + dist)) {
                        moves.push(PieceMove {
                            id: piece.id,
                            from: (col, row),
                            to: (col, row + dist),
                        });
                        dropped += 1;
                    }
                }
            }
        }
    }
    dropped
}

/// Move a linked capsule down one row if nothing but itself is in the way
fn drop_capsule(field: &mut Playfield, id: CapsuleId, moves: &mut Vec<PieceMove>) -> u32 {
    let Some(capsule) = field.capsules.get(id).copied() else {
        return 0;
    };
    let grid = &field.grid;
    if !can_move(&capsule, Direction::Down, |c, r| {
        grid.is_occupied(c, r) && !capsule.contains(c, r)
    }) {
        return 0;
    }

    let from = capsule.cells();
    let pieces = from.map(|(c, r)| field.grid.remove(c, r));
    let mut moved = capsule;
    moved.base_row += 1;
    for ((piece, from), to) in pieces.into_iter().zip(from).zip(moved.cells()) {
        if let Some(piece) = piece {
            field.grid.set(to.0, to.1, Some(piece));
            moves.push(PieceMove {
                id: piece.id,
                from,
                to,
            });
        }
    }
    if let Some(slot) = field.capsules.get_mut(id) {
        *slot = moved;
    }
    2
}

/// Current state of the engine's phase machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not resolving
    Idle,
    /// Next `advance` detects and, on a match, clears
    Detect,
    /// Next `advance` applies gravity
    Gravity,
    /// Next `advance` reports the settle pause
    Settle,
}

/// What a call to [`MatchEngine::advance`] did, and what the caller must wait
/// for before calling it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome<'a> {
    /// Matched pieces were removed from the grid
    Cleared(&'a [ClearedPiece]),
    /// Pieces fell (may be empty)
    Dropped(&'a [PieceMove]),
    /// Pause before the next detect
    Settle,
    /// Nothing left to match; the engine is idle again
    Finished(ResolveStats),
}

/// The detect → clear → gravity → re-check state machine
#[derive(Debug, Clone)]
pub struct MatchEngine {
    config: EngineConfig,
    phase: Phase,
    stats: ResolveStats,
    matches: MatchSet,
    cleared: ArrayVec<ClearedPiece, GRID_CELLS>,
    moves: Vec<PieceMove>,
}

impl MatchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            stats: ResolveStats::default(),
            matches: MatchSet::new(),
            cleared: ArrayVec::new(),
            moves: Vec::with_capacity(GRID_CELLS),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True between a successful [`begin`](Self::begin) and the `Finished` outcome
    pub fn is_processing(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Stats accumulated so far in the current (or last) resolution
    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// Arm a new resolution. Returns false, changing nothing, if one is
    /// already in progress.
    pub fn begin(&mut self) -> bool {
        if self.is_processing() {
            return false;
        }
        self.stats = ResolveStats::default();
        self.phase = Phase::Detect;
        true
    }

    /// Run the next phase against `field`.
    ///
    /// Calling this while idle returns `Finished` with the last stats and does nothing.
    pub fn advance(&mut self, field: &mut Playfield) -> PhaseOutcome<'_> {
        match self.phase {
            Phase::Idle => PhaseOutcome::Finished(self.stats),
            Phase::Detect => {
                detect_into(&field.grid, self.config.min_match_len, &mut self.matches);
                if self.matches.is_empty() {
                    field.separate_all();
                    self.phase = Phase::Idle;
                    return PhaseOutcome::Finished(self.stats);
                }
                self.clear_matches(field);
                self.phase = Phase::Gravity;
                PhaseOutcome::Cleared(&self.cleared)
            }
            Phase::Gravity => {
                self.moves.clear();
                loop {
                    let dropped = gravity_pass(field, &mut self.moves);
                    if dropped == 0 || self.config.gravity == GravityPolicy::Stepwise {
                        break;
                    }
                }
                self.phase = Phase::Settle;
                PhaseOutcome::Dropped(&self.moves)
            }
            Phase::Settle => {
                self.phase = Phase::Detect;
                PhaseOutcome::Settle
            }
        }
    }

    /// Run a whole resolution without waiting between phases.
    ///
    /// Rejected as a no-op (default stats) if a resolution is already in progress.
    pub fn resolve(&mut self, field: &mut Playfield) -> ResolveStats {
        if !self.begin() {
            return ResolveStats::default();
        }
        loop {
            if let PhaseOutcome::Finished(stats) = self.advance(field) {
                return stats;
            }
        }
    }

    fn clear_matches(&mut self, field: &mut Playfield) {
        self.cleared.clear();
        let mut to_separate: ArrayVec<CapsuleId, MAX_LINKED> = ArrayVec::new();

        for &(col, row) in self.matches.cells() {
            let Some(piece) = field.grid.remove(col, row) else {
                continue;
            };
            if let Some(link) = piece.link() {
                if !to_separate.contains(&link.capsule) {
                    to_separate.push(link.capsule);
                }
            }
            self.cleared.push(ClearedPiece {
                id: piece.id,
                col,
                row,
                color: piece.color(),
                was_pathogen: piece.is_pathogen(),
            });
        }

        for id in to_separate {
            field.separate(id);
        }

        let n = self.cleared.len() as u32;
        let pathogens = self.cleared.iter().filter(|c| c.was_pathogen).count() as u32;
        self.stats.total_cleared += n;
        self.stats.pathogens_cleared += pathogens;
        self.stats.chain_count += 1;
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::HalfRole;
    use crate::types::Orientation;

    fn resolve_rows(rows: &[&str]) -> (Playfield, ResolveStats) {
        let mut field = Playfield::from_rows(rows);
        let stats = MatchEngine::default().resolve(&mut field);
        (field, stats)
    }

    #[test]
    fn run_of_four_clears_exactly_four() {
        let (field, stats) = resolve_rows(&["RRRRY..."]);
        assert_eq!(stats.total_cleared, 4);
        assert_eq!(stats.chain_count, 1);
        assert_eq!(stats.pathogens_cleared, 4);
        assert_eq!(field.grid.to_rows()[15], "....Y...");
    }

    #[test]
    fn run_of_three_clears_nothing() {
        let (field, stats) = resolve_rows(&["RRR.R..."]);
        assert_eq!(stats, ResolveStats::default());
        assert_eq!(field.grid.count_pathogens(), 4);
    }

    #[test]
    fn l_shape_without_straight_run_does_not_match() {
        let (_, stats) = resolve_rows(&["R.......", "RRR....."]);
        assert_eq!(stats.total_cleared, 0);
        assert!(find_matches(&Grid::from_rows(&["R.......", "RRR....."]), 4).is_empty());
    }

    #[test]
    fn crossing_runs_count_shared_cell_once() {
        let rows = [
            "...Y....", //
            "...Y....",
            "YYYYYY..",
            "...Y....",
        ];
        let set = find_matches(&Grid::from_rows(&rows), 4);
        assert_eq!(set.len(), 9);
        assert!(set.contains(3, 14));
    }

    #[test]
    fn diagonal_never_matches() {
        let rows = ["R...", ".R..", "..R.", "...R"];
        assert!(find_matches(&Grid::from_rows(&rows), 4).is_empty());
    }

    #[test]
    fn detached_half_falls_full_distance_in_one_step() {
        let mut field = Playfield::from_rows(&[
            "b.......", //
            "R.......",
            "R.......",
            "R.......",
            "R.......",
            "Y.......",
        ]);
        let mut engine = MatchEngine::default();
        assert!(engine.begin());
        assert!(matches!(engine.advance(&mut field), PhaseOutcome::Cleared(c) if c.len() == 4));
        match engine.advance(&mut field) {
            PhaseOutcome::Dropped(moves) => {
                assert_eq!(moves.len(), 1);
                assert_eq!(moves[0].from, (0, 10));
                assert_eq!(moves[0].to, (0, 14));
                assert_eq!(moves[0].rows(), 4);
            }
            other => panic!("expected gravity, got {:?}", other),
        }
    }

    #[test]
    fn clearing_one_half_detaches_its_sibling() {
        let mut field = Playfield::from_rows(&["RRR....."]);
        let mut c = field.new_capsule_at((Color::Blue, Color::Red), 3, 14);
        c.orientation = Orientation::Vertical;
        assert!(field.land(c));
        let sibling = c.first.piece;

        let stats = MatchEngine::default().resolve(&mut field);
        assert_eq!(stats.total_cleared, 4);
        assert!(field.capsules.is_empty());

        // The blue top half fell onto the floor and is no longer linked.
        let blue = field.grid.find(sibling).copied().unwrap();
        assert_eq!(blue.position(), (3, 15));
        assert_eq!(blue.link(), None);
    }

    #[test]
    fn capsule_falls_as_a_unit_while_its_landing_resolves() {
        let mut field = Playfield::from_rows(&[
            "........", //
            "YYYY....",
        ]);
        // Horizontal capsule resting on the yellow run at row 14, cols 1-2.
        let c = field.new_capsule_at((Color::Red, Color::Blue), 1, 14);
        assert!(field.land(c));

        let mut engine = MatchEngine::default();
        assert!(engine.begin());
        assert!(matches!(engine.advance(&mut field), PhaseOutcome::Cleared(_)));
        match engine.advance(&mut field) {
            PhaseOutcome::Dropped(moves) => assert_eq!(moves.len(), 2),
            other => panic!("expected gravity, got {:?}", other),
        }
        // Still linked until the grid is quiet.
        let first = field.grid.get(1, 15).copied().unwrap();
        assert_eq!(first.link().map(|l| l.role), Some(HalfRole::First));
        assert!(field.capsules.contains(c.id));

        assert_eq!(engine.advance(&mut field), PhaseOutcome::Settle);
        assert!(matches!(engine.advance(&mut field), PhaseOutcome::Finished(s) if s.total_cleared == 4));
        assert!(field.capsules.is_empty());
        assert!(field.grid.iter().all(|p| p.link().is_none()));
        assert_eq!(field.grid.to_rows()[15], ".rb.....");
    }

    #[test]
    fn quiet_resolution_detaches_landed_capsule() {
        let mut field = Playfield::from_rows(&["YRRR...."]);
        let c = field.new_capsule_at((Color::Blue, Color::Blue), 0, 14);
        assert!(field.land(c));

        assert_eq!(MatchEngine::default().resolve(&mut field), ResolveStats::default());
        assert!(field.capsules.is_empty());
        assert_eq!(field.grid.get(1, 14).and_then(|p| p.link()), None);

        // A later clear under one half lets it fall on its own.
        assert!(field.place_pathogen(4, 15, Color::Red));
        let stats = MatchEngine::default().resolve(&mut field);
        assert_eq!(stats.total_cleared, 4);
        assert_eq!(field.grid.find(c.second.piece).map(|p| p.position()), Some((1, 15)));
        assert_eq!(field.grid.find(c.first.piece).map(|p| p.position()), Some((0, 14)));
    }

    #[test]
    fn stepwise_policy_moves_linked_capsule_one_row_per_phase() {
        let rows = [
            "........", //
            "........",
            "YYYY....",
            "B.......",
        ];
        let mut field = Playfield::from_rows(&rows);
        let c = field.new_capsule_at((Color::Red, Color::Blue), 1, 12);
        assert!(field.land(c));

        let mut engine = MatchEngine::new(EngineConfig::default().with_gravity(GravityPolicy::Stepwise));
        let stats = engine.resolve(&mut field);
        assert_eq!(stats.chain_count, 1);
        // Only one row in the single gravity phase, then nothing to match.
        assert_eq!(field.grid.find(c.first.piece).map(|p| p.position()), Some((1, 13)));

        let mut settled = Playfield::from_rows(&rows);
        let c2 = settled.new_capsule_at((Color::Red, Color::Blue), 1, 12);
        assert!(settled.land(c2));
        MatchEngine::default().resolve(&mut settled);
        assert_eq!(settled.grid.find(c2.first.piece).map(|p| p.position()), Some((1, 15)));
    }

    #[test]
    fn begin_is_rejected_while_processing() {
        let mut field = Playfield::from_rows(&["BBBB...."]);
        let mut engine = MatchEngine::default();
        assert!(engine.begin());
        assert!(!engine.begin());
        assert!(engine.is_processing());
        assert_eq!(engine.resolve(&mut field), ResolveStats::default());
        assert_eq!(field.grid.count_pathogens(), 4);
    }

    #[test]
    fn advance_while_idle_is_a_noop() {
        let mut field = Playfield::from_rows(&["BBBB...."]);
        let mut engine = MatchEngine::default();
        assert_eq!(
            engine.advance(&mut field),
            PhaseOutcome::Finished(ResolveStats::default())
        );
        assert_eq!(field.grid.count_pathogens(), 4);
    }

    #[test]
    fn min_match_len_is_configurable() {
        let mut field = Playfield::from_rows(&["RRR....."]);
        let mut engine = MatchEngine::new(EngineConfig::default().with_min_match_len(3));
        assert_eq!(engine.resolve(&mut field).total_cleared, 3);
    }

    #[test]
    fn land_refuses_occupied_cells() {
        let mut field = Playfield::from_rows(&["R......."]);
        let c = field.new_capsule_at((Color::Red, Color::Red), 0, 15);
        assert!(!field.land(c));
        assert!(field.capsules.is_empty());
        assert_eq!(field.grid.iter().count(), 1);
    }
}
