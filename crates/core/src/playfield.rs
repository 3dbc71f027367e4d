//! Playfield - the grid together with the capsules still linked inside it
//!
//! Hands out piece and capsule ids so they stay unique per playfield, and
//! owns the landing step that turns a falling capsule into grid pieces.
//! A capsule is registered only while the resolution its landing started
//! is running; outside of that every half in the grid is detached.

use crate::capsule::{Capsule, CapsuleRegistry, HalfSlot};
use crate::grid::Grid;
use crate::piece::{CapsuleId, Piece, PieceId};
use crate::types::{Color, SPAWN_COL, SPAWN_ROW};

/// The grid plus the registry of capsules still linked inside it.
///
/// Also hands out piece and capsule ids so they stay unique per playfield.
#[derive(Debug, Clone, PartialEq)]
pub struct Playfield {
    pub grid: Grid,
    pub capsules: CapsuleRegistry,
    next_piece_id: u32,
    next_capsule_id: u32,
}

impl Playfield {
    pub fn new() -> Self {
        Self::with_grid(Grid::new())
    }

    /// Wrap an existing grid. New ids start past the largest id in it.
    pub fn with_grid(grid: Grid) -> Self {
        let max_id = grid.iter().map(|p| p.id.0).max().unwrap_or(0);
        Self {
            grid,
            capsules: CapsuleRegistry::new(),
            next_piece_id: max_id + 1,
            next_capsule_id: 1,
        }
    }

    /// Shorthand for `Playfield::with_grid(Grid::from_rows(rows))`
    pub fn from_rows(rows: &[&str]) -> Self {
        Self::with_grid(Grid::from_rows(rows))
    }

    pub fn alloc_piece_id(&mut self) -> PieceId {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id = self.next_piece_id.wrapping_add(1);
        id
    }

    fn alloc_capsule_id(&mut self) -> CapsuleId {
        let id = CapsuleId(self.next_capsule_id);
        self.next_capsule_id = self.next_capsule_id.wrapping_add(1);
        id
    }

    /// Place a new pathogen. Returns false if the cell is out of bounds or taken.
    pub fn place_pathogen(&mut self, col: i8, row: i8, color: Color) -> bool {
        if !self.grid.is_empty(col, row) {
            return false;
        }
        let id = self.alloc_piece_id();
        self.grid.set(col, row, Some(Piece::pathogen(id, color)))
    }

    /// A new falling capsule at the spawn position (not yet in the grid)
    pub fn spawn_capsule(&mut self, colors: (Color, Color)) -> Capsule {
        self.new_capsule_at(colors, SPAWN_COL, SPAWN_ROW)
    }

    /// A new falling horizontal capsule anchored at (col, row) (not yet in the grid)
    pub fn new_capsule_at(&mut self, colors: (Color, Color), col: i8, row: i8) -> Capsule {
        let id = self.alloc_capsule_id();
        let first = HalfSlot {
            piece: self.alloc_piece_id(),
            color: colors.0,
        };
        let second = HalfSlot {
            piece: self.alloc_piece_id(),
            color: colors.1,
        };
        Capsule::new(id, first, second, col, row)
    }

    /// Write a landed capsule's halves into the grid, still linked, and
    /// register the capsule.
    ///
    /// The halves stay linked only for the resolution this landing starts;
    /// the engine detaches every registered capsule once the grid is quiet.
    ///
    /// Returns false (and writes nothing) if either cell is out of bounds or taken.
    pub fn land(&mut self, mut capsule: Capsule) -> bool {
        let cells = capsule.cells();
        if !cells.iter().all(|&(c, r)| self.grid.is_empty(c, r)) {
            return false;
        }
        capsule.is_falling = false;
        for (piece, (c, r)) in capsule.linked_pieces().into_iter().zip(cells) {
            self.grid.set(c, r, Some(piece));
        }
        self.capsules.insert(capsule);
        true
    }

    /// Drop every piece and capsule
    pub fn clear(&mut self) {
        self.grid.clear();
        self.capsules.clear();
    }

    /// Drop a capsule from the registry; its halves still in the grid become detached.
    pub(crate) fn separate(&mut self, id: CapsuleId) {
        let Some(capsule) = self.capsules.remove(id) else {
            return;
        };
        for ((c, r), slot) in capsule.cells().into_iter().zip([capsule.first, capsule.second]) {
            if let Some(piece) = self.grid.get(c, r).copied() {
                if piece.id == slot.piece {
                    self.grid.set(c, r, Some(piece.detached()));
                }
            }
        }
    }

    /// Detach the halves of every registered capsule and empty the registry
    pub(crate) fn separate_all(&mut self) {
        for capsule in self.capsules.iter() {
            for ((c, r), slot) in capsule.cells().into_iter().zip([capsule.first, capsule.second]) {
                if let Some(piece) = self.grid.get(c, r).copied() {
                    if piece.id == slot.piece {
                        self.grid.set(c, r, Some(piece.detached()));
                    }
                }
            }
        }
        self.capsules.clear();
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}
