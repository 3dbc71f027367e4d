//! Grid module - the authoritative piece store
//!
//! The grid is an 8x16 array where each cell is empty or holds one [`Piece`].
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (col, row) where col ranges 0..7 (left to right), row ranges 0..15
//! (top to bottom).
//!
//! The grid is the only writer of piece positions: [`Grid::set`] stamps the
//! stored piece with the coordinates it was written to, so for every stored
//! piece `grid.get(p.col(), p.row()) == Some(&p)`.

use crate::piece::{Piece, PieceId};
use crate::types::{Color, BOTTLENECK_ROW, GRID_CELLS, GRID_HEIGHT, GRID_WIDTH};

/// The game grid - 8 columns x 16 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Option<Piece>; GRID_CELLS],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_CELLS],
        }
    }

    /// Calculate flat index from (col, row) coordinates
    #[inline(always)]
    pub(crate) fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= GRID_WIDTH as i8 || row < 0 || row >= GRID_HEIGHT as i8 {
            return None;
        }
        Some((row as usize) * (GRID_WIDTH as usize) + (col as usize))
    }

    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> u8 {
        GRID_HEIGHT
    }

    /// Piece at (col, row). Out of bounds reads as empty.
    pub fn get(&self, col: i8, row: i8) -> Option<&Piece> {
        Self::index(col, row).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Color at (col, row), `None` when empty or out of bounds
    pub fn color_at(&self, col: i8, row: i8) -> Option<Color> {
        self.get(col, row).map(Piece::color)
    }

    /// Write a piece (or clear with `None`) at (col, row).
    ///
    /// A written piece has its position updated to (col, row).
    /// Returns false if out of bounds.
    pub fn set(&mut self, col: i8, row: i8, piece: Option<Piece>) -> bool {
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = piece.map(|mut p| {
                    p.place_at(col, row);
                    p
                });
                true
            }
            None => false,
        }
    }

    /// Take the piece out of (col, row), returning what was there
    pub fn remove(&mut self, col: i8, row: i8) -> Option<Piece> {
        Self::index(col, row).and_then(|idx| self.cells[idx].take())
    }

    /// Move whatever is at `from` to `to`.
    ///
    /// Returns false (and changes nothing) if `from` is empty or `to` is
    /// out of bounds or occupied.
    pub fn move_piece(&mut self, from: (i8, i8), to: (i8, i8)) -> bool {
        if !self.is_empty(to.0, to.1) {
            return false;
        }
        match self.remove(from.0, from.1) {
            Some(piece) => self.set(to.0, to.1, Some(piece)),
            None => false,
        }
    }

    /// Check if position is inside the grid
    pub fn is_valid(&self, col: i8, row: i8) -> bool {
        Self::index(col, row).is_some()
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, col: i8, row: i8) -> bool {
        self.get(col, row).is_some()
    }

    /// Check if position is empty (within bounds and not filled)
    pub fn is_empty(&self, col: i8, row: i8) -> bool {
        self.is_valid(col, row) && !self.is_occupied(col, row)
    }

    /// Iterate all placed pieces in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().filter_map(Option::as_ref)
    }

    /// Find a piece by identity
    pub fn find(&self, id: PieceId) -> Option<&Piece> {
        self.iter().find(|p| p.id == id)
    }

    pub fn count_pathogens(&self) -> usize {
        self.iter().filter(|p| p.is_pathogen()).count()
    }

    /// All pathogens, row-major
    pub fn list_pathogens(&self) -> Vec<Piece> {
        self.iter().filter(|p| p.is_pathogen()).copied().collect()
    }

    /// True iff no piece sits in rows `0..BOTTLENECK_ROW`.
    ///
    /// The round controller uses this as its loss predicate.
    pub fn is_bottleneck_clear(&self) -> bool {
        let end = (BOTTLENECK_ROW as usize) * (GRID_WIDTH as usize);
        self.cells[..end].iter().all(Option::is_none)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Option<Piece>] {
        &self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Build a grid from text rows, bottom-aligned.
    ///
    /// The last row given lands on the bottom row of the grid. Characters:
    /// `.` empty, `R`/`Y`/`B` pathogen, `r`/`y`/`b` detached capsule half.
    /// Piece ids are assigned 1, 2, ... in row-major order. Rows longer than
    /// the grid are truncated; unknown characters read as empty.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut grid = Self::new();
        let mut next_id = 1u32;
        let skip = rows.len().saturating_sub(GRID_HEIGHT as usize);
        let top = (GRID_HEIGHT as usize).saturating_sub(rows.len());

        for (i, line) in rows.iter().skip(skip).enumerate() {
            let row = (top + i) as i8;
            for (col, ch) in line.chars().take(GRID_WIDTH as usize).enumerate() {
                let Some(color) = Color::from_str(&ch.to_string()) else {
                    continue;
                };
                let id = PieceId(next_id);
                let piece = if ch.is_ascii_uppercase() {
                    Piece::pathogen(id, color)
                } else {
                    Piece::half(id, color, None)
                };
                grid.set(col as i8, row, Some(piece));
                next_id += 1;
            }
        }
        grid
    }

    /// Render the grid as text rows (top to bottom), inverse of [`Grid::from_rows`].
    ///
    /// Linked halves render the same as detached ones.
    pub fn to_rows(&self) -> Vec<String> {
        (0..GRID_HEIGHT as i8)
            .map(|row| {
                (0..GRID_WIDTH as i8)
                    .map(|col| match self.get(col, row) {
                        None => '.',
                        Some(p) => {
                            let ch = match p.color() {
                                Color::Red => 'r',
                                Color::Yellow => 'y',
                                Color::Blue => 'b',
                            };
                            if p.is_pathogen() {
                                ch.to_ascii_uppercase()
                            } else {
                                ch
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
