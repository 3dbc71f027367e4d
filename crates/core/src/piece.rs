//! Piece model - pathogens and capsule halves
//!
//! Pieces are plain values stored inside the [`Grid`](crate::grid::Grid).
//! Renderers attach to them through [`PieceId`], never through ownership.
//! A piece's position is written only by the grid; outside code can read it
//! but cannot change it.

use crate::types::Color;

/// Stable identity of a piece for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

/// Identity of a capsule aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapsuleId(pub u32);

/// Which half of its capsule a linked half is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HalfRole {
    /// Anchors the capsule's base position
    First,
    Second,
}

/// Back-reference from a half to the capsule it still belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfLink {
    pub capsule: CapsuleId,
    pub role: HalfRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// Static piece; never moves, only removed by a match
    Pathogen { color: Color },
    /// One cell of a capsule. `link: None` means detached.
    Half { color: Color, link: Option<HalfLink> },
}

/// A piece as stored in the grid.
///
/// Unplaced pieces report position (-1, -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    col: i8,
    row: i8,
}

impl Piece {
    pub fn pathogen(id: PieceId, color: Color) -> Self {
        Self::unplaced(id, PieceKind::Pathogen { color })
    }

    pub fn half(id: PieceId, color: Color, link: Option<HalfLink>) -> Self {
        Self::unplaced(id, PieceKind::Half { color, link })
    }

    fn unplaced(id: PieceId, kind: PieceKind) -> Self {
        Self {
            id,
            kind,
            col: -1,
            row: -1,
        }
    }

    pub fn col(&self) -> i8 {
        self.col
    }

    pub fn row(&self) -> i8 {
        self.row
    }

    pub fn position(&self) -> (i8, i8) {
        (self.col, self.row)
    }

    /// Only the grid stamps positions.
    pub(crate) fn place_at(&mut self, col: i8, row: i8) {
        self.col = col;
        self.row = row;
    }

    pub fn color(&self) -> Color {
        match self.kind {
            PieceKind::Pathogen { color } | PieceKind::Half { color, .. } => color,
        }
    }

    pub fn is_pathogen(&self) -> bool {
        matches!(self.kind, PieceKind::Pathogen { .. })
    }

    /// The capsule link, if this is a half still attached to one
    pub fn link(&self) -> Option<HalfLink> {
        match self.kind {
            PieceKind::Half { link, .. } => link,
            PieceKind::Pathogen { .. } => None,
        }
    }

    /// Copy of this piece with its capsule link dropped.
    ///
    /// Pathogens are returned unchanged.
    pub fn detached(self) -> Self {
        match self.kind {
            PieceKind::Half { color, .. } => Self {
                kind: PieceKind::Half { color, link: None },
                ..self
            },
            PieceKind::Pathogen { .. } => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pieces_are_unplaced() {
        let p = Piece::pathogen(PieceId(1), Color::Red);
        assert_eq!(p.position(), (-1, -1));
        assert!(p.is_pathogen());
        assert_eq!(p.link(), None);
    }

    #[test]
    fn detaching_a_half_keeps_color_and_position() {
        let link = HalfLink {
            capsule: CapsuleId(7),
            role: HalfRole::Second,
        };
        let mut h = Piece::half(PieceId(2), Color::Blue, Some(link));
        h.place_at(3, 9);
        assert_eq!(h.link(), Some(link));

        let d = h.detached();
        assert_eq!(d.link(), None);
        assert_eq!(d.color(), Color::Blue);
        assert_eq!(d.position(), (3, 9));
        assert_eq!(d.id, PieceId(2));
    }

    #[test]
    fn detaching_a_pathogen_is_identity() {
        let p = Piece::pathogen(PieceId(3), Color::Yellow);
        assert_eq!(p.detached(), p);
    }
}
