//! Capsule module - two-cell capsules and the capsule controller
//!
//! A [`Capsule`] anchors its `first` half at `(base_col, base_row)`; the
//! `second` half sits one cell right (horizontal) or one cell below (vertical).
//!
//! Movement and rotation are validated against an occupancy predicate supplied
//! by the caller, so the caller decides what counts as blocked (for a capsule
//! already written into the grid it excludes the capsule's own cells).
//!
//! Landing is the caller's call: a capsule that cannot move down has landed.

use std::collections::BTreeMap;

use crate::piece::{CapsuleId, HalfLink, HalfRole, Piece, PieceId};
use crate::types::{Color, Direction, Orientation, GRID_HEIGHT, GRID_WIDTH};

/// One half of a capsule as tracked by the capsule itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfSlot {
    pub piece: PieceId,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capsule {
    pub id: CapsuleId,
    pub first: HalfSlot,
    pub second: HalfSlot,
    pub orientation: Orientation,
    pub base_col: i8,
    pub base_row: i8,
    pub is_falling: bool,
}

impl Capsule {
    /// A falling horizontal capsule anchored at (col, row)
    pub fn new(id: CapsuleId, first: HalfSlot, second: HalfSlot, col: i8, row: i8) -> Self {
        Self {
            id,
            first,
            second,
            orientation: Orientation::Horizontal,
            base_col: col,
            base_row: row,
            is_falling: true,
        }
    }

    pub fn first_pos(&self) -> (i8, i8) {
        (self.base_col, self.base_row)
    }

    pub fn second_pos(&self) -> (i8, i8) {
        let (dc, dr) = self.orientation.second_offset();
        (self.base_col + dc, self.base_row + dr)
    }

    /// Both cells, first half first
    pub fn cells(&self) -> [(i8, i8); 2] {
        [self.first_pos(), self.second_pos()]
    }

    pub fn contains(&self, col: i8, row: i8) -> bool {
        self.cells().contains(&(col, row))
    }

    pub fn slot(&self, role: HalfRole) -> HalfSlot {
        match role {
            HalfRole::First => self.first,
            HalfRole::Second => self.second,
        }
    }

    /// The two halves as linked grid pieces, first half first
    pub fn linked_pieces(&self) -> [Piece; 2] {
        let link = |role| {
            Some(HalfLink {
                capsule: self.id,
                role,
            })
        };
        [
            Piece::half(self.first.piece, self.first.color, link(HalfRole::First)),
            Piece::half(self.second.piece, self.second.color, link(HalfRole::Second)),
        ]
    }
}

fn in_bounds(col: i8, row: i8) -> bool {
    col >= 0 && col < GRID_WIDTH as i8 && row >= 0 && row < GRID_HEIGHT as i8
}

fn cells_free(cells: &[(i8, i8)], is_occupied: &impl Fn(i8, i8) -> bool) -> bool {
    cells
        .iter()
        .all(|&(c, r)| in_bounds(c, r) && !is_occupied(c, r))
}

/// Check whether the capsule could take one step in `direction`
pub fn can_move(capsule: &Capsule, direction: Direction, is_occupied: impl Fn(i8, i8) -> bool) -> bool {
    let (dc, dr) = direction.delta();
    let targets = capsule.cells().map(|(c, r)| (c + dc, r + dr));
    cells_free(&targets, &is_occupied)
}

/// Move the capsule one step if [`can_move`] allows it
pub fn try_move(
    capsule: &mut Capsule,
    direction: Direction,
    is_occupied: impl Fn(i8, i8) -> bool,
) -> bool {
    if !can_move(capsule, direction, is_occupied) {
        return false;
    }
    let (dc, dr) = direction.delta();
    capsule.base_col += dc;
    capsule.base_row += dr;
    true
}

/// Rotate the capsule 90° clockwise.
///
/// Horizontal to vertical: the left half stays put as the top half, the right
/// half moves below it. Vertical to horizontal: the top half stays put as the
/// left half, the bottom half moves to its right. The half that stays put keeps
/// anchoring the capsule as `first`; since `first` is always the left or top
/// half, four rotations return the capsule to where it started.
///
/// There is no wall kick. The capsule's own cells do not block.
pub fn rotate(capsule: &mut Capsule, is_occupied: impl Fn(i8, i8) -> bool) -> bool {
    let anchor = capsule.first_pos();
    let next = capsule.orientation.rotate_cw();
    let (dc, dr) = next.second_offset();
    let targets = [anchor, (anchor.0 + dc, anchor.1 + dr)];

    let own = capsule.cells();
    if !cells_free(&targets, &|c, r| !own.contains(&(c, r)) && is_occupied(c, r)) {
        return false;
    }

    capsule.orientation = next;
    true
}

/// Landed capsules whose halves are still linked inside the grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapsuleRegistry {
    capsules: BTreeMap<CapsuleId, Capsule>,
}

impl CapsuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, capsule: Capsule) {
        self.capsules.insert(capsule.id, capsule);
    }

    pub fn get(&self, id: CapsuleId) -> Option<&Capsule> {
        self.capsules.get(&id)
    }

    pub fn get_mut(&mut self, id: CapsuleId) -> Option<&mut Capsule> {
        self.capsules.get_mut(&id)
    }

    pub fn remove(&mut self, id: CapsuleId) -> Option<Capsule> {
        self.capsules.remove(&id)
    }

    pub fn contains(&self, id: CapsuleId) -> bool {
        self.capsules.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.capsules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capsules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capsule> + '_ {
        self.capsules.values()
    }

    pub fn clear(&mut self) {
        self.capsules.clear();
    }
}
