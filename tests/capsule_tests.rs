//! Capsule controller tests - movement, rotation and landing

use tui_capsule::core::{can_move, rotate, try_move, Capsule, HalfRole, Playfield};
use tui_capsule::types::{Color, Direction, Orientation, GRID_HEIGHT, GRID_WIDTH};

fn capsule_at(field: &mut Playfield, col: i8, row: i8) -> Capsule {
    field.new_capsule_at((Color::Red, Color::Blue), col, row)
}

#[test]
fn test_move_along_empty_grid() {
    let mut field = Playfield::new();
    let mut c = capsule_at(&mut field, 3, 0);
    let grid = field.grid.clone();
    let occupied = |col, row| grid.is_occupied(col, row);

    assert!(try_move(&mut c, Direction::Left, occupied));
    assert_eq!(c.first_pos(), (2, 0));
    assert!(try_move(&mut c, Direction::Down, occupied));
    assert_eq!(c.cells(), [(2, 1), (3, 1)]);
}

#[test]
fn test_walls_and_floor_block() {
    let mut field = Playfield::new();
    let grid = field.grid.clone();
    let occupied = |col, row| grid.is_occupied(col, row);

    let left = capsule_at(&mut field, 0, 5);
    assert!(!can_move(&left, Direction::Left, occupied));

    let right = capsule_at(&mut field, GRID_WIDTH as i8 - 2, 5);
    assert!(!can_move(&right, Direction::Right, occupied));

    let mut floor = capsule_at(&mut field, 2, GRID_HEIGHT as i8 - 1);
    assert!(!try_move(&mut floor, Direction::Down, occupied));
    assert_eq!(floor.base_row, GRID_HEIGHT as i8 - 1);
}

#[test]
fn test_pieces_block_movement() {
    let mut field = Playfield::from_rows(&["....Y..."]);
    let c = capsule_at(&mut field, 3, 14);
    let grid = &field.grid;
    // Second half sits above the pathogen at (4,15).
    assert!(!can_move(&c, Direction::Down, |col, row| grid.is_occupied(col, row)));
    assert!(can_move(&c, Direction::Left, |col, row| grid.is_occupied(col, row)));
}

#[test]
fn test_four_rotations_restore_capsule() {
    let mut field = Playfield::new();
    let mut c = capsule_at(&mut field, 3, 6);
    let original = c;
    let grid = field.grid.clone();

    for _ in 0..4 {
        assert!(rotate(&mut c, |col, row| grid.is_occupied(col, row)));
    }
    assert_eq!(c.orientation, original.orientation);
    assert_eq!((c.base_col, c.base_row), (original.base_col, original.base_row));
    assert_eq!(c.slot(HalfRole::First), original.slot(HalfRole::First));
    assert_eq!(c.slot(HalfRole::Second), original.slot(HalfRole::Second));
}

#[test]
fn test_rotation_blocked_by_piece_leaves_capsule_unchanged() {
    // Vertical target (3,15) is a pathogen.
    let mut field = Playfield::from_rows(&["...B...."]);
    let mut c = capsule_at(&mut field, 3, 14);
    let before = c;
    let grid = &field.grid;
    assert!(!rotate(&mut c, |col, row| grid.is_occupied(col, row)));
    assert_eq!(c, before);
}

#[test]
fn test_vertical_at_right_wall_cannot_rotate_out() {
    let mut field = Playfield::new();
    let mut c = capsule_at(&mut field, GRID_WIDTH as i8 - 1, 4);
    c.orientation = Orientation::Vertical;
    let grid = field.grid.clone();
    // Horizontal would put the second half past the wall; no kick.
    assert!(!rotate(&mut c, |col, row| grid.is_occupied(col, row)));
    assert_eq!(c.orientation, Orientation::Vertical);
}

#[test]
fn test_landing_links_halves_into_grid() {
    let mut field = Playfield::new();
    let c = capsule_at(&mut field, 0, GRID_HEIGHT as i8 - 1);
    assert!(field.land(c));

    let first = field.grid.get(0, 15).copied().unwrap();
    let second = field.grid.get(1, 15).copied().unwrap();
    assert_eq!(first.link().map(|l| (l.capsule, l.role)), Some((c.id, HalfRole::First)));
    assert_eq!(second.link().map(|l| (l.capsule, l.role)), Some((c.id, HalfRole::Second)));
    assert_eq!(first.color(), Color::Red);
    assert_eq!(second.color(), Color::Blue);
    assert!(field.capsules.contains(c.id));

    // Landing again onto the same cells is refused.
    assert!(!field.land(c));
}
