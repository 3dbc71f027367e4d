//! Level setup - how many pathogens a level gets and where they go
//!
//! Pathogens are scattered over the lower part of the bottle in a random but
//! seed-determined order. A pathogen is never placed where it would complete a
//! same-colored line of three, so a fresh level never starts half-solved.

use crate::grid::Grid;
use crate::playfield::Playfield;
use crate::rng::SimpleRng;
use crate::types::{Color, GRID_HEIGHT, GRID_WIDTH, MAX_LEVEL, MAX_PATHOGENS};

/// Placement refuses a color that would make a line this long
const PLACEMENT_RUN_LIMIT: u8 = 3;

/// Number of pathogens for a level: 4 per level starting at 4, capped
pub fn pathogen_count(level: u32) -> u32 {
    ((level.min(MAX_LEVEL) + 1) * 4).min(MAX_PATHOGENS)
}

/// Highest row (smallest index) a pathogen may occupy on this level
pub fn pathogen_top_row(level: u32) -> i8 {
    match level {
        0..=14 => 6,
        15..=16 => 5,
        _ => 4,
    }
}

/// Same-colored line through (col, row) along (dc, dr), counting (col, row) itself
fn line_through(grid: &Grid, col: i8, row: i8, dc: i8, dr: i8, color: Color) -> u8 {
    let mut len = 1u8;
    for sign in [-1i8, 1] {
        let mut k = 1i8;
        while grid.color_at(col + dc * k * sign, row + dr * k * sign) == Some(color) {
            len += 1;
            k += 1;
        }
    }
    len
}

fn completes_line(grid: &Grid, col: i8, row: i8, color: Color) -> bool {
    [(1, 0), (0, 1)]
        .iter()
        .any(|&(dc, dr)| line_through(grid, col, row, dc, dr, color) >= PLACEMENT_RUN_LIMIT)
}

/// Scatter this level's pathogens into an empty playfield.
///
/// Returns how many were placed. That can fall short of
/// [`pathogen_count`] only if every remaining cell would complete a line.
pub fn populate(field: &mut Playfield, rng: &mut SimpleRng, level: u32) -> u32 {
    let target = pathogen_count(level);
    let top = pathogen_top_row(level);

    let mut candidates: Vec<(i8, i8)> = (top..GRID_HEIGHT as i8)
        .flat_map(|row| (0..GRID_WIDTH as i8).map(move |col| (col, row)))
        .collect();
    rng.shuffle(&mut candidates);

    let mut placed = 0;
    for (col, row) in candidates {
        if placed == target {
            break;
        }
        if field.grid.is_occupied(col, row) {
            continue;
        }
        let start = rng.next_range(Color::ALL.len() as u32) as usize;
        let color = (0..Color::ALL.len())
            .map(|k| Color::from_index(start + k))
            .find(|&c| !completes_line(&field.grid, col, row, c));
        if let Some(color) = color {
            if field.place_pathogen(col, row, color) {
                placed += 1;
            }
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::find_matches;

    #[test]
    fn count_grows_by_four_and_caps() {
        assert_eq!(pathogen_count(0), 4);
        assert_eq!(pathogen_count(5), 24);
        assert_eq!(pathogen_count(20), 84);
        assert_eq!(pathogen_count(99), 84);
    }

    #[test]
    fn populate_places_requested_pathogens_below_top_row() {
        for level in [0u32, 4, 10] {
            let mut field = Playfield::new();
            let mut rng = SimpleRng::new(2024 + level);
            let placed = populate(&mut field, &mut rng, level);

            assert_eq!(placed, pathogen_count(level));
            assert_eq!(field.grid.count_pathogens() as u32, placed);
            let top = pathogen_top_row(level);
            assert!(field.grid.list_pathogens().iter().all(|p| p.row() >= top));
        }
    }

    #[test]
    fn populate_fills_densest_level_nearly_completely() {
        let mut field = Playfield::new();
        let placed = populate(&mut field, &mut SimpleRng::new(31), MAX_LEVEL);
        assert!(placed <= pathogen_count(MAX_LEVEL));
        assert!(placed >= pathogen_count(14));
    }

    #[test]
    fn populate_never_leaves_a_line_of_three() {
        let mut field = Playfield::new();
        let mut rng = SimpleRng::new(77);
        populate(&mut field, &mut rng, 20);
        assert!(find_matches(&field.grid, PLACEMENT_RUN_LIMIT).is_empty());
    }

    #[test]
    fn populate_is_deterministic_per_seed() {
        let mut a = Playfield::new();
        let mut b = Playfield::new();
        populate(&mut a, &mut SimpleRng::new(5), 8);
        populate(&mut b, &mut SimpleRng::new(5), 8);
        assert_eq!(a.grid.to_rows(), b.grid.to_rows());
    }
}
