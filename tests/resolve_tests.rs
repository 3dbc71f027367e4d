//! Match resolution tests - detect, clear, gravity and chains

use tui_capsule::core::{
    find_matches, EngineConfig, GravityPolicy, MatchEngine, Phase, PhaseOutcome, Playfield,
    ResolveStats,
};
use tui_capsule::types::{Color, Orientation};

#[test]
fn test_chain_reaction_counts_both_clears() {
    // Clearing the red column lets the blue half drop next to three blue pathogens.
    let mut field = Playfield::from_rows(&[
        "b.......", //
        "R.......",
        "R.......",
        "R.......",
        "R.......",
        ".BBB....",
    ]);
    let stats = MatchEngine::default().resolve(&mut field);

    assert_eq!(stats.chain_count, 2);
    assert_eq!(stats.total_cleared, 4 + 4);
    assert_eq!(stats.pathogens_cleared, 7);
    assert_eq!(field.grid.iter().count(), 0);
}

#[test]
fn test_resolve_without_matches_is_idempotent() {
    let rows = [
        "..y.....", //
        "RRRB....",
        "YYBBB...",
    ];
    let mut field = Playfield::from_rows(&rows);
    let before = field.clone();

    let stats = MatchEngine::default().resolve(&mut field);
    assert_eq!(stats, ResolveStats::default());
    assert_eq!(field, before);
}

#[test]
fn test_row_of_capsule_halves_clears_with_new_vertical_capsule() {
    let mut field = Playfield::new();
    let a = field.new_capsule_at((Color::Red, Color::Red), 0, 10);
    let b = field.new_capsule_at((Color::Red, Color::Red), 2, 10);
    assert!(field.land(a));
    assert!(field.land(b));

    // Vertical red capsule lands right of the row, bottom half in row 10.
    let mut v = field.new_capsule_at((Color::Red, Color::Red), 4, 9);
    v.orientation = Orientation::Vertical;
    assert!(field.land(v));
    let top_half = v.first.piece;

    let stats = MatchEngine::default().resolve(&mut field);
    assert!(stats.total_cleared >= 4);
    assert_eq!(stats.total_cleared, 5);
    assert_eq!(stats.pathogens_cleared, 0);

    for col in 0..5 {
        assert!(field.grid.get(col, 10).is_none(), "col {} row 10 cleared", col);
    }
    // Every capsule lost a half, so none remain linked.
    assert!(field.capsules.is_empty());
    let survivor = field.grid.find(top_half).copied().unwrap();
    assert_eq!(survivor.position(), (4, 15));
    assert_eq!(survivor.link(), None);
}

#[test]
fn test_vertical_run_of_four_halves_and_pathogens() {
    let mut field = Playfield::from_rows(&[
        "..y.....", //
        "..y.....",
        "..Y.....",
        "..Y.....",
    ]);
    let stats = MatchEngine::default().resolve(&mut field);
    assert_eq!(stats.total_cleared, 4);
    assert_eq!(stats.pathogens_cleared, 2);
}

#[test]
fn test_longer_run_clears_entirely() {
    let set = find_matches(&Playfield::from_rows(&["BBBBBBB."]).grid, 4);
    assert_eq!(set.len(), 7);
    assert!(!set.contains(7, 15));
}

#[test]
fn test_half_of_earlier_capsule_falls_alone_when_support_clears() {
    let mut field = Playfield::from_rows(&["..BRRR..", "..YBYB.."]);
    // Resting on the blue pathogen (left) and the red run (right).
    let old = field.new_capsule_at((Color::Yellow, Color::Blue), 2, 13);
    assert!(field.land(old));
    assert_eq!(MatchEngine::default().resolve(&mut field), ResolveStats::default());
    assert!(field.capsules.is_empty());

    // A red capsule completes the run under the old capsule's right half.
    let red = field.new_capsule_at((Color::Red, Color::Red), 6, 14);
    assert!(field.land(red));
    let stats = MatchEngine::default().resolve(&mut field);

    assert_eq!(stats.total_cleared, 5);
    assert_eq!(stats.chain_count, 1);
    let left = field.grid.find(old.first.piece).copied().unwrap();
    let right = field.grid.find(old.second.piece).copied().unwrap();
    assert_eq!(left.position(), (2, 13));
    assert_eq!(right.position(), (3, 14));
    assert_eq!(right.link(), None);
    assert!(field.capsules.is_empty());
}

#[test]
fn test_phases_report_each_step() {
    let mut field = Playfield::from_rows(&[
        "y.......", //
        "........",
        "RRRR....",
    ]);
    let mut engine = MatchEngine::new(EngineConfig::default().with_gravity(GravityPolicy::Settle));
    assert!(engine.begin());
    assert_eq!(engine.phase(), Phase::Detect);

    match engine.advance(&mut field) {
        PhaseOutcome::Cleared(cleared) => {
            assert_eq!(cleared.len(), 4);
            assert!(cleared.iter().all(|c| c.color == Color::Red && c.was_pathogen));
        }
        other => panic!("expected clear, got {:?}", other),
    }
    assert_eq!(engine.phase(), Phase::Gravity);

    match engine.advance(&mut field) {
        PhaseOutcome::Dropped(moves) => {
            assert_eq!(moves.len(), 1);
            assert_eq!(moves[0].from, (0, 13));
            assert_eq!(moves[0].to, (0, 15));
        }
        other => panic!("expected drop, got {:?}", other),
    }
    assert_eq!(engine.advance(&mut field), PhaseOutcome::Settle);
    assert!(matches!(engine.advance(&mut field), PhaseOutcome::Finished(s) if s.total_cleared == 4));
    assert!(!engine.is_processing());
}
