//! Driving the match engine from an async animator.
//!
//! The engine never waits on its own: each `advance` returns what happened and
//! the caller decides how long to wait before resuming. Here a tokio task plays
//! the animator, sleeping for each phase, while the grid stays untouched in
//! between.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tui_capsule::core::{MatchEngine, PhaseOutcome, Playfield, ResolveStats};
use tui_capsule::types::{CLEAR_ANIM_MS, GRAVITY_STEP_MS, SETTLE_MS};

#[derive(Debug, Default)]
struct Timeline {
    clears: Vec<usize>,
    drops: Vec<usize>,
    settles: u32,
}

async fn animate(engine: &mut MatchEngine, field: &mut Playfield, timeline: &mut Timeline) -> ResolveStats {
    assert!(engine.begin());
    loop {
        let wait = match engine.advance(field) {
            PhaseOutcome::Cleared(cleared) => {
                timeline.clears.push(cleared.len());
                CLEAR_ANIM_MS
            }
            PhaseOutcome::Dropped(moves) => {
                timeline.drops.push(moves.len());
                GRAVITY_STEP_MS
            }
            PhaseOutcome::Settle => {
                timeline.settles += 1;
                SETTLE_MS
            }
            PhaseOutcome::Finished(stats) => return stats,
        };
        // Suspended: the grid is already final for this phase.
        let snapshot = field.clone();
        sleep(Duration::from_millis(wait as u64)).await;
        assert_eq!(*field, snapshot);
        assert!(engine.is_processing());
    }
}

#[tokio::test(start_paused = true)]
async fn chain_resolves_across_suspension_points() {
    let mut field = Playfield::from_rows(&[
        "b.......", //
        "R.......",
        "R.......",
        "R.......",
        "R.......",
        ".BBB....",
    ]);
    let mut engine = MatchEngine::default();
    let mut timeline = Timeline::default();

    let started = Instant::now();
    let stats = animate(&mut engine, &mut field, &mut timeline).await;

    assert_eq!(stats.chain_count, 2);
    assert_eq!(stats.total_cleared, 8);
    assert_eq!(timeline.clears, vec![4, 4]);
    assert_eq!(timeline.drops, vec![1, 0]);
    assert_eq!(timeline.settles, 2);

    let expected = 2 * (CLEAR_ANIM_MS + GRAVITY_STEP_MS + SETTLE_MS);
    assert!(started.elapsed() >= Duration::from_millis(expected as u64));
}

#[tokio::test(start_paused = true)]
async fn second_begin_is_rejected_while_suspended() {
    let mut field = Playfield::from_rows(&["YYYY...."]);
    let mut engine = MatchEngine::default();
    assert!(engine.begin());
    assert!(matches!(engine.advance(&mut field), PhaseOutcome::Cleared(_)));

    let waiter = tokio::spawn(async {
        sleep(Duration::from_millis(CLEAR_ANIM_MS as u64)).await;
    });
    // A landing during the clear animation must not start another resolution.
    assert!(!engine.begin());
    assert_eq!(engine.resolve(&mut field), ResolveStats::default());
    waiter.await.unwrap();

    let mut last = None;
    while engine.is_processing() {
        if let PhaseOutcome::Finished(stats) = engine.advance(&mut field) {
            last = Some(stats);
        }
    }
    assert_eq!(last.map(|s| s.total_cleared), Some(4));
}

#[tokio::test]
async fn matchless_grid_finishes_without_suspending() {
    let mut field = Playfield::from_rows(&["RYBRYBRY"]);
    let before = field.clone();
    let mut engine = MatchEngine::default();
    let mut timeline = Timeline::default();

    let stats = animate(&mut engine, &mut field, &mut timeline).await;
    assert_eq!(stats, ResolveStats::default());
    assert!(timeline.clears.is_empty() && timeline.drops.is_empty());
    assert_eq!(field, before);
}
