use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_capsule::core::{find_matches, GameState, MatchEngine, Playfield};
use tui_capsule::types::{Color, GameAction, MIN_MATCH_LEN};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

// One test per binary: the counter is global, so parallel tests would race.
#[test]
fn falling_and_resolving_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let mut gs = GameState::new(1);
    gs.start();
    gs.playfield_mut().clear();
    gs.playfield_mut().place_pathogen(0, 15, Color::Red);

    let chain = Playfield::from_rows(&[
        "b.......", //
        "R.......",
        "R.......",
        "R.......",
        "R.......",
        ".BBB....",
    ]);
    let mut engine = MatchEngine::default();
    let mut warm = chain.clone();
    engine.resolve(&mut warm);
    let mut field = chain.clone();

    let allocs = with_alloc_counting(|| {
        // The capsule falls a few rows without landing.
        for _ in 0..100 {
            let _ = gs.tick(16, false);
        }
        for _ in 0..50 {
            let _ = gs.apply_action(GameAction::MoveLeft);
            let _ = gs.apply_action(GameAction::MoveRight);
            let _ = gs.apply_action(GameAction::RotateCw);
        }

        let _ = find_matches(&field.grid, MIN_MATCH_LEN);
        let stats = engine.resolve(&mut field);
        assert_eq!(stats.chain_count, 2);
    });

    assert_eq!(allocs, 0);
}
