//! End-to-end tests for the petri simulation engine.
//!
//! Each test drives the public surface the way a host shell would:
//! edit cells, start/pause/reset, and observe broadcasts through a
//! registered recorder.

use std::time::{Duration, Instant};

use petri_engine::RunState;
use petri_tests::TestHarness;

/// A freshly constructed grid has every cell dead.
#[test]
fn test_fresh_grid_is_dead() {
    let harness = TestHarness::from_size(6, 4);
    assert_eq!(harness.sim.grid().population(), 0);
    for y in 0..4 {
        for x in 0..6 {
            assert!(!harness.alive(x, y));
        }
    }
}

/// Toggling twice returns a cell to its original state, and every toggle
/// broadcasts exactly once.
#[test]
fn test_toggle_round_trip_broadcasts() {
    let mut harness = TestHarness::from_size(4, 4);
    harness.sim.toggle_cell(1, 2).unwrap();
    assert!(harness.alive(1, 2));
    harness.sim.toggle_cell(1, 2).unwrap();
    assert!(!harness.alive(1, 2));
    assert_eq!(harness.broadcasts(), 2);
    assert_eq!(harness.edits(), 2);
    assert_eq!(harness.advances(), 0);
}

/// Resize keeps the overlap (boundary inclusive) and discards the rest.
#[test]
fn test_resize_keeps_overlap() {
    let mut harness = TestHarness::from_size(5, 5);
    harness.sim.toggle_cell(2, 2).unwrap();

    harness.sim.set_size(3, 3).unwrap();
    assert!(harness.alive(2, 2));
    assert_eq!(harness.sim.grid().population(), 1);

    harness.sim.set_size(2, 2).unwrap();
    assert_eq!(harness.sim.grid().population(), 0);
}

/// The blinker oscillates with period 2 on a bounded grid.
#[test]
fn test_blinker_period_two() {
    let mut harness = TestHarness::from_rows(&[
        ".....",
        ".....",
        ".###.",
        ".....",
        ".....",
    ]);

    harness.run_ticks(1);
    assert_eq!(
        harness.grid_string(),
        ".....\n..#..\n..#..\n..#..\n....."
    );

    harness.run_ticks(1);
    assert_eq!(
        harness.grid_string(),
        ".....\n.....\n.###.\n.....\n....."
    );
}

/// A blinker lying across the toroidal seam still oscillates.
#[test]
fn test_blinker_across_wrapped_edge() {
    let mut harness = TestHarness::from_rows(&[
        ".....",
        ".....",
        "##..#",
        ".....",
        ".....",
    ]);
    harness.sim.set_wrap_around(true);

    harness.run_ticks(1);
    assert_eq!(
        harness.grid_string(),
        ".....\n#....\n#....\n#....\n....."
    );

    harness.run_ticks(1);
    assert_eq!(
        harness.grid_string(),
        ".....\n.....\n##..#\n.....\n....."
    );
}

/// The glider translates one cell down-right every four generations.
#[test]
fn test_glider_travels() {
    let mut harness = TestHarness::from_rows(&[
        "........",
        "..#.....",
        "...#....",
        ".###....",
        "........",
        "........",
        "........",
        "........",
    ]);

    harness.run_ticks(4);
    assert_eq!(
        harness.grid_string(),
        "........\n\
         ........\n\
         ...#....\n\
         ....#...\n\
         ..###...\n\
         ........\n\
         ........\n\
         ........"
    );
}

/// A 2x2 block away from the edges never changes.
#[test]
fn test_block_never_changes() {
    let mut harness = TestHarness::from_rows(&[
        "......",
        "..##..",
        "..##..",
        "......",
    ]);
    let block = harness.grid_string();
    for _ in 0..8 {
        harness.run_ticks(1);
        assert_eq!(harness.grid_string(), block);
    }
}

/// `start` broadcasts the pre-simulation state once, as an edit broadcast
/// (current and previous are the same buffer).
#[test]
fn test_start_broadcasts_pre_simulation_state() {
    let mut harness = TestHarness::from_rows(&["##.", "##.", "..."]);
    let seeded_broadcasts = harness.broadcasts();

    harness.sim.start();
    assert!(harness.sim.is_running());
    assert_eq!(harness.broadcasts(), seeded_broadcasts + 1);
    assert_eq!(harness.advances(), 0);
    assert_eq!(harness.last_broadcast_population(), 4);

    harness.run_ticks(1);
    assert_eq!(harness.advances(), 1);
}

/// Pausing cancels the clock: arbitrarily late pumps run zero ticks and
/// the generation counter stays put.
#[test]
fn test_pause_produces_no_further_ticks() {
    let mut harness = TestHarness::from_size(4, 4);
    harness.sim.start();
    harness.run_ticks(2);
    harness.sim.pause();
    assert_eq!(harness.sim.run_state(), RunState::Paused);

    let much_later = Instant::now() + Duration::from_secs(3600);
    assert_eq!(harness.sim.pump_at(much_later).unwrap(), 0);
    assert_eq!(harness.sim.generation(), 2);
}

/// Reset restores the snapshot captured at the most recent `start`, at
/// generation zero, back in the Editing state.
#[test]
fn test_reset_restores_start_snapshot() {
    let mut harness = TestHarness::from_rows(&[
        ".....",
        ".....",
        ".###.",
        ".....",
        ".....",
    ]);
    let seeded = harness.grid_string();

    harness.sim.start();
    harness.run_ticks(3);
    assert_ne!(harness.grid_string(), seeded);

    harness.sim.reset();
    assert_eq!(harness.sim.generation(), 0);
    assert_eq!(harness.sim.run_state(), RunState::Editing);
    assert_eq!(harness.grid_string(), seeded);

    // The snapshot survives repeated resets.
    harness.sim.start();
    harness.run_ticks(1);
    harness.sim.reset();
    assert_eq!(harness.grid_string(), seeded);
}

/// A removed observer receives nothing further; removing an unknown
/// observer fails without side effects.
#[test]
fn test_observer_removal() {
    let mut harness = TestHarness::from_size(4, 4);
    harness.sim.toggle_cell(0, 0).unwrap();
    assert_eq!(harness.broadcasts(), 1);

    assert!(harness.unregister());
    harness.sim.toggle_cell(0, 0).unwrap();
    harness.sim.start();
    harness.run_ticks(2);
    assert_eq!(harness.broadcasts(), 1);

    // Already removed: reports failure, changes nothing.
    assert!(!harness.unregister());
}

/// Editing while Running is permitted; the edited generation is consumed
/// as the source of the very next tick.
#[test]
fn test_toggle_while_running_is_overwritten() {
    let mut harness = TestHarness::from_size(5, 5);
    harness.sim.start();

    harness.sim.toggle_cell(2, 2).unwrap();
    assert_eq!(harness.last_broadcast_population(), 1);

    // The lone cell has no neighbors, so the next generation clears it.
    harness.run_ticks(1);
    assert_eq!(harness.last_broadcast_population(), 0);
    assert_eq!(harness.sim.grid().population(), 0);
}

/// Changing the tick rate mid-run keeps the engine running and does not
/// advance or rewind the generation counter.
#[test]
fn test_rate_change_preserves_generation() {
    let mut harness = TestHarness::from_size(4, 4);
    harness.sim.start();
    harness.run_ticks(2);

    harness.sim.set_updates_per_second(30.0).unwrap();
    assert!(harness.sim.is_running());
    assert_eq!(harness.sim.generation(), 2);
    assert_eq!(harness.sim.ups(), 30.0);

    // Immediately after the swap nothing is due yet.
    assert_eq!(harness.sim.pump_at(Instant::now()).unwrap(), 0);
}

/// Wraparound changes apply to the next tick's neighbor counting.
#[test]
fn test_wraparound_changes_next_tick() {
    // Row along the top edge: bounded, the ends die and nothing is born
    // above; wrapped, it behaves like an interior blinker column.
    let mut harness = TestHarness::from_rows(&[
        ".###.",
        ".....",
        ".....",
        ".....",
        ".....",
    ]);
    harness.sim.set_wrap_around(true);
    harness.run_ticks(1);
    assert_eq!(
        harness.grid_string(),
        "..#..\n..#..\n.....\n.....\n..#.."
    );
}
