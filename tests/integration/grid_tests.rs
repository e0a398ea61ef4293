//! Integration tests for the GridEngine → DisplaySink pipeline.

use std::collections::BTreeSet;

use futures_lite::future::{block_on, yield_now, zip};

use cortex_matrix::app::events::CortexEvent;
use cortex_matrix::config::GridConfig;
use cortex_matrix::error::{Error, RenderError, ValidationError};
use cortex_matrix::frame::BLACK;
use cortex_matrix::grid::{GRID_SIZE, GridEngine, neighbour_colour};

use super::mock_display::{DisplayCall, MockDisplay, RecordingDelay, RecordingEvents};

fn engine() -> GridEngine<MockDisplay, RecordingDelay> {
    GridEngine::new(MockDisplay::new(), RecordingDelay::new(), &GridConfig::default())
}

fn live_set(engine: &GridEngine<MockDisplay, RecordingDelay>) -> BTreeSet<(usize, usize)> {
    let mut live = BTreeSet::new();
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            if engine.cell(x, y) == Some(1) {
                live.insert((x, y));
            }
        }
    }
    live
}

// ── Cell edits ────────────────────────────────────────────────

#[test]
fn cell_write_then_read() {
    let mut e = engine();
    e.update_cell(5, 7, 1).unwrap();
    assert_eq!(e.cell(5, 7), Some(1));
    e.update_cell(5, 7, 0).unwrap();
    assert_eq!(e.cell(5, 7), Some(0));
}

#[test]
fn invalid_edits_leave_the_grid_unchanged() {
    let mut e = engine();
    e.update_cell(1, 1, 1).unwrap();
    let before = e.grid().clone();

    assert_eq!(
        e.update_cell(64, 0, 1),
        Err(Error::Validation(ValidationError::CellOutOfBounds { x: 64, y: 0 }))
    );
    assert_eq!(
        e.update_cell(0, 0, 2),
        Err(Error::Validation(ValidationError::InvalidState(2)))
    );
    // Region hanging off the right edge: nothing written, not even the
    // in-bounds part.
    assert!(e.update_region(62, 0, &[vec![1u8, 1, 1]]).is_err());
    assert!(e.update_region(0, 0, &[vec![1u8, 1], vec![1]]).is_err());
    assert!(e.update_region(0, 0, &Vec::<Vec<u8>>::new()).is_err());

    assert_eq!(*e.grid(), before);
}

#[test]
fn region_inside_the_grid_is_written() {
    let mut e = engine();
    e.update_region(61, 62, &[vec![1u8, 0, 1], vec![0, 1, 0]]).unwrap();
    let expected: BTreeSet<_> = [(61, 62), (63, 62), (62, 63)].into_iter().collect();
    assert_eq!(live_set(&e), expected);
}

#[test]
fn set_grid_round_trip() {
    let mut e = engine();
    let mut rows = vec![vec![0u8; GRID_SIZE]; GRID_SIZE];
    rows[0][0] = 1;
    rows[31][17] = 1;
    rows[63][63] = 1;
    e.set_grid(&rows).unwrap();
    assert_eq!(e.grid().to_rows(), rows);
}

#[test]
fn malformed_grids_are_rejected() {
    let mut e = engine();
    e.update_cell(3, 3, 1).unwrap();
    let before = e.grid().clone();

    let short = vec![vec![0u8; GRID_SIZE]; GRID_SIZE - 1];
    assert_eq!(
        e.set_grid(&short),
        Err(Error::Validation(ValidationError::GridRows(63)))
    );

    let mut wide = vec![vec![0u8; GRID_SIZE]; GRID_SIZE];
    wide[10] = vec![0u8; GRID_SIZE + 1];
    assert_eq!(
        e.set_grid(&wide),
        Err(Error::Validation(ValidationError::GridColumns { row: 10, len: 65 }))
    );

    assert_eq!(*e.grid(), before);
}

// ── Generations ───────────────────────────────────────────────

#[test]
fn glider_translates_diagonally_across_the_torus_edge() {
    let mut e = engine();
    // Glider anchored at (62, 62): its cells wrap over both edges.
    let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
    let wrap = |(dx, dy): (usize, usize), ox: usize, oy: usize| {
        ((ox + dx) % GRID_SIZE, (oy + dy) % GRID_SIZE)
    };
    for &cell in &glider {
        let (x, y) = wrap(cell, 62, 62);
        e.update_cell(x, y, 1).unwrap();
    }

    for _ in 0..4 {
        e.step();
    }

    let expected: BTreeSet<_> = glider.iter().map(|&c| wrap(c, 63, 63)).collect();
    assert_eq!(live_set(&e), expected);
    assert_eq!(e.generation(), 4);
}

#[test]
fn lone_cell_dies() {
    let mut e = engine();
    e.update_cell(20, 20, 1).unwrap();
    e.step();
    assert!(live_set(&e).is_empty());
}

#[test]
fn block_is_a_still_life() {
    let mut e = engine();
    e.update_region(10, 10, &[[1u8, 1], [1, 1]]).unwrap();
    let before = live_set(&e);
    for _ in 0..3 {
        e.step();
    }
    assert_eq!(live_set(&e), before);

    // Each block cell has 3 live neighbours.
    let frame = e.render_frame();
    assert_eq!(frame.get(10, 10), Some(neighbour_colour(3)));
    assert_eq!(frame.get(12, 12), Some(BLACK));
}

// ── Run loop ──────────────────────────────────────────────────

#[test]
fn stop_takes_effect_within_one_generation_and_clears() {
    let display = MockDisplay::new();
    let events = RecordingEvents::new();
    let mut e = GridEngine::with_events(
        display.clone(),
        RecordingDelay::new(),
        events.clone(),
        &GridConfig::default(),
    );
    e.update_region(0, 0, &[[0u8, 1, 0], [0, 1, 0], [0, 1, 0]]).unwrap();
    let control = e.run_control();

    let rendered = |events: &RecordingEvents| {
        events
            .all()
            .iter()
            .filter(|ev| matches!(ev, CortexEvent::GenerationRendered { .. }))
            .count()
    };

    let (result, at_stop) = block_on(zip(e.run(), async {
        for _ in 0..5 {
            yield_now().await;
        }
        let at_stop = rendered(&events);
        control.stop();
        at_stop
    }));

    assert!(result.is_ok());
    assert!(at_stop >= 1, "loop should have rendered before stop");
    assert!(
        rendered(&events) <= at_stop + 1,
        "rendered {} generations after stop at {}",
        rendered(&events),
        at_stop
    );
    assert_eq!(display.last_call(), Some(DisplayCall::Clear));
    assert!(!e.is_running());
    assert!(matches!(
        events.all().last(),
        Some(CortexEvent::GameStopped { .. })
    ));
}

#[test]
fn generation_interval_comes_from_config() {
    let delay = RecordingDelay::new();
    let config = GridConfig {
        generation_interval_ms: 40,
        ..GridConfig::default()
    };
    let mut e = GridEngine::new(MockDisplay::new(), delay.clone(), &config);
    let control = e.run_control();
    let (result, ()) = block_on(zip(e.run(), async {
        yield_now().await;
        yield_now().await;
        control.stop();
    }));
    assert!(result.is_ok());
    assert!(!delay.waits().is_empty());
    assert!(delay.waits().iter().all(|&ms| ms == 40));
}

#[test]
fn render_failure_clears_and_is_returned() {
    let display = MockDisplay::failing_from(3);
    let mut e = GridEngine::new(display.clone(), RecordingDelay::new(), &GridConfig::default());
    let result = block_on(e.run());
    assert_eq!(
        result,
        Err(Error::Render(RenderError::Rejected("mock failure")))
    );
    assert_eq!(display.images().len(), 2);
    assert_eq!(display.last_call(), Some(DisplayCall::Clear));
    assert!(!e.is_running());
}
