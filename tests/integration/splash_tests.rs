//! Integration tests for the SplashSequencer narrative.

use futures_lite::future::{block_on, yield_now, zip};

use cortex_matrix::app::events::CortexEvent;
use cortex_matrix::config::SplashConfig;
use cortex_matrix::splash::{
    LOADING_STEPS, LoadingAnimation, SequencerState, SplashOutcome, SplashSequencer,
};

use super::mock_display::{DisplayCall, MockDisplay, RecordingDelay, RecordingEvents};

type Sequencer = SplashSequencer<MockDisplay, RecordingDelay, RecordingEvents>;

fn sequencer(display: &MockDisplay, delay: &RecordingDelay, config: &SplashConfig) -> (Sequencer, RecordingEvents) {
    let events = RecordingEvents::new();
    let seq = SplashSequencer::with_events(display.clone(), delay.clone(), events.clone(), config)
        .with_animation(LoadingAnimation::seeded(11, 2));
    (seq, events)
}

/// Animation period longer than any hold: no decorative slices.
fn coarse() -> SplashConfig {
    SplashConfig {
        animation_frame_ms: 5_000,
        ..SplashConfig::default()
    }
}

#[test]
fn full_sequence_emits_seven_steps_in_order() {
    let display = MockDisplay::new();
    let delay = RecordingDelay::new();
    let (mut seq, events) = sequencer(&display, &delay, &coarse());

    assert_eq!(block_on(seq.show_splash()), SplashOutcome::Completed);
    assert_eq!(seq.state(), SequencerState::Complete);

    let expected = vec![
        (10, "Loading visual cortex...".to_string()),
        (25, "Initializing LED matrix...".to_string()),
        (40, "Connecting components...".to_string()),
        (60, "Starting synaptic pathways...".to_string()),
        (80, "Preparing neural networks...".to_string()),
        (95, "Starting mind processes...".to_string()),
        (100, "System ready".to_string()),
    ];
    assert_eq!(events.progress(), expected);
    assert_eq!(
        delay.waits(),
        vec![2000, 500, 500, 500, 500, 500, 500, 500, 1000, 2000]
    );
}

#[test]
fn animation_is_stopped_before_the_completion_splash() {
    // Default cadence: holds are sliced and animated.
    let display = MockDisplay::new();
    let delay = RecordingDelay::tracing(&display);
    let (mut seq, events) = sequencer(&display, &delay, &SplashConfig::default());

    assert_eq!(block_on(seq.show_splash()), SplashOutcome::Completed);

    let states: Vec<(SequencerState, SequencerState)> = events
        .all()
        .iter()
        .filter_map(|e| match e {
            CortexEvent::SplashStateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            (SequencerState::Idle, SequencerState::Starting),
            (SequencerState::Starting, SequencerState::Looping),
            (SequencerState::Looping, SequencerState::Stopping),
            (SequencerState::Stopping, SequencerState::Idle),
            (SequencerState::Idle, SequencerState::Complete),
        ]
    );

    // Between the last slice of the 100% hold and the completion hold,
    // exactly one image is pushed: the completion frame.
    let calls = display.calls();
    let delays: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, DisplayCall::Delay(_)))
        .map(|(i, _)| i)
        .collect();
    let (last_slice, complete_hold) = (delays[delays.len() - 2], delays[delays.len() - 1]);
    assert_eq!(calls[complete_hold], DisplayCall::Delay(2000));
    let images = calls[last_slice..complete_hold]
        .iter()
        .filter(|c| matches!(c, DisplayCall::SetImage(_)))
        .count();
    assert_eq!(images, 1);
    assert!(calls[last_slice..complete_hold].contains(&DisplayCall::Text("READY".into())));
}

#[test]
fn holds_are_sliced_by_the_animation_period() {
    let display = MockDisplay::new();
    let delay = RecordingDelay::new();
    let (mut seq, _) = sequencer(&display, &delay, &SplashConfig::default());
    block_on(seq.show_splash());

    let waits = delay.waits();
    // Per step: 200 + 200 + 100.  Completion hold: 5 × 200.
    assert_eq!(waits.iter().sum::<u64>(), 2000 + 7 * 500 + 1000 + 2000);
    assert!(waits[1..waits.len() - 1].iter().all(|&ms| ms <= 200));
}

#[test]
fn unknown_event_changes_nothing() {
    let display = MockDisplay::new();
    let (seq, events) = sequencer(&display, &RecordingDelay::new(), &coarse());
    assert!(!seq.handle_event("warp_drive_ready"));
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(events.all().is_empty());
    assert!(display.calls().is_empty());
}

#[test]
fn event_from_another_task_skips_ahead() {
    let display = MockDisplay::new();
    let (mut seq, events) = sequencer(&display, &RecordingDelay::new(), &coarse());
    let trigger = seq.trigger();

    let (outcome, accepted) = block_on(zip(seq.show_splash(), async {
        yield_now().await;
        trigger.trigger("mind_ready")
    }));
    assert!(accepted);
    assert_eq!(outcome, SplashOutcome::Completed);

    let shown: Vec<u8> = events.progress().into_iter().map(|(p, _)| p).collect();
    assert!(shown.len() < LOADING_STEPS.len(), "steps were not skipped: {shown:?}");
    assert!(shown.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(shown.last(), Some(&100));
    assert!(events
        .all()
        .contains(&CortexEvent::SplashEventAccepted("mind_ready".into())));
}

#[test]
fn abort_from_another_task_ends_early() {
    let display = MockDisplay::new();
    let (mut seq, events) = sequencer(&display, &RecordingDelay::new(), &coarse());
    let trigger = seq.trigger();

    let (outcome, _) = block_on(zip(seq.show_splash(), async {
        yield_now().await;
        trigger.trigger("splash_abort")
    }));
    assert_eq!(outcome, SplashOutcome::Aborted);
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(events.progress().len() < LOADING_STEPS.len());
    assert!(!display.calls().contains(&DisplayCall::Text("READY".into())));
}

#[test]
fn dead_display_reports_failure_without_panicking() {
    let display = MockDisplay::failing_from(1);
    let (mut seq, events) = sequencer(&display, &RecordingDelay::new(), &coarse());
    assert_eq!(block_on(seq.show_splash()), SplashOutcome::Failed);
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(events.all().contains(&CortexEvent::SplashFallback));
}

#[test]
fn mid_sequence_failure_stops_the_animation() {
    let display = MockDisplay::failing_from(4);
    let (mut seq, events) = sequencer(&display, &RecordingDelay::new(), &coarse());
    assert_eq!(block_on(seq.show_splash()), SplashOutcome::Failed);
    assert_eq!(seq.state(), SequencerState::Idle);
    assert!(events.all().contains(&CortexEvent::SplashStateChanged {
        from: SequencerState::Looping,
        to: SequencerState::Stopping,
    }));
}
