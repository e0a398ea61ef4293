//! Integration tests for the VisualCortex command surface.

use futures_lite::future::{block_on, yield_now, zip};

use cortex_matrix::app::VisualCortex;
use cortex_matrix::app::commands::{CommandReply, CortexCommand};
use cortex_matrix::app::events::CortexEvent;
use cortex_matrix::config::{CortexConfig, SplashConfig};
use cortex_matrix::error::{Error, ValidationError};
use cortex_matrix::splash::SplashOutcome;

use super::mock_display::{DisplayCall, MockDisplay, RecordingDelay, RecordingEvents};

type Cortex = VisualCortex<MockDisplay, RecordingDelay, RecordingEvents>;

fn cortex() -> (Cortex, MockDisplay, RecordingEvents) {
    let display = MockDisplay::new();
    let events = RecordingEvents::new();
    let config = CortexConfig {
        splash: SplashConfig {
            animation_frame_ms: 5_000,
            ..SplashConfig::default()
        },
        ..CortexConfig::default()
    };
    let cortex = VisualCortex::with_events(
        display.clone(),
        RecordingDelay::new(),
        events.clone(),
        config,
    );
    (cortex, display, events)
}

fn ready() -> (Cortex, MockDisplay, RecordingEvents) {
    let (mut c, display, events) = cortex();
    block_on(c.initialize()).unwrap();
    (c, display, events)
}

#[test]
fn commands_before_initialize_are_refused() {
    let (mut c, display, _) = cortex();
    assert_eq!(
        block_on(c.process_command(CortexCommand::Step)),
        Err(Error::NotInitialized)
    );
    assert_eq!(block_on(c.show_splash_screen()), Err(Error::NotInitialized));
    assert_eq!(block_on(c.run_game()), Err(Error::NotInitialized));
    assert!(!c.trigger_splash_event("mind_ready"));
    assert!(display.calls().is_empty());
}

#[test]
fn initialize_clears_once() {
    let (mut c, display, events) = cortex();
    block_on(c.initialize()).unwrap();
    block_on(c.initialize()).unwrap();
    assert!(c.is_initialized());
    assert_eq!(display.clears(), 1);
    assert_eq!(events.all(), vec![CortexEvent::Initialized]);
}

#[test]
fn cell_command_updates_and_redraws() {
    let (mut c, display, _) = ready();
    let reply = block_on(c.process_command(CortexCommand::UpdateCell { x: 4, y: 9, state: 1 }));
    assert_eq!(reply, Ok(CommandReply::Ok));
    assert_eq!(c.grid().cell(4, 9), Some(1));
    assert!(matches!(display.last_call(), Some(DisplayCall::SetImage(_))));
}

#[test]
fn invalid_region_command_is_a_validation_error() {
    let (mut c, _, _) = ready();
    let reply = block_on(c.process_command(CortexCommand::UpdateRegion {
        x: 63,
        y: 0,
        region: vec![vec![1, 1]],
    }));
    assert!(matches!(
        reply,
        Err(Error::Validation(ValidationError::RegionOutOfBounds { .. }))
    ));
    assert_eq!(c.grid().grid().live_cells(), 0);
}

#[test]
fn seed_pattern_by_name() {
    let (mut c, _, _) = ready();
    let reply = block_on(c.process_command(CortexCommand::SeedPattern {
        name: "Blinker".into(),
        x: 10,
        y: 10,
    }));
    assert_eq!(reply, Ok(CommandReply::Ok));
    assert_eq!(c.grid().grid().live_cells(), 3);

    let unknown = block_on(c.process_command(CortexCommand::SeedPattern {
        name: "spaceship".into(),
        x: 0,
        y: 0,
    }));
    assert_eq!(
        unknown,
        Err(Error::Validation(ValidationError::UnknownPattern))
    );
}

#[test]
fn step_command_reports_generation() {
    let (mut c, _, _) = ready();
    assert_eq!(
        block_on(c.process_command(CortexCommand::Step)),
        Ok(CommandReply::Generation(1))
    );
    assert_eq!(
        block_on(c.process_command(CortexCommand::Step)),
        Ok(CommandReply::Generation(2))
    );
}

#[test]
fn splash_command_plays_the_sequence() {
    let (mut c, _, events) = ready();
    let reply = block_on(c.process_command(CortexCommand::Splash));
    assert_eq!(reply, Ok(CommandReply::Splash(SplashOutcome::Completed)));
    assert_eq!(events.progress().len(), 7);
}

#[test]
fn splash_event_command_reports_recognition() {
    let (mut c, _, _) = ready();
    assert_eq!(
        block_on(c.process_command(CortexCommand::SplashEvent { name: "nope".into() })),
        Ok(CommandReply::EventHandled(false))
    );
    assert_eq!(
        block_on(c.process_command(CortexCommand::SplashEvent {
            name: "led_matrix_ready".into()
        })),
        Ok(CommandReply::EventHandled(true))
    );
}

#[test]
fn game_runs_until_stopped_and_cleanup_resets() {
    let (mut c, display, _) = ready();
    block_on(c.process_command(CortexCommand::SeedPattern {
        name: "glider".into(),
        x: 0,
        y: 0,
    }))
    .unwrap();
    let control = c.run_control();

    let (ran, ()) = block_on(zip(c.run_game(), async {
        yield_now().await;
        yield_now().await;
        control.stop();
    }));
    assert_eq!(ran, Ok(()));
    assert!(c.grid().generation() > 0);
    assert_eq!(display.last_call(), Some(DisplayCall::Clear));

    block_on(c.cleanup()).unwrap();
    assert!(!c.is_initialized());
    assert_eq!(
        block_on(c.process_command(CortexCommand::StopGame)),
        Err(Error::NotInitialized)
    );
}

#[test]
fn commands_decode_from_coordinator_json() {
    let cmd: CortexCommand =
        serde_json::from_str(r#"{"type":"UPDATE_CELL","x":1,"y":2,"state":1}"#).unwrap();
    assert_eq!(cmd, CortexCommand::UpdateCell { x: 1, y: 2, state: 1 });
    let cmd: CortexCommand = serde_json::from_str(r#"{"type":"SPLASH"}"#).unwrap();
    assert_eq!(cmd, CortexCommand::Splash);
}
