//! Splash-screen loading sequence.
//!
//! [`SplashSequencer`] walks the fixed [`LOADING_STEPS`] narrative on the
//! display, holding each step for `step_hold_ms`.  A decorative
//! [`LoadingAnimation`] runs underneath while the sequencer is in
//! [`SequencerState::Looping`]; it only ever renders while the sequencer is
//! suspended inside a hold, so progress frames and animation frames never
//! interleave within one render.
//!
//! ```text
//!  startup splash ─▶ start animation ─▶ step 1..7 (+hold each) ─▶ extra hold
//!                                              ▲                      │
//!                            queued events ────┘                      ▼
//!                   (advance / abort / label)           stop animation ─▶ complete splash
//! ```
//!
//! Named events posted through a [`SplashTrigger`] are applied at step
//! boundaries.  Events a run never reaches, or posted while no run is in
//! progress, are discarded.  If any stage fails the animation is stopped and a single
//! static fallback frame is attempted; [`SplashSequencer::show_splash`]
//! never returns an error, only a [`SplashOutcome`].

pub mod animation;
pub mod events;
pub mod state;
pub mod steps;

use core::time::Duration;

use log::{debug, error, info, warn};

use crate::app::events::CortexEvent;
use crate::app::ports::{Delay, DisplaySink, EventSink, NoopEvents};
use crate::config::SplashConfig;
use crate::error::{Result, ValidationError};
use crate::frame::{RenderFrame, Rgb, Shape, TEXT_CAP, WHITE, truncated};

pub use animation::LoadingAnimation;
pub use events::{PendingEffect, SplashEffect, SplashTrigger};
pub use state::SequencerState;
pub use steps::{LOADING_STEPS, LoadingStep};

use animation::BACKGROUND;

const TITLE_COLOURS: [Rgb; 3] = [WHITE, (200, 200, 255), (128, 200, 255)];
const BAR_TRACK: Rgb = (40, 40, 80);
const BAR_FILL: Rgb = (0, 200, 255);
const COMPLETE_BACKGROUND: Rgb = (0, 32, 16);
const FALLBACK_ACCENT: Rgb = (128, 200, 255);

// Progress bar geometry: a 56×6 track with a 1-pixel inset fill.
const BAR_X: i32 = 4;
const BAR_Y: i32 = 52;
const BAR_WIDTH: u16 = 56;
const BAR_HEIGHT: u16 = 6;

/// Negative or non-finite holds collapse to zero.
fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or_default()
}

/// How a splash run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashOutcome {
    /// Every step was shown and the completion frame rendered.
    Completed,
    /// An abort event ended the sequence early.
    Aborted,
    /// The sequence failed; the static fallback frame was shown instead.
    Fallback,
    /// Neither the sequence nor the fallback could be displayed.
    Failed,
}

impl SplashOutcome {
    /// Whether anything reached the display.
    pub fn displayed(self) -> bool {
        self != Self::Failed
    }
}

// ───────────────────────────────────────────────────────────────
// SplashSequencer
// ───────────────────────────────────────────────────────────────

pub struct SplashSequencer<S, D, E = NoopEvents> {
    display: S,
    delay: D,
    events: E,
    config: SplashConfig,
    state: SequencerState,
    animation: LoadingAnimation,
    trigger: SplashTrigger,
    /// Index of the next step `play` will show.
    cursor: usize,
    /// Progress and label currently on screen.
    current: Option<(u8, heapless::String<TEXT_CAP>)>,
    /// Set by a label event; replaces the built-in step labels.
    label_override: Option<heapless::String<TEXT_CAP>>,
    aborted: bool,
}

impl<S: DisplaySink, D: Delay> SplashSequencer<S, D, NoopEvents> {
    pub fn new(display: S, delay: D, config: &SplashConfig) -> Self {
        Self::with_events(display, delay, NoopEvents, config)
    }
}

impl<S: DisplaySink, D: Delay, E: EventSink> SplashSequencer<S, D, E> {
    pub fn with_events(display: S, delay: D, events: E, config: &SplashConfig) -> Self {
        Self {
            display,
            delay,
            events,
            config: config.clone(),
            state: SequencerState::Idle,
            animation: LoadingAnimation::new(config.animation_rects),
            trigger: SplashTrigger::new(&config.events),
            cursor: 0,
            current: None,
            label_override: None,
            aborted: false,
        }
    }

    /// Replace the animation, e.g. with a seeded one.
    pub fn with_animation(mut self, animation: LoadingAnimation) -> Self {
        self.animation = animation;
        self
    }

    // ── Stages ────────────────────────────────────────────────

    /// Render the intro frame and hold it for `duration`.
    pub async fn show_startup_splash(&mut self, duration: Duration) -> Result<()> {
        info!("Splash: startup frame for {:?}", duration);
        self.display.set_image(&RenderFrame::filled(BACKGROUND)).await?;
        self.draw_title(20).await?;
        self.delay.delay(duration).await;
        Ok(())
    }

    /// Start the decorative animation and show `label` over its first frame.
    ///
    /// Already looping is a no-op.  If the first frame cannot be rendered
    /// the sequencer falls back to Idle and the error is returned.
    pub async fn start_loading_animation(&mut self, label: &str) -> Result<()> {
        match self.state {
            SequencerState::Looping => return Ok(()),
            SequencerState::Complete => self.transition(SequencerState::Idle),
            _ => {}
        }
        self.transition(SequencerState::Starting);
        self.animation.start();
        self.animation.advance();

        let first = self.render_label_frame(label).await;
        if let Err(e) = first {
            warn!("Splash: loading animation failed to start: {}", e);
            self.animation.stop();
            self.transition(SequencerState::Idle);
            return Err(e);
        }
        self.transition(SequencerState::Looping);
        Ok(())
    }

    /// Show one loading step.  `progress` above 100 is rejected.
    pub async fn update_loading_progress(&mut self, progress: u8, label: &str) -> Result<()> {
        if progress > 100 {
            return Err(ValidationError::ProgressOutOfRange(progress).into());
        }
        self.render_progress(progress, label).await?;
        self.current = Some((progress, truncated(label)));
        self.events.emit(&CortexEvent::LoadingProgress {
            progress,
            label: label.into(),
        });
        info!("Splash: {}% {}", progress, label);
        Ok(())
    }

    /// Show loading step `index` of [`LOADING_STEPS`], under the label
    /// set by the last label event if there was one.
    pub async fn show_step(&mut self, index: usize) -> Result<()> {
        let step = LOADING_STEPS
            .get(index)
            .ok_or(ValidationError::StepOutOfRange(index))?;
        let label = self.label_override.clone();
        let label = label.as_deref().unwrap_or(step.label);
        self.update_loading_progress(step.progress, label).await
    }

    /// Halt the decorative animation.  No animation frame is rendered
    /// after this returns.
    pub async fn stop_loading_animation(&mut self) {
        match self.state {
            SequencerState::Looping => {
                self.transition(SequencerState::Stopping);
                self.animation.stop();
                self.transition(SequencerState::Idle);
            }
            SequencerState::Starting => {
                self.animation.stop();
                self.transition(SequencerState::Idle);
            }
            _ => {}
        }
    }

    /// Render the terminal frame, hold it, and finish in Complete.
    pub async fn show_complete_splash(&mut self, duration: Duration) -> Result<()> {
        self.stop_loading_animation().await;
        info!("Splash: completion frame for {:?}", duration);
        self.display
            .set_image(&RenderFrame::filled(COMPLETE_BACKGROUND))
            .await?;
        let y = self.draw_title(14).await?;
        self.display
            .draw_shape(&Shape::text(14, y, "READY", BAR_FILL))
            .await?;
        self.delay.delay(duration).await;
        self.transition(SequencerState::Complete);
        self.current = None;
        Ok(())
    }

    /// Minimal static frame straight on the sink: a border and the title
    /// lines, then hold.
    pub async fn show_fallback_splash(&mut self) -> Result<()> {
        let mut frame = RenderFrame::filled(BACKGROUND);
        for shape in [
            Shape::Rect { x: 0, y: 0, width: 64, height: 2, colour: FALLBACK_ACCENT },
            Shape::Rect { x: 0, y: 62, width: 64, height: 2, colour: FALLBACK_ACCENT },
            Shape::Rect { x: 0, y: 0, width: 2, height: 64, colour: FALLBACK_ACCENT },
            Shape::Rect { x: 62, y: 0, width: 2, height: 64, colour: FALLBACK_ACCENT },
        ] {
            frame.draw(&shape);
        }
        self.display.set_image(&frame).await?;
        self.draw_title(14).await?;
        self.delay.delay_ms(self.config.fallback_hold_ms).await;
        Ok(())
    }

    // ── Events ────────────────────────────────────────────────

    /// Queue the effect bound to `name`.  Unknown names return `false`
    /// and change nothing.
    pub fn handle_event(&self, name: &str) -> bool {
        self.trigger.trigger(name)
    }

    /// Handle for posting events from another task.
    pub fn trigger(&self) -> SplashTrigger {
        self.trigger.clone()
    }

    // ── Full sequence ─────────────────────────────────────────

    /// Run the whole narrative and fall back to a static frame on failure.
    pub async fn show_splash(&mut self) -> SplashOutcome {
        match self.play().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Splash sequence failed ({}), trying static fallback", e);
                self.events.emit(&CortexEvent::SplashFallback);
                match self.show_fallback_splash().await {
                    Ok(()) => SplashOutcome::Fallback,
                    Err(e) => {
                        error!("Static fallback splash failed: {}", e);
                        SplashOutcome::Failed
                    }
                }
            }
        }
    }

    /// startup → animation → every step with hold → extra hold → stop
    /// animation → completion.  The animation is stopped on every exit path.
    pub async fn play(&mut self) -> Result<SplashOutcome> {
        self.discard_pending_effects("posted before the sequence started");
        self.cursor = 0;
        self.current = None;
        self.label_override = None;
        self.aborted = false;

        let outcome = self.sequence().await;
        if outcome.is_err() {
            self.stop_loading_animation().await;
        }
        self.discard_pending_effects("posted after the last step");
        outcome
    }

    async fn sequence(&mut self) -> Result<SplashOutcome> {
        let startup = secs(self.config.startup_secs);
        let complete = secs(self.config.complete_secs);
        let initial_label = self.config.initial_label.clone();

        self.show_startup_splash(startup).await?;
        self.start_loading_animation(&initial_label).await?;

        while self.cursor < LOADING_STEPS.len() {
            self.apply_pending_effects();
            if self.aborted {
                break;
            }
            self.show_step(self.cursor).await?;
            self.cursor += 1;
            self.hold(self.config.step_hold_ms).await?;
        }

        if self.aborted {
            self.stop_loading_animation().await;
            self.current = None;
            info!("Splash: sequence aborted at step {}", self.cursor);
            return Ok(SplashOutcome::Aborted);
        }

        self.hold(self.config.completion_hold_ms).await?;
        self.stop_loading_animation().await;
        self.show_complete_splash(complete).await?;
        Ok(SplashOutcome::Completed)
    }

    /// Drain queued events and apply them in arrival order.
    fn apply_pending_effects(&mut self) {
        while let Some(pending) = self.trigger.try_next() {
            self.events
                .emit(&CortexEvent::SplashEventAccepted(pending.name.as_str().into()));
            match pending.effect {
                SplashEffect::AdvanceTo { step } if step >= LOADING_STEPS.len() => {
                    warn!("Splash event {}: step {} out of range", pending.name, step);
                }
                SplashEffect::AdvanceTo { step } if step < self.cursor => {
                    debug!("Splash event {}: step {} already shown", pending.name, step);
                }
                SplashEffect::AdvanceTo { step } => {
                    info!("Splash event {}: skipping to step {}", pending.name, step);
                    self.cursor = step;
                }
                SplashEffect::Abort => {
                    info!("Splash event {}: abort", pending.name);
                    self.aborted = true;
                }
                SplashEffect::SetLabel { label } => {
                    info!("Splash event {}: label '{}'", pending.name, label);
                    self.label_override = Some(label);
                }
            }
        }
    }

    fn discard_pending_effects(&mut self, when: &str) {
        while let Some(pending) = self.trigger.try_next() {
            warn!("Splash event {} {}, dropped", pending.name, when);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Progress currently on screen, if any.
    pub fn current_progress(&self) -> Option<u8> {
        self.current.as_ref().map(|(p, _)| *p)
    }

    pub fn display(&self) -> &S {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut S {
        &mut self.display
    }

    // ── Internal ──────────────────────────────────────────────

    /// Suspend for `ms`, refreshing the animation every
    /// `animation_frame_ms` while looping.
    async fn hold(&mut self, ms: u64) -> Result<()> {
        let frame_ms = self.config.animation_frame_ms.max(1);
        let mut remaining = ms;
        while remaining > 0 {
            let slice = remaining.min(frame_ms);
            self.delay.delay_ms(slice).await;
            remaining -= slice;
            if remaining > 0 && self.state.is_animating() {
                self.animation.advance();
                self.redraw().await?;
            }
        }
        Ok(())
    }

    async fn redraw(&mut self) -> Result<()> {
        match self.current.clone() {
            Some((progress, label)) => self.render_progress(progress, &label).await,
            None => Ok(()),
        }
    }

    async fn render_label_frame(&mut self, label: &str) -> Result<()> {
        self.display.set_image(&self.animation.compose()).await?;
        self.display.draw_shape(&Shape::text(2, 40, label, WHITE)).await?;
        Ok(())
    }

    async fn render_progress(&mut self, progress: u8, label: &str) -> Result<()> {
        let mut frame = self.animation.compose();
        frame.draw(&Shape::Rect {
            x: BAR_X,
            y: BAR_Y,
            width: BAR_WIDTH,
            height: BAR_HEIGHT,
            colour: BAR_TRACK,
        });
        let fill = (u32::from(BAR_WIDTH - 2) * u32::from(progress) / 100) as u16;
        if fill > 0 {
            frame.draw(&Shape::Rect {
                x: BAR_X + 1,
                y: BAR_Y + 1,
                width: fill,
                height: BAR_HEIGHT - 2,
                colour: BAR_FILL,
            });
        }
        self.display.set_image(&frame).await?;

        let mut percent: heapless::String<8> = heapless::String::new();
        // Cannot fail: "100%" fits in 8 bytes.
        let _ = core::fmt::write(&mut percent, format_args!("{}%", progress));
        self.display
            .draw_shape(&Shape::text(24, 28, &percent, WHITE))
            .await?;
        self.display.draw_shape(&Shape::text(2, 40, label, WHITE)).await?;
        Ok(())
    }

    /// Draw the configured title lines from `top`; returns the next free row.
    async fn draw_title(&mut self, top: i32) -> Result<i32> {
        let mut y = top;
        for (i, line) in self.config.title_lines.iter().enumerate() {
            let colour = TITLE_COLOURS[i % TITLE_COLOURS.len()];
            let x = (32 - 3 * line.len() as i32).max(0);
            self.display.draw_shape(&Shape::text(x, y, line, colour)).await?;
            y += 12;
        }
        Ok(y)
    }

    fn transition(&mut self, to: SequencerState) {
        let from = self.state;
        if from == to {
            return;
        }
        if !from.can_transition_to(to) {
            warn!("Splash: ignored illegal transition {} -> {}", from.name(), to.name());
            return;
        }
        info!("Splash transition: {} -> {}", from.name(), to.name());
        self.state = to;
        self.events.emit(&CortexEvent::SplashStateChanged { from, to });
    }
}
