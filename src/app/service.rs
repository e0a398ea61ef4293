//! Application service: the hexagonal core.
//!
//! [`VisualCortex`] owns the grid engine and the splash sequencer and is
//! the single entry point for the coordinator.  All I/O flows through the
//! port traits it was built with; both subsystems draw to clones of the
//! same display handle.
//!
//! ```text
//!                  ┌────────────────────────────┐
//!  CortexCommand ─▶│        VisualCortex         │──▶ EventSink
//!                  │  GridEngine · Splash        │
//!   DisplaySink ◀──│                             │◀── Delay
//!                  └────────────────────────────┘
//! ```

use log::{info, warn};
use rand::Rng;

use crate::config::CortexConfig;
use crate::error::{Error, Result, ValidationError};
use crate::grid::patterns::Pattern;
use crate::grid::{GridEngine, RunControl};
use crate::splash::{SplashOutcome, SplashSequencer, SplashTrigger};

use super::commands::{CommandReply, CortexCommand};
use super::events::CortexEvent;
use super::ports::{Delay, DisplaySink, EventSink, NoopEvents};

// ───────────────────────────────────────────────────────────────
// VisualCortex
// ───────────────────────────────────────────────────────────────

pub struct VisualCortex<S, D, E = NoopEvents> {
    config: CortexConfig,
    engine: GridEngine<S, D, E>,
    splash: SplashSequencer<S, D, E>,
    events: E,
    initialized: bool,
}

impl<S, D> VisualCortex<S, D, NoopEvents>
where
    S: DisplaySink + Clone,
    D: Delay + Clone,
{
    pub fn new(display: S, delay: D, config: CortexConfig) -> Self {
        Self::with_events(display, delay, NoopEvents, config)
    }
}

impl<S, D, E> VisualCortex<S, D, E>
where
    S: DisplaySink + Clone,
    D: Delay + Clone,
    E: EventSink + Clone,
{
    /// Construct the service.  Does **not** touch the display; call
    /// [`initialize`](Self::initialize) next.
    pub fn with_events(display: S, delay: D, events: E, config: CortexConfig) -> Self {
        let engine = GridEngine::with_events(
            display.clone(),
            delay.clone(),
            events.clone(),
            &config.grid,
        );
        let splash = SplashSequencer::with_events(display, delay, events.clone(), &config.splash);
        Self {
            config,
            engine,
            splash,
            events,
            initialized: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Blank the matrix and start accepting commands.  Calling it again
    /// once initialised is a no-op.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.engine.display_mut().clear().await.inspect_err(|e| {
            warn!("Visual cortex initialisation failed: {}", e);
        })?;
        self.initialized = true;
        self.events.emit(&CortexEvent::Initialized);
        info!("Visual cortex initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Stop whatever is running, blank the matrix and go back to the
    /// uninitialised state.  The clear is best effort.
    pub async fn cleanup(&mut self) -> Result<()> {
        self.engine.stop();
        self.splash.stop_loading_animation().await;
        self.initialized = false;
        let cleared = self.engine.display_mut().clear().await;
        info!("Visual cortex cleaned up");
        cleared.map_err(Error::from)
    }

    // ── Commands ──────────────────────────────────────────────

    /// Execute one coordinator command.
    pub async fn process_command(&mut self, command: CortexCommand) -> Result<CommandReply> {
        self.ensure_initialized()?;
        match command {
            CortexCommand::Splash => Ok(CommandReply::Splash(self.show_splash_screen().await?)),
            CortexCommand::UpdateCell { x, y, state } => {
                self.engine.update_cell(x, y, state)?;
                self.redraw().await
            }
            CortexCommand::UpdateRegion { x, y, region } => {
                self.engine.update_region(x, y, &region)?;
                self.redraw().await
            }
            CortexCommand::SetGrid { grid } => {
                self.engine.set_grid(&grid)?;
                self.redraw().await
            }
            CortexCommand::SeedPattern { name, x, y } => {
                let pattern = Pattern::find(&name).ok_or(ValidationError::UnknownPattern)?;
                self.engine.stamp(pattern, x, y)?;
                self.redraw().await
            }
            CortexCommand::Step => {
                self.engine.step();
                self.engine.render().await?;
                Ok(CommandReply::Generation(self.engine.generation()))
            }
            CortexCommand::StopGame => {
                self.engine.stop();
                Ok(CommandReply::Ok)
            }
            CortexCommand::SplashEvent { name } => {
                Ok(CommandReply::EventHandled(self.trigger_splash_event(&name)))
            }
        }
    }

    /// Play the full splash narrative.  Display failures degrade to the
    /// static fallback and show up in the outcome, not as an error.
    pub async fn show_splash_screen(&mut self) -> Result<SplashOutcome> {
        self.ensure_initialized()?;
        let outcome = self.splash.show_splash().await;
        info!("Splash finished: {:?}", outcome);
        Ok(outcome)
    }

    /// Post a named splash event.  `false` when the name is unknown or the
    /// cortex is not initialised.
    pub fn trigger_splash_event(&self, name: &str) -> bool {
        if !self.initialized {
            warn!("Cannot trigger splash event {}: not initialized", name);
            return false;
        }
        self.splash.handle_event(name)
    }

    /// Handle for posting splash events from another task.
    pub fn splash_trigger(&self) -> SplashTrigger {
        self.splash.trigger()
    }

    // ── Game of Life ──────────────────────────────────────────

    /// Run the generational loop until stopped through
    /// [`run_control`](Self::run_control) or a render failure.
    pub async fn run_game(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        self.engine.run().await
    }

    pub fn run_control(&self) -> RunControl {
        self.engine.run_control()
    }

    /// Fill the grid with a random soup at the configured density.
    pub fn seed_random(&mut self, rng: &mut impl Rng) {
        self.engine.seed_random(rng, self.config.grid.seed_density);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &CortexConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridEngine<S, D, E> {
        &self.engine
    }

    pub fn grid_mut(&mut self) -> &mut GridEngine<S, D, E> {
        &mut self.engine
    }

    pub fn splash(&self) -> &SplashSequencer<S, D, E> {
        &self.splash
    }

    // ── Internal ──────────────────────────────────────────────

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    async fn redraw(&mut self) -> Result<CommandReply> {
        self.engine.render().await?;
        Ok(CommandReply::Ok)
    }
}
