//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured cortex events through the
//! `log` facade (the binary routes that to `tracing-subscriber`).

use log::{debug, info, warn};

use crate::app::events::CortexEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`CortexEvent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &CortexEvent) {
        match event {
            CortexEvent::GenerationRendered {
                generation,
                live_cells,
            } => {
                debug!("LIFE  | gen={} live={}", generation, live_cells);
            }
            CortexEvent::GameStopped { generations } => {
                info!("LIFE  | stopped after {} generations", generations);
            }
            CortexEvent::SplashStateChanged { from, to } => {
                info!("SPLASH| {:?} -> {:?}", from, to);
            }
            CortexEvent::LoadingProgress { progress, label } => {
                info!("SPLASH| {:>3}% {}", progress, label);
            }
            CortexEvent::SplashEventAccepted(name) => {
                info!("SPLASH| event {}", name);
            }
            CortexEvent::SplashFallback => {
                warn!("SPLASH| fell back to static frame");
            }
            CortexEvent::Initialized => {
                info!("CORTEX| initialized");
            }
        }
    }
}
