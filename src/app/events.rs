//! Outbound cortex events.
//!
//! The grid engine, splash sequencer and service emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide where they go.

use crate::splash::SequencerState;

/// Structured events emitted by the visual core.
#[derive(Debug, Clone, PartialEq)]
pub enum CortexEvent {
    /// A generation was pushed to the display.
    GenerationRendered { generation: u64, live_cells: usize },

    /// The generational loop exited; `generations` were rendered.
    GameStopped { generations: u64 },

    /// The splash sequencer changed state.
    SplashStateChanged {
        from: SequencerState,
        to: SequencerState,
    },

    /// A loading step was displayed.
    LoadingProgress { progress: u8, label: String },

    /// A named splash event was accepted.
    SplashEventAccepted(String),

    /// The primary splash path failed and the static fallback was shown.
    SplashFallback,

    /// The visual cortex finished initialising.
    Initialized,
}
