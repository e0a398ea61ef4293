//! Splash sequencer lifecycle.
//!
//! ```text
//!  IDLE ──start──▶ STARTING ──first frame──▶ LOOPING
//!   ▲ ▲               │                         │
//!   │ └──[failed]─────┘                       stop
//!   │                                           ▼
//!   ├──────────────[animation halted]────── STOPPING
//!   │
//!   └──next sequence── COMPLETE ◀──complete splash── IDLE
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequencerState {
    Idle,
    Starting,
    Looping,
    Stopping,
    Complete,
}

impl SequencerState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Starting => "Starting",
            Self::Looping => "Looping",
            Self::Stopping => "Stopping",
            Self::Complete => "Complete",
        }
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Starting | Self::Complete)
                | (Self::Starting, Self::Looping | Self::Idle)
                | (Self::Looping, Self::Stopping)
                | (Self::Stopping | Self::Complete, Self::Idle)
        )
    }

    /// The decorative animation may render only in this state.
    pub fn is_animating(self) -> bool {
        self == Self::Looping
    }
}
