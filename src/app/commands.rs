//! Inbound commands to the visual cortex.
//!
//! These represent actions requested by the coordinator that the
//! [`VisualCortex`](super::service::VisualCortex) interprets and acts upon.

use serde::{Deserialize, Serialize};

/// Commands the coordinator can send into the visual core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CortexCommand {
    /// Play the full splash sequence (with fallback).
    Splash,

    /// Write one grid cell.
    UpdateCell { x: usize, y: usize, state: u8 },

    /// Write a rectangular block of cells.
    UpdateRegion {
        x: usize,
        y: usize,
        region: Vec<Vec<u8>>,
    },

    /// Replace the whole grid.
    SetGrid { grid: Vec<Vec<u8>> },

    /// Stamp a named seed pattern with its top-left corner at `(x, y)`.
    SeedPattern { name: String, x: usize, y: usize },

    /// Advance the grid by one generation and render it.
    Step,

    /// Ask a running game to stop at its next generation boundary.
    StopGame,

    /// Forward a named splash event.
    SplashEvent { name: String },
}

/// Successful reply to a [`CortexCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Ok,
    /// Result of a splash command.
    Splash(crate::splash::SplashOutcome),
    /// Whether a splash event name was recognised.
    EventHandled(bool),
    /// Generation counter after a step.
    Generation(u64),
}
