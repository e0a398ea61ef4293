//! Named out-of-band splash events.
//!
//! The event table comes from configuration: each name maps to a
//! [`SplashEffect`].  Any task holding a [`SplashTrigger`] can post an
//! event; the effect is queued on an `embassy-sync` channel and applied by
//! the sequencer at its next step boundary.
//!
//! ```text
//! ┌──────────────┐ trigger(name) ┌──────────────┐  drain at step  ┌─────────────────┐
//! │ Other task   │──────────────▶│ Effect queue │────────────────▶│ SplashSequencer │
//! └──────────────┘   (lookup)    └──────────────┘    boundary     └─────────────────┘
//! ```

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::EventBinding;
use crate::frame::{TEXT_CAP, truncated};

/// Pending effects the queue holds before `trigger` starts refusing.
pub const EFFECT_QUEUE_DEPTH: usize = 8;

/// What a named event does to the running sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplashEffect {
    /// Jump forward to loading step `step` (0-based).  Steps already shown
    /// are not replayed.
    AdvanceTo { step: usize },
    /// End the sequence without the completion splash.
    Abort,
    /// Show `label` in place of the built-in step labels for the rest of
    /// the run, starting with the next step.
    SetLabel { label: heapless::String<TEXT_CAP> },
}

/// An accepted event waiting for the sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEffect {
    pub name: heapless::String<TEXT_CAP>,
    pub effect: SplashEffect,
}

pub(crate) type EffectQueue = Channel<CriticalSectionRawMutex, PendingEffect, EFFECT_QUEUE_DEPTH>;

/// Cloneable handle for posting named splash events from any task.
#[derive(Clone)]
pub struct SplashTrigger {
    table: Arc<[EventBinding]>,
    queue: Arc<EffectQueue>,
}

impl SplashTrigger {
    pub(crate) fn new(bindings: &[EventBinding]) -> Self {
        Self {
            table: bindings.into(),
            queue: Arc::new(Channel::new()),
        }
    }

    /// Look `name` up and queue its effect.
    ///
    /// Returns whether the table knows `name`.  An unknown name never
    /// touches the sequencer.  A known name arriving while the queue is
    /// full is logged and dropped.
    pub fn trigger(&self, name: &str) -> bool {
        let Some(binding) = self.table.iter().find(|b| b.name == name) else {
            warn!("Unknown splash event: {}", name);
            return false;
        };
        let pending = PendingEffect {
            name: truncated(name),
            effect: binding.effect.clone(),
        };
        if self.queue.try_send(pending).is_err() {
            warn!("Splash event queue full, dropping {}", name);
            return true;
        }
        info!("Queued splash event {} ({:?})", name, binding.effect);
        true
    }

    /// Whether `name` is in the event table.
    pub fn is_known(&self, name: &str) -> bool {
        self.table.iter().any(|b| b.name == name)
    }

    pub(crate) fn try_next(&self) -> Option<PendingEffect> {
        self.queue.try_receive().ok()
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }
}
