//! Application core: domain logic behind port traits.
//!
//! The grid engine, the splash sequencer and the [`VisualCortex`] service
//! that coordinates them never touch a matrix, a socket or a clock
//! directly.  All interaction happens through the traits in [`ports`],
//! which keeps this layer testable with in-memory adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

pub use service::VisualCortex;
