//! Visual cortex library.
//!
//! A 64×64 LED-matrix control layer: a toroidal Game of Life engine, a
//! timed splash/loading sequencer, and thin forwarders onto an external
//! command bridge.  Everything that touches a matrix, a timer or the
//! bridge sits behind the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod frame;
pub mod grid;
pub mod matrix;
pub mod splash;

pub use error::{Error, Result};
