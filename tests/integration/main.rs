//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no matrix
//! attached.

mod bridge_tests;
mod cortex_tests;
mod grid_tests;
mod mock_display;
mod splash_tests;
