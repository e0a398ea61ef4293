//! Fuzz target: coordinator command decoding and grid edits
//!
//! Decodes arbitrary bytes as a `CortexCommand` and, when that succeeds,
//! applies grid edits to a fresh engine.  Invariants checked:
//! - No panics under any byte sequence
//! - A rejected edit leaves the grid exactly as it was
//!
//! cargo fuzz run fuzz_cortex_command

#![no_main]

use core::time::Duration;

use cortex_matrix::adapters::Framebuffer;
use cortex_matrix::app::commands::CortexCommand;
use cortex_matrix::app::ports::Delay;
use cortex_matrix::config::GridConfig;
use cortex_matrix::grid::GridEngine;
use cortex_matrix::grid::patterns::Pattern;
use libfuzzer_sys::fuzz_target;

struct NoDelay;

impl Delay for NoDelay {
    async fn delay(&mut self, _duration: Duration) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(command) = serde_json::from_slice::<CortexCommand>(data) else {
        return;
    };
    let mut engine = GridEngine::new(Framebuffer::new(), NoDelay, &GridConfig::default());
    engine.update_cell(1, 1, 1).unwrap();
    let before = engine.grid().clone();

    let result = match command {
        CortexCommand::UpdateCell { x, y, state } => engine.update_cell(x, y, state),
        CortexCommand::UpdateRegion { x, y, region } => engine.update_region(x, y, &region),
        CortexCommand::SetGrid { grid } => engine.set_grid(&grid),
        CortexCommand::SeedPattern { name, x, y } => match Pattern::find(&name) {
            Some(pattern) => engine.stamp(pattern, x, y),
            None => return,
        },
        CortexCommand::Step => {
            engine.step();
            futures_lite::future::block_on(engine.render()).unwrap();
            return;
        }
        _ => return,
    };

    if result.is_err() {
        assert_eq!(*engine.grid(), before, "rejected edit mutated the grid");
    }
});
