//! Wall-clock [`Delay`] adapter.
//!
//! Suspends on an `async-io-mini` timer, so it works under any executor
//! that polls it (the binary uses `edge-executor`).

use core::time::Duration;

use async_io_mini::Timer;

use crate::app::ports::Delay;

#[derive(Debug, Default, Clone, Copy)]
pub struct TimerDelay;

impl TimerDelay {
    pub fn new() -> Self {
        Self
    }
}

impl Delay for TimerDelay {
    async fn delay(&mut self, duration: Duration) {
        Timer::after(duration).await;
    }
}
