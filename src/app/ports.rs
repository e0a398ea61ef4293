//! Port traits: the hexagonal boundary between the visual core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GridEngine / SplashSequencer / VisualCortex
//! ```
//!
//! Driven adapters (LED matrix, command bridge, timers, event sinks)
//! implement these traits.  The core consumes them via generics, so it
//! never touches a framebuffer, a socket or a clock directly.
//!
//! Every suspension point in the core goes through [`Delay`].  Swapping the
//! delay adapter is how tests run a 4.5 s splash in microseconds.

use core::time::Duration;

use crate::bridge::{BridgeCommand, BridgeResponse};
use crate::error::{BridgeError, RenderError};
use crate::frame::{RenderFrame, Rgb, Shape};

// ───────────────────────────────────────────────────────────────
// Display sink (driven adapter: domain → LED matrix)
// ───────────────────────────────────────────────────────────────

/// Rendering target: an LED matrix or anything that behaves like one.
pub trait DisplaySink {
    /// Replace the whole image.
    async fn set_image(&mut self, frame: &RenderFrame) -> Result<(), RenderError>;

    /// Set a single pixel on top of the current image.
    async fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> Result<(), RenderError>;

    /// Blank the display.
    async fn clear(&mut self) -> Result<(), RenderError>;

    /// Draw a vector shape on top of the current image.
    async fn draw_shape(&mut self, shape: &Shape) -> Result<(), RenderError>;
}

// ───────────────────────────────────────────────────────────────
// Delay (driven adapter: domain → timer)
// ───────────────────────────────────────────────────────────────

/// Voluntary suspension.  The only way the core ever waits.
pub trait Delay {
    async fn delay(&mut self, duration: Duration);

    async fn delay_ms(&mut self, ms: u64) {
        self.delay(Duration::from_millis(ms)).await;
    }
}

// ───────────────────────────────────────────────────────────────
// Command bridge (driven adapter: domain ↔ dispatcher)
// ───────────────────────────────────────────────────────────────

/// Request/response channel to the external command dispatcher.
///
/// One request, one response.  Transport failures and error statuses both
/// surface as [`BridgeError`]; the core never sees the wire format.
pub trait CommandBridge {
    async fn send(&mut self, command: BridgeCommand) -> Result<BridgeResponse, BridgeError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`CortexEvent`](super::events::CortexEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::CortexEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl EventSink for NoopEvents {
    fn emit(&mut self, _event: &super::events::CortexEvent) {}
}

// ── Blanket impls so callers can lend a port instead of moving it ──

impl<T: DisplaySink> DisplaySink for &mut T {
    async fn set_image(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        (**self).set_image(frame).await
    }

    async fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> Result<(), RenderError> {
        (**self).set_pixel(x, y, colour).await
    }

    async fn clear(&mut self) -> Result<(), RenderError> {
        (**self).clear().await
    }

    async fn draw_shape(&mut self, shape: &Shape) -> Result<(), RenderError> {
        (**self).draw_shape(shape).await
    }
}

impl<T: Delay> Delay for &mut T {
    async fn delay(&mut self, duration: Duration) {
        (**self).delay(duration).await;
    }
}

impl<T: EventSink> EventSink for &mut T {
    fn emit(&mut self, event: &super::events::CortexEvent) {
        (**self).emit(event);
    }
}
