//! Mock adapters for integration tests.
//!
//! Every adapter records into an `Rc<RefCell<..>>` so the test keeps a
//! handle while the engine or sequencer owns a clone.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cortex_matrix::app::events::CortexEvent;
use cortex_matrix::app::ports::{Delay, DisplaySink, EventSink};
use cortex_matrix::error::RenderError;
use cortex_matrix::frame::{RenderFrame, Rgb, Shape};

// ── Display call record ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    SetImage(RenderFrame),
    SetPixel { x: usize, y: usize, colour: Rgb },
    Clear,
    Text(String),
    Shape(Shape),
    /// Marker pushed by a tracing [`RecordingDelay`] so tests can see
    /// where renders fall relative to suspensions.
    Delay(u64),
}

type Log = Rc<RefCell<Vec<DisplayCall>>>;

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockDisplay {
    pub calls: Log,
    /// Fail every `set_image` from this (1-based) call on.
    fail_from: Option<usize>,
    images: Rc<RefCell<usize>>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_from(call: usize) -> Self {
        Self {
            fail_from: Some(call),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls.borrow().clone()
    }

    pub fn images(&self) -> Vec<RenderFrame> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DisplayCall::SetImage(frame) => Some(frame.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clears(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| **c == DisplayCall::Clear)
            .count()
    }

    pub fn last_call(&self) -> Option<DisplayCall> {
        self.calls.borrow().last().cloned()
    }
}

impl DisplaySink for MockDisplay {
    async fn set_image(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        let n = {
            let mut images = self.images.borrow_mut();
            *images += 1;
            *images
        };
        if self.fail_from.is_some_and(|from| n >= from) {
            return Err(RenderError::Rejected("mock failure"));
        }
        self.calls.borrow_mut().push(DisplayCall::SetImage(frame.clone()));
        Ok(())
    }

    async fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> Result<(), RenderError> {
        self.calls
            .borrow_mut()
            .push(DisplayCall::SetPixel { x, y, colour });
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), RenderError> {
        self.calls.borrow_mut().push(DisplayCall::Clear);
        Ok(())
    }

    async fn draw_shape(&mut self, shape: &Shape) -> Result<(), RenderError> {
        let call = match shape {
            Shape::Text { text, .. } => DisplayCall::Text(text.as_str().into()),
            other => DisplayCall::Shape(other.clone()),
        };
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

// ── RecordingDelay ────────────────────────────────────────────

/// Records every request, yields once, and returns without waiting.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    pub waits: Rc<RefCell<Vec<u64>>>,
    trace: Option<Log>,
}

#[allow(dead_code)]
impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also push a [`DisplayCall::Delay`] marker into `display`'s log.
    pub fn tracing(display: &MockDisplay) -> Self {
        Self {
            waits: Rc::default(),
            trace: Some(display.calls.clone()),
        }
    }

    pub fn waits(&self) -> Vec<u64> {
        self.waits.borrow().clone()
    }
}

impl Delay for RecordingDelay {
    async fn delay(&mut self, duration: Duration) {
        let ms = duration.as_millis() as u64;
        self.waits.borrow_mut().push(ms);
        if let Some(trace) = &self.trace {
            trace.borrow_mut().push(DisplayCall::Delay(ms));
        }
        futures_lite::future::yield_now().await;
    }
}

// ── RecordingEvents ───────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingEvents {
    pub events: Rc<RefCell<Vec<CortexEvent>>>,
}

#[allow(dead_code)]
impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<CortexEvent> {
        self.events.borrow().clone()
    }

    pub fn progress(&self) -> Vec<(u8, String)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                CortexEvent::LoadingProgress { progress, label } => {
                    Some((*progress, label.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingEvents {
    fn emit(&mut self, event: &CortexEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
