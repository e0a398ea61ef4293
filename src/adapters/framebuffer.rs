//! In-memory display adapter.
//!
//! [`Framebuffer`] implements [`DisplaySink`] over a [`RenderFrame`] and
//! keeps a short history of what it was asked to do, so tests and the
//! simulator can inspect the matrix without hardware.  Text has no glyph
//! set here: it is recorded, not rasterised.
//!
//! [`SharedFramebuffer`] lets the grid engine and the splash sequencer
//! draw to the same matrix.  Borrows are scoped to each call and never
//! held across an `.await`.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::app::ports::DisplaySink;
use crate::error::RenderError;
use crate::frame::{BLACK, RenderFrame, Rgb, Shape, TEXT_CAP};

/// A text draw the framebuffer could not rasterise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMark {
    pub x: i32,
    pub y: i32,
    pub text: heapless::String<TEXT_CAP>,
    pub colour: Rgb,
}

#[derive(Debug, Default)]
pub struct Framebuffer {
    frame: RenderFrame,
    /// Texts drawn since the last full-image replace or clear.
    texts: Vec<TextMark>,
    brightness: u8,
    images: usize,
    clears: usize,
    offline: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            brightness: 100,
            ..Self::default()
        }
    }

    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    pub fn texts(&self) -> &[TextMark] {
        &self.texts
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness.min(100);
    }

    /// Full-image replaces so far.
    pub fn images(&self) -> usize {
        self.images
    }

    /// Clears so far.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Simulate an unplugged matrix: every call fails with
    /// [`RenderError::Disconnected`] until set back.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn fill(&mut self, colour: Rgb) -> Result<(), RenderError> {
        self.check()?;
        self.frame = RenderFrame::filled(colour);
        self.texts.clear();
        Ok(())
    }

    pub fn replace(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        self.check()?;
        self.frame = frame.clone();
        self.texts.clear();
        self.images += 1;
        Ok(())
    }

    pub fn plot(&mut self, x: usize, y: usize, colour: Rgb) -> Result<(), RenderError> {
        self.check()?;
        if !self.frame.set(x, y, colour) {
            return Err(RenderError::Rejected("pixel outside the matrix"));
        }
        Ok(())
    }

    pub fn blank(&mut self) -> Result<(), RenderError> {
        self.check()?;
        self.frame = RenderFrame::filled(BLACK);
        self.texts.clear();
        self.clears += 1;
        Ok(())
    }

    pub fn shape(&mut self, shape: &Shape) -> Result<(), RenderError> {
        self.check()?;
        if let Shape::Text { x, y, text, colour } = shape {
            self.texts.push(TextMark {
                x: *x,
                y: *y,
                text: text.clone(),
                colour: *colour,
            });
        } else {
            self.frame.draw(shape);
        }
        Ok(())
    }

    fn check(&self) -> Result<(), RenderError> {
        if self.offline {
            Err(RenderError::Disconnected)
        } else {
            Ok(())
        }
    }
}

impl DisplaySink for Framebuffer {
    async fn set_image(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        self.replace(frame)
    }

    async fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> Result<(), RenderError> {
        self.plot(x, y, colour)
    }

    async fn clear(&mut self) -> Result<(), RenderError> {
        self.blank()
    }

    async fn draw_shape(&mut self, shape: &Shape) -> Result<(), RenderError> {
        self.shape(shape)
    }
}

// ── Shared handle ─────────────────────────────────────────────

/// Cloneable handle to one [`Framebuffer`].
#[derive(Debug, Clone)]
pub struct SharedFramebuffer(Rc<RefCell<Framebuffer>>);

impl Default for SharedFramebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedFramebuffer {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Framebuffer::new())))
    }

    /// Read access for inspection.  Do not hold across an `.await`.
    pub fn borrow(&self) -> Ref<'_, Framebuffer> {
        self.0.borrow()
    }

    /// Run `f` with exclusive access.
    pub fn with<T>(&self, f: impl FnOnce(&mut Framebuffer) -> T) -> T {
        f(&mut *self.0.borrow_mut())
    }

    pub fn snapshot(&self) -> RenderFrame {
        self.0.borrow().frame().clone()
    }
}

impl DisplaySink for SharedFramebuffer {
    async fn set_image(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        self.with(|fb| fb.replace(frame))
    }

    async fn set_pixel(&mut self, x: usize, y: usize, colour: Rgb) -> Result<(), RenderError> {
        self.with(|fb| fb.plot(x, y, colour))
    }

    async fn clear(&mut self) -> Result<(), RenderError> {
        self.with(Framebuffer::blank)
    }

    async fn draw_shape(&mut self, shape: &Shape) -> Result<(), RenderError> {
        self.with(|fb| fb.shape(shape))
    }
}
