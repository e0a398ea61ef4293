//! Decorative loading animation: coloured rectangles accumulating at
//! random positions over a dark-blue background.
//!
//! The animation owns no timer.  The sequencer calls [`LoadingAnimation::advance`]
//! once per animation frame while it is suspended in a hold, and composes
//! the result under whatever progress bar is on screen.

use heapless::Deque;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::frame::{MATRIX_SIZE, RenderFrame, Rgb, Shape};

pub const BACKGROUND: Rgb = (0, 0, 32);

/// Rectangles kept on screen; the oldest is dropped first.
const MAX_RECTS: usize = 16;

pub struct LoadingAnimation {
    rng: SmallRng,
    rects: Deque<Shape, MAX_RECTS>,
    rects_per_frame: u8,
    frames: u32,
    active: bool,
}

impl LoadingAnimation {
    pub fn new(rects_per_frame: u8) -> Self {
        Self::with_rng(SmallRng::from_entropy(), rects_per_frame)
    }

    /// Deterministic placement, for reproducible frames.
    pub fn seeded(seed: u64, rects_per_frame: u8) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed), rects_per_frame)
    }

    fn with_rng(rng: SmallRng, rects_per_frame: u8) -> Self {
        Self {
            rng,
            rects: Deque::new(),
            rects_per_frame,
            frames: 0,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.rects.clear();
        self.frames = 0;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Frames advanced since the last `start`.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Scatter the next batch of rectangles.  No-op when stopped.
    pub fn advance(&mut self) {
        if !self.active {
            return;
        }
        for _ in 0..self.rects_per_frame {
            if self.rects.is_full() {
                self.rects.pop_front();
            }
            let rect = self.random_rect();
            // Cannot fail: a slot was freed above.
            let _ = self.rects.push_back(rect);
        }
        self.frames += 1;
    }

    /// Background plus every live rectangle.
    pub fn compose(&self) -> RenderFrame {
        let mut frame = RenderFrame::filled(BACKGROUND);
        if self.active {
            for rect in self.rects.iter() {
                frame.draw(rect);
            }
        }
        frame
    }

    fn random_rect(&mut self) -> Shape {
        let max_origin = (MATRIX_SIZE - 8) as i32;
        Shape::Rect {
            x: self.rng.gen_range(0..=max_origin),
            y: self.rng.gen_range(0..=max_origin),
            width: self.rng.gen_range(4..=8),
            height: self.rng.gen_range(4..=8),
            colour: (
                self.rng.r#gen(),
                self.rng.r#gen(),
                self.rng.gen_range(100..=255),
            ),
        }
    }
}
