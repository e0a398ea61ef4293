//! Frame and shape types shared by every renderer.
//!
//! A [`RenderFrame`] is a full 64×64 RGB image, row-major, `(x, y)` with
//! the origin in the top-left corner.  Frames are ephemeral: the grid
//! engine builds a fresh one each generation and the splash sequencer
//! builds one per stage.

use core::fmt;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Side length of the LED matrix.
pub const MATRIX_SIZE: usize = 64;

pub const BLACK: Rgb = (0, 0, 0);
pub const WHITE: Rgb = (255, 255, 255);

/// Longest text a [`Shape::Text`] carries.
pub const TEXT_CAP: usize = 32;

// ── RenderFrame ───────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pixels: Box<[[Rgb; MATRIX_SIZE]; MATRIX_SIZE]>,
}

impl RenderFrame {
    /// All-black frame.
    pub fn new() -> Self {
        Self::filled(BLACK)
    }

    pub fn filled(colour: Rgb) -> Self {
        Self {
            pixels: Box::new([[colour; MATRIX_SIZE]; MATRIX_SIZE]),
        }
    }

    /// Pixel at `(x, y)`, or `None` off-matrix.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        self.pixels.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Set a pixel.  Returns `false` (and draws nothing) off-matrix.
    pub fn set(&mut self, x: usize, y: usize, colour: Rgb) -> bool {
        match self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(px) => {
                *px = colour;
                true
            }
            None => false,
        }
    }

    /// Number of pixels that are not black.
    pub fn lit_pixels(&self) -> usize {
        self.pixels
            .iter()
            .flat_map(|row| row.iter())
            .filter(|px| **px != BLACK)
            .count()
    }

    /// Row-major pixel list, as carried by the bridge.
    pub fn to_pixels(&self) -> Vec<Rgb> {
        self.pixels.iter().flat_map(|row| row.iter().copied()).collect()
    }

    /// Inverse of [`to_pixels`](Self::to_pixels).  `None` unless exactly
    /// 64×64 pixels are given.
    pub fn from_pixels(pixels: &[Rgb]) -> Option<Self> {
        if pixels.len() != MATRIX_SIZE * MATRIX_SIZE {
            return None;
        }
        let mut frame = Self::new();
        for (row, chunk) in frame.pixels.iter_mut().zip(pixels.chunks_exact(MATRIX_SIZE)) {
            row.copy_from_slice(chunk);
        }
        Some(frame)
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb; MATRIX_SIZE]> {
        self.pixels.iter()
    }

    /// Rasterise `shape` onto the frame, clipping at the edges.
    ///
    /// Text has no glyph set here; it is left to the sink and this
    /// returns `false` for it.
    pub fn draw(&mut self, shape: &Shape) -> bool {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                colour,
            } => {
                let (x0, x1) = clamp_span(*x, *width);
                let (y0, y1) = clamp_span(*y, *height);
                for py in y0..y1 {
                    for px in x0..x1 {
                        self.set(px, py, *colour);
                    }
                }
                true
            }
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                colour,
            } => {
                let segment = (i64::from(*x1), i64::from(*y1), i64::from(*x2), i64::from(*y2));
                if let Some((x1, y1, x2, y2)) = clip_line(segment) {
                    self.line(x1, y1, x2, y2, *colour);
                }
                true
            }
            Shape::Circle {
                x,
                y,
                radius,
                colour,
            } => {
                self.circle(i64::from(*x), i64::from(*y), i64::from(*radius), *colour);
                true
            }
            Shape::Text { .. } => false,
        }
    }

    fn plot(&mut self, x: i64, y: i64, colour: Rgb) {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            self.set(x, y, colour);
        }
    }

    // Bresenham, all octants.  Endpoints are already clipped.
    fn line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, colour: Rgb) {
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let (mut x, mut y) = (x1, y1);
        let mut err = dx + dy;
        loop {
            self.plot(x, y, colour);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    // Midpoint circle outline.
    fn circle(&mut self, cx: i64, cy: i64, r: i64, colour: Rgb) {
        if cx + r < 0 || cy + r < 0 || cx - r > EDGE || cy - r > EDGE {
            return;
        }
        let (mut x, mut y) = (r, 0);
        let mut err = 1 - r;
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx - x, cy + y),
                (cx - x, cy - y),
                (cx - y, cy - x),
                (cx + y, cy - x),
                (cx + x, cy - y),
            ] {
                self.plot(px, py, colour);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }
}

/// Last on-matrix coordinate.
const EDGE: i64 = MATRIX_SIZE as i64 - 1;

/// `start..start + len` clamped to the matrix.
fn clamp_span(start: i32, len: u16) -> (usize, usize) {
    let lo = i64::from(start).clamp(0, EDGE + 1);
    let hi = (i64::from(start) + i64::from(len)).clamp(0, EDGE + 1);
    (lo as usize, hi as usize)
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

fn outcode(x: i64, y: i64) -> u8 {
    let mut code = 0;
    if x < 0 {
        code |= LEFT;
    } else if x > EDGE {
        code |= RIGHT;
    }
    if y < 0 {
        code |= TOP;
    } else if y > EDGE {
        code |= BOTTOM;
    }
    code
}

/// Point at `num / den` of the way from `from` to `to`, in i128.
fn lerp(from: i64, to: i64, num: i64, den: i64) -> i64 {
    (i128::from(from) + i128::from(to - from) * i128::from(num) / i128::from(den)) as i64
}

/// Cohen–Sutherland clip of a segment to the matrix.  `None` when no
/// part of it is visible.
fn clip_line((mut x1, mut y1, mut x2, mut y2): (i64, i64, i64, i64)) -> Option<(i64, i64, i64, i64)> {
    let mut code1 = outcode(x1, y1);
    let mut code2 = outcode(x2, y2);
    loop {
        if (code1 | code2) == 0 {
            return Some((x1, y1, x2, y2));
        }
        if (code1 & code2) != 0 {
            return None;
        }
        let out = if code1 != 0 { code1 } else { code2 };
        let (x, y) = if out & TOP != 0 {
            (lerp(x1, x2, -y1, y2 - y1), 0)
        } else if out & BOTTOM != 0 {
            (lerp(x1, x2, EDGE - y1, y2 - y1), EDGE)
        } else if out & RIGHT != 0 {
            (EDGE, lerp(y1, y2, EDGE - x1, x2 - x1))
        } else {
            (0, lerp(y1, y2, -x1, x2 - x1))
        };
        if out == code1 {
            (x1, y1) = (x, y);
            code1 = outcode(x1, y1);
        } else {
            (x2, y2) = (x, y);
            code2 = outcode(x2, y2);
        }
    }
}

impl Default for RenderFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderFrame")
            .field("lit_pixels", &self.lit_pixels())
            .finish()
    }
}

// ── Shapes ────────────────────────────────────────────────────

/// Vector primitives a [`DisplaySink`](crate::app::ports::DisplaySink)
/// can draw on top of the current image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Rect {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        colour: Rgb,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        colour: Rgb,
    },
    Circle {
        x: i32,
        y: i32,
        radius: u16,
        colour: Rgb,
    },
    Text {
        x: i32,
        y: i32,
        text: heapless::String<TEXT_CAP>,
        colour: Rgb,
    },
}

impl Shape {
    /// Text shape, truncated to [`TEXT_CAP`] characters.
    pub fn text(x: i32, y: i32, text: &str, colour: Rgb) -> Self {
        Self::Text {
            x,
            y,
            text: truncated(text),
            colour,
        }
    }
}

/// Copy as much of `s` as fits into a fixed-capacity string.
pub fn truncated<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
