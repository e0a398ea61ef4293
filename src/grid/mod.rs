//! Toroidal Game of Life grid and its generational render loop.
//!
//! ```text
//!  ┌──────────┐ render_frame ┌─────────────┐ set_image ┌─────────────┐
//!  │   Grid   │─────────────▶│ RenderFrame │──────────▶│ DisplaySink │
//!  └──────────┘              └─────────────┘           └─────────────┘
//!       ▲ next_generation (B3/S23, wraps at the edges)
//!       └──────────── every `generation_interval_ms` ─────────────┘
//! ```
//!
//! The engine is the only writer of its grid.  Edits go through
//! [`GridEngine::update_cell`], [`GridEngine::update_region`] and
//! [`GridEngine::set_grid`]; all three validate first and either apply the
//! whole edit or nothing.  A region that does not fit entirely inside the
//! grid is rejected, the same way an out-of-range cell is.

pub mod patterns;

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::Arc;

use log::{debug, error, info, warn};
use rand::Rng;

use crate::app::events::CortexEvent;
use crate::app::ports::{Delay, DisplaySink, EventSink, NoopEvents};
use crate::config::GridConfig;
use crate::error::{RenderError, Result, ValidationError};
use crate::frame::{MATRIX_SIZE, RenderFrame, Rgb};

use patterns::Pattern;

/// Side length of the grid.
pub const GRID_SIZE: usize = MATRIX_SIZE;

// ───────────────────────────────────────────────────────────────
// Grid
// ───────────────────────────────────────────────────────────────

/// A 64×64 field of dead/alive cells, indexed `(x, y)`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Box<[[bool; GRID_SIZE]; GRID_SIZE]>,
}

impl Grid {
    /// All-dead grid.
    pub fn new() -> Self {
        Self {
            cells: Box::new([[false; GRID_SIZE]; GRID_SIZE]),
        }
    }

    /// Build a grid from exactly 64 rows of exactly 64 zeros and ones.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> core::result::Result<Self, ValidationError> {
        if rows.len() != GRID_SIZE {
            return Err(ValidationError::GridRows(rows.len()));
        }
        let mut grid = Self::new();
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != GRID_SIZE {
                return Err(ValidationError::GridColumns { row: y, len: row.len() });
            }
            for (x, &state) in row.iter().enumerate() {
                grid.cells[y][x] = cell_state(state)?;
            }
        }
        Ok(grid)
    }

    /// The grid as 64 rows of 0/1.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|&alive| u8::from(alive)).collect())
            .collect()
    }

    /// Cell state at `(x, y)`, or `None` off-grid.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.cells.get(y).and_then(|row| row.get(x)).map(|&alive| u8::from(alive))
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(1)
    }

    /// Number of live cells.
    pub fn live_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|&&alive| alive).count()
    }

    /// Live cells among the 8 neighbours of `(x, y)`, wrapping at every edge.
    pub fn live_neighbours(&self, x: usize, y: usize) -> u8 {
        let mut count = 0u8;
        for dy in [GRID_SIZE - 1, 0, 1] {
            for dx in [GRID_SIZE - 1, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x + dx) % GRID_SIZE;
                let ny = (y + dy) % GRID_SIZE;
                if self.cells[ny][nx] {
                    count += 1;
                }
            }
        }
        count
    }

    /// The next generation under B3/S23.
    pub fn next_generation(&self) -> Self {
        let mut next = Self::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let alive = self.cells[y][x];
                next.cells[y][x] = matches!(
                    (alive, self.live_neighbours(x, y)),
                    (true, 2 | 3) | (false, 3)
                );
            }
        }
        next
    }

    /// Colour every live cell by its neighbour count; dead cells stay black.
    pub fn render(&self) -> RenderFrame {
        let mut frame = RenderFrame::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                if self.cells[y][x] {
                    frame.set(x, y, neighbour_colour(self.live_neighbours(x, y)));
                }
            }
        }
        frame
    }

    fn set(&mut self, x: usize, y: usize, alive: bool) {
        self.cells[y][x] = alive;
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Grid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Grid")
            .field("live_cells", &self.live_cells())
            .finish()
    }
}

/// Colour of a live cell with `neighbours` live neighbours.
pub fn neighbour_colour(neighbours: u8) -> Rgb {
    let green = (u16::from(neighbours) * 40).min(255) as u8;
    let blue = 255u8.saturating_sub(neighbours.saturating_mul(20));
    (0, green, blue)
}

fn cell_state(state: u8) -> core::result::Result<bool, ValidationError> {
    match state {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(ValidationError::InvalidState(other)),
    }
}

// ───────────────────────────────────────────────────────────────
// Run control
// ───────────────────────────────────────────────────────────────

/// Cloneable handle that stops a running [`GridEngine::run`] from another
/// task.  The loop notices at its next generation boundary.
#[derive(Debug, Clone)]
pub struct RunControl {
    running: Arc<AtomicBool>,
}

impl RunControl {
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

// ───────────────────────────────────────────────────────────────
// GridEngine
// ───────────────────────────────────────────────────────────────

pub struct GridEngine<S, D, E = NoopEvents> {
    grid: Grid,
    display: S,
    delay: D,
    events: E,
    running: Arc<AtomicBool>,
    generation: u64,
    interval: Duration,
}

impl<S: DisplaySink, D: Delay> GridEngine<S, D, NoopEvents> {
    pub fn new(display: S, delay: D, config: &GridConfig) -> Self {
        Self::with_events(display, delay, NoopEvents, config)
    }
}

impl<S: DisplaySink, D: Delay, E: EventSink> GridEngine<S, D, E> {
    pub fn with_events(display: S, delay: D, events: E, config: &GridConfig) -> Self {
        Self {
            grid: Grid::new(),
            display,
            delay,
            events,
            running: Arc::new(AtomicBool::new(false)),
            generation: 0,
            interval: Duration::from_millis(config.generation_interval_ms),
        }
    }

    // ── Edits ─────────────────────────────────────────────────

    /// Set one cell.  Out-of-range coordinates or a state other than 0/1
    /// are rejected and leave the grid untouched.
    pub fn update_cell(&mut self, x: usize, y: usize, state: u8) -> Result<()> {
        if x >= GRID_SIZE || y >= GRID_SIZE {
            warn!("Rejected cell update at ({}, {})", x, y);
            return Err(ValidationError::CellOutOfBounds { x, y }.into());
        }
        let alive = cell_state(state).inspect_err(|_| {
            warn!("Rejected cell update at ({}, {}) with state {}", x, y, state);
        })?;
        self.grid.set(x, y, alive);
        debug!("Updated cell ({}, {}) to {}", x, y, state);
        Ok(())
    }

    /// Write a rectangular block with its top-left corner at `(x, y)`.
    ///
    /// The block must be non-empty, rectangular, hold only 0/1 and fit
    /// entirely inside the grid; otherwise nothing is written.
    pub fn update_region<R: AsRef<[u8]>>(&mut self, x: usize, y: usize, region: &[R]) -> Result<()> {
        let (width, height) = validate_region(x, y, region).inspect_err(|e| {
            warn!("Rejected region update at ({}, {}): {}", x, y, e);
        })?;
        for (dy, row) in region.iter().enumerate() {
            for (dx, &state) in row.as_ref().iter().enumerate() {
                self.grid.set(x + dx, y + dy, state == 1);
            }
        }
        debug!("Updated {}x{} region at ({}, {})", width, height, x, y);
        Ok(())
    }

    /// Replace the whole grid.  The prior grid survives any rejection.
    pub fn set_grid<R: AsRef<[u8]>>(&mut self, rows: &[R]) -> Result<()> {
        let grid = Grid::from_rows(rows).inspect_err(|e| {
            warn!("Rejected grid replacement: {}", e);
        })?;
        self.grid = grid;
        debug!("Grid replaced ({} live cells)", self.grid.live_cells());
        Ok(())
    }

    /// Stamp a seed pattern with its top-left corner at `(x, y)`.
    pub fn stamp(&mut self, pattern: &Pattern, x: usize, y: usize) -> Result<()> {
        self.update_region(x, y, &pattern.to_region())
    }

    /// Fill the grid with a random soup of the given live-cell density.
    pub fn seed_random(&mut self, rng: &mut impl Rng, density: f64) {
        let density = density.clamp(0.0, 1.0);
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                self.grid.set(x, y, rng.gen_bool(density));
            }
        }
        info!("Seeded random soup ({} live cells)", self.grid.live_cells());
    }

    // ── Simulation ────────────────────────────────────────────

    /// Advance one generation without rendering.
    pub fn step(&mut self) {
        self.grid = self.grid.next_generation();
        self.generation += 1;
    }

    pub fn render_frame(&self) -> RenderFrame {
        self.grid.render()
    }

    /// Push the current generation to the display.
    pub async fn render(&mut self) -> core::result::Result<(), RenderError> {
        let frame = self.grid.render();
        self.display.set_image(&frame).await?;
        self.events.emit(&CortexEvent::GenerationRendered {
            generation: self.generation,
            live_cells: self.grid.live_cells(),
        });
        Ok(())
    }

    /// Render and advance until [`stop`](Self::stop) is called.
    ///
    /// The stop flag is checked once per generation, before rendering.
    /// Whatever ends the loop, the display is cleared before returning.  A
    /// render failure ends the loop and is returned after the clear.
    pub async fn run(&mut self) -> Result<()> {
        self.running.store(true, Ordering::Release);
        let first = self.generation;
        info!("Game of Life started at generation {}", first);

        let outcome = self.generation_loop().await;
        self.running.store(false, Ordering::Release);

        let cleared = self.display.clear().await;
        let rendered = self.generation - first;
        self.events.emit(&CortexEvent::GameStopped {
            generations: rendered,
        });
        info!("Game of Life stopped after {} generations", rendered);

        outcome?;
        cleared.inspect_err(|e| warn!("Display clear after Game of Life failed: {}", e))?;
        Ok(())
    }

    async fn generation_loop(&mut self) -> Result<()> {
        while self.running.load(Ordering::Acquire) {
            if let Err(e) = self.render().await {
                error!("Game of Life render failed at generation {}: {}", self.generation, e);
                return Err(e.into());
            }
            self.step();
            self.delay.delay(self.interval).await;
        }
        Ok(())
    }

    /// Request the loop to stop at its next generation boundary.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        info!("Game of Life stop requested");
    }

    /// Handle for stopping the loop from another task.
    pub fn run_control(&self) -> RunControl {
        RunControl {
            running: Arc::clone(&self.running),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        self.grid.get(x, y)
    }

    /// Generations advanced since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn display(&self) -> &S {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut S {
        &mut self.display
    }
}

fn validate_region<R: AsRef<[u8]>>(
    x: usize,
    y: usize,
    region: &[R],
) -> core::result::Result<(usize, usize), ValidationError> {
    let height = region.len();
    let width = region.first().map_or(0, |row| row.as_ref().len());
    if width == 0 || height == 0 {
        return Err(ValidationError::EmptyRegion);
    }
    for (row, cells) in region.iter().enumerate() {
        let cells = cells.as_ref();
        if cells.len() != width {
            return Err(ValidationError::RaggedRegion {
                row,
                len: cells.len(),
                expected: width,
            });
        }
        if let Some(&bad) = cells.iter().find(|&&s| s > 1) {
            return Err(ValidationError::InvalidState(bad));
        }
    }
    let fits = x.checked_add(width).is_some_and(|end| end <= GRID_SIZE)
        && y.checked_add(height).is_some_and(|end| end <= GRID_SIZE);
    if !fits {
        return Err(ValidationError::RegionOutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok((width, height))
}
