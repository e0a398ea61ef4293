//! Unified error types for the visual cortex.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! coordinator sees one shape regardless of whether a grid edit, a frame
//! push or a bridge round-trip failed.
//!
//! Validation and unknown-handle errors are always returned, never
//! escalated.  Render and bridge errors are logged where they happen and
//! then returned; the grid loop clears the display before handing them up.

use core::fmt;

use crate::matrix::SpriteId;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller input was rejected; nothing was mutated.
    Validation(ValidationError),
    /// The display sink rejected or failed a draw call.
    Render(RenderError),
    /// A command arrived before `initialize()` completed.
    NotInitialized,
    /// A sprite id that is not in the local registry.
    UnknownHandle(SpriteId),
    /// The command bridge failed or answered with an error.
    Bridge(BridgeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Render(e) => write!(f, "render: {e}"),
            Self::NotInitialized => write!(f, "visual cortex not initialized"),
            Self::UnknownHandle(id) => write!(f, "unknown sprite handle {id}"),
            Self::Bridge(e) => write!(f, "bridge: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Cell coordinate outside `[0, GRID_SIZE)`.
    CellOutOfBounds { x: usize, y: usize },
    /// Cell state other than 0 or 1.
    InvalidState(u8),
    /// Replacement grid has the wrong number of rows.
    GridRows(usize),
    /// Replacement grid row `row` has `len` columns.
    GridColumns { row: usize, len: usize },
    /// Region has no rows or no columns.
    EmptyRegion,
    /// Region row `row` does not match the width of row 0.
    RaggedRegion { row: usize, len: usize, expected: usize },
    /// Region anchored at `(x, y)` with the given size leaves the grid.
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Loading progress above 100.
    ProgressOutOfRange(u8),
    /// Loading step index past the end of the sequence.
    StepOutOfRange(usize),
    /// No seed pattern with the requested name.
    UnknownPattern,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutOfBounds { x, y } => write!(f, "cell ({x}, {y}) out of bounds"),
            Self::InvalidState(s) => write!(f, "invalid cell state {s}"),
            Self::GridRows(n) => write!(f, "grid has {n} rows, expected 64"),
            Self::GridColumns { row, len } => {
                write!(f, "grid row {row} has {len} columns, expected 64")
            }
            Self::EmptyRegion => write!(f, "region is empty"),
            Self::RaggedRegion { row, len, expected } => {
                write!(f, "region row {row} has {len} columns, expected {expected}")
            }
            Self::RegionOutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "region {width}x{height} at ({x}, {y}) leaves the grid"),
            Self::ProgressOutOfRange(p) => write!(f, "progress {p} above 100"),
            Self::StepOutOfRange(i) => write!(f, "loading step {i} out of range"),
            Self::UnknownPattern => write!(f, "unknown seed pattern"),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Render errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The sink refused the operation.
    Rejected(&'static str),
    /// The sink is gone (matrix unplugged, bridge closed).
    Disconnected,
    /// Forwarding the frame over the bridge failed.
    Bridge(BridgeError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(why) => write!(f, "rejected: {why}"),
            Self::Disconnected => write!(f, "display disconnected"),
            Self::Bridge(e) => write!(f, "{e}"),
        }
    }
}

impl From<RenderError> for Error {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<BridgeError> for RenderError {
    fn from(e: BridgeError) -> Self {
        Self::Bridge(e)
    }
}

// ---------------------------------------------------------------------------
// Bridge errors
// ---------------------------------------------------------------------------

/// Maximum length of a remote error message kept in [`BridgeError::Remote`].
pub const REMOTE_MESSAGE_CAP: usize = 96;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The far side of the bridge is not servicing requests.
    Disconnected,
    /// A response arrived for a different request id.
    Desync { expected: u32, got: u32 },
    /// The bridge answered with an error status.
    Remote(heapless::String<REMOTE_MESSAGE_CAP>),
    /// The response payload was missing a required field.
    MalformedResponse(&'static str),
}

impl BridgeError {
    /// Build a [`BridgeError::Remote`], truncating the message to fit.
    pub fn remote(message: &str) -> Self {
        let mut s = heapless::String::new();
        for ch in message.chars() {
            if s.push(ch).is_err() {
                break;
            }
        }
        Self::Remote(s)
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "bridge disconnected"),
            Self::Desync { expected, got } => {
                write!(f, "response id {got} does not match request {expected}")
            }
            Self::Remote(msg) => write!(f, "remote error: {msg}"),
            Self::MalformedResponse(field) => write!(f, "response missing '{field}'"),
        }
    }
}

impl From<BridgeError> for Error {
    fn from(e: BridgeError) -> Self {
        Self::Bridge(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
