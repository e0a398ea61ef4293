//! Visual cortex configuration parameters
//!
//! All tunable parameters for the grid engine, splash sequencer and matrix
//! controller.  Every field has a default; a JSON document only needs to
//! name the values it overrides.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::splash::{LOADING_STEPS, SplashEffect};

/// Core configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CortexConfig {
    pub grid: GridConfig,
    pub splash: SplashConfig,
    pub matrix: MatrixConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Pause between generations (milliseconds)
    pub generation_interval_ms: u64,
    /// Fraction of live cells in a random soup (0.0-1.0)
    pub seed_density: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            generation_interval_ms: 100, // 10 Hz
            seed_density: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    /// Intro frame hold (seconds)
    pub startup_secs: f32,
    /// Completion frame hold (seconds)
    pub complete_secs: f32,
    /// Hold after each loading step (milliseconds)
    pub step_hold_ms: u64,
    /// Extra hold once 100% is reached (milliseconds)
    pub completion_hold_ms: u64,
    /// Decorative animation refresh period (milliseconds)
    pub animation_frame_ms: u64,
    /// Rectangles added per decorative frame
    pub animation_rects: u8,
    /// Hold for the static fallback splash (milliseconds)
    pub fallback_hold_ms: u64,
    /// Label shown when the loading animation starts
    pub initial_label: String,
    /// Lines drawn on the intro and fallback frames
    pub title_lines: Vec<String>,
    /// Named out-of-band events and their effect on the sequence
    pub events: Vec<EventBinding>,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            startup_secs: 2.0,
            complete_secs: 2.0,
            step_hold_ms: 500,
            completion_hold_ms: 1000,
            animation_frame_ms: 200,
            animation_rects: 1,
            fallback_hold_ms: 2000,
            initial_label: "Initializing systems...".into(),
            title_lines: vec!["PM".into(), "PENPHIN".into(), "MIND".into()],
            events: vec![
                EventBinding::new("led_matrix_ready", SplashEffect::AdvanceTo { step: 2 }),
                EventBinding::new("pathways_ready", SplashEffect::AdvanceTo { step: 4 }),
                EventBinding::new("mind_ready", SplashEffect::AdvanceTo { step: 6 }),
                EventBinding::new("splash_abort", SplashEffect::Abort),
            ],
        }
    }
}

/// One row of the splash event table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBinding {
    pub name: String,
    pub effect: SplashEffect,
}

impl EventBinding {
    pub fn new(name: &str, effect: SplashEffect) -> Self {
        Self {
            name: name.into(),
            effect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Brightness applied at initialisation (0-100%)
    pub brightness: u8,
    /// Sprite animation rate when the caller gives none
    pub animation_fps: u8,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            brightness: 80,
            animation_fps: 30,
        }
    }
}

// ── Loading & validation ──────────────────────────────────────

/// Errors from loading or validating a [`CortexConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    Parse(serde_json::Error),
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "config parse error: {}", e),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl CortexConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or break the core.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.grid;
        if g.generation_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("grid.generation_interval_ms must be > 0"));
        }
        if !(0.0..=1.0).contains(&g.seed_density) {
            return Err(ConfigError::ValidationFailed("grid.seed_density must be within 0..=1"));
        }

        let s = &self.splash;
        for secs in [s.startup_secs, s.complete_secs] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(ConfigError::ValidationFailed(
                    "splash durations must be finite and non-negative",
                ));
            }
        }
        if s.animation_frame_ms == 0 {
            return Err(ConfigError::ValidationFailed("splash.animation_frame_ms must be > 0"));
        }
        for (i, binding) in s.events.iter().enumerate() {
            if binding.name.is_empty() {
                return Err(ConfigError::ValidationFailed("splash event names must not be empty"));
            }
            if s.events[..i].iter().any(|b| b.name == binding.name) {
                return Err(ConfigError::ValidationFailed("splash event names must be unique"));
            }
            if let SplashEffect::AdvanceTo { step } = binding.effect {
                if step >= LOADING_STEPS.len() {
                    return Err(ConfigError::ValidationFailed(
                        "splash event step outside the loading sequence",
                    ));
                }
            }
        }

        let m = &self.matrix;
        if m.brightness > 100 {
            return Err(ConfigError::ValidationFailed("matrix.brightness must be 0-100"));
        }
        if m.animation_fps == 0 {
            return Err(ConfigError::ValidationFailed("matrix.animation_fps must be > 0"));
        }
        Ok(())
    }
}
