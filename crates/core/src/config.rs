//! Game configuration.
//!
//! `GameConfig::default()` is the reference ruleset: 1000ms gravity at level 1,
//! 100ms faster per level down to a 100ms floor, a level every 10 lines, simple column
//! kicks, uniform random pieces with a one-deep preview, and no drop points.
//! Hosts can override any field from JSON; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pieces::RotationSystem;
use crate::rng::Randomizer;
use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, LINES_PER_LEVEL, MAX_FRAME_MS, MAX_PREVIEW,
};

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("gravity interval must be positive (min_interval_ms = 0)")]
    ZeroInterval,
    #[error("min_interval_ms ({min}) exceeds base_interval_ms ({base})")]
    FloorAboveBase { min: u32, base: u32 },
    #[error("lines_per_level must be positive")]
    ZeroLinesPerLevel,
    #[error("max_frame_ms must be positive")]
    ZeroFrameClamp,
    #[error("preview_len {0} is outside 1..={max}", max = MAX_PREVIEW)]
    PreviewLen(usize),
}

/// Gravity clock and level curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// Interval between gravity steps at level 1
    pub base_interval_ms: u32,
    /// Interval reduction per level above 1
    pub interval_step_ms: u32,
    /// Interval floor
    pub min_interval_ms: u32,
    pub lines_per_level: u32,
    /// Largest delta a single `advance` call feeds the accumulator
    pub max_frame_ms: u32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: BASE_DROP_MS,
            interval_step_ms: DROP_STEP_MS,
            min_interval_ms: DROP_INTERVAL_MIN_MS,
            lines_per_level: LINES_PER_LEVEL,
            max_frame_ms: MAX_FRAME_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gravity: GravityConfig,
    pub randomizer: Randomizer,
    pub rotation_system: RotationSystem,
    /// Next-queue depth exposed in snapshots
    pub preview_len: usize,
    /// Award 1 point per soft-dropped cell and 2 per hard-dropped cell
    pub drop_scoring: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: GravityConfig::default(),
            randomizer: Randomizer::Uniform,
            rotation_system: RotationSystem::Simple,
            preview_len: 1,
            drop_scoring: false,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gravity;
        if g.min_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if g.min_interval_ms > g.base_interval_ms {
            return Err(ConfigError::FloorAboveBase {
                min: g.min_interval_ms,
                base: g.base_interval_ms,
            });
        }
        if g.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        if g.max_frame_ms == 0 {
            return Err(ConfigError::ZeroFrameClamp);
        }
        if !(1..=MAX_PREVIEW).contains(&self.preview_len) {
            return Err(ConfigError::PreviewLen(self.preview_len));
        }
        Ok(())
    }
}
