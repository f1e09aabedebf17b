//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`] so difficulty can be adjusted
//! from a JSON file without recompiling. Missing fields fall back to
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning file is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub columns: usize,
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub hit_line_y: f32,
    /// Tap acceptance: `|center - hit_line_y| <= hit_tolerance`
    pub hit_tolerance: f32,
    /// Half the tile height. Misses trigger at `hit_tolerance + tile_extent`
    /// past the hit line.
    pub tile_extent: f32,
    pub base_fall_speed: f32,
    pub fall_speed_increase: f32,
    pub speed_step_ms: f64,
    pub initial_spawn_interval_ms: f64,
    pub spawn_decay: f64,
    pub min_spawn_interval_ms: f64,
    pub hit_grace_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            columns: COLUMNS,
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            hit_line_y: HIT_LINE_Y,
            hit_tolerance: HIT_TOLERANCE,
            tile_extent: TILE_EXTENT,
            base_fall_speed: BASE_FALL_SPEED,
            fall_speed_increase: FALL_SPEED_INCREASE,
            speed_step_ms: SPEED_STEP_MS,
            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            spawn_decay: SPAWN_DECAY,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            hit_grace_ms: HIT_GRACE_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> TuningError {
            TuningError::Invalid { field, reason }
        }

        if self.columns == 0 {
            return Err(invalid("columns", "must be at least 1"));
        }
        if !(self.playfield_width > 0.0) {
            return Err(invalid("playfield_width", "must be positive"));
        }
        if !(self.playfield_height > 0.0) {
            return Err(invalid("playfield_height", "must be positive"));
        }
        if !(self.hit_line_y > 0.0 && self.hit_line_y <= self.playfield_height) {
            return Err(invalid("hit_line_y", "must lie inside the playfield"));
        }
        if !(self.hit_tolerance >= 0.0) {
            return Err(invalid("hit_tolerance", "must not be negative"));
        }
        if !(self.tile_extent >= 0.0) {
            return Err(invalid("tile_extent", "must not be negative"));
        }
        if !(self.base_fall_speed > 0.0) {
            return Err(invalid("base_fall_speed", "must be positive"));
        }
        if !(self.fall_speed_increase >= 0.0) {
            return Err(invalid("fall_speed_increase", "must not be negative"));
        }
        if !(self.speed_step_ms > 0.0) {
            return Err(invalid("speed_step_ms", "must be positive"));
        }
        if !(self.min_spawn_interval_ms > 0.0) {
            return Err(invalid("min_spawn_interval_ms", "must be positive"));
        }
        if !(self.initial_spawn_interval_ms >= self.min_spawn_interval_ms) {
            return Err(invalid(
                "initial_spawn_interval_ms",
                "must not be below min_spawn_interval_ms",
            ));
        }
        if !(self.spawn_decay > 0.0 && self.spawn_decay <= 1.0) {
            return Err(invalid("spawn_decay", "must be in (0, 1]"));
        }
        if !(self.hit_grace_ms >= 0.0) {
            return Err(invalid("hit_grace_ms", "must not be negative"));
        }
        Ok(())
    }

    /// Distance past the hit line at which an unhit tile counts as missed
    pub fn miss_threshold(&self) -> f32 {
        self.hit_tolerance + self.tile_extent
    }
}
