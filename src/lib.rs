//! Tile Tap - falling-tile reflex game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile motion, hit/miss detection, game state)
//! - `highscores`: Best-score storage collaborator
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::{BestScoreStore, JsonFileStore, MemoryStore, StorageError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Number of tile columns
    pub const COLUMNS: usize = 4;

    /// Playfield height in distance units (y grows downward, 0 is the top edge)
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Playfield width in distance units
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    /// Vertical position of the hit line
    pub const HIT_LINE_Y: f32 = 480.0;
    /// Max distance between tile center and hit line for a tap to count
    pub const HIT_TOLERANCE: f32 = 40.0;
    /// Half the tile height
    pub const TILE_EXTENT: f32 = 50.0;

    /// Fall speed at the start of a run (units/s)
    pub const BASE_FALL_SPEED: f32 = 200.0;
    /// Fall speed added per difficulty step (units/s)
    pub const FALL_SPEED_INCREASE: f32 = 40.0;
    /// Running time per difficulty step (10 seconds)
    pub const SPEED_STEP_MS: f64 = 10_000.0;

    /// Spawn interval at the start of a run
    pub const INITIAL_SPAWN_INTERVAL_MS: f64 = 1000.0;
    /// Multiplicative decay applied to the spawn interval after each spawn
    pub const SPAWN_DECAY: f64 = 0.98;
    /// Spawn interval floor
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 350.0;

    /// How long a hit tile stays on the field before removal
    pub const HIT_GRACE_MS: f64 = 150.0;
}

/// Horizontal center of a column in playfield units
#[inline]
pub fn column_center_x(column: usize, columns: usize, width: f32) -> f32 {
    let column_width = width / columns.max(1) as f32;
    column_width * (column as f32 + 0.5)
}
