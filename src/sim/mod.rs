//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only from the caller-supplied frame delta
//! - Seeded RNG only
//! - Stable iteration order (by tile ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod commands;
pub mod difficulty;
pub mod state;
pub mod tick;

pub use autoplay::AutoPlayer;
pub use state::{GameEvent, GameOverCause, GamePhase, GameState, Tile};
