//! Variable timestep simulation step
//!
//! Core game loop that advances the run by the caller-supplied frame delta.

use rand::Rng;

use super::difficulty;
use super::state::{GameOverCause, GamePhase, GameState};
use crate::highscores::BestScoreStore;

impl<S: BestScoreStore> GameState<S> {
    /// Advance the run by `delta_ms` of frame time
    ///
    /// No-op unless Running. The first call after a resume treats its delta as
    /// zero. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, delta_ms: f64) {
        if self.phase != GamePhase::Running {
            return;
        }

        let delta_ms = if self.skip_next_delta {
            self.skip_next_delta = false;
            0.0
        } else if delta_ms.is_finite() && delta_ms > 0.0 {
            delta_ms
        } else {
            0.0
        };

        // 1. Running time
        self.elapsed_ms += delta_ms;

        // 2. Difficulty staircase
        self.fall_speed = difficulty::fall_speed(&self.tuning, self.elapsed_ms);

        // 3. Spawn cadence
        if self.elapsed_ms - self.last_spawn_ms > self.spawn_interval_ms {
            self.spawn_random_tile();
        }

        // 4. Constant-velocity descent
        let dy = self.fall_speed * (delta_ms / 1000.0) as f32;
        for tile in &mut self.tiles {
            tile.y += dy;
        }

        // 5. A single miss ends the run
        let tuning = &self.tuning;
        if let Some(missed) = self.tiles.iter().find(|t| t.is_missed(tuning)) {
            let cause = GameOverCause::Miss {
                tile_id: missed.id,
                column: missed.column,
            };
            log::debug!("Tile {} missed at y={:.1}", missed.id, missed.y);
            self.tiles.clear();
            self.end_run(cause);
            return;
        }

        // 6. Drop hit tiles past their grace period
        let elapsed = self.elapsed_ms;
        self.tiles.retain(|t| !t.is_expired(elapsed));

        log::trace!(
            "t={:.0}ms speed={:.1} tiles={}",
            self.elapsed_ms,
            self.fall_speed,
            self.tiles.len()
        );
    }

    fn spawn_random_tile(&mut self) {
        let column = self.rng.random_range(0..self.tuning.columns);
        self.push_tile(column);
        self.spawn_interval_ms =
            difficulty::next_spawn_interval(&self.tuning, self.spawn_interval_ms);
        self.last_spawn_ms = self.elapsed_ms;
    }
}
