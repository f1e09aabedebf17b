//! Attract-mode player
//!
//! Watches the field and taps each tile once its center reaches the hit line.
//! `skill` is the chance of handling a given tile at all; a tile the player
//! decides to ignore falls through and ends the run.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GamePhase, GameState};
use crate::highscores::BestScoreStore;

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    skill: f64,
    /// Tiles already rolled for
    judged: HashSet<u32>,
    /// Tiles left to fall
    ignored: HashSet<u32>,
}

impl AutoPlayer {
    pub fn new(seed: u64, skill: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            skill: skill.clamp(0.0, 1.0),
            judged: HashSet::new(),
            ignored: HashSet::new(),
        }
    }

    pub fn skill(&self) -> f64 {
        self.skill
    }

    /// Columns to tap this frame
    pub fn decide<S: BestScoreStore>(&mut self, state: &GameState<S>) -> Vec<usize> {
        if state.phase() != GamePhase::Running {
            self.judged.clear();
            self.ignored.clear();
            return Vec::new();
        }

        let tuning = state.tuning();
        let live: HashSet<u32> = state.tiles().iter().map(|t| t.id).collect();
        self.judged.retain(|id| live.contains(id));
        self.ignored.retain(|id| live.contains(id));

        let mut taps = Vec::new();
        // Columns whose oldest eligible tile is being ignored; a tap there
        // would hit that tile instead
        let mut blocked = HashSet::new();

        for tile in state.tiles().iter().filter(|t| t.in_hit_window(tuning)) {
            if blocked.contains(&tile.column) || taps.contains(&tile.column) {
                continue;
            }
            if self.judged.insert(tile.id) && self.rng.random::<f64>() >= self.skill {
                log::debug!("Autoplay ignoring tile {}", tile.id);
                self.ignored.insert(tile.id);
            }
            if self.ignored.contains(&tile.id) {
                blocked.insert(tile.column);
                continue;
            }
            if tile.y >= tuning.hit_line_y {
                taps.push(tile.column);
            } else {
                // Oldest eligible tile in this column isn't ripe yet
                blocked.insert(tile.column);
            }
        }

        taps
    }
}
