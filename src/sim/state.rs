//! Game state and core simulation types
//!
//! A [`GameState`] is an explicit value owned by the caller. Every command
//! mutates it in place and queues [`GameEvent`]s for the presentation layer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty;
use crate::column_center_x;
use crate::highscores::{BestScoreStore, MemoryStore};
use crate::tuning::Tuning;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run in progress, showing instructions
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run suspended by the player
    Paused,
    /// Run ended by a miss or mistap
    GameOver,
}

/// A falling tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub column: usize,
    /// Vertical center, growing downward from the top of the playfield
    pub y: f32,
    pub hit: bool,
    /// Running time after which a hit tile is dropped from the field
    pub remove_after_ms: Option<f64>,
}

impl Tile {
    pub fn new(id: u32, column: usize, y: f32) -> Self {
        Self {
            id,
            column,
            y,
            hit: false,
            remove_after_ms: None,
        }
    }

    /// Whether a tap on this tile's column would hit it right now
    pub fn in_hit_window(&self, tuning: &Tuning) -> bool {
        !self.hit && (self.y - tuning.hit_line_y).abs() <= tuning.hit_tolerance
    }

    /// Unhit and too far past the hit line to be saved
    pub fn is_missed(&self, tuning: &Tuning) -> bool {
        !self.hit && self.y - tuning.hit_line_y > tuning.miss_threshold()
    }

    /// Hit and past its display grace period
    pub fn is_expired(&self, elapsed_ms: f64) -> bool {
        self.remove_after_ms
            .is_some_and(|deadline| elapsed_ms >= deadline)
    }

    /// Center in playfield coordinates, for rendering
    pub fn center(&self, tuning: &Tuning) -> Vec2 {
        let x = column_center_x(self.column, tuning.columns, tuning.playfield_width);
        Vec2::new(x, self.y)
    }
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameOverCause {
    /// An unhit tile fell past the hit line
    Miss { tile_id: u32, column: usize },
    /// A tap landed in a column with nothing to hit
    Mistap { column: usize, at_ms: f64 },
}

/// Outcome notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStarted,
    Paused,
    Resumed,
    TileSpawned { tile: Tile },
    TileHit { tile_id: u32, score: u64 },
    /// First hit of a run that beats the previous best
    NewBestScore { best: u64 },
    GameOver {
        final_score: u64,
        best_score: u64,
        cause: GameOverCause,
    },
}

/// Complete game state
#[derive(Debug)]
pub struct GameState<S: BestScoreStore = MemoryStore> {
    pub(crate) tuning: Tuning,
    pub(crate) phase: GamePhase,
    pub(crate) score: u64,
    pub(crate) best_score: u64,
    /// Running time of the current run (pauses excluded)
    pub(crate) elapsed_ms: f64,
    pub(crate) spawn_interval_ms: f64,
    pub(crate) last_spawn_ms: f64,
    pub(crate) fall_speed: f32,
    /// Live tiles, sorted by id
    pub(crate) tiles: Vec<Tile>,
    /// Next `advance` ignores its delta (set on resume)
    pub(crate) skip_next_delta: bool,
    /// A new best was already written this run
    pub(crate) record_announced: bool,
    /// Best was raised again after the announced write
    pub(crate) best_dirty: bool,
    pub(crate) rng: Pcg32,
    seed: u64,
    events: Vec<GameEvent>,
    store: S,
    next_id: u32,
}

impl GameState<MemoryStore> {
    /// Default tuning, in-memory best score
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Tuning::default(), MemoryStore::new(), seed)
    }
}

impl<S: BestScoreStore> GameState<S> {
    /// Create an idle game state. Reads the best score from `store` once.
    pub fn new(tuning: Tuning, store: S, seed: u64) -> Self {
        let best_score = match store.load_best_score() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Failed to load best score, using 0: {}", e);
                0
            }
        };

        Self {
            fall_speed: difficulty::fall_speed(&tuning, 0.0),
            spawn_interval_ms: tuning.initial_spawn_interval_ms,
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            best_score,
            elapsed_ms: 0.0,
            last_spawn_ms: 0.0,
            tiles: Vec::new(),
            skip_next_delta: false,
            record_announced: false,
            best_dirty: false,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            events: Vec::new(),
            store,
            next_id: 1,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.spawn_interval_ms
    }

    pub fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Events queued since the last drain, oldest first
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand queued events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Allocate a new tile ID
    pub(crate) fn next_tile_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put a fresh tile above the visible area in `column`
    pub(crate) fn push_tile(&mut self, column: usize) -> u32 {
        let id = self.next_tile_id();
        let tile = Tile::new(id, column, -self.tuning.tile_extent);
        log::debug!("Spawned tile {} in column {}", id, column);
        self.tiles.push(tile.clone());
        self.emit(GameEvent::TileSpawned { tile });
        id
    }

    /// Reset per-run values to their configured starting points
    pub(crate) fn reset_run(&mut self) {
        self.score = 0;
        self.tiles.clear();
        self.elapsed_ms = 0.0;
        self.last_spawn_ms = 0.0;
        self.spawn_interval_ms = self.tuning.initial_spawn_interval_ms;
        self.fall_speed = difficulty::fall_speed(&self.tuning, 0.0);
        self.skip_next_delta = false;
        self.record_announced = false;
        self.best_dirty = false;
    }

    /// Raise the best score after a successful hit
    ///
    /// The first raise of a run is written through immediately; later raises
    /// are written on pause, when the run ends, or when the state is dropped.
    pub(crate) fn raise_best(&mut self) {
        if self.score <= self.best_score {
            return;
        }
        self.best_score = self.score;
        if self.record_announced {
            self.best_dirty = true;
            return;
        }
        self.record_announced = true;
        self.persist_best();
        self.emit(GameEvent::NewBestScore {
            best: self.best_score,
        });
    }

    /// Write a coalesced best score, if any
    pub(crate) fn flush_best(&mut self) {
        if self.best_dirty {
            self.best_dirty = false;
            self.persist_best();
        }
    }

    fn persist_best(&mut self) {
        if let Err(e) = self.store.save_best_score(self.best_score) {
            log::warn!("Failed to save best score {}: {}", self.best_score, e);
        }
    }

    /// Move to GameOver and announce it
    pub(crate) fn end_run(&mut self, cause: GameOverCause) {
        self.phase = GamePhase::GameOver;
        self.flush_best();
        log::info!(
            "Game over ({:?}): score {}, best {}",
            cause,
            self.score,
            self.best_score
        );
        self.emit(GameEvent::GameOver {
            final_score: self.score,
            best_score: self.best_score,
            cause,
        });
    }
}

impl<S: BestScoreStore> Drop for GameState<S> {
    fn drop(&mut self) {
        self.flush_best();
    }
}
