//! Player and lifecycle commands
//!
//! Commands issued in a phase that does not accept them are silent no-ops, so
//! an uncoordinated input source can drive the state safely.

use super::state::{GameEvent, GameOverCause, GamePhase, GameState};
use crate::highscores::BestScoreStore;

impl<S: BestScoreStore> GameState<S> {
    /// Begin a new run. Valid from Idle or GameOver.
    pub fn start(&mut self) {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
            return;
        }
        self.reset_run();
        self.phase = GamePhase::Running;
        log::info!("Session started (best {})", self.best_score);
        self.emit(GameEvent::SessionStarted);
    }

    /// Suspend a running game. Writes any coalesced best score.
    pub fn pause(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Paused;
        self.flush_best();
        log::info!("Paused at {:.0} ms", self.elapsed_ms);
        self.emit(GameEvent::Paused);
    }

    /// Continue a paused game. The next `advance` ignores its delta.
    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.phase = GamePhase::Running;
        self.skip_next_delta = true;
        log::info!("Resumed");
        self.emit(GameEvent::Resumed);
    }

    /// Tap `column` at caller time `at_ms`
    ///
    /// Hits the oldest unhit tile in the column whose center is within the hit
    /// tolerance of the hit line. With no such tile the run ends.
    pub fn tap(&mut self, column: usize, at_ms: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        if column >= self.tuning.columns {
            log::debug!("Ignoring tap in nonexistent column {}", column);
            return;
        }

        let tuning = &self.tuning;
        let target = self
            .tiles
            .iter_mut()
            .find(|t| t.column == column && t.in_hit_window(tuning));

        let Some(tile) = target else {
            log::debug!("Mistap in column {} at {:.0} ms", column, at_ms);
            self.end_run(GameOverCause::Mistap { column, at_ms });
            return;
        };

        tile.hit = true;
        tile.remove_after_ms = Some(self.elapsed_ms + tuning.hit_grace_ms);
        let tile_id = tile.id;

        self.score += 1;
        log::debug!("Hit tile {} (score {})", tile_id, self.score);
        self.emit(GameEvent::TileHit {
            tile_id,
            score: self.score,
        });
        self.raise_best();
    }

    /// Abandon the current run and return to Idle. Valid from any phase.
    pub fn quit(&mut self) {
        if self.phase == GamePhase::Idle {
            return;
        }
        self.flush_best();
        self.reset_run();
        self.phase = GamePhase::Idle;
        log::info!("Session quit");
    }

    /// Spawn a tile in a chosen column outside the regular cadence
    ///
    /// For scripted openings and tests. Returns the new tile's id, or `None`
    /// when not running or the column does not exist.
    pub fn spawn_tile_at(&mut self, column: usize) -> Option<u32> {
        if self.phase != GamePhase::Running || column >= self.tuning.columns {
            return None;
        }
        Some(self.push_tile(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::tuning::Tuning;

    /// Tuning with spawning pushed far out so tests place tiles by hand
    fn quiet_tuning() -> Tuning {
        Tuning {
            initial_spawn_interval_ms: 1e9,
            min_spawn_interval_ms: 1e9,
            ..Default::default()
        }
    }

    fn running(best: u64) -> GameState {
        let mut state = GameState::new(quiet_tuning(), MemoryStore::with_best(best), 7);
        state.start();
        state.drain_events();
        state
    }

    /// Put a tile directly on the hit line in `column`
    fn tile_on_line(state: &mut GameState, column: usize) -> u32 {
        let id = state.spawn_tile_at(column).unwrap();
        let hit_line = state.tuning.hit_line_y;
        state.tiles.iter_mut().find(|t| t.id == id).unwrap().y = hit_line;
        id
    }

    #[test]
    fn test_start_only_from_idle_or_game_over() {
        let mut state = GameState::with_seed(1);
        state.start();
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(state.drain_events(), vec![GameEvent::SessionStarted]);

        // Already running
        state.start();
        assert!(state.drain_events().is_empty());

        state.pause();
        state.start();
        assert_eq!(state.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_pause_resume() {
        let mut state = running(0);
        state.pause();
        assert_eq!(state.phase(), GamePhase::Paused);
        state.pause();
        assert_eq!(state.drain_events(), vec![GameEvent::Paused]);

        state.resume();
        assert_eq!(state.phase(), GamePhase::Running);
        assert!(state.skip_next_delta);
        state.resume();
        assert_eq!(state.drain_events(), vec![GameEvent::Resumed]);
    }

    #[test]
    fn test_hit_scores_one() {
        let mut state = running(10);
        let id = tile_on_line(&mut state, 2);
        state.drain_events();

        state.tap(2, 100.0);
        assert_eq!(state.score(), 1);
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::TileHit {
                tile_id: id,
                score: 1
            }]
        );

        let tile = state.tile(id).unwrap();
        assert!(tile.hit);
        assert_eq!(tile.remove_after_ms, Some(state.tuning.hit_grace_ms));
    }

    #[test]
    fn test_tap_picks_oldest_eligible_tile() {
        let mut state = running(0);
        let first = tile_on_line(&mut state, 1);
        let second = tile_on_line(&mut state, 1);

        state.tap(1, 0.0);
        assert!(state.tile(first).unwrap().hit);
        assert!(!state.tile(second).unwrap().hit);

        state.tap(1, 0.0);
        assert!(state.tile(second).unwrap().hit);
        assert_eq!(state.score(), 2);
    }

    #[test]
    fn test_hit_tile_cannot_be_hit_twice() {
        let mut state = running(0);
        tile_on_line(&mut state, 0);
        state.tap(0, 0.0);
        state.tap(0, 0.0);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_mistap_ends_run() {
        let mut state = running(0);
        tile_on_line(&mut state, 2);
        state.drain_events();

        state.tap(0, 250.0);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.score(), 0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::GameOver {
                final_score: 0,
                best_score: 0,
                cause: GameOverCause::Mistap {
                    column: 0,
                    at_ms: 250.0
                },
            }]
        );
    }

    #[test]
    fn test_tap_outside_tolerance_is_mistap() {
        let mut state = running(0);
        let id = state.spawn_tile_at(3).unwrap();
        let y = state.tuning.hit_line_y - state.tuning.hit_tolerance - 1.0;
        state.tiles.iter_mut().find(|t| t.id == id).unwrap().y = y;

        state.tap(3, 0.0);
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_tap_in_nonexistent_column_is_ignored() {
        let mut state = running(0);
        state.tap(99, 0.0);
        assert_eq!(state.phase(), GamePhase::Running);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_commands_ignored_when_not_running() {
        let mut state = GameState::with_seed(3);
        state.tap(0, 0.0);
        state.pause();
        state.resume();
        assert_eq!(state.phase(), GamePhase::Idle);
        assert!(state.drain_events().is_empty());
        assert!(state.spawn_tile_at(0).is_none());

        state.start();
        state.pause();
        state.drain_events();
        state.tap(0, 0.0);
        assert_eq!(state.phase(), GamePhase::Paused);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_new_best_written_once_then_flushed() {
        let mut state = running(1);
        for _ in 0..4 {
            tile_on_line(&mut state, 0);
            state.tap(0, 0.0);
        }
        assert_eq!(state.best_score(), 4);
        // Only the overtaking hit wrote
        assert_eq!(state.store().writes, vec![2]);

        let events = state.drain_events();
        let announcements = events
            .iter()
            .filter(|e| matches!(e, GameEvent::NewBestScore { .. }))
            .count();
        assert_eq!(announcements, 1);

        state.tap(1, 0.0);
        assert_eq!(state.store().writes, vec![2, 4]);
    }

    #[test]
    fn test_quit_discards_run_keeps_best() {
        let mut state = running(0);
        tile_on_line(&mut state, 0);
        state.tap(0, 0.0);
        tile_on_line(&mut state, 0);
        state.tap(0, 0.0);

        state.quit();
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.score(), 0);
        assert!(state.tiles().is_empty());
        assert_eq!(state.best_score(), 2);
        assert_eq!(state.store().writes, vec![1, 2]);
    }

    #[test]
    fn test_pause_writes_coalesced_best() {
        let mut state = running(0);
        for _ in 0..3 {
            tile_on_line(&mut state, 0);
            state.tap(0, 0.0);
        }
        assert_eq!(state.store().writes, vec![1]);

        state.pause();
        assert_eq!(state.store().writes, vec![1, 3]);

        // Nothing new to write
        state.resume();
        state.pause();
        assert_eq!(state.store().writes, vec![1, 3]);
    }

    #[test]
    fn test_quit_from_paused() {
        let mut state = running(0);
        for _ in 0..3 {
            tile_on_line(&mut state, 1);
            state.tap(1, 0.0);
        }
        tile_on_line(&mut state, 2);
        state.pause();

        state.quit();
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.score(), 0);
        assert!(state.tiles().is_empty());
        assert_eq!(state.best_score(), 3);
        assert_eq!(state.store().stored(), Some(3));
        assert_eq!(state.store().writes, vec![1, 3]);
    }

    #[test]
    fn test_quit_from_game_over() {
        let mut state = running(0);
        for _ in 0..4 {
            tile_on_line(&mut state, 0);
            state.tap(0, 0.0);
        }
        // Mistap with a live tile still on the field
        tile_on_line(&mut state, 3);
        state.tap(2, 0.0);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert!(!state.tiles().is_empty());
        assert_eq!(state.store().writes, vec![1, 4]);

        state.quit();
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.score(), 0);
        assert!(state.tiles().is_empty());
        assert_eq!(state.best_score(), 4);
        assert_eq!(state.store().writes, vec![1, 4]);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = running(0);
        tile_on_line(&mut state, 0);
        state.tap(0, 0.0);
        state.tap(0, 0.0);
        assert_eq!(state.phase(), GamePhase::GameOver);

        state.start();
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(state.score(), 0);
        assert!(state.tiles().is_empty());
        assert_eq!(state.best_score(), 1);
    }
}
