//! Difficulty curves
//!
//! Fall speed is a coarse staircase over running time; the spawn interval
//! decays geometrically per spawn down to a floor. Both are pure functions of
//! tuning and elapsed time, so a run replays identically for the same inputs.

use crate::tuning::Tuning;

/// Number of completed speed steps after `elapsed_ms` of running time
pub fn speed_level(tuning: &Tuning, elapsed_ms: f64) -> u32 {
    (elapsed_ms.max(0.0) / tuning.speed_step_ms).floor() as u32
}

/// Fall speed (units/s) after `elapsed_ms` of running time
pub fn fall_speed(tuning: &Tuning, elapsed_ms: f64) -> f32 {
    tuning.base_fall_speed + tuning.fall_speed_increase * speed_level(tuning, elapsed_ms) as f32
}

/// Spawn interval to use after a spawn, given the current one
pub fn next_spawn_interval(tuning: &Tuning, current_ms: f64) -> f64 {
    (current_ms * tuning.spawn_decay).max(tuning.min_spawn_interval_ms)
}
