//! Tile Tap headless runner
//!
//! Plays seeded sessions with the attract-mode player at a fixed frame rate
//! and logs how each one went.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use tile_tap::sim::{AutoPlayer, GameEvent, GamePhase, GameState};
    use tile_tap::{BestScoreStore, JsonFileStore, MemoryStore, Tuning};

    #[derive(Debug, Parser)]
    #[command(name = "tile-tap", about = "Play Tile Tap sessions with the autoplayer")]
    struct Args {
        /// Seed for the first session; later sessions use seed + n
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of sessions to play
        #[arg(long, default_value_t = 3)]
        sessions: u32,
        /// Chance the autoplayer handles each tile (0.0 - 1.0)
        #[arg(long, default_value_t = 0.98)]
        skill: f64,
        /// Tuning JSON file
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Best score JSON file (kept in memory when omitted)
        #[arg(long)]
        best_score: Option<PathBuf>,
        /// Simulated frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Stop a session after this much running time
        #[arg(long, default_value_t = 300)]
        max_seconds: u32,
        /// Print every event as JSON
        #[arg(long)]
        events: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();
        log::info!("Tile Tap (native) starting...");

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        let mut store: Box<dyn BestScoreStore> = match &args.best_score {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };

        let frame_ms = 1000.0 / f64::from(args.fps.max(1));
        let max_ms = f64::from(args.max_seconds) * 1000.0;

        for n in 0..args.sessions {
            let seed = args.seed.wrapping_add(u64::from(n));
            let mut state = GameState::new(tuning.clone(), &mut store, seed);
            let mut player = AutoPlayer::new(seed, args.skill);

            state.start();
            let mut now_ms = 0.0;
            while state.phase() == GamePhase::Running && state.elapsed_ms() < max_ms {
                now_ms += frame_ms;
                state.advance(frame_ms);
                for column in player.decide(&state) {
                    state.tap(column, now_ms);
                }
                for event in state.drain_events() {
                    report(&event, args.events)?;
                }
            }
            let (score, elapsed_ms) = (state.score(), state.elapsed_ms());
            if state.phase() == GamePhase::Running {
                log::info!("Session {} hit the time limit", n + 1);
                state.quit();
            }

            println!(
                "session {} (seed {}): score {}, best {}, {:.1}s",
                n + 1,
                seed,
                score,
                state.best_score(),
                elapsed_ms / 1000.0
            );
        }

        Ok(())
    }

    fn report(event: &GameEvent, print: bool) -> Result<()> {
        if print {
            println!("{}", serde_json::to_string(event)?);
        }
        if let GameEvent::NewBestScore { best } = event {
            log::info!("New best score: {}", best);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The game core is driven from the host page on the web
}
