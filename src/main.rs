//! Rocket Flapper headless runner
//!
//! Plays games with a simple autopilot and logs every presentation call.
//! The browser build drives `GameLoop` from its own frame callback instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;

    use rocket_flapper::consts::REFERENCE_FRAME_MS;
    use rocket_flapper::persistence::{JsonFileStore, MemoryStore, ScoreStore};
    use rocket_flapper::platform::{Clock, ManualClock, SystemClock, init_logging};
    use rocket_flapper::presentation::LogSink;
    use rocket_flapper::sim::{DtPolicy, GameOutcome, GameState, TickInput};
    use rocket_flapper::tuning::ControlScheme;
    use rocket_flapper::{GameLoop, Preset, TuningProfile};

    #[derive(Parser)]
    #[command(name = "rocket-flapper")]
    #[command(about = "Play Rocket Flapper headlessly with an autopilot")]
    struct Args {
        /// Tuning preset: tracking or gravity
        #[arg(long, default_value = "tracking")]
        preset: String,
        /// JSON tuning file (overrides --preset)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Seed for spawn randomness
        #[arg(long)]
        seed: Option<u64>,
        /// Number of games to play back to back
        #[arg(long, default_value_t = 1)]
        games: u32,
        /// Give up on a game after this many frames
        #[arg(long, default_value_t = 36_000)]
        max_frames: u64,
        /// Best-score file (kept in memory if omitted)
        #[arg(long)]
        high_score: Option<PathBuf>,
        /// Pace frames against the wall clock instead of simulating time
        #[arg(long)]
        realtime: bool,
    }

    fn load_tuning(args: &Args) -> Result<TuningProfile> {
        if let Some(path) = &args.tuning {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading tuning file {}", path.display()))?;
            return TuningProfile::from_json(&json)
                .with_context(|| format!("parsing tuning file {}", path.display()));
        }
        Preset::from_str(&args.preset)
            .map(|p| p.profile())
            .ok_or_else(|| {
                anyhow!(
                    "unknown preset '{}' (expected tracking or gravity)",
                    args.preset
                )
            })
    }

    /// Steer toward the nearest live target and away from anything lethal ahead
    fn autopilot(game: &GameState) -> TickInput {
        let craft_x = game.tuning.craft_x();
        let craft_y = game.craft.y;

        let mut target_y = game
            .entities
            .iter()
            .filter(|e| !e.hit && !e.kind.is_lethal() && e.pos.x > craft_x - 20.0)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|e| e.pos.y)
            .unwrap_or(game.tuning.field_height / 2.0);

        let threat = game
            .entities
            .iter()
            .filter(|e| e.kind.is_lethal())
            .filter(|e| e.pos.x > craft_x - 40.0 && e.pos.x < craft_x + 160.0)
            .find(|e| (e.pos.y - target_y).abs() < e.collision_radius + game.craft.radius + 15.0);
        if let Some(threat) = threat {
            let clearance = threat.collision_radius + game.craft.radius + 20.0;
            target_y = if threat.pos.y > game.tuning.field_height / 2.0 {
                threat.pos.y - clearance
            } else {
                threat.pos.y + clearance
            };
        }

        match game.tuning.control {
            ControlScheme::Tracking => {
                // Limited pointer speed, like a hand on a mouse
                let step = (target_y - craft_y).clamp(-6.0, 6.0);
                TickInput {
                    pointer_y: Some(craft_y + step),
                    action: false,
                }
            }
            ControlScheme::Gravity { .. } => TickInput {
                pointer_y: None,
                action: craft_y > target_y + 10.0 && game.craft.vel >= 0.0,
            },
        }
    }

    fn play<C: Clock>(
        game_loop: &mut GameLoop<LogSink, Box<dyn ScoreStore>, C>,
        max_frames: u64,
        mut pace: impl FnMut(&C),
    ) -> Option<GameOutcome> {
        let mut frames = 0;
        loop {
            let Some(input) = game_loop.game().map(autopilot) else {
                return None;
            };
            if !game_loop.frame(&input) {
                break;
            }
            frames += 1;
            if frames >= max_frames {
                log::warn!("Giving up after {frames} frames");
                break;
            }
            pace(game_loop.clock());
        }
        game_loop.outcome()
    }

    fn run_games<C: Clock>(
        mut game_loop: GameLoop<LogSink, Box<dyn ScoreStore>, C>,
        args: &Args,
        pace: impl FnMut(&C) + Copy,
    ) -> Vec<Option<GameOutcome>> {
        let mut results = Vec::new();
        for round in 0..args.games {
            if round == 0 {
                game_loop.start();
            } else {
                game_loop.restart();
            }
            results.push(play(&mut game_loop, args.max_frames, pace));
        }
        log::info!("Best score: {}", game_loop.high_score());
        results
    }

    pub fn main() -> Result<()> {
        init_logging();
        let args = Args::parse();
        let tuning = load_tuning(&args)?;

        let store: Box<dyn ScoreStore> = match &args.high_score {
            Some(path) => Box::new(JsonFileStore::open(path)),
            None => Box::new(MemoryStore::new()),
        };

        log::info!("Rocket Flapper (native) starting with '{}' tuning", tuning.name);

        let results = if args.realtime {
            let mut game_loop = GameLoop::new(tuning, LogSink, store, SystemClock::new())
                .with_policy(DtPolicy::elapsed());
            if let Some(seed) = args.seed {
                game_loop = game_loop.with_seed(seed);
            }
            let frame = Duration::from_micros((REFERENCE_FRAME_MS * 1000.0) as u64);
            run_games(game_loop, &args, |_| std::thread::sleep(frame))
        } else {
            let mut game_loop = GameLoop::new(tuning, LogSink, store, ManualClock::new(0));
            if let Some(seed) = args.seed {
                game_loop = game_loop.with_seed(seed);
            }
            let frame_ms = REFERENCE_FRAME_MS.round() as u64;
            run_games(game_loop, &args, move |clock: &ManualClock| {
                clock.advance(frame_ms)
            })
        };

        for (round, result) in results.iter().enumerate() {
            match result {
                Some(outcome) => println!(
                    "game {}: {} score {} (bonus hits {}/{})",
                    round + 1,
                    outcome.kind.title(),
                    outcome.score,
                    outcome.bonus_hits,
                    outcome.bonus_target
                ),
                None => println!("game {}: unfinished", round + 1),
            }
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(extra: &[&str]) -> Args {
            let argv = std::iter::once("rocket-flapper").chain(extra.iter().copied());
            Args::try_parse_from(argv).unwrap()
        }

        #[test]
        fn test_load_tuning_from_preset() {
            let tuning = load_tuning(&args(&["--preset", "gravity"])).unwrap();
            assert_eq!(tuning, TuningProfile::gravity());
            assert!(load_tuning(&args(&["--preset", "bogus"])).is_err());
        }

        #[test]
        fn test_load_tuning_rejects_invalid_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("tuning.json");
            let mut profile = TuningProfile::tracking();
            profile.craft_min_y = 300.0;
            profile.craft_max_y = 100.0;
            std::fs::write(&path, serde_json::to_string(&profile).unwrap()).unwrap();

            let err = load_tuning(&args(&["--tuning", path.to_str().unwrap()])).unwrap_err();
            let message = format!("{err:#}");
            assert!(message.contains("parsing tuning file"), "{message}");
            assert!(message.contains("craft_min_y"), "{message}");
        }

        #[test]
        fn test_load_tuning_missing_file() {
            let err = load_tuning(&args(&["--tuning", "/nonexistent/tuning.json"])).unwrap_err();
            assert!(format!("{err:#}").contains("reading tuning file"));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host owns the frame loop; nothing to do here
    rocket_flapper::platform::init_logging();
}
