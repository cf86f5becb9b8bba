//! Race of Life - headless runner
//!
//! Drives the engine at a fixed step with the autopilot at the wheel, logs
//! the run and keeps the best score on disk.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::process;

    use clap::Parser;
    use race_of_life::autopilot;
    use race_of_life::consts::{REFERENCE_DT, REFERENCE_HZ};
    use race_of_life::highscores::{JsonFileStore, RunRecord, ScoreStore};
    use race_of_life::sim::{Catalog, Engine, GameEvent, GameState, GameStatus, TickInput};
    use race_of_life::{EngineConfig, HighScores, Variant};

    const DEFAULT_SCORES: &str = "race_of_life_scores.json";
    const DEFAULT_MAX_SECONDS: f32 = 600.0;

    /// Run one autopiloted race and keep the best score
    #[derive(Debug, Parser)]
    #[command(name = "race-of-life", version, about, long_about = None)]
    struct Args {
        /// Preset to run (classic|2d, lanes|3d); ignored when --config is given
        #[arg(long, value_name = "VARIANT", default_value = "classic", value_parser = parse_variant)]
        variant: Variant,
        /// RNG seed; a random one is drawn when omitted
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
        /// Engine config JSON (missing fields take the Classic values)
        #[arg(long, value_name = "FILE")]
        config: Option<String>,
        /// Hazard/benefit catalog JSON
        #[arg(long, value_name = "FILE")]
        catalog: Option<String>,
        /// High score file
        #[arg(long, value_name = "FILE", default_value = DEFAULT_SCORES)]
        scores: String,
        /// Stop an unfinished run after this many simulated seconds
        #[arg(
            long = "max-seconds",
            value_name = "SECONDS",
            default_value_t = DEFAULT_MAX_SECONDS,
            value_parser = parse_positive_seconds
        )]
        max_seconds: f32,
    }

    fn parse_variant(value: &str) -> Result<Variant, String> {
        Variant::from_str(value)
            .ok_or_else(|| format!("unknown variant '{value}', expected classic or lanes"))
    }

    fn parse_positive_seconds(value: &str) -> Result<f32, String> {
        let seconds: f32 = value
            .parse()
            .map_err(|e| format!("'{value}' is not a number: {e}"))?;
        if seconds.is_finite() && seconds > 0.0 {
            Ok(seconds)
        } else {
            Err(format!("must be a positive number of seconds, got {value}"))
        }
    }

    fn read_or_exit(path: &str) -> String {
        match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to read {}: {}", path, e);
                process::exit(1);
            }
        }
    }

    fn load_config(args: &Args) -> EngineConfig {
        let Some(path) = &args.config else {
            return EngineConfig::preset(args.variant);
        };
        match EngineConfig::from_json_str(&read_or_exit(path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid config {}: {}", path, e);
                process::exit(1);
            }
        }
    }

    fn load_catalog(args: &Args) -> Catalog {
        let Some(path) = &args.catalog else {
            return Catalog::default();
        };
        match Catalog::from_json_str(&read_or_exit(path)) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Invalid catalog {}: {}", path, e);
                process::exit(1);
            }
        }
    }

    /// Put a finished run on the board; runs cut off by the time limit are not recorded
    fn record_outcome(
        scores: &mut HighScores,
        outcome: Option<GameStatus>,
        state: &GameState,
    ) -> Option<RunRecord> {
        let status = outcome.filter(|status| status.is_terminal())?;
        Some(scores.record_run(state.score, state.progress, status))
    }

    pub fn run() {
        env_logger::init();
        let args = Args::parse();

        let config = load_config(&args);
        let catalog = load_catalog(&args);
        let seed = args.seed.unwrap_or_else(rand::random);

        let mut store = JsonFileStore::new(&args.scores);
        let mut scores = store.load().unwrap_or_else(|e| {
            log::warn!("Could not load high scores from {}: {}", args.scores, e);
            HighScores::new()
        });
        log::info!("Race of Life starting (best so far: {})", scores.best());

        let mut engine = Engine::new(config, catalog, seed);
        log::info!("{}", engine.state().last_quote);
        engine.start();

        let max_ticks = (args.max_seconds * REFERENCE_HZ).ceil() as u64;
        let mut outcome = None;
        for _ in 0..max_ticks {
            let intent = autopilot::steer(&engine.snapshot(), engine.config());
            let report = engine.tick(&TickInput::steer(intent), REFERENCE_DT);
            for event in &report.events {
                match event {
                    GameEvent::Collected { label, impact, .. } => {
                        log::debug!("Collected '{}' ({:+})", label, impact);
                    }
                    GameEvent::Finished { status, .. } => outcome = Some(*status),
                    _ => {}
                }
            }
            if outcome.is_some() {
                break;
            }
        }

        let state = engine.state();
        let Some(record) = record_outcome(&mut scores, outcome, state) else {
            log::warn!(
                "Run {} stopped after {} s without finishing (score {}, progress {:.0}); not recorded",
                engine.run(),
                args.max_seconds,
                state.score,
                state.progress
            );
            return;
        };
        log::info!(
            "Run {} ended: {} | score {} | health {} | progress {:.0}/{:.0} | {} ticks",
            engine.run(),
            state.status.as_str(),
            state.score,
            state.health,
            state.progress,
            engine.config().goal_progress,
            engine.time_ticks()
        );
        if !state.last_quote.is_empty() {
            log::info!("\"{}\"", state.last_quote);
        }

        if let Some(rank) = record.rank {
            log::info!("Leaderboard rank #{}", rank);
        }
        if record.new_best || record.rank.is_some() {
            if let Err(e) = store.save(&scores) {
                log::error!("Failed to save high scores: {}", e);
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition_is_valid() {
            Args::command().debug_assert();
        }

        #[test]
        fn test_cli_defaults() {
            let args = Args::try_parse_from(["race-of-life"]).unwrap();
            assert_eq!(args.variant, Variant::Classic);
            assert_eq!(args.seed, None);
            assert_eq!(args.scores, DEFAULT_SCORES);
            assert_eq!(args.max_seconds, DEFAULT_MAX_SECONDS);
        }

        #[test]
        fn test_cli_parses_flags() {
            let args = Args::try_parse_from([
                "race-of-life",
                "--variant",
                "3d",
                "--seed",
                "42",
                "--max-seconds",
                "12.5",
            ])
            .unwrap();
            assert_eq!(args.variant, Variant::Lanes);
            assert_eq!(args.seed, Some(42));
            assert_eq!(args.max_seconds, 12.5);
        }

        #[test]
        fn test_cli_rejects_bad_values() {
            assert!(Args::try_parse_from(["race-of-life", "--variant", "kart"]).is_err());
            assert!(Args::try_parse_from(["race-of-life", "--seed"]).is_err());
            assert!(Args::try_parse_from(["race-of-life", "--seed", "-1"]).is_err());
            assert!(Args::try_parse_from(["race-of-life", "--max-seconds", "0"]).is_err());
            assert!(Args::try_parse_from(["race-of-life", "--max-seconds", "inf"]).is_err());
        }

        #[test]
        fn test_unfinished_run_is_not_recorded() {
            let mut scores = HighScores::new();
            let mut state = GameState::fresh(100, String::new());
            state.score = 500;
            state.progress = 3_000.0;

            assert_eq!(record_outcome(&mut scores, None, &state), None);
            assert!(scores.is_empty());
            assert_eq!(scores.best(), 0);

            state.status = GameStatus::GameOver;
            let record = record_outcome(&mut scores, Some(GameStatus::GameOver), &state).unwrap();
            assert_eq!(record.rank, Some(1));
            assert!(record.new_best);
            assert_eq!(scores.entries[0].outcome, GameStatus::GameOver);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The engine is embedded by a web host; there is no native entry point
}
