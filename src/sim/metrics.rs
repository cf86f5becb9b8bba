//! Metrics aggregation
//!
//! Folds one tick's summed deltas into the run state and decides whether the
//! run has ended. Health loss is checked before goal completion.

use std::ops::AddAssign;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::QuotePools;
use super::state::{GameState, GameStatus};
use crate::config::EngineConfig;

/// Summed metric changes for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricDeltas {
    pub score: i64,
    pub health: i32,
    pub progress: f32,
    pub speed: f32,
    /// An instant-fail hazard was hit; health drops to zero
    #[serde(default)]
    pub fatal: bool,
}

impl AddAssign for MetricDeltas {
    fn add_assign(&mut self, rhs: Self) {
        self.score += rhs.score;
        self.health = self.health.saturating_add(rhs.health);
        self.progress += rhs.progress;
        self.speed += rhs.speed;
        self.fatal |= rhs.fatal;
    }
}

impl MetricDeltas {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Apply `deltas` to `state` if it is playing
///
/// Returns the terminal status entered this call, if any. On a terminal
/// transition a message is drawn from the matching pool of `quotes`.
pub fn aggregate<R: Rng>(
    state: &mut GameState,
    deltas: &MetricDeltas,
    config: &EngineConfig,
    quotes: &QuotePools,
    rng: &mut R,
) -> Option<GameStatus> {
    if !state.is_playing() {
        return None;
    }

    state.health = if deltas.fatal {
        0
    } else {
        state
            .health
            .saturating_add(deltas.health)
            .clamp(0, config.max_health)
    };

    // Progress only moves forward; a negative contribution is dropped
    if deltas.progress.is_finite() && deltas.progress > 0.0 {
        state.progress += deltas.progress;
    }
    state.score = state.score.saturating_add(deltas.score);
    if deltas.speed.is_finite() {
        state.speed = (state.speed + deltas.speed).max(0.0);
    }

    let outcome = if state.health <= 0 {
        GameStatus::GameOver
    } else if state.progress >= config.goal_progress {
        GameStatus::Success
    } else {
        return None;
    };

    state.status = outcome;
    let pool = quotes.pool_for(outcome);
    if !pool.is_empty() {
        state.last_quote = pool[rng.random_range(0..pool.len())].clone();
    }
    log::info!(
        "Run ended: {} (score {}, health {}, progress {:.0})",
        outcome.as_str(),
        state.score,
        state.health,
        state.progress
    );
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing(config: &EngineConfig) -> GameState {
        GameState::fresh(config.max_health, QuotePools::default().idle_message())
    }

    fn apply(state: &mut GameState, deltas: MetricDeltas, config: &EngineConfig) -> Option<GameStatus> {
        let mut rng = Pcg32::seed_from_u64(7);
        aggregate(state, &deltas, config, &QuotePools::default(), &mut rng)
    }

    #[test]
    fn test_health_clamped_to_max() {
        let config = EngineConfig::default();
        let mut state = playing(&config);
        let out = apply(
            &mut state,
            MetricDeltas {
                health: 40,
                ..Default::default()
            },
            &config,
        );
        assert_eq!(out, None);
        assert_eq!(state.health, config.max_health);
    }

    #[test]
    fn test_health_to_zero_is_game_over() {
        let config = EngineConfig::default();
        let mut state = playing(&config);
        let out = apply(
            &mut state,
            MetricDeltas {
                health: -250,
                score: -50,
                ..Default::default()
            },
            &config,
        );
        assert_eq!(out, Some(GameStatus::GameOver));
        assert_eq!(state.health, 0);
        assert_eq!(state.score, -50);
        assert!(QuotePools::default().game_over.contains(&state.last_quote));
    }

    #[test]
    fn test_fatal_overrides_healing() {
        let config = EngineConfig::default();
        let mut state = playing(&config);
        let out = apply(
            &mut state,
            MetricDeltas {
                health: 20,
                fatal: true,
                ..Default::default()
            },
            &config,
        );
        assert_eq!(out, Some(GameStatus::GameOver));
        assert_eq!(state.health, 0);
    }

    #[test]
    fn test_goal_reached_is_success() {
        let config = EngineConfig::default();
        let mut state = playing(&config);
        state.progress = config.goal_progress - 1.0;
        let out = apply(
            &mut state,
            MetricDeltas {
                progress: 100.0,
                score: 100,
                ..Default::default()
            },
            &config,
        );
        assert_eq!(out, Some(GameStatus::Success));
        assert_eq!(state.status, GameStatus::Success);
        assert!(QuotePools::default().success.contains(&state.last_quote));
    }

    #[test]
    fn test_health_loss_wins_over_goal() {
        let config = EngineConfig::default();
        let mut state = playing(&config);
        state.progress = config.goal_progress - 1.0;
        state.health = 10;
        let out = apply(
            &mut state,
            MetricDeltas {
                health: -10,
                progress: 100.0,
                ..Default::default()
            },
            &config,
        );
        assert_eq!(out, Some(GameStatus::GameOver));
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let config = EngineConfig::default();
        let mut state = playing(&config);
        state.status = GameStatus::Success;
        let before = state.clone();
        let out = apply(
            &mut state,
            MetricDeltas {
                health: -100,
                progress: 5.0,
                score: 9,
                speed: 1.0,
                fatal: true,
            },
            &config,
        );
        assert_eq!(out, None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_negative_progress_dropped_and_score_goes_negative() {
        let config = EngineConfig::default();
        let mut state = playing(&config);
        state.progress = 50.0;
        apply(
            &mut state,
            MetricDeltas {
                progress: -30.0,
                score: -120,
                ..Default::default()
            },
            &config,
        );
        assert_eq!(state.progress, 50.0);
        assert_eq!(state.score, -120);
    }

    #[test]
    fn test_deltas_sum() {
        let mut total = MetricDeltas::default();
        assert!(total.is_empty());
        total += MetricDeltas {
            score: 100,
            health: 10,
            progress: 100.0,
            ..Default::default()
        };
        total += MetricDeltas {
            score: -50,
            health: -20,
            fatal: true,
            ..Default::default()
        };
        assert_eq!(total.score, 50);
        assert_eq!(total.health, -10);
        assert_eq!(total.progress, 100.0);
        assert!(total.fatal);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(deltas in prop::collection::vec(-300i32..300, 1..64)) {
            let config = EngineConfig::default();
            let mut state = playing(&config);
            for health in deltas {
                apply(&mut state, MetricDeltas { health, ..Default::default() }, &config);
                prop_assert!(state.health >= 0 && state.health <= config.max_health);
            }
        }

        #[test]
        fn prop_progress_never_decreases(deltas in prop::collection::vec(-500.0f32..500.0, 1..64)) {
            let config = EngineConfig::default();
            let mut state = playing(&config);
            let mut last = state.progress;
            for progress in deltas {
                apply(&mut state, MetricDeltas { progress, ..Default::default() }, &config);
                prop_assert!(state.progress >= last);
                last = state.progress;
            }
        }

        #[test]
        fn prop_non_playing_state_untouched(
            score in -1000i64..1000,
            health in -200i32..200,
            progress in -500.0f32..20_000.0,
            fatal in any::<bool>(),
            status in prop_oneof![
                Just(GameStatus::Start),
                Just(GameStatus::GameOver),
                Just(GameStatus::Success),
            ],
        ) {
            let config = EngineConfig::default();
            let mut state = playing(&config);
            state.status = status;
            let before = state.clone();
            let out = apply(
                &mut state,
                MetricDeltas { score, health, progress, speed: 0.5, fatal },
                &config,
            );
            prop_assert_eq!(out, None);
            prop_assert_eq!(state, before);
        }
    }
}
