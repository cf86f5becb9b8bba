//! Race of Life - an endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Seedable simulation (spawning, kinematics, collisions, metrics, status)
//! - `config`: Variant presets and tunables, loadable from JSON
//! - `highscores`: Best score and leaderboard bookkeeping with pluggable storage
//! - `autopilot`: Idle/demo steering
//!
//! Rendering, input capture and storage media belong to the host. The core
//! consumes a steering intent per tick and exposes read-only snapshots.

pub mod autopilot;
pub mod config;
pub mod error;
pub mod highscores;
pub mod sim;

pub use config::{Approach, BenefitRule, EngineConfig, HazardPolicy, SpawnPolicy, Variant};
pub use error::{CatalogError, ConfigError, StoreError};
pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    /// Reference tick rate that per-frame tunables are expressed against
    pub const REFERENCE_HZ: f32 = 60.0;
    /// Reference timestep (one frame at 60 Hz)
    pub const REFERENCE_DT: f32 = 1.0 / REFERENCE_HZ;
    /// Largest frame delta accepted by a tick (a stalled tab must not teleport entities)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Upper bound on collision sub-steps within one tick
    pub const MAX_SUBSTEPS: u32 = 64;

    /// Health ceiling; health is clamped to [0, MAX_HEALTH]
    pub const MAX_HEALTH: i32 = 100;
    /// Distance that completes a run
    pub const GOAL_PROGRESS: f32 = 10_000.0;
}

/// Convert a per-reference-frame probability into a probability for `dt` seconds.
///
/// `1 - (1 - p)^(dt * 60)`, so the expected event rate is independent of the tick rate.
#[inline]
pub fn rate_per_tick(per_frame: f32, dt: f32) -> f32 {
    let p = per_frame.clamp(0.0, 1.0);
    if p <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    1.0 - (1.0 - p).powf(dt * consts::REFERENCE_HZ)
}

/// Convert a per-reference-frame smoothing factor into the factor for `dt` seconds.
///
/// Same law as [`rate_per_tick`]; a factor of 1 always snaps.
#[inline]
pub fn lerp_factor_for_dt(per_frame: f32, dt: f32) -> f32 {
    rate_per_tick(per_frame, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_per_tick_matches_reference_frame() {
        let p = rate_per_tick(0.02, consts::REFERENCE_DT);
        assert!((p - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_rate_per_tick_two_half_frames_equal_one_frame() {
        let half = rate_per_tick(0.3, consts::REFERENCE_DT / 2.0);
        let combined = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((combined - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_rate_per_tick_edges() {
        assert_eq!(rate_per_tick(0.0, 1.0), 0.0);
        assert_eq!(rate_per_tick(0.5, 0.0), 0.0);
        assert_eq!(rate_per_tick(1.0, 0.001), 1.0);
        assert_eq!(lerp_factor_for_dt(1.0, consts::REFERENCE_DT), 1.0);
    }
}
