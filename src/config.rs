//! Engine configuration and variant presets
//!
//! Every difference between the game variants (graded health loss vs instant
//! fail, continuous x vs lanes, per-frame vs timed spawning) is a field here,
//! so one engine runs all of them. Rates are per second and probabilities/
//! smoothing factors are per 60 Hz reference frame, normalized to the tick delta.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{GOAL_PROGRESS, MAX_HEALTH};
use crate::error::ConfigError;

/// Stock variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Top-down canvas: free horizontal movement, graded hazards
    #[default]
    Classic,
    /// Three lanes, smoothed lane changes, any hazard ends the run
    Lanes,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Lanes => "lanes",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "2d" => Some(Variant::Classic),
            "lanes" | "3d" => Some(Variant::Lanes),
            _ => None,
        }
    }
}

/// How the vehicle closes the gap to its steering target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Approach {
    /// Jump straight to the target
    Instant,
    /// Move at most `speed` units per second
    Step { speed: f32 },
    /// `x += (target - x) * factor` per reference frame
    Lerp { factor: f32 },
}

/// When new entities appear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Independent draw each tick; `probability` is per reference frame
    PerTick { probability: f32 },
    /// One entity every `seconds`
    Interval { seconds: f32 },
}

/// Effect of collecting a benefit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenefitRule {
    pub score: i64,
    pub progress: f32,
    /// Whether the catalog impact is added to health
    pub heals: bool,
}

/// Effect of hitting a hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HazardPolicy {
    /// Catalog impact is added to health
    Graded { score_penalty: i64 },
    /// Health drops to zero regardless of impact
    InstantFail { score_penalty: i64 },
}

impl HazardPolicy {
    pub fn score_penalty(&self) -> i64 {
        match *self {
            HazardPolicy::Graded { score_penalty } | HazardPolicy::InstantFail { score_penalty } => {
                score_penalty
            }
        }
    }

    pub fn is_instant_fail(&self) -> bool {
        matches!(self, HazardPolicy::InstantFail { .. })
    }
}

/// Complete engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Track geometry ===
    pub track_width: f32,
    /// Terminal edge; entities whose top passes it are dropped
    pub track_length: f32,
    /// Starting edge where entities appear
    pub spawn_y: f32,
    pub vehicle_size: Vec2,
    /// Top edge of the vehicle
    pub vehicle_y: f32,
    /// `None` = continuous x, `Some(n)` = n evenly spaced lanes
    pub lanes: Option<u32>,

    // === Steering ===
    pub movement: Approach,
    /// Held-key speed on continuous tracks (units/s)
    pub steer_speed: f32,
    /// Distance of one nudge on continuous tracks
    pub nudge_distance: f32,
    /// Cosmetic roll per unit of steering gap
    pub tilt_factor: f32,

    // === Spawning ===
    pub spawn: SpawnPolicy,
    /// Chance that a spawned entity is a benefit
    pub benefit_chance: f32,
    pub entity_size: Vec2,
    /// Per-entity speed range (speed points)
    pub entity_speed: (f32, f32),
    /// Keeps continuous-track spawns this far from both edges
    pub edge_margin: f32,
    /// Minimum seconds between spawns; 0 keeps spawns independent
    pub min_spawn_gap: f32,

    // === Scrolling ===
    /// Units per second for one speed point
    pub scroll_unit: f32,
    /// Global scroll added to every entity's own speed (speed points)
    pub track_scroll: f32,
    /// Lane marker animation rate (units/s)
    pub marker_rate: f32,
    /// Lane marker period; the offset wraps at this value
    pub marker_period: f32,
    /// Increase of `GameState::speed` per second
    pub speed_ramp: f32,

    // === Metrics ===
    pub max_health: i32,
    pub goal_progress: f32,
    /// Continuous progress per second
    pub progress_rate: f32,
    pub benefit: BenefitRule,
    pub hazard: HazardPolicy,
    /// Horizontal shrink applied to each side of an entity hitbox
    pub hitbox_inset: f32,
    /// Health impact for a benefit whose label is missing from the catalog
    pub default_benefit_impact: i32,
    /// Health impact for a hazard whose label is missing from the catalog
    pub default_hazard_impact: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::preset(Variant::Classic)
    }
}

impl EngineConfig {
    /// Stock tuning for a variant
    pub fn preset(variant: Variant) -> Self {
        let classic = Self {
            track_width: 480.0,
            track_length: 800.0,
            spawn_y: -100.0,
            vehicle_size: Vec2::new(50.0, 80.0),
            vehicle_y: 680.0,
            lanes: None,

            movement: Approach::Instant,
            steer_speed: 540.0,
            nudge_distance: 50.0,
            tilt_factor: 0.0,

            spawn: SpawnPolicy::PerTick { probability: 0.02 },
            benefit_chance: 0.4,
            entity_size: Vec2::new(80.0, 40.0),
            entity_speed: (4.0, 8.0),
            edge_margin: 0.0,
            min_spawn_gap: 0.0,

            scroll_unit: 60.0,
            track_scroll: 0.0,
            marker_rate: 300.0,
            marker_period: 100.0,
            speed_ramp: 0.0,

            max_health: MAX_HEALTH,
            goal_progress: GOAL_PROGRESS,
            progress_rate: 180.0,
            benefit: BenefitRule {
                score: 100,
                progress: 100.0,
                heals: true,
            },
            hazard: HazardPolicy::Graded { score_penalty: 50 },
            hitbox_inset: 0.0,
            default_benefit_impact: 5,
            default_hazard_impact: -10,
        };

        match variant {
            Variant::Classic => classic,
            Variant::Lanes => Self {
                lanes: Some(3),
                movement: Approach::Lerp { factor: 0.12 },
                tilt_factor: 0.15,
                spawn: SpawnPolicy::Interval { seconds: 1.0 },
                benefit_chance: 0.55,
                entity_size: Vec2::new(160.0, 40.0),
                entity_speed: (0.0, 0.0),
                track_scroll: 7.5,
                marker_rate: 400.0,
                marker_period: 150.0,
                progress_rate: 900.0,
                benefit: BenefitRule {
                    score: 10,
                    progress: 150.0,
                    heals: false,
                },
                hazard: HazardPolicy::InstantFail { score_penalty: 0 },
                hitbox_inset: 16.0,
                ..classic
            },
        }
    }

    /// Parse a config from JSON; missing fields take the Classic values
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every tunable for a sane value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("track_width", self.track_width),
            ("track_length", self.track_length),
            ("spawn_y", self.spawn_y),
            ("vehicle_y", self.vehicle_y),
            ("steer_speed", self.steer_speed),
            ("nudge_distance", self.nudge_distance),
            ("tilt_factor", self.tilt_factor),
            ("edge_margin", self.edge_margin),
            ("min_spawn_gap", self.min_spawn_gap),
            ("scroll_unit", self.scroll_unit),
            ("track_scroll", self.track_scroll),
            ("marker_rate", self.marker_rate),
            ("speed_ramp", self.speed_ramp),
            ("progress_rate", self.progress_rate),
            ("hitbox_inset", self.hitbox_inset),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        let positive = [
            ("track_width", self.track_width),
            ("track_length", self.track_length),
            ("vehicle_width", self.vehicle_size.x),
            ("vehicle_height", self.vehicle_size.y),
            ("entity_width", self.entity_size.x),
            ("entity_height", self.entity_size.y),
            ("scroll_unit", self.scroll_unit),
            ("marker_period", self.marker_period),
            ("goal_progress", self.goal_progress),
            ("max_health", self.max_health as f32),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("steer_speed", self.steer_speed),
            ("nudge_distance", self.nudge_distance),
            ("edge_margin", self.edge_margin),
            ("min_spawn_gap", self.min_spawn_gap),
            ("marker_rate", self.marker_rate),
            ("speed_ramp", self.speed_ramp),
            ("progress_rate", self.progress_rate),
            ("hitbox_inset", self.hitbox_inset),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: f32::INFINITY,
                });
            }
        }

        check_range("benefit_chance", self.benefit_chance, 0.0, 1.0)?;
        if !self.benefit.progress.is_finite() || self.benefit.progress < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "benefit.progress",
                value: self.benefit.progress,
                min: 0.0,
                max: f32::INFINITY,
            });
        }

        match self.movement {
            Approach::Instant => {}
            Approach::Step { speed } => {
                if !speed.is_finite() || speed <= 0.0 {
                    return Err(ConfigError::NotPositive {
                        field: "movement.speed",
                        value: speed,
                    });
                }
            }
            Approach::Lerp { factor } => {
                if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
                    return Err(ConfigError::OutOfRange {
                        field: "movement.factor",
                        value: factor,
                        min: f32::EPSILON,
                        max: 1.0,
                    });
                }
            }
        }

        match self.spawn {
            SpawnPolicy::PerTick { probability } => {
                check_range("spawn.probability", probability, 0.0, 1.0)?
            }
            SpawnPolicy::Interval { seconds } => {
                if !seconds.is_finite() || seconds <= 0.0 {
                    return Err(ConfigError::NotPositive {
                        field: "spawn.seconds",
                        value: seconds,
                    });
                }
            }
        }

        if self.lanes == Some(0) {
            return Err(ConfigError::NoLanes);
        }
        if self.vehicle_size.x > self.track_width {
            return Err(ConfigError::VehicleTooWide {
                vehicle: self.vehicle_size.x,
                track: self.track_width,
            });
        }
        let (min, max) = self.entity_speed;
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "entity_speed",
                value: if min.is_finite() { max } else { min },
            });
        }
        if min > max {
            return Err(ConfigError::InvertedSpeedRange { min, max });
        }
        // Every entity has to reach the terminal edge to be expired
        if self.track_scroll + min <= 0.0 {
            return Err(ConfigError::EntitiesStall {
                track_scroll: self.track_scroll,
                min_speed: min,
            });
        }
        if self.spawn_y >= self.track_length {
            return Err(ConfigError::SpawnPastTerminal {
                spawn_y: self.spawn_y,
                track_length: self.track_length,
            });
        }
        Ok(())
    }

    /// Right-most left edge the vehicle may occupy
    pub fn max_vehicle_x(&self) -> f32 {
        (self.track_width - self.vehicle_size.x).max(0.0)
    }

    /// Lane width, if the track has lanes
    pub fn lane_width(&self) -> Option<f32> {
        self.lanes.map(|n| self.track_width / n.max(1) as f32)
    }

    /// Center x of a lane (clamped to the last lane)
    pub fn lane_center(&self, lane: u32) -> Option<f32> {
        let count = self.lanes?.max(1);
        let width = self.track_width / count as f32;
        Some((lane.min(count - 1) as f32 + 0.5) * width)
    }

    /// Lane whose center is nearest to `x`
    pub fn nearest_lane(&self, x: f32) -> Option<u32> {
        let count = self.lanes?.max(1);
        let width = self.track_width / count as f32;
        let lane = (x / width).floor().clamp(0.0, (count - 1) as f32);
        Some(lane as u32)
    }

    /// Lane the vehicle starts in (the middle one, left of center on even counts)
    pub fn start_lane(&self) -> Option<u32> {
        self.lanes.map(|n| (n.max(1) - 1) / 2)
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field, value });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
