//! Vehicle steering, entity scrolling and the lane-marker offset
//!
//! One movement law for every variant: steering intents move a target, the
//! configured approach closes the gap, and everything scales with the tick delta.

use serde::{Deserialize, Serialize};

use super::state::{Entity, Vehicle};
use crate::config::{Approach, EngineConfig};
use crate::consts::MAX_SUBSTEPS;
use crate::lerp_factor_for_dt;

/// Horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    fn sign(self) -> i32 {
        match self {
            Steer::Left => -1,
            Steer::Right => 1,
        }
    }
}

/// Steering input for one tick, in whichever shape the input device produces
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SteeringIntent {
    /// No input this tick
    #[default]
    None,
    /// Held keys (arrow keys / A-D)
    Hold { left: bool, right: bool },
    /// One-shot move (key press edge or swipe)
    Nudge(Steer),
    /// Absolute pointer/touch x in track space; the vehicle centers on it
    Target(f32),
}

/// A vehicle parked at the start position
pub fn spawn_vehicle(config: &EngineConfig) -> Vehicle {
    let lane = config.start_lane();
    let center = lane
        .and_then(|l| config.lane_center(l))
        .unwrap_or(config.track_width / 2.0);
    let x = (center - config.vehicle_size.x / 2.0).clamp(0.0, config.max_vehicle_x());
    Vehicle {
        x,
        y: config.vehicle_y,
        size: config.vehicle_size,
        target_x: x,
        lane,
        held: (false, false),
    }
}

/// Turn an intent into a new steering target (always within track bounds)
pub fn apply_intent(vehicle: &mut Vehicle, intent: &SteeringIntent, config: &EngineConfig, dt: f32) {
    let max_x = config.max_vehicle_x();
    let half_width = vehicle.size.x / 2.0;
    let (was_left, was_right) = vehicle.held;

    if let Some(count) = config.lanes {
        let last = count.max(1) - 1;
        let current = vehicle.lane.unwrap_or_else(|| config.start_lane().unwrap_or(0));
        let shift = |lane: u32, dir: Steer| -> u32 {
            match dir {
                Steer::Left => lane.saturating_sub(1),
                Steer::Right => (lane + 1).min(last),
            }
        };

        let lane = match *intent {
            SteeringIntent::None => current,
            SteeringIntent::Hold { left, right } => {
                let mut lane = current;
                // Lane changes fire on the press, not while held
                if left && !was_left {
                    lane = shift(lane, Steer::Left);
                }
                if right && !was_right {
                    lane = shift(lane, Steer::Right);
                }
                lane
            }
            SteeringIntent::Nudge(dir) => shift(current, dir),
            SteeringIntent::Target(x) if x.is_finite() => config.nearest_lane(x).unwrap_or(current),
            SteeringIntent::Target(_) => current,
        };

        vehicle.lane = Some(lane);
        if let Some(center) = config.lane_center(lane) {
            vehicle.target_x = (center - half_width).clamp(0.0, max_x);
        }
    } else {
        let target = match *intent {
            SteeringIntent::None => vehicle.target_x,
            SteeringIntent::Hold { left, right } => {
                let dir = right as i32 - left as i32;
                vehicle.target_x + dir as f32 * config.steer_speed * dt
            }
            SteeringIntent::Nudge(dir) => vehicle.target_x + dir.sign() as f32 * config.nudge_distance,
            SteeringIntent::Target(x) if x.is_finite() => x - half_width,
            SteeringIntent::Target(_) => vehicle.target_x,
        };
        vehicle.target_x = target.clamp(0.0, max_x);
    }

    vehicle.held = match *intent {
        SteeringIntent::Hold { left, right } => (left, right),
        _ => (false, false),
    };
}

/// Move the vehicle toward its target according to the configured approach
pub fn approach_target(vehicle: &mut Vehicle, config: &EngineConfig, dt: f32) {
    let gap = vehicle.target_x - vehicle.x;
    let x = match config.movement {
        Approach::Instant => vehicle.target_x,
        Approach::Step { speed } => {
            let max_step = speed * dt;
            vehicle.x + gap.clamp(-max_step, max_step)
        }
        Approach::Lerp { factor } => vehicle.x + gap * lerp_factor_for_dt(factor, dt),
    };
    vehicle.x = x.clamp(0.0, config.max_vehicle_x());
}

/// Advance every entity along the direction of travel
pub fn advance_entities(entities: &mut [Entity], config: &EngineConfig, speed: f32, dt: f32) {
    for entity in entities {
        entity.pos.y += (config.track_scroll + entity.speed) * speed * config.scroll_unit * dt;
    }
}

/// Sub-steps needed for `dt` so no entity moves farther than the shortest
/// collidable height in one step
///
/// A step no longer than either box's height cannot carry an entity across
/// the vehicle without an overlapping position in between.
pub fn substeps(
    entities: &[Entity],
    vehicle: &Vehicle,
    config: &EngineConfig,
    speed: f32,
    dt: f32,
) -> u32 {
    let window = entities
        .iter()
        .map(|e| e.size.y)
        .fold(vehicle.size.y, f32::min);
    let travel = entities
        .iter()
        .map(|e| ((config.track_scroll + e.speed) * speed * config.scroll_unit * dt).abs())
        .fold(0.0, f32::max);
    if window <= 0.0 || !travel.is_finite() {
        return 1;
    }
    ((travel / window).ceil() as u32).clamp(1, MAX_SUBSTEPS)
}

/// Cosmetic lane-marker offset after `dt`, wrapped to the marker period
pub fn advance_scroll(offset: f32, config: &EngineConfig, speed: f32, dt: f32) -> f32 {
    (offset + config.marker_rate * speed * dt).rem_euclid(config.marker_period)
}
