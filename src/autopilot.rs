//! Idle/demo mode steering
//!
//! Scores a handful of candidate columns by what is coming down them: hazards
//! repel, benefits attract, closer entities weigh more. The vehicle stays put
//! unless another column is clearly better.

use crate::config::EngineConfig;
use crate::sim::{Category, Snapshot, SteeringIntent};

/// How far up the track the autopilot looks
const LOOK_AHEAD: f32 = 450.0;
/// Column samples on continuous tracks
const SAMPLES: usize = 17;
/// Weight of a hazard relative to a benefit
const HAZARD_WEIGHT: f32 = 4.0;
/// Cost per unit of lateral travel
const TRAVEL_COST: f32 = 0.002;

/// Pick a steering intent for the current frame
pub fn steer(snapshot: &Snapshot<'_>, config: &EngineConfig) -> SteeringIntent {
    let vehicle = snapshot.vehicle;
    let half = vehicle.size.x / 2.0;

    let candidates: Vec<f32> = match config.lanes {
        Some(count) => (0..count).filter_map(|lane| config.lane_center(lane)).collect(),
        None => {
            let lo = half;
            let hi = config.track_width - half;
            (0..SAMPLES)
                .map(|i| lo + (hi - lo) * i as f32 / (SAMPLES - 1) as f32)
                .collect()
        }
    };

    let current = vehicle.center_x();
    let mut best = (current, column_value(snapshot, config, current));
    for center in candidates {
        let value = column_value(snapshot, config, center) - (center - current).abs() * TRAVEL_COST;
        if value > best.1 + f32::EPSILON {
            best = (center, value);
        }
    }

    if (best.0 - current).abs() < 1.0 {
        SteeringIntent::None
    } else {
        SteeringIntent::Target(best.0)
    }
}

/// Attraction minus danger of keeping the vehicle centered on `center`
fn column_value(snapshot: &Snapshot<'_>, config: &EngineConfig, center: f32) -> f32 {
    let vehicle = snapshot.vehicle;
    let half = vehicle.size.x / 2.0;
    let (left, right) = (center - half, center + half);
    let front = vehicle.y;
    let back = vehicle.y + vehicle.size.y;

    snapshot
        .entities
        .iter()
        .filter_map(|entity| {
            let hitbox = entity.hitbox(config.hitbox_inset);
            // Already behind the vehicle
            if hitbox.min.y >= back {
                return None;
            }
            let distance = (front - hitbox.max.y).max(0.0);
            if distance > LOOK_AHEAD {
                return None;
            }
            // A small pad keeps grazes out of reach
            let pad = if entity.category == Category::Hazard { 6.0 } else { 0.0 };
            if hitbox.max.x + pad <= left || hitbox.min.x - pad >= right {
                return None;
            }
            let urgency = 1.0 - distance / LOOK_AHEAD;
            Some(match entity.category {
                Category::Hazard => -HAZARD_WEIGHT * (0.25 + urgency),
                Category::Benefit => 0.25 + urgency,
            })
        })
        .sum()
}
