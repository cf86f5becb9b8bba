//! Collision detection and resolution
//!
//! Axis-aligned overlap between the vehicle and each entity. Every entity is
//! visited exactly once per pass: it is either consumed by a hit, dropped past
//! the terminal edge, or kept for the next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::metrics::MetricDeltas;
use super::state::{Category, Entity, GameEvent, Vehicle};
use crate::config::{EngineConfig, HazardPolicy};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Shrink both horizontal sides by `inset` (never past the center)
    pub fn inset_x(self, inset: f32) -> Self {
        let half = (self.max.x - self.min.x) / 2.0;
        let inset = inset.clamp(0.0, half.max(0.0));
        Self {
            min: Vec2::new(self.min.x + inset, self.min.y),
            max: Vec2::new(self.max.x - inset, self.max.y),
        }
    }

    /// Strict interval overlap on both axes; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Metric change for touching an entity of `category` labeled `label`
///
/// Unknown labels fall back to the configured default impact.
pub fn contact_effect(
    category: Category,
    label: &str,
    catalog: &Catalog,
    config: &EngineConfig,
) -> (MetricDeltas, i32) {
    match category {
        Category::Benefit => {
            let impact = catalog
                .impact(category, label)
                .unwrap_or(config.default_benefit_impact);
            let deltas = MetricDeltas {
                score: config.benefit.score,
                health: if config.benefit.heals { impact } else { 0 },
                progress: config.benefit.progress,
                ..Default::default()
            };
            (deltas, impact)
        }
        Category::Hazard => {
            let impact = catalog
                .impact(category, label)
                .unwrap_or(config.default_hazard_impact);
            let deltas = match config.hazard {
                HazardPolicy::Graded { score_penalty } => MetricDeltas {
                    score: -score_penalty,
                    health: impact,
                    ..Default::default()
                },
                HazardPolicy::InstantFail { score_penalty } => MetricDeltas {
                    score: -score_penalty,
                    fatal: true,
                    ..Default::default()
                },
            };
            (deltas, impact)
        }
    }
}

/// Resolve one pass: consume hit entities, drop expired ones, fold hit effects into `deltas`
///
/// Returns the number of hits.
pub fn resolve(
    vehicle: &Vehicle,
    entities: &mut Vec<Entity>,
    catalog: &Catalog,
    config: &EngineConfig,
    deltas: &mut MetricDeltas,
    events: &mut Vec<GameEvent>,
) -> usize {
    let vehicle_box = vehicle.bounds();
    let mut hits = 0;

    entities.retain(|entity| {
        if vehicle_box.overlaps(&entity.hitbox(config.hitbox_inset)) {
            let (effect, impact) = contact_effect(entity.category, &entity.label, catalog, config);
            *deltas += effect;
            hits += 1;

            let event = match entity.category {
                Category::Benefit => GameEvent::Collected {
                    id: entity.id,
                    label: entity.label.clone(),
                    impact,
                },
                Category::Hazard => {
                    log::debug!("Crash! Hit hazard '{}' (impact {})", entity.label, impact);
                    GameEvent::Crashed {
                        id: entity.id,
                        label: entity.label.clone(),
                        impact,
                    }
                }
            };
            events.push(event);
            return false;
        }

        if entity.pos.y >= config.track_length {
            events.push(GameEvent::Expired { id: entity.id });
            return false;
        }

        true
    });

    hits
}
