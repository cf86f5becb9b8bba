//! Entity spawning
//!
//! Each tick may add one entity at the starting edge. Spawns are independent
//! across ticks unless `min_spawn_gap` is configured, which enforces a
//! cooldown between consecutive spawns.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::state::{Category, Entity};
use crate::config::{EngineConfig, SpawnPolicy};
use crate::rate_per_tick;

/// Spawn timing state (reset with every run)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Seconds accumulated toward the next interval spawn
    timer: f32,
    /// Seconds since the last spawn
    since_last: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether an entity spawns this tick
    pub fn due<R: Rng>(&mut self, config: &EngineConfig, dt: f32, rng: &mut R) -> bool {
        self.since_last += dt;
        let cooling_down = self.since_last < config.min_spawn_gap;

        let due = match config.spawn {
            SpawnPolicy::PerTick { probability } => {
                // Always draw so the RNG stream does not depend on the cooldown
                let roll: f32 = rng.random();
                roll < rate_per_tick(probability, dt)
            }
            SpawnPolicy::Interval { seconds } => {
                self.timer += dt;
                if self.timer >= seconds && !cooling_down {
                    self.timer = (self.timer - seconds).min(seconds);
                    true
                } else {
                    false
                }
            }
        };

        if due && !cooling_down {
            self.since_last = 0.0;
            true
        } else {
            false
        }
    }

    /// Run the spawn step; returns the new entity, if any
    pub fn step<R: Rng>(
        &mut self,
        config: &EngineConfig,
        catalog: &Catalog,
        dt: f32,
        rng: &mut R,
        id: u32,
    ) -> Option<Entity> {
        if !self.due(config, dt, rng) {
            return None;
        }
        spawn_entity(config, catalog, rng, id)
    }
}

/// Build an entity at the starting edge from a random catalog entry
///
/// Returns `None` when the drawn category has no entries.
pub fn spawn_entity<R: Rng>(
    config: &EngineConfig,
    catalog: &Catalog,
    rng: &mut R,
    id: u32,
) -> Option<Entity> {
    let roll: f32 = rng.random();
    let category = if roll < config.benefit_chance {
        Category::Benefit
    } else {
        Category::Hazard
    };

    let entries = catalog.entries(category);
    if entries.is_empty() {
        log::debug!("No {} entries, skipping spawn", category.as_str());
        return None;
    }
    let template = &entries[rng.random_range(0..entries.len())];

    let x = spawn_x(config, rng);
    let (min_speed, max_speed) = config.entity_speed;
    let speed = min_speed + (max_speed - min_speed) * rng.random::<f32>();

    Some(Entity {
        id,
        pos: Vec2::new(x, config.spawn_y),
        size: config.entity_size,
        category,
        label: template.label.clone(),
        tag: template.tag.clone(),
        speed,
    })
}

/// Left edge for a new entity: centered in a random lane, or anywhere clear of the edge margin
fn spawn_x<R: Rng>(config: &EngineConfig, rng: &mut R) -> f32 {
    let width = config.entity_size.x;
    let max_x = (config.track_width - width).max(0.0);

    if let Some(lanes) = config.lanes {
        let lane = rng.random_range(0..lanes.max(1));
        let center = config.lane_center(lane).unwrap_or(config.track_width / 2.0);
        return (center - width / 2.0).clamp(0.0, max_x);
    }

    let lo = config.edge_margin;
    let hi = max_x - config.edge_margin;
    if hi <= lo {
        return max_x / 2.0;
    }
    lo + (hi - lo) * rng.random::<f32>()
}
