//! Engine and per-tick orchestration
//!
//! The engine owns the run state, the vehicle, the live entities and the RNG.
//! A tick runs spawner -> kinematics -> collision -> aggregation, and only
//! while the status is `Playing`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use super::collision::resolve;
use super::kinematics::{
    SteeringIntent, advance_entities, advance_scroll, apply_intent, approach_target, spawn_vehicle,
    substeps,
};
use super::metrics::{MetricDeltas, aggregate};
use super::spawn::Spawner;
use super::state::{Entity, GameEvent, GameState, GameStatus, Vehicle};
use crate::config::EngineConfig;
use crate::consts::MAX_FRAME_DT;

/// Identifies one run; bumped by every start/restart
pub type RunId = u64;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub steering: SteeringIntent,
    /// Start (or restart) before ticking
    pub start: bool,
}

impl TickInput {
    pub fn steer(steering: SteeringIntent) -> Self {
        Self {
            steering,
            start: false,
        }
    }
}

/// Deltas tagged with the run they were computed against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampedDeltas {
    pub run: RunId,
    pub deltas: MetricDeltas,
}

/// What one tick produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub run: RunId,
    /// Summed deltas folded into the state this tick (empty when gated)
    pub deltas: MetricDeltas,
    pub events: Vec<GameEvent>,
    /// Terminal status entered this tick
    pub outcome: Option<GameStatus>,
}

impl TickReport {
    pub fn stamped(&self) -> StampedDeltas {
        StampedDeltas {
            run: self.run,
            deltas: self.deltas,
        }
    }
}

/// Read-only view for presentation
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub run: RunId,
    pub state: &'a GameState,
    pub vehicle: &'a Vehicle,
    pub entities: &'a [Entity],
    /// Lane-marker animation offset in [0, marker_period)
    pub scroll_offset: f32,
    /// Cosmetic body roll
    pub tilt: f32,
}

/// The simulation engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    catalog: Catalog,
    seed: u64,
    rng: Pcg32,
    state: GameState,
    vehicle: Vehicle,
    entities: Vec<Entity>,
    scroll_offset: f32,
    spawner: Spawner,
    run: RunId,
    time_ticks: u64,
    next_id: u32,
}

impl Engine {
    /// Create an engine in the `Start` status
    pub fn new(config: EngineConfig, catalog: Catalog, seed: u64) -> Self {
        let state = GameState::idle(config.max_health, catalog.quotes.idle_message());
        let vehicle = spawn_vehicle(&config);
        Self {
            config,
            catalog,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            state,
            vehicle,
            entities: Vec::new(),
            scroll_offset: 0.0,
            spawner: Spawner::new(),
            run: 0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Begin a fresh run from any status, replacing all run state
    pub fn start(&mut self) {
        self.run += 1;
        self.state = GameState::fresh(self.config.max_health, self.catalog.quotes.idle_message());
        self.vehicle = spawn_vehicle(&self.config);
        self.entities.clear();
        self.scroll_offset = 0.0;
        self.spawner = Spawner::new();
        self.time_ticks = 0;
        log::info!("Run {} started (seed {})", self.run, self.seed);
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Outside `Playing` nothing changes and an empty report is returned.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> TickReport {
        if input.start {
            self.start();
        }

        let mut report = TickReport {
            run: self.run,
            ..Default::default()
        };
        if !self.state.is_playing() {
            return report;
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.time_ticks += 1;

        // 1. Spawning
        if let Some(entity) =
            self.spawner
                .step(&self.config, &self.catalog, dt, &mut self.rng, self.next_id)
        {
            self.next_id += 1;
            log::debug!(
                "Spawned {} '{}' at x={:.0}",
                entity.category.as_str(),
                entity.label,
                entity.pos.x
            );
            report.events.push(GameEvent::Spawned {
                id: entity.id,
                category: entity.category,
            });
            self.entities.push(entity);
        }

        // 2-3. Kinematics and collisions, sub-stepped at high scroll speeds
        apply_intent(&mut self.vehicle, &input.steering, &self.config, dt);
        self.scroll_offset = advance_scroll(self.scroll_offset, &self.config, self.state.speed, dt);

        let mut deltas = MetricDeltas {
            progress: self.config.progress_rate * dt,
            speed: self.config.speed_ramp * dt,
            ..Default::default()
        };
        let steps = substeps(&self.entities, &self.vehicle, &self.config, self.state.speed, dt);
        let step_dt = dt / steps as f32;
        for _ in 0..steps {
            approach_target(&mut self.vehicle, &self.config, step_dt);
            advance_entities(&mut self.entities, &self.config, self.state.speed, step_dt);
            resolve(
                &self.vehicle,
                &mut self.entities,
                &self.catalog,
                &self.config,
                &mut deltas,
                &mut report.events,
            );
        }

        // 4. Aggregation
        report.outcome = aggregate(
            &mut self.state,
            &deltas,
            &self.config,
            &self.catalog.quotes,
            &mut self.rng,
        );
        if let Some(status) = report.outcome {
            report.events.push(GameEvent::Finished {
                status,
                score: self.state.score,
            });
        }
        log::trace!(
            "tick {}: score {} health {} progress {:.0} entities {}",
            self.time_ticks,
            self.state.score,
            self.state.health,
            self.state.progress,
            self.entities.len()
        );

        report.deltas = deltas;
        report
    }

    /// Merge externally produced deltas; deltas from an earlier run are discarded
    pub fn apply(&mut self, stamped: &StampedDeltas) -> Option<GameStatus> {
        if stamped.run != self.run {
            log::debug!(
                "Discarding deltas from run {} (current run {})",
                stamped.run,
                self.run
            );
            return None;
        }
        aggregate(
            &mut self.state,
            &stamped.deltas,
            &self.config,
            &self.catalog.quotes,
            &mut self.rng,
        )
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            run: self.run,
            state: &self.state,
            vehicle: &self.vehicle,
            entities: &self.entities,
            scroll_offset: self.scroll_offset,
            tilt: self.vehicle.tilt(self.config.tilt_factor),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks simulated in the current run
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}
