//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and seedable:
//! - Seeded RNG only
//! - Fixed step order: spawn, move, collide, aggregate
//! - Mutation only while the run is playing
//! - No rendering or platform dependencies

pub mod catalog;
pub mod collision;
pub mod kinematics;
pub mod metrics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use catalog::{Catalog, CatalogEntry, QuotePools};
pub use collision::{Aabb, contact_effect, resolve};
pub use kinematics::{Steer, SteeringIntent};
pub use metrics::{MetricDeltas, aggregate};
pub use spawn::{Spawner, spawn_entity};
pub use state::{Category, Entity, GameEvent, GameState, GameStatus, Vehicle};
pub use tick::{Engine, RunId, Snapshot, StampedDeltas, TickInput, TickReport};
