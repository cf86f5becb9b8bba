//! Game state and core simulation types
//!
//! `GameState` holds the run metrics and status. The vehicle and the live
//! entities are track state owned by the engine and only read by presentation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the first start; nothing simulates
    #[default]
    Start,
    /// Active gameplay; the only phase that accepts mutation
    Playing,
    /// Health ran out
    GameOver,
    /// Progress reached the goal
    Success,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Success)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Start => "START",
            GameStatus::Playing => "PLAYING",
            GameStatus::GameOver => "GAMEOVER",
            GameStatus::Success => "SUCCESS",
        }
    }
}

/// Run metrics (replaced wholesale on every start)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Unbounded, may go negative
    pub score: i64,
    /// Clamped to [0, max_health] on every update
    pub health: i32,
    /// Never decreases while playing
    pub progress: f32,
    /// Scroll multiplier (1.0 at start)
    pub speed: f32,
    pub status: GameStatus,
    /// Message selected on the last terminal transition
    pub last_quote: String,
}

impl GameState {
    /// State shown before the first run
    pub fn idle(max_health: i32, message: String) -> Self {
        Self {
            status: GameStatus::Start,
            ..Self::fresh(max_health, message)
        }
    }

    /// Fresh state for a new run
    pub fn fresh(max_health: i32, message: String) -> Self {
        Self {
            score: 0,
            health: max_health,
            progress: 0.0,
            speed: 1.0,
            status: GameStatus::Playing,
            last_quote: message,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }
}

/// Entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Lowers standing on contact
    Hazard,
    /// Raises standing on contact
    Benefit,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Hazard => "hazard",
            Category::Benefit => "benefit",
        }
    }
}

/// Notable things that happened during a tick (for audio/effects hosts and logs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new entity entered at the starting edge
    Spawned { id: u32, category: Category },
    /// A benefit was picked up
    Collected { id: u32, label: String, impact: i32 },
    /// A hazard was hit
    Crashed { id: u32, label: String, impact: i32 },
    /// An entity left the track untouched
    Expired { id: u32 },
    /// The run reached a terminal status
    Finished { status: GameStatus, score: i64 },
}

/// A moving item on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Top-left corner in track space (x across, y along the direction of travel)
    pub pos: Vec2,
    pub size: Vec2,
    pub category: Category,
    /// Catalog key for the impact lookup
    pub label: String,
    pub tag: String,
    /// Per-entity speed added to the global track scroll
    pub speed: f32,
}

impl Entity {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Bounds shrunk horizontally by `inset` on each side
    pub fn hitbox(&self, inset: f32) -> Aabb {
        self.bounds().inset_x(inset)
    }
}

/// The player's vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed for the run)
    pub y: f32,
    pub size: Vec2,
    /// Left edge the vehicle is heading toward
    pub target_x: f32,
    /// Target lane on lane tracks
    pub lane: Option<u32>,
    /// Held-key state from the previous tick (edge detection on lane tracks)
    #[serde(default)]
    pub held: (bool, bool),
}

impl Vehicle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(Vec2::new(self.x, self.y), self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.size.x / 2.0
    }

    /// Cosmetic body roll from the remaining steering distance
    pub fn tilt(&self, factor: f32) -> f32 {
        (self.x - self.target_x) * factor
    }
}
