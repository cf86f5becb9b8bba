//! Error types for the host-facing surfaces
//!
//! Nothing inside a tick can fail. These cover loading configuration and
//! content tables, and reading/writing the best-score store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("`{field}` must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("lane count must be at least 1")]
    NoLanes,
    #[error("vehicle width {vehicle} does not fit on a track of width {track}")]
    VehicleTooWide { vehicle: f32, track: f32 },
    #[error("entity speed range is inverted: min {min} > max {max}")]
    InvertedSpeedRange { min: f32, max: f32 },
    #[error("entities never advance: track_scroll {track_scroll} + min entity speed {min_speed} <= 0")]
    EntitiesStall { track_scroll: f32, min_speed: f32 },
    #[error("spawn edge {spawn_y} must lie before the terminal edge {track_length}")]
    SpawnPastTerminal { spawn_y: f32, track_length: f32 },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog entry has an empty label")]
    EmptyLabel,
    #[error("duplicate {category} label '{label}'")]
    DuplicateLabel { category: &'static str, label: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}
