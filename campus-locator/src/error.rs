//! Error types for loading campus data and computing floor-plan geometry

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for campus-locator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading the static stores or mapping geometry.
///
/// Query resolution itself never fails: an unresolvable query is `None`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data file not found: {}", .0.display())]
    MissingDataFile(PathBuf),

    /// Two buildings share a code (compared case-insensitively)
    #[error("Duplicate building code: {0}")]
    DuplicateBuilding(String),

    /// An alias of one building equals another building's code
    #[error("Alias '{alias}' of {building} collides with building code {other}")]
    AliasCollision {
        building: String,
        alias: String,
        other: String,
    },

    #[error("Room {room} on {building} floor {level} has coordinate ({x}, {y}) outside [0, 1]")]
    CoordinateOutOfRange {
        building: String,
        level: String,
        room: String,
        x: f64,
        y: f64,
    },

    /// The same room appears under two spellings of one building floor
    #[error("Room {room} on {building} floor {level} is listed more than once")]
    DuplicateRoom {
        building: String,
        level: String,
        room: String,
    },

    /// Viewport or image dimensions are not available yet
    #[error("Missing geometry: {0}")]
    MissingGeometry(&'static str),

    #[error("Invalid point: {0}")]
    InvalidPoint(String),
}
