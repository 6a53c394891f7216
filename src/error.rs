use std::io;
use thiserror::Error;

/// Failures while building or loading a world.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world map is empty")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("world map has no start marker '@'")]
    MissingStart,
    #[error("world map has more than one start marker '@' (second at {x},{y})")]
    DuplicateStart { x: usize, y: usize },
    #[error("invalid world dimensions {w}x{h}")]
    InvalidDimensions { w: usize, h: usize },
    #[error("wall density {0} is outside [0, 1]")]
    InvalidDensity(f64),
    #[error("failed to read world map")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("failed to write episode report")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
