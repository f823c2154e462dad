use thiserror::Error;

use crate::Coord;

/// Broad classes of [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed an argument the operation is not defined for.
    Precondition,

    /// The universe would grow past what the store is configured to hold.
    ResourceLimit,

    /// Input the engine refuses to guess a meaning for.
    UnspecifiedInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Children have mismatched levels {levels:?}")]
    LevelMismatch { levels: [u8; 4] },

    #[error("Cell ({x}, {y}) lies outside a universe of side 2^{level}")]
    OutOfBounds { x: Coord, y: Coord, level: u8 },

    #[error("{operation} requires a node of level >= {min}, got level {level}")]
    LevelTooSmall {
        operation: &'static str,
        level: u8,
        min: u8,
    },

    #[error("{operation} requires a node of level {exp}, got level {level}")]
    WrongLevel {
        operation: &'static str,
        level: u8,
        exp: u8,
    },

    #[error("Cell ({x}, {y}) has a negative coordinate")]
    NegativeCoordinate { x: Coord, y: Coord },

    #[error("Level {level} exceeds the maximum depth of {max}")]
    DepthLimit { level: u8, max: u8 },

    #[error("Node table is full")]
    NodeTableFull,

    #[error("Cell ({x}, {y}) was given more than once")]
    DuplicatePoint { x: Coord, y: Coord },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::LevelMismatch { .. }
            | EngineError::OutOfBounds { .. }
            | EngineError::LevelTooSmall { .. }
            | EngineError::WrongLevel { .. }
            | EngineError::NegativeCoordinate { .. } => ErrorKind::Precondition,
            EngineError::DepthLimit { .. } | EngineError::NodeTableFull => {
                ErrorKind::ResourceLimit
            }
            EngineError::DuplicatePoint { .. } => ErrorKind::UnspecifiedInput,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
