use thiserror::Error;

use crate::dims::Dims;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("invalid maze dimensions {width}x{height}, both must be at least 1")]
    InvalidDimension { width: i32, height: i32 },
    #[error("invalid threshold {0}, must be at least 1")]
    InvalidThreshold(i32),
    #[error("maze of {cells} cells exceeds the limit of {max}")]
    TooLarge { cells: usize, max: usize },
    #[error("position {0:?} is out of bounds")]
    OutOfBounds(Dims),
    #[error("cell {0:?} has no wall facing another region")]
    NoCandidateWall(Dims),
    #[error("region could not be grown to cover all of its cells")]
    DisconnectedRegion,
}

pub type Result<T, E = MazeError> = std::result::Result<T, E>;
