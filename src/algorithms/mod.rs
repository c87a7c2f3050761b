pub mod recursive_divider;

use rand::{thread_rng, Rng as _, SeedableRng as _};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::{
    dims::Dims,
    error::{MazeError, Result},
    gameboard::{
        ser::{to_wall_list, SerializedMaze},
        MazeBoard,
    },
};
pub use recursive_divider::RecursiveDivider;

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

/// Splitting stops at regions of a single cell, which gives a perfect maze.
pub const DEFAULT_THRESHOLD: i32 = 1;

/// Input of a single generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeParams {
    pub width: i32,
    pub height: i32,
    pub threshold: i32,

    /// Used for deterministic generation, random when missing.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Upper limit on `width * height`.
    #[serde(default)]
    pub max_cells: Option<usize>,
}

impl Default for MazeParams {
    fn default() -> Self {
        Self::new(4, 4, DEFAULT_THRESHOLD)
    }
}

impl MazeParams {
    pub fn new(width: i32, height: i32, threshold: i32) -> Self {
        Self {
            width,
            height,
            threshold,
            seed: None,
            max_cells: None,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_cells(mut self, max: usize) -> Self {
        self.max_cells = Some(max);
        self
    }

    pub fn size(&self) -> Dims {
        Dims(self.width, self.height)
    }

    /// Checks the parameters and returns the threshold as a region size.
    pub fn validate(&self) -> Result<usize> {
        if !self.size().all_positive() {
            return Err(MazeError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }

        let threshold = usize::try_from(self.threshold)
            .ok()
            .filter(|&t| t >= 1)
            .ok_or(MazeError::InvalidThreshold(self.threshold))?;

        let max = self.max_cells.unwrap_or(usize::MAX);
        match self.size().product() {
            Some(cells) if cells <= max => Ok(threshold),
            cells => Err(MazeError::TooLarge {
                cells: cells.unwrap_or(usize::MAX),
                max,
            }),
        }
    }
}

/// Finished maze, with its generation parameters.
#[derive(Debug, Clone)]
pub struct Maze {
    board: MazeBoard,
    threshold: usize,
    seed: u64,
}

impl Maze {
    /// Generates a maze with a random seed.
    pub fn new(width: i32, height: i32, threshold: i32) -> Result<Self> {
        Self::from_params(&MazeParams::new(width, height, threshold))
    }

    pub fn from_params(params: &MazeParams) -> Result<Self> {
        let threshold = params.validate()?;
        let seed = params.seed.unwrap_or_else(|| thread_rng().gen());
        let mut rng = Random::seed_from_u64(seed);

        log::debug!(
            "generating {}x{} maze, threshold {}, seed {}",
            params.width,
            params.height,
            threshold,
            seed
        );

        let mut board = MazeBoard::new(params.width, params.height)?;
        let carved = RecursiveDivider::new(threshold).divide(&mut board, &mut rng)?;

        log::debug!("carved {} passages", carved);

        Ok(Maze {
            board,
            threshold,
            seed,
        })
    }

    pub fn width(&self) -> i32 {
        self.board.width()
    }

    pub fn height(&self) -> i32 {
        self.board.height()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &MazeBoard {
        &self.board
    }

    pub fn to_wall_list(&self) -> Vec<u8> {
        to_wall_list(&self.board)
    }

    pub fn to_serialized(&self) -> SerializedMaze {
        SerializedMaze::new(self)
    }
}

/// Generates a maze and returns one value per cell, row by row.
pub fn generate(width: i32, height: i32, threshold: i32) -> Result<Vec<u8>> {
    Ok(Maze::new(width, height, threshold)?.to_wall_list())
}

/// Generates `count` independent mazes in parallel.
///
/// Each maze gets its own seed, drawn from `params.seed` when it's set, so the whole batch is
/// reproducible and every maze can be regenerated alone from its [`Maze::seed`].
pub fn generate_batch(params: &MazeParams, count: usize) -> Result<Vec<Maze>> {
    params.validate()?;

    let base_seed = params.seed.unwrap_or_else(|| thread_rng().gen());
    let mut rng = Random::seed_from_u64(base_seed);
    let seeds = (0..count).map(|_| rng.gen::<u64>()).collect::<Vec<_>>();

    seeds
        .into_par_iter()
        .map(|seed| Maze::from_params(&params.seed(seed)))
        .collect()
}
