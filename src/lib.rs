//! Perfect maze generator based on randomized recursive subdivision.
//!
//! The board starts fully walled. [`algorithms::RecursiveDivider`] repeatedly grows two random
//! halves inside a region, walls them apart and opens exactly one passage between them. The
//! finished maze is serialized as one byte per cell, see [`gameboard::to_wall_list`].

pub mod algorithms;
pub mod array;
pub mod dims;
pub mod error;
pub mod gameboard;
pub mod logging;
pub mod settings;

pub use algorithms::{generate, generate_batch, Maze, MazeParams, DEFAULT_THRESHOLD};
pub use error::MazeError;
