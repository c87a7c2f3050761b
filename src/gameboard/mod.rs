pub mod maze;
pub use maze::MazeBoard;
pub mod cell;
pub use cell::{Cell, CellWall, Corner, Corners, Region, WallMask};
pub mod ser;
pub use ser::{to_wall_list, SerializedMaze};
