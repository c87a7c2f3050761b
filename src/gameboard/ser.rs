use serde::{Deserialize, Serialize};

use crate::{algorithms::Maze, dims::Dims};

use super::{Corners, MazeBoard, WallMask};

/// One integer per cell in row-major order: wall bits plus corner bits.
pub fn to_wall_list(board: &MazeBoard) -> Vec<u8> {
    board
        .cells()
        .map(|cell| cell.walls().bits() | board.cell_corners(cell).bits())
        .collect()
}

/// Generated maze as it is handed out to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedMaze {
    pub width: i32,
    pub height: i32,
    pub threshold: usize,
    pub seed: u64,
    pub cells: Vec<u8>,
}

impl SerializedMaze {
    pub fn new(maze: &Maze) -> Self {
        SerializedMaze {
            width: maze.width(),
            height: maze.height(),
            threshold: maze.threshold(),
            seed: maze.seed(),
            cells: maze.to_wall_list(),
        }
    }

    /// Decodes the value of the cell at `pos`.
    pub fn cell(&self, pos: Dims) -> Option<(WallMask, Corners)> {
        if !pos.all_non_negative() || pos.0 >= self.width || pos.1 >= self.height {
            return None;
        }

        let idx = pos.1 as usize * self.width as usize + pos.0 as usize;
        self.cells
            .get(idx)
            .map(|&value| (WallMask::from_bits(value), Corners::from_bits(value)))
    }
}

impl From<&Maze> for SerializedMaze {
    fn from(maze: &Maze) -> Self {
        Self::new(maze)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameboard::{CellWall, Corner};

    #[test]
    fn fully_walled_board() {
        let board = MazeBoard::new(3, 2).unwrap();
        assert_eq!(to_wall_list(&board), vec![15; 6]);
    }

    #[test]
    fn list_matches_cell_queries() {
        let mut board = MazeBoard::new(3, 3).unwrap();
        board.remove_wall(Dims(1, 1), CellWall::North);
        board.remove_wall(Dims(1, 1), CellWall::East);
        board.remove_wall(Dims(0, 2), CellWall::East);

        let list = to_wall_list(&board);
        assert_eq!(list.len(), 9);
        for (pos, value) in board.positions().zip(&list) {
            assert_eq!(value & 0x0f, board.get_wall_mask(pos).unwrap().bits());
            assert_eq!(value & 0xf0, board.corners(pos).unwrap().bits());
        }

        // north and east open, (2,1) keeps its north wall
        let center = list[4];
        assert_ne!(center & Corner::NorthEast.bit(), 0);
    }

    #[test]
    fn decode_cell() {
        let maze = SerializedMaze {
            width: 2,
            height: 1,
            threshold: 1,
            seed: 0,
            cells: vec![13, 7],
        };
        assert_eq!(
            maze.cell(Dims(0, 0)),
            Some((WallMask::WEST_DEAD_END, Corners::NO_CORNERS))
        );
        assert_eq!(
            maze.cell(Dims(1, 0)),
            Some((WallMask::EAST_DEAD_END, Corners::NO_CORNERS))
        );
        assert_eq!(maze.cell(Dims(2, 0)), None);
    }
}
