use rand::seq::SliceRandom as _;
use smallvec::SmallVec;

use crate::{
    algorithms::Random,
    array::Array2D,
    dims::Dims,
    error::{MazeError, Result},
};

use super::cell::{Cell, CellWall, Corner, Corners, Region, WallMask};

/// Grid of cells, owning their walls and the transient region labels used while dividing.
///
/// Cells are addressed by position, so neighbors are resolved by coordinate arithmetic instead
/// of references between cells.
#[derive(Debug, Clone)]
pub struct MazeBoard {
    pub(crate) cells: Array2D<Cell>,
}

impl MazeBoard {
    /// Allocates a fully walled `width` x `height` board.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let size = Dims(width, height);
        if !size.all_positive() {
            return Err(MazeError::InvalidDimension { width, height });
        }

        let cells = Array2D::from_fn(width as usize, height as usize, Cell::new);
        Ok(MazeBoard { cells })
    }

    pub fn size(&self) -> Dims {
        self.cells.size()
    }

    pub fn width(&self) -> i32 {
        self.size().0
    }

    pub fn height(&self) -> i32 {
        self.size().1
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_in_bounds(&self, pos: Dims) -> bool {
        self.cells.dim_to_idx(pos).is_some()
    }

    pub fn get_cell(&self, pos: Dims) -> Option<&Cell> {
        self.cells.get(pos)
    }

    pub fn cell_at(&self, pos: Dims) -> Result<&Cell> {
        self.cells.get(pos).ok_or(MazeError::OutOfBounds(pos))
    }

    pub fn cell_at_mut(&mut self, pos: Dims) -> Result<&mut Cell> {
        self.cells.get_mut(pos).ok_or(MazeError::OutOfBounds(pos))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = Dims> + '_ {
        self.cells.iter_pos()
    }

    pub fn has_neighbor(&self, pos: Dims, wall: CellWall) -> bool {
        self.is_in_bounds(pos) && self.is_in_bounds(pos + wall.to_coord())
    }

    pub fn neighbor(&self, pos: Dims, wall: CellWall) -> Option<Dims> {
        self.has_neighbor(pos, wall).then(|| pos + wall.to_coord())
    }

    /// Geometrically adjacent positions, regardless of the walls between them.
    pub fn neighbors(&self, pos: Dims) -> SmallVec<[Dims; 4]> {
        CellWall::get_in_order()
            .into_iter()
            .filter_map(|wall| self.neighbor(pos, wall))
            .collect()
    }

    /// Wall of `cell` that faces `cell2`, `None` if they are not adjacent.
    pub fn which_wall_between(cell: Dims, cell2: Dims) -> Option<CellWall> {
        use CellWall::*;

        let offset = (cell2.0.checked_sub(cell.0)?, cell2.1.checked_sub(cell.1)?);
        match offset {
            (1, 0) => Some(East),
            (-1, 0) => Some(West),
            (0, 1) => Some(South),
            (0, -1) => Some(North),
            _ => None,
        }
    }

    pub fn get_wall_mask(&self, pos: Dims) -> Result<WallMask> {
        Ok(self.cell_at(pos)?.walls())
    }

    pub fn set_wall_mask(&mut self, pos: Dims, mask: WallMask) -> Result<()> {
        self.cell_at_mut(pos)?.set_walls(mask);
        Ok(())
    }

    pub fn has_wall(&self, pos: Dims, wall: CellWall) -> bool {
        self.get_cell(pos).is_some_and(|cell| cell.has_wall(wall))
    }

    /// Puts a wall between two adjacent cells, on both sides.
    pub fn build_wall(&mut self, cell: Dims, neighbor: Dims) -> Result<()> {
        let wall = Self::which_wall_between(cell, neighbor)
            .ok_or(MazeError::OutOfBounds(neighbor))?;
        self.cell_at(neighbor)?;

        self.cell_at_mut(cell)?.add_wall(wall);
        self.cell_at_mut(neighbor)?.add_wall(wall.reverse_wall());
        Ok(())
    }

    /// Opens the wall on both sides. Walls on the edge of the board are left untouched.
    pub fn remove_wall(&mut self, pos: Dims, wall: CellWall) {
        let Some(neighbor) = self.neighbor(pos, wall) else {
            return;
        };

        if let Some(cell) = self.cells.get_mut(pos) {
            cell.remove_wall(wall);
        }
        if let Some(cell) = self.cells.get_mut(neighbor) {
            cell.remove_wall(wall.reverse_wall());
        }
    }

    /// Present walls of `pos` that separate it from a neighbor labeled with another region.
    pub fn border_walls(&self, pos: Dims) -> Result<WallMask> {
        let cell = self.cell_at(pos)?;

        Ok(cell
            .walls()
            .iter()
            .filter(|&wall| {
                self.neighbor(pos, wall)
                    .and_then(|n| self.cells.get(n))
                    .is_some_and(|other| cell.is_in_different_region(other))
            })
            .collect())
    }

    /// Opens one randomly chosen wall of [`Self::border_walls`] and returns it.
    pub fn remove_one_internal_wall(&mut self, pos: Dims, rng: &mut Random) -> Result<CellWall> {
        let candidates = self
            .border_walls(pos)?
            .iter()
            .collect::<SmallVec<[_; 4]>>();

        let wall = *candidates
            .choose(rng)
            .ok_or(MazeError::NoCandidateWall(pos))?;

        self.remove_wall(pos, wall);
        Ok(wall)
    }

    pub fn corners(&self, pos: Dims) -> Result<Corners> {
        Ok(self.cell_corners(self.cell_at(pos)?))
    }

    /// A corner is set when both of its walls are open, but a wall continuing one of the openings
    /// is present on a neighboring cell.
    pub fn cell_corners(&self, cell: &Cell) -> Corners {
        let pos = cell.get_coord();
        let mut corners = Corners::NO_CORNERS;

        for corner in Corner::get_in_order() {
            let (vertical, horizontal) = corner.walls();
            if cell.has_wall(vertical) || cell.has_wall(horizontal) {
                continue;
            }

            let across_horizontal = self
                .neighbor(pos, horizontal)
                .is_some_and(|n| self.has_wall(n, vertical));
            let across_vertical = self
                .neighbor(pos, vertical)
                .is_some_and(|n| self.has_wall(n, horizontal));

            if across_horizontal || across_vertical {
                corners.set(corner);
            }
        }

        corners
    }

    /// Walls in the low 4 bits, corners in the high 4 bits.
    pub fn walls_and_corners(&self, pos: Dims) -> Result<u8> {
        Ok(self.get_wall_mask(pos)?.bits() | self.corners(pos)?.bits())
    }

    pub fn region(&self, pos: Dims) -> Option<Region> {
        self.get_cell(pos).and_then(Cell::region)
    }

    pub fn set_region(&mut self, pos: Dims, region: Option<Region>) -> Result<()> {
        self.cell_at_mut(pos)?.set_region(region);
        Ok(())
    }

    pub fn clear_regions(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.set_region(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;
    use CellWall::*;

    fn rng() -> Random {
        Random::seed_from_u64(7)
    }

    #[test]
    fn rejects_empty_board() {
        assert_eq!(
            MazeBoard::new(0, 3).unwrap_err(),
            MazeError::InvalidDimension {
                width: 0,
                height: 3
            }
        );
        assert!(MazeBoard::new(3, -1).is_err());
    }

    #[test]
    fn starts_fully_walled() {
        let board = MazeBoard::new(3, 2).unwrap();
        assert_eq!(board.cell_count(), 6);
        for pos in board.positions() {
            assert_eq!(board.get_wall_mask(pos).unwrap(), WallMask::ALL_WALLS);
            assert_eq!(board.region(pos), None);
        }
    }

    #[test]
    fn neighbors_are_geometric() {
        let board = MazeBoard::new(3, 3).unwrap();
        assert_eq!(board.neighbors(Dims(1, 1)).len(), 4);
        assert_eq!(board.neighbors(Dims(0, 0)).len(), 2);
        assert_eq!(board.neighbors(Dims(2, 1)).len(), 3);

        let mut corner: Vec<_> = board.neighbors(Dims(0, 0)).into_iter().collect();
        corner.sort_by_key(|d| (d.1, d.0));
        assert_eq!(corner, vec![Dims(1, 0), Dims(0, 1)]);
    }

    #[test]
    fn cell_lookup() {
        let board = MazeBoard::new(2, 2).unwrap();
        assert_eq!(board.cell_at(Dims(1, 1)).unwrap().get_coord(), Dims(1, 1));
        assert_eq!(
            board.cell_at(Dims(2, 0)).unwrap_err(),
            MazeError::OutOfBounds(Dims(2, 0))
        );
    }

    #[test]
    fn wall_between() {
        assert_eq!(MazeBoard::which_wall_between(Dims(1, 1), Dims(2, 1)), Some(East));
        assert_eq!(MazeBoard::which_wall_between(Dims(1, 1), Dims(0, 1)), Some(West));
        assert_eq!(MazeBoard::which_wall_between(Dims(1, 1), Dims(1, 0)), Some(North));
        assert_eq!(MazeBoard::which_wall_between(Dims(1, 1), Dims(1, 2)), Some(South));
        assert_eq!(MazeBoard::which_wall_between(Dims(1, 1), Dims(2, 2)), None);
    }

    #[test]
    fn wall_between_extreme_coordinates() {
        let (min, max) = (i32::MIN, i32::MAX);
        assert_eq!(MazeBoard::which_wall_between(Dims(min, 0), Dims(max, 0)), None);
        assert_eq!(MazeBoard::which_wall_between(Dims(max, 0), Dims(min, 0)), None);
        assert_eq!(MazeBoard::which_wall_between(Dims(0, min), Dims(0, max)), None);
        assert_eq!(MazeBoard::which_wall_between(Dims(max, 0), Dims(max - 1, 0)), Some(West));

        let mut board = MazeBoard::new(2, 2).unwrap();
        assert_eq!(
            board.build_wall(Dims(min, 0), Dims(max, 0)),
            Err(MazeError::OutOfBounds(Dims(max, 0)))
        );
        assert_eq!(
            board.build_wall(Dims(0, 0), Dims(0, min)),
            Err(MazeError::OutOfBounds(Dims(0, min)))
        );
    }

    #[test]
    fn build_and_remove_wall() {
        let mut board = MazeBoard::new(2, 1).unwrap();
        board.remove_wall(Dims(0, 0), East);
        assert!(!board.has_wall(Dims(0, 0), East));
        assert!(!board.has_wall(Dims(1, 0), West));

        board.build_wall(Dims(1, 0), Dims(0, 0)).unwrap();
        assert!(board.has_wall(Dims(0, 0), East));
        assert!(board.has_wall(Dims(1, 0), West));

        // idempotent
        board.build_wall(Dims(0, 0), Dims(1, 0)).unwrap();
        assert_eq!(board.get_wall_mask(Dims(0, 0)).unwrap(), WallMask::ALL_WALLS);

        assert!(board.build_wall(Dims(0, 0), Dims(1, 1)).is_err());
    }

    #[test]
    fn edge_walls_stay() {
        let mut board = MazeBoard::new(1, 1).unwrap();
        for wall in CellWall::get_in_order() {
            board.remove_wall(Dims(0, 0), wall);
        }
        assert_eq!(board.get_wall_mask(Dims(0, 0)).unwrap(), WallMask::ALL_WALLS);
    }

    #[test]
    fn set_mask_is_bit_exact() {
        let mut board = MazeBoard::new(2, 2).unwrap();
        board
            .set_wall_mask(Dims(1, 1), WallMask::HORIZONTAL_PASSAGE)
            .unwrap();
        assert_eq!(board.get_wall_mask(Dims(1, 1)).unwrap().bits(), 5);
    }

    #[test]
    fn border_walls_need_other_region() {
        let mut board = MazeBoard::new(3, 1).unwrap();
        assert_eq!(board.border_walls(Dims(1, 0)).unwrap(), WallMask::NO_WALLS);

        board.set_region(Dims(1, 0), Some(Region::A)).unwrap();
        board.set_region(Dims(0, 0), Some(Region::A)).unwrap();
        board.set_region(Dims(2, 0), Some(Region::B)).unwrap();
        assert_eq!(
            board.border_walls(Dims(1, 0)).unwrap(),
            [East].into_iter().collect::<WallMask>()
        );
    }

    #[test]
    fn remove_one_internal_wall_opens_both_sides() {
        let mut board = MazeBoard::new(3, 3).unwrap();
        board.set_region(Dims(1, 1), Some(Region::A)).unwrap();
        board.set_region(Dims(1, 0), Some(Region::B)).unwrap();
        board.set_region(Dims(0, 1), Some(Region::B)).unwrap();

        let wall = board.remove_one_internal_wall(Dims(1, 1), &mut rng()).unwrap();
        assert!(wall == North || wall == West);
        let other = Dims(1, 1) + wall.to_coord();
        assert!(!board.has_wall(Dims(1, 1), wall));
        assert!(!board.has_wall(other, wall.reverse_wall()));
        assert_eq!(board.get_wall_mask(Dims(1, 1)).unwrap().count(), 3);
    }

    #[test]
    fn remove_one_internal_wall_picks_every_candidate() {
        let mut seen = WallMask::NO_WALLS;
        for seed in 0..100 {
            let mut board = MazeBoard::new(3, 3).unwrap();
            board.set_region(Dims(1, 1), Some(Region::A)).unwrap();
            board.set_region(Dims(1, 0), Some(Region::B)).unwrap();
            board.set_region(Dims(0, 1), Some(Region::B)).unwrap();

            let wall = board
                .remove_one_internal_wall(Dims(1, 1), &mut Random::seed_from_u64(seed))
                .unwrap();
            assert!(wall == North || wall == West, "seed {seed} opened {wall:?}");
            seen.set(wall);
        }
        assert_eq!(seen, [North, West].into_iter().collect::<WallMask>());
    }

    #[test]
    fn remove_one_internal_wall_single_candidate() {
        let mut board = MazeBoard::new(3, 1).unwrap();
        board.set_region(Dims(0, 0), Some(Region::A)).unwrap();
        board.set_region(Dims(1, 0), Some(Region::B)).unwrap();

        for seed in 0..10 {
            let mut board = board.clone();
            let wall = board
                .remove_one_internal_wall(Dims(0, 0), &mut Random::seed_from_u64(seed))
                .unwrap();
            assert_eq!(wall, East);
            assert_eq!(board.get_wall_mask(Dims(0, 0)).unwrap(), WallMask::WEST_DEAD_END);
            assert!(!board.has_wall(Dims(1, 0), West));
            assert!(board.has_wall(Dims(1, 0), East));
            assert_eq!(board.get_wall_mask(Dims(2, 0)).unwrap(), WallMask::ALL_WALLS);
        }
    }

    #[test]
    fn remove_one_internal_wall_without_candidates() {
        let mut board = MazeBoard::new(2, 2).unwrap();
        board.set_region(Dims(0, 0), Some(Region::A)).unwrap();
        assert_eq!(
            board.remove_one_internal_wall(Dims(0, 0), &mut rng()),
            Err(MazeError::NoCandidateWall(Dims(0, 0)))
        );
    }

    #[test]
    fn corners_of_open_square() {
        // nothing continues the openings at the center of a fully open 2x2 square
        let mut board = MazeBoard::new(2, 2).unwrap();
        board.remove_wall(Dims(0, 0), East);
        board.remove_wall(Dims(0, 1), East);
        board.remove_wall(Dims(0, 0), South);
        board.remove_wall(Dims(1, 0), South);
        for pos in board.positions() {
            assert_eq!(board.corners(pos).unwrap(), Corners::NO_CORNERS);
        }
    }

    #[test]
    fn corner_needs_continuing_wall() {
        // (0,0) open to the east and to the south, while (1,0) keeps its south wall.
        let mut board = MazeBoard::new(2, 2).unwrap();
        board.remove_wall(Dims(0, 0), East);
        board.remove_wall(Dims(0, 0), South);

        let corners = board.corners(Dims(0, 0)).unwrap();
        assert!(corners.has(Corner::SouthEast));
        assert_eq!(corners.bits(), Corner::SouthEast.bit());
        assert_eq!(
            board.walls_and_corners(Dims(0, 0)).unwrap(),
            North.bit() | West.bit() | Corner::SouthEast.bit()
        );
    }

    #[test]
    fn clear_regions_resets_every_cell() {
        let mut board = MazeBoard::new(2, 2).unwrap();
        for pos in board.positions().collect::<Vec<_>>() {
            board.set_region(pos, Some(Region::B)).unwrap();
        }
        board.clear_regions();
        assert!(board.cells().all(|c| !c.is_in_region()));
    }
}
