use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dims::Dims;

use self::CellWall::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellWall {
    North,
    East,
    South,
    West,
}

impl CellWall {
    /// Walls in the order their letters are printed.
    pub const fn get_in_order() -> [CellWall; 4] {
        [North, South, East, West]
    }

    pub const fn bit(self) -> u8 {
        match self {
            North => 1,
            East => 2,
            South => 4,
            West => 8,
        }
    }

    pub const fn to_coord(self) -> Dims {
        match self {
            North => Dims(0, -1),
            East => Dims(1, 0),
            South => Dims(0, 1),
            West => Dims(-1, 0),
        }
    }

    pub const fn reverse_wall(self) -> CellWall {
        match self {
            North => South,
            East => West,
            South => North,
            West => East,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            North => 'N',
            East => 'E',
            South => 'S',
            West => 'W',
        }
    }
}

/// 4-bit set of the cardinal walls of a cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallMask(u8);

impl WallMask {
    pub const NO_WALLS: WallMask = WallMask(0);
    pub const ALL_WALLS: WallMask = WallMask(15);

    pub const HORIZONTAL_PASSAGE: WallMask = WallMask(North.bit() | South.bit());
    pub const VERTICAL_PASSAGE: WallMask = WallMask(East.bit() | West.bit());

    pub const NORTH_DEAD_END: WallMask = WallMask(North.bit() | East.bit() | West.bit());
    pub const SOUTH_DEAD_END: WallMask = WallMask(South.bit() | East.bit() | West.bit());
    pub const EAST_DEAD_END: WallMask = WallMask(North.bit() | South.bit() | East.bit());
    pub const WEST_DEAD_END: WallMask = WallMask(North.bit() | South.bit() | West.bit());

    /// Keeps only the four wall bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        WallMask(bits & Self::ALL_WALLS.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn has(self, wall: CellWall) -> bool {
        self.0 & wall.bit() != 0
    }

    pub fn set(&mut self, wall: CellWall) {
        self.0 |= wall.bit();
    }

    pub fn clear(&mut self, wall: CellWall) {
        self.0 &= !wall.bit();
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn iter(self) -> impl Iterator<Item = CellWall> {
        CellWall::get_in_order()
            .into_iter()
            .filter(move |&wall| self.has(wall))
    }
}

impl fmt::Display for WallMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for wall in self.iter() {
            write!(f, "{}", wall.letter())?;
        }
        Ok(())
    }
}

impl FromIterator<CellWall> for WallMask {
    fn from_iter<I: IntoIterator<Item = CellWall>>(iter: I) -> Self {
        let mut mask = WallMask::NO_WALLS;
        for wall in iter {
            mask.set(wall);
        }
        mask
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl Corner {
    pub const fn get_in_order() -> [Corner; 4] {
        use Corner::*;
        [NorthWest, NorthEast, SouthEast, SouthWest]
    }

    pub const fn bit(self) -> u8 {
        match self {
            Corner::NorthWest => 16,
            Corner::NorthEast => 32,
            Corner::SouthEast => 64,
            Corner::SouthWest => 128,
        }
    }

    /// The two walls meeting at this corner, vertical one first.
    pub const fn walls(self) -> (CellWall, CellWall) {
        match self {
            Corner::NorthWest => (North, West),
            Corner::NorthEast => (North, East),
            Corner::SouthEast => (South, East),
            Corner::SouthWest => (South, West),
        }
    }
}

/// Upper 4 bits of the serialized cell, see [`Corner::bit`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Corners(u8);

impl Corners {
    pub const NO_CORNERS: Corners = Corners(0);
    pub const ALL_CORNERS: Corners = Corners(240);

    pub const fn from_bits(bits: u8) -> Self {
        Corners(bits & Self::ALL_CORNERS.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn has(self, corner: Corner) -> bool {
        self.0 & corner.bit() != 0
    }

    pub fn set(&mut self, corner: Corner) {
        self.0 |= corner.bit();
    }
}

/// Transient label of one half of a region while it is being split.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    A,
    B,
}

#[derive(Debug, Clone, Copy)]
pub struct Cell {
    walls: WallMask,
    region: Option<Region>,
    pub(crate) coord: Dims,
}

impl Cell {
    /// Fully walled cell without a region.
    pub fn new(pos: Dims) -> Cell {
        Cell {
            walls: WallMask::ALL_WALLS,
            region: None,
            coord: pos,
        }
    }

    pub fn walls(&self) -> WallMask {
        self.walls
    }

    pub fn set_walls(&mut self, walls: WallMask) {
        self.walls = walls;
    }

    pub fn has_wall(&self, wall: CellWall) -> bool {
        self.walls.has(wall)
    }

    pub fn add_wall(&mut self, wall: CellWall) {
        self.walls.set(wall);
    }

    pub fn remove_wall(&mut self, wall: CellWall) {
        self.walls.clear(wall);
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn set_region(&mut self, region: Option<Region>) {
        self.region = region;
    }

    pub fn is_in_region(&self) -> bool {
        self.region.is_some()
    }

    /// `other` carries a region label, and it differs from ours.
    pub fn is_in_different_region(&self, other: &Cell) -> bool {
        other.is_in_region() && other.region != self.region
    }

    pub fn get_coord(&self) -> Dims {
        self.coord
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Cell {}
