use hashbrown::HashSet;
use rand::{seq::SliceRandom as _, Rng as _};
use smallvec::SmallVec;

use crate::{
    dims::Dims,
    error::{MazeError, Result},
    gameboard::{MazeBoard, Region},
};

use super::Random;

/// Splits the board into two randomly grown halves, walls them off from each other and opens a
/// single passage between them, then repeats on both halves until they have at most
/// `threshold` cells.
#[derive(Debug, Clone, Copy)]
pub struct RecursiveDivider {
    pub threshold: usize,
}

impl RecursiveDivider {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Divides the whole board and returns the number of carved passages.
    ///
    /// Region labels are cleared when this returns.
    pub fn divide(&self, board: &mut MazeBoard, rng: &mut Random) -> Result<usize> {
        self.divide_with_leaves(board, rng, |_| {})
    }

    /// Same as [`Self::divide`], calling `on_leaf` with every region that is left unsplit.
    ///
    /// Leaf cells keep all walls between each other, so with a threshold above 1 the board is a
    /// forest of `cell_count - carved` components. The leaves joined by the carved passages form
    /// a tree.
    pub fn divide_with_leaves(
        &self,
        board: &mut MazeBoard,
        rng: &mut Random,
        mut on_leaf: impl FnMut(&[Dims]),
    ) -> Result<usize> {
        board.clear_regions();

        let mut carved = 0;
        let mut stack = vec![board.positions().collect::<Vec<_>>()];

        // Only the region being split carries labels at any time, every other cell is unset.
        while let Some(region) = stack.pop() {
            if region.len() <= self.threshold.max(1) {
                on_leaf(&region);
                continue;
            }

            let members = region.iter().copied().collect::<HashSet<_>>();
            let (sub_a, sub_b) = Self::split_region(board, &region, &members, rng)?;
            let border = Self::build_border(board, &members, &sub_a)?;
            let opened = Self::carve_passage(board, &border, rng)?;
            carved += 1;

            log::trace!(
                "split {} cells into {} + {}, border of {}, opened {:?}",
                region.len(),
                sub_a.len(),
                sub_b.len(),
                border.len(),
                opened,
            );

            for &pos in &region {
                board.set_region(pos, None)?;
            }

            stack.push(sub_b);
            stack.push(sub_a);
        }

        board.clear_regions();
        Ok(carved)
    }

    /// Grows regions [`Region::A`] and [`Region::B`] from two random seeds at once, picking a
    /// random frontier cell on every step, until they cover the whole `region`.
    pub fn split_region(
        board: &mut MazeBoard,
        region: &[Dims],
        members: &HashSet<Dims>,
        rng: &mut Random,
    ) -> Result<(Vec<Dims>, Vec<Dims>)> {
        for &pos in region {
            board.set_region(pos, None)?;
        }

        if region.len() < 2 {
            return Err(MazeError::DisconnectedRegion);
        }

        let seeds = rand::seq::index::sample(rng, region.len(), 2);
        let (seed_a, seed_b) = (region[seeds.index(0)], region[seeds.index(1)]);
        board.set_region(seed_a, Some(Region::A))?;
        board.set_region(seed_b, Some(Region::B))?;

        let mut sub_a = vec![seed_a];
        let mut sub_b = vec![seed_b];
        let mut unsplit = region.len() - 2;
        let mut frontier = vec![seed_a, seed_b];

        while unsplit > 0 {
            if frontier.is_empty() {
                return Err(MazeError::DisconnectedRegion);
            }

            let current = frontier.swap_remove(rng.gen_range(0..frontier.len()));
            let Some(label) = board.region(current) else {
                continue;
            };

            let grown = board
                .neighbors(current)
                .into_iter()
                .filter(|n| members.contains(n) && board.region(*n).is_none())
                .collect::<SmallVec<[_; 4]>>();

            for pos in grown {
                board.set_region(pos, Some(label))?;
                unsplit -= 1;
                match label {
                    Region::A => sub_a.push(pos),
                    Region::B => sub_b.push(pos),
                }
                frontier.push(pos);
            }
        }

        Ok((sub_a, sub_b))
    }

    /// Walls every region A cell off from its region B neighbors and returns the A cells
    /// that touch region B.
    pub fn build_border(
        board: &mut MazeBoard,
        members: &HashSet<Dims>,
        sub_a: &[Dims],
    ) -> Result<Vec<Dims>> {
        let mut border = Vec::new();

        for &cell in sub_a {
            let across = board
                .neighbors(cell)
                .into_iter()
                .filter(|n| members.contains(n) && board.region(*n) == Some(Region::B))
                .collect::<SmallVec<[_; 4]>>();

            for &neighbor in &across {
                board.build_wall(cell, neighbor)?;
            }

            if !across.is_empty() {
                border.push(cell);
            }
        }

        Ok(border)
    }

    fn carve_passage(board: &mut MazeBoard, border: &[Dims], rng: &mut Random) -> Result<Dims> {
        let &cell = border.choose(rng).ok_or(MazeError::DisconnectedRegion)?;
        let wall = board.remove_one_internal_wall(cell, rng)?;
        Ok(cell + wall.to_coord())
    }
}
