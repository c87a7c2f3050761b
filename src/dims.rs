use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Position or size on the grid, `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dims(pub i32, pub i32);

impl Dims {
    pub const ZERO: Dims = Dims(0, 0);

    /// Iterates every position in `from..to` in row-major order, `y` outer and `x` inner.
    pub fn iter_fill(from: Dims, to: Dims) -> impl Iterator<Item = Dims> {
        (from.1..to.1).flat_map(move |y| (from.0..to.0).map(move |x| Dims(x, y)))
    }

    pub fn all_positive(self) -> bool {
        self.0 > 0 && self.1 > 0
    }

    pub fn all_non_negative(self) -> bool {
        self.0 >= 0 && self.1 >= 0
    }

    /// Number of positions inside a rectangle of this size, `None` on overflow or negative size.
    pub fn product(self) -> Option<usize> {
        let w = usize::try_from(self.0).ok()?;
        let h = usize::try_from(self.1).ok()?;
        w.checked_mul(h)
    }
}

impl Add for Dims {
    type Output = Dims;

    fn add(self, other: Dims) -> Dims {
        Dims(self.0 + other.0, self.1 + other.1)
    }
}
