use serde::{Deserialize, Serialize};

/// Dimensions of the grid a [`Position`] indexes.
///
/// Position arithmetic takes the bounds explicitly, so positions from grids of
/// different sizes never share state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub rows: usize,
    pub cols: usize,
}

impl Bounds {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// First cell, `(0, 0)`.
    #[inline]
    pub fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// Exclusive end sentinel, `(rows, 0)`. Never dereferenced.
    #[inline]
    pub fn end(&self) -> Position {
        Position::new(self.rows as i64, 0)
    }

    /// Index of the last column, `-1` for a zero-width grid.
    #[inline]
    pub fn max_column(&self) -> i64 {
        self.cols as i64 - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `pos` addresses a real cell.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.rows as i64 && self.contains_column(pos.column)
    }

    #[inline]
    fn contains_column(&self, column: i64) -> bool {
        column >= 0 && column < self.cols as i64
    }

    #[inline]
    fn linear(&self, pos: Position) -> i64 {
        pos.row * self.cols as i64 + pos.column
    }

    #[inline]
    fn from_linear(&self, i: i64) -> Position {
        let cols = self.cols as i64;
        Position::new(i.div_euclid(cols), i.rem_euclid(cols))
    }

    fn check_column(&self, pos: Position) {
        assert!(
            self.contains_column(pos.column),
            "column {} of position ({}, {}) outside 0..{}",
            pos.column,
            pos.row,
            pos.column,
            self.cols
        );
    }
}

/// A `(row, column)` coordinate, signed so the end sentinel and the step
/// before `(0, 0)` are representable.
///
/// `Ord` is row-major lexicographic, so `<` on `Position` is deliberately not
/// the historical `r1 < r2 || c1 < c2` relation. Comparison vectors written
/// against that relation should be checked with [`Position::precedes`].
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub row: i64,
    pub column: i64,
}

impl Position {
    pub const fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// `row < other.row || column < other.column`.
    ///
    /// Not a total order: `(0, 5)` precedes `(1, 0)` and `(1, 0)` precedes
    /// `(0, 5)`. Row-major traversal never relies on it.
    pub fn precedes(&self, other: &Position) -> bool {
        self.row < other.row || self.column < other.column
    }

    /// Move `n` cells in row-major order: forward for `n > 0`, backward for
    /// `n < 0`. Columns wrap into rows in both directions; rows are not
    /// clamped.
    ///
    /// # Panics
    /// If `n != 0` and the column lies outside `0..bounds.cols`.
    pub fn advanced_by(self, n: i64, bounds: Bounds) -> Position {
        if n == 0 {
            return self;
        }
        bounds.check_column(self);
        bounds.from_linear(bounds.linear(self) + n)
    }

    /// One step forward: `(r, max) -> (r + 1, 0)`, otherwise `(r, c + 1)`.
    pub fn successor(self, bounds: Bounds) -> Position {
        self.advanced_by(1, bounds)
    }

    /// One step backward: `(r, 0) -> (r - 1, max)`, otherwise `(r, c - 1)`.
    pub fn predecessor(self, bounds: Bounds) -> Position {
        self.advanced_by(-1, bounds)
    }

    /// Signed number of steps from `self` to `other`, so that
    /// `self.advanced_by(self.distance_to(other, b), b) == other`.
    ///
    /// # Panics
    /// If the positions differ and either column lies outside `0..bounds.cols`.
    pub fn distance_to(&self, other: Position, bounds: Bounds) -> i64 {
        if *self == other {
            return 0;
        }
        bounds.check_column(*self);
        bounds.check_column(other);
        bounds.linear(other) - bounds.linear(*self)
    }

    /// `(row, column)` as `usize` if the position addresses a real cell.
    pub fn to_coords(self, bounds: Bounds) -> Option<(usize, usize)> {
        if bounds.contains(self) {
            Some((self.row as usize, self.column as usize))
        } else {
            None
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, column): (usize, usize)) -> Self {
        Self::new(row as i64, column as i64)
    }
}
