use std::iter::FusedIterator;

use crate::grid::Grid;

/// Row-major cursor over a [`Grid`].
///
/// Starts at `(0, 0)` and yields every cell once. Once `row` reaches the row
/// count it stays exhausted.
#[derive(Clone, Debug)]
pub struct Iter<'a, T> {
    grid: &'a Grid<T>,
    row: usize,
    column: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(grid: &'a Grid<T>) -> Self {
        Self {
            grid,
            row: 0,
            column: 0,
        }
    }

    /// Current `(row, column)` of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.column)
    }

    fn remaining(&self) -> usize {
        if self.row >= self.grid.rows() {
            return 0;
        }
        self.grid.len() - (self.row * self.grid.cols() + self.column)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.row >= self.grid.rows() || self.grid.cols() == 0 {
            return None;
        }
        let item = self.grid.get(self.row, self.column);
        if self.column + 1 < self.grid.cols() {
            self.column += 1;
        } else {
            self.row += 1;
            self.column = 0;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
