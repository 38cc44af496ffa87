use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};
use crate::grid::Grid;
use crate::render::render_lines;

/// A grid of grids, addressed either block-wise or as one flattened board.
///
/// A 9x9 Sudoku board is a 3x3 `NestedGrid` of 3x3 blocks: flat row 4 is
/// child row 1 of every block in parent row 1.
///
/// Children may differ in size. Each parent row is a band as tall as its
/// tallest child; each parent column is as wide as its widest child.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedGrid<E> {
    blocks: Grid<Grid<E>>,
}

impl<E: Clone> NestedGrid<E> {
    /// `rows x cols` copies of `block`.
    pub fn filled(rows: usize, cols: usize, block: Grid<E>) -> Self {
        Self::from_blocks(Grid::filled(rows, cols, block))
    }

    /// The `child_col`-th column of every block in parent column `parent_col`,
    /// top to bottom.
    ///
    /// # Panics
    /// If `parent_col` is out of range, or `child_col` is out of range for any
    /// block in that column.
    #[track_caller]
    pub fn flat_column(&self, child_col: usize, parent_col: usize) -> Vec<Vec<E>> {
        (0..self.blocks.rows())
            .map(|r| self.blocks.get(r, parent_col).column(child_col))
            .collect()
    }

    /// Column `x` of the flattened board, one piece per parent row.
    #[track_caller]
    pub fn by_flat_column(&self, x: usize) -> Vec<Vec<E>> {
        let (parent, child) = self.locate_flat_column(x);
        self.flat_column(child, parent)
    }

    /// Every flattened row with its pieces concatenated.
    pub fn flat_rows(&self) -> Vec<Vec<E>> {
        (0..self.total_rows())
            .map(|y| self.by_flat_row(y).concat())
            .collect()
    }
}

impl<E> NestedGrid<E> {
    pub fn from_blocks(blocks: Grid<Grid<E>>) -> Self {
        Self { blocks }
    }

    pub fn from_rows(rows: Vec<Vec<Grid<E>>>) -> Result<Self> {
        Grid::from_rows(rows).map(Self::from_blocks)
    }

    pub fn outer(&self) -> &Grid<Grid<E>> {
        &self.blocks
    }

    pub fn into_outer(self) -> Grid<Grid<E>> {
        self.blocks
    }

    fn band_height(row: &[Grid<E>]) -> usize {
        row.iter().map(Grid::rows).max().unwrap_or(0)
    }

    fn band_width(&self, parent_col: usize) -> usize {
        self.blocks
            .iter_rows()
            .map(|row| row[parent_col].cols())
            .max()
            .unwrap_or(0)
    }

    /// Sum over parent rows of the tallest child in each.
    pub fn total_rows(&self) -> usize {
        self.blocks.iter_rows().map(Self::band_height).sum()
    }

    /// Widest parent row, measured as the sum of its children's widths.
    pub fn total_columns(&self) -> usize {
        self.blocks
            .iter_rows()
            .map(|row| row.iter().map(Grid::cols).sum::<usize>())
            .max()
            .unwrap_or(0)
    }

    /// Row `child_row` of every block in parent row `parent_row`, left to
    /// right. Blocks too short to have that row contribute an empty slice.
    ///
    /// # Panics
    /// If `parent_row` is out of range.
    #[track_caller]
    pub fn flat_row(&self, child_row: usize, parent_row: usize) -> Vec<&[E]> {
        self.blocks
            .row(parent_row)
            .iter()
            .map(|block| block.try_row(child_row).unwrap_or(&[]))
            .collect()
    }

    pub fn try_flat_row(&self, child_row: usize, parent_row: usize) -> Result<Vec<&[E]>> {
        let row = self.blocks.try_row(parent_row)?;
        Ok(row
            .iter()
            .map(|block| block.try_row(child_row).unwrap_or(&[]))
            .collect())
    }

    /// Split flat row `y` into `(parent_row, child_row)`.
    ///
    /// # Panics
    /// If `y >= total_rows()`.
    #[track_caller]
    pub fn locate_flat_row(&self, y: usize) -> (usize, usize) {
        let total = self.total_rows();
        assert!(y < total, "flat row {y} out of bounds (total rows: {total})");
        let mut rest = y;
        for (parent, row) in self.blocks.iter_rows().enumerate() {
            let band = Self::band_height(row);
            if rest < band {
                return (parent, rest);
            }
            rest -= band;
        }
        unreachable!("bands sum to total_rows")
    }

    /// Split flat column `x` into `(parent_col, child_col)`.
    ///
    /// # Panics
    /// If `x >= total_columns()`.
    #[track_caller]
    pub fn locate_flat_column(&self, x: usize) -> (usize, usize) {
        let total = self.total_columns();
        assert!(
            x < total,
            "flat column {x} out of bounds (total columns: {total})"
        );
        let mut rest = x;
        for parent in 0..self.blocks.cols() {
            let band = self.band_width(parent);
            if rest < band {
                return (parent, rest);
            }
            rest -= band;
        }
        unreachable!("column bands cover total_columns")
    }

    /// Row `y` of the flattened board, one slice per block in its band.
    #[track_caller]
    pub fn by_flat_row(&self, y: usize) -> Vec<&[E]> {
        let (parent, child) = self.locate_flat_row(y);
        self.flat_row(child, parent)
    }

    /// The flattened board as text, one line per flat row.
    pub fn render_flat(&self) -> String
    where
        E: fmt::Display + Sync,
    {
        let rows: Vec<Vec<&E>> = (0..self.total_rows())
            .map(|y| self.by_flat_row(y).into_iter().flatten().collect())
            .collect();
        render_lines(&rows)
    }
}

impl<E: DeserializeOwned> NestedGrid<E> {
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, PersistError> {
        Grid::load(path).map(Self::from_blocks)
    }
}

impl<E: Serialize> NestedGrid<E> {
    pub fn save(&self, path: impl AsRef<Path>) -> std::result::Result<(), PersistError> {
        self.blocks.save(path)
    }
}

impl<E> From<Grid<Grid<E>>> for NestedGrid<E> {
    fn from(blocks: Grid<Grid<E>>) -> Self {
        Self::from_blocks(blocks)
    }
}

impl<E> Deref for NestedGrid<E> {
    type Target = Grid<Grid<E>>;

    fn deref(&self) -> &Grid<Grid<E>> {
        &self.blocks
    }
}

impl<E> DerefMut for NestedGrid<E> {
    fn deref_mut(&mut self) -> &mut Grid<Grid<E>> {
        &mut self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    /// Outer 1x2: a 2x2 block of 1s next to a 3x1 block of 2s.
    fn ragged() -> NestedGrid<u8> {
        NestedGrid::from_rows(vec![vec![Grid::filled(2, 2, 1), Grid::filled(3, 1, 2)]]).unwrap()
    }

    #[test]
    fn totals_on_ragged_children() {
        let n = ragged();
        assert_eq!(n.total_rows(), 3);
        assert_eq!(n.total_columns(), 3);
    }

    #[test]
    fn flat_row_is_lenient_about_short_children() {
        let n = ragged();
        let none: &[u8] = &[];
        let two: &[u8] = &[2];
        assert_eq!(n.flat_row(2, 0), vec![none, two]);
        assert_eq!(n.flat_row(9, 0), vec![none, none]);
        assert_eq!(n.render_flat(), "1\t1\t2\n1\t1\t2\n2\n");
    }

    #[test]
    fn try_flat_row_reports_parent_bounds() {
        assert_eq!(
            ragged().try_flat_row(0, 1),
            Err(GridError::RowOutOfBounds { row: 1, rows: 1 })
        );
    }

    #[test]
    #[should_panic(expected = "row 1 out of bounds")]
    fn flat_row_panics_on_parent_out_of_range() {
        ragged().flat_row(0, 1);
    }

    #[test]
    fn locate_walks_uneven_bands() {
        let n = ragged();
        assert_eq!(n.locate_flat_row(2), (0, 2));
        assert_eq!(n.locate_flat_column(1), (0, 1));
        assert_eq!(n.locate_flat_column(2), (1, 0));
    }

    #[test]
    #[should_panic(expected = "column 1 out of bounds")]
    fn flat_column_defers_to_child_bounds() {
        ragged().flat_column(1, 1);
    }

    #[test]
    #[should_panic(expected = "flat row 3 out of bounds")]
    fn by_flat_row_past_total_panics() {
        ragged().by_flat_row(3);
    }

    #[test]
    fn deref_exposes_outer_grid() {
        let mut n = NestedGrid::filled(2, 2, Grid::filled(2, 2, 0));
        n.get_mut(1, 1).set(0, 0, 5);
        assert_eq!(*n[(1, 1)].get(0, 0), 5);
        assert_eq!(*n.get(0, 0).get(0, 0), 0);
        assert_eq!(n.outer().len(), 4);
    }
}
