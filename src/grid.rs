use std::ops::{Index, IndexMut};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GridError, Result};
use crate::iter::Iter;
use crate::position::{Bounds, Position};

/// Fixed-size row-major grid.
///
/// Cells live in one flat `Vec`; `rows` and `cols` never change after
/// construction. Plain accessors (`get`, `row`, `column`, `at`, indexing) panic
/// on out-of-range coordinates. The `try_*` forms return a [`GridError`]
/// instead, for callers holding untrusted coordinates.
///
/// Equality and hashing cover the dimensions and every cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

#[track_caller]
fn in_bounds<V>(res: Result<V>) -> V {
    match res {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}

/// `rows * cols`, or `TooLarge` if the product overflows.
fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(GridError::TooLarge { rows, cols })
}

impl<T: Clone> Grid<T> {
    /// Every cell a clone of `value`.
    ///
    /// # Panics
    /// If `rows * cols` overflows `usize`.
    #[track_caller]
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; in_bounds(cell_count(rows, cols))],
            rows,
            cols,
        }
    }

    /// Like [`Grid::from_rows`], but short rows are padded with `fill` up to
    /// the longest row.
    pub fn from_rows_padded(rows: Vec<Vec<T>>, fill: T) -> Result<Self> {
        let cols = rows.iter().map(Vec::len).max().ok_or(GridError::Empty)?;
        let n = rows.len();
        let mut data = Vec::with_capacity(cell_count(n, cols)?);
        for row in rows {
            let short = cols - row.len();
            data.extend(row);
            data.extend(std::iter::repeat_n(fill.clone(), short));
        }
        Ok(Self {
            data,
            rows: n,
            cols,
        })
    }

    /// The `c`-th cell of every row, top to bottom.
    #[track_caller]
    pub fn column(&self, c: usize) -> Vec<T> {
        in_bounds(self.try_column(c))
    }

    pub fn try_column(&self, c: usize) -> Result<Vec<T>> {
        self.check_column(c)?;
        Ok(self.iter_rows().map(|row| row[c].clone()).collect())
    }
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }
}

impl<T> Grid<T> {
    /// Build from nested rows. `cols` is the longest row's length.
    ///
    /// Fails on an empty outer list and on rows shorter than the longest one;
    /// see [`Grid::from_rows_padded`] for the padding alternative.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.iter().map(Vec::len).max().ok_or(GridError::Empty)?;
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(GridError::Ragged {
                row,
                len: r.len(),
                expected: cols,
            });
        }
        let n = rows.len();
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            rows: n,
            cols,
        })
    }

    /// Build from row-major cells.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let expected = cell_count(rows, cols)?;
        if data.len() != expected {
            return Err(GridError::DataLength {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.rows, self.cols)
    }

    #[inline]
    fn idx(&self, r: usize, c: usize) -> usize {
        debug_assert!(r < self.rows && c < self.cols);
        r * self.cols + c
    }

    fn check_row(&self, r: usize) -> Result<()> {
        if r < self.rows {
            Ok(())
        } else {
            Err(GridError::RowOutOfBounds {
                row: r,
                rows: self.rows,
            })
        }
    }

    fn check_column(&self, c: usize) -> Result<()> {
        if c < self.cols {
            Ok(())
        } else {
            Err(GridError::ColumnOutOfBounds {
                column: c,
                cols: self.cols,
            })
        }
    }

    fn checked_idx(&self, r: usize, c: usize) -> Result<usize> {
        self.check_row(r)?;
        self.check_column(c)?;
        Ok(self.idx(r, c))
    }

    fn checked_coords(&self, pos: Position) -> Result<(usize, usize)> {
        pos.to_coords(self.bounds()).ok_or(GridError::PositionOutOfBounds {
            row: pos.row,
            column: pos.column,
            rows: self.rows,
            cols: self.cols,
        })
    }

    #[track_caller]
    pub fn get(&self, r: usize, c: usize) -> &T {
        in_bounds(self.try_get(r, c))
    }

    pub fn try_get(&self, r: usize, c: usize) -> Result<&T> {
        let i = self.checked_idx(r, c)?;
        Ok(&self.data[i])
    }

    #[track_caller]
    pub fn get_mut(&mut self, r: usize, c: usize) -> &mut T {
        in_bounds(self.try_get_mut(r, c))
    }

    pub fn try_get_mut(&mut self, r: usize, c: usize) -> Result<&mut T> {
        let i = self.checked_idx(r, c)?;
        Ok(&mut self.data[i])
    }

    #[track_caller]
    pub fn set(&mut self, r: usize, c: usize, value: T) {
        in_bounds(self.try_set(r, c, value))
    }

    pub fn try_set(&mut self, r: usize, c: usize, value: T) -> Result<()> {
        *self.try_get_mut(r, c)? = value;
        Ok(())
    }

    #[track_caller]
    pub fn row(&self, r: usize) -> &[T] {
        in_bounds(self.try_row(r))
    }

    pub fn try_row(&self, r: usize) -> Result<&[T]> {
        self.check_row(r)?;
        Ok(&self.data[r * self.cols..(r + 1) * self.cols])
    }

    #[track_caller]
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        in_bounds(self.check_row(r));
        let cols = self.cols;
        &mut self.data[r * cols..(r + 1) * cols]
    }

    /// Replace row `r` wholesale. `values` must hold exactly `cols` cells.
    #[track_caller]
    pub fn set_row(&mut self, r: usize, values: Vec<T>) {
        in_bounds(self.try_set_row(r, values))
    }

    pub fn try_set_row(&mut self, r: usize, values: Vec<T>) -> Result<()> {
        self.check_row(r)?;
        if values.len() != self.cols {
            return Err(GridError::RowLength {
                expected: self.cols,
                found: values.len(),
            });
        }
        for (dst, v) in self.row_mut(r).iter_mut().zip(values) {
            *dst = v;
        }
        Ok(())
    }

    #[track_caller]
    pub fn at(&self, pos: Position) -> &T {
        in_bounds(self.try_at(pos))
    }

    pub fn try_at(&self, pos: Position) -> Result<&T> {
        let (r, c) = self.checked_coords(pos)?;
        self.try_get(r, c)
    }

    #[track_caller]
    pub fn at_mut(&mut self, pos: Position) -> &mut T {
        let (r, c) = in_bounds(self.checked_coords(pos));
        self.get_mut(r, c)
    }

    #[track_caller]
    pub fn set_at(&mut self, pos: Position, value: T) {
        in_bounds(self.try_set_at(pos, value))
    }

    pub fn try_set_at(&mut self, pos: Position, value: T) -> Result<()> {
        let (r, c) = self.checked_coords(pos)?;
        self.try_set(r, c, value)
    }

    #[inline]
    pub fn start_position(&self) -> Position {
        self.bounds().start()
    }

    /// `(rows, 0)`, one past the last cell.
    #[inline]
    pub fn end_position(&self) -> Position {
        self.bounds().end()
    }

    /// Next position in row-major order, clamped at the end sentinel.
    pub fn index_after(&self, pos: Position) -> Position {
        let end = self.end_position();
        if self.is_empty() || pos >= end {
            return end;
        }
        pos.successor(self.bounds())
    }

    /// Previous position in row-major order, clamped at `(0, 0)`.
    pub fn index_before(&self, pos: Position) -> Position {
        let start = self.start_position();
        if self.is_empty() || pos <= start {
            return start;
        }
        pos.predecessor(self.bounds())
    }

    /// Every cell position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| Position::from((r, c))))
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Row slices, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_rows(self) -> Vec<Vec<T>> {
        let Grid { data, rows, cols } = self;
        let mut cells = data.into_iter();
        (0..rows)
            .map(|_| cells.by_ref().take(cols).collect())
            .collect()
    }

    /// Uniformly permute all cells in place with the thread-local RNG.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    /// Uniformly permute all cells in place. Dimensions are unchanged; cells
    /// may move between rows.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.data.shuffle(rng);
        tracing::trace!(rows = self.rows, cols = self.cols, "shuffled grid");
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        self.get(r, c)
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[track_caller]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        self.get_mut(r, c)
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, pos: Position) -> &T {
        self.at(pos)
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    #[track_caller]
    fn index_mut(&mut self, pos: Position) -> &mut T {
        self.at_mut(pos)
    }
}

impl<T> Index<usize> for Grid<T> {
    type Output = [T];

    #[track_caller]
    fn index(&self, r: usize) -> &[T] {
        self.row(r)
    }
}

impl<T> IndexMut<usize> for Grid<T> {
    #[track_caller]
    fn index_mut(&mut self, r: usize) -> &mut [T] {
        self.row_mut(r)
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// On-disk shape: `{"grid": [[...], ...]}`.
#[derive(Serialize)]
struct GridReprRef<'a, T> {
    grid: Vec<&'a [T]>,
}

#[derive(Deserialize)]
struct GridRepr<T> {
    grid: Vec<Vec<T>>,
}

impl<T: Serialize> Serialize for Grid<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        GridReprRef {
            grid: self.iter_rows().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Grid<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = GridRepr::<T>::deserialize(deserializer)?;
        Grid::from_rows(repr.grid).map_err(serde::de::Error::custom)
    }
}
