use std::fmt;

use rayon::prelude::*;

use crate::grid::Grid;

const CELL_SEP: &str = "\t";
const ROW_END: char = '\n';

#[inline]
fn render_row<T: fmt::Display>(row: &[T]) -> String {
    let mut line = row
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(CELL_SEP);
    line.push(ROW_END);
    line
}

/// Render a grid as text: tab-separated cells, one line per row.
/// Rows are formatted in parallel and joined in order.
pub fn render_text<T: fmt::Display + Sync>(grid: &Grid<T>) -> String {
    if grid.cols() == 0 {
        return ROW_END.to_string().repeat(grid.rows());
    }
    grid.as_slice()
        .par_chunks(grid.cols())
        .map(render_row)
        .collect()
}

/// Render pre-assembled rows the same way as [`render_text`]. Rows may differ
/// in length.
pub fn render_lines<T, R>(rows: &[R]) -> String
where
    T: fmt::Display + Sync,
    R: AsRef<[T]> + Sync,
{
    rows.par_iter().map(|row| render_row(row.as_ref())).collect()
}

impl<T: fmt::Display + Sync> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_text(self))
    }
}
