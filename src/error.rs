/// Shape and bounds violations.
///
/// The `try_*` accessors return these. The plain accessors treat the same
/// conditions as caller bugs and panic with the error's message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid was built from an empty list of rows.
    #[error("cannot build a grid from an empty list of rows")]
    Empty,

    /// An input row is shorter than the longest row.
    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged { row: usize, len: usize, expected: usize },

    #[error("row {row} out of bounds (rows: {rows})")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("column {column} out of bounds (columns: {cols})")]
    ColumnOutOfBounds { column: usize, cols: usize },

    #[error("position ({row}, {column}) out of bounds ({rows}x{cols})")]
    PositionOutOfBounds {
        row: i64,
        column: i64,
        rows: usize,
        cols: usize,
    },

    /// `rows * cols` does not fit in `usize`.
    #[error("grid of {rows}x{cols} cells is too large")]
    TooLarge { rows: usize, cols: usize },

    /// A replacement row does not have exactly `cols` cells.
    #[error("row length mismatch: expected {expected}, found {found}")]
    RowLength { expected: usize, found: usize },

    /// Flat storage does not hold exactly `rows * cols` cells.
    #[error("data length mismatch: expected {expected}, found {found}")]
    DataLength { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, GridError>;

/// Load/save failures, passed through from the I/O layer or the JSON codec.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
