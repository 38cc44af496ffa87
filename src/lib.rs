//! Fixed-size generic grids with row-major position arithmetic, nested
//! (grid-of-grids) addressing and JSON persistence.
//!
//! ```
//! use gridmatrix::{Grid, NestedGrid};
//!
//! let block = Grid::filled(3, 3, 0u8);
//! let board = NestedGrid::filled(3, 3, block);
//! assert_eq!((board.total_rows(), board.total_columns()), (9, 9));
//! assert_eq!(board.locate_flat_row(4), (1, 1));
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod iter;
pub mod nested;
pub mod persist;
pub mod position;
pub mod render;
pub mod rng;

pub use config::JsonOptions;
pub use error::{GridError, PersistError, Result};
pub use grid::Grid;
pub use iter::Iter;
pub use nested::NestedGrid;
pub use position::{Bounds, Position};
pub use rng::SplitMix64;
