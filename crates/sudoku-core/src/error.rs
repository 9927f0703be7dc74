//! Error types surfaced at the API boundary.
//!
//! Geometric and structural violations (bad coordinates, bad values, bad
//! dimensions) are errors. Algorithmic non-solutions are not: solvers report
//! those through [`SolveResult`](crate::SolveResult) so callers always get
//! counters and timing back.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SudokuError {
    #[error("cell position ({row}, {col}) out of range for a {size}x{size} board")]
    OutOfRange { row: usize, col: usize, size: usize },

    #[error("invalid cell value {value} (expected 0 for empty or 1..={size})")]
    InvalidValue { value: u32, size: usize },

    #[error("invalid board dimension: {size} with {box_rows}x{box_cols} boxes")]
    InvalidDimension {
        size: usize,
        box_rows: usize,
        box_cols: usize,
    },

    #[error("grid is {rows}x{cols}, expected {size}x{size}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        size: usize,
    },
}
