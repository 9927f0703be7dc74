//! Generalized Sudoku solving engine.
//!
//! Solves N x N puzzles whose side factors into `box_rows * box_cols`
//! boxes (4x4 through 25x25 in practice). Two interchangeable engines sit
//! behind the [`Solver`] trait: a backtracker with constraint propagation
//! and MRV cell selection, and a Dancing Links implementation of Knuth's
//! Algorithm X over the exact-cover formulation. A benchmark harness
//! measures single- and multi-threaded throughput with a baseline-anchored
//! speedup figure.
//!
//! ```
//! use sudoku_core::{create_solver, Board, SolverAlgorithm};
//!
//! let board = Board::from_string(
//!     "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
//! )
//! .unwrap();
//! let mut solver = create_solver(SolverAlgorithm::DancingLinks);
//! let result = solver.solve(&board);
//! assert!(result.solved);
//! ```

pub mod benchmark;
pub mod board;
pub mod candidates;
pub mod error;
pub mod solver;

pub use benchmark::{Benchmark, BenchmarkConfig, BenchmarkResult, MultithreadResult};
pub use board::{Board, BoardDimension, Cell};
pub use candidates::CandidateSet;
pub use error::SudokuError;
pub use solver::{
    create_solver, BacktrackingSolver, DlxSolver, SolveResult, Solver, SolverAlgorithm,
};
