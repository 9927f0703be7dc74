//! Solver front door: the shared trait, algorithm selection, and results.
//!
//! Both engines expose the same capability set behind [`Solver`], so the
//! benchmark harness and callers stay agnostic of which search is running.
//! Solver-internal state (candidate tables, the exact-cover arena) is
//! scoped to a single solve; `reset` wipes it. Solvers are single-threaded;
//! benchmark workers each construct their own.

mod backtrack;
mod dlx;
mod propagate;

pub use backtrack::BacktrackingSolver;
pub use dlx::DlxSolver;

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::board::Board;

/// Which solving algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverAlgorithm {
    /// Backtracking with constraint propagation and MRV.
    Backtracking,
    /// Knuth's Algorithm X over a dancing-links matrix.
    DancingLinks,
    /// Declared for callers that want "DLX for hard, backtracking for
    /// easy"; currently selects DLX.
    Hybrid,
    /// Automatic selection; currently selects DLX.
    Auto,
}

impl fmt::Display for SolverAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverAlgorithm::Backtracking => write!(f, "Backtracking"),
            SolverAlgorithm::DancingLinks => write!(f, "Dancing Links (DLX)"),
            SolverAlgorithm::Hybrid => write!(f, "Hybrid"),
            SolverAlgorithm::Auto => write!(f, "Auto"),
        }
    }
}

/// Outcome of a single solve: the filled grid when one exists, plus search
/// counters and timing. Non-solutions are reported here, never as errors,
/// so callers always receive counters and timing.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub solved: bool,
    pub solution: Option<Board>,
    pub iterations: u64,
    pub backtracks: u64,
    pub time_ms: f64,
    pub algorithm: String,
    pub error_message: Option<String>,
    pub has_unique_solution: bool,
    pub solution_count: usize,
}

/// Capability set shared by both solving engines.
pub trait Solver {
    /// Solve the puzzle, timing the attempt.
    fn solve(&mut self, board: &Board) -> SolveResult;

    /// Enumerate solutions, stopping once `max_solutions` are found.
    fn find_all_solutions(&mut self, board: &Board, max_solutions: usize) -> Vec<Board>;

    /// Exactly one solution exists.
    fn has_unique_solution(&mut self, board: &Board) -> bool {
        self.find_all_solutions(board, 2).len() == 1
    }

    /// Human-readable algorithm name, used in results and reports.
    fn name(&self) -> &'static str;

    /// Drop all per-solve state.
    fn reset(&mut self);
}

/// Construct the solver for an algorithm tag.
pub fn create_solver(algorithm: SolverAlgorithm) -> Box<dyn Solver + Send> {
    match algorithm {
        SolverAlgorithm::Backtracking => Box::new(BacktrackingSolver::new()),
        SolverAlgorithm::DancingLinks | SolverAlgorithm::Hybrid | SolverAlgorithm::Auto => {
            Box::new(DlxSolver::new())
        }
    }
}

/// Milliseconds elapsed since `start` on the monotonic clock.
#[inline]
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_factory_names() {
        assert_eq!(create_solver(SolverAlgorithm::Backtracking).name(), "Backtracking");
        assert_eq!(
            create_solver(SolverAlgorithm::DancingLinks).name(),
            "Dancing Links (DLX)"
        );
        // Hybrid and Auto alias DLX until a difficulty classifier exists.
        assert_eq!(create_solver(SolverAlgorithm::Hybrid).name(), "Dancing Links (DLX)");
        assert_eq!(create_solver(SolverAlgorithm::Auto).name(), "Dancing Links (DLX)");
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(SolverAlgorithm::Backtracking.to_string(), "Backtracking");
        assert_eq!(SolverAlgorithm::DancingLinks.to_string(), "Dancing Links (DLX)");
    }

    #[test]
    fn test_solvers_agree_on_unique_puzzle() {
        let board = Board::from_string(CLASSIC).unwrap();
        let mut dlx = create_solver(SolverAlgorithm::DancingLinks);
        let mut backtrack = create_solver(SolverAlgorithm::Backtracking);
        let a = dlx.solve(&board);
        let b = backtrack.solve(&board);
        assert!(a.solved && b.solved);
        assert_eq!(a.solution, b.solution);
    }

    #[test]
    fn test_uniqueness_agreement() {
        let empty = Board::empty(crate::BoardDimension::standard_4x4());
        for algorithm in [SolverAlgorithm::DancingLinks, SolverAlgorithm::Backtracking] {
            let mut solver = create_solver(algorithm);
            assert!(!solver.has_unique_solution(&empty), "{algorithm}");
        }
    }
}
