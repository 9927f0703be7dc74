//! Backtracking solver: depth-first search with constraint propagation and
//! MRV cell selection.
//!
//! Each search frame snapshots the full working state (grid plus candidate
//! tables) before trying a candidate and restores it wholesale on failure.
//! Propagation may fill many cells per frame, so a full snapshot is the
//! simplest restore that stays correct.

use std::time::Instant;

use tracing::debug;

use crate::board::Board;
use crate::solver::propagate::PropagationState;
use crate::solver::{elapsed_ms, SolveResult, Solver};

pub struct BacktrackingSolver {
    use_constraint_prop: bool,
    use_mrv: bool,
    state: PropagationState,
    iterations: u64,
    backtracks: u64,
}

impl BacktrackingSolver {
    pub fn new() -> Self {
        Self {
            use_constraint_prop: true,
            use_mrv: true,
            state: PropagationState::default(),
            iterations: 0,
            backtracks: 0,
        }
    }

    /// Disable or re-enable the propagation pass (naked/hidden singles).
    pub fn set_use_constraint_prop(&mut self, enabled: bool) {
        self.use_constraint_prop = enabled;
    }

    /// Disable or re-enable MRV cell selection; falls back to first-empty.
    pub fn set_use_mrv(&mut self, enabled: bool) {
        self.use_mrv = enabled;
    }

    /// Next cell to branch on: fewest remaining candidates, row-major
    /// tie-break. None when the board is full.
    fn select_cell(&self, board: &Board) -> Option<(usize, usize)> {
        if !self.use_mrv {
            return board.find_first_empty();
        }
        let n = board.size();
        let mut best = None;
        let mut min_count = u32::MAX;
        for row in 0..n {
            for col in 0..n {
                if board.get(row, col) != 0 {
                    continue;
                }
                let count = self.state.candidate_count(row, col);
                if count < min_count {
                    min_count = count;
                    best = Some((row, col));
                    if min_count == 1 {
                        return best;
                    }
                }
            }
        }
        best
    }

    fn search(&mut self, board: &mut Board) -> bool {
        self.iterations += 1;

        if self.use_constraint_prop && !self.state.propagate(board) {
            return false;
        }

        let Some((row, col)) = self.select_cell(board) else {
            // Board is full.
            return board.is_valid();
        };

        let cands = self.state.candidate_bits(row, col);
        if cands.is_empty() {
            return false;
        }

        for value in cands.iter() {
            let saved_board = board.clone();
            let saved_state = self.state.clone();

            board.set_unchecked(row, col, value);
            self.state.assign(row, col, value);

            if self.search(board) {
                return true;
            }

            self.backtracks += 1;
            *board = saved_board;
            self.state = saved_state;
        }

        false
    }

    fn search_all(&mut self, board: &mut Board, solutions: &mut Vec<Board>, max: usize) -> bool {
        self.iterations += 1;

        if self.use_constraint_prop && !self.state.propagate(board) {
            return false;
        }

        let Some((row, col)) = self.select_cell(board) else {
            if board.is_valid() {
                solutions.push(board.clone());
                return solutions.len() >= max;
            }
            return false;
        };

        let cands = self.state.candidate_bits(row, col);
        if cands.is_empty() {
            return false;
        }

        for value in cands.iter() {
            let saved_board = board.clone();
            let saved_state = self.state.clone();

            board.set_unchecked(row, col, value);
            self.state.assign(row, col, value);

            if self.search_all(board, solutions, max) {
                // Cap reached; unwind without disturbing the collected set.
                *board = saved_board;
                self.state = saved_state;
                return true;
            }

            self.backtracks += 1;
            *board = saved_board;
            self.state = saved_state;
        }

        false
    }
}

impl Default for BacktrackingSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for BacktrackingSolver {
    fn solve(&mut self, board: &Board) -> SolveResult {
        let start = Instant::now();
        self.reset();
        self.state = PropagationState::from_board(board);
        let mut work = board.clone();

        if self.use_constraint_prop && !self.state.propagate(&mut work) {
            return SolveResult {
                solved: false,
                solution: None,
                iterations: self.iterations,
                backtracks: self.backtracks,
                time_ms: elapsed_ms(start),
                algorithm: self.name().to_string(),
                error_message: Some(
                    "Puzzle is unsolvable (constraint propagation failed)".to_string(),
                ),
                has_unique_solution: false,
                solution_count: 0,
            };
        }

        let solved = self.search(&mut work);
        debug!(
            iterations = self.iterations,
            backtracks = self.backtracks,
            solved,
            "backtracking search finished"
        );

        SolveResult {
            solved,
            solution: solved.then_some(work),
            iterations: self.iterations,
            backtracks: self.backtracks,
            time_ms: elapsed_ms(start),
            algorithm: self.name().to_string(),
            error_message: (!solved).then(|| "No solution found".to_string()),
            has_unique_solution: false,
            solution_count: 0,
        }
    }

    fn find_all_solutions(&mut self, board: &Board, max_solutions: usize) -> Vec<Board> {
        self.reset();
        self.state = PropagationState::from_board(board);
        let mut work = board.clone();
        let mut solutions = Vec::new();

        if self.use_constraint_prop && !self.state.propagate(&mut work) {
            return solutions;
        }

        self.search_all(&mut work, &mut solutions, max_solutions);
        solutions
    }

    fn name(&self) -> &'static str {
        "Backtracking"
    }

    fn reset(&mut self) {
        self.iterations = 0;
        self.backtracks = 0;
        self.state = PropagationState::default();
    }
}
