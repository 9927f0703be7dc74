//! Constraint propagation state: per-cell candidates plus row/column/box
//! used-value bitsets, maintained incrementally as values are placed.
//!
//! Propagation applies naked singles (a cell with one candidate) and hidden
//! singles (a value with one possible cell in a unit) to a fixed point, and
//! reports a contradiction as soon as any empty cell runs out of candidates.

use crate::board::{Board, BoardDimension, Cell};
use crate::candidates::CandidateSet;

#[derive(Debug, Clone, Default)]
pub(crate) struct PropagationState {
    size: usize,
    box_rows: usize,
    box_cols: usize,
    /// Per-cell candidates, row-major. Filled cells hold the empty set.
    candidates: Vec<CandidateSet>,
    row_used: Vec<CandidateSet>,
    col_used: Vec<CandidateSet>,
    box_used: Vec<CandidateSet>,
}

impl PropagationState {
    /// Seed used-value sets from the givens, then derive each empty cell's
    /// candidates as the complement of its row/column/box union.
    pub fn from_board(board: &Board) -> Self {
        let dim = board.dimension();
        let n = dim.size;
        let mut state = Self {
            size: n,
            box_rows: dim.box_rows,
            box_cols: dim.box_cols,
            candidates: vec![CandidateSet::empty(); dim.cell_count()],
            row_used: vec![CandidateSet::empty(); n],
            col_used: vec![CandidateSet::empty(); n],
            box_used: vec![CandidateSet::empty(); dim.box_count()],
        };

        for row in 0..n {
            for col in 0..n {
                let value = board.get(row, col);
                if value != 0 {
                    let box_idx = state.box_index(row, col);
                    state.row_used[row].insert(value);
                    state.col_used[col].insert(value);
                    state.box_used[box_idx].insert(value);
                }
            }
        }

        let all = CandidateSet::all(n);
        for row in 0..n {
            for col in 0..n {
                if board.get(row, col) == 0 {
                    let used = state.row_used[row]
                        | state.col_used[col]
                        | state.box_used[state.box_index(row, col)];
                    let mut cands = CandidateSet::empty();
                    for value in all.iter() {
                        if !used.contains(value) {
                            cands.insert(value);
                        }
                    }
                    state.candidates[row * n + col] = cands;
                }
            }
        }

        state
    }

    #[inline]
    fn box_index(&self, row: usize, col: usize) -> usize {
        let dim = BoardDimension {
            size: self.size,
            box_rows: self.box_rows,
            box_cols: self.box_cols,
        };
        dim.box_index(row, col)
    }

    #[inline]
    pub fn candidate_bits(&self, row: usize, col: usize) -> CandidateSet {
        self.candidates[row * self.size + col]
    }

    #[inline]
    pub fn candidate_count(&self, row: usize, col: usize) -> u32 {
        self.candidates[row * self.size + col].len()
    }

    /// Make `value` final at (row, col): mark it used in the three units,
    /// clear the cell's own candidates, and strip it from every peer. The
    /// only primitive that updates derived state.
    pub fn assign(&mut self, row: usize, col: usize, value: Cell) {
        let n = self.size;
        let box_idx = self.box_index(row, col);
        self.row_used[row].insert(value);
        self.col_used[col].insert(value);
        self.box_used[box_idx].insert(value);

        self.candidates[row * n + col].clear();

        for c in 0..n {
            self.candidates[row * n + c].remove(value);
        }
        for r in 0..n {
            self.candidates[r * n + col].remove(value);
        }
        let start_row = (row / self.box_rows) * self.box_rows;
        let start_col = (col / self.box_cols) * self.box_cols;
        for i in 0..self.box_rows {
            for j in 0..self.box_cols {
                self.candidates[(start_row + i) * n + start_col + j].remove(value);
            }
        }
    }

    /// Run naked and hidden singles to a fixed point, writing placements
    /// through to `board`. Returns false on contradiction (an empty cell
    /// with no remaining candidates).
    pub fn propagate(&mut self, board: &mut Board) -> bool {
        let mut changed = true;
        while changed {
            changed = false;

            if self.place_naked_singles(board) {
                changed = true;
            }
            if self.place_hidden_singles(board) {
                changed = true;
            }

            for row in 0..self.size {
                for col in 0..self.size {
                    if board.get(row, col) == 0 && self.candidates[row * self.size + col].is_empty()
                    {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Place every cell whose candidate set is a singleton.
    fn place_naked_singles(&mut self, board: &mut Board) -> bool {
        let mut changed = false;
        for row in 0..self.size {
            for col in 0..self.size {
                if board.get(row, col) != 0 {
                    continue;
                }
                if let Some(value) = self.candidates[row * self.size + col].single() {
                    board.set_unchecked(row, col, value);
                    self.assign(row, col, value);
                    changed = true;
                }
            }
        }
        changed
    }

    /// For each unit and each unplaced value, place the value when exactly
    /// one cell of the unit can still hold it. Counts are taken from live
    /// state, so placements made mid-scan never act on stale information.
    fn place_hidden_singles(&mut self, board: &mut Board) -> bool {
        let n = self.size;
        let mut changed = false;

        // Rows
        for row in 0..n {
            for value in 1..=n as Cell {
                if self.row_used[row].contains(value) {
                    continue;
                }
                let mut count = 0;
                let mut last_col = 0;
                for col in 0..n {
                    if board.get(row, col) == 0 && self.candidates[row * n + col].contains(value) {
                        count += 1;
                        last_col = col;
                    }
                }
                if count == 1 {
                    board.set_unchecked(row, last_col, value);
                    self.assign(row, last_col, value);
                    changed = true;
                }
            }
        }

        // Columns
        for col in 0..n {
            for value in 1..=n as Cell {
                if self.col_used[col].contains(value) {
                    continue;
                }
                let mut count = 0;
                let mut last_row = 0;
                for row in 0..n {
                    if board.get(row, col) == 0 && self.candidates[row * n + col].contains(value) {
                        count += 1;
                        last_row = row;
                    }
                }
                if count == 1 {
                    board.set_unchecked(last_row, col, value);
                    self.assign(last_row, col, value);
                    changed = true;
                }
            }
        }

        // Boxes
        let boxes_per_band = n / self.box_cols;
        for box_idx in 0..self.box_used.len() {
            let start_row = (box_idx / boxes_per_band) * self.box_rows;
            let start_col = (box_idx % boxes_per_band) * self.box_cols;
            for value in 1..=n as Cell {
                if self.box_used[box_idx].contains(value) {
                    continue;
                }
                let mut count = 0;
                let mut last = (0, 0);
                for i in 0..self.box_rows {
                    for j in 0..self.box_cols {
                        let (row, col) = (start_row + i, start_col + j);
                        if board.get(row, col) == 0
                            && self.candidates[row * n + col].contains(value)
                        {
                            count += 1;
                            last = (row, col);
                        }
                    }
                }
                if count == 1 {
                    board.set_unchecked(last.0, last.1, value);
                    self.assign(last.0, last.1, value);
                    changed = true;
                }
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardDimension;

    fn board_from(grid: &[Vec<Cell>]) -> Board {
        Board::from_grid(grid).unwrap()
    }

    #[test]
    fn test_initial_candidates_match_board_queries() {
        let board = board_from(&[
            vec![1, 0, 0, 0],
            vec![0, 0, 0, 2],
            vec![0, 3, 0, 0],
            vec![0, 0, 4, 0],
        ]);
        let state = PropagationState::from_board(&board);
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(
                    state.candidate_bits(row, col),
                    board.candidate_bits(row, col),
                    "mismatch at ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn test_assign_strips_peers() {
        let board = Board::empty(BoardDimension::standard_9x9());
        let mut state = PropagationState::from_board(&board);
        state.assign(4, 4, 7);
        assert!(!state.candidate_bits(4, 0).contains(7)); // row peer
        assert!(!state.candidate_bits(0, 4).contains(7)); // column peer
        assert!(!state.candidate_bits(3, 3).contains(7)); // box peer
        assert!(state.candidate_bits(0, 0).contains(7)); // unrelated cell
        assert!(state.candidate_bits(4, 4).is_empty());
    }

    #[test]
    fn test_naked_single_placed() {
        // (0, 3) is the only open cell in its row.
        let mut board = board_from(&[
            vec![1, 2, 3, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        let mut state = PropagationState::from_board(&board);
        assert!(state.propagate(&mut board));
        assert_eq!(board.get(0, 3), 4);
    }

    #[test]
    fn test_contradiction_detected() {
        // (0, 0) sees 1 in its row and 2, 3, 4 in its column: no candidates
        // remain even though the board itself is duplicate-free.
        let mut board = board_from(&[
            vec![0, 1, 0, 0],
            vec![2, 0, 0, 0],
            vec![3, 0, 0, 0],
            vec![4, 0, 0, 0],
        ]);
        assert!(board.is_valid());
        let mut state = PropagationState::from_board(&board);
        assert!(!state.propagate(&mut board));
    }

    #[test]
    fn test_singles_solve_the_classic() {
        // The 530070000... puzzle is solvable by naked singles alone, so
        // propagation must finish it without any search.
        let mut board = Board::from_string(
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
        )
        .unwrap();
        let mut state = PropagationState::from_board(&board);
        assert!(state.propagate(&mut board));
        assert!(board.is_solved());
        // Placements must agree with the known unique solution.
        let solution = Board::from_string(
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
        )
        .unwrap();
        assert_eq!(board, solution);
    }

    #[test]
    fn test_hidden_singles_solve_the_seventeen_clue() {
        // This 17-clue minimal needs hidden singles, not just naked ones.
        let mut board = Board::from_string(
            "000000010400000000020000000000050407008000300001090000300400200050100000000806000",
        )
        .unwrap();
        let mut state = PropagationState::from_board(&board);
        assert!(state.propagate(&mut board));
        assert!(board.is_solved());
    }
}
