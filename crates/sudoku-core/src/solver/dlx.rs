//! Dancing Links solver: Knuth's Algorithm X over the exact-cover
//! formulation of Sudoku.
//!
//! Every placement (row, col, value) becomes a matrix row covering four
//! constraint columns: the cell is filled, the row has the value, the
//! column has the value, the box has the value. The sparse matrix is a
//! toroidal four-way-linked structure; links are indices into a single
//! node arena owned by the solver, so cover/uncover are plain index
//! surgery with no reference counting. The arena is rebuilt per solve and
//! dropped wholesale on reset.

use std::time::Instant;

use tracing::debug;

use crate::board::{Board, Cell};
use crate::solver::{elapsed_ms, SolveResult, Solver};

/// Arena slot 0 is always the root of the column-header ring.
const ROOT: usize = 0;

/// No matrix row: the root and column headers carry this sentinel.
const NO_ROW: usize = usize::MAX;

#[derive(Debug, Clone)]
struct DlxNode {
    left: usize,
    right: usize,
    up: usize,
    down: usize,
    /// Header index of the column this node belongs to (self for headers).
    column: usize,
    /// Matrix row identifier; `NO_ROW` for headers.
    row_id: usize,
    /// Live node count; meaningful on column headers only.
    size: usize,
}

pub struct DlxSolver {
    size: usize,
    box_rows: usize,
    box_cols: usize,
    nodes: Vec<DlxNode>,
    /// Header arena index per constraint column.
    columns: Vec<usize>,
    /// Row ids of the partial solution, stack-ordered.
    solution_rows: Vec<usize>,
    iterations: u64,
    backtracks: u64,
}

impl DlxSolver {
    pub fn new() -> Self {
        Self {
            size: 0,
            box_rows: 0,
            box_cols: 0,
            nodes: Vec::new(),
            columns: Vec::new(),
            solution_rows: Vec::new(),
            iterations: 0,
            backtracks: 0,
        }
    }

    // ==================== Constraint column layout ====================
    //
    // 4 * N^2 columns: Cell, then Row, Column, Box blocks of N^2 each.

    #[inline]
    fn cell_constraint(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    #[inline]
    fn row_constraint(&self, row: usize, value: Cell) -> usize {
        self.size * self.size + row * self.size + (value as usize - 1)
    }

    #[inline]
    fn col_constraint(&self, col: usize, value: Cell) -> usize {
        2 * self.size * self.size + col * self.size + (value as usize - 1)
    }

    #[inline]
    fn box_constraint(&self, box_idx: usize, value: Cell) -> usize {
        3 * self.size * self.size + box_idx * self.size + (value as usize - 1)
    }

    /// Matrix row id for a placement.
    #[inline]
    fn row_id(&self, row: usize, col: usize, value: Cell) -> usize {
        row * self.size * self.size + col * self.size + (value as usize - 1)
    }

    /// Inverse of [`DlxSolver::row_id`].
    #[inline]
    fn decode_row_id(&self, row_id: usize) -> (usize, usize, Cell) {
        let value = (row_id % self.size) as Cell + 1;
        let rest = row_id / self.size;
        (rest / self.size, rest % self.size, value)
    }

    // ==================== Matrix construction ====================

    fn create_column_headers(&mut self, num_constraints: usize) {
        self.nodes.push(DlxNode {
            left: ROOT,
            right: ROOT,
            up: ROOT,
            down: ROOT,
            column: ROOT,
            row_id: NO_ROW,
            size: 0,
        });

        self.columns.reserve(num_constraints);
        let mut prev = ROOT;
        for _ in 0..num_constraints {
            let idx = self.nodes.len();
            self.nodes.push(DlxNode {
                left: prev,
                right: ROOT,
                up: idx,
                down: idx,
                column: idx,
                row_id: NO_ROW,
                size: 0,
            });
            self.nodes[prev].right = idx;
            self.nodes[ROOT].left = idx;
            self.columns.push(idx);
            prev = idx;
        }
    }

    /// Append one matrix row, linking a node into the tail of each listed
    /// constraint column and closing the row's horizontal ring.
    fn add_row(&mut self, row_id: usize, constraints: &[usize]) {
        let mut first = None;
        let mut prev = 0;

        for &constraint in constraints {
            let header = self.columns[constraint];
            let idx = self.nodes.len();
            let up = self.nodes[header].up;
            self.nodes.push(DlxNode {
                left: idx,
                right: idx,
                up,
                down: header,
                column: header,
                row_id,
                size: 0,
            });
            self.nodes[up].down = idx;
            self.nodes[header].up = idx;
            self.nodes[header].size += 1;

            match first {
                None => first = Some(idx),
                Some(first_idx) => {
                    self.nodes[idx].left = prev;
                    self.nodes[idx].right = first_idx;
                    self.nodes[prev].right = idx;
                    self.nodes[first_idx].left = idx;
                }
            }
            prev = idx;
        }
    }

    /// Build the exact-cover matrix for a board. Givens contribute exactly
    /// one row; open cells contribute one row per currently legal value.
    fn build_matrix(&mut self, board: &Board) {
        let dim = board.dimension();
        self.size = dim.size;
        self.box_rows = dim.box_rows;
        self.box_cols = dim.box_cols;

        let num_constraints = 4 * self.size * self.size;
        self.create_column_headers(num_constraints);

        for row in 0..self.size {
            for col in 0..self.size {
                let given = board.get(row, col);
                let box_idx = dim.box_index(row, col);

                let (start, end) = if given != 0 {
                    (given, given)
                } else {
                    (1, self.size as Cell)
                };

                for value in start..=end {
                    if given == 0 && !board.is_valid_placement(row, col, value) {
                        continue;
                    }
                    let constraints = [
                        self.cell_constraint(row, col),
                        self.row_constraint(row, value),
                        self.col_constraint(col, value),
                        self.box_constraint(box_idx, value),
                    ];
                    self.add_row(self.row_id(row, col, value), &constraints);
                }
            }
        }

        debug!(
            columns = num_constraints,
            nodes = self.nodes.len(),
            "dlx matrix built"
        );
    }

    // ==================== Cover / uncover ====================

    /// Unlink a column from the header ring and every matrix row that
    /// covers it from all other columns.
    fn cover(&mut self, header: usize) {
        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[right].left = left;
        self.nodes[left].right = right;

        let mut row = self.nodes[header].down;
        while row != header {
            let mut node = self.nodes[row].right;
            while node != row {
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[down].up = up;
                self.nodes[up].down = down;
                let column = self.nodes[node].column;
                self.nodes[column].size -= 1;
                node = self.nodes[node].right;
            }
            row = self.nodes[row].down;
        }
    }

    /// Exact inverse of [`DlxSolver::cover`]: walk bottom-to-top and
    /// right-to-left so every link is restored from intact neighbors.
    fn uncover(&mut self, header: usize) {
        let mut row = self.nodes[header].up;
        while row != header {
            let mut node = self.nodes[row].left;
            while node != row {
                let column = self.nodes[node].column;
                self.nodes[column].size += 1;
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[down].up = node;
                self.nodes[up].down = node;
                node = self.nodes[node].left;
            }
            row = self.nodes[row].up;
        }

        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[right].left = header;
        self.nodes[left].right = header;
    }

    /// Live column with the fewest nodes (the S-heuristic), first wins
    /// ties. None when the header ring is empty.
    fn select_column(&self) -> Option<usize> {
        let mut best = None;
        let mut min_size = usize::MAX;
        let mut header = self.nodes[ROOT].right;
        while header != ROOT {
            let size = self.nodes[header].size;
            if size < min_size {
                min_size = size;
                best = Some(header);
                if min_size <= 1 {
                    break;
                }
            }
            header = self.nodes[header].right;
        }
        best
    }

    // ==================== Algorithm X ====================

    fn search(&mut self) -> bool {
        self.iterations += 1;

        if self.nodes[ROOT].right == ROOT {
            return true;
        }

        let Some(column) = self.select_column() else {
            return false;
        };
        if self.nodes[column].size == 0 {
            return false;
        }

        self.cover(column);

        let mut row = self.nodes[column].down;
        while row != column {
            self.solution_rows.push(self.nodes[row].row_id);

            let mut node = self.nodes[row].right;
            while node != row {
                let other = self.nodes[node].column;
                self.cover(other);
                node = self.nodes[node].right;
            }

            if self.search() {
                return true;
            }

            self.backtracks += 1;
            self.solution_rows.pop();

            let mut node = self.nodes[row].left;
            while node != row {
                let other = self.nodes[node].column;
                self.uncover(other);
                node = self.nodes[node].left;
            }

            row = self.nodes[row].down;
        }

        self.uncover(column);
        false
    }

    /// Like [`DlxSolver::search`] but records every completed cover and
    /// keeps backtracking until `max` solutions are found, then unwinds
    /// cleanly.
    fn search_all(&mut self, solutions: &mut Vec<Vec<usize>>, max: usize) -> bool {
        self.iterations += 1;

        if self.nodes[ROOT].right == ROOT {
            solutions.push(self.solution_rows.clone());
            return solutions.len() >= max;
        }

        let Some(column) = self.select_column() else {
            return false;
        };
        if self.nodes[column].size == 0 {
            return false;
        }

        self.cover(column);

        let mut row = self.nodes[column].down;
        while row != column {
            self.solution_rows.push(self.nodes[row].row_id);

            let mut node = self.nodes[row].right;
            while node != row {
                let other = self.nodes[node].column;
                self.cover(other);
                node = self.nodes[node].right;
            }

            if self.search_all(solutions, max) {
                let mut node = self.nodes[row].left;
                while node != row {
                    let other = self.nodes[node].column;
                    self.uncover(other);
                    node = self.nodes[node].left;
                }
                self.solution_rows.pop();
                self.uncover(column);
                return true;
            }

            self.backtracks += 1;
            self.solution_rows.pop();

            let mut node = self.nodes[row].left;
            while node != row {
                let other = self.nodes[node].column;
                self.uncover(other);
                node = self.nodes[node].left;
            }

            row = self.nodes[row].down;
        }

        self.uncover(column);
        false
    }

    /// Decode a chosen row set back onto a copy of the original board.
    fn solution_to_board(&self, row_ids: &[usize], original: &Board) -> Board {
        let mut board = original.clone();
        for &row_id in row_ids {
            let (row, col, value) = self.decode_row_id(row_id);
            board.set_unchecked(row, col, value);
        }
        board
    }
}

impl Default for DlxSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for DlxSolver {
    fn solve(&mut self, board: &Board) -> SolveResult {
        let start = Instant::now();
        self.reset();
        self.build_matrix(board);

        let solved = self.search();
        debug!(
            iterations = self.iterations,
            backtracks = self.backtracks,
            solved,
            "dlx search finished"
        );

        SolveResult {
            solved,
            solution: solved.then(|| self.solution_to_board(&self.solution_rows, board)),
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
        self.build_matrix(board);

        let mut row_sets = Vec::new();
        self.search_all(&mut row_sets, max_solutions);

        row_sets
            .iter()
            .map(|rows| self.solution_to_board(rows, board))
            .collect()
    }

    fn name(&self) -> &'static str {
        "Dancing Links (DLX)"
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.columns.clear();
        self.solution_rows.clear();
        self.iterations = 0;
        self.backtracks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const CLASSIC_SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    #[test]
    fn test_row_id_roundtrip() {
        let mut solver = DlxSolver::new();
        for &n in &[4usize, 9, 16, 25] {
            solver.size = n;
            for row in [0, n / 2, n - 1] {
                for col in [0, n / 2, n - 1] {
                    for value in [1 as Cell, n as Cell] {
                        let id = solver.row_id(row, col, value);
                        assert_eq!(solver.decode_row_id(id), (row, col, value));
                    }
                }
            }
        }
    }

    #[test]
    fn test_constraint_layout_is_disjoint() {
        let mut solver = DlxSolver::new();
        solver.size = 9;
        assert_eq!(solver.cell_constraint(8, 8), 80);
        assert_eq!(solver.row_constraint(0, 1), 81);
        assert_eq!(solver.col_constraint(0, 1), 162);
        assert_eq!(solver.box_constraint(0, 1), 243);
        assert_eq!(solver.box_constraint(8, 9), 323);
    }

    #[test]
    fn test_solves_classic_to_known_solution() {
        let board = Board::from_string(CLASSIC).unwrap();
        let mut solver = DlxSolver::new();
        let result = solver.solve(&board);
        assert!(result.solved);
        assert_eq!(result.algorithm, "Dancing Links (DLX)");
        assert_eq!(
            result.solution.unwrap(),
            Board::from_string(CLASSIC_SOLUTION).unwrap()
        );
    }

    #[test]
    fn test_solution_preserves_givens() {
        let board = Board::from_string(CLASSIC).unwrap();
        let mut solver = DlxSolver::new();
        let solution = solver.solve(&board).solution.unwrap();
        for row in 0..9 {
            for col in 0..9 {
                let given = board.get(row, col);
                if given != 0 {
                    assert_eq!(solution.get(row, col), given);
                }
            }
        }
    }

    #[test]
    fn test_resolve_of_solved_board_is_idempotent() {
        // Every column has exactly one row, so the search never backtracks.
        let solved = Board::from_string(CLASSIC_SOLUTION).unwrap();
        let mut solver = DlxSolver::new();
        let result = solver.solve(&solved);
        assert!(result.solved);
        assert_eq!(result.solution.unwrap(), solved);
        assert_eq!(result.backtracks, 0);
    }

    #[test]
    fn test_unsolvable_cell_without_candidates() {
        // (0, 0) has no legal value, so its Cell column has no rows.
        let board = Board::from_string("0100200030004000").unwrap();
        let mut solver = DlxSolver::new();
        let result = solver.solve(&board);
        assert!(!result.solved);
        assert!(result.solution.is_none());
        assert!(result.error_message.is_some());
    }

    #[test]
    fn test_find_all_stops_at_cap() {
        let board = Board::empty(crate::BoardDimension::standard_4x4());
        let mut solver = DlxSolver::new();
        let solutions = solver.find_all_solutions(&board, 2);
        assert_eq!(solutions.len(), 2);
        for solution in &solutions {
            assert!(solution.is_solved());
        }
    }

    #[test]
    fn test_unique_solution_law() {
        let board = Board::from_string(
            "000000010400000000020000000000050407008000300001090000300400200050100000000806000",
        )
        .unwrap();
        let mut solver = DlxSolver::new();
        assert!(solver.has_unique_solution(&board));
        assert_eq!(solver.find_all_solutions(&board, 10).len(), 1);
    }

    #[test]
    fn test_twelve_by_twelve_rectangular_boxes() {
        // A 12x12 band-shifted solution with a few cells knocked out; DLX
        // must restore it (3x4 boxes exercise the non-square geometry).
        let mut grid: Vec<Vec<Cell>> = (0..12)
            .map(|r| {
                let shift = (r % 3) * 4 + r / 3;
                (0..12).map(|c| ((shift + c) % 12) as Cell + 1).collect()
            })
            .collect();
        let full = Board::from_grid(&grid).unwrap();
        assert!(full.is_solved());

        for &(r, c) in &[(0, 0), (5, 7), (11, 11), (6, 2)] {
            grid[r][c] = 0;
        }
        let board = Board::from_grid(&grid).unwrap();
        let mut solver = DlxSolver::new();
        let result = solver.solve(&board);
        assert!(result.solved);
        assert_eq!(result.solution.unwrap(), full);
    }

    #[test]
    fn test_reset_clears_matrix_state() {
        let board = Board::from_string(CLASSIC).unwrap();
        let mut solver = DlxSolver::new();
        solver.solve(&board);
        solver.reset();
        assert_eq!(solver.nodes.len(), 0);
        assert_eq!(solver.iterations, 0);
        // And the solver is reusable after a reset.
        assert!(solver.solve(&board).solved);
    }
}
