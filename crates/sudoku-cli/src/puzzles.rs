//! Built-in test puzzles for benchmarking: 9x9, 16x16, and 25x25.

use anyhow::{bail, Result};
use sudoku_core::{Board, BoardDimension, Cell};

/// Classic hard 9x9.
const PUZZLE_9X9: [[Cell; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// Hard 16x16 with 4x4 boxes.
const PUZZLE_16X16: [[Cell; 16]; 16] = [
    [0, 0, 0, 0, 0, 0, 0, 15, 0, 10, 0, 0, 0, 12, 1, 0],
    [0, 1, 10, 0, 0, 0, 0, 3, 0, 0, 16, 0, 0, 0, 0, 0],
    [3, 0, 0, 8, 12, 1, 0, 14, 0, 0, 0, 0, 0, 0, 0, 6],
    [0, 2, 0, 0, 0, 0, 0, 0, 14, 0, 0, 15, 0, 0, 0, 0],
    [0, 0, 0, 3, 15, 0, 0, 0, 8, 1, 0, 0, 5, 7, 0, 0],
    [4, 0, 0, 10, 1, 0, 0, 0, 11, 0, 0, 7, 15, 0, 0, 0],
    [0, 0, 8, 1, 7, 16, 0, 0, 0, 14, 0, 6, 12, 0, 0, 0],
    [0, 0, 0, 0, 14, 0, 13, 12, 0, 0, 0, 0, 0, 1, 0, 0],
    [0, 0, 11, 0, 0, 0, 0, 0, 6, 7, 0, 14, 0, 0, 0, 0],
    [0, 0, 0, 2, 3, 0, 11, 0, 0, 0, 10, 1, 14, 9, 0, 0],
    [0, 0, 0, 14, 6, 0, 0, 10, 0, 0, 0, 4, 11, 0, 0, 5],
    [0, 0, 3, 13, 0, 0, 4, 16, 0, 0, 0, 9, 6, 0, 0, 0],
    [0, 0, 0, 0, 11, 0, 0, 6, 0, 0, 0, 0, 0, 0, 2, 0],
    [10, 0, 0, 0, 0, 0, 0, 0, 15, 0, 1, 6, 16, 0, 0, 7],
    [0, 0, 0, 0, 0, 15, 0, 0, 2, 0, 0, 0, 0, 4, 12, 0],
    [0, 16, 15, 0, 0, 0, 3, 0, 7, 0, 0, 0, 0, 0, 0, 0],
];

/// Sparse 25x25 seed: one given per row in each 5-column stack, laid out
/// so rows, columns, and 5x5 boxes stay conflict-free while ~80% of the
/// board remains open. Heavy search load for benchmarks.
fn grid_25x25() -> Vec<Vec<Cell>> {
    let mut grid = vec![vec![0 as Cell; 25]; 25];
    for band in 0..5 {
        for row_in_band in 0..5 {
            for stack in 0..5 {
                let row = band * 5 + row_in_band;
                let col = row_in_band + stack * 5;
                let value = (6 * row_in_band + 5 * stack + band) % 25 + 1;
                grid[row][col] = value as Cell;
            }
        }
    }
    grid
}

/// A built-in puzzle by size. Supported sizes: 9, 16, 25.
pub fn by_size(size: usize) -> Result<Board> {
    let board = match size {
        9 => {
            let grid: Vec<Vec<Cell>> = PUZZLE_9X9.iter().map(|row| row.to_vec()).collect();
            Board::with_dimension(&grid, BoardDimension::standard_9x9())?
        }
        16 => {
            let grid: Vec<Vec<Cell>> = PUZZLE_16X16.iter().map(|row| row.to_vec()).collect();
            Board::with_dimension(&grid, BoardDimension::standard_16x16())?
        }
        25 => Board::with_dimension(&grid_25x25(), BoardDimension::standard_25x25())?,
        _ => bail!("unsupported test size: {size}. Supported: 9, 16, 25"),
    };
    Ok(board)
}

pub fn description(size: usize) -> &'static str {
    match size {
        9 => "9x9 Classic (3x3 boxes)",
        16 => "16x16 Extended (4x4 boxes)",
        25 => "25x25 Mega (5x5 boxes) - Heavy benchmark",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for size in [9, 16, 25] {
            let board = by_size(size).unwrap();
            assert_eq!(board.size(), size);
            assert!(board.is_valid(), "{size}x{size} built-in is inconsistent");
            assert!(board.has_empty_cell());
        }
        assert!(by_size(12).is_err());
    }

    #[test]
    fn test_25x25_seed_shape() {
        let board = by_size(25).unwrap();
        // One given per row and stack: 125 givens, 500 open cells.
        assert_eq!(board.count_empty(), 500);
        assert_eq!(board.get(0, 0), 1);
        assert_eq!(board.get(4, 4), 25);
        assert_eq!(board.get(24, 24), 24);
    }
}
