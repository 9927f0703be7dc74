//! Solution output as JSON.
//!
//! The document echoes the original board, the solved board when one was
//! found, and the solver metadata (algorithm, timing, counters).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use sudoku_core::{Board, Cell, SolveResult};

/// A board as a JSON object: dimensions, 2-D grid, and a string rendering
/// for easy viewing.
pub fn board_to_json(board: &Board) -> Value {
    let n = board.size();
    let dim = board.dimension();

    let grid: Vec<Vec<u64>> = (0..n)
        .map(|row| (0..n).map(|col| board.get(row, col) as u64).collect())
        .collect();

    let grid_string: Vec<String> = (0..n)
        .map(|row| (0..n).map(|col| cell_char(board.get(row, col))).collect())
        .collect();

    json!({
        "size": dim.size,
        "box_rows": dim.box_rows,
        "box_cols": dim.box_cols,
        "grid": grid,
        "grid_string": grid_string,
    })
}

/// The full solve document: original puzzle, metadata, and solution.
pub fn solution_document(original: &Board, result: &SolveResult) -> Value {
    let mut doc = json!({
        "original": board_to_json(original),
        "solved": result.solved,
        "algorithm": result.algorithm,
        "time_ms": result.time_ms,
        "iterations": result.iterations,
        "backtracks": result.backtracks,
    });

    if let Some(solution) = &result.solution {
        doc["solution"] = board_to_json(solution);
    }
    if let Some(error) = &result.error_message {
        doc["error"] = json!(error);
    }
    doc
}

pub fn save_solution(original: &Board, result: &SolveResult, path: &Path) -> Result<()> {
    let doc = solution_document(original, result);
    let text = serde_json::to_string_pretty(&doc).context("failed to serialize solution")?;
    fs::write(path, text).with_context(|| format!("failed to create file: {}", path.display()))
}

fn cell_char(value: Cell) -> char {
    match value {
        0 => '.',
        1..=9 => (b'0' + value) as char,
        _ => (b'A' + value - 10) as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudoku_core::{create_solver, SolverAlgorithm};

    #[test]
    fn test_board_roundtrips_through_json() {
        let board = Board::from_string("1.3.341221434.2.").unwrap();
        let doc = board_to_json(&board);
        assert_eq!(doc["size"], 4);
        assert_eq!(doc["grid"][0][0], 1);
        assert_eq!(doc["grid_string"][0], "1.3.");

        let reparsed = crate::input::board_from_json(&doc).unwrap();
        assert_eq!(reparsed, board);
    }

    #[test]
    fn test_solution_document_fields() {
        let board = Board::from_string(
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
        )
        .unwrap();
        let mut solver = create_solver(SolverAlgorithm::DancingLinks);
        let result = solver.solve(&board);
        let doc = solution_document(&board, &result);

        assert_eq!(doc["solved"], true);
        assert_eq!(doc["algorithm"], "Dancing Links (DLX)");
        assert!(doc["time_ms"].as_f64().unwrap() >= 0.0);
        assert_eq!(doc["solution"]["grid_string"][0], "534678912");
        assert!(doc.get("error").is_none());
    }

    #[test]
    fn test_letters_in_grid_string() {
        assert_eq!(cell_char(0), '.');
        assert_eq!(cell_char(9), '9');
        assert_eq!(cell_char(10), 'A');
        assert_eq!(cell_char(25), 'P');
    }
}
