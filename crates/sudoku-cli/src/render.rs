//! Console rendering: boards, solve results, and colored status lines.

use crossterm::style::Stylize;
use sudoku_core::{Board, SolveResult};

pub fn print_header() {
    println!(
        "{}",
        format!("Sudoku Solver v{}", env!("CARGO_PKG_VERSION"))
            .cyan()
            .bold()
    );
    println!("Dancing Links (DLX) & constraint-propagating backtracking\n");
}

pub fn print_board(title: &str, board: &Board) {
    println!("{}", title.yellow());
    print!("{board}");
}

pub fn print_puzzle_stats(board: &Board) {
    println!("Size: {}x{}", board.size(), board.size());
    println!("Empty cells: {}", board.count_empty());
    println!("Fill ratio: {:.1}%\n", board.fill_ratio() * 100.0);
}

pub fn print_result(result: &SolveResult) {
    println!("\n{}", "=== Solution Result ===".bold());

    if result.solved {
        println!("Status: {}", "SOLVED".green());
    } else {
        println!("Status: {}", "FAILED".red());
        if let Some(error) = &result.error_message {
            println!("Error: {error}");
        }
    }

    println!("Algorithm: {}", result.algorithm);
    if result.time_ms < 1.0 {
        println!(
            "Time: {:.6} ms ({:.3} us)",
            result.time_ms,
            result.time_ms * 1000.0
        );
    } else {
        println!("Time: {:.6} ms", result.time_ms);
    }
    println!("Iterations: {}", result.iterations);
    println!("Backtracks: {}", result.backtracks);
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", "Error:".red());
}

pub fn print_note(message: &str) {
    println!("{}", message.blue());
}
