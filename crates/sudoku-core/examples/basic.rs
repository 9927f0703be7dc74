//! Basic example of using the solving engine

use sudoku_core::{create_solver, Benchmark, BenchmarkConfig, Board, SolverAlgorithm};

fn main() {
    // Parse a puzzle from a string
    let puzzle_string =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let board = Board::from_string(puzzle_string).expect("valid puzzle string");

    println!("Input puzzle:");
    println!("{}", board);
    println!("Empty cells: {}", board.count_empty());
    println!("Fill ratio: {:.1}%\n", board.fill_ratio() * 100.0);

    // Solve it with both engines
    for algorithm in [SolverAlgorithm::DancingLinks, SolverAlgorithm::Backtracking] {
        let mut solver = create_solver(algorithm);
        let result = solver.solve(&board);
        println!(
            "{}: solved={} in {:.3} ms ({} iterations, {} backtracks)",
            result.algorithm, result.solved, result.time_ms, result.iterations, result.backtracks
        );
    }

    // Check uniqueness
    let mut solver = create_solver(SolverAlgorithm::DancingLinks);
    println!("\nUnique solution: {}", solver.has_unique_solution(&board));

    // Run a small benchmark comparison
    let bench = Benchmark::with_config(BenchmarkConfig {
        runs: 20,
        warmup_runs: 2,
        ..BenchmarkConfig::default()
    });
    let results = bench.compare(
        &board,
        &[SolverAlgorithm::DancingLinks, SolverAlgorithm::Backtracking],
    );
    println!("\n{}", bench.generate_comparison_report(&results));
}
