//! Command-line front end: load a puzzle (JSON file, puzzle string, or a
//! built-in test board), solve or benchmark it, and emit results to the
//! console and optionally to a JSON file.
//!
//! Exit code 0 means solved; 1 means invalid input or no solution.

mod input;
mod output;
mod puzzles;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use sudoku_core::{
    create_solver, Benchmark, BenchmarkConfig, Board, SolverAlgorithm,
};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    /// Dancing Links (Algorithm X)
    Dlx,
    /// Backtracking with constraint propagation
    Backtrack,
    /// Benchmark both algorithms against each other
    Compare,
}

#[derive(Debug, Parser)]
#[command(name = "sudoku", version, about = "High-performance Sudoku solver")]
struct Args {
    /// Input file (JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Puzzle as a string (use . or 0 for empty)
    #[arg(short, long)]
    puzzle: Option<String>,

    /// Use a built-in test puzzle (9, 16, or 25)
    #[arg(short, long)]
    test: Option<usize>,

    /// Solving algorithm
    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::Dlx)]
    algorithm: AlgorithmArg,

    /// Run benchmark with N iterations
    #[arg(short, long, default_value_t = 0)]
    benchmark: usize,

    /// Number of parallel workers for benchmark (0 = auto)
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Output solution to JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Check if the solution is unique
    #[arg(short, long)]
    unique: bool,

    /// Show JSON input format help
    #[arg(long)]
    json_help: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(error) => {
            render::print_error(&format!("{error:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    if args.json_help {
        print!("{}", input::FORMAT_HELP);
        return Ok(ExitCode::SUCCESS);
    }

    if !args.quiet {
        render::print_header();
    }

    let board = load_board(args)?;

    if !args.quiet {
        render::print_board("Input Puzzle:", &board);
        render::print_puzzle_stats(&board);
    }

    if !board.is_valid() {
        render::print_error("Input puzzle is invalid!");
        return Ok(ExitCode::FAILURE);
    }

    let workers = if args.workers == 0 {
        Benchmark::hardware_concurrency()
    } else {
        args.workers
    };

    if args.algorithm == AlgorithmArg::Compare {
        run_comparison(args, &board, workers);
        return Ok(ExitCode::SUCCESS);
    }

    let algorithm = match args.algorithm {
        AlgorithmArg::Backtrack => SolverAlgorithm::Backtracking,
        _ => SolverAlgorithm::DancingLinks,
    };

    if args.benchmark > 0 {
        run_benchmark(args, &board, algorithm, workers);
        return Ok(ExitCode::SUCCESS);
    }

    solve_and_report(args, &board, algorithm)
}

fn load_board(args: &Args) -> Result<Board> {
    if let Some(path) = &args.input {
        if is_image_file(path) {
            bail!(
                "image input requires OCR support, which is not built in; \
                 supply the puzzle as JSON instead"
            );
        }
        return input::load_from_file(path);
    }
    if let Some(puzzle) = &args.puzzle {
        return input::load_from_puzzle_string(puzzle);
    }
    if let Some(size) = args.test {
        if !args.quiet {
            println!(
                "Using built-in test puzzle: {}\n",
                puzzles::description(size)
            );
        }
        return puzzles::by_size(size);
    }
    // Default: the built-in 9x9.
    puzzles::by_size(9)
}

fn is_image_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref(),
        Some("png" | "jpg" | "jpeg" | "bmp" | "tiff" | "tif")
    )
}

fn run_comparison(args: &Args, board: &Board, workers: usize) {
    let config = BenchmarkConfig {
        runs: if args.benchmark > 0 { args.benchmark } else { 10 },
        warmup_runs: 2,
        num_workers: workers,
        verbose: args.verbose,
    };
    let bench = Benchmark::with_config(config);
    let algorithms = [SolverAlgorithm::DancingLinks, SolverAlgorithm::Backtracking];

    if workers > 1 {
        if !args.quiet {
            render::print_note(&format!(
                "Comparing algorithms (multi-threaded: {workers} workers)...\n"
            ));
        }
        let results = bench.compare_multithreaded(board, &algorithms);
        for (_, result) in &results {
            let solution = result
                .worker_results
                .first()
                .and_then(|w| w.last_result.as_ref())
                .and_then(|r| r.solution.as_ref());
            if let Some(solution) = solution {
                render::print_board(&format!("Solution: {}", result.algorithm), solution);
                println!();
            }
        }
        print!("{}", bench.generate_multithread_comparison_report(&results));
    } else {
        if !args.quiet {
            render::print_note("Comparing algorithms...\n");
        }
        let results = bench.compare(board, &algorithms);
        for (_, result) in &results {
            if let Some(solution) = result.last_result.as_ref().and_then(|r| r.solution.as_ref())
            {
                render::print_board(&format!("Solution: {}", result.algorithm), solution);
                println!();
            }
        }
        print!("{}", bench.generate_comparison_report(&results));
    }
}

fn run_benchmark(args: &Args, board: &Board, algorithm: SolverAlgorithm, workers: usize) {
    let config = BenchmarkConfig {
        runs: args.benchmark,
        warmup_runs: (args.benchmark / 5).min(2),
        num_workers: workers,
        verbose: args.verbose,
    };
    let bench = Benchmark::with_config(config);

    if workers > 1 {
        if !args.quiet {
            render::print_note("Running multi-threaded benchmark...");
            println!("  Workers: {workers}");
            println!("  Runs per worker: {}", args.benchmark);
            println!("  Total runs: {}\n", workers * args.benchmark);
        }
        let result = bench.run_multithreaded(board, algorithm);
        print!("{}", bench.generate_multithread_report(&result));
    } else {
        if !args.quiet {
            render::print_note(&format!(
                "Running benchmark ({} iterations)...\n",
                args.benchmark
            ));
        }
        let mut solver = create_solver(algorithm);
        let result = bench.run(board, solver.as_mut());
        print!("{}", bench.generate_report(&result));
    }
}

fn solve_and_report(args: &Args, board: &Board, algorithm: SolverAlgorithm) -> Result<ExitCode> {
    let mut solver = create_solver(algorithm);

    if !args.quiet {
        println!("Solving with {}...", solver.name());
    }

    let mut result = solver.solve(board);

    if !args.quiet {
        render::print_result(&result);
    }

    if result.solved {
        if let Some(solution) = &result.solution {
            if args.quiet {
                print!("{}", solution.to_compact_string());
            } else {
                println!();
                render::print_board("Solution:", solution);
            }
        }

        if args.unique {
            println!("\nChecking uniqueness...");
            let count = solver.find_all_solutions(board, 2).len();
            result.solution_count = count;
            result.has_unique_solution = count == 1;
            if result.has_unique_solution {
                println!("{}", "Solution is UNIQUE".green());
            } else {
                println!("{}", "Multiple solutions exist".yellow());
            }
        }

        if let Some(path) = &args.output {
            output::save_solution(board, &result, path)?;
            println!("\nSolution saved to: {}", path.display());
        }
    }

    Ok(if result.solved {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
