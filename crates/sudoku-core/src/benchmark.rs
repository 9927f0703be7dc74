//! Benchmark harness: warm-up and timed runs, summary statistics, and
//! multi-threaded throughput measurement.
//!
//! Single-threaded runs reuse one solver and aggregate its self-reported
//! per-solve timings. Multi-threaded runs replicate the same solve across
//! independent workers (each owning its own solver) against one shared
//! read-only board, and anchor the speedup figure to a fixed-size baseline
//! measurement so results stay comparable across configurations.

use std::fmt::Write as _;
use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::board::Board;
use crate::solver::{create_solver, elapsed_ms, SolveResult, Solver, SolverAlgorithm};

/// Baseline measurement shape, independent of the configured run count so
/// speedup comparisons across configurations stay stable.
const BASELINE_WARMUP: usize = 10;
const BASELINE_RUNS: usize = 100;

#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Timed solves per run (and per worker in multi-threaded mode).
    pub runs: usize,
    /// Untimed solves before measuring (single-threaded mode only).
    pub warmup_runs: usize,
    /// Parallel workers for multi-threaded mode.
    pub num_workers: usize,
    /// Print each run as it completes.
    pub verbose: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            warmup_runs: 2,
            num_workers: 1,
            verbose: false,
        }
    }
}

/// Summary of repeated solves with one solver.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub algorithm: String,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub avg_time_ms: f64,
    pub std_dev_ms: f64,
    pub total_iterations: u64,
    pub total_backtracks: u64,
    pub runs: usize,
    pub all_solved: bool,
    /// Last solve of the batch, kept for solution access.
    pub last_result: Option<SolveResult>,
}

/// Summary of a multi-threaded benchmark.
#[derive(Debug, Clone)]
pub struct MultithreadResult {
    pub algorithm: String,
    pub num_workers: usize,
    pub runs_per_worker: usize,
    pub total_runs: usize,
    pub all_solved: bool,
    /// Real elapsed time bracketing worker launch and join.
    pub wall_time_ms: f64,
    /// Sum of per-worker solve time (avg * runs per worker).
    pub total_cpu_time_ms: f64,
    /// Solves per second against the wall clock.
    pub throughput: f64,
    pub worker_results: Vec<BenchmarkResult>,
    pub avg_time_per_solve_ms: f64,
    /// Baseline single-solve time scaled to the total work, over wall time.
    pub speedup: f64,
    /// Speedup per worker; 1.0 is ideal scaling.
    pub efficiency: f64,
}

pub struct Benchmark {
    config: BenchmarkConfig,
}

impl Default for Benchmark {
    fn default() -> Self {
        Self::new()
    }
}

impl Benchmark {
    pub fn new() -> Self {
        Self {
            config: BenchmarkConfig::default(),
        }
    }

    pub fn with_config(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BenchmarkConfig) {
        self.config = config;
    }

    /// Logical CPU count, for worker auto-detection.
    pub fn hardware_concurrency() -> usize {
        thread::available_parallelism().map_or(1, usize::from)
    }

    // ==================== Single-threaded ====================

    /// Warm up, then time `runs` solves of the same puzzle.
    pub fn run(&self, puzzle: &Board, solver: &mut dyn Solver) -> BenchmarkResult {
        for _ in 0..self.config.warmup_runs {
            solver.reset();
            solver.solve(puzzle);
        }
        self.timed_runs(puzzle, solver, self.config.verbose)
    }

    /// The timed portion shared by `run` and the worker tasks.
    fn timed_runs(
        &self,
        puzzle: &Board,
        solver: &mut dyn Solver,
        verbose: bool,
    ) -> BenchmarkResult {
        let mut times = Vec::with_capacity(self.config.runs);
        let mut total_iterations = 0u64;
        let mut total_backtracks = 0u64;
        let mut all_solved = true;
        let mut last_result = None;

        for i in 0..self.config.runs {
            solver.reset();
            let result = solver.solve(puzzle);

            times.push(result.time_ms);
            total_iterations += result.iterations;
            total_backtracks += result.backtracks;
            if !result.solved {
                all_solved = false;
            }
            if verbose {
                println!(
                    "  Run {}: {:.3} ms, {} iterations, {} backtracks{}",
                    i + 1,
                    result.time_ms,
                    result.iterations,
                    result.backtracks,
                    if result.solved { "" } else { " [FAILED]" }
                );
            }
            last_result = Some(result);
        }

        let avg_time_ms = Self::mean(&times);
        BenchmarkResult {
            algorithm: solver.name().to_string(),
            min_time_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
            max_time_ms: times.iter().copied().fold(0.0, f64::max),
            avg_time_ms,
            std_dev_ms: Self::std_dev(&times, avg_time_ms),
            total_iterations,
            total_backtracks,
            runs: self.config.runs,
            all_solved,
            last_result,
        }
    }

    /// Benchmark each algorithm in turn, preserving the given order.
    pub fn compare(
        &self,
        puzzle: &Board,
        algorithms: &[SolverAlgorithm],
    ) -> Vec<(SolverAlgorithm, BenchmarkResult)> {
        algorithms
            .iter()
            .map(|&algorithm| {
                let mut solver = create_solver(algorithm);
                (algorithm, self.run(puzzle, solver.as_mut()))
            })
            .collect()
    }

    // ==================== Multi-threaded ====================

    /// One worker: a fresh solver running the configured number of timed
    /// solves on the shared board.
    fn worker_task(&self, puzzle: &Board, algorithm: SolverAlgorithm, worker: usize) -> BenchmarkResult {
        let mut solver = create_solver(algorithm);
        let result = self.timed_runs(puzzle, solver.as_mut(), false);
        debug!(
            worker,
            avg_time_ms = result.avg_time_ms,
            all_solved = result.all_solved,
            "worker finished"
        );
        result
    }

    /// Replicate the same solve across `num_workers` independent workers
    /// and measure aggregate throughput against a fixed single-threaded
    /// baseline.
    pub fn run_multithreaded(
        &self,
        puzzle: &Board,
        algorithm: SolverAlgorithm,
    ) -> MultithreadResult {
        let num_workers = self.config.num_workers.max(1);
        let total_runs = num_workers * self.config.runs;

        // Baseline: average single-solve time from a fixed-size measurement,
        // independent of config.runs.
        let single_solve_time = {
            let mut solver = create_solver(algorithm);
            for _ in 0..BASELINE_WARMUP {
                solver.reset();
                solver.solve(puzzle);
            }
            let start = Instant::now();
            for _ in 0..BASELINE_RUNS {
                solver.reset();
                solver.solve(puzzle);
            }
            elapsed_ms(start) / BASELINE_RUNS as f64
        };
        debug!(single_solve_time, "baseline measured");

        let wall_start = Instant::now();
        let worker_results: Vec<BenchmarkResult> = thread::scope(|scope| {
            let handles: Vec<_> = (0..num_workers)
                .map(|worker| scope.spawn(move || self.worker_task(puzzle, algorithm, worker)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("benchmark worker panicked"))
                .collect()
        });
        let wall_time_ms = elapsed_ms(wall_start);

        let all_solved = worker_results.iter().all(|r| r.all_solved);
        let total_cpu_time_ms: f64 = worker_results
            .iter()
            .map(|r| r.avg_time_ms * r.runs as f64)
            .sum();

        let throughput = total_runs as f64 / wall_time_ms * 1000.0;
        // Speedup compares against one thread doing the same total work.
        let speedup = single_solve_time * total_runs as f64 / wall_time_ms;

        MultithreadResult {
            algorithm: algorithm.to_string(),
            num_workers,
            runs_per_worker: self.config.runs,
            total_runs,
            all_solved,
            wall_time_ms,
            total_cpu_time_ms,
            throughput,
            worker_results,
            avg_time_per_solve_ms: total_cpu_time_ms / total_runs as f64,
            speedup,
            efficiency: speedup / num_workers as f64,
        }
    }

    /// Multi-threaded benchmark per algorithm, preserving the given order.
    pub fn compare_multithreaded(
        &self,
        puzzle: &Board,
        algorithms: &[SolverAlgorithm],
    ) -> Vec<(SolverAlgorithm, MultithreadResult)> {
        algorithms
            .iter()
            .map(|&algorithm| (algorithm, self.run_multithreaded(puzzle, algorithm)))
            .collect()
    }

    // ==================== Statistics ====================

    fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Sample standard deviation (Bessel-corrected); 0 below two samples.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        (sum_sq / (values.len() - 1) as f64).sqrt()
    }

    // ==================== Reports ====================

    pub fn generate_report(&self, result: &BenchmarkResult) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Benchmark Report ===");
        let _ = writeln!(out, "Algorithm: {}", result.algorithm);
        let _ = writeln!(out, "Runs: {}", result.runs);
        let _ = writeln!(
            out,
            "All Solved: {}\n",
            if result.all_solved { "Yes" } else { "No" }
        );

        let _ = writeln!(out, "Timing (ms):");
        let _ = writeln!(out, "  Min:     {:>12.6}", result.min_time_ms);
        let _ = writeln!(out, "  Max:     {:>12.6}", result.max_time_ms);
        let _ = writeln!(out, "  Average: {:>12.6}", result.avg_time_ms);
        let _ = writeln!(out, "  Std Dev: {:>12.6}\n", result.std_dev_ms);

        let runs = result.runs.max(1) as u64;
        let _ = writeln!(out, "Statistics:");
        let _ = writeln!(out, "  Total Iterations: {}", result.total_iterations);
        let _ = writeln!(out, "  Total Backtracks: {}", result.total_backtracks);
        let _ = writeln!(out, "  Avg Iterations:   {}", result.total_iterations / runs);
        let _ = writeln!(out, "  Avg Backtracks:   {}", result.total_backtracks / runs);
        out
    }

    pub fn generate_comparison_report(
        &self,
        results: &[(SolverAlgorithm, BenchmarkResult)],
    ) -> String {
        let name_width = results
            .iter()
            .map(|(_, r)| r.algorithm.len())
            .chain(std::iter::once("Algorithm".len()))
            .max()
            .unwrap_or(0)
            + 2;
        let col_width = 12;
        let solved_width = 8;

        let mut out = String::new();
        let _ = writeln!(out, "=== Algorithm Comparison ===\n");
        let _ = writeln!(
            out,
            "{:<name_width$}{:>col_width$}{:>col_width$}{:>col_width$}{:>col_width$}{:>solved_width$}",
            "Algorithm", "Min (ms)", "Avg (ms)", "Max (ms)", "Std Dev", "Solved"
        );
        let _ = writeln!(
            out,
            "{}",
            "-".repeat(name_width + col_width * 4 + solved_width + 2)
        );

        let best_avg = results
            .iter()
            .map(|(_, r)| r.avg_time_ms)
            .fold(f64::INFINITY, f64::min);

        for (_, result) in results {
            let best = result.avg_time_ms == best_avg;
            let _ = writeln!(
                out,
                "{:<name_width$}{:>col_width$.6}{:>col_width$.6}{:>col_width$.6}{:>col_width$.6}{:>solved_width$}{}",
                result.algorithm,
                result.min_time_ms,
                result.avg_time_ms,
                result.max_time_ms,
                result.std_dev_ms,
                if result.all_solved { "Yes" } else { "No" },
                if best { " *" } else { "" }
            );
        }

        let _ = writeln!(out, "\n* = Best average time");
        out
    }

    pub fn generate_multithread_report(&self, result: &MultithreadResult) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Multi-threaded Benchmark Report ===");
        let _ = writeln!(out, "Algorithm: {}", result.algorithm);
        let _ = writeln!(out, "Workers: {}", result.num_workers);
        let _ = writeln!(out, "Runs per worker: {}", result.runs_per_worker);
        let _ = writeln!(out, "Total runs: {}", result.total_runs);
        let _ = writeln!(
            out,
            "All Solved: {}\n",
            if result.all_solved { "Yes" } else { "No" }
        );

        let _ = writeln!(out, "Performance:");
        let _ = writeln!(out, "  Wall time:      {:>12.3} ms", result.wall_time_ms);
        let _ = writeln!(out, "  Total CPU time: {:>12.3} ms", result.total_cpu_time_ms);
        let _ = writeln!(out, "  Throughput:     {:>12.3} solves/sec", result.throughput);
        let _ = writeln!(out, "  Speedup:        {:>12.3}x", result.speedup);
        let _ = writeln!(out, "  Efficiency:     {:>12.3}%\n", result.efficiency * 100.0);

        let _ = writeln!(out, "Per-worker statistics:");
        let _ = writeln!(
            out,
            "{:<10}{:>12}{:>12}{:>12}",
            "Worker", "Avg (ms)", "Min (ms)", "Max (ms)"
        );
        let _ = writeln!(out, "{}", "-".repeat(46));
        for (i, worker) in result.worker_results.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<10}{:>12.3}{:>12.3}{:>12.3}",
                format!("W{i}"),
                worker.avg_time_ms,
                worker.min_time_ms,
                worker.max_time_ms
            );
        }
        out
    }

    pub fn generate_multithread_comparison_report(
        &self,
        results: &[(SolverAlgorithm, MultithreadResult)],
    ) -> String {
        let name_width = results
            .iter()
            .map(|(_, r)| r.algorithm.len())
            .chain(std::iter::once("Algorithm".len()))
            .max()
            .unwrap_or(0)
            + 2;
        let col_width = 14;

        let mut out = String::new();
        let _ = writeln!(out, "=== Multi-threaded Algorithm Comparison ===");
        let _ = writeln!(
            out,
            "Workers: {} | Runs per worker: {}\n",
            self.config.num_workers, self.config.runs
        );
        let _ = writeln!(
            out,
            "{:<name_width$}{:>col_width$}{:>col_width$}{:>col_width$}{:>col_width$}",
            "Algorithm", "Wall (ms)", "Throughput", "Speedup", "Efficiency"
        );
        let _ = writeln!(out, "{}", "-".repeat(name_width + col_width * 4));

        let best_throughput = results
            .iter()
            .map(|(_, r)| r.throughput)
            .fold(0.0, f64::max);

        for (_, result) in results {
            let best = result.throughput == best_throughput;
            let _ = writeln!(
                out,
                "{:<name_width$}{:>col_width$.2}{:>tp_width$.2}/s{:>sp_width$.2}x{:>ef_width$.2}%{}",
                result.algorithm,
                result.wall_time_ms,
                result.throughput,
                result.speedup,
                result.efficiency * 100.0,
                if best { " *" } else { "" },
                tp_width = col_width - 2,
                sp_width = col_width - 1,
                ef_width = col_width - 1,
            );
        }

        let _ = writeln!(out, "\n* = Best throughput");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    fn quick_4x4() -> Board {
        Board::from_string("0234341221434320").unwrap()
    }

    #[test]
    fn test_mean_and_std_dev() {
        assert_eq!(Benchmark::mean(&[]), 0.0);
        assert_eq!(Benchmark::mean(&[2.0, 4.0]), 3.0);
        // Sample std dev of 1..4 around 2.5 is sqrt(5/3).
        let values = [1.0, 2.0, 3.0, 4.0];
        let sd = Benchmark::std_dev(&values, Benchmark::mean(&values));
        assert!((sd - (5.0f64 / 3.0).sqrt()).abs() < 1e-9);
        // Below two samples the estimator is defined as zero.
        assert_eq!(Benchmark::std_dev(&[1.0], 1.0), 0.0);
    }

    #[test]
    fn test_single_threaded_run() {
        let board = Board::from_string(CLASSIC).unwrap();
        let bench = Benchmark::with_config(BenchmarkConfig {
            runs: 3,
            warmup_runs: 1,
            num_workers: 1,
            verbose: false,
        });
        let mut solver = create_solver(SolverAlgorithm::DancingLinks);
        let result = bench.run(&board, solver.as_mut());

        assert_eq!(result.runs, 3);
        assert!(result.all_solved);
        assert!(result.min_time_ms <= result.avg_time_ms);
        assert!(result.avg_time_ms <= result.max_time_ms);
        assert!(result.std_dev_ms >= 0.0);
        assert!(result.total_iterations >= 3);
        assert!(result.last_result.as_ref().unwrap().solved);
    }

    #[test]
    fn test_compare_preserves_order() {
        let board = quick_4x4();
        let bench = Benchmark::with_config(BenchmarkConfig {
            runs: 2,
            warmup_runs: 0,
            ..BenchmarkConfig::default()
        });
        let results = bench.compare(
            &board,
            &[SolverAlgorithm::DancingLinks, SolverAlgorithm::Backtracking],
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, SolverAlgorithm::DancingLinks);
        assert_eq!(results[1].0, SolverAlgorithm::Backtracking);
        assert!(results.iter().all(|(_, r)| r.all_solved));
    }

    #[test]
    fn test_multithreaded_totals_and_laws() {
        let board = quick_4x4();
        let bench = Benchmark::with_config(BenchmarkConfig {
            runs: 10,
            warmup_runs: 0,
            num_workers: 4,
            verbose: false,
        });
        let result = bench.run_multithreaded(&board, SolverAlgorithm::DancingLinks);

        assert_eq!(result.total_runs, 40);
        assert_eq!(result.num_workers, 4);
        assert_eq!(result.runs_per_worker, 10);
        assert_eq!(result.worker_results.len(), 4);
        assert!(result.all_solved);
        assert!(result.wall_time_ms > 0.0);
        assert!(result.throughput > 0.0);
        assert!(result.speedup > 0.0);

        // throughput = total_runs / wall * 1000
        let expected = result.total_runs as f64 / result.wall_time_ms * 1000.0;
        assert!((result.throughput - expected).abs() / expected < 1e-9);
        // efficiency = speedup / workers
        assert!((result.efficiency - result.speedup / 4.0).abs() < 1e-12);
        // avg per solve is cpu time spread over the total work
        let expected_avg = result.total_cpu_time_ms / result.total_runs as f64;
        assert!((result.avg_time_per_solve_ms - expected_avg).abs() < 1e-12);
    }

    #[test]
    fn test_report_contents() {
        let board = quick_4x4();
        let bench = Benchmark::with_config(BenchmarkConfig {
            runs: 2,
            warmup_runs: 0,
            ..BenchmarkConfig::default()
        });
        let results = bench.compare(
            &board,
            &[SolverAlgorithm::DancingLinks, SolverAlgorithm::Backtracking],
        );
        let report = bench.generate_comparison_report(&results);
        assert!(report.contains("Dancing Links (DLX)"));
        assert!(report.contains("Backtracking"));
        assert!(report.contains("* = Best average time"));

        let single = bench.generate_report(&results[0].1);
        assert!(single.contains("Runs: 2"));
        assert!(single.contains("All Solved: Yes"));
    }

    #[test]
    fn test_hardware_concurrency_positive() {
        assert!(Benchmark::hardware_concurrency() >= 1);
    }
}
