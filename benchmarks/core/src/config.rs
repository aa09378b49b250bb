//! Benchmark configuration constants and utilities
//!
//! This module centralizes configuration values used throughout the benchmark suite
//! to avoid magic numbers and make the code more maintainable.

use std::env;

/// Default number of warmup runs before actual benchmarking
pub const DEFAULT_WARMUP_RUNS: usize = 3;

/// Default number of measured runs
pub const DEFAULT_MEASUREMENT_RUNS: usize = 5;

/// Standard chunk sizes (also used as the fork-join threshold)
pub const STANDARD_CHUNK_SIZES: &[usize] = &[10, 100, 1000];

/// Small chunk sizes for quick tests
pub const SMALL_CHUNK_SIZES: &[usize] = &[100];

/// Lines in the generated benchmark log
pub const DEFAULT_LOG_LINES: usize = 10_000;

/// Worker count for the fixed pool
pub const POOL_WORKERS: usize = 8;

/// In-flight cap for the capped map-reduce case
pub const MAP_CONCURRENCY_CAP: usize = 100;

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Get the number of warmup runs from environment or use default
pub fn get_warmup_runs() -> usize {
    env_usize("LOGSUM_BENCHMARK_WARMUP_RUNS").unwrap_or(DEFAULT_WARMUP_RUNS)
}

/// Get the number of measured runs from environment or use default
pub fn get_measurement_runs() -> usize {
    env_usize("LOGSUM_BENCHMARK_MEASUREMENT_RUNS")
        .filter(|&runs| runs > 0)
        .unwrap_or(DEFAULT_MEASUREMENT_RUNS)
}

/// Get chunk sizes from environment or use defaults
pub fn get_chunk_sizes(use_small: bool) -> Vec<usize> {
    if let Ok(sizes_str) = env::var("LOGSUM_BENCHMARK_CHUNK_SIZES") {
        sizes_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .filter(|&size| size > 0)
            .collect()
    } else if use_small {
        SMALL_CHUNK_SIZES.to_vec()
    } else {
        STANDARD_CHUNK_SIZES.to_vec()
    }
}

/// Get the generated log length from environment or use default
pub fn get_log_lines() -> usize {
    env_usize("LOGSUM_BENCHMARK_LINES").unwrap_or(DEFAULT_LOG_LINES)
}

/// Configuration for benchmark runs
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub warmup_runs: usize,
    pub measurement_runs: usize,
    pub chunk_sizes: Vec<usize>,
    pub log_lines: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            warmup_runs: get_warmup_runs(),
            measurement_runs: get_measurement_runs(),
            chunk_sizes: get_chunk_sizes(false),
            log_lines: get_log_lines(),
        }
    }
}

impl BenchmarkConfig {
    /// Create a configuration for quick tests
    pub fn quick() -> Self {
        Self {
            warmup_runs: 1,
            measurement_runs: 2,
            chunk_sizes: SMALL_CHUNK_SIZES.to_vec(),
            log_lines: 1_000,
        }
    }

    /// Create a configuration for comprehensive benchmarks
    pub fn comprehensive() -> Self {
        Self {
            warmup_runs: 5,
            measurement_runs: 10,
            chunk_sizes: vec![1, 10, 100, 1000, 10_000],
            log_lines: 200_000,
        }
    }
}
