//! Benchmark utilities and metrics for logsum
//!
//! This crate provides common functionality for benchmarking the byte-counting
//! strategies, including synthetic log generation, the warm-up/measure
//! harness and throughput reporting.

pub mod config;
pub mod data;
pub mod error;
pub mod harness;
pub mod metrics;

pub use config::BenchmarkConfig;
pub use data::TestLog;
pub use error::{BenchmarkError, BenchmarkResult};
pub use harness::{build_matrix, cases_for_chunk_size, run_case, run_matrix, BenchmarkCase};
pub use metrics::{BenchmarkReport, Measurement, ThroughputStats};
