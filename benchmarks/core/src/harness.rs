//! Benchmark harness
//!
//! Builds the strategy/parameter matrix, runs warm-up and measured
//! iterations over a log, and holds the shared Criterion configuration.

use crate::config::{BenchmarkConfig, MAP_CONCURRENCY_CAP, POOL_WORKERS};
use crate::data::TestLog;
use crate::error::{BenchmarkError, BenchmarkResult};
use crate::metrics::{BenchmarkReport, Measurement};
use criterion::{Criterion, Throughput};
use logsum_core::{LogProcessor, ProcessingConfig, StrategyType};
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Configure a Criterion benchmark group with standard settings
pub fn configure_criterion() -> Criterion {
    CriterionConfig::default().into_criterion()
}

/// Standard benchmark group configuration
pub struct CriterionConfig {
    pub warm_up_time: Duration,
    pub measurement_time: Duration,
    pub sample_size: usize,
}

impl Default for CriterionConfig {
    fn default() -> Self {
        Self {
            warm_up_time: Duration::from_secs(1),
            measurement_time: Duration::from_secs(3),
            sample_size: 50,
        }
    }
}

impl CriterionConfig {
    /// Create a configuration for quick benchmarks
    pub fn quick() -> Self {
        Self {
            warm_up_time: Duration::from_millis(500),
            measurement_time: Duration::from_secs(1),
            sample_size: 20,
        }
    }

    /// Create a configuration for thorough benchmarks
    pub fn thorough() -> Self {
        Self {
            warm_up_time: Duration::from_secs(3),
            measurement_time: Duration::from_secs(10),
            sample_size: 100,
        }
    }

    /// Build a Criterion instance from these settings
    pub fn into_criterion(self) -> Criterion {
        Criterion::default()
            .warm_up_time(self.warm_up_time)
            .measurement_time(self.measurement_time)
            .sample_size(self.sample_size)
            .noise_threshold(0.05)
    }
}

/// Setup throughput measurement for log-based benchmarks
pub fn setup_throughput(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    log_len: usize,
) {
    group.throughput(Throughput::Bytes(log_len as u64));
}

/// One strategy with one parameter set
#[derive(Debug, Clone)]
pub struct BenchmarkCase {
    pub label: String,
    pub strategy: StrategyType,
    pub chunk_size: usize,
    pub config: ProcessingConfig,
}

impl BenchmarkCase {
    /// Create a processor for this case
    pub fn processor(&self) -> BenchmarkResult<LogProcessor> {
        LogProcessor::with_config(self.strategy, self.config.clone()).map_err(|source| {
            BenchmarkError::Processing {
                label: self.label.clone(),
                source,
            }
        })
    }
}

/// Every strategy parameterized by one chunk size
///
/// The chunk size doubles as the fork-join threshold; map-reduce runs once
/// uncapped and once capped.
pub fn cases_for_chunk_size(chunk_size: usize) -> BenchmarkResult<Vec<BenchmarkCase>> {
    let base = ProcessingConfig::builder()
        .chunk_size(chunk_size)
        .worker_count(POOL_WORKERS)
        .threshold(chunk_size)
        .build()
        .map_err(|e| BenchmarkError::Config {
            message: format!("chunk size {chunk_size}: {e}"),
        })?;

    let mut cases: Vec<BenchmarkCase> = StrategyType::all()
        .iter()
        .map(|&strategy| BenchmarkCase {
            label: format!("{strategy}/chunk={chunk_size}"),
            strategy,
            chunk_size,
            config: base.clone(),
        })
        .collect();

    cases.push(BenchmarkCase {
        label: format!("map-reduce-cap{MAP_CONCURRENCY_CAP}/chunk={chunk_size}"),
        strategy: StrategyType::MapReduce,
        chunk_size,
        config: ProcessingConfig {
            concurrency_cap: Some(MAP_CONCURRENCY_CAP),
            ..base
        },
    });

    Ok(cases)
}

/// Full matrix for the configured chunk sizes
pub fn build_matrix(config: &BenchmarkConfig) -> BenchmarkResult<Vec<BenchmarkCase>> {
    if config.chunk_sizes.is_empty() {
        return Err(BenchmarkError::Config {
            message: "no chunk sizes configured".to_string(),
        });
    }

    let mut cases = Vec::new();
    for &chunk_size in &config.chunk_sizes {
        cases.extend(cases_for_chunk_size(chunk_size)?);
    }
    Ok(cases)
}

/// Run one case: warm-up iterations, then timed iterations
///
/// Every iteration's total is checked against the log's known total.
pub fn run_case(
    case: &BenchmarkCase,
    log: &TestLog,
    warmup_runs: usize,
    measurement_runs: usize,
) -> BenchmarkResult<Measurement> {
    let processor = case.processor()?;
    let run_once = || -> BenchmarkResult<u64> {
        let output = processor
            .process(log.input())
            .map_err(|source| BenchmarkError::Processing {
                label: case.label.clone(),
                source,
            })?;
        let total = black_box(output.total_bytes);
        if total != log.expected_total {
            return Err(BenchmarkError::Validation {
                message: format!(
                    "{} summed {} bytes over {}, expected {}",
                    case.label, total, log.name, log.expected_total
                ),
            });
        }
        Ok(total)
    };

    for _ in 0..warmup_runs {
        run_once()?;
    }

    let mut iterations = Vec::with_capacity(measurement_runs);
    let mut total_bytes = log.expected_total;
    for _ in 0..measurement_runs {
        let start = Instant::now();
        total_bytes = run_once()?;
        iterations.push(start.elapsed());
    }

    Ok(Measurement {
        label: case.label.clone(),
        strategy: case.strategy.name().to_string(),
        chunk_size: case.chunk_size,
        input_bytes: log.size_bytes(),
        total_bytes,
        iterations,
    })
}

/// Run the whole matrix over `log`
pub fn run_matrix(config: &BenchmarkConfig, log: &TestLog) -> BenchmarkResult<BenchmarkReport> {
    let mut report = BenchmarkReport::new(&log.name, config.warmup_runs, config.measurement_runs);
    for case in build_matrix(config)? {
        report.push(run_case(&case, log, config.warmup_runs, config.measurement_runs)?);
    }
    Ok(report)
}
