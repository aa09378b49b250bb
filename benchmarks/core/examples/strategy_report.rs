//! Throughput report for every strategy over the chunk-size matrix
//!
//! Usage: `cargo run --release --example strategy_report [ACCESS_LOG]`
//!
//! Without an argument a synthetic log is generated. The JSON report is
//! written under `temp/`.

use chrono::Local;
use logsum_benchmarks::data::generators;
use logsum_benchmarks::{run_matrix, BenchmarkConfig, TestLog};
use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Logsum Strategy Throughput Report ===\n");

    let config = BenchmarkConfig::default();
    let log = match env::args().nth(1) {
        Some(path) => TestLog::from_file(Path::new(&path))?,
        None => generators::realistic(config.log_lines),
    };

    println!("Configuration:");
    println!("- Log: {} ({} lines, {} bytes)", log.name, log.line_count, log.size_bytes());
    println!("- Expected total: {} bytes", log.expected_total);
    println!("- Chunk sizes: {:?}", config.chunk_sizes);
    println!("- Warmup iterations: {}", config.warmup_runs);
    println!("- Measured iterations: {}\n", config.measurement_runs);

    let report = run_matrix(&config, &log)?;
    println!("{}", report.to_table());

    let timestamp = Local::now().format("%Y-%m-%d-%H:%M:%S");
    let filename = format!("temp/{}_strategy-report.json", timestamp);
    fs::create_dir_all("temp")?;
    fs::write(&filename, report.to_json()?)?;

    println!("Report saved to: {}", filename);

    Ok(())
}
