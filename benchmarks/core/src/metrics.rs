//! Throughput metrics for strategy benchmarks

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Timings of the measured iterations of one benchmark case
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    /// Case label, e.g. `thread-pool/chunk=100`
    pub label: String,
    /// Strategy name
    pub strategy: String,
    /// Chunk size (or threshold) the case ran with
    pub chunk_size: usize,
    /// Input size in bytes
    pub input_bytes: usize,
    /// Total returned by the strategy
    pub total_bytes: u64,
    /// Wall-clock time of every measured iteration
    pub iterations: Vec<Duration>,
}

/// Summary statistics derived from a measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroughputStats {
    pub min_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
    /// Completed runs per millisecond
    pub ops_per_ms: f64,
    /// Input megabytes per second at the mean time
    pub mb_per_sec: f64,
}

impl Measurement {
    /// Compute min/mean/max and throughput
    ///
    /// Returns `None` when there are no iterations.
    pub fn stats(&self) -> Option<ThroughputStats> {
        if self.iterations.is_empty() {
            return None;
        }

        let times: Vec<f64> = self
            .iterations
            .iter()
            .map(|d| d.as_secs_f64() * 1000.0)
            .collect();
        let min_ms = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max_ms = times.iter().copied().fold(0.0, f64::max);
        let mean_ms = times.iter().sum::<f64>() / times.len() as f64;

        let (ops_per_ms, mb_per_sec) = if mean_ms > 0.0 {
            (
                1.0 / mean_ms,
                (self.input_bytes as f64 / 1_000_000.0) / (mean_ms / 1000.0),
            )
        } else {
            (f64::INFINITY, f64::INFINITY)
        };

        Some(ThroughputStats {
            min_ms,
            mean_ms,
            max_ms,
            ops_per_ms,
            mb_per_sec,
        })
    }
}

/// Results of a full benchmark run
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub timestamp: DateTime<Utc>,
    pub cpu_count: usize,
    pub log_name: String,
    pub warmup_runs: usize,
    pub measurement_runs: usize,
    pub results: Vec<ReportEntry>,
}

/// One row of a report
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub measurement: Measurement,
    pub stats: Option<ThroughputStats>,
}

impl BenchmarkReport {
    /// Start an empty report
    pub fn new(log_name: impl Into<String>, warmup_runs: usize, measurement_runs: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            cpu_count: num_cpus::get(),
            log_name: log_name.into(),
            warmup_runs,
            measurement_runs,
            results: Vec::new(),
        }
    }

    /// Add a measurement with its derived statistics
    pub fn push(&mut self, measurement: Measurement) {
        let stats = measurement.stats();
        self.results.push(ReportEntry { measurement, stats });
    }

    /// Render as a fixed-width table
    pub fn to_table(&self) -> String {
        let mut out = format!(
            "{:<28} {:>12} {:>10} {:>10} {:>10} {:>12}\n",
            "Case", "ops/ms", "min (ms)", "mean (ms)", "max (ms)", "MB/s"
        );
        out.push_str(&format!("{:-<87}\n", ""));
        for entry in &self.results {
            match entry.stats {
                Some(s) => out.push_str(&format!(
                    "{:<28} {:>12.4} {:>10.3} {:>10.3} {:>10.3} {:>12.2}\n",
                    entry.measurement.label,
                    s.ops_per_ms,
                    s.min_ms,
                    s.mean_ms,
                    s.max_ms,
                    s.mb_per_sec
                )),
                None => out.push_str(&format!("{:<28} {:>12}\n", entry.measurement.label, "n/a")),
            }
        }
        out
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(ms: &[u64]) -> Measurement {
        Measurement {
            label: "sequential".to_string(),
            strategy: "sequential".to_string(),
            chunk_size: 100,
            input_bytes: 2_000_000,
            total_bytes: 42,
            iterations: ms.iter().map(|&m| Duration::from_millis(m)).collect(),
        }
    }

    #[test]
    fn test_stats() {
        let stats = measurement(&[1, 2, 3, 2]).stats().unwrap();
        assert_eq!(stats.min_ms, 1.0);
        assert_eq!(stats.max_ms, 3.0);
        assert_eq!(stats.mean_ms, 2.0);
        assert_eq!(stats.ops_per_ms, 0.5);
        // 2 MB in 2 ms
        assert!((stats.mb_per_sec - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_iterations() {
        assert!(measurement(&[]).stats().is_none());
    }

    #[test]
    fn test_report_rendering() {
        let mut report = BenchmarkReport::new("realistic_100", 3, 5);
        report.push(measurement(&[4, 4]));
        report.push(measurement(&[]));

        let table = report.to_table();
        assert!(table.contains("ops/ms"));
        assert!(table.contains("0.2500"));
        assert!(table.contains("n/a"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["results"][0]["label"], "sequential");
        assert_eq!(json["results"][0]["stats"]["mean_ms"], 4.0);
        assert!(json["results"][1]["stats"].is_null());
        assert_eq!(json["warmup_runs"], 3);
    }
}
