//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use logsum_core::{Output, StrategyType};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;

/// JSON formatter - buffers every report and writes one document on finish
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    report: Report,
}

/// Top-level JSON document
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Report {
    /// Per-file results of `process`
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files: Vec<FileData>,
    /// Per-file strategy totals of `compare`
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub comparisons: Vec<ComparisonData>,
    /// Sum over all processed files
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total_bytes: Option<u64>,
}

/// Result for one processed file
#[derive(Debug, Serialize, Deserialize)]
pub struct FileData {
    pub path: String,
    pub total_bytes: u64,
    pub strategy: String,
    pub duration_ms: f64,
    pub input_bytes: Option<u64>,
    pub bytes_per_sec: Option<f64>,
}

/// Totals of every strategy for one file
#[derive(Debug, Serialize, Deserialize)]
pub struct ComparisonData {
    pub path: String,
    pub results: Vec<StrategyTotal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StrategyTotal {
    pub strategy: String,
    pub total_bytes: u64,
    pub matches_sequential: bool,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            report: Report::default(),
        }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout(pretty: bool) -> Self {
        Self::new(io::stdout(), pretty)
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_file(&mut self, path: &Path, output: &Output) -> Result<()> {
        let metadata = &output.metadata;
        self.report.files.push(FileData {
            path: path.display().to_string(),
            total_bytes: output.total_bytes,
            strategy: metadata.strategy.to_string(),
            duration_ms: metadata.duration.as_secs_f64() * 1000.0,
            input_bytes: metadata.input_bytes,
            bytes_per_sec: metadata.bytes_per_sec(),
        });
        *self.report.total_bytes.get_or_insert(0) += output.total_bytes;
        Ok(())
    }

    fn format_comparison(&mut self, path: &Path, totals: &[(StrategyType, u64)]) -> Result<()> {
        let expected = totals.first().map(|&(_, total)| total);
        self.report.comparisons.push(ComparisonData {
            path: path.display().to_string(),
            results: totals
                .iter()
                .map(|&(strategy, total_bytes)| StrategyTotal {
                    strategy: strategy.name().to_string(),
                    total_bytes,
                    matches_sequential: Some(total_bytes) == expected,
                })
                .collect(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.report)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.report)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsum_core::ProcessingMetadata;
    use std::time::Duration;

    fn output(total_bytes: u64) -> Output {
        Output {
            total_bytes,
            metadata: ProcessingMetadata {
                strategy: "map-reduce",
                duration: Duration::from_millis(1),
                input_bytes: None,
            },
        }
    }

    #[test]
    fn test_process_report() {
        let mut formatter = JsonFormatter::new(Vec::new(), false);
        formatter.format_file(Path::new("a.log"), &output(7)).unwrap();
        formatter.format_file(Path::new("b.log"), &output(5)).unwrap();
        formatter.finish().unwrap();

        let report: Report = serde_json::from_slice(&formatter.into_inner()).unwrap();
        assert_eq!(report.total_bytes, Some(12));
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].strategy, "map-reduce");
        assert_eq!(report.files[1].bytes_per_sec, None);
        assert!(report.comparisons.is_empty());
    }

    #[test]
    fn test_comparison_report() {
        let mut formatter = JsonFormatter::new(Vec::new(), true);
        formatter
            .format_comparison(
                Path::new("access.log"),
                &[(StrategyType::Sequential, 3), (StrategyType::Tasks, 3)],
            )
            .unwrap();
        formatter.finish().unwrap();

        let report: Report = serde_json::from_slice(&formatter.into_inner()).unwrap();
        assert_eq!(report.total_bytes, None);
        let results = &report.comparisons[0].results;
        assert_eq!(results[1].strategy, "tasks");
        assert!(results.iter().all(|r| r.matches_sequential));
    }
}
