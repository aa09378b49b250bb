//! Output formatting module

use anyhow::Result;
use logsum_core::{Output, StrategyType};
use std::path::Path;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per file followed by the grand total
    Text,
    /// JSON document with per-file totals and metadata
    Json,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Report the result for a single file
    fn format_file(&mut self, path: &Path, output: &Output) -> Result<()>;

    /// Report the totals of every strategy over one file
    fn format_comparison(&mut self, path: &Path, totals: &[(StrategyType, u64)]) -> Result<()>;

    /// Finalize output (e.g., write the grand total)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Formatter for `format` writing to stdout
pub fn stdout_formatter(format: OutputFormat, pretty_json: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::stdout()),
        OutputFormat::Json => Box::new(JsonFormatter::stdout(pretty_json)),
    }
}
