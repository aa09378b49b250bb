//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use logsum_core::{Output, StrategyType};
use std::io::{self, Write};
use std::path::Path;

/// Plain text formatter - one line per file, then the grand total
pub struct TextFormatter<W: Write> {
    writer: W,
    files: usize,
    total_bytes: u64,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            files: 0,
            total_bytes: 0,
        }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_file(&mut self, path: &Path, output: &Output) -> Result<()> {
        let metadata = &output.metadata;
        write!(
            self.writer,
            "{}: {} bytes ({}, {:.3}ms",
            path.display(),
            output.total_bytes,
            metadata.strategy,
            metadata.duration.as_secs_f64() * 1000.0
        )?;
        if let Some(rate) = metadata.bytes_per_sec() {
            write!(self.writer, ", {:.2} MB/s", rate / 1_000_000.0)?;
        }
        writeln!(self.writer, ")")?;

        self.files += 1;
        self.total_bytes += output.total_bytes;
        Ok(())
    }

    fn format_comparison(&mut self, path: &Path, totals: &[(StrategyType, u64)]) -> Result<()> {
        writeln!(self.writer, "{}", path.display())?;
        let expected = totals.first().map(|&(_, total)| total);
        for &(strategy, total) in totals {
            let marker = if Some(total) == expected { "ok" } else { "MISMATCH" };
            writeln!(self.writer, "  {:<12} {:>16} bytes  {marker}", strategy.name(), total)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.files > 0 {
            writeln!(
                self.writer,
                "Total: {} bytes in {} file(s)",
                self.total_bytes, self.files
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
