//! Compare command implementation

use super::{init_logging, StrategyParams};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::{stdout_formatter, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use logsum_core::{compare_strategies, Input};
use std::path::PathBuf;

/// Arguments for the compare command
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Input file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub params: StrategyParams,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "LOGSUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (default: from config file, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CompareArgs {
    /// Execute the compare command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, false)?;
        log::debug!("Arguments: {:?}", self);

        let file_config = CliConfig::load_or_default(self.config.as_deref())?;
        let format = match self.format {
            Some(format) => format,
            None => file_config.default_format()?,
        };
        let config = self.params.apply(file_config.processing.clone());

        // Every strategy sees the same materialized lines
        let lines = Input::from_file(&self.input)
            .into_lines()
            .with_context(|| format!("Failed to read file: {}", self.input.display()))?;
        log::info!("Comparing strategies over {} lines", lines.len());

        let totals = compare_strategies(&lines, &config).context("Strategy comparison failed")?;

        let mut formatter = stdout_formatter(format, file_config.output.pretty_json);
        formatter.format_comparison(&self.input, &totals)?;
        formatter.finish()?;

        let expected = totals.first().map(|&(_, total)| total).unwrap_or_default();
        if let Some(&(strategy, actual)) = totals.iter().find(|&&(_, total)| total != expected) {
            return Err(CliError::TotalMismatch {
                strategy: strategy.name().to_string(),
                expected,
                actual,
            }
            .into());
        }

        Ok(())
    }
}
