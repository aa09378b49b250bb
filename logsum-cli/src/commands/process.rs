//! Process command implementation

use super::{init_logging, StrategyArg, StrategyParams};
use crate::config::CliConfig;
use crate::input::resolve_patterns;
use crate::output::{stdout_formatter, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use logsum_core::LogProcessor;
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Processing strategy
    #[arg(short, long, value_enum, default_value = "map-reduce")]
    pub strategy: StrategyArg,

    #[command(flatten)]
    pub params: StrategyParams,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "LOGSUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (default: from config file, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet)?;

        log::info!("Starting log processing");
        log::debug!("Arguments: {:?}", self);

        let file_config = CliConfig::load_or_default(self.config.as_deref())?;
        let format = match self.format {
            Some(format) => format,
            None => file_config.default_format()?,
        };
        let config = self.params.apply(file_config.processing.clone());

        let processor = LogProcessor::with_config(self.strategy.into(), config)
            .context("Invalid strategy parameters")?;
        let files = resolve_patterns(&self.input)?;
        log::info!(
            "Processing {} file(s) with {}",
            files.len(),
            processor.strategy_name()
        );

        let mut formatter = stdout_formatter(format, file_config.output.pretty_json);
        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        for path in &files {
            let output = processor
                .process_file(path)
                .with_context(|| format!("Failed to process file: {}", path.display()))?;
            formatter.format_file(path, &output)?;
            progress.file_completed(&path.display().to_string());
        }

        progress.finish();
        formatter.finish()?;
        Ok(())
    }
}
