//! CLI command implementations

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use logsum_core::{ProcessingConfig, StrategyType};

pub mod compare;
pub mod process;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sum the transferred bytes of one or more log files
    Process(process::ProcessArgs),

    /// Run every strategy over one file and check that the totals agree
    Compare(compare::CompareArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List available processing strategies
    Strategies,

    /// List available output formats
    Formats,
}

impl ListCommands {
    /// Print the requested listing to stdout
    pub fn execute(&self) -> Result<()> {
        match self {
            ListCommands::Strategies => {
                for &strategy in StrategyType::all() {
                    println!("{:<12} {}", strategy.name(), strategy.description());
                }
            }
            ListCommands::Formats => {
                for format in crate::output::OutputFormat::value_variants() {
                    if let Some(value) = format.to_possible_value() {
                        let help = value.get_help().map(|h| h.to_string()).unwrap_or_default();
                        println!("{:<12} {help}", value.get_name());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Strategy selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Single thread, line by line
    Sequential,
    /// Fixed worker pool fed with chunks
    ThreadPool,
    /// Lightweight async task per chunk
    Tasks,
    /// Parallel map with optional concurrency cap
    MapReduce,
    /// Recursive split with fork/join
    ForkJoin,
}

impl From<StrategyArg> for StrategyType {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sequential => StrategyType::Sequential,
            StrategyArg::ThreadPool => StrategyType::ThreadPool,
            StrategyArg::Tasks => StrategyType::Tasks,
            StrategyArg::MapReduce => StrategyType::MapReduce,
            StrategyArg::ForkJoin => StrategyType::ForkJoin,
        }
    }
}

/// Strategy parameters that override the configuration file
#[derive(Debug, Clone, Default, Args)]
pub struct StrategyParams {
    /// Lines per chunk for thread-pool and tasks
    #[arg(long, value_name = "LINES")]
    pub chunk_size: Option<usize>,

    /// Worker threads for thread-pool
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Maximum parse operations in flight for map-reduce
    #[arg(long, value_name = "N")]
    pub concurrency_cap: Option<usize>,

    /// Largest line range fork-join sums without splitting
    #[arg(long, value_name = "LINES")]
    pub threshold: Option<usize>,

    /// Carrier threads for tasks (default: one per CPU)
    #[arg(long, value_name = "N")]
    pub carrier_threads: Option<usize>,
}

impl StrategyParams {
    /// Overlay the flags that were given on `config`
    pub fn apply(&self, mut config: ProcessingConfig) -> ProcessingConfig {
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if let Some(cap) = self.concurrency_cap {
            config.concurrency_cap = Some(cap);
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(threads) = self.carrier_threads {
            config.carrier_threads = Some(threads);
        }
        config
    }
}

/// Initialize logging based on verbosity level
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(())
}
