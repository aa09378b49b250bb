//! Unified trait for byte-counting strategies

use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, ProcessingResult as Result};
use crate::input::Input;
use crate::parser::LineParser;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Unified trait for log processing strategies
///
/// Every strategy must return the same total as the sequential scan for the
/// same input, whatever its parameters.
pub trait ProcessingStrategy: Send + Sync {
    /// Sum the byte counts of every line in `input`
    fn process(
        &self,
        input: Input,
        parser: Arc<dyn LineParser>,
        config: &ProcessingConfig,
    ) -> Result<u64>;

    /// Check if this strategy parses lines concurrently
    fn supports_parallel(&self) -> bool {
        false
    }

    /// Check if this strategy reads the whole input before parsing
    fn requires_materialized_input(&self) -> bool {
        false
    }

    /// Strategy name for logging and reports
    fn name(&self) -> &'static str;
}

/// Identifier of a registered strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyType {
    /// Single-threaded scan, the reference result
    Sequential,
    /// Fixed pool of worker threads fed with chunks
    ThreadPool,
    /// One lightweight async task per chunk
    Tasks,
    /// Per-line parallel map with an additive reduction
    MapReduce,
    /// Recursive range splitting with fork and join
    ForkJoin,
}

impl StrategyType {
    /// Every registered strategy, sequential first
    pub fn all() -> &'static [StrategyType] {
        &[
            StrategyType::Sequential,
            StrategyType::ThreadPool,
            StrategyType::Tasks,
            StrategyType::MapReduce,
            StrategyType::ForkJoin,
        ]
    }

    /// Stable name used on the command line and in reports
    pub fn name(self) -> &'static str {
        match self {
            StrategyType::Sequential => "sequential",
            StrategyType::ThreadPool => "thread-pool",
            StrategyType::Tasks => "tasks",
            StrategyType::MapReduce => "map-reduce",
            StrategyType::ForkJoin => "fork-join",
        }
    }

    /// One-line description
    pub fn description(self) -> &'static str {
        match self {
            StrategyType::Sequential => "single thread, line by line",
            StrategyType::ThreadPool => "fixed worker pool, one job per chunk",
            StrategyType::Tasks => "lightweight async task per chunk",
            StrategyType::MapReduce => "work-stealing parallel map, optional concurrency cap",
            StrategyType::ForkJoin => "recursive split with fork/join over materialized lines",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyType {
    type Err = ProcessingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        StrategyType::all()
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| ProcessingError::InvalidConfig {
                reason: format!("Unknown strategy '{s}'"),
            })
    }
}
