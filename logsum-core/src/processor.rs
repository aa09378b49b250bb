//! Processor facade over the strategy registry

use crate::config::ProcessingConfig;
use crate::error::ProcessingResult as Result;
use crate::input::Input;
use crate::parser::{ClfParser, LineParser};
use crate::strategies::{create_strategy, ProcessingStrategy, StrategyType};
use log::{debug, info};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of one processing run
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    /// Sum of the byte counts of every line
    pub total_bytes: u64,
    /// Processing metadata
    pub metadata: ProcessingMetadata,
}

/// Metadata about the processing
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingMetadata {
    /// Strategy used for processing
    pub strategy: &'static str,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// Input size in bytes, when known before reading
    pub input_bytes: Option<u64>,
}

impl ProcessingMetadata {
    /// Input bytes per second, when the input size is known
    pub fn bytes_per_sec(&self) -> Option<f64> {
        let secs = self.duration.as_secs_f64();
        match self.input_bytes {
            Some(size) if secs > 0.0 => Some(size as f64 / secs),
            _ => None,
        }
    }
}

/// Runs one strategy with a fixed configuration and parser
pub struct LogProcessor {
    strategy_type: StrategyType,
    strategy: Box<dyn ProcessingStrategy>,
    parser: Arc<dyn LineParser>,
    config: ProcessingConfig,
}

impl LogProcessor {
    /// Create a processor with the default configuration
    pub fn new(strategy_type: StrategyType) -> Self {
        Self {
            strategy_type,
            strategy: create_strategy(strategy_type),
            parser: Arc::new(ClfParser::new()),
            config: ProcessingConfig::default(),
        }
    }

    /// Create a processor with custom configuration
    pub fn with_config(strategy_type: StrategyType, config: ProcessingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(strategy_type)
        })
    }

    /// Replace the line parser
    pub fn with_parser(mut self, parser: Arc<dyn LineParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Sum the byte counts of every line in `input`
    pub fn process(&self, input: Input) -> Result<Output> {
        let input_bytes = input.estimated_size();
        debug!(
            "Starting {} run over {:?} (input size: {:?})",
            self.strategy_type, input, input_bytes
        );

        let start = Instant::now();
        let total_bytes = self
            .strategy
            .process(input, Arc::clone(&self.parser), &self.config)?;
        let duration = start.elapsed();

        info!(
            "{} summed {} bytes in {:.3}ms",
            self.strategy_type,
            total_bytes,
            duration.as_secs_f64() * 1000.0
        );

        Ok(Output {
            total_bytes,
            metadata: ProcessingMetadata {
                strategy: self.strategy.name(),
                duration,
                input_bytes,
            },
        })
    }

    /// Process a log file
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<Output> {
        self.process(Input::from_file(path.as_ref()))
    }

    /// Process already-materialized lines
    pub fn process_lines(&self, lines: Vec<String>) -> Result<Output> {
        self.process(Input::from(lines))
    }

    /// Name of the configured strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Identifier of the configured strategy
    pub fn strategy_type(&self) -> StrategyType {
        self.strategy_type
    }

    /// Get the current configuration
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }
}

/// Run every registered strategy over the same lines
///
/// Totals are returned in registry order, sequential first.
pub fn compare_strategies(
    lines: &[String],
    config: &ProcessingConfig,
) -> Result<Vec<(StrategyType, u64)>> {
    config.validate()?;
    StrategyType::all()
        .iter()
        .map(|&strategy_type| {
            let processor = LogProcessor::with_config(strategy_type, config.clone())?;
            let output = processor.process_lines(lines.to_vec())?;
            Ok((strategy_type, output.total_bytes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;

    const SCENARIO: [&str; 3] = [
        r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET /a HTTP/1.1" 200 100 "-" "-""#,
        r#"10.0.0.2 - - [01/Jan/2024:00:00:01 +0000] "GET /b HTTP/1.1" 200 - "-" "-""#,
        "malformed line without structure",
    ];

    fn scenario() -> Vec<String> {
        SCENARIO.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_processor_output() {
        let processor = LogProcessor::new(StrategyType::ThreadPool);
        let output = processor.process_lines(scenario()).unwrap();

        assert_eq!(output.total_bytes, 100);
        assert_eq!(output.metadata.strategy, "thread-pool");
        assert_eq!(processor.strategy_name(), "thread-pool");
        assert!(output.metadata.input_bytes.unwrap() > 0);
    }

    #[test]
    fn test_with_config_validates() {
        let mut config = ProcessingConfig::default();
        config.chunk_size = 0;
        let result = LogProcessor::with_config(StrategyType::Tasks, config);
        assert!(matches!(result, Err(ProcessingError::InvalidConfig { .. })));
    }

    #[test]
    fn test_custom_parser() {
        struct Constant;
        impl LineParser for Constant {
            fn parse_bytes(&self, _line: &str) -> u64 {
                2
            }
        }

        let output = LogProcessor::new(StrategyType::Sequential)
            .with_parser(Arc::new(Constant))
            .process_lines(scenario())
            .unwrap();
        assert_eq!(output.total_bytes, 6);
    }

    #[test]
    fn test_compare_strategies() {
        let totals = compare_strategies(&scenario(), &ProcessingConfig::fine_grained()).unwrap();

        assert_eq!(totals.len(), StrategyType::all().len());
        assert_eq!(totals[0].0, StrategyType::Sequential);
        assert!(totals.iter().all(|&(_, total)| total == 100));
    }

    #[test]
    fn test_bytes_per_sec() {
        let metadata = ProcessingMetadata {
            strategy: "sequential",
            duration: Duration::from_millis(500),
            input_bytes: Some(1000),
        };
        assert_eq!(metadata.bytes_per_sec(), Some(2000.0));

        let unknown = ProcessingMetadata {
            input_bytes: None,
            ..metadata
        };
        assert_eq!(unknown.bytes_per_sec(), None);
    }
}
