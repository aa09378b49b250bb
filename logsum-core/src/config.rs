//! Strategy parameters
//!
//! One configuration is shared by every strategy; each strategy reads only
//! the parameters it recognizes.

use crate::error::ProcessingError;
use serde::{Deserialize, Serialize};

/// Default lines per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Default width of the fixed worker pool
pub const DEFAULT_WORKER_COUNT: usize = 8;

/// Default fork-join base-case size
pub const DEFAULT_THRESHOLD: usize = 1000;

/// Parameters recognized by the processing strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Lines per chunk for the chunked strategies
    pub chunk_size: usize,

    /// Number of persistent workers in the fixed pool
    pub worker_count: usize,

    /// Maximum in-flight parse operations for map-reduce (None = adaptive)
    pub concurrency_cap: Option<usize>,

    /// Fork-join ranges of at most this many lines are summed directly
    pub threshold: usize,

    /// Carrier threads for lightweight tasks (None = one per CPU)
    pub carrier_threads: Option<usize>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
            concurrency_cap: None,
            threshold: DEFAULT_THRESHOLD,
            carrier_threads: None,
        }
    }
}

impl ProcessingConfig {
    /// Creates a new builder for ProcessingConfig
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder::new()
    }

    /// Small partitions and pools, mostly useful in tests
    pub fn fine_grained() -> Self {
        Self {
            chunk_size: 10,
            worker_count: 2,
            concurrency_cap: Some(2),
            threshold: 10,
            carrier_threads: Some(2),
        }
    }

    /// Large partitions sized to the machine
    pub fn coarse_grained() -> Self {
        Self {
            chunk_size: 10_000,
            worker_count: num_cpus::get(),
            concurrency_cap: None,
            threshold: 10_000,
            carrier_threads: None,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ProcessingError> {
        if self.chunk_size == 0 {
            return Err(ProcessingError::InvalidConfig {
                reason: "Chunk size must be greater than 0".to_string(),
            });
        }

        if self.worker_count == 0 {
            return Err(ProcessingError::InvalidConfig {
                reason: "Worker count must be greater than 0".to_string(),
            });
        }

        if self.threshold == 0 {
            return Err(ProcessingError::InvalidConfig {
                reason: "Threshold must be greater than 0".to_string(),
            });
        }

        if self.concurrency_cap == Some(0) {
            return Err(ProcessingError::InvalidConfig {
                reason: "Concurrency cap must be greater than 0".to_string(),
            });
        }

        if self.carrier_threads == Some(0) {
            return Err(ProcessingError::InvalidConfig {
                reason: "Carrier threads must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for ProcessingConfig with fluent API
#[derive(Debug, Clone)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            config: ProcessingConfig::default(),
        }
    }

    /// Sets the number of lines per chunk
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Sets the fixed pool width
    pub fn worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    /// Sets the map-reduce in-flight limit
    pub fn concurrency_cap(mut self, cap: Option<usize>) -> Self {
        self.config.concurrency_cap = cap;
        self
    }

    /// Sets the fork-join base-case size
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Sets the number of carrier threads for lightweight tasks
    pub fn carrier_threads(mut self, threads: Option<usize>) -> Self {
        self.config.carrier_threads = threads;
        self
    }

    /// Builds the configuration, validating it
    pub fn build(self) -> Result<ProcessingConfig, ProcessingError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ProcessingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.concurrency_cap, None);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ProcessingConfig::fine_grained().validate().is_ok());
        assert!(ProcessingConfig::coarse_grained().validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let cases = [
            ProcessingConfig::builder().chunk_size(0),
            ProcessingConfig::builder().worker_count(0),
            ProcessingConfig::builder().threshold(0),
            ProcessingConfig::builder().concurrency_cap(Some(0)),
            ProcessingConfig::builder().carrier_threads(Some(0)),
        ];

        for builder in cases {
            match builder.build() {
                Err(ProcessingError::InvalidConfig { reason }) => {
                    assert!(reason.contains("greater than 0"))
                }
                other => panic!("Expected InvalidConfig, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_builder() {
        let config = ProcessingConfig::builder()
            .chunk_size(10)
            .worker_count(3)
            .concurrency_cap(Some(4))
            .threshold(1)
            .carrier_threads(Some(2))
            .build()
            .unwrap();

        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.concurrency_cap, Some(4));
        assert_eq!(config.threshold, 1);
        assert_eq!(config.carrier_threads, Some(2));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: ProcessingConfig =
            serde_json::from_str(r#"{"chunk_size": 1000, "concurrency_cap": 16}"#).unwrap();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.concurrency_cap, Some(16));
        assert_eq!(config.worker_count, DEFAULT_WORKER_COUNT);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
    }
}
