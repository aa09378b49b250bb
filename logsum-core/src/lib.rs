//! Concurrent strategies for summing the bytes transferred in Common Log
//! Format access logs
//!
//! Every strategy computes the same total: the sum of the `bytes` field of
//! each line, with malformed lines and `-` counting as zero. They differ only
//! in how the work is partitioned and scheduled:
//!
//! - **sequential**: one thread, line by line, the reference result
//! - **thread-pool**: a fixed set of workers fed with line chunks
//! - **tasks**: one lightweight tokio task per chunk
//! - **map-reduce**: rayon parallel map with an optional concurrency cap
//! - **fork-join**: recursive halving joined with `rayon::join`
//!
//! # Example
//!
//! ```rust
//! use logsum_core::{LogProcessor, StrategyType};
//!
//! let lines = vec![
//!     r#"10.0.0.1 - - [01/Jan/2024:00:00:00 +0000] "GET /a HTTP/1.1" 200 100 "-" "-""#.to_string(),
//!     r#"10.0.0.2 - - [01/Jan/2024:00:00:01 +0000] "GET /b HTTP/1.1" 200 - "-" "-""#.to_string(),
//! ];
//!
//! let processor = LogProcessor::new(StrategyType::ForkJoin);
//! let output = processor.process_lines(lines).unwrap();
//! assert_eq!(output.total_bytes, 100);
//! ```

pub mod chunking;
pub mod config;
pub mod error;
pub mod input;
pub mod parser;
pub mod processor;
pub mod strategies;

pub use config::{ProcessingConfig, ProcessingConfigBuilder};
pub use error::{ProcessingError, ProcessingResult};
pub use input::Input;
pub use parser::{classify_line, parse_bytes, ByteField, ClfParser, LineParser};
pub use processor::{compare_strategies, LogProcessor, Output, ProcessingMetadata};
pub use strategies::{create_strategy, ProcessingStrategy, StrategyType};
