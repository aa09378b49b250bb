//! Error types for log processing
//!
//! Parse-level anomalies (unmatched lines, `-` or non-numeric byte fields)
//! are not errors; they contribute 0 to the total. Everything here is fatal
//! to the run that produced it.

use std::any::Any;
use thiserror::Error;

/// Errors that can occur while processing a log
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The line source could not be opened or read
    #[error("I/O operation failed")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// Invalid strategy parameters
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A distributed unit of work failed or its result went missing
    #[error("Task failed in {strategy} strategy: {reason}")]
    TaskFailed {
        strategy: &'static str,
        reason: String,
    },

    /// The running total no longer fits in a `u64`
    #[error("Byte total overflowed in {strategy} strategy")]
    Overflow { strategy: &'static str },

    /// A worker pool, thread or runtime could not be created
    #[error("Failed to create execution pool")]
    PoolCreation {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ProcessingError {
    /// Build a `TaskFailed` error from a caught panic payload
    pub(crate) fn from_panic(strategy: &'static str, payload: Box<dyn Any + Send>) -> Self {
        ProcessingError::TaskFailed {
            strategy,
            reason: panic_message(payload.as_ref()),
        }
    }

    pub(crate) fn overflow(strategy: &'static str) -> Self {
        ProcessingError::Overflow { strategy }
    }

    /// Whether this error came from the line source
    pub fn is_io(&self) -> bool {
        matches!(self, ProcessingError::IoError { .. })
    }
}

/// Result type for processing operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_io_error_keeps_source() {
        let err: ProcessingError = io::Error::new(io::ErrorKind::NotFound, "missing.log").into();
        assert!(err.is_io());

        let source = err.source().expect("io source");
        let io_err = source.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
        assert_eq!(io_err.to_string(), "missing.log");
    }

    #[test]
    fn test_panic_payloads() {
        let err = ProcessingError::from_panic("thread-pool", Box::new("boom"));
        assert_eq!(
            err.to_string(),
            "Task failed in thread-pool strategy: panicked: boom"
        );

        let err = ProcessingError::from_panic("tasks", Box::new(String::from("owned boom")));
        assert!(err.to_string().contains("owned boom"));

        let err = ProcessingError::from_panic("fork-join", Box::new(42_u32));
        assert!(err.to_string().contains("non-string payload"));
        assert!(!err.is_io());
    }

    #[test]
    fn test_overflow_display() {
        let err = ProcessingError::overflow("map-reduce");
        assert_eq!(err.to_string(), "Byte total overflowed in map-reduce strategy");
        assert!(!err.is_io());
    }

    #[test]
    fn test_invalid_config_display() {
        let err = ProcessingError::InvalidConfig {
            reason: "Chunk size must be greater than 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Chunk size must be greater than 0"
        );
    }
}
