//! Error types for benchmarking operations

use logsum_core::ProcessingError;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for benchmark operations
pub type BenchmarkResult<T> = Result<T, BenchmarkError>;

/// Error types that can occur during benchmarking
#[derive(Debug)]
pub enum BenchmarkError {
    /// IO error (file not found, permission denied, etc.)
    Io { path: PathBuf, source: io::Error },

    /// A strategy failed while being measured
    Processing {
        label: String,
        source: ProcessingError,
    },

    /// JSON serialization error
    Json { source: serde_json::Error },

    /// A strategy returned a different total than expected
    Validation { message: String },

    /// Configuration error
    Config { message: String },
}

impl fmt::Display for BenchmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "IO error for path '{}': {}", path.display(), source)
            }
            Self::Processing { label, source } => {
                write!(f, "Benchmark case '{}' failed: {}", label, source)
            }
            Self::Json { source } => {
                write!(f, "Failed to serialize report: {}", source)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl StdError for BenchmarkError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Processing { source, .. } => Some(source),
            Self::Json { source } => Some(source),
            _ => None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for BenchmarkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json { source: err }
    }
}
