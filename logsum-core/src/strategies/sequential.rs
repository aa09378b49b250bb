//! Sequential scan, the reference strategy

use super::traits::ProcessingStrategy;
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, ProcessingResult as Result};
use crate::input::Input;
use crate::parser::LineParser;
use std::sync::Arc;

/// Reads and parses lines one at a time on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStrategy;

impl SequentialStrategy {
    /// Create a new sequential strategy
    pub fn new() -> Self {
        Self
    }
}

impl ProcessingStrategy for SequentialStrategy {
    fn process(
        &self,
        input: Input,
        parser: Arc<dyn LineParser>,
        _config: &ProcessingConfig,
    ) -> Result<u64> {
        let mut total = 0u64;
        for line in input.lines()? {
            total = total
                .checked_add(parser.parse_bytes(&line?))
                .ok_or_else(|| ProcessingError::overflow(self.name()))?;
        }
        Ok(total)
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
