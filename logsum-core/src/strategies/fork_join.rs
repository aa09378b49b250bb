//! Divide-and-conquer fork/join over materialized lines

use super::traits::ProcessingStrategy;
use crate::chunking::split_range;
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, ProcessingResult as Result};
use crate::input::Input;
use crate::parser::{sum_lines, LineParser};
use log::debug;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

const NAME: &str = "fork-join";

/// Recursively halves the line range until it is at most `threshold` long
///
/// At each split the left half is forked (it may be stolen by an idle
/// worker) while the right half is summed on the current thread, then the
/// two are joined.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForkJoinStrategy;

impl ForkJoinStrategy {
    /// Create a new fork-join strategy
    pub fn new() -> Self {
        Self
    }

    /// Sum an already-materialized slice of lines
    pub fn sum_materialized(
        &self,
        lines: &[String],
        parser: &dyn LineParser,
        threshold: usize,
    ) -> Result<u64> {
        if threshold == 0 {
            return Err(ProcessingError::InvalidConfig {
                reason: "Threshold must be greater than 0".to_string(),
            });
        }

        debug!("{NAME}: {} lines, threshold {threshold}", lines.len());
        panic::catch_unwind(AssertUnwindSafe(|| {
            sum_range(lines, 0..lines.len(), threshold, parser)
        }))
        .map_err(|payload| ProcessingError::from_panic(NAME, payload))?
        .ok_or_else(|| ProcessingError::overflow(NAME))
    }
}

fn sum_range(
    lines: &[String],
    range: Range<usize>,
    threshold: usize,
    parser: &dyn LineParser,
) -> Option<u64> {
    if range.len() <= threshold {
        return sum_lines(parser, &lines[range]);
    }

    let (left, right) = split_range(range);
    // rayon runs the first closure inline and offers the second for stealing
    let (right_sum, left_sum) = rayon::join(
        || sum_range(lines, right, threshold, parser),
        || sum_range(lines, left, threshold, parser),
    );
    left_sum?.checked_add(right_sum?)
}

impl ProcessingStrategy for ForkJoinStrategy {
    fn process(
        &self,
        input: Input,
        parser: Arc<dyn LineParser>,
        config: &ProcessingConfig,
    ) -> Result<u64> {
        config.validate()?;
        let lines = input.into_lines()?;
        self.sum_materialized(&lines, parser.as_ref(), config.threshold)
    }

    fn supports_parallel(&self) -> bool {
        true
    }

    fn requires_materialized_input(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ClfParser;

    fn lines(n: u64) -> Vec<String> {
        (0..n)
            .map(|b| format!(r#"h i u [t] "GET / HTTP/1.0" 200 {b} "r" "a""#))
            .collect()
    }

    #[test]
    fn test_threshold_extremes_agree() {
        let lines = lines(257);
        let expected: u64 = (0..257).sum();
        let strategy = ForkJoinStrategy::new();
        let parser = ClfParser::new();

        for threshold in [1, 2, 7, 256, 257, 10_000] {
            assert_eq!(
                strategy.sum_materialized(&lines, &parser, threshold).unwrap(),
                expected,
                "threshold {threshold}"
            );
        }
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let result = ForkJoinStrategy::new().sum_materialized(&lines(3), &ClfParser::new(), 0);
        assert!(matches!(result, Err(ProcessingError::InvalidConfig { .. })));
    }

    #[test]
    fn test_empty_and_single_line() {
        let strategy = ForkJoinStrategy::new();
        let parser = ClfParser::new();
        assert_eq!(strategy.sum_materialized(&[], &parser, 1).unwrap(), 0);
        assert_eq!(strategy.sum_materialized(&lines(2)[1..], &parser, 1).unwrap(), 1);
    }

    #[test]
    fn test_materializes_input() {
        let strategy = ForkJoinStrategy::new();
        assert!(strategy.requires_materialized_input());

        let total = strategy
            .process(
                Input::from_text(lines(10).join("\n")),
                Arc::new(ClfParser::new()),
                &ProcessingConfig::builder().threshold(3).build().unwrap(),
            )
            .unwrap();
        assert_eq!(total, 45);
    }
}
