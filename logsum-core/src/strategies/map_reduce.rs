//! Data-parallel map-reduce over the line stream

use super::traits::ProcessingStrategy;
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, ProcessingResult as Result};
use crate::input::{Input, LineStream};
use crate::parser::LineParser;
use log::debug;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

const NAME: &str = "map-reduce";

/// Maps every line through the parser on rayon and reduces with addition
///
/// Without a concurrency cap the global work-stealing pool is used; with a
/// cap a dedicated pool of exactly that many threads bounds the number of
/// parse operations in flight. The capped pool is kept for the lifetime of
/// the strategy and rebuilt only when the cap changes.
#[derive(Debug, Default)]
pub struct MapReduceStrategy {
    capped_pool: Mutex<Option<(usize, Arc<ThreadPool>)>>,
}

impl MapReduceStrategy {
    /// Create a new map-reduce strategy
    pub fn new() -> Self {
        Self::default()
    }

    fn pool_for_cap(&self, cap: usize) -> Result<Arc<ThreadPool>> {
        let mut cached = self
            .capped_pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some((size, pool)) = cached.as_ref() {
            if *size == cap {
                return Ok(Arc::clone(pool));
            }
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cap)
            .thread_name(|i| format!("logsum-map-{i}"))
            .build()
            .map_err(|e| ProcessingError::PoolCreation {
                source: Box::new(e),
            })?;
        debug!("{NAME}: built capped pool of {cap} threads");
        let pool = Arc::new(pool);
        *cached = Some((cap, Arc::clone(&pool)));
        Ok(pool)
    }

    fn map_reduce(lines: LineStream, parser: &dyn LineParser) -> Result<u64> {
        lines
            .par_bridge()
            .map(|line| -> Result<u64> { Ok(parser.parse_bytes(&line?)) })
            .try_reduce(
                || 0,
                |a, b| a.checked_add(b).ok_or_else(|| ProcessingError::overflow(NAME)),
            )
    }
}

impl ProcessingStrategy for MapReduceStrategy {
    fn process(
        &self,
        input: Input,
        parser: Arc<dyn LineParser>,
        config: &ProcessingConfig,
    ) -> Result<u64> {
        config.validate()?;
        let lines = input.lines()?;
        let parser = parser.as_ref();

        let outcome = match config.concurrency_cap {
            Some(cap) => {
                let pool = self.pool_for_cap(cap)?;
                panic::catch_unwind(AssertUnwindSafe(|| {
                    pool.install(|| Self::map_reduce(lines, parser))
                }))
            }
            None => {
                debug!(
                    "{NAME}: global pool of {} threads",
                    rayon::current_num_threads()
                );
                panic::catch_unwind(AssertUnwindSafe(|| Self::map_reduce(lines, parser)))
            }
        };

        outcome.unwrap_or_else(|payload| Err(ProcessingError::from_panic(NAME, payload)))
    }

    fn supports_parallel(&self) -> bool {
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
        (1..=n)
            .map(|b| format!(r#"h i u [t] "GET / HTTP/1.0" 200 {b} "r" "a""#))
            .collect()
    }

    #[test]
    fn test_uncapped() {
        let total = MapReduceStrategy::new()
            .process(
                Input::from(lines(100)),
                Arc::new(ClfParser::new()),
                &ProcessingConfig::default(),
            )
            .unwrap();
        assert_eq!(total, 5050);
    }

    #[test]
    fn test_capped() {
        for cap in [1, 3, 100] {
            let config = ProcessingConfig::builder()
                .concurrency_cap(Some(cap))
                .build()
                .unwrap();
            let total = MapReduceStrategy::new()
                .process(Input::from(lines(100)), Arc::new(ClfParser::new()), &config)
                .unwrap();
            assert_eq!(total, 5050, "cap {cap}");
        }
    }

    #[test]
    fn test_capped_pool_reused_until_cap_changes() {
        let strategy = MapReduceStrategy::new();
        let first = strategy.pool_for_cap(2).unwrap();
        let again = strategy.pool_for_cap(2).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(first.current_num_threads(), 2);

        let resized = strategy.pool_for_cap(3).unwrap();
        assert!(!Arc::ptr_eq(&first, &resized));
        assert_eq!(resized.current_num_threads(), 3);
    }

    #[test]
    fn test_empty_is_identity() {
        let total = MapReduceStrategy::new()
            .process(
                Input::from(Vec::<String>::new()),
                Arc::new(ClfParser::new()),
                &ProcessingConfig::default(),
            )
            .unwrap();
        assert_eq!(total, 0);
    }
}
