//! Lightweight task per chunk
//!
//! Same partitioning as the thread pool, but every chunk becomes a tokio
//! task multiplexed over a small set of carrier threads, so the number of
//! outstanding units is bounded only by the input.

use super::traits::ProcessingStrategy;
use crate::chunking::LineChunker;
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, ProcessingResult as Result};
use crate::input::{Input, LineStream};
use crate::parser::{sum_lines, LineParser};
use log::{debug, warn};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tokio::task::{JoinError, JoinSet};

const NAME: &str = "tasks";

/// Chunked processing on lightweight async tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskStrategy;

impl TaskStrategy {
    /// Create a new task strategy
    pub fn new() -> Self {
        Self
    }

    fn build_runtime(config: &ProcessingConfig) -> Result<Runtime> {
        let mut builder = Builder::new_multi_thread();
        builder.thread_name("logsum-carrier");
        if let Some(threads) = config.carrier_threads {
            builder.worker_threads(threads);
        }

        builder
            .build()
            .map_err(|e| ProcessingError::PoolCreation {
                source: Box::new(e),
            })
    }
}

async fn run_tasks(
    lines: LineStream,
    parser: Arc<dyn LineParser>,
    chunk_size: usize,
) -> Result<u64> {
    let mut tasks = JoinSet::new();
    for chunk in LineChunker::new(lines, chunk_size) {
        // On a read error the set is dropped and outstanding tasks are aborted
        let chunk = chunk?;
        let parser = Arc::clone(&parser);
        tasks.spawn(async move { sum_lines(parser.as_ref(), &chunk.lines) });
    }
    debug!("{NAME}: spawned {} tasks", tasks.len());

    let mut total = 0u64;
    while let Some(joined) = tasks.join_next().await {
        // Returning early drops the set, aborting what is still outstanding
        total = joined
            .map_err(task_failure)?
            .and_then(|partial| total.checked_add(partial))
            .ok_or_else(|| ProcessingError::overflow(NAME))?;
    }
    Ok(total)
}

fn task_failure(err: JoinError) -> ProcessingError {
    let err = if err.is_panic() {
        ProcessingError::from_panic(NAME, err.into_panic())
    } else {
        ProcessingError::TaskFailed {
            strategy: NAME,
            reason: err.to_string(),
        }
    };
    warn!("{NAME}: {err}");
    err
}

impl ProcessingStrategy for TaskStrategy {
    fn process(
        &self,
        input: Input,
        parser: Arc<dyn LineParser>,
        config: &ProcessingConfig,
    ) -> Result<u64> {
        config.validate()?;
        let lines = input.lines()?;
        let runtime = Self::build_runtime(config)?;
        runtime.block_on(run_tasks(lines, parser, config.chunk_size))
    }

    fn supports_parallel(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
