//! Fixed worker pool fed with line chunks
//!
//! The caller thread reads the input and submits each chunk to a bounded job
//! queue served by exactly `worker_count` workers. Partial sums come back
//! over a result channel and are added in whatever order they arrive.

use super::traits::ProcessingStrategy;
use crate::chunking::{Chunk, LineChunker};
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, ProcessingResult as Result};
use crate::input::{Input, LineStream};
use crate::parser::{sum_lines, LineParser};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace, warn};
use std::sync::Arc;
use std::thread;

const NAME: &str = "thread-pool";

/// Queued chunks per worker before the reader blocks
const QUEUE_DEPTH_PER_WORKER: usize = 2;

/// Chunked processing on a fixed pool of worker threads
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPoolStrategy;

impl ThreadPoolStrategy {
    /// Create a new thread pool strategy
    pub fn new() -> Self {
        Self
    }

    fn process_stream(
        &self,
        lines: LineStream,
        parser: &dyn LineParser,
        chunk_size: usize,
        worker_count: usize,
    ) -> Result<u64> {
        thread::scope(|scope| {
            let (job_tx, job_rx) =
                crossbeam_channel::bounded::<Chunk>(worker_count * QUEUE_DEPTH_PER_WORKER);
            let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, Option<u64>)>();

            let mut workers = Vec::with_capacity(worker_count);
            for id in 0..worker_count {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("logsum-worker-{id}"))
                    .spawn_scoped(scope, move || run_worker(jobs, results, parser));

                match spawned {
                    Ok(handle) => workers.push(handle),
                    // Returning drops `job_tx`, so workers already started exit
                    Err(e) => {
                        return Err(ProcessingError::PoolCreation {
                            source: Box::new(e),
                        })
                    }
                }
            }
            drop(job_rx);
            drop(result_tx);
            debug!("{NAME}: started {worker_count} workers, chunk size {chunk_size}");

            let mut submitted = 0usize;
            let mut read_error = None;
            for chunk in LineChunker::new(lines, chunk_size) {
                match chunk {
                    Ok(chunk) => {
                        trace!("{NAME}: submitting chunk {} ({} lines)", chunk.index, chunk.len());
                        if job_tx.send(chunk).is_err() {
                            // Every worker is gone; the join below reports why
                            break;
                        }
                        submitted += 1;
                    }
                    Err(e) => {
                        read_error = Some(e);
                        break;
                    }
                }
            }
            // No further work is accepted; workers drain the queue and exit
            drop(job_tx);

            // `None` once any chunk or the running total overflows
            let mut total = Some(0u64);
            let mut received = 0usize;
            for (index, partial) in result_rx.iter() {
                trace!("{NAME}: chunk {index} -> {partial:?} bytes");
                total = total.zip(partial).and_then(|(sum, part)| sum.checked_add(part));
                received += 1;
            }

            let mut failure = None;
            for handle in workers {
                if let Err(payload) = handle.join() {
                    if failure.is_none() {
                        failure = Some(ProcessingError::from_panic(NAME, payload));
                    }
                }
            }

            if let Some(e) = read_error {
                return Err(e.into());
            }
            if let Some(e) = failure {
                warn!("{NAME}: {e}");
                return Err(e);
            }
            if received != submitted {
                return Err(ProcessingError::TaskFailed {
                    strategy: NAME,
                    reason: format!(
                        "{} of {submitted} chunk results missing",
                        submitted - received
                    ),
                });
            }

            debug!("{NAME}: combined {received} chunks");
            total.ok_or_else(|| ProcessingError::overflow(NAME))
        })
    }
}

fn run_worker(
    jobs: Receiver<Chunk>,
    results: Sender<(usize, Option<u64>)>,
    parser: &dyn LineParser,
) {
    for chunk in jobs.iter() {
        let partial = sum_lines(parser, &chunk.lines);
        if results.send((chunk.index, partial)).is_err() {
            break;
        }
    }
}

impl ProcessingStrategy for ThreadPoolStrategy {
    fn process(
        &self,
        input: Input,
        parser: Arc<dyn LineParser>,
        config: &ProcessingConfig,
    ) -> Result<u64> {
        config.validate()?;
        let lines = input.lines()?;
        self.process_stream(lines, parser.as_ref(), config.chunk_size, config.worker_count)
    }

    fn supports_parallel(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
