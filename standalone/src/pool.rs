//! Bounded worker pool used by the map and reduce phases.
//!
//! The input is cut into at most `size` contiguous chunks and every chunk runs
//! on its own blocking task. Each task hands back its chunk index together
//! with its results, and the pool stores them in an index-addressed slot
//! buffer, so results come out in input order no matter which task finishes
//! first.

use std::any::Any;
use std::sync::Arc;

use tokio::task::{self, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use common::error::{Phase, PipelineError, Result};

/// Output of a single task: its chunk index and, unless it was cancelled
/// part way through, one result per input item.
type ChunkOutput<R> = (usize, Option<Vec<R>>);

/// A bounded set of workers for one phase of a run.
///
/// Dropping the pool cancels whatever it still has in flight.
#[derive(Debug)]
pub struct WorkerPool {
    phase: Phase,
    size: usize,
    cancel: CancellationToken,
}

impl WorkerPool {
    /// Create a pool of `size` workers whose cancellation follows `parent`.
    pub fn new(phase: Phase, size: usize, parent: &CancellationToken) -> Self {
        Self {
            phase,
            size: size.max(1),
            cancel: parent.child_token(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Apply `f` to every item and return the results in input order.
    ///
    /// Returns only once every spawned task has been joined. A task that
    /// panics fails the whole call with [`PipelineError::WorkerFault`]; a
    /// cancelled token fails it with [`PipelineError::Cancelled`]. Results
    /// of tasks that did finish are discarded in both cases.
    pub async fn execute<T, R, F>(&self, items: Vec<T>, f: F) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { phase: self.phase });
        }
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let total = items.len();
        let chunks = partition(items, self.size);
        let n_chunks = chunks.len();
        debug!(
            "{} pool: {} items across {} tasks",
            self.phase, total, n_chunks
        );

        let f = Arc::new(f);
        let mut tasks = JoinSet::new();
        for (index, chunk) in chunks.into_iter().enumerate() {
            let f = Arc::clone(&f);
            let cancel = self.cancel.clone();
            tasks.spawn_blocking(move || run_chunk(index, chunk, &*f, &cancel));
        }

        let mut slots: Vec<Option<Vec<R>>> = (0..n_chunks).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(results))) => slots[index] = Some(results),
                Ok((index, None)) => {
                    debug!("{} task {} stopped early, cancelling", self.phase, index);
                    self.shutdown(&mut tasks).await;
                    return Err(PipelineError::Cancelled { phase: self.phase });
                }
                Err(err) => {
                    let reason = join_error_reason(err);
                    error!("{} worker failed: {}", self.phase, reason);
                    self.shutdown(&mut tasks).await;
                    return Err(PipelineError::WorkerFault {
                        phase: self.phase,
                        reason,
                    });
                }
            }
        }

        let mut results = Vec::with_capacity(total);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(chunk) => results.extend(chunk),
                None => {
                    return Err(PipelineError::WorkerFault {
                        phase: self.phase,
                        reason: format!("task {index} never reported its results"),
                    })
                }
            }
        }
        Ok(results)
    }

    /// Stop the remaining tasks and wait for them to finish.
    async fn shutdown<R: 'static>(&self, tasks: &mut JoinSet<ChunkOutput<R>>) {
        self.cancel.cancel();
        tasks.abort_all();
        while tasks.join_next().await.is_some() {}
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Split `items` into at most `workers` contiguous, non-empty chunks.
fn partition<T>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    let chunk_size = items.len().div_ceil(workers.max(1)).max(1);
    let mut chunks = Vec::with_capacity(items.len().div_ceil(chunk_size));
    let mut items = items.into_iter();
    loop {
        let chunk: Vec<T> = items.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }
    chunks
}

fn run_chunk<T, R, F>(
    index: usize,
    chunk: Vec<T>,
    f: &F,
    cancel: &CancellationToken,
) -> ChunkOutput<R>
where
    F: Fn(T) -> R,
{
    let mut results = Vec::with_capacity(chunk.len());
    for item in chunk {
        if cancel.is_cancelled() {
            return (index, None);
        }
        results.push(f(item));
    }
    (index, Some(results))
}

/// Run a single blocking step of `phase` off the async executor.
pub(crate) async fn run_blocking<R, F>(phase: Phase, f: F) -> Result<R>
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    task::spawn_blocking(f).await.map_err(|err| {
        let reason = join_error_reason(err);
        error!("{} step failed: {}", phase, reason);
        PipelineError::WorkerFault { phase, reason }
    })
}

fn join_error_reason(err: JoinError) -> String {
    if err.is_cancelled() {
        return "task was aborted".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => panic_message(payload.as_ref()),
        Err(err) => err.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("task panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("task panicked: {msg}")
    } else {
        "task panicked".to_string()
    }
}
