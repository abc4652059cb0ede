use std::future::Future;

use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tracing::debug;

use super::errors::RestoreError;

/// Bounded set of worker threads running move tasks.
///
/// Owned by one restore run. Dropping the pool shuts the runtime down, so it
/// must be dropped outside any async context.
pub struct WorkerPool {
    runtime: Runtime,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, RestoreError> {
        let workers = workers.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("xsm-mover")
            .enable_time()
            .build()
            .map_err(|e| RestoreError::WorkerPoolFailed {
                message: e.to_string(),
            })?;

        debug!(event = "core.restore.pool_started", workers = workers);
        Ok(Self { runtime, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(task)
    }

    /// Drive `future` to completion on the calling thread.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
