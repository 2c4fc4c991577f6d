// Runs one analysis on the blocking pool.
use crate::error::{EngineError, EngineResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked before a job starts. A job already running is not interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub async fn run_job<T, F>(name: &'static str, cancel: &CancelHandle, work: F) -> EngineResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> EngineResult<T> + Send + 'static,
{
    if cancel.is_cancelled() {
        tracing::warn!(job = name, "Job cancelled before it was scheduled");
        return Err(EngineError::Cancelled);
    }

    let flag = cancel.clone();
    let handle = tokio::task::spawn_blocking(move || {
        // The pool may have queued us; honour a cancel that landed in the meantime.
        if flag.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        work()
    });

    let result = handle
        .await
        .map_err(|e| EngineError::ProcessingError(format!("Job '{}' failed to complete: {}", name, e)))?;
    if matches!(result, Err(EngineError::Cancelled)) {
        tracing::warn!(job = name, "Job cancelled before it started");
    }
    result
}
