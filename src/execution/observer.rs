use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::types::ProcessingResult;

/// Progress of a parallel run.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { rows: usize, chunks: usize },
    /// A chunk finished; `start_row` is the position of its first row in the input.
    ChunkFinished {
        start_row: usize,
        accepted: usize,
        skipped: usize,
    },
    RunFinished { metrics: RunMetrics },
}

/// Receives [`ExecutionEvent`]s. Chunk events arrive from worker threads in any order.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Logs execution events through `tracing` at DEBUG.
#[derive(Debug, Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunStarted { rows, chunks } => {
                tracing::debug!(rows, chunks, "parallel run started")
            }
            ExecutionEvent::ChunkFinished {
                start_row,
                accepted,
                skipped,
            } => tracing::trace!(start_row, accepted, skipped, "chunk finished"),
            ExecutionEvent::RunFinished { metrics } => tracing::debug!(%metrics, "parallel run finished"),
        }
    }
}

/// Counters for the latest run of an engine, readable while it runs.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    runs: AtomicU64,
    chunks: AtomicU64,
    rows_accepted: AtomicU64,
    rows_skipped: AtomicU64,
    elapsed_us: AtomicU64,
}

impl ExecutionMetrics {
    pub(crate) fn start_run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        for counter in [&self.chunks, &self.rows_accepted, &self.rows_skipped, &self.elapsed_us] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_chunk(&self, chunk: &ProcessingResult) {
        self.chunks.fetch_add(1, Ordering::Relaxed);
        self.rows_accepted
            .fetch_add(chunk.accepted.len() as u64, Ordering::Relaxed);
        self.rows_skipped
            .fetch_add(chunk.diagnostics.len() as u64, Ordering::Relaxed);
    }

    pub(crate) fn finish_run(&self, elapsed: Duration) {
        let us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.elapsed_us.store(us, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunMetrics {
        RunMetrics {
            runs: self.runs.load(Ordering::Relaxed),
            chunks: self.chunks.load(Ordering::Relaxed),
            rows_accepted: self.rows_accepted.load(Ordering::Relaxed),
            rows_skipped: self.rows_skipped.load(Ordering::Relaxed),
            elapsed: Duration::from_micros(self.elapsed_us.load(Ordering::Relaxed)),
        }
    }
}

/// Point-in-time copy of [`ExecutionMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunMetrics {
    /// Runs started on this engine so far.
    pub runs: u64,
    pub chunks: u64,
    pub rows_accepted: u64,
    pub rows_skipped: u64,
    /// Zero until the run finishes.
    pub elapsed: Duration,
}

impl RunMetrics {
    pub fn rows(&self) -> u64 {
        self.rows_accepted + self.rows_skipped
    }
}

impl fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row(s) in {} chunk(s): {} accepted, {} skipped in {:?}",
            self.rows(),
            self.chunks,
            self.rows_accepted,
            self.rows_skipped,
            self.elapsed
        )
    }
}
