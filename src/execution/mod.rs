//! Parallel batch execution.
//!
//! Rows are independent, so a batch can be split into chunks and processed on a rayon pool.
//! The pool's thread count bounds how many chunks run at once. Chunk results are concatenated
//! in chunk order, so the output is identical to [`crate::processing::run_rows`]: same accepted
//! records, same diagnostics, same positions.

mod observer;

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{PipelineError, PipelineResult};
use crate::processing::batch::outcome_for;
use crate::processing::RowRules;
use crate::types::{ProcessingResult, SourceRow};

pub use observer::{ExecutionEvent, ExecutionMetrics, ExecutionObserver, RunMetrics, TracingExecutionObserver};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Worker threads. `None` uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Rows per chunk.
    pub chunk_size: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            chunk_size: 4_096,
        }
    }
}

/// Runs the row processor over a dedicated worker pool.
pub struct ExecutionEngine {
    pool: ThreadPool,
    chunk_size: usize,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Build the pool. Fails on `chunk_size == 0`, `num_threads == Some(0)`, or if rayon
    /// cannot start the threads.
    pub fn new(opts: ExecutionOptions) -> PipelineResult<Self> {
        if opts.chunk_size == 0 {
            return Err(PipelineError::configuration("chunk_size must be > 0"));
        }
        if opts.num_threads == Some(0) {
            return Err(PipelineError::configuration("num_threads must be > 0 when set"));
        }

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("movie-refinery-{i}"));
        if let Some(n) = opts.num_threads {
            builder = builder.num_threads(n);
        }

        Ok(Self {
            pool: builder.build()?,
            chunk_size: opts.chunk_size,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::default()),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Live counters for the latest run.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Process adapter rows in parallel chunks, preserving input order.
    pub fn process_parallel(&self, rows: &[SourceRow], rules: &RowRules) -> ProcessingResult {
        let start = Instant::now();
        let chunks = chunk_ranges(rows.len(), self.chunk_size);
        self.metrics.start_run();
        self.emit(&ExecutionEvent::RunStarted {
            rows: rows.len(),
            chunks: chunks.len(),
        });

        let per_chunk: Vec<ProcessingResult> = self.pool.install(|| {
            chunks
                .into_par_iter()
                .map(|range| self.process_chunk(rows, range, rules))
                .collect()
        });

        let result = per_chunk
            .into_iter()
            .fold(ProcessingResult::default(), |mut acc, chunk| {
                acc.append(chunk);
                acc
            });

        self.metrics.finish_run(start.elapsed());
        self.emit(&ExecutionEvent::RunFinished {
            metrics: self.metrics.snapshot(),
        });
        result
    }

    fn process_chunk(&self, rows: &[SourceRow], range: Range<usize>, rules: &RowRules) -> ProcessingResult {
        let start_row = range.start;
        let mut out = ProcessingResult::default();
        for (position, row) in range.clone().zip(&rows[range]) {
            out.record(position, outcome_for(row, rules));
        }

        self.metrics.record_chunk(&out);
        self.emit(&ExecutionEvent::ChunkFinished {
            start_row,
            accepted: out.accepted.len(),
            skipped: out.diagnostics.len(),
        });
        out
    }

    fn emit(&self, event: &ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(event);
        }
    }
}

fn chunk_ranges(row_count: usize, chunk_size: usize) -> Vec<Range<usize>> {
    (0..row_count)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(row_count))
        .collect()
}
