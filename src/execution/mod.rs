//! Parallel execution of row filters over large datasets.
//!
//! This module sits "above" [`crate::processing`]: the [`ExecutionEngine`] splits a
//! [`DataSet`] into row chunks, filters them on a dedicated rayon pool and stitches the kept rows
//! back together in original order, so the output is identical to a sequential
//! [`crate::processing::filter()`].

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::types::{DataSet, Value};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver,
    TracingExecutionObserver,
};

/// Errors building an [`ExecutionEngine`].
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("invalid execution options: {message}")]
    InvalidOptions { message: String },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Number of worker threads. `None` uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of rows per chunk.
    pub chunk_size: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            chunk_size: 8_192,
        }
    }
}

/// A chunked, parallel filter engine backed by its own rayon pool.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("threads", &self.pool.current_num_threads())
            .field("opts", &self.opts)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl ExecutionEngine {
    pub fn new(opts: ExecutionOptions) -> Result<Self, ExecutionError> {
        if opts.chunk_size == 0 {
            return Err(ExecutionError::InvalidOptions {
                message: "chunk_size must be > 0".to_string(),
            });
        }
        if opts.num_threads == Some(0) {
            return Err(ExecutionError::InvalidOptions {
                message: "num_threads must be > 0 when set".to_string(),
            });
        }

        let n_threads = opts.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("summary-exec-{i}"))
            .build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Handle to the engine's cumulative metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.opts
    }

    /// Filter `dataset` in parallel chunks. Kept rows stay in their original order.
    pub fn filter_parallel<F>(&self, dataset: &DataSet, predicate: F) -> DataSet
    where
        F: Fn(&[Value]) -> bool + Send + Sync,
    {
        self.pool.install(|| self.filter_parallel_impl(dataset, &predicate))
    }

    fn filter_parallel_impl(
        &self,
        dataset: &DataSet,
        predicate: &(dyn Fn(&[Value]) -> bool + Send + Sync),
    ) -> DataSet {
        let start = Instant::now();
        let ranges = chunk_ranges(dataset.row_count(), self.opts.chunk_size);
        self.emit(ExecutionEvent::FilterStarted {
            input_rows: dataset.row_count(),
            chunks: ranges.len(),
        });

        let per_chunk: Vec<Vec<Vec<Value>>> = ranges
            .into_par_iter()
            .map(|range| {
                let start_row = range.start;
                let input = &dataset.rows[range];
                let kept: Vec<Vec<Value>> = input
                    .iter()
                    .filter(|row| predicate(row.as_slice()))
                    .cloned()
                    .collect();

                self.metrics.on_chunk(input.len(), kept.len());
                self.emit(ExecutionEvent::ChunkFinished {
                    start_row,
                    input_rows: input.len(),
                    output_rows: kept.len(),
                });
                kept
            })
            .collect();

        let rows: Vec<Vec<Value>> = per_chunk.into_iter().flatten().collect();
        let output_rows = rows.len();
        let out = DataSet::new(dataset.schema.clone(), rows);

        let elapsed = start.elapsed();
        self.metrics.on_run_finished(elapsed);
        self.emit(ExecutionEvent::FilterFinished {
            output_rows,
            elapsed,
        });
        out
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn chunk_ranges(row_count: usize, chunk_size: usize) -> Vec<std::ops::Range<usize>> {
    let mut out = Vec::with_capacity(row_count.div_ceil(chunk_size));
    let mut start = 0usize;
    while start < row_count {
        let end = (start + chunk_size).min(row_count);
        out.push(start..end);
        start = end;
    }
    out
}
