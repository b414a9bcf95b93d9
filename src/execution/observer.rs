use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Events emitted by the [`super::ExecutionEngine`] during a parallel filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    FilterStarted { input_rows: usize, chunks: usize },
    ChunkFinished {
        start_row: usize,
        input_rows: usize,
        output_rows: usize,
    },
    FilterFinished { output_rows: usize, elapsed: Duration },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// Logs execution events at debug level through `tracing`.
#[derive(Debug, Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::FilterStarted { input_rows, chunks } => {
                tracing::debug!(input_rows, chunks, "parallel filter started");
            }
            ExecutionEvent::ChunkFinished {
                start_row,
                input_rows,
                output_rows,
            } => {
                tracing::trace!(start_row, input_rows, output_rows, "chunk filtered");
            }
            ExecutionEvent::FilterFinished {
                output_rows,
                elapsed,
            } => {
                tracing::debug!(output_rows, elapsed = ?elapsed, "parallel filter finished");
            }
        }
    }
}

/// Cumulative counters across every run of an engine.
///
/// The engine is shared by concurrent requests, so counters only ever grow; callers snapshot and
/// diff them if they need per-run figures.
#[derive(Debug, Default)]
pub struct ExecutionMetrics {
    runs: AtomicU64,
    rows_scanned: AtomicU64,
    rows_kept: AtomicU64,
    chunks: AtomicU64,
    elapsed_ns: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_chunk(&self, input_rows: usize, output_rows: usize) {
        self.chunks.fetch_add(1, Ordering::Relaxed);
        self.rows_scanned.fetch_add(input_rows as u64, Ordering::Relaxed);
        self.rows_kept.fetch_add(output_rows as u64, Ordering::Relaxed);
    }

    pub(crate) fn on_run_finished(&self, elapsed: Duration) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        let ns = elapsed.as_nanos().min(u64::MAX as u128) as u64;
        self.elapsed_ns.fetch_add(ns, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        ExecutionMetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            rows_scanned: self.rows_scanned.load(Ordering::Relaxed),
            rows_kept: self.rows_kept.load(Ordering::Relaxed),
            chunks: self.chunks.load(Ordering::Relaxed),
            elapsed: Duration::from_nanos(self.elapsed_ns.load(Ordering::Relaxed)),
        }
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionMetricsSnapshot {
    pub runs: u64,
    pub rows_scanned: u64,
    pub rows_kept: u64,
    pub chunks: u64,
    pub elapsed: Duration,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runs={}, rows_scanned={}, rows_kept={}, chunks={}, elapsed={:?}",
            self.runs, self.rows_scanned, self.rows_kept, self.chunks, self.elapsed
        )
    }
}
