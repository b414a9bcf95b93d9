//! Request orchestration: validate → filter → empty check → summarize.

use std::sync::Arc;

use crate::error::{ServiceResult, SummaryError};
use crate::execution::ExecutionEngine;
use crate::processing::filter::CompiledFilter;
use crate::processing::statistics::{summarize, SummaryResult};
use crate::request::SummaryRequest;
use crate::types::DataSet;

/// Default dataset size from which filtering runs on the [`ExecutionEngine`].
pub const DEFAULT_PARALLEL_THRESHOLD_ROWS: usize = 50_000;

/// Computes summaries over a dataset shared read-only by every request.
#[derive(Debug)]
pub struct SummaryService {
    dataset: Arc<DataSet>,
    engine: Option<ExecutionEngine>,
    parallel_threshold_rows: usize,
}

impl SummaryService {
    /// Service that filters sequentially.
    pub fn new(dataset: Arc<DataSet>) -> Self {
        Self {
            dataset,
            engine: None,
            parallel_threshold_rows: DEFAULT_PARALLEL_THRESHOLD_ROWS,
        }
    }

    /// Filter on `engine` whenever the dataset has at least `threshold_rows` rows.
    pub fn with_execution(mut self, engine: ExecutionEngine, threshold_rows: usize) -> Self {
        self.engine = Some(engine);
        self.parallel_threshold_rows = threshold_rows;
        self
    }

    pub fn dataset(&self) -> &Arc<DataSet> {
        &self.dataset
    }

    pub fn engine(&self) -> Option<&ExecutionEngine> {
        self.engine.as_ref()
    }

    /// Run the full pipeline for one request.
    ///
    /// - invalid columns or filters → [`SummaryError::Validation`]
    /// - no rows left after filtering → [`SummaryError::NotFound`]
    /// - anything else → [`SummaryError::Internal`], logged with its detail
    pub fn summarize(&self, request: &SummaryRequest) -> ServiceResult<SummaryResult> {
        let result = self.run(request);
        match &result {
            Err(SummaryError::Internal { message }) => {
                tracing::error!(error = %message, "summary request failed");
            }
            Err(err) => tracing::debug!(error = %err, "summary request rejected"),
            Ok(summary) => tracing::debug!(columns = summary.len(), "summary computed"),
        }
        result
    }

    fn run(&self, request: &SummaryRequest) -> ServiceResult<SummaryResult> {
        let validated = request.validate()?;
        let filtered = self.filter(&validated.filter)?;
        if filtered.is_empty() {
            return Err(SummaryError::NotFound);
        }
        summarize(&filtered, &validated.columns)
    }

    fn filter(&self, filter: &CompiledFilter) -> ServiceResult<DataSet> {
        match &self.engine {
            Some(engine)
                if !filter.is_identity()
                    && self.dataset.row_count() >= self.parallel_threshold_rows =>
            {
                let predicate = filter.bind(&self.dataset.schema)?;
                Ok(engine.filter_parallel(&self.dataset, |row| predicate.matches(row)))
            }
            _ => filter.apply(&self.dataset),
        }
    }
}
