//! Startup loading of the shared sales dataset.
//!
//! [`load_dataset`] reads the sales CSV once, reports the outcome to an optional
//! [`IngestionObserver`], and hands back an `Arc<DataSet>` that request handlers share read-only.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::IngestionResult;
use crate::types::{DataSet, DataType, Field, Schema};

use super::csv::ingest_csv_from_path;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Name of the calendar date column.
pub const DATE_COLUMN: &str = "date";
/// Name of the product category column.
pub const CATEGORY_COLUMN: &str = "category";
/// Name of the product id column.
pub const PRODUCT_ID_COLUMN: &str = "product_id";

/// Schema of the sales dataset file.
///
/// Only these columns are read; any other columns in the file are ignored.
pub fn sales_schema() -> Schema {
    Schema::new(vec![
        Field::new(DATE_COLUMN, DataType::Date),
        Field::new(CATEGORY_COLUMN, DataType::Utf8),
        Field::new(PRODUCT_ID_COLUMN, DataType::Int64),
        Field::new("quantity_sold", DataType::Float64),
        Field::new("price_per_unit", DataType::Float64),
    ])
}

/// Options controlling dataset loading.
#[derive(Clone)]
pub struct LoadOptions {
    /// Schema to parse the file with. Defaults to [`sales_schema`].
    pub schema: Schema,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("schema_fields", &self.schema.fields.len())
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            schema: sales_schema(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Load the dataset file at `path`.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use sales_summary::ingestion::{load_dataset, LoadOptions, TracingObserver};
///
/// # fn main() -> Result<(), sales_summary::IngestionError> {
/// let opts = LoadOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     ..Default::default()
/// };
/// let dataset = load_dataset("data/sales_data.csv", &opts)?;
/// println!("rows={}", dataset.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_dataset(path: impl AsRef<Path>, options: &LoadOptions) -> IngestionResult<Arc<DataSet>> {
    let path = path.as_ref();
    let ctx = IngestionContext {
        path: path.to_path_buf(),
    };

    let result = ingest_csv_from_path(path, &options.schema);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(&ctx, IngestionStats { rows: ds.row_count() }),
            Err(e) => {
                let sev = IngestionSeverity::for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.map(Arc::new)
}
