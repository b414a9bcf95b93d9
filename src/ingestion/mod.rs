//! Dataset loading.
//!
//! Most callers should use [`load_dataset`] (from [`loader`]) which:
//!
//! - parses the sales CSV into an in-memory [`crate::types::DataSet`] using [`sales_schema`]
//! - wraps it in an `Arc` for read-only sharing across requests
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! The raw CSV functions are available under [`csv`].

pub mod csv;
pub mod loader;
pub mod observability;

pub use loader::{
    load_dataset, sales_schema, LoadOptions, CATEGORY_COLUMN, DATE_COLUMN, PRODUCT_ID_COLUMN,
};
pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
