//! `sales-summary` computes descriptive statistics over an in-memory sales [`types::DataSet`],
//! after applying optional date-range, category and product-id filters.
//!
//! The dataset is loaded once at startup (see [`ingestion::load_dataset`]) and shared read-only
//! by every request. A request names the measure columns to summarize and, optionally, the
//! filters to apply first; the answer maps each column to its mean, median, mode, sample standard
//! deviation and 25th/75th percentiles.
//!
//! ## Pipeline
//!
//! 1. [`request::SummaryRequest::validate`]: column allow-list ([`request::MeasureColumn`]) and
//!    filter checks (date format and order, non-negative product ids).
//! 2. [`processing::apply_filters`]: conjunctive row filters; the input is never mutated.
//! 3. Zero rows left → [`SummaryError::NotFound`].
//! 4. [`processing::summarize`]: per-column statistics, rounded to one decimal place
//!    (round-half-to-even), `mode` unrounded.
//!
//! [`service::SummaryService`] runs these steps; [`http::router`] exposes them as
//! `POST /summary`.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use sales_summary::ingestion::sales_schema;
//! use sales_summary::processing::FilterSpec;
//! use sales_summary::request::{MeasureColumn, SummaryRequest};
//! use sales_summary::service::SummaryService;
//! use sales_summary::types::{DataSet, Value};
//! use sales_summary::SummaryError;
//!
//! let row = |m, cat: &str, pid, qty, price| {
//!     vec![
//!         Value::Date(NaiveDate::from_ymd_opt(2023, m, 1).unwrap()),
//!         Value::Utf8(cat.to_string()),
//!         Value::Int64(pid),
//!         Value::Float64(qty),
//!         Value::Float64(price),
//!     ]
//! };
//! let dataset = DataSet::new(
//!     sales_schema(),
//!     vec![row(1, "A", 1, 100.0, 10.0), row(2, "B", 2, 200.0, 20.0)],
//! );
//! let service = SummaryService::new(Arc::new(dataset));
//!
//! let request = SummaryRequest::for_columns(["quantity_sold"]).with_filters(FilterSpec {
//!     category: Some(vec!["A".to_string()]),
//!     ..Default::default()
//! });
//! let summary = service.summarize(&request).unwrap();
//! let qty = summary.get(MeasureColumn::QuantitySold).unwrap();
//! assert_eq!(qty.mean, 100.0);
//! assert_eq!(qty.std_dev, None);
//!
//! let nothing = SummaryRequest::default().with_filters(FilterSpec {
//!     product_ids: Some(vec![9999]),
//!     ..Default::default()
//! });
//! assert_eq!(service.summarize(&nothing), Err(SummaryError::NotFound));
//! ```
//!
//! ## Modules
//!
//! - [`types`]: schema + in-memory dataset types
//! - [`ingestion`]: CSV loading of the sales dataset
//! - [`processing`]: filter engine and statistics engine
//! - [`execution`]: chunked parallel filtering for large datasets
//! - [`request`]: request model and validation
//! - [`service`]: request orchestration
//! - [`http`]: `POST /summary` router
//! - [`config`]: TOML configuration
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod execution;
pub mod http;
pub mod ingestion;
pub mod processing;
pub mod request;
pub mod service;
pub mod types;

pub use error::{IngestionError, IngestionResult, ServiceResult, SummaryError};
