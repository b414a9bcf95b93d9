//! In-memory filter-and-aggregate pipeline.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion and
//! never mutates its input.
//!
//! - [`filter()`] / [`apply_filters`]: row filtering by predicate or by [`FilterSpec`]
//! - [`summarize`]: per-column descriptive statistics
//!
//! ## Example: filter → summarize
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sales_summary::processing::{apply_filters, summarize, FilterSpec};
//! use sales_summary::request::MeasureColumn;
//! use sales_summary::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("date", DataType::Date),
//!     Field::new("category", DataType::Utf8),
//!     Field::new("product_id", DataType::Int64),
//!     Field::new("quantity_sold", DataType::Float64),
//! ]);
//! let day = |d| Value::Date(NaiveDate::from_ymd_opt(2023, 1, d).unwrap());
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![day(1), Value::Utf8("A".into()), Value::Int64(1), Value::Float64(10.0)],
//!         vec![day(2), Value::Utf8("B".into()), Value::Int64(2), Value::Float64(20.0)],
//!         vec![day(3), Value::Utf8("A".into()), Value::Int64(3), Value::Float64(30.0)],
//!     ],
//! );
//!
//! let spec = FilterSpec {
//!     category: Some(vec!["A".to_string()]),
//!     ..Default::default()
//! };
//! let filtered = apply_filters(&ds, Some(&spec)).unwrap();
//! let summary = summarize(&filtered, &[MeasureColumn::QuantitySold]).unwrap();
//!
//! let qty = summary.get(MeasureColumn::QuantitySold).unwrap();
//! assert_eq!(qty.mean, 20.0);
//! assert_eq!(qty.percentile_75, 25.0);
//! ```

pub mod filter;
pub mod statistics;

pub use filter::{apply_filters, filter, CompiledFilter, DateBounds, DateRange, FilterSpec, RowPredicate};
pub use statistics::{summarize, summarize_column, ColumnSummary, SummaryResult};
