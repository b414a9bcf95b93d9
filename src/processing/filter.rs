//! Row filtering for [`crate::types::DataSet`].
//!
//! [`filter()`] is the generic predicate wrapper. [`apply_filters`] is the sales filter engine:
//! it validates a [`FilterSpec`] into a [`CompiledFilter`], binds it to the dataset schema and
//! keeps the rows that satisfy every requested condition.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceResult, SummaryError};
use crate::ingestion::csv::{parse_date, DATE_FORMAT};
use crate::ingestion::{CATEGORY_COLUMN, DATE_COLUMN, PRODUCT_ID_COLUMN};
use crate::types::{DataSet, Schema, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// Inclusive date bounds as sent by a client, in `YYYY-MM-DD` form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Optional filters applied before summarizing.
///
/// Every present filter narrows the row set; absent (or empty) filters keep every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub category: Option<Vec<String>>,
    #[serde(default)]
    pub product_ids: Option<Vec<i64>>,
}

/// Parsed date bounds; `None` on a side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl DateRange {
    /// Parse both bounds and check their order.
    pub fn parse(&self) -> ServiceResult<DateBounds> {
        let start = parse_bound(self.start_date.as_deref())?;
        let end = parse_bound(self.end_date.as_deref())?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(SummaryError::validation(format!(
                    "start_date must be before end_date (start_date={s}, end_date={e})."
                )));
            }
        }
        Ok(DateBounds { start, end })
    }
}

/// Request bounds must be exactly `YYYY-MM-DD`: no surrounding whitespace, no time part.
/// Only an absent bound is unbounded; an empty string is invalid.
fn parse_bound(raw: Option<&str>) -> ServiceResult<Option<NaiveDate>> {
    let Some(s) = raw else {
        return Ok(None);
    };
    let invalid = || {
        SummaryError::validation(format!(
            "Invalid date format '{s}'. Expected YYYY-MM-DD for both start_date and end_date."
        ))
    };
    // chrono skips leading whitespace before numeric fields.
    if s.trim() != s {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map(Some)
        .map_err(|_| invalid())
}

/// A validated [`FilterSpec`], ready to be bound to a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledFilter {
    pub dates: Option<DateBounds>,
    pub categories: Option<HashSet<String>>,
    pub product_ids: Option<HashSet<i64>>,
}

impl FilterSpec {
    /// Validate every field without touching any data.
    pub fn compile(&self) -> ServiceResult<CompiledFilter> {
        let dates = match &self.date_range {
            Some(range) => Some(range.parse()?).filter(|b| !b.is_unbounded()),
            None => None,
        };

        let categories = self
            .category
            .as_ref()
            .filter(|c| !c.is_empty())
            .map(|c| c.iter().cloned().collect::<HashSet<_>>());

        let product_ids = match self.product_ids.as_ref().filter(|p| !p.is_empty()) {
            Some(ids) => {
                if let Some(bad) = ids.iter().find(|id| **id < 0) {
                    return Err(SummaryError::validation(format!(
                        "product_ids must not be negative, found: {bad}."
                    )));
                }
                Some(ids.iter().copied().collect::<HashSet<_>>())
            }
            None => None,
        };

        Ok(CompiledFilter {
            dates,
            categories,
            product_ids,
        })
    }
}

impl CompiledFilter {
    /// True when no condition is active and every row would be kept.
    pub fn is_identity(&self) -> bool {
        self.dates.is_none() && self.categories.is_none() && self.product_ids.is_none()
    }

    /// Resolve the filter's columns against `schema`.
    ///
    /// A requested condition on a column the dataset does not have is an unexpected data shape
    /// and reported as an internal error.
    pub fn bind(&self, schema: &Schema) -> ServiceResult<RowPredicate<'_>> {
        let column = |active: bool, name: &str| -> ServiceResult<Option<usize>> {
            if !active {
                return Ok(None);
            }
            schema.index_of(name).map(Some).ok_or_else(|| {
                SummaryError::internal(format!("dataset has no '{name}' column to filter on"))
            })
        };

        Ok(RowPredicate {
            filter: self,
            date_idx: column(self.dates.is_some(), DATE_COLUMN)?,
            category_idx: column(self.categories.is_some(), CATEGORY_COLUMN)?,
            product_idx: column(self.product_ids.is_some(), PRODUCT_ID_COLUMN)?,
        })
    }

    /// Keep the rows of `dataset` that satisfy every active condition.
    pub fn apply(&self, dataset: &DataSet) -> ServiceResult<DataSet> {
        if self.is_identity() {
            return Ok(dataset.clone());
        }
        let predicate = self.bind(&dataset.schema)?;
        Ok(filter(dataset, |row| predicate.matches(row)))
    }
}

/// A [`CompiledFilter`] bound to column positions of a concrete schema.
#[derive(Debug, Clone, Copy)]
pub struct RowPredicate<'a> {
    filter: &'a CompiledFilter,
    date_idx: Option<usize>,
    category_idx: Option<usize>,
    product_idx: Option<usize>,
}

impl RowPredicate<'_> {
    pub fn matches(&self, row: &[Value]) -> bool {
        if let (Some(bounds), Some(idx)) = (&self.filter.dates, self.date_idx) {
            let date = match row.get(idx) {
                Some(Value::Date(d)) => Some(*d),
                // String-typed date columns are normalized on the fly.
                Some(Value::Utf8(s)) => parse_date(s),
                _ => None,
            };
            if !date.is_some_and(|d| bounds.contains(d)) {
                return false;
            }
        }

        if let (Some(categories), Some(idx)) = (&self.filter.categories, self.category_idx) {
            if !matches!(row.get(idx), Some(Value::Utf8(c)) if categories.contains(c)) {
                return false;
            }
        }

        if let (Some(ids), Some(idx)) = (&self.filter.product_ids, self.product_idx) {
            if !matches!(row.get(idx), Some(Value::Int64(id)) if ids.contains(id)) {
                return false;
            }
        }

        true
    }
}

/// Validate `spec` and apply it to `dataset`. `None` returns the full dataset.
///
/// The input dataset is never modified; the result is a new [`DataSet`] (possibly empty).
pub fn apply_filters(dataset: &DataSet, spec: Option<&FilterSpec>) -> ServiceResult<DataSet> {
    match spec {
        Some(spec) => spec.compile()?.apply(dataset),
        None => Ok(dataset.clone()),
    }
}
