//! Request model for the summary endpoint.
//!
//! A [`SummaryRequest`] is what arrives on the wire. [`SummaryRequest::validate`] checks the
//! column allow-list and the filters and produces a [`ValidatedRequest`]; nothing touches the
//! dataset until validation has passed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ServiceResult, SummaryError};
use crate::processing::filter::{CompiledFilter, FilterSpec};

/// Numeric dataset columns that can be summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureColumn {
    QuantitySold,
    PricePerUnit,
}

impl MeasureColumn {
    /// Every summarizable column, in default request order.
    pub const ALL: [MeasureColumn; 2] = [MeasureColumn::QuantitySold, MeasureColumn::PricePerUnit];

    /// Column name in the dataset and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QuantitySold => "quantity_sold",
            Self::PricePerUnit => "price_per_unit",
        }
    }

    fn allowed_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl fmt::Display for MeasureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasureColumn {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                SummaryError::validation(format!(
                    "Invalid column: {s}. Must be one of {:?}.",
                    Self::allowed_names()
                ))
            })
    }
}

/// Body of a summary request.
///
/// `columns: None` (or a missing field) means every [`MeasureColumn`]; `filters: None` means no
/// filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub filters: Option<FilterSpec>,
}

/// A request whose columns and filters passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Requested columns in request order, duplicates removed.
    pub columns: Vec<MeasureColumn>,
    pub filter: CompiledFilter,
}

impl SummaryRequest {
    /// Request for the given columns with no filters.
    pub fn for_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: Some(columns.into_iter().map(Into::into).collect()),
            filters: None,
        }
    }

    pub fn with_filters(mut self, filters: FilterSpec) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn validate(&self) -> ServiceResult<ValidatedRequest> {
        let columns = match &self.columns {
            None => MeasureColumn::ALL.to_vec(),
            Some(names) => {
                let mut out: Vec<MeasureColumn> = Vec::with_capacity(names.len());
                for name in names {
                    let column = name.parse::<MeasureColumn>()?;
                    if !out.contains(&column) {
                        out.push(column);
                    }
                }
                out
            }
        };

        let filter = match &self.filters {
            Some(spec) => spec.compile()?,
            None => CompiledFilter::default(),
        };

        Ok(ValidatedRequest { columns, filter })
    }
}
