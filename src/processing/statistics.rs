//! Descriptive statistics over numeric [`crate::types::DataSet`] columns.
//!
//! [`summarize`] computes a [`ColumnSummary`] for each requested [`MeasureColumn`] that exists in
//! the dataset schema. The individual statistics are exposed as free functions over `f64` slices.
//!
//! Conventions:
//!
//! - Nulls (and NaN) are ignored; integer columns are widened to `f64`.
//! - Every statistic except `mode` is rounded to one decimal place with round-half-to-even.
//! - `mode` ties resolve to the smallest value.
//! - `std_dev` is the sample standard deviation (N-1 divisor) and is `None` for a single value.
//! - Percentiles interpolate linearly between the two closest ranks.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ServiceResult, SummaryError};
use crate::request::MeasureColumn;
use crate::types::{DataSet, Value};

/// Summary statistics of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub mean: f64,
    pub median: f64,
    pub mode: Option<f64>,
    pub std_dev: Option<f64>,
    pub percentile_25: f64,
    pub percentile_75: f64,
}

/// Column summaries in request order.
///
/// Serializes as a plain `{ "<column>": { ... } }` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryResult {
    entries: Vec<(MeasureColumn, ColumnSummary)>,
}

impl SummaryResult {
    pub fn get(&self, column: MeasureColumn) -> Option<&ColumnSummary> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, s)| s)
    }

    pub fn columns(&self) -> impl Iterator<Item = MeasureColumn> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeasureColumn, &ColumnSummary)> {
        self.entries.iter().map(|(c, s)| (*c, s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SummaryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, summary) in &self.entries {
            map.serialize_entry(column.as_str(), summary)?;
        }
        map.end()
    }
}

/// Summarize each requested column of `dataset`.
///
/// Columns missing from the schema are skipped. The dataset must have at least one row; empty
/// results are expected to be rejected by the caller before reaching this point.
pub fn summarize(dataset: &DataSet, columns: &[MeasureColumn]) -> ServiceResult<SummaryResult> {
    if dataset.is_empty() {
        return Err(SummaryError::internal("summarize called on an empty dataset"));
    }

    let mut entries = Vec::with_capacity(columns.len());
    for &column in columns {
        if let Some(summary) = summarize_column(dataset, column.as_str())? {
            entries.push((column, summary));
        }
    }
    Ok(SummaryResult { entries })
}

/// Summarize one column by name; `Ok(None)` if the schema has no such column.
pub fn summarize_column(dataset: &DataSet, column: &str) -> ServiceResult<Option<ColumnSummary>> {
    let Some(idx) = dataset.schema.index_of(column) else {
        return Ok(None);
    };
    let data_type = &dataset.schema.fields[idx].data_type;
    if !data_type.is_numeric() {
        return Err(SummaryError::internal(format!(
            "column '{column}' has non-numeric type {data_type:?}"
        )));
    }

    let mut values = numeric_values(dataset, idx);
    if values.is_empty() {
        return Err(SummaryError::internal(format!(
            "column '{column}' has no numeric values"
        )));
    }
    values.sort_by(f64::total_cmp);

    let stat = |name: &str, v: Option<f64>| {
        v.map(round_one_decimal).ok_or_else(|| {
            SummaryError::internal(format!("{name} of column '{column}' is undefined"))
        })
    };
    Ok(Some(ColumnSummary {
        mean: stat("mean", mean(&values))?,
        median: stat("median", median(&values))?,
        mode: mode(&values),
        std_dev: sample_std_dev(&values).map(round_one_decimal),
        percentile_25: stat("percentile_25", percentile_linear(&values, 25.0))?,
        percentile_75: stat("percentile_75", percentile_linear(&values, 75.0))?,
    }))
}

fn numeric_values(dataset: &DataSet, idx: usize) -> Vec<f64> {
    dataset.reduce_rows(Vec::with_capacity(dataset.row_count()), |mut acc, row| {
        if let Some(v) = row.get(idx).and_then(Value::as_f64) {
            acc.push(v);
        }
        acc
    })
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of values sorted ascending.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Most frequent value of values sorted ascending; ties resolve to the smallest value.
pub fn mode(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count();
        // Strictly greater keeps the earlier (smaller) value on ties.
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(value, _)| value)
}

/// Sample standard deviation (N-1 divisor). `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Percentile `p` (0..=100) of values sorted ascending, interpolating linearly between the two
/// closest ranks.
pub fn percentile_linear(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Round to one decimal place, ties to even.
pub fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{
        mean, median, mode, percentile_linear, round_one_decimal, sample_std_dev, summarize,
        summarize_column, ColumnSummary,
    };
    use crate::error::SummaryError;
    use crate::request::MeasureColumn;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn measures(qty: &[f64], price: &[Option<f64>]) -> DataSet {
        let schema = Schema::new(vec![
            Field::new("quantity_sold", DataType::Float64),
            Field::new("price_per_unit", DataType::Float64),
        ]);
        let rows = qty
            .iter()
            .zip(price)
            .map(|(q, p)| {
                vec![
                    Value::Float64(*q),
                    p.map(Value::Float64).unwrap_or(Value::Null),
                ]
            })
            .collect();
        DataSet::new(schema, rows)
    }

    #[test]
    fn mean_and_median() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 10.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn mode_prefers_highest_count_then_smallest_value() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mode(&[1.0, 1.0, 5.0, 5.0]), Some(1.0));
        assert_eq!(mode(&[3.0, 4.0, 7.0]), Some(3.0));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn std_dev_uses_sample_divisor() {
        // sum of squared deviations = 32, n-1 = 7
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = sample_std_dev(&v).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_std_dev(&[42.0]), None);
    }

    #[test]
    fn linear_percentiles() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_linear(&v, 25.0), Some(1.75));
        assert_eq!(percentile_linear(&v, 75.0), Some(3.25));
        assert_eq!(percentile_linear(&v, 0.0), Some(1.0));
        assert_eq!(percentile_linear(&v, 100.0), Some(4.0));
        assert_eq!(percentile_linear(&[7.0], 25.0), Some(7.0));
        assert_eq!(percentile_linear(&v, 101.0), None);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(round_one_decimal(2.25), 2.2);
        assert_eq!(round_one_decimal(2.75), 2.8);
        assert_eq!(round_one_decimal(1.04), 1.0);
        assert_eq!(round_one_decimal(-1.06), -1.1);
    }

    #[test]
    fn summarize_rounds_everything_but_mode() {
        let ds = measures(
            &[1.0, 2.0, 3.0, 4.0],
            &[Some(1.23), Some(1.23), Some(2.0), Some(3.0)],
        );
        let out = summarize(&ds, &MeasureColumn::ALL).unwrap();

        assert_eq!(
            out.get(MeasureColumn::QuantitySold),
            Some(&ColumnSummary {
                mean: 2.5,
                median: 2.5,
                mode: Some(1.0),
                std_dev: Some(1.3),
                percentile_25: 1.8,
                percentile_75: 3.2,
            })
        );
        let price = out.get(MeasureColumn::PricePerUnit).unwrap();
        assert_eq!(price.mode, Some(1.23));
        assert_eq!(price.mean, 1.9);
    }

    #[test]
    fn nulls_are_ignored() {
        let ds = measures(&[1.0, 2.0, 3.0], &[Some(10.0), None, Some(20.0)]);
        let price = summarize_column(&ds, "price_per_unit").unwrap().unwrap();
        assert_eq!(price.mean, 15.0);
        assert_eq!(price.median, 15.0);
    }

    #[test]
    fn single_value_has_no_std_dev() {
        let ds = measures(&[100.0], &[Some(10.0)]);
        let q = summarize_column(&ds, "quantity_sold").unwrap().unwrap();
        assert_eq!(q.std_dev, None);
        assert_eq!(q.mean, 100.0);
        assert_eq!(q.percentile_25, 100.0);
    }

    #[test]
    fn absent_columns_are_skipped() {
        let schema = Schema::new(vec![Field::new("quantity_sold", DataType::Int64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Int64(5)], vec![Value::Int64(7)]]);
        let out = summarize(&ds, &MeasureColumn::ALL).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.columns().collect::<Vec<_>>(), vec![MeasureColumn::QuantitySold]);
        assert_eq!(out.get(MeasureColumn::QuantitySold).unwrap().mean, 6.0);
    }

    #[test]
    fn shape_problems_are_internal_errors() {
        let schema = Schema::new(vec![Field::new("quantity_sold", DataType::Utf8)]);
        let ds = DataSet::new(schema, vec![vec![Value::Utf8("x".to_string())]]);
        assert!(matches!(
            summarize(&ds, &MeasureColumn::ALL),
            Err(SummaryError::Internal { .. })
        ));

        let all_null = measures(&[1.0], &[None]);
        assert!(matches!(
            summarize_column(&all_null, "price_per_unit"),
            Err(SummaryError::Internal { .. })
        ));

        let empty = measures(&[], &[]);
        assert!(matches!(
            summarize(&empty, &MeasureColumn::ALL),
            Err(SummaryError::Internal { .. })
        ));
    }

    #[test]
    fn nan_cells_are_never_summarized_as_nan() {
        let ds = measures(&[f64::NAN, 4.0, f64::NAN], &[Some(f64::NAN), None, Some(f64::NAN)]);
        let q = summarize_column(&ds, "quantity_sold").unwrap().unwrap();
        for v in [q.mean, q.median, q.percentile_25, q.percentile_75] {
            assert_eq!(v, 4.0);
        }
        assert_eq!(q.std_dev, None);

        let err = summarize_column(&ds, "price_per_unit").unwrap_err();
        assert!(matches!(err, SummaryError::Internal { .. }));
    }

    #[test]
    fn serializes_as_plain_mapping_in_request_order() {
        let ds = measures(&[100.0], &[Some(10.0)]);
        let out = summarize(
            &ds,
            &[MeasureColumn::PricePerUnit, MeasureColumn::QuantitySold],
        )
        .unwrap();
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.starts_with(r#"{"price_per_unit":{"mean":10.0"#), "{json}");
        assert!(json.contains(r#""std_dev":null"#));
        assert!(!json.contains("summary"));
    }
}
