use std::sync::Arc;

use sales_summary::execution::{ExecutionEngine, ExecutionOptions};
use sales_summary::ingestion::{load_dataset, LoadOptions};
use sales_summary::processing::{ColumnSummary, DateRange, FilterSpec};
use sales_summary::request::{MeasureColumn, SummaryRequest};
use sales_summary::service::SummaryService;
use sales_summary::SummaryError;

fn service() -> SummaryService {
    let ds = load_dataset("tests/fixtures/sales.csv", &LoadOptions::default()).unwrap();
    SummaryService::new(ds)
}

fn dates(start: &str, end: &str) -> FilterSpec {
    FilterSpec {
        date_range: Some(DateRange {
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        }),
        ..Default::default()
    }
}

#[test]
fn unfiltered_summary_over_fixture() {
    let out = service().summarize(&SummaryRequest::default()).unwrap();

    assert_eq!(
        out.get(MeasureColumn::QuantitySold),
        Some(&ColumnSummary {
            // 121.25 is an exact tie and rounds to even.
            mean: 121.2,
            median: 120.0,
            // 120 and 200 both appear twice; the smaller wins.
            mode: Some(120.0),
            std_dev: Some(60.1),
            percentile_25: 75.0,
            percentile_75: 162.5,
        })
    );
    assert!(out.get(MeasureColumn::PricePerUnit).is_some());
}

#[test]
fn category_filter() {
    let req = SummaryRequest::default().with_filters(FilterSpec {
        category: Some(vec!["Electronics".to_string()]),
        ..Default::default()
    });
    let out = service().summarize(&req).unwrap();

    assert_eq!(
        out.get(MeasureColumn::QuantitySold),
        Some(&ColumnSummary {
            mean: 95.0,
            median: 100.0,
            mode: Some(120.0),
            std_dev: Some(30.0),
            percentile_25: 75.0,
            percentile_75: 120.0,
        })
    );
    let price = out.get(MeasureColumn::PricePerUnit).unwrap();
    assert_eq!(price.mean, 21.5);
    assert_eq!(price.median, 17.8);
    assert_eq!(price.mode, Some(5.5));
}

#[test]
fn date_range_filter_is_inclusive() {
    let req = SummaryRequest::for_columns(["quantity_sold"])
        .with_filters(dates("2023-02-03", "2023-03-21"));
    let out = service().summarize(&req).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out.get(MeasureColumn::QuantitySold).unwrap().mean, 122.5);
}

#[test]
fn filters_compose_and_mode_is_unrounded() {
    let req = SummaryRequest::default().with_filters(FilterSpec {
        category: Some(vec!["Stationery".to_string()]),
        product_ids: Some(vec![1002]),
        ..Default::default()
    });
    let out = service().summarize(&req).unwrap();

    let price = out.get(MeasureColumn::PricePerUnit).unwrap();
    assert_eq!(price.mean, 2.2);
    assert_eq!(price.median, 2.2);
    assert_eq!(price.mode, Some(2.25));
    assert_eq!(price.std_dev, Some(0.0));
}

#[test]
fn reversed_date_range_is_rejected() {
    let req = SummaryRequest::default().with_filters(dates("2023-05-01", "2023-01-01"));
    let err = service().summarize(&req).unwrap_err();
    assert!(matches!(err, SummaryError::Validation { .. }));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn date_bounds_with_time_or_padding_are_rejected() {
    let svc = service();
    for start in ["2023-01-01 10:00:00", " 2023-01-01 ", ""] {
        let req = SummaryRequest::default().with_filters(dates(start, "2023-12-31"));
        assert!(
            matches!(svc.summarize(&req), Err(SummaryError::Validation { .. })),
            "{start:?}"
        );
    }
}

#[test]
fn negative_product_id_is_rejected() {
    let req = SummaryRequest::default().with_filters(FilterSpec {
        product_ids: Some(vec![1001, -3]),
        ..Default::default()
    });
    assert!(matches!(
        service().summarize(&req),
        Err(SummaryError::Validation { .. })
    ));
}

#[test]
fn unknown_column_is_rejected() {
    let req = SummaryRequest::for_columns(["revenue"]);
    let err = service().summarize(&req).unwrap_err();
    assert!(err.to_string().contains("Invalid column: revenue"));
}

#[test]
fn no_matching_rows_is_not_found() {
    let svc = service();
    for spec in [
        FilterSpec {
            product_ids: Some(vec![9999]),
            ..Default::default()
        },
        dates("2024-01-01", "2024-12-31"),
        FilterSpec {
            category: Some(vec!["Home".to_string()]),
            product_ids: Some(vec![1001]),
            ..Default::default()
        },
    ] {
        let req = SummaryRequest::default().with_filters(spec);
        assert_eq!(svc.summarize(&req), Err(SummaryError::NotFound));
    }
}

#[test]
fn identical_requests_are_bit_identical() {
    let svc = service();
    let req = SummaryRequest::default().with_filters(dates("2023-01-01", "2023-03-31"));
    let a = serde_json::to_vec(&svc.summarize(&req).unwrap()).unwrap();
    let b = serde_json::to_vec(&svc.summarize(&req).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn dataset_is_untouched_by_requests() {
    let svc = service();
    let before = (**svc.dataset()).clone();
    let req = SummaryRequest::default().with_filters(FilterSpec {
        category: Some(vec!["Home".to_string()]),
        ..Default::default()
    });
    svc.summarize(&req).unwrap();
    assert_eq!(**svc.dataset(), before);
}

#[test]
fn concurrent_requests_share_the_dataset() {
    let engine = ExecutionEngine::new(ExecutionOptions {
        num_threads: Some(2),
        chunk_size: 3,
    })
    .unwrap();
    let ds = load_dataset("tests/fixtures/sales.csv", &LoadOptions::default()).unwrap();
    let svc = Arc::new(SummaryService::new(ds).with_execution(engine, 1));
    let expected = service()
        .summarize(&SummaryRequest::default().with_filters(dates("2023-01-01", "2023-02-28")))
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let svc = Arc::clone(&svc);
            std::thread::spawn(move || {
                svc.summarize(&SummaryRequest::default().with_filters(dates("2023-01-01", "2023-02-28")))
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap().unwrap(), expected);
    }
}
