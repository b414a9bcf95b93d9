use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sales_summary::execution::{ExecutionEngine, ExecutionOptions};
use sales_summary::ingestion::sales_schema;
use sales_summary::processing::{DateRange, FilterSpec};
use sales_summary::request::SummaryRequest;
use sales_summary::service::SummaryService;
use sales_summary::types::{DataSet, Value};

const CATEGORIES: [&str; 4] = ["Electronics", "Stationery", "Home", "Garden"];

fn synthetic_sales(n: usize) -> Arc<DataSet> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let rows = (0..n)
        .map(|i| {
            vec![
                Value::Date(base + chrono::Days::new((i % 365) as u64)),
                Value::Utf8(CATEGORIES[i % CATEGORIES.len()].to_string()),
                Value::Int64((1000 + i % 250) as i64),
                Value::Float64((i * 37 % 500) as f64),
                Value::Float64((i * 13 % 9_000) as f64 / 100.0),
            ]
        })
        .collect();
    Arc::new(DataSet::new(sales_schema(), rows))
}

fn filtered_request() -> SummaryRequest {
    SummaryRequest::default().with_filters(FilterSpec {
        date_range: Some(DateRange {
            start_date: Some("2023-02-01".to_string()),
            end_date: Some("2023-09-30".to_string()),
        }),
        category: Some(vec!["Electronics".to_string(), "Home".to_string()]),
        product_ids: None,
    })
}

fn bench_summary(c: &mut Criterion) {
    let data = synthetic_sales(200_000);
    let req = filtered_request();

    let sequential = SummaryService::new(Arc::clone(&data));
    c.bench_function("summary_sequential_200k", |b| {
        b.iter(|| sequential.summarize(black_box(&req)).unwrap())
    });

    let engine = ExecutionEngine::new(ExecutionOptions::default()).unwrap();
    let parallel = SummaryService::new(data).with_execution(engine, 0);
    c.bench_function("summary_parallel_200k", |b| {
        b.iter(|| parallel.summarize(black_box(&req)).unwrap())
    });
}

criterion_group!(benches, bench_summary);
criterion_main!(benches);
