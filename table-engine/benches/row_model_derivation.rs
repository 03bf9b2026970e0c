//! Benchmarks for the row-model derivation pipeline.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use table_engine::{
    ColumnDef, ColumnSort, FilterValue, SortDirection, Table, TableOptions, TableValue, Updater,
};

#[derive(Clone)]
struct Record {
    id: u64,
    category: &'static str,
    score: f64,
}

const CATEGORIES: [&str; 5] = ["alpha", "beta", "gamma", "delta", "epsilon"];

fn records(n: u64) -> Vec<Record> {
    (0..n)
        .map(|id| Record {
            id,
            category: CATEGORIES[(id % 5) as usize],
            score: ((id * 37) % 1000) as f64 / 10.0,
        })
        .collect()
}

fn record_columns() -> Vec<ColumnDef<Record>> {
    vec![
        ColumnDef::new("id", |r: &Record| TableValue::Int(r.id as i64)),
        ColumnDef::new("category", |r: &Record| TableValue::from(r.category)),
        ColumnDef::new("score", |r: &Record| TableValue::from(r.score)),
    ]
}

fn configured_table(n: u64) -> Table<Record> {
    let table = Table::new(TableOptions::new(records(n), record_columns())).unwrap();
    table
        .set_column_filter(
            "score",
            FilterValue::Range {
                min: Some(10.0),
                max: Some(90.0),
            },
        )
        .unwrap();
    table
        .set_sorting(Updater::Set(vec![ColumnSort {
            id: "score".to_string(),
            direction: SortDirection::Descending,
        }]))
        .unwrap();
    table.set_page_size(50).unwrap();
    table
}

/// Cold derivation: filter + sort + paginate from a fresh table.
fn bench_full_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_derivation");
    for n in [1_000u64, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let table = configured_table(n);
                table.row_model().unwrap().rows.len()
            });
        });
    }
    group.finish();
}

/// Warm path: repeated reads with unchanged state hit every stage memo.
fn bench_memoized_rederivation(c: &mut Criterion) {
    let table = configured_table(10_000);
    table.row_model().unwrap();
    c.bench_function("memoized_rederivation", |b| {
        b.iter(|| table.row_model().unwrap().rows.len());
    });
}

/// A page change re-derives the window but reuses every upstream stage.
fn bench_page_flip(c: &mut Criterion) {
    let table = configured_table(10_000);
    table.row_model().unwrap();
    c.bench_function("page_flip", |b| {
        let mut page = 0;
        b.iter(|| {
            page = (page + 1) % 10;
            table.set_page_index(page).unwrap();
            table.row_model().unwrap().rows.len()
        });
    });
}

/// Grouping with aggregates over a mid-sized category column.
fn bench_grouped_derivation(c: &mut Criterion) {
    c.bench_function("grouped_derivation_10k", |b| {
        b.iter(|| {
            let table = Table::new(TableOptions::new(records(10_000), record_columns())).unwrap();
            table
                .set_grouping(Updater::Set(vec!["category".to_string()]))
                .unwrap();
            table.row_model().unwrap().rows.len()
        });
    });
}

criterion_group!(
    benches,
    bench_full_derivation,
    bench_memoized_rederivation,
    bench_page_flip,
    bench_grouped_derivation
);
criterion_main!(benches);
