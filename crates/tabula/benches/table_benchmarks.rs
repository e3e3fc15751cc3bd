//! Table operator performance benchmarks.
//!
//! Measures loading, filtering, grouping, joining and cleansing across table
//! sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tabula::{AggregationMethod, Loader, Predicate, SortDirection, Table};

/// Generate synthetic CSV with an id, a region, a product, numbers and notes.
fn generate_csv_data(rows: usize) -> String {
    let regions = ["North", "South", "East", "West"];
    let products = ["widget", "GADGET", "Gizmo", "doohickey", "Thingamajig"];

    let mut data = String::from("id,region,product,units,price,notes\n");
    for row in 0..rows {
        data.push_str(&format!(
            "{},{},{},{},{:.2},{}\n",
            row,
            regions[row % regions.len()],
            products[row % products.len()],
            (row * 7) % 100,
            1.5 + (row % 40) as f64 * 0.25,
            if row % 3 == 0 { "CALL BACK NEXT WEEK" } else { "ok" },
        ));
    }
    data
}

fn make_table(rows: usize) -> Table {
    Loader::new().parse_str(&generate_csv_data(rows)).unwrap()
}

/// Benchmark loading CSV text of various sizes.
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(Loader::new().parse_str(data).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark filter, sort and aggregate.
fn bench_relational(c: &mut Criterion) {
    let mut group = c.benchmark_group("relational");

    for rows in [1_000, 10_000].iter() {
        let table = make_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(BenchmarkId::new("filter", rows), &table, |b, t| {
            let predicates = [Predicate::equals("region", "North")];
            b.iter(|| black_box(t.filter(&predicates).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("sort", rows), &table, |b, t| {
            b.iter(|| black_box(t.sort_by("units", SortDirection::Descending).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("aggregate", rows), &table, |b, t| {
            b.iter(|| black_box(t.aggregate(&["region", "product"], AggregationMethod::Average).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark an inferred-key join against a lookup table.
fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");
    let lookup = Table::from_columns([
        ("region", ["North", "South", "East", "West"].map(String::from).to_vec()),
        ("manager", ["Ann", "Bob", "Cid", "Dee"].map(String::from).to_vec()),
    ])
    .unwrap();

    for rows in [1_000, 10_000].iter() {
        let table = make_table(*rows);
        group.bench_with_input(BenchmarkId::new("merge_by_columns", rows), &table, |b, t| {
            b.iter(|| black_box(t.merge_by_columns(&lookup).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark AutoNormalize analysis and application.
fn bench_auto_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_normalize");

    for rows in [1_000, 10_000].iter() {
        let table = make_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, t| {
            b.iter(|| black_box(t.auto_normalize()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_load,
    bench_relational,
    bench_join,
    bench_auto_normalize,
);
criterion_main!(benches);
