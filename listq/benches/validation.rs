//! Benchmarks for list parameter validation.
//!
//! Run with: cargo bench -p listq

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use listq::{
    ListQuery, Resource, is_valid_fields, is_valid_sort, validate_filter, validate_sort,
};
use std::hint::black_box;

const ALLOWED: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "email",
    "age",
    "status",
    "amount",
    "created_at",
];

// =============================================================================
// Filter Benchmarks
// =============================================================================

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    let filters = [
        ("single", "id=1".to_string()),
        ("mixed", "age>=18 AND status='active' OR amount<100.5".to_string()),
        (
            "long",
            (0..32)
                .map(|i| format!("id={i}"))
                .collect::<Vec<_>>()
                .join(" OR "),
        ),
        ("unknown_column", "password='x' AND id=1".to_string()),
        ("injection", "id=1; DROP TABLE users--".to_string()),
    ];

    for (name, filter) in &filters {
        group.bench_with_input(BenchmarkId::new("validate", name), filter, |b, s| {
            b.iter(|| validate_filter(ALLOWED, black_box(s)))
        });
    }

    group.finish();
}

// =============================================================================
// Fields and Sort Benchmarks
// =============================================================================

fn bench_fields_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("fields_sort");

    let fields = [
        ("short", "id"),
        ("all", "id, first_name, last_name, email, age, status, amount, created_at"),
        ("invalid", "id, password"),
    ];
    for (name, raw) in fields {
        group.bench_with_input(BenchmarkId::new("fields", name), raw, |b, s| {
            b.iter(|| is_valid_fields(ALLOWED, black_box(s)))
        });
    }

    let sorts = [
        ("single", "created_at DESC"),
        ("multi", "status ASC, created_at DESC, id ASC"),
        ("missing_direction", "status ASC, id"),
    ];
    for (name, raw) in sorts {
        group.bench_with_input(BenchmarkId::new("sort", name), raw, |b, s| {
            b.iter(|| is_valid_sort(ALLOWED, black_box(s)))
        });
    }

    group.bench_function("sort_structured", |b| {
        b.iter(|| validate_sort(ALLOWED, black_box("status ASC, created_at DESC, id ASC")))
    });

    group.finish();
}

// =============================================================================
// Query String Benchmarks
// =============================================================================

fn bench_list_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_query");
    let users = Resource::new("users", ALLOWED);
    let qs = "/users?fields=id,email&sort=created_at+DESC\
              &filter=age%3E%3D18+AND+status%3D%27active%27&page=2";

    group.bench_function("extract", |b| {
        b.iter(|| ListQuery::from_query_string(black_box(qs)))
    });

    group.bench_function("extract_and_validate", |b| {
        b.iter(|| {
            ListQuery::from_query_string(black_box(qs))
                .map(|query| query.is_valid(&users))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_filter, bench_fields_and_sort, bench_list_query);

criterion_main!(benches);
