//! List Performance Benchmarks
//!
//! Compares unmanaged lists (in-memory record) with managed lists (database
//! record, one write transaction per mutation) for:
//! - append
//! - indexed get
//! - sorted / sum over 1000 elements

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use strata_core::{ObjectSchema, PrimitiveKind};
use strata_engine::Database;
use strata_primitives::{Object, ObjectStoreExt, PrimitiveList};

const SIZE: usize = 1000;

fn schema() -> Arc<ObjectSchema> {
    ObjectSchema::builder("Series")
        .list("points", PrimitiveKind::Int64)
        .build()
        .unwrap()
}

fn managed_list(db: &Arc<Database>, len: usize) -> PrimitiveList<i64> {
    let object = db.write(|| db.add(Object::new(schema()))).unwrap();
    let list = object.list::<i64>("points").unwrap();
    db.write(|| list.append_all((0..len as i64).rev())).unwrap();
    list
}

fn unmanaged_list(len: usize) -> PrimitiveList<i64> {
    let list = PrimitiveList::new();
    list.append_all((0..len as i64).rev()).unwrap();
    list
}

/// Append followed by remove_last keeps the list length stable across iterations
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    group.throughput(Throughput::Elements(1));

    let list = unmanaged_list(SIZE);
    group.bench_function("unmanaged", |b| {
        b.iter(|| {
            list.append(black_box(42)).unwrap();
            list.remove_last().unwrap();
        })
    });

    let db = Database::open_in_memory();
    let list = managed_list(&db, SIZE);
    group.bench_function("managed", |b| {
        b.iter(|| {
            db.write(|| {
                list.append(black_box(42))?;
                list.remove_last()
            })
            .unwrap()
        })
    });
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    let unmanaged = unmanaged_list(SIZE);
    let db = Database::open_in_memory();
    let managed = managed_list(&db, SIZE);

    for (name, list) in [("unmanaged", &unmanaged), ("managed", &managed)] {
        let mut i = 0usize;
        group.bench_function(name, |b| {
            b.iter(|| {
                i = (i + 1) % SIZE;
                list.get(black_box(i)).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_aggregates(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregates");
    group.throughput(Throughput::Elements(SIZE as u64));

    let unmanaged = unmanaged_list(SIZE);
    let db = Database::open_in_memory();
    let managed = managed_list(&db, SIZE);

    for (name, list) in [("unmanaged", &unmanaged), ("managed", &managed)] {
        group.bench_with_input(BenchmarkId::new("sorted", name), list, |b, list| {
            b.iter(|| list.sorted(true).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("sum", name), list, |b, list| {
            b.iter(|| list.sum().unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_append, bench_get, bench_aggregates);
criterion_main!(benches);
