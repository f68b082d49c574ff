use criterion::{criterion_group, criterion_main, Criterion};
use moonlink::{link, parse_wasm, LinkOptions, TableKind, Value};
use moonlink_tests::{ffi, lec13, seeded_table};
use std::hint::black_box;

// ─── Lookup by name ──────────────────────────────────────────────────────────

fn table_call_add_bench(c: &mut Criterion) {
    let table = seeded_table(TableKind::Ffi);
    c.bench_function("Runtime.add via table lookup", |b| {
        b.iter(|| {
            table.call(
                "Runtime",
                "add",
                &[Value::I32(black_box(40)), Value::I32(black_box(2))],
            )
        })
    });
}

fn table_call_exp_bench(c: &mut Criterion) {
    let table = seeded_table(TableKind::Lec13);
    c.bench_function("math.exp via table lookup", |b| {
        b.iter(|| table.call("math", "exp", &[Value::F64(black_box(1.5))]))
    });
}

// ─── Pre-resolved dispatch ───────────────────────────────────────────────────

fn resolved_call_add_bench(c: &mut Criterion) {
    let table = seeded_table(TableKind::Ffi);
    let module = parse_wasm(ffi::WASM).unwrap();
    let resolved = link(&table, &module, &LinkOptions::default()).unwrap();
    c.bench_function("Runtime.add via resolved index", |b| {
        b.iter(|| resolved.call(3, &[Value::I32(black_box(40)), Value::I32(black_box(2))]))
    });
}

fn resolved_call_random_bench(c: &mut Criterion) {
    let table = seeded_table(TableKind::Ffi);
    let module = parse_wasm(ffi::WASM).unwrap();
    let resolved = link(&table, &module, &LinkOptions::default()).unwrap();
    c.bench_function("Math.random via resolved index", |b| {
        b.iter(|| resolved.call(black_box(2), &[]))
    });
}

fn plain_add_bench(c: &mut Criterion) {
    c.bench_function("add plain rust", |b| {
        b.iter(|| black_box(40i32).wrapping_add(black_box(2)))
    });
}

// ─── Linkage ─────────────────────────────────────────────────────────────────

fn link_lec13_bench(c: &mut Criterion) {
    let table = seeded_table(TableKind::Lec13);
    c.bench_function("parse and link lec13 guest", |b| {
        b.iter(|| {
            let module = parse_wasm(black_box(lec13::WASM)).unwrap();
            link(&table, &module, &LinkOptions::default())
                .map(|r| r.len())
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    table_call_add_bench,
    table_call_exp_bench,
    resolved_call_add_bench,
    resolved_call_random_bench,
    plain_add_bench,
    link_lec13_bench
);
criterion_main!(benches);
