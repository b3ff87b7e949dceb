use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sq_core::{resolve, Family, PartialOptionSet};

fn bench_resolve(c: &mut Criterion) {
    let mut partial = PartialOptionSet::default();
    partial.json.remove_null_values = Some(true);
    partial.json.sort_object_keys = Some(true);
    partial.script.aggressiveness = Some(2);

    c.bench_function("resolve_structured_data", |b| {
        b.iter(|| black_box(resolve(black_box(&partial), Family::StructuredData)))
    });
    c.bench_function("resolve_script", |b| {
        b.iter(|| black_box(resolve(black_box(&partial), Family::Script)))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
