use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::{JobFilter, Patch, TranslationTable, build_where, sql_for_partial_update};

/// Patch with `n` integer fields: f0 = $1, f1 = $2, ...
fn build_patch(n: usize) -> Patch {
    let mut patch = Patch::new();
    for i in 0..n {
        patch.set(format!("f{i}"), i as i64);
    }
    patch
}

fn bench_build_where(c: &mut Criterion) {
    let filter = JobFilter::new()
        .min_salary(50000)
        .has_equity(true)
        .title("Engineer");

    c.bench_function("filter/build_where_all", |b| {
        b.iter(|| {
            let clause = build_where(black_box(&filter));
            black_box(clause.to_sql());
        });
    });
}

fn bench_partial_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch/sql_for_partial_update");

    for n in [1, 3, 10, 50] {
        let patch = build_patch(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &patch, |b, patch| {
            b.iter(|| black_box(sql_for_partial_update(patch, &TranslationTable::EMPTY)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_where, bench_partial_update);
criterion_main!(benches);
