use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logview_core::allocate_budget;

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_budget");
    for &segments in &[3usize, 100, 5_000] {
        let lengths: Vec<usize> = (0..segments).map(|i| 10 + (i * 7919) % 20_000).collect();
        group.bench_with_input(BenchmarkId::from_parameter(segments), &lengths, |b, lengths| {
            b.iter(|| black_box(allocate_budget(lengths, 2_000)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_allocate);
criterion_main!(benches);
