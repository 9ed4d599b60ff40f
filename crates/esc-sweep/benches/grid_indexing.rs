use criterion::{black_box, criterion_group, criterion_main, Criterion};
use esc_sweep::SweepGrid;

fn bench_grid_indexing(c: &mut Criterion) {
    let grid = SweepGrid::new(vec![12, 10, 8, 6]).expect("grid");
    c.bench_function("grid_indices_5760", |b| {
        b.iter(|| {
            let mut checksum = 0usize;
            for row in 0..grid.len() {
                let indices = grid.indices(black_box(row)).expect("row");
                checksum = checksum.wrapping_add(indices[3]);
            }
            black_box(checksum)
        })
    });
}

criterion_group!(benches, bench_grid_indexing);
criterion_main!(benches);
