use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;

use orbis::collision::{collision_probability, CollisionQuery, CovarianceMatrix};

fn conjunction(sample_count: usize) -> CollisionQuery {
    CollisionQuery {
        relative_position: Vector3::new(0.0, 5.0, 0.0),
        covariance_a: CovarianceMatrix::diagonal(2.5e5, 2.5e5, 2.5e5),
        covariance_b: CovarianceMatrix::diagonal(1.3e3, 1.3e3, 1.3e3),
        hard_body_radius: 35.0,
        sigma_scale: 1.0,
        sample_count,
    }
}

fn bench_collision_probability(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_probability");
    group.sample_size(20);

    for samples in [10_000usize, 100_000] {
        let query = conjunction(samples);
        group.bench_function(format!("samples={samples}"), |b| {
            b.iter(|| black_box(collision_probability(black_box(&query), 0).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_collision_probability
);
criterion_main!(benches);
