mod utils;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use utils::other_impls::{build_rstar, query_brute_force, query_rstar};
use utils::{get_country_index, get_random_points, whole_world};

pub fn query_benchmark(c: &mut Criterion) {
    let index = get_country_index();
    println!("Benchmarking {} loops", index.len());
    let mut group = c.benchmark_group("query_countries");

    let num_points = 1000;
    let query_points = get_random_points(whole_world(), num_points, 342);

    group.bench_function(BenchmarkId::new("country_index", num_points), |b| {
        b.iter(|| {
            for point in &query_points {
                black_box(index.query(point.lat, point.lng));
            }
        })
    });

    let rstar = build_rstar(index.loops());
    group.bench_function(BenchmarkId::new("rstar_loops", num_points), |b| {
        b.iter(|| {
            for &point in &query_points {
                black_box(query_rstar(point, &rstar, index.loops()));
            }
        })
    });

    group.bench_function(BenchmarkId::new("brute_force", num_points), |b| {
        b.iter(|| {
            for &point in &query_points {
                black_box(query_brute_force(point, index.loops()));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, query_benchmark);
criterion_main!(benches);
