mod utils;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use country_lookup::{CountryIndex, Flatbush, HasEnvelope, Rectangle, SegRTree};
use utils::{get_country_index, read_test_case};

pub fn construction_benchmark(c: &mut Criterion) {
    let contents = read_test_case("countries.geojson");
    let mut group = c.benchmark_group("build_index");

    group.bench_function("open_from_geojson", |b| {
        b.iter(|| CountryIndex::open_from_geojson(contents.as_bytes()).unwrap())
    });

    let index = get_country_index();
    let mut bytes = Vec::new();
    index.write_binary(&mut bytes).unwrap();
    group.bench_function("open_from_binary", |b| {
        b.iter(|| CountryIndex::open_from_binary(&bytes[..]).unwrap())
    });

    let bounds: Vec<Rectangle> = index
        .loops()
        .iter()
        .map(|item| item.boundary.envelope())
        .collect();
    for degree in [8, 16].iter() {
        group.bench_with_input(BenchmarkId::new("flatbush", degree), degree, |b, &d| {
            b.iter(|| Flatbush::new(d, &bounds));
        });
    }
    group.bench_function("build_rstar", |b| {
        b.iter(|| utils::other_impls::build_rstar(index.loops()))
    });

    // The edges of the largest loop, as boxes between consecutive vertices.
    let edges: Vec<Rectangle> = index
        .loops()
        .iter()
        .max_by_key(|item| item.boundary.num_vertices())
        .map(|item| {
            let ring = item.boundary.to_ring();
            ring.windows(2).map(|c| Rectangle::new(c[0], c[1])).collect()
        })
        .unwrap_or_default();
    for degree in [8, 16].iter() {
        group.bench_with_input(BenchmarkId::new("seg_rtree_bulk", degree), degree, |b, &d| {
            b.iter(|| SegRTree::new_loaded(d, &edges));
        });
    }

    group.finish();
}

criterion_group!(benches, construction_benchmark);
criterion_main!(benches);
