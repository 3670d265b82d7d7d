pub mod other_impls;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

use country_lookup::{CountryIndex, LatLng, Rectangle};

//// Utility functions

pub(crate) fn read_test_case(name: &str) -> String {
    let filepath = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name);
    fs::read_to_string(&filepath).unwrap()
}

pub(crate) fn get_country_index() -> CountryIndex {
    let contents = read_test_case("countries.geojson");
    CountryIndex::open_from_geojson(contents.as_bytes()).unwrap()
}

pub(crate) fn get_random_points(rect: Rectangle, n: usize, seed: u64) -> Vec<LatLng> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut results = Vec::new();
    for _i in 0..n {
        results.push(LatLng::new(
            rng.gen_range(rect.y_min, rect.y_max),
            rng.gen_range(rect.x_min, rect.x_max),
        ));
    }

    results
}

pub(crate) fn whole_world() -> Rectangle {
    Rectangle::latitude_band(-90., 90.)
}
