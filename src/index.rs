use crate::codec::{write_record, RecordReader};
use crate::errors::Result;
use crate::geojson::{read_feature_collection, read_feature_seq, AttributeKeys};
use crate::utils::EDGE_BOX_PADDING;
use crate::{
    Coordinate, Flatbush, HasEnvelope, LatLng, Loop, Rectangle, FLATBUSH_DEFAULT_DEGREE,
};
use serde_json::{json, Value};
use std::io::{BufRead, Read, Write};
use tracing::{info, warn};

/// A country boundary loop with its labels.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedLoop {
    pub name: String,
    pub country: String,
    pub boundary: Loop,
}

impl IndexedLoop {
    pub fn new(name: impl Into<String>, country: impl Into<String>, boundary: Loop) -> Self {
        IndexedLoop {
            name: name.into(),
            country: country.into(),
            boundary,
        }
    }

    /// Render this loop as a GeoJSON `Feature` with a single-ring `Polygon`.
    pub fn to_geojson(&self) -> Value {
        let ring: Vec<[f64; 2]> = self
            .boundary
            .to_ring()
            .iter()
            .map(|c| [c.lng(), c.lat()])
            .collect();
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [ring],
            },
            "properties": {
                "name": self.name,
                "country": self.country,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryMatch<'a> {
    pub name: &'a str,
    pub country: &'a str,
}

/// Collects loops before they are frozen into a [`CountryIndex`].
#[derive(Debug, Default)]
pub struct IndexBuilder {
    loops: Vec<IndexedLoop>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        IndexBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn insert(&mut self, item: IndexedLoop) {
        self.loops.push(item);
    }

    /// Build a loop from a counter-clockwise `(lng, lat)` ring and insert it.
    ///
    /// Returns false, and inserts nothing, if the ring is malformed.
    pub fn insert_ring(&mut self, name: &str, country: &str, ring: &[Coordinate]) -> bool {
        match Loop::from_ring(ring) {
            Ok(boundary) => {
                self.insert(IndexedLoop::new(name, country, boundary));
                true
            }
            Err(e) => {
                warn!(country, error = %e, "Dropping malformed ring for {}", name);
                false
            }
        }
    }

    pub fn build(self) -> CountryIndex {
        let bounds: Vec<Rectangle> = self
            .loops
            .iter()
            .map(|item| item.boundary.envelope())
            .collect();
        let tree = Flatbush::new(FLATBUSH_DEFAULT_DEGREE, &bounds);
        info!(
            loops = self.loops.len(),
            vertices = self
                .loops
                .iter()
                .map(|item| item.boundary.num_vertices())
                .sum::<usize>(),
            "Built country index"
        );
        CountryIndex {
            loops: self.loops,
            tree,
        }
    }
}

/// A frozen set of country loops, answering containment queries.
#[derive(Debug)]
pub struct CountryIndex {
    // In insertion order; the tree refers to loops by position here.
    loops: Vec<IndexedLoop>,
    tree: Flatbush,
}

impl CountryIndex {
    /// Load an index from the binary record format.
    pub fn open_from_binary<R: Read>(reader: R) -> Result<Self> {
        let mut builder = IndexBuilder::new();
        for item in RecordReader::new(reader) {
            builder.insert(item?);
        }
        Ok(builder.build())
    }

    /// Build an index from a GeoJSON `FeatureCollection`, labelling loops with
    /// the `ADMIN` and `ISO_A3` properties.
    pub fn open_from_geojson<R: Read>(reader: R) -> Result<Self> {
        CountryIndex::open_from_geojson_with_keys(reader, &AttributeKeys::default())
    }

    pub fn open_from_geojson_with_keys<R: Read>(reader: R, keys: &AttributeKeys) -> Result<Self> {
        let mut builder = IndexBuilder::new();
        read_feature_collection(reader, keys, &mut builder)?;
        Ok(builder.build())
    }

    /// Build an index from a GeoJSON text sequence, one feature per line.
    pub fn open_from_geojson_seq<R: BufRead>(reader: R) -> Result<Self> {
        CountryIndex::open_from_geojson_seq_with_keys(reader, &AttributeKeys::default())
    }

    pub fn open_from_geojson_seq_with_keys<R: BufRead>(
        reader: R,
        keys: &AttributeKeys,
    ) -> Result<Self> {
        let mut builder = IndexBuilder::new();
        read_feature_seq(reader, keys, &mut builder)?;
        Ok(builder.build())
    }

    /// Write every loop in the binary record format, in insertion order.
    pub fn write_binary<W: Write>(&self, writer: &mut W) -> Result<()> {
        for item in &self.loops {
            write_record(writer, item)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn loops(&self) -> &[IndexedLoop] {
        &self.loops
    }

    /// Every loop whose interior contains the point, in insertion order.
    ///
    /// Points on a boundary are in no loop. Invalid coordinates match nothing.
    pub fn query(&self, lat: f64, lng: f64) -> Vec<&IndexedLoop> {
        let ll = LatLng::new(lat, lng);
        if !ll.is_valid() {
            return Vec::new();
        }

        let point = Coordinate::new(lng, lat);
        let search = Rectangle::new(point, point).padded(EDGE_BOX_PADDING);
        let mut candidates: Vec<usize> = Rectangle::wrapped(search)
            .into_iter()
            .flat_map(|rect| self.tree.query_rect(rect))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        candidates
            .into_iter()
            .map(|i| &self.loops[i])
            .filter(|item| item.boundary.contains(ll))
            .collect()
    }

    pub fn lookup(&self, lat: f64, lng: f64) -> Vec<CountryMatch<'_>> {
        self.query(lat, lng)
            .into_iter()
            .map(|item| CountryMatch {
                name: &item.name,
                country: &item.country,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    const COUNTRIES: &str = include_str!("../testdata/countries.geojson");
    const COUNTRIES_SEQ: &str = include_str!("../testdata/countries.geojsonseq");

    fn names(index: &CountryIndex, lat: f64, lng: f64) -> Vec<&str> {
        index.lookup(lat, lng).iter().map(|m| m.name).collect()
    }

    fn square(builder: &mut IndexBuilder, name: &str, lng: f64, lat: f64, size: f64) {
        let ring: Vec<Coordinate> = vec![
            (lng, lat).into(),
            (lng + size, lat).into(),
            (lng + size, lat + size).into(),
            (lng, lat + size).into(),
        ];
        assert!(builder.insert_ring(name, name, &ring));
    }

    fn check_countries(index: &CountryIndex) {
        assert_eq!(names(index, 48.8, 2.2), vec!["France"]);
        assert_eq!(names(index, 51.21389, -102.462776), vec!["Canada"]);
        assert_eq!(names(index, 39.916668, 116.383331), vec!["China"]);
        assert_eq!(names(index, 0., 0.), Vec::<&str>::new());
        // Corsica, the second polygon of France.
        assert_eq!(names(index, 42.2, 9.1), vec!["France"]);
        assert_eq!(names(index, 40.4, -3.7), vec!["Spain"]);
        assert_eq!(names(index, 52.5, 13.4), vec!["Germany"]);
        assert_eq!(names(index, 39., -77.), vec!["United States of America"]);
        // South of the great circle along the 49th parallel.
        assert_eq!(names(index, 49., -100.), vec!["United States of America"]);
        assert_eq!(names(index, -85., 45.), vec!["Antarctica"]);
        assert_eq!(names(index, -89.9, 0.), vec!["Antarctica"]);
        // A vertex shared by France and Germany.
        assert_eq!(names(index, 48.9, 8.2), Vec::<&str>::new());
        assert_eq!(names(index, 90., 0.), Vec::<&str>::new());
    }

    #[test]
    fn query_feature_collection() {
        let index = CountryIndex::open_from_geojson(COUNTRIES.as_bytes()).unwrap();
        assert_eq!(index.len(), 8);
        check_countries(&index);
        let matches = index.lookup(48.8, 2.2);
        assert_eq!(
            matches,
            vec![CountryMatch {
                name: "France",
                country: "FRA"
            }]
        );
    }

    #[test]
    fn query_feature_sequence() {
        let index = CountryIndex::open_from_geojson_seq(COUNTRIES_SEQ.as_bytes()).unwrap();
        assert_eq!(index.len(), 8);
        check_countries(&index);

        let keys = AttributeKeys::iso_a2();
        let index =
            CountryIndex::open_from_geojson_seq_with_keys(COUNTRIES_SEQ.as_bytes(), &keys).unwrap();
        assert_eq!(index.lookup(48.8, 2.2)[0].country, "FR");
    }

    #[test]
    fn query_binary() {
        let index = CountryIndex::open_from_geojson(COUNTRIES.as_bytes()).unwrap();
        let mut bytes = Vec::new();
        index.write_binary(&mut bytes).unwrap();

        let reopened = CountryIndex::open_from_binary(&bytes[..]).unwrap();
        assert_eq!(reopened.loops(), index.loops());
        check_countries(&reopened);
    }

    #[test]
    fn truncated_binary() {
        let index = CountryIndex::open_from_geojson(COUNTRIES.as_bytes()).unwrap();
        let mut bytes = Vec::new();
        index.write_binary(&mut bytes).unwrap();
        bytes.truncate(bytes.len() - 10);
        match CountryIndex::open_from_binary(&bytes[..]) {
            Err(Error::CorruptData(_)) => {}
            other => panic!("Expected corrupt data, got {:?}", other),
        }
    }

    #[test]
    fn queries_are_idempotent() {
        let index = CountryIndex::open_from_geojson(COUNTRIES.as_bytes()).unwrap();
        for &(lat, lng) in &[(48.8, 2.2), (0., 0.), (-85., 45.), (42.2, 9.1)] {
            assert_eq!(index.lookup(lat, lng), index.lookup(lat, lng));
        }
    }

    #[test]
    fn shared_edge() {
        let mut builder = IndexBuilder::new();
        square(&mut builder, "West", 0., 0., 10.);
        square(&mut builder, "East", 10., 0., 10.);
        let index = builder.build();
        assert_eq!(names(&index, 5., 10.), Vec::<&str>::new());
        assert_eq!(names(&index, 5., 9.99), vec!["West"]);
        assert_eq!(names(&index, 5., 10.01), vec!["East"]);
    }

    #[test]
    fn overlaps_in_insertion_order() {
        let mut builder = IndexBuilder::new();
        square(&mut builder, "Big", -10., -10., 20.);
        square(&mut builder, "Small", -1., -1., 2.);
        square(&mut builder, "Big", -10., -10., 20.);
        let index = builder.build();
        assert_eq!(names(&index, 0., 0.), vec!["Big", "Small", "Big"]);
        assert_eq!(names(&index, 5., 5.), vec!["Big", "Big"]);
    }

    #[test]
    fn malformed_rings_are_skipped() {
        let mut builder = IndexBuilder::new();
        let degenerate: Vec<Coordinate> = vec![(0., 0.).into(), (1., 1.).into(), (0., 0.).into()];
        assert!(!builder.insert_ring("Broken", "XXX", &degenerate));
        square(&mut builder, "Fine", 0., 0., 1.);
        let index = builder.build();
        assert_eq!(index.len(), 1);
        assert_eq!(names(&index, 0.5, 0.5), vec!["Fine"]);
    }

    #[test]
    fn invalid_coordinates() {
        let index = CountryIndex::open_from_geojson(COUNTRIES.as_bytes()).unwrap();
        assert!(index.query(91., 0.).is_empty());
        assert!(index.query(0., 180.5).is_empty());
        assert!(index.query(f64::NAN, 2.2).is_empty());
        assert!(index.query(48.8, f64::INFINITY).is_empty());
    }

    #[test]
    fn antimeridian_longitudes() {
        let mut builder = IndexBuilder::new();
        // Split at the antimeridian, as GeoJSON requires.
        square(&mut builder, "West", 177., -19., 3.);
        square(&mut builder, "East", -180., -19., 3.);
        let index = builder.build();
        assert_eq!(names(&index, -17., 179.), vec!["West"]);
        assert_eq!(names(&index, -17., -179.), vec!["East"]);
        // On the shared edge, from either side of the wrap.
        assert_eq!(names(&index, -17., 180.), Vec::<&str>::new());
        assert_eq!(names(&index, -17., -180.), Vec::<&str>::new());
    }

    #[test]
    fn empty_index() {
        let index = IndexBuilder::new().build();
        assert!(index.is_empty());
        assert!(index.query(48.8, 2.2).is_empty());
        let reopened = CountryIndex::open_from_binary(&[][..]).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn index_is_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CountryIndex>();
    }

    #[test]
    fn feature_geojson() {
        let index = CountryIndex::open_from_geojson(COUNTRIES.as_bytes()).unwrap();
        let france = index.query(48.8, 2.2)[0].to_geojson();
        assert_eq!(france["type"], "Feature");
        assert_eq!(france["properties"]["country"], "FRA");
        let ring = france["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), index.query(48.8, 2.2)[0].boundary.num_vertices() + 1);
    }
}
