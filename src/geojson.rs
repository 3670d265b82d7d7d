//! Reading country boundaries from GeoJSON.
//!
//! Two framings are supported: a single `FeatureCollection` document, and a
//! GeoJSON text sequence with one `Feature` per line. Only the outer ring of
//! each `Polygon` or `MultiPolygon` part is indexed.
use crate::errors::{Error, Result};
use crate::ring::force_ccw;
use crate::{Coordinate, IndexBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::{BufRead, BufReader, Read};
use tracing::{debug, info, warn};

/// RFC 8142 record separator, allowed before each line of a sequence.
const RECORD_SEPARATOR: char = '\u{1e}';

/// A GeoJSON position: longitude, latitude, then any ignored ordinates.
pub type Position = Vec<f64>;

/// The geometries an index cares about. Anything else decodes to `Other`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    #[serde(other)]
    Other,
}

impl Geometry {
    /// The outer ring of every polygon in this geometry.
    pub fn outer_rings(&self) -> Vec<&[Position]> {
        match self {
            Geometry::Polygon { coordinates } => {
                coordinates.first().map(Vec::as_slice).into_iter().collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .filter_map(|polygon| polygon.first())
                .map(Vec::as_slice)
                .collect(),
            Geometry::Other => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// The property keys holding a feature's name and country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeKeys {
    pub name: String,
    pub country: String,
}

impl Default for AttributeKeys {
    fn default() -> Self {
        AttributeKeys::new("ADMIN", "ISO_A3")
    }
}

impl AttributeKeys {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        AttributeKeys {
            name: name.into(),
            country: country.into(),
        }
    }

    /// Two-letter country codes instead of the default three-letter ones.
    pub fn iso_a2() -> Self {
        AttributeKeys::new("ADMIN", "ISO_A2")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureAttributes {
    pub name: String,
    pub country: String,
}

impl FeatureAttributes {
    pub fn extract(properties: &Map<String, Value>, keys: &AttributeKeys) -> Result<Self> {
        let get = |key: &str| {
            properties
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| Error::MissingAttribute {
                    key: key.to_owned(),
                })
        };
        Ok(FeatureAttributes {
            name: get(&keys.name)?,
            country: get(&keys.country)?,
        })
    }
}

fn to_coordinates(ring: &[Position]) -> Option<Vec<Coordinate>> {
    ring.iter()
        .map(|position| match position.as_slice() {
            [lng, lat, ..] => Some(Coordinate::new(*lng, *lat)),
            _ => None,
        })
        .collect()
}

/// Add the outer rings of `feature` to `builder`, returning how many loops
/// were indexed.
///
/// Features without polygonal geometry are skipped. Rings that cannot form a
/// loop are dropped with a warning.
pub fn index_feature(
    builder: &mut IndexBuilder,
    feature: &Feature,
    keys: &AttributeKeys,
) -> Result<usize> {
    let rings = match &feature.geometry {
        Some(geometry) => geometry.outer_rings(),
        None => Vec::new(),
    };
    if rings.is_empty() {
        debug!("Skipping feature without polygon geometry");
        return Ok(0);
    }

    let empty = Map::new();
    let properties = feature.properties.as_ref().unwrap_or(&empty);
    let attributes = FeatureAttributes::extract(properties, keys)?;

    let mut indexed = 0;
    for ring in rings {
        let mut coordinates = match to_coordinates(ring) {
            Some(coordinates) => coordinates,
            None => {
                warn!(
                    country = %attributes.country,
                    "Dropping ring with a short position for {}", attributes.name
                );
                continue;
            }
        };
        force_ccw(&mut coordinates);
        if builder.insert_ring(&attributes.name, &attributes.country, &coordinates) {
            indexed += 1;
        }
    }
    Ok(indexed)
}

/// Index every feature of a single `FeatureCollection` document.
pub fn read_feature_collection<R: Read>(
    reader: R,
    keys: &AttributeKeys,
    builder: &mut IndexBuilder,
) -> Result<usize> {
    let collection: FeatureCollection = serde_json::from_reader(BufReader::new(reader))?;
    let mut indexed = 0;
    for feature in &collection.features {
        indexed += index_feature(builder, feature, keys)?;
    }
    info!(
        features = collection.features.len(),
        loops = indexed,
        "Read GeoJSON feature collection"
    );
    Ok(indexed)
}

/// Index a GeoJSON text sequence, one feature per line.
///
/// Lines are read into a single reused buffer, so there is no limit on their
/// length. Blank lines are skipped.
pub fn read_feature_seq<R: BufRead>(
    mut reader: R,
    keys: &AttributeKeys,
    builder: &mut IndexBuilder,
) -> Result<usize> {
    let mut line = String::new();
    let mut features = 0;
    let mut indexed = 0;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim_start_matches(RECORD_SEPARATOR).trim();
        if text.is_empty() {
            continue;
        }
        let feature: Feature = serde_json::from_str(text)?;
        indexed += index_feature(builder, &feature, keys)?;
        features += 1;
    }
    info!(features, loops = indexed, "Read GeoJSON feature sequence");
    Ok(indexed)
}
