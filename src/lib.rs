mod coordinate;
mod flatbush;
mod geo_loop;
mod point;
mod rectangle;
mod seg_rtree;

pub mod codec;
pub mod errors;
pub mod geojson;
pub mod index;
pub mod ring;
pub mod utils;

pub use crate::seg_rtree::SegRTree;
pub use coordinate::Coordinate;
pub use flatbush::{Flatbush, FLATBUSH_DEFAULT_DEGREE};
pub use geo_loop::{Loop, EDGE_TREE_DEGREE};
pub use geojson::AttributeKeys;
pub use index::{CountryIndex, CountryMatch, IndexBuilder, IndexedLoop};
pub use point::{LatLng, Point};
pub use rectangle::{HasEnvelope, Rectangle};
