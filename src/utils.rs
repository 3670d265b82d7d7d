use crate::{LatLng, Point, Rectangle};

/// Points closer than this (in radians, about 6 micrometers on the Earth) to
/// an edge are on the boundary.
pub const BOUNDARY_TOLERANCE: f64 = 1e-12;

/// Padding, in degrees, added to edge boxes so that box pruning never rejects
/// an edge the exact predicates would accept.
pub const EDGE_BOX_PADDING: f64 = 1e-9;

/// Latitude beyond which a vertex is treated as sitting on a pole, where
/// longitude is meaningless.
const POLAR_LATITUDE: f64 = 90. - 1e-9;

pub(crate) fn calculate_level_indices(degree: usize, num_items: usize) -> Vec<usize> {
    let mut level_indices: Vec<usize> = vec![0];

    let mut level = 0;
    let mut level_size = num_items;

    while level_size > 1 {
        let level_buffer = if level_size % degree > 0 { 1 } else { 0 };
        // least multiple of degree >= level_size
        let level_capacity = degree * (level_size / degree + level_buffer);
        level_indices.push(level_indices[level] + level_capacity);
        level += 1;
        level_size = level_capacity / degree;
    }
    level_indices
}

/// True if `target`, which must lie on the great circle through `start` and
/// `end` (normal `normal`), is on the short arc between them.
fn arc_contains(start: Point, end: Point, normal: Point, target: Point) -> bool {
    start.cross(target).dot(normal) >= 0. && target.cross(end).dot(normal) >= 0.
}

/// The (lng, lat) box of the great-circle arc from `start` to `end`.
///
/// The latitude range includes the poleward bulge of the arc. Arcs that cross
/// the antimeridian or touch a pole get the full longitude range.
pub fn edge_envelope(start: Point, end: Point) -> Rectangle {
    let a = start.to_lat_lng();
    let b = end.to_lat_lng();
    let mut lat_min = a.lat.min(b.lat);
    let mut lat_max = a.lat.max(b.lat);

    let normal = start.cross(end);
    let norm2 = normal.dot(normal);
    if norm2 > 0. {
        // Highest point of the great circle: the pole projected onto its plane.
        let top = Point::NORTH_POLE - normal * (normal.z / norm2);
        if top.norm() > 0. {
            if arc_contains(start, end, normal, top) {
                lat_max = lat_max.max(top.to_lat_lng().lat);
            }
            if arc_contains(start, end, normal, -top) {
                lat_min = lat_min.min((-top).to_lat_lng().lat);
            }
        }
    }

    let polar = a.lat.abs() > POLAR_LATITUDE || b.lat.abs() > POLAR_LATITUDE;
    let rect = if polar || (a.lng - b.lng).abs() >= 180. {
        Rectangle::latitude_band(lat_min, lat_max)
    } else {
        Rectangle {
            x_min: a.lng.min(b.lng),
            y_min: lat_min,
            x_max: a.lng.max(b.lng),
            y_max: lat_max,
        }
    };
    rect.padded(EDGE_BOX_PADDING)
}

/// True if `point` lies on the arc from `start` to `end`, endpoints included.
pub fn on_edge(point: Point, start: Point, end: Point) -> bool {
    if (point - start).norm() <= BOUNDARY_TOLERANCE || (point - end).norm() <= BOUNDARY_TOLERANCE
    {
        return true;
    }
    let normal = start.cross(end);
    let length = normal.norm();
    if length <= BOUNDARY_TOLERANCE {
        // The edge is shorter than the tolerance and its endpoints were
        // checked above.
        return false;
    }
    if (normal.dot(point) / length).abs() > BOUNDARY_TOLERANCE {
        return false;
    }
    arc_contains(start, end, normal, point)
}

/// The meridian arc running from the north pole down to a query point.
///
/// Counting the loop edges it crosses tells whether the point is on the same
/// side of the loop as the north pole.
#[derive(Debug, Clone, Copy)]
pub struct MeridianArc {
    // Normal of the meridian plane.
    normal: Point,
    // Unit vector in the equatorial plane pointing at the meridian.
    toward: Point,
    sin_lat: f64,
}

impl MeridianArc {
    pub fn new(ll: LatLng) -> Self {
        let (sin_lng, cos_lng) = ll.lng.to_radians().sin_cos();
        MeridianArc {
            normal: Point::new(-sin_lng, cos_lng, 0.),
            toward: Point::new(cos_lng, sin_lng, 0.),
            sin_lat: ll.lat.to_radians().sin(),
        }
    }

    /// The query box that every edge crossed by this arc intersects.
    pub fn search_box(ll: LatLng) -> Rectangle {
        Rectangle {
            x_min: ll.lng,
            y_min: ll.lat,
            x_max: ll.lng,
            y_max: 90.,
        }
        .padded(EDGE_BOX_PADDING)
    }

    /// Whether the edge `start -> end` crosses this arc.
    ///
    /// Vertices exactly on the meridian plane count as being on its eastern
    /// side, so an arc passing through a vertex is counted once for the pair
    /// of edges sharing it, or not at all.
    pub fn crosses(&self, start: Point, end: Point) -> bool {
        let ds = self.normal.dot(start);
        let de = self.normal.dot(end);
        if (ds >= 0.) == (de >= 0.) {
            return false;
        }
        // The point of the edge on the meridian plane, as a positive
        // combination of its endpoints.
        let crossing = if ds < 0. {
            start * de - end * ds
        } else {
            end * ds - start * de
        };
        crossing.dot(self.toward) > 0. && crossing.z > self.sin_lat * crossing.norm()
    }
}
