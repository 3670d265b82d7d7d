//! Planar orientation helpers for raw `(lng, lat)` rings, applied before the
//! rings are projected onto the sphere.
use crate::Coordinate;

/// Twice the signed planar area of the ring (shoelace formula).
///
/// Positive for counter-clockwise rings. The ring may be given closed or
/// open; the closing segment is implied either way.
pub fn signed_area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 3 {
        return 0.;
    }
    let origin = ring[0];
    let shifted = |c: Coordinate| Coordinate::new(c.x - origin.x, c.y - origin.y);
    ring.iter()
        .zip(ring.iter().skip(1).chain(ring.first()))
        .map(|(&a, &b)| shifted(a).cross(shifted(b)))
        .sum()
}

pub fn is_ccw(ring: &[Coordinate]) -> bool {
    signed_area(ring) > 0.
}

/// Reverse the ring in place if it winds clockwise, so that the enclosed area
/// is on its left.
///
/// Rings are expected not to cross the antimeridian, as in RFC 7946 GeoJSON.
pub fn force_ccw(ring: &mut [Coordinate]) {
    if signed_area(ring) < 0. {
        ring.reverse();
    }
}
