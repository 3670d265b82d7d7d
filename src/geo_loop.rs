use crate::errors::{Error, Result};
use crate::utils::{edge_envelope, on_edge, MeridianArc};
use crate::{Coordinate, HasEnvelope, LatLng, Point, Rectangle, SegRTree};
use std::f64::consts::PI;

/// Fan-out of the per-loop edge tree.
pub const EDGE_TREE_DEGREE: usize = 16;

/// A simple closed ring of points on the unit sphere.
///
/// The ring is implicitly closed from the last vertex back to the first, has
/// no two consecutive identical vertices, and winds counter-clockwise seen
/// from outside the sphere: the interior is on the left of every edge.
///
/// Points on an edge or a vertex are outside the loop.
#[derive(Debug, Clone)]
pub struct Loop {
    vertices: Vec<Point>,
    // Leaf i is the box of the edge vertices[i] -> vertices[i + 1].
    rtree: SegRTree,
    bound: Rectangle,
    north_pole_inside: bool,
}

impl PartialEq for Loop {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl HasEnvelope for Loop {
    fn envelope(&self) -> Rectangle {
        self.bound
    }
}

impl Loop {
    /// Build a loop from a ring of `(lng, lat)` coordinates.
    ///
    /// The ring may be given closed or open. It must already be
    /// counter-clockwise; see [`crate::ring::force_ccw`].
    pub fn from_ring(ring: &[Coordinate]) -> Result<Loop> {
        let vertices = ring
            .iter()
            .map(|c| LatLng::new(c.lat(), c.lng()).to_point())
            .collect();
        Loop::from_points(vertices)
    }

    /// Build a loop from sphere points, dropping a closing duplicate and any
    /// repeated consecutive vertices.
    pub fn from_points(mut vertices: Vec<Point>) -> Result<Loop> {
        vertices.dedup();
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(Error::MalformedRing {
                vertices: vertices.len(),
            });
        }

        let edge_boxes: Vec<Rectangle> = (0..vertices.len())
            .map(|i| {
                let (start, end) = edge(&vertices, i);
                edge_envelope(start, end)
            })
            .collect();
        let rtree = SegRTree::new_loaded(EDGE_TREE_DEGREE, &edge_boxes);
        let mut result = Loop {
            vertices,
            bound: rtree.envelope(),
            rtree,
            north_pole_inside: false,
        };
        result.north_pole_inside = result.compute_north_pole_inside();

        // A loop around a pole reaches it from every longitude.
        if result.north_pole_inside {
            result.bound.expand(Rectangle::latitude_band(90., 90.));
        }
        if result.contains(LatLng::new(-90., 0.)) {
            result.bound.expand(Rectangle::latitude_band(-90., -90.));
        }
        Ok(result)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.rtree.len()
    }

    pub fn north_pole_inside(&self) -> bool {
        self.north_pole_inside
    }

    /// Whether `ll` is strictly inside the loop.
    pub fn contains(&self, ll: LatLng) -> bool {
        let point = ll.to_point();
        let arc = MeridianArc::new(ll);
        let mut inside = self.north_pole_inside;

        for i in self.edge_candidates(ll) {
            let (start, end) = edge(&self.vertices, i);
            if on_edge(point, start, end) {
                return false;
            }
            if arc.crosses(start, end) {
                inside = !inside;
            }
        }
        inside
    }

    /// The closed `(lng, lat)` ring for this loop.
    pub fn to_ring(&self) -> Vec<Coordinate> {
        self.vertices
            .iter()
            .chain(self.vertices.first())
            .map(|p| {
                let ll = p.to_lat_lng();
                Coordinate::new(ll.lng, ll.lat)
            })
            .collect()
    }

    /// Indices of the edges that may touch the meridian arc from the north
    /// pole down to `ll`.
    fn edge_candidates(&self, ll: LatLng) -> Vec<usize> {
        let boxes = Rectangle::wrapped(MeridianArc::search_box(ll));
        if boxes.len() == 1 {
            return self.rtree.query_rect(boxes[0]);
        }
        let mut candidates: Vec<usize> = boxes
            .into_iter()
            .flat_map(|b| self.rtree.query_rect(b))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }

    /// Decide which side of the loop the north pole is on by probing a point
    /// known to be just inside it.
    fn compute_north_pole_inside(&self) -> bool {
        let probe = self.interior_probe();
        let arc = MeridianArc::new(probe.to_lat_lng());
        let crossings = (0..self.vertices.len())
            .filter(|&i| {
                let (start, end) = edge(&self.vertices, i);
                arc.crosses(start, end)
            })
            .count();
        // The probe is inside, so the pole is too iff the arc between them
        // crosses the boundary an even number of times.
        crossings % 2 == 0
    }

    /// A point slightly to the left of the vertex where that is best
    /// conditioned: long adjacent edges and an open interior angle.
    fn interior_probe(&self) -> Point {
        let n = self.vertices.len();
        let mut best: Option<(f64, Point)> = None;
        for i in 0..n {
            let prev = self.vertices[(i + n - 1) % n];
            let vertex = self.vertices[i];
            let next = self.vertices[(i + 1) % n];

            let to_next = tangent(vertex, next);
            let to_prev = tangent(vertex, prev);
            let length = vertex.angle(prev).min(vertex.angle(next));
            // Interior angle, swept counter-clockwise from the outgoing edge
            // to the incoming one.
            let mut theta = Point::triple(to_next, to_prev, vertex).atan2(to_next.dot(to_prev));
            if theta <= 0. {
                theta += 2. * PI;
            }
            let score = length * (theta / 2.).sin();
            if best.map_or(true, |(s, _)| score > s) {
                let half = theta / 2.;
                let bisector = to_next * half.cos() + vertex.cross(to_next) * half.sin();
                let probe = (vertex + bisector * (length * 1e-3)).normalize();
                best = Some((score, probe));
            }
        }
        // The loop has at least three vertices.
        best.map_or(self.vertices[0], |(_, probe)| probe)
    }
}

fn edge(vertices: &[Point], i: usize) -> (Point, Point) {
    (vertices[i], vertices[(i + 1) % vertices.len()])
}

/// Unit tangent at `from` pointing along the great circle toward `to`.
fn tangent(from: Point, to: Point) -> Point {
    (to - from * from.dot(to)).normalize()
}
