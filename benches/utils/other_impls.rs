use country_lookup::{HasEnvelope, IndexedLoop, LatLng};
use rstar::{RTree, RTreeObject, AABB};

/// A loop's bounding box, pointing back at its position in the index.
pub struct LoopBound {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for LoopBound {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

pub(crate) fn build_rstar(loops: &[IndexedLoop]) -> RTree<LoopBound> {
    RTree::bulk_load(
        loops
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let bound = item.boundary.envelope();
                LoopBound {
                    index,
                    envelope: AABB::from_corners(
                        [bound.x_min, bound.y_min],
                        [bound.x_max, bound.y_max],
                    ),
                }
            })
            .collect(),
    )
}

pub(crate) fn query_rstar<'a>(
    ll: LatLng,
    rtree: &RTree<LoopBound>,
    loops: &'a [IndexedLoop],
) -> Vec<&'a IndexedLoop> {
    let mut candidates: Vec<usize> = rtree
        .locate_in_envelope_intersecting(&AABB::from_point([ll.lng, ll.lat]))
        .map(|bound| bound.index)
        .collect();
    candidates.sort_unstable();
    candidates
        .into_iter()
        .map(|i| &loops[i])
        .filter(|item| item.boundary.contains(ll))
        .collect()
}

pub(crate) fn query_brute_force(ll: LatLng, loops: &[IndexedLoop]) -> Vec<&IndexedLoop> {
    loops
        .iter()
        .filter(|item| item.boundary.contains(ll))
        .collect()
}
