/**
 * A static, packed Rtree over the bounding boxes of every loop in an index.
 *
 * Items are sorted along a Hilbert curve before packing, in the manner of
 * https://github.com/mourner/flatbush, so that nodes stay spatially tight.
 */
use super::hilbert::Hilbert;
use crate::utils::calculate_level_indices;
use crate::Rectangle;

pub const FLATBUSH_DEFAULT_DEGREE: usize = 16;

#[derive(Debug, Clone)]
pub struct Flatbush {
    degree: usize,
    // nodes in level i are (level_indices[i] .. level_indices[i + 1] - 1)
    level_indices: Vec<usize>,
    tree: Vec<Rectangle>,
    // original item index of each leaf
    node_indices: Vec<usize>,
}

impl Flatbush {
    pub fn new_empty() -> Flatbush {
        Flatbush {
            degree: FLATBUSH_DEFAULT_DEGREE,
            level_indices: vec![0],
            tree: vec![Rectangle::new_empty()],
            node_indices: Vec::new(),
        }
    }

    pub fn new(degree: usize, items: &[Rectangle]) -> Flatbush {
        let total_envelope = Rectangle::of(items);
        if total_envelope.is_empty() {
            // The list of items are empty, or all items are empty.
            return Flatbush::new_unsorted(degree, items);
        }
        let hilbert_square = Hilbert::new(total_envelope);

        let mut entries: Vec<(u32, usize, Rectangle)> = items
            .iter()
            .copied()
            .enumerate()
            .map(|(i, e)| (hilbert_square.hilbert(e.center()), i, e))
            .collect();

        entries.sort_unstable_by_key(|&(h, i, _)| (h, i));

        Flatbush::pack(
            degree,
            entries.into_iter().map(|(_, i, e)| (i, e)).collect(),
        )
    }

    pub fn new_unsorted(degree: usize, items: &[Rectangle]) -> Flatbush {
        let entries = items.iter().copied().enumerate().collect();
        Flatbush::pack(degree, entries)
    }

    fn pack(degree: usize, entries: Vec<(usize, Rectangle)>) -> Flatbush {
        if entries.is_empty() {
            return Flatbush::new_empty();
        }
        let degree = degree.max(2);
        let level_indices = calculate_level_indices(degree, entries.len());
        let tree_size = level_indices[level_indices.len() - 1] + 1;

        let (node_indices, leaves): (Vec<usize>, Vec<Rectangle>) = entries.into_iter().unzip();
        let mut tree = vec![Rectangle::new_empty(); tree_size];
        tree[..leaves.len()].copy_from_slice(&leaves);

        for level in 1..level_indices.len() {
            let level_index = level_indices[level];
            let parents: Vec<Rectangle> = tree[level_indices[level - 1]..level_index]
                .chunks(degree)
                .map(Rectangle::of)
                .collect();
            tree[level_index..level_index + parents.len()].copy_from_slice(&parents);
        }

        Flatbush {
            degree,
            level_indices,
            tree,
            node_indices,
        }
    }

    pub fn len(&self) -> usize {
        self.node_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    fn height(&self) -> usize {
        self.level_indices.len() - 1
    }

    fn get_rectangle(&self, level: usize, offset: usize) -> Rectangle {
        self.tree[self.level_indices[level] + offset]
    }

    pub fn envelope(&self) -> Rectangle {
        self.get_rectangle(self.height(), 0)
    }

    /**
     * Find the items whose bounding box intersects `query`.
     *
     * This only checks bounding-box intersection, so the candidates must be
     * checked by the caller.  Indices are those of the slice the tree was
     * built from, in no particular order.
     */
    pub fn query_rect(&self, query: Rectangle) -> Vec<usize> {
        let mut results = Vec::new();
        if self.is_empty() {
            return results;
        }
        let mut stack: Vec<(usize, usize)> = vec![(self.height(), 0)];

        // Everything pushed on the stack is at a valid (level, offset); empty
        // padding nodes never intersect anything, so they are pruned here.
        while let Some((level, offset)) = stack.pop() {
            let rect = self.get_rectangle(level, offset);
            if !query.intersects(rect) {
                continue;
            }
            if level == 0 {
                results.push(self.node_indices[offset]);
            } else {
                let child_level = level - 1;
                let first_child_offset = self.degree * offset;
                let last_child_offset = first_child_offset + self.degree;
                for child_offset in first_child_offset..last_child_offset {
                    stack.push((child_level, child_offset));
                }
            }
        }

        results
    }
}
