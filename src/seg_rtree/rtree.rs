use crate::utils::calculate_level_indices;
use crate::Rectangle;

/// A packed, static Rtree over the edges of a single loop.
///
/// Leaves keep the order of the edges they were loaded with, so the leaf
/// offset returned by a query is the edge index.
#[derive(Debug, Clone)]
pub struct SegRTree {
    degree: usize,
    size: usize,
    height: usize,
    level_indices: Vec<usize>,
    tree: Vec<Rectangle>,
}

impl SegRTree {
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn new_loaded(mut degree: usize, rects: &[Rectangle]) -> Self {
        degree = degree.max(2);
        let size = rects.len();
        let level_indices = calculate_level_indices(degree, size);
        let tree_size = level_indices[level_indices.len() - 1] + 1;
        let mut tree = vec![Rectangle::new_empty(); tree_size];
        copy_into_tree(&mut tree, 0, rects);

        for level in 1..level_indices.len() {
            let level_index = level_indices[level];
            let previous_items = &tree[level_indices[level - 1]..level_index];
            let next_items: Vec<Rectangle> = previous_items
                .chunks(degree)
                .map(|items| Rectangle::of(items))
                .collect();
            copy_into_tree(&mut tree, level_index, &next_items);
        }

        tree.shrink_to_fit();
        SegRTree {
            degree,
            size,
            height: level_indices.len() - 1,
            level_indices,
            tree,
        }
    }

    pub fn envelope(&self) -> Rectangle {
        self.get_rectangle(self.height, 0)
    }

    /// Indices of the leaves whose rectangle intersects `rect`.
    pub fn query_rect(&self, rect: Rectangle) -> Vec<usize> {
        self.query(|level, offset| self.get_rectangle(level, offset).intersects(rect))
    }

    fn query<P>(&self, predicate: P) -> Vec<usize>
    where
        P: Fn(usize, usize) -> bool,
    {
        let mut results = Vec::new();
        if self.size == 0 {
            return results;
        }

        // Stack entries: (level, offset)
        let mut stack = vec![(self.height, 0)];
        while let Some((level, offset)) = stack.pop() {
            if !predicate(level, offset) {
                continue;
            }
            if level == 0 {
                results.push(offset);
            } else {
                let child_level = level - 1;
                let first_child_offset = self.degree * offset;
                for child_offset in first_child_offset..(first_child_offset + self.degree) {
                    stack.push((child_level, child_offset));
                }
            }
        }

        results
    }

    pub(crate) fn get_rectangle(&self, level: usize, offset: usize) -> Rectangle {
        self.tree[self.level_indices[level] + offset]
    }
}

fn copy_into_tree(tree: &mut [Rectangle], index: usize, rects: &[Rectangle]) {
    let (_, subtree) = tree.split_at_mut(index);
    let (subtree, _) = subtree.split_at_mut(rects.len());
    subtree.copy_from_slice(rects);
}
