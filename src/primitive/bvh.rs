use crate::core::{bbox::Bbox, intersection::Intersection, ray::Ray};

use super::{Primitive, PrimitiveT};

/// Bounding volume hierarchy over the scene primitives.
///
/// Nodes live in one arena and refer to their children by index. Leaves refer to a
/// range of `indices`, which maps back to the primitive list in its original order,
/// so primitive indices reported by queries are the ones the caller passed in.
pub struct BvhAccel {
    nodes: Vec<BvhNode>,
    indices: Vec<usize>,
    primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Copy)]
enum BvhNode {
    Leaf {
        bbox: Bbox,
        start: usize,
        end: usize,
    },
    Interior {
        bbox: Bbox,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BvhStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
    pub max_leaf_size: usize,
}

impl BvhAccel {
    pub const MAX_LEAF_SIZE: usize = 2;
    /// number of buckets, candidate planes sit at the inner bucket borders
    pub const SAH_CANDIDATES: usize = 16;
    const TRAVERSAL_COST: f32 = 0.5;

    pub fn new(primitives: Vec<Primitive>) -> Self {
        let mut indices: Vec<usize> = (0..primitives.len()).collect();
        if primitives.is_empty() {
            return Self {
                nodes: vec![],
                indices,
                primitives,
            };
        }

        let boxes: Vec<Bbox> = primitives.iter().map(|prim| prim.bbox()).collect();
        let centroids: Vec<glam::Vec3A> = boxes.iter().map(|bbox| bbox.centroid()).collect();

        let mut nodes = vec![BvhNode::Leaf {
            bbox: Bbox::englobing(boxes.iter().copied()),
            start: 0,
            end: primitives.len(),
        }];

        let mut stack = vec![0];
        while let Some(u) = stack.pop() {
            let (bbox, start, end) = match nodes[u] {
                BvhNode::Leaf { bbox, start, end } => (bbox, start, end),
                BvhNode::Interior { .. } => continue,
            };

            let slice = &mut indices[start..end];
            let mid = match Self::find_split(&boxes, &centroids, slice, bbox) {
                Some(mid) => start + mid,
                None => continue,
            };

            let left = nodes.len();
            nodes.push(BvhNode::Leaf {
                bbox: Bbox::englobing(indices[start..mid].iter().map(|i| boxes[*i])),
                start,
                end: mid,
            });
            let right = nodes.len();
            nodes.push(BvhNode::Leaf {
                bbox: Bbox::englobing(indices[mid..end].iter().map(|i| boxes[*i])),
                start: mid,
                end,
            });
            nodes[u] = BvhNode::Interior { bbox, left, right };

            stack.push(left);
            stack.push(right);
        }

        Self {
            nodes,
            indices,
            primitives,
        }
    }

    /// Partitions `indices` by the cheapest candidate plane and returns the size of
    /// the left part, or `None` when the node should stay a leaf.
    fn find_split(
        boxes: &[Bbox],
        centroids: &[glam::Vec3A],
        indices: &mut [usize],
        bbox: Bbox,
    ) -> Option<usize> {
        let count = indices.len();
        if count <= Self::MAX_LEAF_SIZE {
            return None;
        }

        let centers = Bbox::englobing_centers(indices.iter().map(|i| boxes[*i]));
        let axis = centers.max_extent_axis();
        let axis_min = centers.p_min[axis];
        let axis_len = centers.p_max[axis] - axis_min;
        if !(axis_len > 0.0) {
            return None;
        }

        let parent_area = bbox.surface_area();
        if !(parent_area > 0.0) {
            return None;
        }

        let mut best_cost = f32::INFINITY;
        let mut best_plane = axis_min;
        for k in 1..Self::SAH_CANDIDATES {
            let plane = axis_min + axis_len * k as f32 / Self::SAH_CANDIDATES as f32;
            let mut left_bbox = Bbox::empty();
            let mut left_count = 0;
            let mut right_bbox = Bbox::empty();
            let mut right_count = 0;
            for i in indices.iter() {
                if centroids[*i][axis] <= plane {
                    left_bbox = left_bbox.merge(boxes[*i]);
                    left_count += 1;
                } else {
                    right_bbox = right_bbox.merge(boxes[*i]);
                    right_count += 1;
                }
            }
            if left_count == 0 || right_count == 0 {
                continue;
            }

            let cost = Self::TRAVERSAL_COST
                + (left_count as f32 * left_bbox.surface_area()
                    + right_count as f32 * right_bbox.surface_area())
                    / parent_area;
            if cost < best_cost {
                best_cost = cost;
                best_plane = plane;
            }
        }

        if !(best_cost < count as f32) {
            return None;
        }

        let mut mid = 0;
        for i in 0..count {
            if centroids[indices[i]][axis] <= best_plane {
                indices.swap(i, mid);
                mid += 1;
            }
        }
        Some(mid)
    }

    pub fn primitive(&self, index: usize) -> &Primitive {
        &self.primitives[index]
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    #[cfg(test)]
    pub fn bbox(&self) -> Bbox {
        self.nodes
            .first()
            .map_or(Bbox::empty(), |root| root.bbox())
    }

    /// nearest primitive hit along the ray
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        let mut inter = Intersection::default();
        if self.nodes.is_empty() {
            return inter;
        }

        let mut stack = vec![0];
        while let Some(u) = stack.pop() {
            match self.nodes[u] {
                BvhNode::Leaf { bbox, start, end } => {
                    if !bbox.hit_ray(ray) {
                        continue;
                    }
                    for i in &self.indices[start..end] {
                        let t = self.primitives[*i].hit(ray);
                        if t < inter.t {
                            inter.t = t;
                            inter.primitive = Some(*i);
                        }
                    }
                }
                BvhNode::Interior { bbox, left, right } => {
                    if bbox.hit_ray(ray) {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }
        inter
    }

    /// whether any primitive is hit closer than `t_max`
    pub fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let mut stack = vec![0];
        while let Some(u) = stack.pop() {
            match self.nodes[u] {
                BvhNode::Leaf { bbox, start, end } => {
                    if !bbox.hit_ray(ray) {
                        continue;
                    }
                    for i in &self.indices[start..end] {
                        if self.primitives[*i].hit(ray) < t_max {
                            return true;
                        }
                    }
                }
                BvhNode::Interior { bbox, left, right } => {
                    if bbox.hit_ray(ray) {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }
        false
    }

    /// all primitives stored in leaves whose box is hit by the ray
    #[cfg(test)]
    pub fn gather_candidates(&self, ray: &Ray) -> Vec<usize> {
        let mut candidates = vec![];
        if self.nodes.is_empty() {
            return candidates;
        }

        let mut stack = vec![0];
        while let Some(u) = stack.pop() {
            let node = self.nodes[u];
            if !node.bbox().hit_ray(ray) {
                continue;
            }
            match node {
                BvhNode::Leaf { start, end, .. } => {
                    candidates.extend_from_slice(&self.indices[start..end])
                }
                BvhNode::Interior { left, right, .. } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        candidates
    }

    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats {
            node_count: self.nodes.len(),
            ..Default::default()
        };
        if self.nodes.is_empty() {
            return stats;
        }

        let mut stack = vec![(0, 1)];
        while let Some((u, depth)) = stack.pop() {
            stats.max_depth = stats.max_depth.max(depth);
            match self.nodes[u] {
                BvhNode::Leaf { start, end, .. } => {
                    stats.leaf_count += 1;
                    stats.max_leaf_size = stats.max_leaf_size.max(end - start);
                }
                BvhNode::Interior { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        stats
    }
}

impl BvhNode {
    #[cfg(test)]
    fn bbox(&self) -> Bbox {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Interior { bbox, .. } => *bbox,
        }
    }
}
