//! Bounding volume hierarchy over surface patches.
//!
//! Built top-down by splitting the patch list at the median centroid along
//! the longest axis of the centroid bounds.

use crate::math::{Aabb, Point3, Ray};

/// Leaves hold a single patch so the leaf box is the patch box.
const MAX_LEAF_PATCHES: usize = 1;

/// A BVH node - either a leaf holding patch indices or an internal node with children.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Leaf node containing patch indices.
    Leaf {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb,
        /// Patch indices contained in this leaf.
        patches: Vec<usize>,
    },
    /// Internal node with two children.
    Internal {
        /// Axis-aligned bounding box of this node.
        aabb: Aabb,
        /// Left child node.
        left: Box<BvhNode>,
        /// Right child node.
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Bounding box of the node.
    #[must_use]
    pub fn aabb(&self) -> &Aabb {
        match self {
            Self::Leaf { aabb, .. } | Self::Internal { aabb, .. } => aabb,
        }
    }
}

/// Patch-level bounding hierarchy used to cull ray/triangle tests.
#[derive(Debug, Clone, Default)]
pub struct PatchBvh {
    root: Option<BvhNode>,
}

impl PatchBvh {
    /// Builds the hierarchy from one box per patch.
    #[must_use]
    pub fn build(patch_bounds: &[Aabb]) -> Self {
        let mut items: Vec<(usize, Aabb, Point3)> = patch_bounds
            .iter()
            .enumerate()
            .map(|(index, aabb)| (index, *aabb, aabb.center()))
            .collect();

        let root = if items.is_empty() {
            None
        } else {
            Some(build_node(&mut items))
        };
        Self { root }
    }

    /// Root node, or `None` for an empty hierarchy.
    #[must_use]
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Number of levels (0 when empty).
    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth_of(node: &BvhNode) -> usize {
            match node {
                BvhNode::Leaf { .. } => 1,
                BvhNode::Internal { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
            }
        }
        self.root.as_ref().map_or(0, depth_of)
    }

    /// Finds the closest hit, calling `test` only for patches whose boxes the
    /// ray enters before the best hit found so far.
    ///
    /// `test` returns the hit distance together with any payload.
    pub fn trace_closest<H, F>(&self, ray: &Ray, mut test: F) -> Option<H>
    where
        F: FnMut(usize) -> Option<(f64, H)>,
    {
        let mut closest = None;
        let mut closest_t = f64::INFINITY;
        if let Some(root) = &self.root {
            trace_node(ray, root, &mut test, &mut closest, &mut closest_t);
        }
        closest
    }
}

fn build_node(items: &mut [(usize, Aabb, Point3)]) -> BvhNode {
    let (first, rest) = items.split_at(1);
    let aabb = rest.iter().fold(first[0].1, |acc, item| acc.union(&item.1));

    if items.len() <= MAX_LEAF_PATCHES {
        return BvhNode::Leaf {
            aabb,
            patches: items.iter().map(|item| item.0).collect(),
        };
    }

    let centroids = rest
        .iter()
        .fold(Aabb::from_point(first[0].2), |acc, item| acc.including(&item.2));
    let axis = centroids.longest_axis();
    items.sort_by(|a, b| a.2[axis].total_cmp(&b.2[axis]));

    let mid = items.len() / 2;
    let (left, right) = items.split_at_mut(mid);
    BvhNode::Internal {
        aabb,
        left: Box::new(build_node(left)),
        right: Box::new(build_node(right)),
    }
}

fn trace_node<H, F>(
    ray: &Ray,
    node: &BvhNode,
    test: &mut F,
    closest: &mut Option<H>,
    closest_t: &mut f64,
) where
    F: FnMut(usize) -> Option<(f64, H)>,
{
    let Some((t_enter, _)) = ray.intersect_aabb(node.aabb()) else {
        return;
    };
    if t_enter > *closest_t {
        return;
    }

    match node {
        BvhNode::Leaf { patches, .. } => {
            for &patch in patches {
                if let Some((t, hit)) = test(patch) {
                    if t < *closest_t {
                        *closest_t = t;
                        *closest = Some(hit);
                    }
                }
            }
        }
        BvhNode::Internal { left, right, .. } => {
            let left_t = ray.intersect_aabb(left.aabb()).map(|(t, _)| t);
            let right_t = ray.intersect_aabb(right.aabb()).map(|(t, _)| t);
            // Nearer child first so the farther one can be pruned.
            let (first, second) = match (left_t, right_t) {
                (Some(lt), Some(rt)) if rt < lt => (right, left),
                _ => (left, right),
            };
            trace_node(ray, first, test, closest, closest_t);
            trace_node(ray, second, test, closest, closest_t);
        }
    }
}
