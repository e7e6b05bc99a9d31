mod bvh;
mod tessellate_surface;
mod tessellated_surface;

pub use bvh::{BvhNode, PatchBvh};
pub use tessellate_surface::{SurfaceMesh, TessellateSurface};
pub use tessellated_surface::{SurfaceHit, TessellatedSurface};

use crate::math::{Point2, Point3, Vector3};

/// Upper limit for [`TessellationParams::samples_per_patch`].
pub const MAX_SAMPLES_PER_PATCH: usize = 64;

/// Parameters controlling tessellation quality.
///
/// Every patch is sampled on a regular `samples_per_patch` x
/// `samples_per_patch` quad grid, split into two triangles per quad. Picking
/// accuracy follows the chord error of that grid: a denser grid tracks
/// curved patches more closely but costs `O(samples²)` triangles per patch,
/// both at commit time and in the worst case of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellationParams {
    /// Quads per patch along each parameter direction.
    pub samples_per_patch: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            samples_per_patch: 8,
        }
    }
}

/// A triangle mesh approximation of a surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// UV coordinates.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}
