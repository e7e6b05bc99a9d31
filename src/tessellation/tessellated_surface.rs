use crate::math::intersect_3d::ray_triangle_intersect;
use crate::math::{Point2, Point3, Ray};

use super::{PatchBvh, SurfaceMesh, TriangleMesh};

/// Closest ray hit on a tessellated surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// Distance along the ray.
    pub t: f64,
    /// World-space hit point.
    pub point: Point3,
    /// Surface parameters interpolated from the triangle corners.
    pub uv: Point2,
    /// Patch index, ordered `pv * patches_u + pu`.
    pub patch: usize,
}

/// A committed surface tessellation together with its patch hierarchy.
#[derive(Debug, Clone)]
pub struct TessellatedSurface {
    mesh: SurfaceMesh,
    bvh: PatchBvh,
}

impl TessellatedSurface {
    /// Wraps a mesh and builds the hierarchy over its patch boxes.
    #[must_use]
    pub fn new(mesh: SurfaceMesh) -> Self {
        let bvh = PatchBvh::build(&mesh.patch_bounds);
        Self { mesh, bvh }
    }

    /// The triangle mesh.
    #[must_use]
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh.mesh
    }

    /// The mesh with its per-patch grouping.
    #[must_use]
    pub fn surface_mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    /// The patch hierarchy.
    #[must_use]
    pub fn bvh(&self) -> &PatchBvh {
        &self.bvh
    }

    /// Closest intersection of `ray` with the triangles.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        self.bvh.trace_closest(ray, |patch| {
            let hit = self.intersect_patch(ray, patch)?;
            Some((hit.t, hit))
        })
    }

    fn intersect_patch(&self, ray: &Ray, patch: usize) -> Option<SurfaceHit> {
        let mesh = &self.mesh.mesh;
        let range = self.mesh.patch_triangles.get(patch)?.clone();
        let mut best: Option<SurfaceHit> = None;

        for triangle in mesh.indices.get(range)? {
            let [a, b, c] = triangle.map(|i| i as usize);
            let Some(hit) = ray_triangle_intersect(
                ray,
                &mesh.vertices[a],
                &mesh.vertices[b],
                &mesh.vertices[c],
            ) else {
                continue;
            };
            if best.as_ref().is_some_and(|best| best.t <= hit.t) {
                continue;
            }

            let w = 1.0 - hit.u - hit.v;
            let uv = mesh.uvs[a].coords * w
                + mesh.uvs[b].coords * hit.u
                + mesh.uvs[c].coords * hit.v;
            best = Some(SurfaceHit {
                t: hit.t,
                point: ray.at(hit.t),
                uv: uv.into(),
                patch,
            });
        }
        best
    }
}
