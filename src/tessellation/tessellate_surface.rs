use std::ops::Range;

use crate::error::{Result, TessellationError};
use crate::geometry::surface::ParametricSurface;
use crate::math::{Aabb, Point2, Vector3, TOLERANCE};

use super::{TessellationParams, TriangleMesh, MAX_SAMPLES_PER_PATCH};

/// Tessellation output, grouped by patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// The triangle mesh of the whole surface.
    pub mesh: TriangleMesh,
    /// Range into `mesh.indices` owned by each patch, ordered `pv * patches_u + pu`.
    pub patch_triangles: Vec<Range<usize>>,
    /// Control-net box of each patch, same order as `patch_triangles`.
    pub patch_bounds: Vec<Aabb>,
}

/// Tessellates a parametric surface into a per-patch triangle grid.
pub struct TessellateSurface<'a> {
    surface: &'a ParametricSurface,
    params: TessellationParams,
}

impl<'a> TessellateSurface<'a> {
    /// Creates a new `TessellateSurface` operation.
    #[must_use]
    pub fn new(surface: &'a ParametricSurface, params: TessellationParams) -> Self {
        Self { surface, params }
    }

    /// Executes the tessellation.
    ///
    /// Patches do not share seam vertices, so each patch owns a contiguous
    /// block of vertices and triangles.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples_per_patch` is zero or above
    /// [`MAX_SAMPLES_PER_PATCH`], or if the mesh would not fit `u32` indices.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<SurfaceMesh> {
        let n = self.params.samples_per_patch;
        if n == 0 || n > MAX_SAMPLES_PER_PATCH {
            return Err(TessellationError::InvalidParameters(format!(
                "samples_per_patch must be in 1..={MAX_SAMPLES_PER_PATCH}, got {n}"
            ))
            .into());
        }

        let surface = self.surface;
        let per_patch = (n + 1) * (n + 1);
        let vertex_count = surface.patch_count() * per_patch;
        if u32::try_from(vertex_count).is_err() {
            return Err(TessellationError::Failed(format!(
                "{vertex_count} vertices exceed the u32 index range"
            ))
            .into());
        }

        let mut out = SurfaceMesh {
            mesh: TriangleMesh {
                vertices: Vec::with_capacity(vertex_count),
                normals: Vec::with_capacity(vertex_count),
                uvs: Vec::with_capacity(vertex_count),
                indices: Vec::with_capacity(surface.patch_count() * n * n * 2),
            },
            patch_triangles: Vec::with_capacity(surface.patch_count()),
            patch_bounds: surface.all_patch_bounds(),
        };

        let step = 1.0 / n as f64;
        for pv in 0..surface.patches_v() {
            for pu in 0..surface.patches_u() {
                let base = out.mesh.vertices.len();
                for j in 0..=n {
                    let t = j as f64 * step;
                    for i in 0..=n {
                        let s = i as f64 * step;
                        let (point, du, dv) = surface.patch_derivatives(pu, pv, s, t);
                        let normal = du.cross(&dv).try_normalize(TOLERANCE).unwrap_or_else(Vector3::y);
                        out.mesh.vertices.push(point);
                        out.mesh.normals.push(normal);
                        out.mesh.uvs.push(Point2::new(pu as f64 + s, pv as f64 + t));
                    }
                }

                let first_triangle = out.mesh.indices.len();
                let index = |i: usize, j: usize| vertex_index(base + j * (n + 1) + i);
                for j in 0..n {
                    for i in 0..n {
                        let a = index(i, j)?;
                        let b = index(i + 1, j)?;
                        let c = index(i + 1, j + 1)?;
                        let d = index(i, j + 1)?;
                        out.mesh.indices.push([a, b, c]);
                        out.mesh.indices.push([a, c, d]);
                    }
                }
                out.patch_triangles.push(first_triangle..out.mesh.indices.len());
            }
        }

        Ok(out)
    }
}

fn vertex_index(index: usize) -> Result<u32> {
    u32::try_from(index)
        .map_err(|_| TessellationError::Failed(format!("vertex index {index} overflows u32")).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::{Continuity, Surface};
    use crate::math::Point3;

    fn params(n: usize) -> TessellationParams {
        TessellationParams {
            samples_per_patch: n,
        }
    }

    #[test]
    fn counts_per_patch() {
        let surface = ParametricSurface::flat(Continuity::C2, 3, 2, 1.0).unwrap();
        let out = TessellateSurface::new(&surface, params(4)).execute().unwrap();
        assert_eq!(out.patch_triangles.len(), 6);
        assert_eq!(out.patch_bounds.len(), 6);
        assert_eq!(out.mesh.vertices.len(), 6 * 25);
        assert_eq!(out.mesh.normals.len(), out.mesh.vertices.len());
        assert_eq!(out.mesh.uvs.len(), out.mesh.vertices.len());
        assert_eq!(out.mesh.indices.len(), 6 * 4 * 4 * 2);
        for (k, range) in out.patch_triangles.iter().enumerate() {
            assert_eq!(range.len(), 32, "patch {k}");
        }
    }

    #[test]
    fn vertices_lie_on_surface() {
        let mut surface = ParametricSurface::flat(Continuity::C0, 2, 2, 1.0).unwrap();
        surface.set_control_point(3, 3, Point3::new(0.0, 1.5, 0.0)).unwrap();
        let out = TessellateSurface::new(&surface, params(3)).execute().unwrap();
        for (vertex, uv) in out.mesh.vertices.iter().zip(&out.mesh.uvs) {
            let expected = surface.evaluate(uv.x, uv.y).unwrap();
            assert!((vertex - expected).norm() < 1e-12);
        }
    }

    #[test]
    fn indices_are_in_range() {
        let surface = ParametricSurface::flat(Continuity::C0, 1, 3, 2.0).unwrap();
        let out = TessellateSurface::new(&surface, params(5)).execute().unwrap();
        let count = u32::try_from(out.mesh.vertices.len()).unwrap();
        assert!(out.mesh.indices.iter().flatten().all(|&i| i < count));
    }

    #[test]
    fn invalid_sample_counts_rejected() {
        let surface = ParametricSurface::flat(Continuity::C2, 1, 1, 1.0).unwrap();
        assert!(TessellateSurface::new(&surface, params(0)).execute().is_err());
        assert!(TessellateSurface::new(&surface, params(MAX_SAMPLES_PER_PATCH + 1))
            .execute()
            .is_err());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let surface = ParametricSurface::flat(Continuity::C2, 2, 2, 1.0).unwrap();
        let op = TessellateSurface::new(&surface, TessellationParams::default());
        assert_eq!(op.execute().unwrap(), op.execute().unwrap());
    }
}
