use crate::error::Result;
use crate::geometry::point::ensure_finite;
use crate::geometry::{Continuity, ParametricSurface};
use crate::math::Point3;
use crate::scene::{ObjectId, Scene};

/// Adds a flat bicubic surface to the scene.
///
/// The control grid lies on a plane parallel to XZ through `center`; each
/// patch spans `size` world units. Control points can be moved afterwards,
/// but the grid dimensions are fixed.
pub struct AddSurface {
    continuity: Continuity,
    patches_u: usize,
    patches_v: usize,
    size: f64,
    center: Point3,
}

impl AddSurface {
    /// Creates a new `AddSurface` operation centred at the origin.
    #[must_use]
    pub fn new(continuity: Continuity, patches_u: usize, patches_v: usize, size: f64) -> Self {
        Self {
            continuity,
            patches_u,
            patches_v,
            size,
            center: Point3::origin(),
        }
    }

    /// Centres the surface at `center`.
    #[must_use]
    pub fn at(mut self, center: Point3) -> Self {
        self.center = center;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if either patch count is zero, `size` is not a
    /// positive finite number, or `center` is not finite.
    pub fn execute(&self, scene: &mut Scene) -> Result<ObjectId> {
        ensure_finite(&self.center)?;
        let mut surface =
            ParametricSurface::flat(self.continuity, self.patches_u, self.patches_v, self.size)?;
        surface.translate(&self.center.coords);
        let name = format!(
            "{} surface {}x{}",
            self.continuity, self.patches_u, self.patches_v
        );
        Ok(scene.add_named(surface, name))
    }
}
