use crate::error::Result;
use crate::geometry::point::ensure_finite;
use crate::geometry::Ellipsoid;
use crate::math::{Isometry3, Point3};
use crate::scene::{ObjectId, Scene};

/// Adds an ellipsoid to the scene.
pub struct AddEllipsoid {
    radii: (f64, f64, f64),
    transform: Isometry3,
}

impl AddEllipsoid {
    /// Creates a new `AddEllipsoid` operation for an ellipsoid with radii
    /// `(a, b, c)` centred at the origin.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self {
            radii: (a, b, c),
            transform: Isometry3::identity(),
        }
    }

    /// Centres the ellipsoid at `center`, keeping its orientation.
    #[must_use]
    pub fn at(mut self, center: Point3) -> Self {
        self.transform.translation.vector = center.coords;
        self
    }

    /// Places the ellipsoid with an explicit rigid transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Isometry3) -> Self {
        self.transform = transform;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a radius is non-positive or not finite, or the
    /// centre is not finite. Nothing is added on error.
    pub fn execute(&self, scene: &mut Scene) -> Result<ObjectId> {
        let (a, b, c) = self.radii;
        ensure_finite(&Point3::from(self.transform.translation.vector))?;
        let ellipsoid = Ellipsoid::new(a, b, c)?.with_transform(self.transform);
        Ok(scene.add(ellipsoid))
    }
}
