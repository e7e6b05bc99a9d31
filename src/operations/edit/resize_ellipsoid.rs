use crate::error::{ObjectError, Result};
use crate::geometry::Primitive;
use crate::scene::{ObjectId, Scene};

/// Changes the radii of an ellipsoid.
pub struct ResizeEllipsoid {
    id: ObjectId,
    radii: (f64, f64, f64),
}

impl ResizeEllipsoid {
    /// Creates a new `ResizeEllipsoid` operation.
    #[must_use]
    pub fn new(id: ObjectId, a: f64, b: f64, c: f64) -> Self {
        Self { id, radii: (a, b, c) }
    }

    /// Executes the resize and marks the ellipsoid Dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is stale or not an ellipsoid, or a radius is
    /// non-positive or not finite.
    pub fn execute(&self, scene: &mut Scene) -> Result<()> {
        let id = self.id;
        let (a, b, c) = self.radii;
        scene.edit(id, |prim| match prim {
            Primitive::Ellipsoid(ellipsoid) => ellipsoid.set_radii(a, b, c),
            _ => Err(ObjectError::WrongKind {
                id,
                expected: "ellipsoid",
            }
            .into()),
        })
    }
}
