use crate::error::{ObjectError, Result};
use crate::geometry::Primitive;
use crate::math::Point3;
use crate::scene::{ObjectId, Scene};

/// Moves one control point of a surface.
///
/// The surface bounds follow immediately; the tessellation is rebuilt at the
/// next [`Scene::update_objects`].
pub struct MoveControlPoint {
    id: ObjectId,
    row: usize,
    col: usize,
    position: Point3,
}

impl MoveControlPoint {
    /// Creates a new `MoveControlPoint` operation.
    #[must_use]
    pub fn new(id: ObjectId, row: usize, col: usize, position: Point3) -> Self {
        Self {
            id,
            row,
            col,
            position,
        }
    }

    /// Executes the move and marks the surface Dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is stale or not a surface, `(row, col)` is
    /// outside the control grid, or the position is not finite.
    pub fn execute(&self, scene: &mut Scene) -> Result<()> {
        let id = self.id;
        scene.edit(id, |prim| match prim {
            Primitive::Surface(surface) => {
                surface.set_control_point(self.row, self.col, self.position)
            }
            _ => Err(ObjectError::WrongKind {
                id,
                expected: "surface",
            }
            .into()),
        })
    }
}
