use crate::error::{ObjectError, Result};
use crate::geometry::Primitive;
use crate::math::Point3;
use crate::scene::{ObjectId, Scene};

/// Moves a free point to a new position.
pub struct MovePoint {
    id: ObjectId,
    position: Point3,
}

impl MovePoint {
    /// Creates a new `MovePoint` operation.
    #[must_use]
    pub fn new(id: ObjectId, position: Point3) -> Self {
        Self { id, position }
    }

    /// Executes the move and marks the point Dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is stale, is not a point, or the position is
    /// not finite.
    pub fn execute(&self, scene: &mut Scene) -> Result<()> {
        let id = self.id;
        scene.edit(id, |prim| match prim {
            Primitive::Point(point) => point.set_position(self.position),
            _ => Err(ObjectError::WrongKind {
                id,
                expected: "point",
            }
            .into()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CadbaneError;
    use crate::geometry::{Ellipsoid, Point};

    #[test]
    fn moves_point_and_dirties() {
        let mut scene = Scene::default();
        let id = scene.add(Point::new(Point3::origin()).unwrap());
        scene.update_objects();

        MovePoint::new(id, Point3::new(1.0, 1.0, 1.0))
            .execute(&mut scene)
            .unwrap();
        let object = scene.get(id).unwrap();
        assert!(object.is_dirty());
        assert_eq!(object.bounds().min, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn rejects_other_kinds() {
        let mut scene = Scene::default();
        let id = scene.add(Ellipsoid::new(1.0, 1.0, 1.0).unwrap());
        scene.update_objects();

        let err = MovePoint::new(id, Point3::origin())
            .execute(&mut scene)
            .unwrap_err();
        assert!(matches!(
            err,
            CadbaneError::Object(ObjectError::WrongKind { expected: "point", .. })
        ));
        assert!(!scene.get(id).unwrap().is_dirty());
    }
}
