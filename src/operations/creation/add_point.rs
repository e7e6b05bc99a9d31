use crate::error::Result;
use crate::geometry::Point;
use crate::math::Point3;
use crate::scene::{ObjectId, Scene};

/// Adds a free point to the scene.
pub struct AddPoint {
    position: Point3,
    name: Option<String>,
}

impl AddPoint {
    /// Creates a new `AddPoint` operation.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            name: None,
        }
    }

    /// Uses `name` instead of a generated display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Executes the operation. The new point is Dirty until the next commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is not finite; the scene is left
    /// unchanged.
    pub fn execute(&self, scene: &mut Scene) -> Result<ObjectId> {
        let point = Point::new(self.position)?;
        Ok(match &self.name {
            Some(name) => scene.add_named(point, name.clone()),
            None => scene.add(point),
        })
    }
}
