use crate::error::{ObjectError, Result};
use crate::scene::{ObjectId, Scene, SceneObject};

/// Removes an object from the scene.
pub struct RemoveObject {
    id: ObjectId,
}

impl RemoveObject {
    /// Creates a new `RemoveObject` operation.
    #[must_use]
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }

    /// Executes the removal and returns the removed object.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::NotFound`] if `id` is stale.
    pub fn execute(&self, scene: &mut Scene) -> Result<SceneObject> {
        scene
            .remove(self.id)
            .ok_or_else(|| ObjectError::NotFound(self.id).into())
    }
}
