use crate::error::Result;
use crate::math::Vector3;
use crate::scene::{ObjectId, Scene};

/// Translates any object by a displacement vector.
pub struct TranslateObject {
    id: ObjectId,
    displacement: Vector3,
}

impl TranslateObject {
    /// Creates a new `TranslateObject` operation.
    #[must_use]
    pub fn new(id: ObjectId, displacement: Vector3) -> Self {
        Self { id, displacement }
    }

    /// Executes the translation and marks the object Dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is stale or the displacement is not finite.
    /// On error the object keeps its geometry and commit state.
    pub fn execute(&self, scene: &mut Scene) -> Result<()> {
        scene.edit(self.id, |prim| prim.translate(&self.displacement))
    }
}
