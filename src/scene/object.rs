use std::fmt;

use crate::error::Result;
use crate::geometry::Primitive;
use crate::math::Aabb;
use crate::tessellation::TessellationParams;

slotmap::new_key_type! {
    /// Storage key of an object inside the scene arena.
    pub struct ObjectKey;
}

/// Public handle of a scene object.
///
/// Handles are issued in increasing order and never reused, so a handle
/// held past removal simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    /// Numeric value of the handle.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commit state of an object's derived data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Derived data matches the geometry.
    Clean,
    /// Geometry changed since the last commit.
    Dirty,
}

/// A live object in the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    name: String,
    primitive: Primitive,
    state: ObjectState,
    selected: bool,
    visible: bool,
    bounds: Aabb,
}

impl SceneObject {
    pub(crate) fn new(id: ObjectId, name: String, primitive: Primitive) -> Self {
        let bounds = primitive.bounds();
        Self {
            id,
            name,
            primitive,
            state: ObjectState::Dirty,
            selected: false,
            visible: true,
            bounds,
        }
    }

    /// The object's handle.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the object.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The geometry.
    #[must_use]
    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Current commit state.
    #[must_use]
    pub fn state(&self) -> ObjectState {
        self.state
    }

    /// Whether the object awaits a commit.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state == ObjectState::Dirty
    }

    /// Flags the object for the next commit.
    pub fn mark_dirty(&mut self) {
        self.state = ObjectState::Dirty;
    }

    /// Whether the object is the current selection.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Whether the object takes part in picking.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the object.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// World-space bounding box, refreshed on every edit.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Applies `f` to the geometry.
    ///
    /// On success the object is marked Dirty and its bounds are refreshed.
    /// Primitive mutators leave the geometry untouched when they fail, so an
    /// error leaves the object as it was.
    ///
    /// # Errors
    ///
    /// Returns whatever error `f` returns.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Primitive) -> Result<R>) -> Result<R> {
        let out = f(&mut self.primitive)?;
        self.bounds = self.primitive.bounds();
        self.state = ObjectState::Dirty;
        Ok(out)
    }

    /// Rebuilds derived data and moves the object to Clean.
    pub(crate) fn commit(&mut self, params: &TessellationParams) -> Result<()> {
        self.primitive.commit(params)?;
        self.bounds = self.primitive.bounds();
        self.state = ObjectState::Clean;
        Ok(())
    }
}
