//! Repository of live scene objects.
//!
//! Objects live in a [`SlotMap`] arena. Callers only ever see an
//! [`ObjectId`], which is mapped to the arena key through an ordered index,
//! so iteration always runs in handle order. Handles that may need a commit
//! are queued so [`Scene::update_objects`] only visits those.

mod object;
mod update;

pub use object::{ObjectId, ObjectKey, ObjectState, SceneObject};
pub use update::UpdateReport;

use std::collections::{BTreeMap, BTreeSet};

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{ObjectError, Result};
use crate::geometry::Primitive;
use crate::math::Point3;
use crate::tessellation::TessellationParams;

/// The set of objects being edited, plus selection and the 3D cursor.
#[derive(Debug)]
pub struct Scene {
    objects: SlotMap<ObjectKey, SceneObject>,
    handles: BTreeMap<ObjectId, ObjectKey>,
    pending: BTreeSet<ObjectId>,
    next_id: u64,
    selected: Option<ObjectId>,
    cursor: Point3,
    params: TessellationParams,
}

impl Scene {
    /// Creates an empty scene using `params` for surface tessellation.
    #[must_use]
    pub fn new(params: TessellationParams) -> Self {
        Self {
            objects: SlotMap::with_key(),
            handles: BTreeMap::new(),
            pending: BTreeSet::new(),
            next_id: 0,
            selected: None,
            cursor: Point3::origin(),
            params,
        }
    }

    /// Tessellation parameters applied at commit time.
    #[must_use]
    pub fn tessellation_params(&self) -> &TessellationParams {
        &self.params
    }

    /// Adds an object with a generated name and returns its handle.
    ///
    /// The object starts Dirty and becomes pickable after the next
    /// [`update_objects`](Self::update_objects).
    pub fn add(&mut self, primitive: impl Into<Primitive>) -> ObjectId {
        let primitive = primitive.into();
        let name = format!("{} {}", primitive.kind_name(), self.next_id);
        self.add_named(primitive, name)
    }

    /// Adds an object with an explicit display name.
    pub fn add_named(
        &mut self,
        primitive: impl Into<Primitive>,
        name: impl Into<String>,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        let object = SceneObject::new(id, name.into(), primitive.into());
        debug!(%id, kind = object.primitive().kind_name(), name = object.name(), "object added");
        let key = self.objects.insert(object);
        self.handles.insert(id, key);
        self.pending.insert(id);
        id
    }

    /// Removes an object. The handle stops resolving immediately.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let key = self.handles.remove(&id)?;
        let object = self.objects.remove(key)?;
        self.pending.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        debug!(%id, "object removed");
        Some(object)
    }

    /// Looks up an object.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(*self.handles.get(&id)?)
    }

    /// Looks up an object for modification.
    ///
    /// The handle is queued for the next commit pass, so state changes made
    /// through [`SceneObject::edit`] or [`SceneObject::mark_dirty`] are seen.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        let key = *self.handles.get(&id)?;
        self.pending.insert(id);
        self.objects.get_mut(key)
    }

    /// Whether `id` names a live object.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.handles.contains_key(&id)
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the scene holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Live objects in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.handles.values().filter_map(|key| self.objects.get(*key))
    }

    /// Calls `visitor` for every live object in handle order.
    pub fn for_each(&self, visitor: impl FnMut(&SceneObject)) {
        self.iter().for_each(visitor);
    }

    /// Edits the geometry of `id` and marks it Dirty.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::NotFound`] for a stale handle, or the error
    /// returned by `f`.
    pub fn edit<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut Primitive) -> Result<R>,
    ) -> Result<R> {
        self.get_mut(id).ok_or(ObjectError::NotFound(id))?.edit(f)
    }

    /// Flags `id` for the next commit. Returns `false` for a stale handle.
    pub fn mark_dirty(&mut self, id: ObjectId) -> bool {
        self.get_mut(id).map(SceneObject::mark_dirty).is_some()
    }

    /// Number of objects awaiting a commit.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.pending
            .iter()
            .filter(|id| self.get(**id).is_some_and(SceneObject::is_dirty))
            .count()
    }

    /// Makes `id` the single selected object.
    ///
    /// Returns `false` and leaves the selection unchanged for a stale handle.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if let Some(previous) = self.selected.take() {
            self.set_selected_flag(previous, false);
        }
        self.set_selected_flag(id, true);
        self.selected = Some(id);
        debug!(%id, "selected");
        true
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            self.set_selected_flag(previous, false);
            debug!(id = %previous, "selection cleared");
        }
    }

    /// The selected object, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Position of the 3D cursor used as insertion point.
    #[must_use]
    pub fn cursor(&self) -> &Point3 {
        &self.cursor
    }

    /// Moves the 3D cursor.
    pub fn set_cursor(&mut self, position: Point3) {
        self.cursor = position;
    }

    // Selection does not touch geometry, so it bypasses the commit queue.
    fn set_selected_flag(&mut self, id: ObjectId, selected: bool) {
        if let Some(object) = self
            .handles
            .get(&id)
            .and_then(|key| self.objects.get_mut(*key))
        {
            object.set_selected(selected);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(TessellationParams::default())
    }
}
