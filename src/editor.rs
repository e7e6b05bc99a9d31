//! Frame-driven editing session.
//!
//! The [`Editor`] owns the camera, the scene and the picking state. A frame
//! runs input handlers (`pointer_*`, `add_*`, `remove_selected`), then
//! [`end_frame`](Editor::end_frame) commits every edit made during the frame.
//! Picks only ever see geometry committed by an earlier `end_frame`.
//!
//! Edit failures caused by user input are logged and dropped.

use tracing::{debug, debug_span, warn};

use crate::camera::{Camera, Viewport};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::geometry::{Continuity, Ellipsoid, Primitive};
use crate::math::intersect_3d::{ray_plane_intersect, RayPlaneRelation};
use crate::math::{Point3, Vector3};
use crate::operations::creation::{AddEllipsoid, AddPoint, AddSurface};
use crate::operations::edit::RemoveObject;
use crate::operations::DragSession;
use crate::raycaster::{AdaptiveRaster, HitResult, Raycaster};
use crate::scene::{ObjectId, Scene, SceneObject, UpdateReport};

/// Interactive editor state.
#[derive(Debug)]
pub struct Editor {
    viewport: Viewport,
    camera: Camera,
    scene: Scene,
    raycaster: Raycaster,
    raster: AdaptiveRaster,
    drag: Option<DragSession>,
    raster_target: Option<ObjectId>,
    frame: u64,
}

impl Editor {
    /// Creates an editor with an empty scene.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        let p = config.camera_position;
        let mut camera = Camera::new(p.x, p.y, p.z);
        camera.set_viewport(config.viewport);
        Self {
            viewport: config.viewport,
            camera,
            scene: Scene::new(config.tessellation),
            raycaster: Raycaster::new(config.pick_tolerance),
            raster: AdaptiveRaster::new(config.viewport, config.raster),
            drag: None,
            raster_target: None,
            frame: 0,
        }
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The camera, for navigation. Restarts the ellipsoid raster.
    pub fn camera_mut(&mut self) -> &mut Camera {
        self.raster.reset();
        &mut self.camera
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, for direct edits.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The raycaster.
    #[must_use]
    pub fn raycaster(&self) -> &Raycaster {
        &self.raycaster
    }

    /// The ellipsoid raster.
    #[must_use]
    pub fn raster(&self) -> &AdaptiveRaster {
        &self.raster
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of completed frames.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Picks at pixel `(x, y)` without side effects.
    #[must_use]
    pub fn pick(&self, x: f64, y: f64) -> Option<HitResult> {
        self.raycaster
            .pick(&self.camera, self.viewport, x, y, &self.scene)
    }

    /// Selects the object under the pointer and starts dragging it.
    ///
    /// Clicking empty space clears the selection.
    pub fn pointer_pressed(&mut self, x: f64, y: f64) -> Option<ObjectId> {
        self.drag = None;
        let Some(hit) = self.pick(x, y) else {
            self.scene.clear_selection();
            return None;
        };

        self.scene.select(hit.object);
        let ray = self.camera.generate_ray(x, y, self.viewport);
        self.drag = DragSession::begin(&self.scene, &hit, &ray, &self.camera.forward());
        Some(hit.object)
    }

    /// Continues a drag. Does nothing when no drag is active.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let ray = self.camera.generate_ray(x, y, self.viewport);
        if let Err(err) = drag.update(&mut self.scene, &ray) {
            warn!(id = %drag.object(), error = %err, "drag aborted");
            self.drag = None;
        }
    }

    /// Ends a drag.
    pub fn pointer_released(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!(id = %drag.object(), "drag finished");
        }
    }

    /// Moves the 3D cursor under pixel `(x, y)`.
    ///
    /// The cursor lands on the picked object, or on the ground plane
    /// `y = 0` when nothing is hit. Returns `false` if the pixel sees
    /// neither.
    pub fn place_cursor(&mut self, x: f64, y: f64) -> bool {
        let position = match self.pick(x, y) {
            Some(hit) => hit.point,
            None => {
                let ray = self.camera.generate_ray(x, y, self.viewport);
                match ray_plane_intersect(&ray, &Point3::origin(), &Vector3::y()) {
                    RayPlaneRelation::Point { point, .. } => point,
                    _ => return false,
                }
            }
        };
        self.scene.set_cursor(position);
        true
    }

    /// Adds a point at the 3D cursor.
    pub fn add_point_at_cursor(&mut self) -> Option<ObjectId> {
        let cursor = *self.scene.cursor();
        logged("add point", AddPoint::new(cursor).execute(&mut self.scene))
    }

    /// Adds an ellipsoid with radii `(a, b, c)` centred at the 3D cursor.
    pub fn add_ellipsoid(&mut self, a: f64, b: f64, c: f64) -> Option<ObjectId> {
        let cursor = *self.scene.cursor();
        logged(
            "add ellipsoid",
            AddEllipsoid::new(a, b, c).at(cursor).execute(&mut self.scene),
        )
    }

    /// Adds a flat surface centred at the 3D cursor.
    pub fn add_surface(
        &mut self,
        continuity: Continuity,
        patches_u: usize,
        patches_v: usize,
        size: f64,
    ) -> Option<ObjectId> {
        let cursor = *self.scene.cursor();
        logged(
            "add surface",
            AddSurface::new(continuity, patches_u, patches_v, size)
                .at(cursor)
                .execute(&mut self.scene),
        )
    }

    /// Removes the selected object.
    pub fn remove_selected(&mut self) -> Option<ObjectId> {
        let id = self.scene.selected()?;
        if self.drag.as_ref().is_some_and(|d| d.object() == id) {
            self.drag = None;
        }
        logged("remove", RemoveObject::new(id).execute(&mut self.scene)).map(|o| o.id())
    }

    /// Resizes the drawing surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_viewport(self.viewport);
        self.raster.resize(self.viewport);
    }

    /// Closes the frame: commits all edits and refines the ellipsoid raster
    /// by one level.
    ///
    /// The raster restarts whenever something was committed or the
    /// ellipsoid it shows changed, including to none.
    pub fn end_frame(&mut self) -> UpdateReport {
        let span = debug_span!("frame", frame = self.frame);
        let _enter = span.enter();

        let report = self.scene.update_objects();
        let target = raster_target(&self.scene);
        let target_id = target.map(|(id, _)| id);
        if !report.committed.is_empty() || target_id != self.raster_target {
            self.raster.reset();
        }
        if target_id != self.raster_target {
            debug!(target = ?target_id, "raster target changed");
            self.raster_target = target_id;
        }
        if let Some((_, ellipsoid)) = target {
            self.raster.step(&self.camera, ellipsoid);
        }
        self.frame += 1;
        report
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

/// The ellipsoid shown by the raster: the selected one, else the first one
/// in handle order. Only committed ellipsoids qualify.
fn raster_target(scene: &Scene) -> Option<(ObjectId, &Ellipsoid)> {
    fn committed_ellipsoid(object: &SceneObject) -> Option<(ObjectId, &Ellipsoid)> {
        match object.primitive() {
            Primitive::Ellipsoid(e) if !object.is_dirty() => Some((object.id(), e)),
            _ => None,
        }
    }

    scene
        .selected()
        .and_then(|id| scene.get(id))
        .and_then(committed_ellipsoid)
        .or_else(|| scene.iter().find_map(committed_ellipsoid))
}

fn logged<T>(action: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(action, error = %err, "edit rejected");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::INITIAL_CAMERA_POSITION;
    use approx::assert_relative_eq;

    const CX: f64 = 640.0;
    const CY: f64 = 360.0;

    #[test]
    fn starts_from_config() {
        let editor = Editor::default();
        let [x, y, z] = INITIAL_CAMERA_POSITION;
        assert_eq!(*editor.camera().position(), Point3::new(x, y, z));
        assert_eq!(editor.viewport(), Viewport::new(1280, 720));
        assert!(editor.scene().is_empty());
        assert_eq!(editor.frame(), 0);
    }

    #[test]
    fn edits_become_pickable_after_end_frame() {
        let mut editor = Editor::default();
        let id = editor.add_point_at_cursor().unwrap();
        assert!(editor.pick(CX, CY).is_none());

        let report = editor.end_frame();
        assert_eq!(report.committed, vec![id]);
        assert_eq!(editor.frame(), 1);
        assert_eq!(editor.pick(CX, CY).map(|h| h.object), Some(id));

        assert!(editor.end_frame().is_empty());
    }

    #[test]
    fn press_selects_and_drag_moves_after_commit() {
        let mut editor = Editor::default();
        let id = editor.add_point_at_cursor().unwrap();
        editor.end_frame();

        assert_eq!(editor.pointer_pressed(CX, CY), Some(id));
        assert_eq!(editor.scene().selected(), Some(id));
        assert!(editor.is_dragging());

        // 100 px to the right.
        editor.pointer_moved(CX + 100.0, CY);
        editor.pointer_released();
        assert!(!editor.is_dragging());

        // The moved point is not pickable until the frame commits it.
        assert!(editor.pick(CX + 100.0, CY).is_none());
        editor.end_frame();
        assert_eq!(editor.pick(CX + 100.0, CY).map(|h| h.object), Some(id));
        assert!(editor.pick(CX, CY).is_none());
    }

    #[test]
    fn pressing_empty_space_clears_selection() {
        let mut editor = Editor::default();
        editor.add_point_at_cursor().unwrap();
        editor.end_frame();
        editor.pointer_pressed(CX, CY);
        assert!(editor.scene().selected().is_some());

        assert!(editor.pointer_pressed(10.0, 10.0).is_none());
        assert!(editor.scene().selected().is_none());
        assert!(!editor.is_dragging());
    }

    #[test]
    fn remove_selected_object() {
        let mut editor = Editor::default();
        let id = editor.add_ellipsoid(1.0, 1.0, 1.0).unwrap();
        editor.end_frame();
        editor.pointer_pressed(CX, CY);

        assert_eq!(editor.remove_selected(), Some(id));
        assert!(editor.scene().get(id).is_none());
        assert!(editor.remove_selected().is_none());
        assert!(!editor.is_dragging());
    }

    #[test]
    fn invalid_input_is_a_logged_no_op() {
        let mut editor = Editor::default();
        assert!(editor.add_ellipsoid(-1.0, 1.0, 1.0).is_none());
        assert!(editor.add_surface(Continuity::C2, 0, 6, 1.0).is_none());
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn cursor_lands_on_ground_plane() {
        let mut editor = Editor::default();
        editor.camera_mut().set_position(Point3::new(0.0, 1.0, 5.0));
        editor.camera_mut().look_at(&Point3::origin());

        assert!(editor.place_cursor(CX, CY));
        assert_relative_eq!(*editor.scene().cursor(), Point3::origin(), epsilon = 1e-9);

        // Looking above the horizon never reaches the ground.
        assert!(!editor.place_cursor(CX, 0.0));
    }

    #[test]
    fn surface_added_at_cursor_is_pickable() {
        let mut editor = Editor::default();
        editor.camera_mut().set_position(Point3::new(0.0, 5.0, 5.0));
        editor.camera_mut().look_at(&Point3::origin());
        let id = editor.add_surface(Continuity::C2, 6, 6, 1.0).unwrap();
        editor.end_frame();

        let hit = editor.pick(CX + 7.0, CY + 5.0).unwrap();
        assert_eq!(hit.object, id);
        assert!(hit.uv.is_some());
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn raster_refines_once_per_frame() {
        let mut editor = Editor::default();
        editor.add_ellipsoid(1.0, 1.0, 1.0).unwrap();
        editor.end_frame();
        let after_first = editor.raster().block_size();
        editor.end_frame();
        assert_eq!(editor.raster().block_size(), after_first / 2);

        editor.resize(64, 64);
        while !editor.raster().is_complete() {
            editor.end_frame();
        }
        assert!(editor.raster().intensity_at(32, 32).unwrap() > 0.5);
    }

    #[test]
    fn removing_raster_target_clears_image() {
        let mut editor = Editor::default();
        editor.resize(64, 64);
        editor.add_ellipsoid(1.0, 1.0, 1.0).unwrap();
        while !editor.raster().is_complete() {
            editor.end_frame();
        }
        assert!(editor.pointer_pressed(32.0, 32.0).is_some());
        editor.pointer_released();

        assert!(editor.remove_selected().is_some());
        editor.end_frame();
        assert!(!editor.raster().is_complete());
        assert_eq!(editor.raster().intensity_at(32, 32), Some(0.0));
    }

    #[test]
    fn selecting_other_ellipsoid_restarts_raster() {
        let mut editor = Editor::default();
        let initial = editor.raster().block_size();
        editor.scene_mut().set_cursor(Point3::new(-1.5, 0.0, 0.0));
        editor.add_ellipsoid(0.5, 0.5, 0.5).unwrap();
        editor.scene_mut().set_cursor(Point3::new(1.5, 0.0, 0.0));
        let b = editor.add_ellipsoid(0.5, 0.5, 0.5).unwrap();
        editor.end_frame();
        editor.end_frame();
        assert_eq!(editor.raster().block_size(), initial / 4);

        editor.scene_mut().select(b);
        editor.end_frame();
        assert_eq!(editor.raster().block_size(), initial / 2);

        // Same target, no commit: refinement continues.
        editor.end_frame();
        assert_eq!(editor.raster().block_size(), initial / 4);
    }

    #[test]
    fn dirty_selection_is_not_rastered() {
        let mut editor = Editor::default();
        let a = editor.add_ellipsoid(1.0, 1.0, 1.0).unwrap();
        editor.scene_mut().set_cursor(Point3::new(3.0, 0.0, 0.0));
        let b = editor.add_ellipsoid(1.0, 1.0, 1.0).unwrap();
        editor.end_frame();

        editor.scene_mut().mark_dirty(b);
        editor.scene_mut().select(b);
        assert_eq!(raster_target(editor.scene()).map(|(id, _)| id), Some(a));
    }
}
