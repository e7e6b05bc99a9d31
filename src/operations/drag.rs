//! Interactive dragging of picked objects.
//!
//! A drag moves an anchor on the plane through the anchor that faces the
//! camera. The anchor is the point itself, the centre of an ellipsoid, or the
//! surface control point nearest to where the surface was hit. The offset
//! between the grab point and the anchor is kept for the whole drag so the
//! object does not jump under the pointer.

use tracing::debug;

use crate::error::Result;
use crate::geometry::Primitive;
use crate::math::intersect_3d::{ray_plane_intersect, RayPlaneRelation};
use crate::math::{Point3, Ray, Vector3, TOLERANCE};
use crate::raycaster::HitResult;
use crate::scene::{ObjectId, Scene};

use super::edit::{MoveControlPoint, MovePoint, TranslateObject};

/// What a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// A free point.
    Point,
    /// The centre of an ellipsoid.
    EllipsoidCenter,
    /// One control point of a surface.
    ControlPoint {
        /// Grid row.
        row: usize,
        /// Grid column.
        col: usize,
    },
}

/// State of an ongoing drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    object: ObjectId,
    target: DragTarget,
    plane_normal: Vector3,
    anchor: Point3,
    offset: Vector3,
}

impl DragSession {
    /// Starts dragging the object under `hit`.
    ///
    /// `ray` is the pick ray that produced `hit` and `view_direction` the
    /// camera's forward vector. Returns `None` if the object is gone.
    #[must_use]
    pub fn begin(
        scene: &Scene,
        hit: &HitResult,
        ray: &Ray,
        view_direction: &Vector3,
    ) -> Option<Self> {
        let object = scene.get(hit.object)?;
        let (target, anchor) = match object.primitive() {
            Primitive::Point(point) => (DragTarget::Point, *point.position()),
            Primitive::Ellipsoid(ellipsoid) => (DragTarget::EllipsoidCenter, ellipsoid.center()),
            Primitive::Surface(surface) => {
                let (row, col) = surface.nearest_control_point(&hit.point);
                let anchor = *surface.control_point(row, col)?;
                (DragTarget::ControlPoint { row, col }, anchor)
            }
        };

        let plane_normal = -view_direction.try_normalize(TOLERANCE)?;
        let grab = match ray_plane_intersect(ray, &anchor, &plane_normal) {
            RayPlaneRelation::Point { point, .. } => point,
            _ => anchor,
        };

        debug!(id = %hit.object, ?target, "drag started");
        Some(Self {
            object: hit.object,
            target,
            plane_normal,
            anchor,
            offset: anchor - grab,
        })
    }

    /// The dragged object.
    #[must_use]
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// What is being moved.
    #[must_use]
    pub fn target(&self) -> DragTarget {
        self.target
    }

    /// Current anchor position.
    #[must_use]
    pub fn anchor(&self) -> &Point3 {
        &self.anchor
    }

    /// Moves the anchor to where `ray` crosses the drag plane.
    ///
    /// Returns `Ok(false)` and leaves the scene unchanged when the ray runs
    /// parallel to the plane or points away from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the object was removed or the edit is rejected.
    pub fn update(&mut self, scene: &mut Scene, ray: &Ray) -> Result<bool> {
        let RayPlaneRelation::Point { point, .. } =
            ray_plane_intersect(ray, &self.anchor, &self.plane_normal)
        else {
            return Ok(false);
        };
        let target = point + self.offset;

        match self.target {
            DragTarget::Point => {
                MovePoint::new(self.object, target).execute(scene)?;
            }
            DragTarget::EllipsoidCenter => {
                TranslateObject::new(self.object, target - self.anchor).execute(scene)?;
            }
            DragTarget::ControlPoint { row, col } => {
                MoveControlPoint::new(self.object, row, col, target).execute(scene)?;
            }
        }
        self.anchor = target;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Continuity, Ellipsoid, ParametricSurface, Point};
    use crate::raycaster::pick_ray;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// Ray from a camera at `z = 5` looking down `-Z`, through `(x, y)` on the `z = 0` plane.
    fn ray_through(x: f64, y: f64) -> Ray {
        let eye = p(0.0, 0.0, 5.0);
        Ray::new(eye, p(x, y, 0.0) - eye).unwrap()
    }

    fn forward() -> Vector3 {
        -Vector3::z()
    }

    fn begin(scene: &Scene, x: f64, y: f64) -> DragSession {
        let ray = ray_through(x, y);
        let hit = pick_ray(&ray, scene, |_| 0.2).unwrap();
        DragSession::begin(scene, &hit, &ray, &forward()).unwrap()
    }

    #[test]
    fn drags_point_in_view_plane() {
        let mut scene = Scene::default();
        let id = scene.add(Point::new(p(0.0, 0.0, 0.0)).unwrap());
        scene.update_objects();

        let mut drag = begin(&scene, 0.0, 0.0);
        assert_eq!(drag.target(), DragTarget::Point);
        assert!(drag.update(&mut scene, &ray_through(1.0, 2.0)).unwrap());

        let Primitive::Point(point) = scene.get(id).unwrap().primitive() else {
            panic!("expected a point");
        };
        assert_relative_eq!(*point.position(), p(1.0, 2.0, 0.0), epsilon = 1e-12);
        assert!(scene.get(id).unwrap().is_dirty());
    }

    #[test]
    fn grab_offset_is_preserved() {
        let mut scene = Scene::default();
        let id = scene.add(Ellipsoid::new(1.0, 1.0, 1.0).unwrap());
        scene.update_objects();

        // Grab the sphere off-centre; the centre keeps its offset to the pointer.
        let mut drag = begin(&scene, 0.5, 0.0);
        assert_eq!(drag.target(), DragTarget::EllipsoidCenter);
        drag.update(&mut scene, &ray_through(2.5, 0.0)).unwrap();

        let Primitive::Ellipsoid(e) = scene.get(id).unwrap().primitive() else {
            panic!("expected an ellipsoid");
        };
        assert_relative_eq!(e.center(), p(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(*drag.anchor(), p(2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn drags_nearest_control_point() {
        let mut scene = Scene::default();
        // A flat grid on the XY plane, facing the camera.
        let grid: Vec<Vec<Point3>> = (0..4)
            .map(|r| (0..4).map(|c| p(f64::from(c) - 1.5, f64::from(r) - 1.5, 0.0)).collect())
            .collect();
        let surface = ParametricSurface::from_grid(Continuity::C0, grid).unwrap();
        let id = scene.add(surface);
        scene.update_objects();

        let mut drag = begin(&scene, 0.4, 0.45);
        assert_eq!(drag.target(), DragTarget::ControlPoint { row: 2, col: 2 });
        drag.update(&mut scene, &ray_through(0.4, 1.45)).unwrap();

        let Primitive::Surface(s) = scene.get(id).unwrap().primitive() else {
            panic!("expected a surface");
        };
        assert_relative_eq!(*s.control_point(2, 2).unwrap(), p(0.5, 1.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn ray_away_from_plane_does_nothing() {
        let mut scene = Scene::default();
        let id = scene.add(Point::new(p(0.0, 0.0, 0.0)).unwrap());
        scene.update_objects();

        let mut drag = begin(&scene, 0.0, 0.0);
        let away = Ray::new(p(0.0, 0.0, 5.0), Vector3::z()).unwrap();
        assert!(!drag.update(&mut scene, &away).unwrap());
        assert!(!scene.get(id).unwrap().is_dirty());
    }

    #[test]
    fn removed_object_fails_update() {
        let mut scene = Scene::default();
        let id = scene.add(Point::new(p(0.0, 0.0, 0.0)).unwrap());
        scene.update_objects();

        let mut drag = begin(&scene, 0.0, 0.0);
        scene.remove(id);
        assert!(drag.update(&mut scene, &ray_through(1.0, 0.0)).is_err());
    }
}
