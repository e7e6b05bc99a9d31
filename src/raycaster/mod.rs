//! Screen-space picking.
//!
//! A pick turns a pixel into a world ray through the [`Camera`] and returns
//! the closest committed object along it. Picking is a pure query: it never
//! mutates the scene and never sees geometry that has not been committed by
//! [`Scene::update_objects`].

mod raster;

pub use raster::{AdaptiveRaster, RasterParams};

use crate::camera::{Camera, Viewport};
use crate::geometry::Primitive;
use crate::math::{Point2, Point3, Ray};
use crate::scene::{ObjectId, Scene};

/// How large points are when picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickTolerance {
    /// Fixed radius in world units.
    World(f64),
    /// Radius that covers this many pixels at the point's distance.
    Screen {
        /// Radius in pixels.
        pixels: f64,
    },
}

impl Default for PickTolerance {
    fn default() -> Self {
        Self::Screen { pixels: 6.0 }
    }
}

impl PickTolerance {
    /// World-space pick radius for a point at `position`.
    #[must_use]
    pub fn radius_at(&self, camera: &Camera, viewport: Viewport, position: &Point3) -> f64 {
        match *self {
            Self::World(radius) => radius,
            Self::Screen { pixels } => {
                let distance = (position - camera.position()).norm();
                let visible_height = 2.0 * distance * (camera.fov_y() / 2.0).tan();
                pixels * visible_height / f64::from(viewport.height.max(1))
            }
        }
    }
}

/// Closest object found by a pick.
#[derive(Debug, Clone, Copy)]
pub struct HitResult {
    /// Handle of the hit object.
    pub object: ObjectId,
    /// Distance from the ray origin.
    pub distance: f64,
    /// World-space hit point.
    pub point: Point3,
    /// Surface parameters when a parametric surface was hit.
    pub uv: Option<Point2>,
}

/// Finds the object under the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raycaster {
    tolerance: PickTolerance,
}

impl Raycaster {
    /// Creates a raycaster with the given point pick tolerance.
    #[must_use]
    pub fn new(tolerance: PickTolerance) -> Self {
        Self { tolerance }
    }

    /// Point pick tolerance.
    #[must_use]
    pub fn tolerance(&self) -> PickTolerance {
        self.tolerance
    }

    /// Changes the point pick tolerance.
    pub fn set_tolerance(&mut self, tolerance: PickTolerance) {
        self.tolerance = tolerance;
    }

    /// Picks the closest object under pixel `(x, y)`.
    #[must_use]
    pub fn pick(
        &self,
        camera: &Camera,
        viewport: Viewport,
        x: f64,
        y: f64,
        scene: &Scene,
    ) -> Option<HitResult> {
        let ray = camera.generate_ray(x, y, viewport);
        let tolerance = self.tolerance;
        pick_ray(&ray, scene, |position| {
            tolerance.radius_at(camera, viewport, position)
        })
    }
}

/// Closest hit of `ray` among the visible, committed objects of `scene`.
///
/// `point_radius` gives the pick radius of a point at a given position.
/// Objects are visited in handle order and a hit only replaces the best one
/// when strictly closer, so equal distances resolve to the lowest handle.
pub fn pick_ray(
    ray: &Ray,
    scene: &Scene,
    point_radius: impl Fn(&Point3) -> f64,
) -> Option<HitResult> {
    let mut best: Option<HitResult> = None;

    for object in scene.iter() {
        if !object.is_visible() || object.is_dirty() {
            continue;
        }

        let radius = match object.primitive() {
            Primitive::Point(point) => point_radius(point.position()),
            Primitive::Ellipsoid(_) | Primitive::Surface(_) => 0.0,
        };
        let Some(hit) = object.primitive().intersect(ray, radius) else {
            continue;
        };

        if best.as_ref().is_none_or(|best| hit.t < best.distance) {
            best = Some(HitResult {
                object: object.id(),
                distance: hit.t,
                point: ray.at(hit.t),
                uv: hit.uv,
            });
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Continuity, Ellipsoid, ParametricSurface, Point};
    use crate::math::{Isometry3, Vector3};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn sphere_at(x: f64, y: f64, z: f64, r: f64) -> Ellipsoid {
        Ellipsoid::new(r, r, r)
            .unwrap()
            .with_transform(Isometry3::translation(x, y, z))
    }

    fn world(radius: f64) -> impl Fn(&Point3) -> f64 {
        move |_| radius
    }

    #[test]
    fn picks_globally_closest_object() {
        let mut scene = Scene::default();
        let far = scene.add(sphere_at(0.0, 0.0, -10.0, 1.0));
        let near = scene.add(sphere_at(0.0, 0.0, -4.0, 1.0));
        let _side = scene.add(sphere_at(5.0, 0.0, -2.0, 1.0));
        scene.update_objects();

        let ray = Ray::new(p(0.0, 0.0, 0.0), -Vector3::z()).unwrap();
        let hit = pick_ray(&ray, &scene, world(0.1)).unwrap();
        assert_eq!(hit.object, near);
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-12);
        assert_relative_eq!(hit.point, p(0.0, 0.0, -3.0), epsilon = 1e-12);

        scene.remove(near);
        let hit = pick_ray(&ray, &scene, world(0.1)).unwrap();
        assert_eq!(hit.object, far);
    }

    #[test]
    fn equal_distances_resolve_to_lowest_handle() {
        let mut scene = Scene::default();
        let first = scene.add(sphere_at(0.0, 0.0, -4.0, 1.0));
        let second = scene.add(sphere_at(0.0, 0.0, -4.0, 1.0));
        scene.update_objects();

        let ray = Ray::new(p(0.0, 0.0, 0.0), -Vector3::z()).unwrap();
        let hit = pick_ray(&ray, &scene, world(0.1)).unwrap();
        assert_eq!(hit.object, first);
        assert_ne!(hit.object, second);
    }

    #[test]
    fn miss_returns_none() {
        let mut scene = Scene::default();
        scene.add(sphere_at(0.0, 0.0, -4.0, 1.0));
        scene.add(Point::new(p(3.0, 3.0, -3.0)).unwrap());
        scene.update_objects();

        let ray = Ray::new(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        assert!(pick_ray(&ray, &scene, world(0.1)).is_none());
        assert!(pick_ray(&ray, &Scene::default(), world(0.1)).is_none());
    }

    #[test]
    fn dirty_and_hidden_objects_are_skipped() {
        let mut scene = Scene::default();
        let id = scene.add(sphere_at(0.0, 0.0, -4.0, 1.0));
        let ray = Ray::new(p(0.0, 0.0, 0.0), -Vector3::z()).unwrap();
        assert!(pick_ray(&ray, &scene, world(0.1)).is_none());

        scene.update_objects();
        assert!(pick_ray(&ray, &scene, world(0.1)).is_some());

        scene.get_mut(id).unwrap().set_visible(false);
        assert!(pick_ray(&ray, &scene, world(0.1)).is_none());
    }

    #[test]
    fn surface_hits_carry_parameters() {
        let mut scene = Scene::default();
        let id = scene.add(ParametricSurface::flat(Continuity::C2, 2, 2, 1.0).unwrap());
        scene.update_objects();

        let ray = Ray::new(p(0.17, 3.0, 0.23), -Vector3::y()).unwrap();
        let hit = pick_ray(&ray, &scene, world(0.1)).unwrap();
        assert_eq!(hit.object, id);
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1e-9);
        assert!(hit.uv.is_some());
    }

    #[test]
    fn pick_through_camera_centre() {
        let mut scene = Scene::default();
        let id = scene.add(Ellipsoid::new(1.0, 1.0, 1.0).unwrap());
        scene.update_objects();

        let camera = Camera::new(0.0, 0.0, 5.0);
        let viewport = Viewport::new(800, 800);
        let raycaster = Raycaster::default();
        let hit = raycaster.pick(&camera, viewport, 400.0, 400.0, &scene).unwrap();
        assert_eq!(hit.object, id);
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-9);
        assert_relative_eq!(hit.point, p(0.0, 0.0, 1.0), epsilon = 1e-9);

        assert!(raycaster.pick(&camera, viewport, 2.0, 2.0, &scene).is_none());
    }

    #[test]
    fn screen_tolerance_grows_with_distance() {
        let camera = Camera::new(0.0, 0.0, 0.0);
        let viewport = Viewport::new(100, 100);
        let tolerance = PickTolerance::Screen { pixels: 5.0 };
        let near = tolerance.radius_at(&camera, viewport, &p(0.0, 0.0, -1.0));
        let far = tolerance.radius_at(&camera, viewport, &p(0.0, 0.0, -2.0));
        assert_relative_eq!(far, 2.0 * near, epsilon = 1e-12);
        assert_relative_eq!(
            PickTolerance::World(0.3).radius_at(&camera, viewport, &p(9.0, 9.0, 9.0)),
            0.3
        );
    }

    #[test]
    fn point_picked_within_screen_tolerance() {
        let mut scene = Scene::default();
        let id = scene.add(Point::new(p(0.0, 0.0, 0.0)).unwrap());
        scene.update_objects();

        let camera = Camera::new(0.0, 0.0, 5.0);
        let viewport = Viewport::new(800, 800);
        let raycaster = Raycaster::new(PickTolerance::Screen { pixels: 6.0 });
        // Three pixels off centre is inside the tolerance, twenty is not.
        assert_eq!(
            raycaster.pick(&camera, viewport, 403.0, 400.0, &scene).map(|h| h.object),
            Some(id)
        );
        assert!(raycaster.pick(&camera, viewport, 420.0, 400.0, &scene).is_none());
    }
}
