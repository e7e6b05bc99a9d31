use crate::error::{GeometryError, Result};
use crate::math::intersect_3d::ray_sphere_intersect;
use crate::math::{Aabb, Point3, Ray, Vector3};

/// A free point in the scene.
///
/// A point has no extent of its own; picking treats it as a sphere whose
/// radius is chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    position: Point3,
}

impl Point {
    /// Creates a point.
    ///
    /// # Errors
    ///
    /// Returns an error if any coordinate is not finite.
    pub fn new(position: Point3) -> Result<Self> {
        ensure_finite(&position)?;
        Ok(Self { position })
    }

    /// Returns the position.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }

    /// Moves the point to `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if any coordinate is not finite; the point is left unchanged.
    pub fn set_position(&mut self, position: Point3) -> Result<()> {
        ensure_finite(&position)?;
        self.position = position;
        Ok(())
    }

    /// Moves the point by `delta`.
    pub fn translate(&mut self, delta: &Vector3) {
        self.position += delta;
    }

    /// Distance along `ray` to the pick sphere of radius `radius`.
    #[must_use]
    pub fn intersect(&self, ray: &Ray, radius: f64) -> Option<f64> {
        ray_sphere_intersect(ray, &self.position, radius)
    }

    /// Degenerate box at the point.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_point(self.position)
    }
}

pub(crate) fn ensure_finite(point: &Point3) -> Result<()> {
    if point.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::Degenerate("coordinates must be finite".into()).into())
    }
}

pub(crate) fn ensure_finite_vector(delta: &Vector3) -> Result<()> {
    if delta.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::Degenerate("displacement must be finite".into()).into())
    }
}
