use super::{Aabb, Point3, Vector3, TOLERANCE};

/// A half-line in 3D space used for picking.
///
/// The direction is always unit length, so the ray parameter `t` is a
/// world-space distance from the origin.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
    inv_direction: Vector3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Returns `None` if the direction is (numerically) zero.
    #[must_use]
    pub fn new(origin: Point3, direction: Vector3) -> Option<Self> {
        let len = direction.norm();
        if len < TOLERANCE || !len.is_finite() {
            return None;
        }
        Some(Self::from_unit(origin, direction / len))
    }

    /// Creates a ray from a direction already known to be unit length.
    pub(crate) fn from_unit(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: direction.map(|c| 1.0 / c),
        }
    }

    /// Returns the ray origin.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Evaluates the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Slab test against an axis-aligned box.
    ///
    /// Returns the clipped `(t_enter, t_exit)` interval, with `t_enter`
    /// clamped to zero when the origin is inside the box.
    #[must_use]
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<(f64, f64)> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let t1 = (aabb.min[axis] - self.origin[axis]) * self.inv_direction[axis];
            let t2 = (aabb.max[axis] - self.origin[axis]) * self.inv_direction[axis];
            // f64::max/min drop NaN, which covers an origin lying on a slab
            // of a flat box hit by a parallel ray.
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}
