use crate::error::{GeometryError, Result};
use crate::math::{nearest_non_negative_root, Aabb, Isometry3, Point3, Ray, Vector3, TOLERANCE};

/// An ellipsoid `x²/a² + y²/b² + z²/c² = 1` placed by a rigid transform.
///
/// The radii are measured along the local axes; the transform positions and
/// rotates the local frame in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    radii: Vector3,
    transform: Isometry3,
}

impl Ellipsoid {
    /// Creates an ellipsoid centred at the origin with radii `(a, b, c)`.
    ///
    /// # Errors
    ///
    /// Returns an error if any radius is non-positive or not finite.
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self> {
        Ok(Self {
            radii: validate_radii(a, b, c)?,
            transform: Isometry3::identity(),
        })
    }

    /// Returns the ellipsoid moved by `transform`.
    #[must_use]
    pub fn with_transform(mut self, transform: Isometry3) -> Self {
        self.transform = transform;
        self
    }

    /// Returns the radii along the local axes.
    #[must_use]
    pub fn radii(&self) -> &Vector3 {
        &self.radii
    }

    /// Replaces the radii.
    ///
    /// # Errors
    ///
    /// Returns an error if any radius is non-positive or not finite; the
    /// ellipsoid is left unchanged.
    pub fn set_radii(&mut self, a: f64, b: f64, c: f64) -> Result<()> {
        self.radii = validate_radii(a, b, c)?;
        Ok(())
    }

    /// Returns the local-to-world transform.
    #[must_use]
    pub fn transform(&self) -> &Isometry3 {
        &self.transform
    }

    /// Replaces the local-to-world transform.
    pub fn set_transform(&mut self, transform: Isometry3) {
        self.transform = transform;
    }

    /// Returns the world-space centre.
    #[must_use]
    pub fn center(&self) -> Point3 {
        self.transform.translation.vector.into()
    }

    /// Moves the ellipsoid by `delta`.
    pub fn translate(&mut self, delta: &Vector3) {
        self.transform.translation.vector += delta;
    }

    /// Radius of the smallest centred sphere enclosing the ellipsoid.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        self.radii.max()
    }

    /// Distance along `ray` to the entry point, if the ray hits.
    ///
    /// The ray is carried into the local frame and scaled by `1 / radii`,
    /// which turns the ellipsoid into the unit sphere. Because the scaled
    /// direction is not renormalized, the quadratic's roots stay in world
    /// distance units. When the origin lies inside, the exit point is returned.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let o = self
            .transform
            .inverse_transform_point(ray.origin())
            .coords
            .component_div(&self.radii);
        let d = self
            .transform
            .inverse_transform_vector(ray.direction())
            .component_div(&self.radii);

        let a = d.norm_squared();
        let b = o.dot(&d);
        let c = o.norm_squared() - 1.0;
        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        nearest_non_negative_root((-b - sqrt_disc) / a, (-b + sqrt_disc) / a)
    }

    /// Outward unit normal at a world point on (or near) the surface.
    ///
    /// Returns `None` at the centre, where the gradient vanishes.
    #[must_use]
    pub fn normal_at(&self, point: &Point3) -> Option<Vector3> {
        let local = self.transform.inverse_transform_point(point).coords;
        let gradient = local.component_div(&self.radii.component_mul(&self.radii));
        let len = gradient.norm();
        if len < TOLERANCE {
            return None;
        }
        Some(self.transform.transform_vector(&(gradient / len)))
    }

    /// Tight axis-aligned box of the rotated ellipsoid.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let rotation = self.transform.rotation.to_rotation_matrix();
        let r = rotation.matrix();
        let half = Vector3::from_fn(|i, _| {
            (0..3)
                .map(|j| (r[(i, j)] * self.radii[j]).powi(2))
                .sum::<f64>()
                .sqrt()
        });
        let c = self.center();
        Aabb::new(c - half, c + half)
    }
}

fn validate_radii(a: f64, b: f64, c: f64) -> Result<Vector3> {
    for r in [a, b, c] {
        if !r.is_finite() || r < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "ellipsoid radii must be positive, got ({a}, {b}, {c})"
            ))
            .into());
        }
    }
    Ok(Vector3::new(a, b, c))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn ray(o: Point3, d: Vector3) -> Ray {
        Ray::new(o, d).unwrap()
    }

    #[test]
    fn unit_sphere_front_hit() {
        let e = Ellipsoid::new(1.0, 1.0, 1.0).unwrap();
        let r = ray(p(0.0, 0.0, 5.0), v(0.0, 0.0, -1.0));
        let t = e.intersect(&r).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-12);
        assert_relative_eq!(r.at(t), p(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn stretched_along_x() {
        let e = Ellipsoid::new(2.0, 1.0, 1.0).unwrap();
        let r = ray(p(5.0, 0.0, 0.0), v(-1.0, 0.0, 0.0));
        assert_relative_eq!(e.intersect(&r).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn axis_rays_through_center_hit_at_radius() {
        let transform = Isometry3::new(v(1.0, -2.0, 0.5), v(0.3, -0.7, 1.1));
        let e = Ellipsoid::new(1.5, 0.75, 3.0)
            .unwrap()
            .with_transform(transform);
        let center = e.center();
        let distance = 10.0;

        for axis in 0..3 {
            let local_dir = Vector3::ith(axis, 1.0);
            let dir = transform.transform_vector(&local_dir);
            for sign in [1.0, -1.0] {
                let origin = center + dir * (sign * distance);
                let t = e.intersect(&ray(origin, -dir * sign)).unwrap();
                assert_relative_eq!(t, distance - e.radii()[axis], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn rays_outside_bounding_sphere_miss() {
        let e = Ellipsoid::new(2.0, 0.5, 1.0)
            .unwrap()
            .with_transform(Isometry3::new(v(3.0, 0.0, -1.0), v(0.0, 0.4, 0.0)));
        let br = e.bounding_radius();
        let c = e.center();
        let dirs = [
            v(1.0, 0.0, 0.0),
            v(0.0, 1.0, 0.0),
            v(0.0, 0.0, 1.0),
            v(1.0, 1.0, 0.0).normalize(),
            v(-1.0, 2.0, 3.0).normalize(),
        ];
        for d in dirs {
            // Offset perpendicular to the ray by more than the bounding radius.
            let perp = d.cross(&v(0.3, -0.5, 0.8)).normalize();
            let origin = c + perp * (br * 1.01) - d * 20.0;
            assert!(e.intersect(&ray(origin, d)).is_none(), "hit for dir {d:?}");
            assert!(e.intersect(&ray(origin, -d)).is_none());
        }
    }

    #[test]
    fn ray_pointing_away_misses() {
        let e = Ellipsoid::new(1.0, 1.0, 1.0).unwrap();
        let r = ray(p(0.0, 0.0, 5.0), v(0.0, 0.0, 1.0));
        assert!(e.intersect(&r).is_none());
    }

    #[test]
    fn origin_inside_returns_exit() {
        let e = Ellipsoid::new(2.0, 1.0, 1.0).unwrap();
        let r = ray(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        assert_relative_eq!(e.intersect(&r).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_radii_rejected() {
        assert!(Ellipsoid::new(0.0, 1.0, 1.0).is_err());
        assert!(Ellipsoid::new(1.0, -1.0, 1.0).is_err());
        assert!(Ellipsoid::new(1.0, 1.0, f64::NAN).is_err());

        let mut e = Ellipsoid::new(1.0, 2.0, 3.0).unwrap();
        assert!(e.set_radii(1.0, 0.0, 1.0).is_err());
        assert_eq!(*e.radii(), v(1.0, 2.0, 3.0));
    }

    #[test]
    fn normal_points_outward() {
        let e = Ellipsoid::new(2.0, 1.0, 1.0)
            .unwrap()
            .with_transform(Isometry3::translation(1.0, 0.0, 0.0));
        let n = e.normal_at(&p(3.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(n, v(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert!(e.normal_at(&e.center()).is_none());
    }

    #[test]
    fn rotated_bounds_swap_axes() {
        let e = Ellipsoid::new(3.0, 1.0, 1.0)
            .unwrap()
            .with_transform(Isometry3::new(Vector3::zeros(), v(0.0, 0.0, FRAC_PI_2)));
        let b = e.bounds();
        assert_relative_eq!(b.max, p(1.0, 3.0, 1.0), epsilon = 1e-9);
        assert_relative_eq!(b.min, p(-1.0, -3.0, -1.0), epsilon = 1e-9);
    }
}
