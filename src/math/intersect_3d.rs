use super::{nearest_non_negative_root, Point3, Ray, Vector3, TOLERANCE};

/// Determinant threshold below which a ray is treated as parallel to a triangle.
const PARALLEL_EPSILON: f64 = 1e-14;

/// Relationship of a ray with a plane.
#[derive(Debug)]
pub enum RayPlaneRelation {
    /// Ray crosses the plane at a single point.
    Point { point: Point3, t: f64 },
    /// Ray is parallel to the plane (does not intersect).
    Parallel,
    /// Ray lies entirely on the plane.
    OnPlane,
    /// The supporting line crosses the plane behind the ray origin.
    Behind,
}

/// Intersects a ray with the plane through `origin` with unit `normal`.
#[must_use]
pub fn ray_plane_intersect(ray: &Ray, origin: &Point3, normal: &Vector3) -> RayPlaneRelation {
    let denom = normal.dot(ray.direction());
    let numer = normal.dot(&(origin - ray.origin()));

    if denom.abs() < TOLERANCE {
        if numer.abs() < TOLERANCE {
            RayPlaneRelation::OnPlane
        } else {
            RayPlaneRelation::Parallel
        }
    } else {
        let t = numer / denom;
        if t < 0.0 {
            RayPlaneRelation::Behind
        } else {
            RayPlaneRelation::Point {
                point: ray.at(t),
                t,
            }
        }
    }
}

/// Intersects a ray with a sphere, returning the nearest non-negative distance.
///
/// When the origin lies inside the sphere the exit distance is returned.
#[must_use]
pub fn ray_sphere_intersect(ray: &Ray, center: &Point3, radius: f64) -> Option<f64> {
    let oc = ray.origin() - center;
    let d = ray.direction();

    // |oc + t d|^2 = r^2 with |d| = 1  =>  t^2 + 2 b t + c = 0
    let b = oc.dot(d);
    let c = oc.norm_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    nearest_non_negative_root(-b - sqrt_disc, -b + sqrt_disc)
}

/// A ray/triangle hit with barycentric coordinates.
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray.
    pub t: f64,
    /// Weight of the second vertex.
    pub u: f64,
    /// Weight of the third vertex.
    pub v: f64,
}

/// Möller–Trumbore ray/triangle intersection (double-sided).
#[must_use]
pub fn ray_triangle_intersect(
    ray: &Ray,
    a: &Point3,
    b: &Point3,
    c: &Point3,
) -> Option<TriangleHit> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.direction().cross(&e2);
    let det = e1.dot(&p);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin() - a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = ray.direction().dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    (t >= 0.0).then_some(TriangleHit { t, u, v })
}
