pub mod aabb;
pub mod intersect_3d;
mod ray;

pub use aabb::Aabb;
pub use ray::Ray;

/// 2D point type, used for surface parameters.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Rigid transform (rotation followed by translation).
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Picks the entry root of a quadratic along a ray.
///
/// `t0 <= t1` is assumed. Returns the smaller non-negative root, or `None`
/// when both roots lie behind the ray origin.
#[must_use]
pub(crate) fn nearest_non_negative_root(t0: f64, t1: f64) -> Option<f64> {
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}
