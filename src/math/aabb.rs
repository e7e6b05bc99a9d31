use super::{Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from two corners, in any order.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Degenerate box containing a single point.
    #[must_use]
    pub fn from_point(point: Point3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let first = Self::from_point(*iter.next()?);
        Some(iter.fold(first, |acc, p| acc.including(p)))
    }

    /// Returns this box grown to contain `point`.
    #[must_use]
    pub fn including(&self, point: &Point3) -> Self {
        Self {
            min: self.min.inf(point),
            max: self.max.sup(point),
        }
    }

    /// Returns the union of two boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Returns the box padded by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let pad = Vector3::repeat(margin);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Edge lengths along each axis.
    #[must_use]
    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }

    /// Index (0 = x, 1 = y, 2 = z) of the longest edge.
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        self.extents().imax()
    }

    /// Returns `true` if the point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn corners_are_sorted() {
        let b = Aabb::new(p(1.0, -1.0, 3.0), p(-2.0, 4.0, 0.0));
        assert_eq!(b.min, p(-2.0, -1.0, 0.0));
        assert_eq!(b.max, p(1.0, 4.0, 3.0));
    }

    #[test]
    fn from_points_covers_all() {
        let pts = [p(0.0, 0.0, 0.0), p(2.0, -1.0, 0.5), p(-1.0, 3.0, 1.0)];
        let b = Aabb::from_points(&pts);
        let Some(b) = b else {
            panic!("expected a box");
        };
        assert!(pts.iter().all(|q| b.contains(q)));
        assert_eq!(b.longest_axis(), 1);
    }

    #[test]
    fn from_no_points_is_none() {
        assert!(Aabb::from_points(std::iter::empty::<&Point3>()).is_none());
    }

    #[test]
    fn union_and_center() {
        let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let b = Aabb::new(p(2.0, 2.0, 2.0), p(3.0, 3.0, 3.0));
        let u = a.union(&b);
        assert_eq!(u.center(), p(1.5, 1.5, 1.5));
        assert!(!a.contains(&p(2.5, 2.5, 2.5)));
        assert!(u.contains(&p(2.5, 2.5, 2.5)));
    }
}
