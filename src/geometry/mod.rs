pub mod ellipsoid;
pub mod point;
pub mod surface;

pub use ellipsoid::Ellipsoid;
pub use point::Point;
pub use surface::{Continuity, ParametricSurface, Surface, SurfaceDomain};

use crate::error::Result;
use crate::math::{Aabb, Point2, Ray, Vector3};
use crate::tessellation::TessellationParams;

/// Ray hit on a primitive.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveHit {
    /// Distance along the ray.
    pub t: f64,
    /// Surface parameters, for hits on parametric surfaces.
    pub uv: Option<Point2>,
}

impl PrimitiveHit {
    fn at(t: f64) -> Self {
        Self { t, uv: None }
    }
}

/// Geometry held by a scene object.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// A free point.
    Point(Point),
    /// An analytic ellipsoid.
    Ellipsoid(Ellipsoid),
    /// A bicubic C0 or C2 surface.
    Surface(ParametricSurface),
}

impl Primitive {
    /// Short name of the variant, used in logs and errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Ellipsoid(_) => "ellipsoid",
            Self::Surface(_) => "surface",
        }
    }

    /// Closest non-negative hit along `ray`.
    ///
    /// Points are picked as spheres of radius `point_radius`. Surfaces are
    /// only hit once a tessellation has been committed.
    #[must_use]
    pub fn intersect(&self, ray: &Ray, point_radius: f64) -> Option<PrimitiveHit> {
        match self {
            Self::Point(point) => point.intersect(ray, point_radius).map(PrimitiveHit::at),
            Self::Ellipsoid(ellipsoid) => ellipsoid.intersect(ray).map(PrimitiveHit::at),
            Self::Surface(surface) => surface.intersect(ray).map(|hit| PrimitiveHit {
                t: hit.t,
                uv: Some(hit.uv),
            }),
        }
    }

    /// World-space bounding box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Point(point) => point.bounds(),
            Self::Ellipsoid(ellipsoid) => ellipsoid.bounds(),
            Self::Surface(surface) => *surface.bounds(),
        }
    }

    /// Moves the whole primitive by `delta`.
    ///
    /// # Errors
    ///
    /// Returns an error if `delta` is not finite; the primitive is left
    /// unchanged.
    pub fn translate(&mut self, delta: &Vector3) -> Result<()> {
        point::ensure_finite_vector(delta)?;
        match self {
            Self::Point(point) => point.translate(delta),
            Self::Ellipsoid(ellipsoid) => ellipsoid.translate(delta),
            Self::Surface(surface) => surface.translate(delta),
        }
        Ok(())
    }

    /// Rebuilds derived data after an edit.
    ///
    /// # Errors
    ///
    /// Returns an error if a surface cannot be tessellated.
    pub fn commit(&mut self, params: &TessellationParams) -> Result<()> {
        match self {
            Self::Surface(surface) => surface.retessellate(params),
            Self::Point(_) | Self::Ellipsoid(_) => Ok(()),
        }
    }
}

impl From<Point> for Primitive {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

impl From<Ellipsoid> for Primitive {
    fn from(ellipsoid: Ellipsoid) -> Self {
        Self::Ellipsoid(ellipsoid)
    }
}

impl From<ParametricSurface> for Primitive {
    fn from(surface: ParametricSurface) -> Self {
        Self::Surface(surface)
    }
}
