use crate::error::{GeometryError, Result};
use crate::geometry::point::ensure_finite;
use crate::math::{Aabb, Point3, Ray, Vector3, TOLERANCE};
use crate::tessellation::{SurfaceHit, TessellateSurface, TessellatedSurface, TessellationParams};

use super::basis;
use super::{Surface, SurfaceDomain};

/// Padding applied to the eager bounds before the coarse ray test.
const BOUNDS_MARGIN: f64 = 1e-9;

/// Continuity class of a bicubic surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuity {
    /// Bézier patches sharing boundary rows; `3n + 1` control points per direction.
    C0,
    /// Uniform cubic B-spline; `n + 3` control points per direction.
    C2,
}

impl Continuity {
    /// Short display name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::C0 => "C0",
            Self::C2 => "C2",
        }
    }

    /// Number of control points needed along one direction for `patches` patches.
    #[must_use]
    pub fn control_count(self, patches: usize) -> usize {
        match self {
            Self::C0 => 3 * patches + 1,
            Self::C2 => patches + 3,
        }
    }

    /// Number of patches spanned by `control_count` control points, if valid.
    #[must_use]
    pub fn patch_count(self, control_count: usize) -> Option<usize> {
        if control_count < 4 {
            return None;
        }
        match self {
            Self::C0 => (control_count % 3 == 1).then_some((control_count - 1) / 3),
            Self::C2 => Some(control_count - 3),
        }
    }

    fn patch_start(self, patch: usize) -> usize {
        match self {
            Self::C0 => 3 * patch,
            Self::C2 => patch,
        }
    }

    /// Control point spacing that makes one patch span `size` world units.
    fn control_spacing(self, size: f64) -> f64 {
        match self {
            Self::C0 => size / 3.0,
            Self::C2 => size,
        }
    }

    fn basis(self, t: f64) -> [f64; 4] {
        match self {
            Self::C0 => basis::bernstein(t),
            Self::C2 => basis::bspline(t),
        }
    }

    fn basis_derivative(self, t: f64) -> [f64; 4] {
        match self {
            Self::C0 => basis::bernstein_derivative(t),
            Self::C2 => basis::bspline_derivative(t),
        }
    }
}

impl std::fmt::Display for Continuity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A bicubic surface defined by a rectangular grid of control points.
///
/// Rows run along `v`, columns along `u`. The parameter domain is
/// `[0, patches_u] x [0, patches_v]`; the integer part selects the patch and
/// the fractional part is the local patch parameter.
///
/// The grid dimensions are fixed at construction. Moving a control point
/// refreshes the bounding box immediately, while the tessellation is only
/// rebuilt by [`retessellate`](Self::retessellate).
#[derive(Debug, Clone)]
pub struct ParametricSurface {
    continuity: Continuity,
    control_points: Vec<Vec<Point3>>,
    patches_u: usize,
    patches_v: usize,
    bounds: Aabb,
    tessellation: Option<TessellatedSurface>,
}

impl ParametricSurface {
    /// Creates a flat surface on the XZ plane, centred at the origin.
    ///
    /// Each patch spans `size` world units in both directions. The surface
    /// normal points along `+Y`.
    ///
    /// # Errors
    ///
    /// Returns an error if either patch count is zero or `size` is not a
    /// positive finite number.
    #[allow(clippy::cast_precision_loss)]
    pub fn flat(
        continuity: Continuity,
        patches_u: usize,
        patches_v: usize,
        size: f64,
    ) -> Result<Self> {
        if patches_u == 0 || patches_v == 0 {
            return Err(GeometryError::Degenerate(
                "surface needs at least one patch in each direction".into(),
            )
            .into());
        }
        if !size.is_finite() || size < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "patch size must be positive, got {size}"
            ))
            .into());
        }

        let spacing = continuity.control_spacing(size);
        let cols = continuity.control_count(patches_u);
        let rows = continuity.control_count(patches_v);
        let mid_u = (cols - 1) as f64 / 2.0;
        let mid_v = (rows - 1) as f64 / 2.0;

        let grid = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| {
                        Point3::new(
                            (c as f64 - mid_u) * spacing,
                            0.0,
                            -(r as f64 - mid_v) * spacing,
                        )
                    })
                    .collect()
            })
            .collect();

        Self::from_grid(continuity, grid)
    }

    /// Creates a surface from an explicit control grid (`grid[row][col]`).
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is ragged, too small, has a size the
    /// continuity class cannot use, or contains non-finite coordinates.
    pub fn from_grid(continuity: Continuity, grid: Vec<Vec<Point3>>) -> Result<Self> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if grid.iter().any(|row| row.len() != cols) {
            return Err(GeometryError::Degenerate(
                "control grid rows must all have the same length".into(),
            )
            .into());
        }

        let (Some(patches_u), Some(patches_v)) =
            (continuity.patch_count(cols), continuity.patch_count(rows))
        else {
            return Err(GeometryError::Degenerate(format!(
                "a {continuity} surface cannot be built from a {rows}x{cols} control grid"
            ))
            .into());
        };

        for point in grid.iter().flatten() {
            ensure_finite(point)?;
        }

        let bounds = grid_bounds(&grid);
        Ok(Self {
            continuity,
            control_points: grid,
            patches_u,
            patches_v,
            bounds,
            tessellation: None,
        })
    }

    /// Returns the continuity class.
    #[must_use]
    pub fn continuity(&self) -> Continuity {
        self.continuity
    }

    /// Number of control point rows (along `v`).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.control_points.len()
    }

    /// Number of control point columns (along `u`).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.control_points.first().map_or(0, Vec::len)
    }

    /// Number of patches along `u`.
    #[must_use]
    pub fn patches_u(&self) -> usize {
        self.patches_u
    }

    /// Number of patches along `v`.
    #[must_use]
    pub fn patches_v(&self) -> usize {
        self.patches_v
    }

    /// Total number of patches.
    #[must_use]
    pub fn patch_count(&self) -> usize {
        self.patches_u * self.patches_v
    }

    /// Returns the control grid, `[row][col]`.
    #[must_use]
    pub fn control_points(&self) -> &[Vec<Point3>] {
        &self.control_points
    }

    /// Returns one control point, or `None` outside the grid.
    #[must_use]
    pub fn control_point(&self, row: usize, col: usize) -> Option<&Point3> {
        self.control_points.get(row)?.get(col)
    }

    /// Moves one control point and refreshes the bounding box.
    ///
    /// # Errors
    ///
    /// Returns an error if `(row, col)` is outside the grid or the position
    /// is not finite. The surface is left unchanged on error.
    pub fn set_control_point(&mut self, row: usize, col: usize, position: Point3) -> Result<()> {
        ensure_finite(&position)?;
        let (rows, cols) = (self.rows(), self.cols());
        let slot = self
            .control_points
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(GeometryError::ControlPointOutOfRange {
                row,
                col,
                rows,
                cols,
            })?;
        *slot = position;
        self.bounds = grid_bounds(&self.control_points);
        Ok(())
    }

    /// Moves every control point by `delta`.
    pub fn translate(&mut self, delta: &Vector3) {
        for point in self.control_points.iter_mut().flatten() {
            *point += delta;
        }
        self.bounds = grid_bounds(&self.control_points);
    }

    /// Grid position of the control point closest to `target`.
    #[must_use]
    pub fn nearest_control_point(&self, target: &Point3) -> (usize, usize) {
        let mut best = (0, 0);
        let mut best_dist = f64::INFINITY;
        for (r, row) in self.control_points.iter().enumerate() {
            for (c, point) in row.iter().enumerate() {
                let dist = (point - target).norm_squared();
                if dist < best_dist {
                    best_dist = dist;
                    best = (r, c);
                }
            }
        }
        best
    }

    /// The 4x4 control net of patch `(pu, pv)`, indexed `[v][u]`.
    #[must_use]
    pub fn patch_control_points(&self, pu: usize, pv: usize) -> [[Point3; 4]; 4] {
        let row0 = self.continuity.patch_start(pv);
        let col0 = self.continuity.patch_start(pu);
        std::array::from_fn(|i| std::array::from_fn(|j| self.control_points[row0 + i][col0 + j]))
    }

    /// Box around the control net of one patch.
    ///
    /// Bézier and B-spline patches lie inside the convex hull of their
    /// control net, so this box encloses the patch and any tessellation of it.
    #[must_use]
    pub fn patch_bounds(&self, pu: usize, pv: usize) -> Aabb {
        let net = self.patch_control_points(pu, pv);
        net.iter()
            .flatten()
            .fold(Aabb::from_point(net[0][0]), |acc, p| acc.including(p))
    }

    /// Boxes of every patch, ordered `pv * patches_u + pu`.
    #[must_use]
    pub fn all_patch_bounds(&self) -> Vec<Aabb> {
        (0..self.patches_v)
            .flat_map(|pv| (0..self.patches_u).map(move |pu| (pu, pv)))
            .map(|(pu, pv)| self.patch_bounds(pu, pv))
            .collect()
    }

    /// Box around the whole control grid, kept current on every edit.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Point on patch `(pu, pv)` at local parameters `(s, t)` in `[0, 1]`.
    #[must_use]
    pub fn patch_point(&self, pu: usize, pv: usize, s: f64, t: f64) -> Point3 {
        let net = self.patch_control_points(pu, pv);
        let bu = self.continuity.basis(s);
        let bv = self.continuity.basis(t);
        blend(&net, &bv, &bu).into()
    }

    /// Point and partial derivatives `(P, dP/du, dP/dv)` on one patch.
    #[must_use]
    pub fn patch_derivatives(&self, pu: usize, pv: usize, s: f64, t: f64) -> (Point3, Vector3, Vector3) {
        let net = self.patch_control_points(pu, pv);
        let bu = self.continuity.basis(s);
        let bv = self.continuity.basis(t);
        let dbu = self.continuity.basis_derivative(s);
        let dbv = self.continuity.basis_derivative(t);
        (
            blend(&net, &bv, &bu).into(),
            blend(&net, &bv, &dbu),
            blend(&net, &dbv, &bu),
        )
    }

    /// The committed tessellation, if one has been built.
    #[must_use]
    pub fn tessellation(&self) -> Option<&TessellatedSurface> {
        self.tessellation.as_ref()
    }

    /// Rebuilds the tessellation and its bounding hierarchy.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the mesh cannot be
    /// built. The previous tessellation is kept on error.
    pub fn retessellate(&mut self, params: &TessellationParams) -> Result<()> {
        let mesh = TessellateSurface::new(self, *params).execute()?;
        self.tessellation = Some(TessellatedSurface::new(mesh));
        Ok(())
    }

    /// Approximate ray intersection against the committed tessellation.
    ///
    /// The ray is first tested against the eager control-grid bounds, then
    /// against the patch hierarchy and finally the triangles of surviving
    /// patches. Returns `None` if no tessellation exists yet.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        ray.intersect_aabb(&self.bounds.expanded(BOUNDS_MARGIN))?;
        self.tessellation.as_ref()?.intersect(ray)
    }
}

impl Surface for ParametricSurface {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let (pu, s) = locate(u, self.patches_u, "u")?;
        let (pv, t) = locate(v, self.patches_v, "v")?;
        Ok(self.patch_point(pu, pv, s, t))
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        let (pu, s) = locate(u, self.patches_u, "u")?;
        let (pv, t) = locate(v, self.patches_v, "v")?;
        let (_, du, dv) = self.patch_derivatives(pu, pv, s, t);
        let n = du.cross(&dv);
        let len = n.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(n / len)
    }

    #[allow(clippy::cast_precision_loss)]
    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, self.patches_u as f64, 0.0, self.patches_v as f64)
    }
}

/// `sum_i sum_j wv[i] * wu[j] * net[i][j]`
fn blend(net: &[[Point3; 4]; 4], wv: &[f64; 4], wu: &[f64; 4]) -> Vector3 {
    let mut acc = Vector3::zeros();
    for (row, &a) in net.iter().zip(wv) {
        for (point, &b) in row.iter().zip(wu) {
            acc += point.coords * (a * b);
        }
    }
    acc
}

fn grid_bounds(grid: &[Vec<Point3>]) -> Aabb {
    let mut points = grid.iter().flatten();
    let Some(first) = points.next() else {
        return Aabb::from_point(Point3::origin());
    };
    points.fold(Aabb::from_point(*first), |acc, p| acc.including(p))
}

/// Splits a global parameter into a patch index and a local parameter.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn locate(param: f64, patches: usize, name: &'static str) -> Result<(usize, f64)> {
    let max = patches as f64;
    if param.is_nan() || param < -TOLERANCE || param > max + TOLERANCE {
        return Err(GeometryError::ParameterOutOfRange {
            parameter: name,
            value: param,
            min: 0.0,
            max,
        }
        .into());
    }
    let clamped = param.clamp(0.0, max);
    let index = (clamped.floor() as usize).min(patches - 1);
    Ok((index, clamped - index as f64))
}
