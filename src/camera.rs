use std::cell::Cell;
use std::f64::consts::FRAC_PI_2;

use nalgebra::Perspective3;

use crate::math::{Isometry3, Matrix4, Point3, Ray, Vector3, TOLERANCE};

/// Default vertical field of view (45 degrees).
pub const DEFAULT_FOV_Y: f64 = std::f64::consts::FRAC_PI_4;
/// Default near clipping distance.
pub const DEFAULT_NEAR: f64 = 0.1;
/// Default far clipping distance.
pub const DEFAULT_FAR: f64 = 100.0;

const MIN_FOV_Y: f64 = 10.0 * std::f64::consts::PI / 180.0;
const MAX_FOV_Y: f64 = 120.0 * std::f64::consts::PI / 180.0;
/// Pitch stays this far from the poles so the basis never degenerates.
const PITCH_MARGIN: f64 = 1e-3;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or `1.0` for a zero-height viewport.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            f64::from(self.width.max(1)) / f64::from(self.height)
        }
    }
}

/// Cached camera transforms.
#[derive(Debug, Clone, Copy)]
struct CameraMatrices {
    view: Matrix4,
    inverse_view: Matrix4,
    projection: Matrix4,
    inverse_projection: Matrix4,
}

/// A perspective fly camera driven by yaw and pitch.
///
/// Yaw rotates around the world Y axis, pitch tilts towards it. With both at
/// zero the camera looks down `-Z`. The view and projection matrices are
/// computed on first use and cached until a mutator invalidates them, so
/// repeated queries inside a frame cost nothing.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3,
    yaw: f64,
    pitch: f64,
    fov_y: f64,
    near: f64,
    far: f64,
    aspect: f64,
    matrices: Cell<Option<CameraMatrices>>,
}

impl Camera {
    /// Creates a camera at `(x, y, z)` looking down `-Z`.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            yaw: 0.0,
            pitch: 0.0,
            fov_y: DEFAULT_FOV_Y,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            aspect: 1.0,
            matrices: Cell::new(None),
        }
    }

    /// Returns the camera position.
    #[must_use]
    pub fn position(&self) -> &Point3 {
        &self.position
    }

    /// Returns the yaw angle in radians.
    #[must_use]
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Returns the pitch angle in radians.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Returns the vertical field of view in radians.
    #[must_use]
    pub fn fov_y(&self) -> f64 {
        self.fov_y
    }

    /// Returns the near clipping distance.
    #[must_use]
    pub fn near(&self) -> f64 {
        self.near
    }

    /// Returns the far clipping distance.
    #[must_use]
    pub fn far(&self) -> f64 {
        self.far
    }

    /// Returns the aspect ratio used by the cached projection.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Unit viewing direction.
    #[must_use]
    pub fn forward(&self) -> Vector3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vector3::new(cp * sy, sp, -cp * cy)
    }

    /// Unit vector pointing to the right of the view.
    #[must_use]
    pub fn right(&self) -> Vector3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vector3::new(cy, 0.0, sy)
    }

    /// Unit up vector, orthogonal to [`forward`](Self::forward) and [`right`](Self::right).
    #[must_use]
    pub fn up(&self) -> Vector3 {
        self.right().cross(&self.forward())
    }

    /// Moves the camera to `position`.
    pub fn set_position(&mut self, position: Point3) {
        self.position = position;
        self.invalidate();
    }

    /// Moves the camera by a world-space offset.
    pub fn translate(&mut self, delta: &Vector3) {
        self.position += delta;
        self.invalidate();
    }

    /// Moves the camera along its own right, up and forward axes.
    pub fn move_local(&mut self, right: f64, up: f64, forward: f64) {
        let delta = self.right() * right + self.up() * up + self.forward() * forward;
        self.translate(&delta);
    }

    /// Rotates the view. Pitch is clamped short of straight up or down.
    pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw = (self.yaw + d_yaw).rem_euclid(std::f64::consts::TAU);
        self.pitch = clamp_pitch(self.pitch + d_pitch);
        self.invalidate();
    }

    /// Turns the camera towards `target`. No-op if the target is the camera position.
    pub fn look_at(&mut self, target: &Point3) {
        let dir = target - self.position;
        let len = dir.norm();
        if len < TOLERANCE {
            return;
        }
        let dir = dir / len;
        self.yaw = dir.x.atan2(-dir.z).rem_euclid(std::f64::consts::TAU);
        self.pitch = clamp_pitch(dir.y.clamp(-1.0, 1.0).asin());
        self.invalidate();
    }

    /// Narrows (`factor > 1`) or widens (`factor < 1`) the field of view.
    pub fn zoom(&mut self, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        self.fov_y = (self.fov_y / factor).clamp(MIN_FOV_Y, MAX_FOV_Y);
        self.invalidate();
    }

    /// Sets the projection aspect ratio from a viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.set_aspect(viewport.aspect());
    }

    /// Sets the projection aspect ratio. Non-positive values are ignored.
    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect <= 0.0 || !aspect.is_finite() {
            return;
        }
        if (aspect - self.aspect).abs() > TOLERANCE {
            self.aspect = aspect;
            self.invalidate();
        }
    }

    /// World-to-camera transform.
    #[must_use]
    pub fn view_matrix(&self) -> Matrix4 {
        self.matrices().view
    }

    /// Camera-to-world transform.
    #[must_use]
    pub fn inverse_view_matrix(&self) -> Matrix4 {
        self.matrices().inverse_view
    }

    /// Perspective projection.
    #[must_use]
    pub fn projection_matrix(&self) -> Matrix4 {
        self.matrices().projection
    }

    /// Inverse of [`projection_matrix`](Self::projection_matrix).
    #[must_use]
    pub fn inverse_projection_matrix(&self) -> Matrix4 {
        self.matrices().inverse_projection
    }

    /// `projection * view`.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Matrix4 {
        let m = self.matrices();
        m.projection * m.view
    }

    /// Builds the world-space picking ray through a screen pixel.
    ///
    /// `(screen_x, screen_y)` are pixel coordinates with the origin at the
    /// top-left corner. The point is mapped to normalized device coordinates
    /// and unprojected at the near and far planes; the returned ray starts
    /// at the camera position. Coordinates outside the viewport still yield
    /// a valid ray.
    #[must_use]
    pub fn generate_ray(&self, screen_x: f64, screen_y: f64, viewport: Viewport) -> Ray {
        let width = f64::from(viewport.width.max(1));
        let height = f64::from(viewport.height.max(1));
        let ndc_x = 2.0 * screen_x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen_y / height;

        let aspect = viewport.aspect();
        let m = if (aspect - self.aspect).abs() < TOLERANCE {
            self.matrices()
        } else {
            self.compute_matrices(aspect)
        };

        let unproject = |ndc_z: f64| {
            let eye = m
                .inverse_projection
                .transform_point(&Point3::new(ndc_x, ndc_y, ndc_z));
            m.inverse_view.transform_point(&eye)
        };
        let near = unproject(-1.0);
        let far = unproject(1.0);

        Ray::new(self.position, far - near)
            .unwrap_or_else(|| Ray::from_unit(self.position, self.forward()))
    }

    fn invalidate(&self) {
        self.matrices.set(None);
    }

    fn matrices(&self) -> CameraMatrices {
        if let Some(m) = self.matrices.get() {
            return m;
        }
        let m = self.compute_matrices(self.aspect);
        self.matrices.set(Some(m));
        m
    }

    fn compute_matrices(&self, aspect: f64) -> CameraMatrices {
        let target = self.position + self.forward();
        let view = Isometry3::look_at_rh(&self.position, &target, &self.up());
        let projection = Perspective3::new(aspect, self.fov_y, self.near, self.far);
        CameraMatrices {
            view: view.to_homogeneous(),
            inverse_view: view.inverse().to_homogeneous(),
            projection: projection.to_homogeneous(),
            inverse_projection: projection.inverse(),
        }
    }
}

fn clamp_pitch(pitch: f64) -> f64 {
    pitch.clamp(-FRAC_PI_2 + PITCH_MARGIN, FRAC_PI_2 - PITCH_MARGIN)
}
