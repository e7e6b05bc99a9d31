//! Startup settings of the editor.

use crate::camera::Viewport;
use crate::math::Point3;
use crate::raycaster::{PickTolerance, RasterParams};
use crate::tessellation::TessellationParams;

/// Initial viewport width in pixels.
pub const INITIAL_WIDTH: u32 = 1280;
/// Initial viewport height in pixels.
pub const INITIAL_HEIGHT: u32 = 720;
/// Where the camera starts, looking down `-Z` at the origin.
pub const INITIAL_CAMERA_POSITION: [f64; 3] = [0.0, 0.0, 5.0];

/// Everything the [`Editor`](crate::editor::Editor) needs at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Size of the drawing surface.
    pub viewport: Viewport,
    /// Starting camera position.
    pub camera_position: Point3,
    /// How large points are when picked.
    pub pick_tolerance: PickTolerance,
    /// Surface tessellation density.
    pub tessellation: TessellationParams,
    /// Ellipsoid raster refinement.
    pub raster: RasterParams,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let [x, y, z] = INITIAL_CAMERA_POSITION;
        Self {
            viewport: Viewport::new(INITIAL_WIDTH, INITIAL_HEIGHT),
            camera_position: Point3::new(x, y, z),
            pick_tolerance: PickTolerance::default(),
            tessellation: TessellationParams::default(),
            raster: RasterParams::default(),
        }
    }
}
