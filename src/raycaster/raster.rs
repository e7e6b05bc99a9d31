//! Progressive ray-cast rendering of an ellipsoid.
//!
//! Each [`step`](AdaptiveRaster::step) casts one ray per block of pixels and
//! fills the whole block with the result. The block size starts coarse and
//! halves every step, so an interactive view gets a rough image at once and
//! sharpens over the following frames. Any change to the camera or the
//! ellipsoid should [`reset`](AdaptiveRaster::reset) the refinement.

use crate::camera::{Camera, Viewport};
use crate::geometry::Ellipsoid;

/// Settings of the adaptive raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterParams {
    /// Edge length in pixels of the first, coarsest blocks. Rounded down to
    /// a power of two.
    pub initial_block: u32,
    /// Specular exponent `m` in `max(0, n·v)^m`.
    pub exponent: f64,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self {
            initial_block: 32,
            exponent: 4.0,
        }
    }
}

/// Intensity buffer refined block by block.
#[derive(Debug, Clone)]
pub struct AdaptiveRaster {
    params: RasterParams,
    viewport: Viewport,
    block: u32,
    complete: bool,
    buffer: Vec<f32>,
}

impl AdaptiveRaster {
    /// Creates a raster for `viewport`, ready for its first step.
    #[must_use]
    pub fn new(viewport: Viewport, params: RasterParams) -> Self {
        let mut raster = Self {
            params,
            viewport,
            block: 1,
            complete: false,
            buffer: Vec::new(),
        };
        raster.reset();
        raster
    }

    /// Restarts refinement from the coarsest block size.
    pub fn reset(&mut self) {
        let initial = self.params.initial_block.max(1);
        // Largest power of two not above `initial`.
        self.block = 1 << (u32::BITS - 1 - initial.leading_zeros());
        self.complete = false;
        self.buffer.clear();
        self.buffer.resize(self.pixel_count(), 0.0);
    }

    /// Changes the buffer size and restarts refinement.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.reset();
    }

    /// Changes the settings and restarts refinement.
    pub fn set_params(&mut self, params: RasterParams) {
        self.params = params;
        self.reset();
    }

    /// Current settings.
    #[must_use]
    pub fn params(&self) -> &RasterParams {
        &self.params
    }

    /// Block size the next step will render at.
    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.block
    }

    /// Whether the image has been refined down to single pixels.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Row-major intensities in `[0, 1]`, `width * height` entries.
    #[must_use]
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Intensity of pixel `(x, y)`.
    #[must_use]
    pub fn intensity_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.viewport.width || y >= self.viewport.height {
            return None;
        }
        self.buffer.get(self.index(x, y)).copied()
    }

    /// Renders one refinement level.
    ///
    /// Returns `false` without doing any work once the image is complete.
    #[allow(clippy::cast_possible_truncation)]
    pub fn step(&mut self, camera: &Camera, ellipsoid: &Ellipsoid) -> bool {
        if self.complete {
            return false;
        }

        let Viewport { width, height } = self.viewport;
        let block = self.block;
        for by in (0..height).step_by(block as usize) {
            for bx in (0..width).step_by(block as usize) {
                let value = shade(
                    camera,
                    self.viewport,
                    ellipsoid,
                    f64::from(bx) + 0.5,
                    f64::from(by) + 0.5,
                    self.params.exponent,
                ) as f32;
                for y in by..(by + block).min(height) {
                    let row = self.index(bx, y);
                    let end = row + ((bx + block).min(width) - bx) as usize;
                    self.buffer[row..end].fill(value);
                }
            }
        }

        if block == 1 {
            self.complete = true;
        } else {
            self.block = block / 2;
        }
        true
    }

    fn pixel_count(&self) -> usize {
        self.viewport.width as usize * self.viewport.height as usize
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.viewport.width as usize + x as usize
    }
}

/// `max(0, n·v)^m` at the first hit, or zero on a miss.
fn shade(
    camera: &Camera,
    viewport: Viewport,
    ellipsoid: &Ellipsoid,
    x: f64,
    y: f64,
    exponent: f64,
) -> f64 {
    let ray = camera.generate_ray(x, y, viewport);
    let Some(t) = ellipsoid.intersect(&ray) else {
        return 0.0;
    };
    let Some(normal) = ellipsoid.normal_at(&ray.at(t)) else {
        return 0.0;
    };
    let to_eye = -ray.direction();
    normal.dot(&to_eye).max(0.0).powf(exponent)
}
