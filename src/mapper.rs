//! Mapping between canvas coordinates and full-resolution image coordinates.

use crate::config::Viewport;

/// A pixel position in full-resolution image space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

impl ImagePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ImagePoint) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        dx.hypot(dy)
    }

    /// Integer midpoint, floor-divided.
    pub fn midpoint(self, other: ImagePoint) -> ImagePoint {
        let mid = |a: i32, b: i32| (a as i64 + b as i64).div_euclid(2) as i32;
        ImagePoint::new(mid(self.x, other.x), mid(self.y, other.y))
    }
}

/// Uniform scale that fits an image inside the viewport without distortion.
///
/// The scale is kept in `f64`; egui coordinates are converted at the edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    scale: f64,
    image_size: (u32, u32),
}

impl CoordinateMapper {
    pub fn fit(image_size: (u32, u32), viewport: Viewport) -> Self {
        let (width, height) = image_size;
        let scale_w = viewport.width as f64 / width.max(1) as f64;
        let scale_h = viewport.height as f64 / height.max(1) as f64;
        Self {
            scale: scale_w.min(scale_h),
            image_size,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn image_size(&self) -> (u32, u32) {
        self.image_size
    }

    /// Canvas position to image pixel, truncating toward zero.
    pub fn to_image_space(&self, screen_x: f32, screen_y: f32) -> ImagePoint {
        ImagePoint::new(
            (screen_x as f64 / self.scale) as i32,
            (screen_y as f64 / self.scale) as i32,
        )
    }

    pub fn to_screen_space(&self, point: ImagePoint) -> (f32, f32) {
        (
            (point.x as f64 * self.scale) as f32,
            (point.y as f64 * self.scale) as f32,
        )
    }

    pub fn to_screen_length(&self, length: f32) -> f32 {
        (length as f64 * self.scale) as f32
    }

    /// Size of the letterboxed preview. Never zero in either dimension.
    pub fn display_size(&self) -> (u32, u32) {
        let (width, height) = self.image_size;
        (
            ((width as f64 * self.scale) as u32).max(1),
            ((height as f64 * self.scale) as u32).max(1),
        )
    }
}
