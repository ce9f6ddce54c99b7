//! Scaled preview of the full-resolution buffer.

use crate::config::Viewport;
use crate::mapper::CoordinateMapper;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// A complete replacement for the visible surface.
pub struct Preview {
    pub mapper: CoordinateMapper,
    pub image: RgbImage,
}

impl Preview {
    pub fn to_color_image(&self) -> egui::ColorImage {
        let size = [self.image.width() as usize, self.image.height() as usize];
        egui::ColorImage::from_rgb(size, self.image.as_raw())
    }
}

/// Recompute the scale for `image` and resample it to fit `viewport`.
pub fn refresh(image: &RgbImage, viewport: Viewport) -> Preview {
    let mapper = CoordinateMapper::fit(image.dimensions(), viewport);
    let (width, height) = mapper.display_size();
    let image = if (width, height) == image.dimensions() {
        image.clone()
    } else {
        imageops::resize(image, width, height, FilterType::Lanczos3)
    };
    Preview { mapper, image }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn preview_is_letterboxed_to_viewport() {
        let image = RgbImage::from_pixel(1000, 500, Rgb([10, 20, 30]));
        let preview = refresh(&image, Viewport::default());
        assert_eq!(preview.image.dimensions(), (900, 450));
        assert!((preview.mapper.scale() - 0.9).abs() < 1e-6);
        let center = preview.image.get_pixel(450, 225).0;
        for (got, want) in center.iter().zip([10u8, 20, 30]) {
            assert!(got.abs_diff(want) <= 1);
        }
    }

    #[test]
    fn exact_fit_is_copied() {
        let image = RgbImage::from_fn(900, 600, |x, y| Rgb([x as u8, y as u8, 0]));
        let preview = refresh(&image, Viewport::default());
        assert_eq!(preview.image, image);
    }

    #[test]
    fn color_image_matches_preview_size() {
        let image = RgbImage::new(300, 1200);
        let color = refresh(&image, Viewport::default()).to_color_image();
        assert_eq!(color.size, [150, 600]);
    }

    #[test]
    fn refresh_follows_buffer_changes() {
        let mut image = RgbImage::new(1800, 1200);
        let before = refresh(&image, Viewport::default());
        for pixel in image.pixels_mut() {
            *pixel = Rgb([200, 200, 200]);
        }
        let after = refresh(&image, Viewport::default());
        assert_ne!(before.image, after.image);
        assert!(after.image.get_pixel(0, 0).0.iter().all(|c| c.abs_diff(200) <= 1));
    }
}
