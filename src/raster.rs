//! Pixel primitives for stamping annotations into an `RgbImage`.
//!
//! Everything clips silently at the image border, so shapes may extend past
//! the edges (a drag can end in the letterbox area).

use ab_glyph::{Font, FontArc, FontRef, FontVec, ScaleFont};
use image::{Rgb, RgbImage};
use std::borrow::Cow;

fn put_pixel(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn blend_pixel(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage <= 0.0 {
        return;
    }
    let dst = img.get_pixel(x as u32, y as u32).0;
    let mix = |src: u8, dst: u8| {
        (src as f32 * coverage + dst as f32 * (1.0 - coverage))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    img.put_pixel(
        x as u32,
        y as u32,
        Rgb([
            mix(color[0], dst[0]),
            mix(color[1], dst[1]),
            mix(color[2], dst[2]),
        ]),
    );
}

fn stamp_square(img: &mut RgbImage, cx: i32, cy: i32, width: u32, color: Rgb<u8>) {
    let width = width.max(1) as i32;
    let lo = -(width - 1) / 2;
    let hi = width / 2;
    for oy in lo..=hi {
        for ox in lo..=hi {
            put_pixel(img, cx + ox, cy + oy, color);
        }
    }
}

/// Straight segment stamped with a square brush `width` pixels wide.
pub fn draw_line(
    img: &mut RgbImage,
    start: (i32, i32),
    end: (i32, i32),
    width: u32,
    color: Rgb<u8>,
) {
    let dx = (end.0 - start.0) as f32;
    let dy = (end.1 - start.1) as f32;
    let steps = dx.abs().max(dy.abs()).ceil() as i32;
    for i in 0..=steps {
        let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
        let x = (start.0 as f32 + dx * t).round() as i32;
        let y = (start.1 as f32 + dy * t).round() as i32;
        stamp_square(img, x, y, width, color);
    }
}

fn hline(img: &mut RgbImage, x0: i32, x1: i32, y: i32, color: Rgb<u8>) {
    for x in x0.max(0)..=x1.min(img.width() as i32 - 1) {
        put_pixel(img, x, y, color);
    }
}

fn vline(img: &mut RgbImage, x: i32, y0: i32, y1: i32, color: Rgb<u8>) {
    for y in y0.max(0)..=y1.min(img.height() as i32 - 1) {
        put_pixel(img, x, y, color);
    }
}

/// Rectangle outline through two opposite corners, growing inward by `width`.
pub fn draw_rect_outline(
    img: &mut RgbImage,
    a: (i32, i32),
    b: (i32, i32),
    width: u32,
    color: Rgb<u8>,
) {
    let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
    let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
    for inset in 0..width.max(1) as i32 {
        let (left, right) = (x0 + inset, x1 - inset);
        let (top, bottom) = (y0 + inset, y1 - inset);
        if left > right || top > bottom {
            break;
        }
        hline(img, left, right, top, color);
        hline(img, left, right, bottom, color);
        vline(img, left, top, bottom, color);
        vline(img, right, top, bottom, color);
    }
}

/// Circle outline of the given radius, growing inward by `width`.
/// A zero radius marks the single center pixel.
pub fn draw_circle_outline(
    img: &mut RgbImage,
    center: (i32, i32),
    radius: f32,
    width: u32,
    color: Rgb<u8>,
) {
    if radius <= 0.0 {
        put_pixel(img, center.0, center.1, color);
        return;
    }
    let inner = radius - width.max(1) as f32;
    let reach = radius.ceil() as i32;
    let min_x = (center.0 - reach).max(0);
    let max_x = (center.0 + reach).min(img.width() as i32 - 1);
    let min_y = (center.1 - reach).max(0);
    let max_y = (center.1 + reach).min(img.height() as i32 - 1);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = ((x - center.0) as f32).hypot((y - center.1) as f32);
            if dist <= radius && dist > inner {
                put_pixel(img, x, y, color);
            }
        }
    }
}

/// Font used to stamp text into the image buffer.
#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
}

impl LabelFont {
    /// The first proportional font bundled with egui.
    pub fn egui_default() -> Option<Self> {
        let definitions = egui::FontDefinitions::default();
        let family = definitions.families.get(&egui::FontFamily::Proportional)?;
        let name = family.first()?;
        let data = definitions.font_data.get(name)?;
        let font = match data.font.clone() {
            Cow::Borrowed(bytes) => FontRef::try_from_slice_and_index(bytes, data.index)
                .map(FontArc::from)
                .ok(),
            Cow::Owned(bytes) => FontVec::try_from_vec_and_index(bytes, data.index)
                .map(FontArc::from)
                .ok(),
        }?;
        Some(Self { font })
    }
}

/// Draw `text` with its top-left corner at `pos`.
pub fn draw_text(
    img: &mut RgbImage,
    font: &LabelFont,
    pos: (i32, i32),
    text: &str,
    size: f32,
    color: Rgb<u8>,
) {
    if text.is_empty() {
        return;
    }
    let scaled = font.font.as_scaled(size);
    let mut caret = ab_glyph::point(pos.0 as f32, pos.1 as f32 + scaled.ascent());
    for ch in text.chars() {
        let mut glyph = scaled.scaled_glyph(ch);
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        if let Some(outlined) = scaled.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = x as i32 + bounds.min.x as i32;
                let py = y as i32 + bounds.min.y as i32;
                blend_pixel(img, px, py, color, coverage);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn count(img: &RgbImage, color: Rgb<u8>) -> usize {
        img.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn horizontal_line_has_brush_width() {
        let mut img = RgbImage::new(20, 20);
        draw_line(&mut img, (2, 10), (12, 10), 3, RED);
        assert_eq!(*img.get_pixel(2, 9), RED);
        assert_eq!(*img.get_pixel(12, 11), RED);
        assert_eq!(*img.get_pixel(7, 8), BLACK);
        assert_eq!(count(&img, RED), 13 * 3);
    }

    #[test]
    fn zero_length_line_stamps_once() {
        let mut img = RgbImage::new(10, 10);
        draw_line(&mut img, (5, 5), (5, 5), 1, RED);
        assert_eq!(count(&img, RED), 1);
    }

    #[test]
    fn rect_outline_grows_inward() {
        let mut img = RgbImage::new(30, 30);
        draw_rect_outline(&mut img, (20, 20), (5, 5), 2, RED);
        assert_eq!(*img.get_pixel(5, 5), RED);
        assert_eq!(*img.get_pixel(6, 6), RED);
        assert_eq!(*img.get_pixel(7, 7), BLACK);
        assert_eq!(*img.get_pixel(4, 4), BLACK);
        assert_eq!(*img.get_pixel(20, 12), RED);
    }

    #[test]
    fn degenerate_rect_is_a_pixel() {
        let mut img = RgbImage::new(10, 10);
        draw_rect_outline(&mut img, (3, 3), (3, 3), 5, RED);
        assert_eq!(count(&img, RED), 1);
    }

    #[test]
    fn circle_outline_leaves_center_clear() {
        let mut img = RgbImage::new(40, 40);
        draw_circle_outline(&mut img, (20, 20), 10.0, 2, RED);
        assert_eq!(*img.get_pixel(30, 20), RED);
        assert_eq!(*img.get_pixel(20, 10), RED);
        assert_eq!(*img.get_pixel(20, 20), BLACK);
        assert_eq!(*img.get_pixel(31, 20), BLACK);
    }

    #[test]
    fn zero_radius_circle_marks_center() {
        let mut img = RgbImage::new(10, 10);
        draw_circle_outline(&mut img, (4, 6), 0.0, 5, RED);
        assert_eq!(count(&img, RED), 1);
        assert_eq!(*img.get_pixel(4, 6), RED);
    }

    #[test]
    fn shapes_clip_at_border() {
        let mut img = RgbImage::new(10, 10);
        draw_line(&mut img, (-5, -5), (15, 15), 5, RED);
        draw_rect_outline(&mut img, (-3, -3), (30, 30), 5, RED);
        draw_circle_outline(&mut img, (0, 0), 50.0, 5, RED);
        assert!(count(&img, RED) > 0);
    }

    #[test]
    fn text_marks_pixels() {
        let font = LabelFont::egui_default().expect("egui bundles a default font");
        let mut img = RgbImage::new(120, 40);
        draw_text(&mut img, &font, (2, 2), "42.00px", 16.0, Rgb([255, 255, 255]));
        assert!(img.pixels().any(|p| p.0[0] > 0));
    }

    #[test]
    fn empty_text_is_noop() {
        let font = LabelFont::egui_default().expect("egui bundles a default font");
        let mut img = RgbImage::new(20, 20);
        draw_text(&mut img, &font, (0, 0), "", 16.0, RED);
        assert_eq!(count(&img, RED), 0);
    }
}
