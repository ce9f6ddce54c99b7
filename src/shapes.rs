//! Annotations in image space and how each one is stamped into the buffer.

use crate::config::ToolStyles;
use crate::mapper::ImagePoint;
use crate::raster::{self, LabelFont};
use image::RgbImage;

#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Rectangle {
        corner_a: ImagePoint,
        corner_b: ImagePoint,
    },
    Line {
        start: ImagePoint,
        end: ImagePoint,
    },
    Circle {
        center: ImagePoint,
        radius: f32,
    },
    Text {
        position: ImagePoint,
        content: String,
    },
    /// Connecting line plus a distance label at the integer midpoint.
    Measurement {
        start: ImagePoint,
        end: ImagePoint,
    },
}

impl Annotation {
    /// Circle centered on `center` passing through `rim`.
    pub fn circle_through(center: ImagePoint, rim: ImagePoint) -> Self {
        Annotation::Circle {
            center,
            radius: center.distance_to(rim),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Annotation::Rectangle { .. } => "rectangle",
            Annotation::Line { .. } => "line",
            Annotation::Circle { .. } => "circle",
            Annotation::Text { .. } => "text",
            Annotation::Measurement { .. } => "measurement",
        }
    }

    /// Distance in full-resolution pixels, for measurements only.
    pub fn measured_distance(&self) -> Option<f32> {
        match self {
            Annotation::Measurement { start, end } => Some(start.distance_to(*end)),
            _ => None,
        }
    }

    /// Label text and its anchor, for measurements only.
    pub fn measurement_label(&self) -> Option<(ImagePoint, String)> {
        match self {
            Annotation::Measurement { start, end } => Some((
                start.midpoint(*end),
                format!("{:.2}px", start.distance_to(*end)),
            )),
            _ => None,
        }
    }

    /// Rasterize into `img`. Text is skipped when no font is available.
    pub fn stamp(&self, img: &mut RgbImage, styles: &ToolStyles, font: Option<&LabelFont>) {
        match self {
            Annotation::Rectangle { corner_a, corner_b } => raster::draw_rect_outline(
                img,
                (corner_a.x, corner_a.y),
                (corner_b.x, corner_b.y),
                styles.rectangle.width,
                styles.rectangle.color.to_pixel(),
            ),
            Annotation::Line { start, end } => raster::draw_line(
                img,
                (start.x, start.y),
                (end.x, end.y),
                styles.line.width,
                styles.line.color.to_pixel(),
            ),
            Annotation::Circle { center, radius } => raster::draw_circle_outline(
                img,
                (center.x, center.y),
                *radius,
                styles.circle.width,
                styles.circle.color.to_pixel(),
            ),
            Annotation::Text { position, content } => match font {
                Some(font) => raster::draw_text(
                    img,
                    font,
                    (position.x, position.y),
                    content,
                    styles.text.size,
                    styles.text.color.to_pixel(),
                ),
                None => log::warn!("No label font available, skipping text {content:?}"),
            },
            Annotation::Measurement { start, end } => {
                raster::draw_line(
                    img,
                    (start.x, start.y),
                    (end.x, end.y),
                    styles.measure_line.width,
                    styles.measure_line.color.to_pixel(),
                );
                if let Some((anchor, label)) = self.measurement_label() {
                    match font {
                        Some(font) => raster::draw_text(
                            img,
                            font,
                            (anchor.x, anchor.y),
                            &label,
                            styles.measure_label.size,
                            styles.measure_label.color.to_pixel(),
                        ),
                        None => log::warn!("No label font available, skipping label {label}"),
                    }
                }
            }
        }
    }
}
