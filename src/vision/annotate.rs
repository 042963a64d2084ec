// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounding-box overlay rendering
//!
//! Boxes arrive in center form and are drawn as outlines on a copy of the
//! source image, one palette color per class index, with a
//! `"{class} {confidence:.2}"` label sitting on the top-left corner.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::debug;

use crate::detection::DetectionBox;

use super::image_utils::ImageError;

/// Outline colors, indexed by `class_id mod PALETTE.len()`:
/// blue, orange, green, red, purple, brown, pink, gray, olive, cyan
pub const PALETTE: [Rgb<u8>; 10] = [
    Rgb([0, 0, 255]),
    Rgb([255, 165, 0]),
    Rgb([0, 128, 0]),
    Rgb([255, 0, 0]),
    Rgb([128, 0, 128]),
    Rgb([165, 42, 42]),
    Rgb([255, 192, 203]),
    Rgb([128, 128, 128]),
    Rgb([128, 128, 0]),
    Rgb([0, 255, 255]),
];

pub const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const DEFAULT_LINE_WIDTH: u32 = 3;
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Palette slot for a class index; never out of range, negative ids included
pub fn palette_index(class_id: i64) -> usize {
    class_id.rem_euclid(PALETTE.len() as i64) as usize
}

pub fn palette_color(class_id: i64) -> Rgb<u8> {
    PALETTE[palette_index(class_id)]
}

/// Corner-form rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCorners {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoxCorners {
    /// `(x - w/2, y - h/2)` to `(x + w/2, y + h/2)`
    pub fn from_center(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x0: x - width / 2.0,
            y0: y - height / 2.0,
            x1: x + width / 2.0,
            y1: y + height / 2.0,
        }
    }

    pub fn from_box(detection: &DetectionBox) -> Self {
        Self::from_center(detection.x, detection.y, detection.width, detection.height)
    }

    /// Back to `(x, y, width, height)`
    pub fn to_center(&self) -> (f64, f64, f64, f64) {
        (
            (self.x0 + self.x1) / 2.0,
            (self.y0 + self.y1) / 2.0,
            self.x1 - self.x0,
            self.y1 - self.y0,
        )
    }
}

/// Label text drawn next to a box
pub fn box_label(detection: &DetectionBox) -> String {
    format!("{} {:.2}", detection.class_name, detection.confidence)
}

/// Annotated copy of an image
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub image: RgbImage,
    /// Labels in drawing order
    pub labels: Vec<String>,
}

/// Draws detection boxes onto copies of images
pub struct Annotator {
    font: Option<FontVec>,
    font_size: f32,
    line_width: u32,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    /// Annotator without a font: outlines only, labels returned as text
    pub fn new() -> Self {
        Self {
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    /// Load a TrueType/OpenType font for label glyphs
    pub fn with_font_file(self, path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ImageError::FontLoad(format!("{}: {}", path.display(), e)))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| ImageError::FontLoad(format!("{}: {}", path.display(), e)))?;
        Ok(self.with_font(font))
    }

    pub fn with_line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width.max(1);
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw every box onto a copy of `image`, in the given order
    pub fn annotate(&self, image: &RgbImage, boxes: &[DetectionBox]) -> AnnotatedImage {
        let mut canvas = image.clone();
        let mut labels = Vec::with_capacity(boxes.len());

        for detection in boxes {
            let corners = BoxCorners::from_box(detection);
            let color = palette_color(detection.class_id);
            self.draw_outline(&mut canvas, &corners, color);

            let label = box_label(detection);
            self.draw_label(&mut canvas, &corners, &label);
            labels.push(label);
        }

        debug!(
            "Annotated {}x{} image with {} boxes",
            canvas.width(),
            canvas.height(),
            labels.len()
        );
        AnnotatedImage {
            image: canvas,
            labels,
        }
    }

    // Outline grows inward from the corner rectangle. Corners are clamped to
    // one outline width past each image edge before any integer math, so the
    // visible part is unchanged and every line stays image-sized.
    fn draw_outline(&self, canvas: &mut RgbImage, corners: &BoxCorners, color: Rgb<u8>) {
        let Some([x0, y0, x1, y1]) = self.clamped_corners(canvas, corners) else {
            return;
        };

        for t in 0..self.line_width as i64 {
            let width = x1 - x0 - 2 * t + 1;
            let height = y1 - y0 - 2 * t + 1;
            if width <= 0 || height <= 0 {
                break;
            }
            let (Ok(left), Ok(top), Ok(w), Ok(h)) = (
                i32::try_from(x0 + t),
                i32::try_from(y0 + t),
                u32::try_from(width),
                u32::try_from(height),
            ) else {
                break;
            };
            draw_hollow_rect_mut(canvas, Rect::at(left, top).of_size(w, h), color);
        }
    }

    fn clamped_corners(&self, canvas: &RgbImage, corners: &BoxCorners) -> Option<[i64; 4]> {
        let values = [corners.x0, corners.y0, corners.x1, corners.y1];
        if values.iter().any(|v| v.is_nan()) {
            return None;
        }
        let margin = self.line_width as f64;
        let clamp_x = |v: f64| v.round().clamp(-margin, canvas.width() as f64 + margin) as i64;
        let clamp_y = |v: f64| v.round().clamp(-margin, canvas.height() as f64 + margin) as i64;
        Some([
            clamp_x(corners.x0),
            clamp_y(corners.y0),
            clamp_x(corners.x1),
            clamp_y(corners.y1),
        ])
    }

    // Left-aligned, bottom on the box's top edge; skipped when fully off-image
    fn draw_label(&self, canvas: &mut RgbImage, corners: &BoxCorners, label: &str) {
        let Some(font) = &self.font else {
            return;
        };
        if corners.x0.is_nan() || corners.y0.is_nan() {
            return;
        }
        let scale = PxScale::from(self.font_size);
        let (text_width, text_height) = text_size(scale, font, label);

        let x = corners.x0.round();
        let y = corners.y0.round() - text_height as f64;
        let off_image = x >= canvas.width() as f64
            || y >= canvas.height() as f64
            || x + (text_width as f64) < 0.0
            || y + (text_height as f64) < 0.0;
        if off_image {
            return;
        }
        // In range after the check above
        let x = x as i32;
        let y = (corners.y0.round() as i32).saturating_sub(text_height as i32);
        draw_text_mut(canvas, LABEL_COLOR, x, y, scale, font, label);
    }
}
