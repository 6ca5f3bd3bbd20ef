//! Rasterize a [`Scene`] to a PNG image with tiny-skia.
//!
//! Labels are drawn as seven-segment strokes so the renderer needs no font.

use tiny_skia as sk;

use super::geometry::{Point, Rect};
use super::scene::Scene;
use crate::error::CoreError;

const BACKGROUND: sk::Color = sk::Color::WHITE;
const AXIS_RGB: (u8, u8, u8) = (128, 128, 128);
const FILL_RGB: (u8, u8, u8) = (165, 42, 42);
const OUTLINE_RGB: (u8, u8, u8) = (0, 0, 0);
const LABEL_RGB: (u8, u8, u8) = (255, 255, 255);

const AXIS_WIDTH: f32 = 2.0;
const OUTLINE_WIDTH: f32 = 1.0;

/// Label glyph box and stroke, in pixels.
const DIGIT_WIDTH: f32 = 6.0;
const DIGIT_HEIGHT: f32 = 10.0;
const DIGIT_GAP: f32 = 3.0;
const DIGIT_STROKE: f32 = 2.0;

/// Segment masks for 0-9; bit 0 is the top segment, then clockwise, bit 6 is
/// the middle bar.
const SEGMENTS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

fn paint(rgb: (u8, u8, u8)) -> sk::Paint<'static> {
    let mut paint = sk::Paint::default();
    paint.set_color_rgba8(rgb.0, rgb.1, rgb.2, 255);
    paint.anti_alias = false;
    paint
}

fn stroke(width: f32) -> sk::Stroke {
    sk::Stroke {
        width,
        ..sk::Stroke::default()
    }
}

fn to_skia(rect: &Rect) -> Option<sk::Rect> {
    sk::Rect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
}

/// Draw the scene into a new pixmap.
pub fn rasterize(scene: &Scene) -> Result<sk::Pixmap, CoreError> {
    let width = scene.width.ceil().max(1.0) as u32;
    let height = scene.height.ceil().max(1.0) as u32;
    let mut pixmap = sk::Pixmap::new(width, height).ok_or_else(|| {
        CoreError::Internal(format!("cannot allocate a {width}x{height} surface"))
    })?;
    pixmap.fill(BACKGROUND);

    let axis_x = scene.axis_x as f32;
    let mut axis = sk::PathBuilder::new();
    axis.move_to(axis_x, 0.0);
    axis.line_to(axis_x, height as f32);
    if let Some(path) = axis.finish() {
        pixmap.stroke_path(&path, &paint(AXIS_RGB), &stroke(AXIS_WIDTH), sk::Transform::identity(), None);
    }

    let fill = paint(FILL_RGB);
    let outline = paint(OUTLINE_RGB);
    let label = paint(LABEL_RGB);
    for marker in &scene.markers {
        // Zero-area or non-finite rectangles have nothing to draw.
        let Some(rect) = to_skia(&marker.rect) else {
            continue;
        };
        pixmap.fill_rect(rect, &fill, sk::Transform::identity(), None);
        let border = sk::PathBuilder::from_rect(rect);
        pixmap.stroke_path(&border, &outline, &stroke(OUTLINE_WIDTH), sk::Transform::identity(), None);
        draw_label(&mut pixmap, &marker.label, marker.rect.center(), &label);
    }

    Ok(pixmap)
}

/// Render the scene and encode it as PNG bytes.
pub fn render_png(scene: &Scene) -> Result<Vec<u8>, CoreError> {
    rasterize(scene)?
        .encode_png()
        .map_err(|e| CoreError::Internal(format!("failed to encode board image: {e}")))
}

fn draw_label(pixmap: &mut sk::Pixmap, text: &str, center: Point, paint: &sk::Paint<'_>) {
    let digits: Vec<u8> = text
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    if digits.is_empty() {
        return;
    }
    let total = digits.len() as f32 * DIGIT_WIDTH + (digits.len() - 1) as f32 * DIGIT_GAP;
    let mut left = center.x as f32 - total / 2.0;
    let top = center.y as f32 - DIGIT_HEIGHT / 2.0;

    let mut pb = sk::PathBuilder::new();
    for digit in digits {
        push_digit(&mut pb, digit, left, top);
        left += DIGIT_WIDTH + DIGIT_GAP;
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, &stroke(DIGIT_STROKE), sk::Transform::identity(), None);
    }
}

fn push_digit(pb: &mut sk::PathBuilder, digit: u8, left: f32, top: f32) {
    let right = left + DIGIT_WIDTH;
    let mid = top + DIGIT_HEIGHT / 2.0;
    let bottom = top + DIGIT_HEIGHT;
    let segments = [
        ((left, top), (right, top)),
        ((right, top), (right, mid)),
        ((right, mid), (right, bottom)),
        ((left, bottom), (right, bottom)),
        ((left, mid), (left, bottom)),
        ((left, top), (left, mid)),
        ((left, mid), (right, mid)),
    ];
    let mask = SEGMENTS[usize::from(digit % 10)];
    for (bit, (from, to)) in segments.into_iter().enumerate() {
        if mask & (1 << bit) != 0 {
            pb.move_to(from.0, from.1);
            pb.line_to(to.0, to.1);
        }
    }
}
