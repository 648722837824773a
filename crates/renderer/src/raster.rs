//! CPU raster fallback: draws shapes straight into an RGBA image.

use crate::shapes::{Rgba, ShapePainter};
use anyhow::Result;
use glam::Vec2;
use image::{Rgba as Pixel, RgbaImage};
use std::path::Path;

/// Software canvas. The backing image is only allocated on first use.
#[derive(Debug)]
pub struct RasterCanvas {
    width: u32,
    height: u32,
    background: [u8; 4],
    image: Option<RgbaImage>,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: [0, 0, 0, 255],
            image: None,
        }
    }

    /// Colour the canvas is realized and cleared with.
    pub fn with_background(mut self, background: [u8; 4]) -> Self {
        self.background = background;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the backing image has been allocated yet.
    pub fn is_realized(&self) -> bool {
        self.image.is_some()
    }

    /// The backing image, if anything has been drawn.
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    fn realize(&mut self) -> &mut RgbaImage {
        let (w, h, bg) = (self.width, self.height, self.background);
        self.image
            .get_or_insert_with(|| RgbaImage::from_pixel(w, h, Pixel(bg)))
    }

    /// Fill with the background colour.
    pub fn clear(&mut self) {
        let bg = Pixel(self.background);
        for px in self.realize().pixels_mut() {
            *px = bg;
        }
    }

    /// Pixel at `(x, y)`, or `None` when out of range or not realized.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let image = self.image.as_ref()?;
        (x < image.width() && y < image.height()).then(|| image.get_pixel(x, y).0)
    }

    /// Apply a scene-wide colour grade: desaturate towards luminance, then
    /// multiply by `brightness` and a per-channel tint.
    pub fn grade(&mut self, brightness: f32, saturation: f32, tint: [f32; 3]) {
        for px in self.realize().pixels_mut() {
            let [r, g, b, a] = px.0;
            let rgb = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
            let luma = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
            let mut out = [0u8; 4];
            for i in 0..3 {
                let c = (luma + (rgb[i] - luma) * saturation) * brightness * tint[i];
                out[i] = to_u8(c);
            }
            out[3] = a;
            px.0 = out;
        }
    }

    /// Write the canvas to a PNG file.
    pub fn save_png(&mut self, path: &Path) -> Result<()> {
        self.realize().save(path)?;
        Ok(())
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        let image = self.realize();
        if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
            return;
        }
        let px = image.get_pixel_mut(x as u32, y as u32);
        let alpha = color[3].clamp(0.0, 1.0);
        let [r, g, b, a] = px.0;
        let dst = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0];
        px.0 = [
            to_u8(color[0] * alpha + dst[0] * (1.0 - alpha)),
            to_u8(color[1] * alpha + dst[1] * (1.0 - alpha)),
            to_u8(color[2] * alpha + dst[2] * (1.0 - alpha)),
            to_u8(alpha + dst[3] * (1.0 - alpha)),
        ];
    }

    /// Pixel range covering `[min, max]`, clipped to the canvas.
    fn pixel_span(&self, min: Vec2, max: Vec2) -> Option<(i64, i64, i64, i64)> {
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64).min(self.height as i64 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    fn fill_where(&mut self, min: Vec2, max: Vec2, color: Rgba, inside: impl Fn(Vec2) -> bool) {
        if color[3] <= 0.0 || !min.is_finite() || !max.is_finite() {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.pixel_span(min, max) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                if inside(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl ShapePainter for RasterCanvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let half = (width * 0.5).max(0.5);
        let seg = to - from;
        let len_sq = seg.length_squared();
        self.fill_where(from.min(to) - half, from.max(to) + half, color, |p| {
            let t = if len_sq > 0.0 {
                ((p - from).dot(seg) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            p.distance_squared(from + seg * t) <= half * half
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let r = radius.max(0.5);
        self.fill_where(center - r, center + r, color, |p| p.distance_squared(center) <= r * r);
    }

    fn draw_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba) {
        let radii = radii.max(Vec2::splat(0.5));
        let reach = radii.max_element();
        let (sin_r, cos_r) = rotation.sin_cos();
        self.fill_where(center - reach, center + reach, color, |p| {
            let d = p - center;
            let local = Vec2::new(d.x * cos_r + d.y * sin_r, -d.x * sin_r + d.y * cos_r);
            (local / radii).length_squared() <= 1.0
        });
    }
}
