//! Triangle batch for drawing many small shapes in one GPU draw call.

use crate::shapes::{Rgba, ShapePainter};
use crate::vertex::ShapeVertex;
use glam::Vec2;

/// Segments used for a circle or ellipse of radius >= `FULL_DETAIL_RADIUS` px.
const MAX_SEGMENTS: u32 = 24;
const MIN_SEGMENTS: u32 = 6;
const FULL_DETAIL_RADIUS: f32 = 12.0;

/// Accumulates tessellated shapes for a frame.
///
/// The host uploads [`ShapeBatch::as_bytes`] as a triangle list and calls
/// [`ShapeBatch::clear`] before the next frame.
#[derive(Debug)]
pub struct ShapeBatch {
    vertices: Vec<ShapeVertex>,
    available: bool,
}

impl Default for ShapeBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            available: true,
        }
    }

    /// Batch with room for `shapes` circles before reallocating.
    pub fn with_capacity(shapes: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(shapes * MAX_SEGMENTS as usize * 3),
            available: true,
        }
    }

    /// Mark the GPU path usable or lost. Takes effect on the next draw request.
    pub fn set_available(&mut self, available: bool) {
        if self.available && !available {
            log::warn!("Shape batch lost its device, drawing will fall back");
        }
        self.available = available;
    }

    pub fn vertices(&self) -> &[ShapeVertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Raw vertex bytes for buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Drop this frame's shapes, keeping the allocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Rgba) {
        self.vertices.push(ShapeVertex::new(a.to_array(), color));
        self.vertices.push(ShapeVertex::new(b.to_array(), color));
        self.vertices.push(ShapeVertex::new(c.to_array(), color));
    }

    fn push_fan(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba) {
        let segments = segment_count(radii.max_element());
        let (sin_r, cos_r) = rotation.sin_cos();
        let point = |i: u32| {
            let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
            let local = Vec2::new(theta.cos() * radii.x, theta.sin() * radii.y);
            center + Vec2::new(local.x * cos_r - local.y * sin_r, local.x * sin_r + local.y * cos_r)
        };
        let mut prev = point(0);
        for i in 1..=segments {
            let next = point(i);
            self.push_triangle(center, prev, next, color);
            prev = next;
        }
    }
}

fn segment_count(radius: f32) -> u32 {
    let t = (radius / FULL_DETAIL_RADIUS).clamp(0.0, 1.0);
    MIN_SEGMENTS + ((MAX_SEGMENTS - MIN_SEGMENTS) as f32 * t) as u32
}

fn visible(color: Rgba) -> bool {
    color[3] > 0.0
}

impl ShapePainter for ShapeBatch {
    fn is_available(&self) -> bool {
        self.available
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let dir = to - from;
        if !visible(color) || dir.length_squared() <= f32::EPSILON {
            return;
        }
        let normal = dir.normalize().perp() * (width.max(0.5) * 0.5);
        let (a, b, c, d) = (from + normal, to + normal, to - normal, from - normal);
        self.push_triangle(a, b, c, color);
        self.push_triangle(a, c, d, color);
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !visible(color) || radius <= 0.0 {
            return;
        }
        self.push_fan(center, Vec2::splat(radius), 0.0, color);
    }

    fn draw_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba) {
        if !visible(color) || radii.min_element() <= 0.0 {
            return;
        }
        self.push_fan(center, radii, rotation, color);
    }
}
