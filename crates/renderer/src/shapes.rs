//! The shape-drawing interface weather effects render through.

use glam::Vec2;

/// Straight (non-premultiplied) colour, each channel in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Build an [`Rgba`] from 8-bit channels and a float alpha.
pub fn rgba8(r: u8, g: u8, b: u8, alpha: f32) -> Rgba {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    ]
}

/// Scale a colour's alpha, keeping it in range.
pub fn with_alpha(color: Rgba, alpha_mult: f32) -> Rgba {
    [color[0], color[1], color[2], (color[3] * alpha_mult).clamp(0.0, 1.0)]
}

/// A sink for screen-space primitives.
///
/// All coordinates are screen pixels.
pub trait ShapePainter {
    /// Whether this painter can draw right now. A GPU batch goes unavailable
    /// if its device is lost; callers then fall back to another painter.
    fn is_available(&self) -> bool {
        true
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Filled ellipse with semi-axes `radii`, rotated by `rotation` radians.
    fn draw_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_normalizes_channels() {
        let c = rgba8(255, 0, 51, 0.5);
        assert_eq!(c, [1.0, 0.0, 0.2, 0.5]);
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(with_alpha([1.0, 1.0, 1.0, 0.8], 2.0)[3], 1.0);
        assert_eq!(with_alpha([1.0, 1.0, 1.0, 0.8], -1.0)[3], 0.0);
    }
}
