//! 2D camera and the padded world-space viewport derived from it.

use glam::Vec2;

/// Fraction of the visible size added as padding on every side of the viewport.
pub const VIEWPORT_PADDING: f32 = 0.5;

/// Smallest zoom accepted when deriving world-space sizes.
const MIN_ZOOM: f32 = 0.01;

/// Side-scrolling camera: top-left world position plus zoom.
///
/// The weather system only reads it; whoever owns the player moves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// World position of the top-left corner of the screen.
    pub position: Vec2,
    /// Screen pixels per world unit.
    pub zoom: f32,
    /// Screen size in pixels.
    pub screen_size: Vec2,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            screen_size: Vec2::new(1280.0, 720.0),
        }
    }
}

impl Camera2D {
    pub fn new(position: Vec2, zoom: f32, screen_size: Vec2) -> Self {
        Self {
            position,
            zoom,
            screen_size,
        }
    }

    /// Zoom clamped to a usable positive value.
    pub fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > MIN_ZOOM {
            self.zoom
        } else {
            MIN_ZOOM
        }
    }

    /// Size of the visible screen in world units.
    pub fn visible_size(&self) -> Vec2 {
        self.screen_size.max(Vec2::ZERO) / self.effective_zoom()
    }

    /// World position to screen pixels.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.effective_zoom()
    }

    /// Padded viewport that bounds where weather particles live.
    pub fn viewport(&self) -> Viewport {
        let visible = self.visible_size();
        let pad = visible * VIEWPORT_PADDING;
        Viewport {
            left: self.position.x - pad.x,
            right: self.position.x + visible.x + pad.x,
            top: self.position.y - pad.y,
            bottom: self.position.y + visible.y + pad.y,
        }
    }

    /// Move the camera by a world-space offset.
    pub fn pan(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

/// Axis-aligned world-space rectangle. `top < bottom` (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Viewport {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_pads_half_the_screen_on_each_side() {
        let camera = Camera2D::new(Vec2::new(100.0, 200.0), 1.0, Vec2::new(800.0, 600.0));
        let vp = camera.viewport();
        assert_eq!(vp.left, -300.0);
        assert_eq!(vp.right, 1300.0);
        assert_eq!(vp.top, -100.0);
        assert_eq!(vp.bottom, 1100.0);
        assert_eq!(vp.width(), 1600.0);
    }

    #[test]
    fn zoom_shrinks_world_viewport() {
        let camera = Camera2D::new(Vec2::ZERO, 2.0, Vec2::new(800.0, 600.0));
        let vp = camera.viewport();
        assert_eq!(vp.width(), 800.0);
        assert_eq!(vp.height(), 600.0);
    }

    #[test]
    fn zero_zoom_is_clamped() {
        let camera = Camera2D::new(Vec2::ZERO, 0.0, Vec2::new(10.0, 10.0));
        assert!(camera.viewport().width().is_finite());
    }

    #[test]
    fn world_to_screen_applies_offset_and_zoom() {
        let camera = Camera2D::new(Vec2::new(10.0, 20.0), 2.0, Vec2::new(100.0, 100.0));
        assert_eq!(camera.world_to_screen(Vec2::new(15.0, 30.0)), Vec2::new(10.0, 20.0));
    }
}
