//! Drawing the particle pools through a [`ShapePainter`].
//!
//! Particles live in world space; everything here converts through the
//! camera and scales sizes by zoom. Alpha is each kind's base alpha times
//! the transition's particle intensity.

use crate::particles::{LeafParticle, RainParticle, SnowParticle};
use engine_core::Camera2D;
use glam::Vec2;
use renderer::{rgba8, with_alpha, Rgba, ShapePainter};

pub const RAIN_ALPHA: f32 = 0.5;
pub const SNOW_ALPHA: f32 = 0.8;
pub const LEAF_ALPHA: f32 = 0.9;
pub const RAIN_WIDTH: f32 = 1.0;

fn rain_color() -> Rgba {
    rgba8(174, 194, 224, RAIN_ALPHA)
}

fn snow_color() -> Rgba {
    rgba8(255, 255, 255, SNOW_ALPHA)
}

/// Direction a drop streaks in: straight down, slanted by the wind drift.
fn streak_direction(speed: f32, wind: f32) -> Vec2 {
    Vec2::new(wind * 15.0, speed).try_normalize().unwrap_or(Vec2::Y)
}

pub fn draw_rain(
    painter: &mut dyn ShapePainter,
    camera: &Camera2D,
    drops: &[RainParticle],
    wind: f32,
    intensity: f32,
) {
    if intensity <= 0.0 || drops.is_empty() {
        return;
    }
    let color = with_alpha(rain_color(), intensity);
    let zoom = camera.effective_zoom();
    for drop in drops {
        let tail = drop.pos + streak_direction(drop.speed, wind) * drop.length;
        painter.draw_line(
            camera.world_to_screen(drop.pos),
            camera.world_to_screen(tail),
            RAIN_WIDTH * zoom,
            color,
        );
    }
}

pub fn draw_snow(painter: &mut dyn ShapePainter, camera: &Camera2D, flakes: &[SnowParticle], intensity: f32) {
    if intensity <= 0.0 || flakes.is_empty() {
        return;
    }
    let color = with_alpha(snow_color(), intensity);
    let zoom = camera.effective_zoom();
    for flake in flakes {
        painter.draw_circle(camera.world_to_screen(flake.pos), flake.size * zoom, color);
    }
}

pub fn draw_leaves(painter: &mut dyn ShapePainter, camera: &Camera2D, leaves: &[LeafParticle], intensity: f32) {
    if intensity <= 0.0 {
        return;
    }
    let zoom = camera.effective_zoom();
    for leaf in leaves {
        let [r, g, b] = leaf.color;
        let color = rgba8(r, g, b, LEAF_ALPHA * intensity);
        let radii = Vec2::new(leaf.size, leaf.size * 0.5) * zoom;
        painter.draw_ellipse(camera.world_to_screen(leaf.pos), radii, leaf.rotation, color);
    }
}

/// Painter that remembers every call, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingPainter {
    pub available: bool,
    pub lines: Vec<(Vec2, Vec2, f32, Rgba)>,
    pub circles: Vec<(Vec2, f32, Rgba)>,
    pub ellipses: Vec<(Vec2, Vec2, f32, Rgba)>,
}

#[cfg(test)]
impl RecordingPainter {
    pub fn new() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.lines.len() + self.circles.len() + self.ellipses.len()
    }
}

#[cfg(test)]
impl ShapePainter for RecordingPainter {
    fn is_available(&self) -> bool {
        self.available
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.lines.push((from, to, width, color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circles.push((center, radius, color));
    }

    fn draw_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Rgba) {
        self.ellipses.push((center, radii, rotation, color));
    }
}
