//! Viewport-relative particle pools for rain, snow, and falling leaves.
//!
//! Each pool is a fixed-capacity buffer. Particles are spawned uniformly over
//! the padded viewport, advanced in 60 Hz reference ticks, and relocated to
//! the opposite edge when they leave the viewport. Nothing is ever dropped,
//! so the population stays constant while the camera moves.

use crate::kinds::{Intensity, ParticleKind, PrecipitationKind};
use engine_core::Viewport;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Horizontal slack beyond the viewport before a particle wraps around.
pub const WRAP_MARGIN: f32 = 50.0;

pub const RAIN_CAPACITY: usize = 1000;
pub const SNOW_CAPACITY: usize = 300;
pub const LEAF_CAPACITY: usize = 500;
pub const DEFAULT_LEAF_COUNT: usize = 20;

/// Raindrops for a precipitation state (zero unless it is rain).
pub fn rain_count(precipitation: PrecipitationKind) -> usize {
    match precipitation {
        PrecipitationKind::Rain(Intensity::Light) => 200,
        PrecipitationKind::Rain(Intensity::Medium) => 600,
        PrecipitationKind::Rain(Intensity::Heavy) => RAIN_CAPACITY,
        _ => 0,
    }
}

/// Snowflakes for a precipitation state (zero unless it is snow).
pub fn snow_count(precipitation: PrecipitationKind) -> usize {
    match precipitation {
        PrecipitationKind::Snow(Intensity::Light) => 50,
        PrecipitationKind::Snow(Intensity::Medium) => 150,
        PrecipitationKind::Snow(Intensity::Heavy) => SNOW_CAPACITY,
        _ => 0,
    }
}

/// Uniform sample in `[lo, hi)`, or `lo` for an empty range.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Wrap `x` to the opposite side once it drifts past the margin.
pub fn wrap_horizontal(x: f32, viewport: &Viewport) -> f32 {
    if x < viewport.left - WRAP_MARGIN {
        viewport.right + WRAP_MARGIN
    } else if x > viewport.right + WRAP_MARGIN {
        viewport.left - WRAP_MARGIN
    } else {
        x
    }
}

/// Vertical recycling shared by every falling particle. A particle past the
/// bottom re-enters just above the top at a new column; one left above the
/// top (the camera moved down) is dropped back in at a random height.
fn recycle_vertical<R: Rng + ?Sized>(pos: &mut Vec2, extent: f32, viewport: &Viewport, rng: &mut R) {
    if pos.y > viewport.bottom {
        pos.y = viewport.top - extent;
        pos.x = uniform(rng, viewport.left, viewport.right);
    } else if pos.y < viewport.top - extent {
        pos.y = uniform(rng, viewport.top, viewport.bottom);
    }
    pos.x = wrap_horizontal(pos.x, viewport);
}

/// A particle kind a [`ParticlePool`] can hold.
pub trait Particle {
    /// Spawn-time parameters shared by the whole pool (e.g. a leaf palette).
    type Style: Copy + PartialEq + std::fmt::Debug;

    fn spawn<R: Rng + ?Sized>(style: Self::Style, viewport: &Viewport, rng: &mut R) -> Self;

    /// Move by `ticks` 60 Hz reference ticks under `wind` strength.
    fn advance(&mut self, wind: f32, ticks: f32);

    /// Bring the particle back inside `viewport` if it left.
    fn recycle<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R);

    fn position(&self) -> Vec2;
}

// ── Rain ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainParticle {
    pub pos: Vec2,
    /// Fall speed in units per tick.
    pub speed: f32,
    pub length: f32,
}

impl Particle for RainParticle {
    type Style = ();

    fn spawn<R: Rng + ?Sized>(_: (), viewport: &Viewport, rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(
                uniform(rng, viewport.left, viewport.right),
                uniform(rng, viewport.top, viewport.bottom),
            ),
            speed: uniform(rng, 18.0, 26.0),
            length: uniform(rng, 10.0, 20.0),
        }
    }

    fn advance(&mut self, wind: f32, ticks: f32) {
        self.pos.y += self.speed * ticks;
        self.pos.x += wind * 15.0 * ticks;
    }

    fn recycle<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) {
        recycle_vertical(&mut self.pos, self.length, viewport, rng);
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}

// ── Snow ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowParticle {
    pub pos: Vec2,
    pub speed: f32,
    /// Radius in world units.
    pub size: f32,
    pub sway_phase: f32,
    pub sway_speed: f32,
}

impl Particle for SnowParticle {
    type Style = ();

    fn spawn<R: Rng + ?Sized>(_: (), viewport: &Viewport, rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(
                uniform(rng, viewport.left, viewport.right),
                uniform(rng, viewport.top, viewport.bottom),
            ),
            speed: uniform(rng, 3.0, 6.0),
            size: uniform(rng, 2.0, 5.0),
            sway_phase: uniform(rng, 0.0, TAU),
            sway_speed: uniform(rng, 0.01, 0.05),
        }
    }

    fn advance(&mut self, wind: f32, ticks: f32) {
        self.pos.y += self.speed * ticks;
        self.pos.x += (wind * 8.0 + self.sway_phase.sin() * 2.0) * ticks;
        self.sway_phase += self.sway_speed * ticks;
    }

    fn recycle<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) {
        recycle_vertical(&mut self.pos, self.size, viewport, rng);
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}

// ── Leaves ──────────────────────────────────────────────────────────────────

const LEAF_GREEN: [[u8; 3]; 5] = [
    [76, 140, 60],
    [98, 160, 70],
    [60, 120, 50],
    [120, 170, 80],
    [88, 130, 46],
];
const LEAF_ORANGE: [[u8; 3]; 5] = [
    [230, 126, 34],
    [243, 156, 18],
    [211, 84, 0],
    [235, 140, 52],
    [220, 110, 30],
];
const LEAF_RED: [[u8; 3]; 5] = [
    [192, 57, 43],
    [170, 40, 35],
    [205, 70, 50],
    [150, 30, 30],
    [215, 90, 60],
];
const LEAF_BROWN: [[u8; 3]; 5] = [
    [139, 90, 43],
    [120, 80, 40],
    [160, 110, 60],
    [101, 67, 33],
    [150, 100, 50],
];
const SAKURA: [[u8; 3]; 5] = [
    [255, 183, 197],
    [255, 192, 203],
    [250, 170, 190],
    [255, 205, 215],
    [245, 160, 180],
];

/// Colours a particle kind draws from. Empty for `None`.
pub fn palette(kind: ParticleKind) -> &'static [[u8; 3]] {
    match kind {
        ParticleKind::None => &[],
        ParticleKind::LeafGreen => &LEAF_GREEN,
        ParticleKind::LeafOrange => &LEAF_ORANGE,
        ParticleKind::LeafRed => &LEAF_RED,
        ParticleKind::LeafBrown => &LEAF_BROWN,
        ParticleKind::Sakura => &SAKURA,
    }
}

const MAX_ROTATION_SPEED: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafParticle {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub sway_phase: f32,
    pub sway_speed: f32,
    /// Picked once at spawn from the kind's palette.
    pub color: [u8; 3],
}

impl Particle for LeafParticle {
    type Style = ParticleKind;

    fn spawn<R: Rng + ?Sized>(kind: ParticleKind, viewport: &Viewport, rng: &mut R) -> Self {
        let colors = palette(kind);
        let color = if colors.is_empty() {
            [255, 255, 255]
        } else {
            colors[rng.gen_range(0..colors.len())]
        };
        Self {
            pos: Vec2::new(
                uniform(rng, viewport.left, viewport.right),
                uniform(rng, viewport.top, viewport.bottom),
            ),
            speed: uniform(rng, 1.0, 2.5),
            size: uniform(rng, 4.0, 8.0),
            rotation: uniform(rng, 0.0, TAU),
            rotation_speed: uniform(rng, -MAX_ROTATION_SPEED, MAX_ROTATION_SPEED),
            sway_phase: uniform(rng, 0.0, TAU),
            sway_speed: uniform(rng, 0.02, 0.05),
            color,
        }
    }

    fn advance(&mut self, wind: f32, ticks: f32) {
        // Wind lifts leaves a little as well as pushing them sideways.
        self.pos.y += (self.speed - wind * 0.5) * ticks;
        self.pos.x += (wind * 12.0 + self.sway_phase.sin() * 3.0) * ticks;
        self.sway_phase += self.sway_speed * ticks;
        self.rotation_speed =
            (self.rotation_speed + wind * 0.0003 * ticks).clamp(-MAX_ROTATION_SPEED, MAX_ROTATION_SPEED);
        self.rotation = (self.rotation + self.rotation_speed * ticks) % TAU;
    }

    fn recycle<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) {
        recycle_vertical(&mut self.pos, self.size, viewport, rng);
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}

// ── Pool ────────────────────────────────────────────────────────────────────

/// Fixed-capacity particle buffer. Slots are overwritten in place on
/// recycle; the buffer never grows past its capacity.
#[derive(Debug, Clone)]
pub struct ParticlePool<P: Particle> {
    slots: Vec<P>,
    capacity: usize,
    style: P::Style,
}

impl<P: Particle> ParticlePool<P> {
    pub fn new(capacity: usize, style: P::Style) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            style,
        }
    }

    /// Throw away the current particles and spawn `count` fresh ones
    /// (clamped to capacity) across `viewport`.
    pub fn reinitialize<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        style: P::Style,
        viewport: &Viewport,
        rng: &mut R,
    ) {
        let count = count.min(self.capacity);
        self.style = style;
        self.slots.clear();
        self.slots.extend((0..count).map(|_| P::spawn(style, viewport, rng)));
    }

    /// Reinitialize only if the count or style differs from what is live.
    /// Returns whether the pool was rebuilt.
    pub fn ensure<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        style: P::Style,
        viewport: &Viewport,
        rng: &mut R,
    ) -> bool {
        let count = count.min(self.capacity);
        let matches = self.slots.len() == count && (count == 0 || self.style == style);
        if !matches {
            self.reinitialize(count, style, viewport, rng);
        }
        !matches
    }

    /// Advance every particle and recycle those that left `viewport`.
    pub fn update<R: Rng + ?Sized>(&mut self, wind: f32, ticks: f32, viewport: &Viewport, rng: &mut R) {
        for particle in &mut self.slots {
            particle.advance(wind, ticks);
            particle.recycle(viewport, rng);
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn style(&self) -> P::Style {
        self.style
    }

    pub fn particles(&self) -> &[P] {
        &self.slots
    }
}

pub type RainPool = ParticlePool<RainParticle>;
pub type SnowPool = ParticlePool<SnowParticle>;
pub type LeafPool = ParticlePool<LeafParticle>;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn viewport() -> Viewport {
        Viewport {
            left: -400.0,
            right: 1200.0,
            top: -300.0,
            bottom: 900.0,
        }
    }

    fn assert_in_bounds(pos: Vec2, extent: f32, vp: &Viewport) {
        assert!(pos.x >= vp.left - WRAP_MARGIN && pos.x <= vp.right + WRAP_MARGIN, "x {}", pos.x);
        assert!(pos.y >= vp.top - extent && pos.y <= vp.bottom, "y {}", pos.y);
    }

    #[test]
    fn tier_counts() {
        assert_eq!(rain_count(PrecipitationKind::Rain(Intensity::Light)), 200);
        assert_eq!(rain_count(PrecipitationKind::Rain(Intensity::Medium)), 600);
        assert_eq!(rain_count(PrecipitationKind::Rain(Intensity::Heavy)), 1000);
        assert_eq!(snow_count(PrecipitationKind::Snow(Intensity::Light)), 50);
        assert_eq!(snow_count(PrecipitationKind::Snow(Intensity::Medium)), 150);
        assert_eq!(snow_count(PrecipitationKind::Snow(Intensity::Heavy)), 300);
        assert_eq!(rain_count(PrecipitationKind::Snow(Intensity::Heavy)), 0);
        assert_eq!(snow_count(PrecipitationKind::Dynamic), 0);
    }

    #[test]
    fn spawn_fills_viewport() {
        let mut rng = StdRng::seed_from_u64(1);
        let vp = viewport();
        let mut pool = RainPool::new(RAIN_CAPACITY, ());
        pool.reinitialize(600, (), &vp, &mut rng);
        assert_eq!(pool.len(), 600);
        assert!(pool.particles().iter().all(|p| vp.contains(p.position())));
        assert!(pool.particles().iter().all(|p| (18.0..26.0).contains(&p.speed)));
    }

    #[test]
    fn pool_is_capped_at_capacity() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = LeafPool::new(LEAF_CAPACITY, ParticleKind::LeafRed);
        pool.reinitialize(10_000, ParticleKind::LeafRed, &viewport(), &mut rng);
        assert_eq!(pool.len(), LEAF_CAPACITY);
    }

    #[test]
    fn rain_falls_and_drifts_with_wind() {
        let mut rain = RainParticle {
            pos: Vec2::new(0.0, 0.0),
            speed: 20.0,
            length: 15.0,
        };
        rain.advance(1.0, 1.0);
        assert_eq!(rain.pos, Vec2::new(15.0, 20.0));
        rain.advance(0.0, 0.5);
        assert_eq!(rain.pos, Vec2::new(15.0, 30.0));
    }

    #[test]
    fn rain_past_bottom_reenters_above_top() {
        let mut rng = StdRng::seed_from_u64(3);
        let vp = viewport();
        let mut rain = RainParticle {
            pos: Vec2::new(0.0, vp.bottom - 1.0),
            speed: 20.0,
            length: 12.0,
        };
        rain.advance(0.0, 1.0);
        rain.recycle(&vp, &mut rng);
        assert_eq!(rain.pos.y, vp.top - 12.0);
        assert!(rain.pos.x >= vp.left && rain.pos.x < vp.right);
    }

    #[test]
    fn horizontal_wrap_moves_to_opposite_edge() {
        let vp = viewport();
        assert_eq!(wrap_horizontal(vp.left - 51.0, &vp), vp.right + WRAP_MARGIN);
        assert_eq!(wrap_horizontal(vp.right + 51.0, &vp), vp.left - WRAP_MARGIN);
        assert_eq!(wrap_horizontal(vp.left - 50.0, &vp), vp.left - 50.0);
    }

    #[test]
    fn snow_sways_and_advances_phase() {
        let mut flake = SnowParticle {
            pos: Vec2::ZERO,
            speed: 4.0,
            size: 3.0,
            sway_phase: std::f32::consts::FRAC_PI_2,
            sway_speed: 0.05,
        };
        flake.advance(0.5, 1.0);
        assert!((flake.pos.x - 6.0).abs() < 1e-5);
        assert_eq!(flake.pos.y, 4.0);
        assert!((flake.sway_phase - (std::f32::consts::FRAC_PI_2 + 0.05)).abs() < 1e-6);
    }

    #[test]
    fn leaf_rotation_speed_is_clamped_and_updraft_slows_fall() {
        let mut leaf = LeafParticle {
            pos: Vec2::ZERO,
            speed: 2.0,
            size: 6.0,
            rotation: 0.0,
            rotation_speed: 0.0199,
            sway_phase: 0.0,
            sway_speed: 0.0,
            color: [1, 2, 3],
        };
        leaf.advance(1.0, 1.0);
        assert_eq!(leaf.rotation_speed, 0.02);
        assert_eq!(leaf.pos.y, 1.5);
        assert_eq!(leaf.pos.x, 12.0);
        for _ in 0..200 {
            leaf.advance(-1.0, 1.0);
        }
        assert_eq!(leaf.rotation_speed, -0.02);
    }

    #[test]
    fn leaf_colors_come_from_palette() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = LeafPool::new(LEAF_CAPACITY, ParticleKind::Sakura);
        pool.reinitialize(50, ParticleKind::Sakura, &viewport(), &mut rng);
        assert!(pool.particles().iter().all(|leaf| SAKURA.contains(&leaf.color)));
    }

    #[test]
    fn particles_stay_in_bounds_while_camera_moves() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut vp = viewport();
        let mut rain = RainPool::new(RAIN_CAPACITY, ());
        let mut snow = SnowPool::new(SNOW_CAPACITY, ());
        let mut leaves = LeafPool::new(LEAF_CAPACITY, ParticleKind::LeafOrange);
        rain.reinitialize(1000, (), &vp, &mut rng);
        snow.reinitialize(300, (), &vp, &mut rng);
        leaves.reinitialize(20, ParticleKind::LeafOrange, &vp, &mut rng);

        for frame in 0..600 {
            // Pan right and down, with an occasional large jump.
            let shift = if frame % 97 == 0 { Vec2::new(-3000.0, 2500.0) } else { Vec2::new(7.0, 3.0) };
            vp = Viewport {
                left: vp.left + shift.x,
                right: vp.right + shift.x,
                top: vp.top + shift.y,
                bottom: vp.bottom + shift.y,
            };
            let wind = if frame % 2 == 0 { 1.0 } else { -1.0 };
            rain.update(wind, 1.0, &vp, &mut rng);
            snow.update(wind, 1.0, &vp, &mut rng);
            leaves.update(wind, 1.0, &vp, &mut rng);
            for p in rain.particles() {
                assert_in_bounds(p.pos, p.length, &vp);
            }
            for p in snow.particles() {
                assert_in_bounds(p.pos, p.size, &vp);
            }
            for p in leaves.particles() {
                assert_in_bounds(p.pos, p.size, &vp);
            }
        }
        assert_eq!(rain.len(), 1000);
        assert_eq!(snow.len(), 300);
        assert_eq!(leaves.len(), 20);
    }

    #[test]
    fn ensure_skips_matching_pool() {
        let mut rng = StdRng::seed_from_u64(6);
        let vp = viewport();
        let mut pool = SnowPool::new(SNOW_CAPACITY, ());
        assert!(pool.ensure(150, (), &vp, &mut rng));
        let before = pool.particles().to_vec();
        assert!(!pool.ensure(150, (), &vp, &mut rng));
        assert_eq!(pool.particles(), before.as_slice());
        assert!(pool.ensure(50, (), &vp, &mut rng));
        assert_eq!(pool.len(), 50);
    }

    #[test]
    fn ensure_rebuilds_leaves_on_palette_change() {
        let mut rng = StdRng::seed_from_u64(7);
        let vp = viewport();
        let mut pool = LeafPool::new(LEAF_CAPACITY, ParticleKind::None);
        pool.ensure(20, ParticleKind::LeafGreen, &vp, &mut rng);
        assert!(pool.ensure(20, ParticleKind::LeafRed, &vp, &mut rng));
        assert_eq!(pool.style(), ParticleKind::LeafRed);
        assert!(pool.particles().iter().all(|leaf| LEAF_RED.contains(&leaf.color)));
    }
}
