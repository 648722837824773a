//! Wind strength and direction over time.

use crate::kinds::WindKind;
use engine_core::sanitize_delta;

/// Wind strength for a wind kind at `t` accumulated seconds.
///
/// `0.0` is calm and `1.0` a gale. Dynamic wind swings between 0 and 0.6
/// with a period of 4π seconds.
pub fn wind_strength(kind: WindKind, t: f32) -> f32 {
    match kind {
        WindKind::None => 0.0,
        WindKind::Light => 0.3,
        WindKind::Medium => 0.6,
        WindKind::Heavy => 1.0,
        WindKind::Dynamic => 0.3 + 0.3 * (0.5 * t).sin(),
    }
}

/// Wind direction in radians. Hovers around straight down (π/2).
///
/// Only strength drives the particles today; the angle is exposed for effects
/// that want a gust direction.
pub fn wind_angle(t: f32) -> f32 {
    std::f32::consts::FRAC_PI_2 + 0.2 * (0.3 * t).sin()
}

/// Every wind curve repeats after this many seconds (4π for strength,
/// 20π/3 for the angle).
const WIND_PERIOD: f64 = 20.0 * std::f64::consts::PI;

/// Accumulates the clock the wind functions are sampled at.
///
/// The clock is kept in `f64` and folded into one period before sampling, so
/// frame-sized steps still move the wind after days of play.
#[derive(Debug, Clone, Default)]
pub struct WindModel {
    elapsed: f64,
}

impl WindModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += f64::from(sanitize_delta(dt));
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    fn phase(&self) -> f32 {
        (self.elapsed % WIND_PERIOD) as f32
    }

    pub fn strength(&self, kind: WindKind) -> f32 {
        wind_strength(kind, self.phase())
    }

    pub fn angle(&self) -> f32 {
        wind_angle(self.phase())
    }
}
