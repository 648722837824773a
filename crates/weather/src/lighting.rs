//! Scene lighting imposed by each precipitation tier.

use crate::kinds::{Intensity, PrecipitationKind};

/// Colour grade the renderer applies to the whole scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParams {
    pub brightness: f32,
    pub saturation: f32,
    /// Per-channel multiplier tinting the scene towards grey-blue.
    pub darkness_color: [f32; 3],
}

impl Default for LightingParams {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl LightingParams {
    /// Clear-weather lighting: leaves the scene untouched.
    pub const NEUTRAL: LightingParams = LightingParams {
        brightness: 1.0,
        saturation: 1.0,
        darkness_color: [1.0, 1.0, 1.0],
    };

    /// Straight per-field interpolation towards `target`.
    pub fn lerp(&self, target: &LightingParams, t: f32) -> LightingParams {
        LightingParams {
            brightness: lerp(self.brightness, target.brightness, t),
            saturation: lerp(self.saturation, target.saturation, t),
            darkness_color: [
                lerp(self.darkness_color[0], target.darkness_color[0], t),
                lerp(self.darkness_color[1], target.darkness_color[1], t),
                lerp(self.darkness_color[2], target.darkness_color[2], t),
            ],
        }
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Lighting for a precipitation state. Rain and snow of the same tier light
/// the scene identically; clear and dynamic weather are neutral.
pub fn lighting_for(precipitation: PrecipitationKind) -> LightingParams {
    match precipitation.intensity() {
        None => LightingParams::NEUTRAL,
        Some(Intensity::Light) => LightingParams {
            brightness: 0.85,
            saturation: 0.80,
            darkness_color: [0.93, 0.93, 0.94],
        },
        Some(Intensity::Medium) => LightingParams {
            brightness: 0.70,
            saturation: 0.65,
            darkness_color: [0.86, 0.86, 0.88],
        },
        Some(Intensity::Heavy) => LightingParams {
            brightness: 0.50,
            saturation: 0.50,
            darkness_color: [0.76, 0.76, 0.80],
        },
    }
}

/// How strongly shadows are drawn under a precipitation state.
pub fn shadow_multiplier_for(precipitation: PrecipitationKind) -> f32 {
    match precipitation.intensity() {
        None => 1.0,
        Some(Intensity::Light) => 0.75,
        Some(Intensity::Medium) => 0.5,
        Some(Intensity::Heavy) => 0.25,
    }
}
