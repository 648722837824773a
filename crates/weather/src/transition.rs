//! Crossfade between two complete weather states.
//!
//! Lighting and shadow strength are interpolated linearly over the transition.
//! The particle set fades out over the first half and the new set fades in
//! over the second. Exactly once, when progress reaches [`SWAP_POINT`], the
//! live identifiers switch to the target. Both fades are at zero there, so
//! the swap cannot be seen.

use crate::config::WeatherConfig;
use crate::kinds::PrecipitationKind;
use crate::lighting::{lerp, lighting_for, shadow_multiplier_for, LightingParams};
use engine_core::{sanitize_delta, TransitionTiming};

/// Progress at which the live particle set changes identity.
pub const SWAP_POINT: f32 = 0.5;

/// Progress this close to 1 counts as finished, so summed frame deltas
/// that equal the duration always land on exactly 1.0.
const FINISH_EPSILON: f32 = 1e-5;

/// Snapshot of an in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    /// `0.0..=1.0`.
    pub progress: f32,
    pub from_lighting: LightingParams,
    pub target_lighting: LightingParams,
    pub from_shadow_multiplier: f32,
    pub target_shadow_multiplier: f32,
    pub from_precipitation: PrecipitationKind,
    pub target_precipitation: PrecipitationKind,
    /// Complete weather the transition ends on.
    pub target: WeatherConfig,
    /// Particle intensity showing when the transition started.
    pub from_intensity: f32,
    /// Whether the midpoint swap has happened.
    pub swapped: bool,
}

/// What a call to [`TransitionController::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStep {
    /// No transition running.
    Idle,
    /// Still fading, nothing for the caller to do.
    Fading,
    /// Crossed the midpoint: switch the live weather to this config.
    Swap(WeatherConfig),
    /// Finished: the live weather is now this config.
    Finished(WeatherConfig),
}

/// Crossfade state machine. Holds the displayed lighting, shadow strength,
/// and particle intensity whether or not a transition is running.
#[derive(Debug, Clone)]
pub struct TransitionController {
    timing: TransitionTiming,
    state: Option<TransitionState>,
    lighting: LightingParams,
    shadow_multiplier: f32,
    particle_intensity: f32,
}

impl TransitionController {
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            timing,
            state: None,
            lighting: LightingParams::NEUTRAL,
            shadow_multiplier: 1.0,
            particle_intensity: 1.0,
        }
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// Takes effect from the next `advance`, without rewinding progress.
    pub fn set_timing(&mut self, timing: TransitionTiming) {
        self.timing = timing;
    }

    /// Jump straight to the steady state for `precipitation`, cancelling any
    /// transition.
    pub fn settle(&mut self, precipitation: PrecipitationKind) {
        self.state = None;
        self.lighting = lighting_for(precipitation);
        self.shadow_multiplier = shadow_multiplier_for(precipitation);
        self.particle_intensity = 1.0;
    }

    /// Start a transition towards `target`, replacing any transition in flight.
    ///
    /// The starting point is whatever is on screen right now, so redirecting
    /// a half-finished transition never jumps.
    pub fn begin(&mut self, live_precipitation: PrecipitationKind, target: WeatherConfig) {
        self.state = Some(TransitionState {
            progress: 0.0,
            from_lighting: self.lighting,
            target_lighting: lighting_for(target.precipitation),
            from_shadow_multiplier: self.shadow_multiplier,
            target_shadow_multiplier: shadow_multiplier_for(target.precipitation),
            from_precipitation: live_precipitation,
            target_precipitation: target.precipitation,
            target,
            from_intensity: self.particle_intensity,
            swapped: false,
        });
    }

    /// Move the transition forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> TransitionStep {
        let Some(mut state) = self.state else {
            return TransitionStep::Idle;
        };

        let duration = self.timing.seconds();
        state.progress = if duration > 0.0 {
            (state.progress + sanitize_delta(dt) / duration).min(1.0)
        } else {
            1.0
        };
        if state.progress >= 1.0 - FINISH_EPSILON {
            self.state = None;
            self.lighting = state.target_lighting;
            self.shadow_multiplier = state.target_shadow_multiplier;
            self.particle_intensity = 1.0;
            return TransitionStep::Finished(state.target);
        }

        let t = state.progress;
        self.lighting = state.from_lighting.lerp(&state.target_lighting, t);
        self.shadow_multiplier = lerp(state.from_shadow_multiplier, state.target_shadow_multiplier, t);
        self.particle_intensity = if t < SWAP_POINT {
            state.from_intensity * (1.0 - 2.0 * t)
        } else {
            2.0 * (t - SWAP_POINT)
        };

        let step = if t >= SWAP_POINT && !state.swapped {
            state.swapped = true;
            TransitionStep::Swap(state.target)
        } else {
            TransitionStep::Fading
        };
        self.state = Some(state);
        step
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_some()
    }

    /// Transition progress; 1.0 when idle.
    pub fn progress(&self) -> f32 {
        self.state.map_or(1.0, |s| s.progress)
    }

    pub fn state(&self) -> Option<&TransitionState> {
        self.state.as_ref()
    }

    /// Config the transition is heading to, if any.
    pub fn target(&self) -> Option<WeatherConfig> {
        self.state.map(|s| s.target)
    }

    /// Lighting currently on screen.
    pub fn lighting(&self) -> LightingParams {
        self.lighting
    }

    pub fn from_lighting(&self) -> LightingParams {
        self.state.map_or(self.lighting, |s| s.from_lighting)
    }

    pub fn target_lighting(&self) -> LightingParams {
        self.state.map_or(self.lighting, |s| s.target_lighting)
    }

    pub fn shadow_multiplier(&self) -> f32 {
        self.shadow_multiplier
    }

    /// Alpha multiplier for every particle, `0.0..=1.0`.
    pub fn particle_intensity(&self) -> f32 {
        self.particle_intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Intensity;

    const HEAVY_RAIN: PrecipitationKind = PrecipitationKind::Rain(Intensity::Heavy);

    fn controller() -> TransitionController {
        let mut c = TransitionController::new(TransitionTiming::default());
        c.settle(PrecipitationKind::None);
        c
    }

    #[test]
    fn idle_controller_is_settled() {
        let c = controller();
        assert!(!c.is_transitioning());
        assert_eq!(c.progress(), 1.0);
        assert_eq!(c.from_lighting(), c.lighting());
        assert_eq!(c.target_lighting(), c.lighting());
        assert_eq!(c.particle_intensity(), 1.0);
    }

    #[test]
    fn progress_is_monotonic_and_reaches_one() {
        let mut c = controller();
        c.begin(PrecipitationKind::None, WeatherConfig::with_precipitation(HEAVY_RAIN));
        let mut last = 0.0;
        let mut finished = false;
        for _ in 0..60 {
            match c.advance(0.1) {
                TransitionStep::Finished(_) => {
                    finished = true;
                    break;
                }
                _ => {
                    assert!(c.progress() >= last);
                    last = c.progress();
                }
            }
        }
        assert!(finished);
        assert_eq!(c.progress(), 1.0);
        assert_eq!(c.lighting(), lighting_for(HEAVY_RAIN));
        assert_eq!(c.shadow_multiplier(), 0.25);
    }

    #[test]
    fn lighting_starts_at_snapshot_and_stays_between_endpoints() {
        let mut c = controller();
        c.begin(PrecipitationKind::None, WeatherConfig::with_precipitation(HEAVY_RAIN));
        assert_eq!(c.lighting(), LightingParams::NEUTRAL);
        for _ in 0..49 {
            c.advance(0.1);
            let l = c.lighting();
            assert!(l.brightness <= 1.0 && l.brightness >= 0.5);
            assert!(l.saturation <= 1.0 && l.saturation >= 0.5);
            assert!(l.darkness_color[2] <= 1.0 && l.darkness_color[2] >= 0.8);
            assert!(c.shadow_multiplier() <= 1.0 && c.shadow_multiplier() >= 0.25);
        }
    }

    #[test]
    fn intensity_envelope_is_zero_at_swap() {
        let mut c = controller();
        c.begin(PrecipitationKind::None, WeatherConfig::with_precipitation(HEAVY_RAIN));
        assert_eq!(c.advance(1.25), TransitionStep::Fading);
        assert!((c.particle_intensity() - 0.5).abs() < 1e-6);
        c.advance(1.2499);
        assert!(c.particle_intensity() < 1e-3);
        assert!(matches!(c.advance(0.001), TransitionStep::Swap(_)));
        assert!(c.particle_intensity() < 1e-3);
        c.advance(0.0005);
        assert!(c.particle_intensity() < 1e-3);
        c.advance(1.25);
        assert!((c.particle_intensity() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn swap_fires_exactly_once() {
        let mut c = controller();
        c.begin(PrecipitationKind::None, WeatherConfig::with_precipitation(HEAVY_RAIN));
        let mut swaps = 0;
        for _ in 0..40 {
            if let TransitionStep::Swap(_) = c.advance(0.1) {
                swaps += 1;
            }
        }
        assert_eq!(swaps, 1);
    }

    #[test]
    fn zero_dt_does_not_progress() {
        let mut c = controller();
        c.begin(PrecipitationKind::None, WeatherConfig::with_precipitation(HEAVY_RAIN));
        c.advance(1.0);
        let p = c.progress();
        c.advance(0.0);
        c.advance(-3.0);
        c.advance(f32::NAN);
        assert_eq!(c.progress(), p);
    }

    #[test]
    fn large_step_finishes_directly() {
        let mut c = controller();
        c.begin(PrecipitationKind::None, WeatherConfig::with_precipitation(HEAVY_RAIN));
        let target = WeatherConfig::with_precipitation(HEAVY_RAIN);
        assert_eq!(c.advance(60.0), TransitionStep::Finished(target));
        assert!(!c.is_transitioning());
        assert_eq!(c.advance(1.0), TransitionStep::Idle);
    }

    #[test]
    fn zero_duration_finishes_on_next_advance() {
        let mut c = TransitionController::new(TransitionTiming::from_seconds(0.0));
        c.begin(PrecipitationKind::None, WeatherConfig::with_precipitation(HEAVY_RAIN));
        assert!(matches!(c.advance(0.0), TransitionStep::Finished(_)));
    }

    #[test]
    fn redirect_starts_from_displayed_values() {
        let mut c = controller();
        c.begin(PrecipitationKind::None, WeatherConfig::with_precipitation(HEAVY_RAIN));
        c.advance(1.5); // progress 0.3
        let shown = c.lighting();
        let shadow = c.shadow_multiplier();
        let intensity = c.particle_intensity();
        assert!((intensity - 0.4).abs() < 1e-5);

        c.begin(PrecipitationKind::None, WeatherConfig::CLEAR);
        assert_eq!(c.progress(), 0.0);
        assert_eq!(c.from_lighting(), shown);
        assert_eq!(c.lighting(), shown);
        assert_eq!(c.shadow_multiplier(), shadow);
        assert_eq!(c.target_lighting(), LightingParams::NEUTRAL);

        // The fade-out continues from what was showing rather than popping to 1.
        c.advance(0.5); // progress 0.1
        assert!((c.particle_intensity() - 0.4 * 0.8).abs() < 1e-5);
    }
}
