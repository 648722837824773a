//! [`WeatherSystem`]: owns the pools, the crossfade, wind, and the dynamic
//! driver, and is the only thing the game talks to.

use crate::config::{WeatherConfig, WeatherSettings};
use crate::dynamic::DynamicWeatherDriver;
use crate::kinds::{ParticleKind, PrecipitationKind, WindKind};
use crate::lighting::LightingParams;
use crate::particles::{
    rain_count, snow_count, LeafParticle, LeafPool, RainParticle, RainPool, SnowParticle, SnowPool,
    LEAF_CAPACITY, RAIN_CAPACITY, SNOW_CAPACITY,
};
use crate::render::{draw_leaves, draw_rain, draw_snow};
use crate::sound::{apply_weather_sounds, WeatherAudio};
use crate::transition::{TransitionController, TransitionStep};
use crate::wind::WindModel;
use engine_core::{reference_ticks, sanitize_delta, Camera2D, TransitionTiming, Viewport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::ShapePainter;

pub struct WeatherSystem {
    settings: WeatherSettings,
    /// Live identifiers: what the particles and wind currently simulate.
    config: WeatherConfig,
    initialized: bool,
    transition: TransitionController,
    wind: WindModel,
    dynamic: DynamicWeatherDriver,
    rain: RainPool,
    snow: SnowPool,
    leaves: LeafPool,
    /// Padded viewport polled from the camera on the last update.
    viewport: Viewport,
    rng: StdRng,
    audio: Option<Box<dyn WeatherAudio>>,
}

impl WeatherSystem {
    pub fn new(settings: WeatherSettings, camera: &Camera2D) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut transition = TransitionController::new(settings.timing);
        transition.settle(PrecipitationKind::None);

        Self {
            config: WeatherConfig::CLEAR,
            initialized: false,
            transition,
            wind: WindModel::new(),
            dynamic: DynamicWeatherDriver::new(settings.dynamic.clone()),
            rain: RainPool::new(RAIN_CAPACITY, ()),
            snow: SnowPool::new(SNOW_CAPACITY, ()),
            leaves: LeafPool::new(LEAF_CAPACITY, ParticleKind::None),
            viewport: camera.viewport(),
            rng,
            audio: None,
            settings,
        }
    }

    /// Attach (or detach) the audio backend. A newly attached backend takes
    /// the crossfade length and is told what should be playing right away.
    pub fn set_audio(&mut self, audio: Option<Box<dyn WeatherAudio>>) {
        self.audio = audio;
        let timing = self.settings.timing;
        if let Some(audio) = self.audio.as_deref_mut() {
            audio.set_transition_timing(timing);
        }
        if self.initialized {
            self.notify_audio();
        }
    }

    /// Change the crossfade length for the visuals and the audio together.
    /// A running transition keeps its progress.
    pub fn set_transition_timing(&mut self, timing: TransitionTiming) {
        self.settings.timing = timing;
        self.transition.set_timing(timing);
        if let Some(audio) = self.audio.as_deref_mut() {
            audio.set_transition_timing(timing);
        }
    }

    /// Request new weather. `None` means clear skies.
    ///
    /// The first call, and any call with `immediate`, applies at once.
    /// Otherwise a crossfade starts from whatever is on screen, replacing any
    /// transition already running. Asking for the weather the system is
    /// already showing or heading to does nothing.
    pub fn set_weather(&mut self, config: Option<WeatherConfig>, immediate: bool) {
        let target = config.unwrap_or_default();

        if immediate || !self.initialized {
            self.initialized = true;
            self.apply_identity(target);
            self.transition.settle(target.precipitation);
            log::info!(
                "Weather set to {} / wind {} / {}",
                target.precipitation,
                target.wind,
                target.particles
            );
            self.notify_audio();
            return;
        }

        if target == self.target_config() {
            return;
        }

        self.transition.begin(self.config.precipitation, target);
        log::info!(
            "Weather transition {} -> {} over {:.1}s",
            self.config.precipitation,
            target.precipitation,
            self.settings.timing.seconds()
        );

        // Have the incoming precipitation ready before the swap. It is drawn
        // at the fading intensity, so a resized pool never pops in.
        if target.precipitation != self.particle_precipitation() {
            let viewport = self.viewport;
            match target.precipitation {
                p @ PrecipitationKind::Rain(_) => {
                    self.rain.ensure(rain_count(p), (), &viewport, &mut self.rng);
                }
                p @ PrecipitationKind::Snow(_) => {
                    self.snow.ensure(snow_count(p), (), &viewport, &mut self.rng);
                }
                _ => {}
            }
        }

        // Sound leads the picture.
        self.notify_audio();
    }

    /// Advance everything by `dt` seconds. `camera` is polled for the
    /// viewport the particles are kept inside.
    pub fn update(&mut self, dt: f32, camera: &Camera2D) {
        let dt = sanitize_delta(dt);
        self.viewport = camera.viewport();
        self.wind.advance(dt);

        match self.transition.advance(dt) {
            TransitionStep::Idle | TransitionStep::Fading => {}
            TransitionStep::Swap(target) => {
                log::debug!("Weather particles swapped to {}", target.precipitation);
                self.apply_identity(target);
            }
            TransitionStep::Finished(target) => {
                self.apply_identity(target);
                log::info!("Weather transition to {} finished", target.precipitation);
            }
        }

        if self.config.precipitation == PrecipitationKind::Dynamic && !self.transition.is_transitioning() {
            if let Some(pick) = self.dynamic.update(dt, &mut self.rng) {
                log::info!("Dynamic weather is now {}", pick);
                self.sync_pools();
                self.notify_audio();
            }
        }

        let ticks = reference_ticks(dt);
        let wind = self.wind_strength();
        let viewport = self.viewport;
        self.rain.update(wind, ticks, &viewport, &mut self.rng);
        self.snow.update(wind, ticks, &viewport, &mut self.rng);
        self.leaves.update(wind, ticks, &viewport, &mut self.rng);
    }

    /// Draw the live particles with the first available painter.
    ///
    /// The choice is made on every call, so losing the GPU mid-session simply
    /// falls through to `fallback`. Returns `false` if neither could draw.
    pub fn render<'a>(
        &self,
        camera: &Camera2D,
        primary: Option<&'a mut dyn ShapePainter>,
        fallback: Option<&'a mut dyn ShapePainter>,
    ) -> bool {
        let painter = match primary
            .filter(|p| p.is_available())
            .or_else(|| fallback.filter(|p| p.is_available()))
        {
            Some(painter) => painter,
            None => {
                log::debug!("No painter available, skipping weather render");
                return false;
            }
        };

        let intensity = self.transition.particle_intensity();
        let precipitation = self.particle_precipitation();
        if precipitation.is_rain() {
            draw_rain(painter, camera, self.rain.particles(), self.wind_strength(), intensity);
        }
        if precipitation.is_snow() {
            draw_snow(painter, camera, self.snow.particles(), intensity);
        }
        if self.config.particles != ParticleKind::None {
            draw_leaves(painter, camera, self.leaves.particles(), intensity);
        }
        true
    }

    /// Scene colour grade for this frame.
    pub fn interpolated_lighting_params(&self) -> LightingParams {
        self.transition.lighting()
    }

    pub fn shadow_multiplier(&self) -> f32 {
        self.transition.shadow_multiplier()
    }

    /// Reported precipitation. Stays `Dynamic` while the driver re-rolls.
    pub fn precipitation(&self) -> PrecipitationKind {
        self.config.precipitation
    }

    pub fn wind(&self) -> WindKind {
        self.config.wind
    }

    pub fn particles(&self) -> ParticleKind {
        self.config.particles
    }

    /// Live identifiers.
    pub fn config(&self) -> WeatherConfig {
        self.config
    }

    /// Where the system is heading: the transition target, or the live
    /// config when idle.
    pub fn target_config(&self) -> WeatherConfig {
        self.transition.target().unwrap_or(self.config)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_transitioning()
    }

    pub fn progress(&self) -> f32 {
        self.transition.progress()
    }

    pub fn particle_intensity(&self) -> f32 {
        self.transition.particle_intensity()
    }

    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    pub fn wind_strength(&self) -> f32 {
        self.wind.strength(self.config.wind)
    }

    pub fn wind_angle(&self) -> f32 {
        self.wind.angle()
    }

    /// Precipitation for sound selection: the target while transitioning.
    pub fn effective_precipitation(&self) -> PrecipitationKind {
        self.target_config().precipitation
    }

    pub fn effective_wind(&self) -> WindKind {
        self.target_config().wind
    }

    /// Precipitation the particle pools are following right now, with
    /// `Dynamic` resolved to the driver's pick.
    pub fn particle_precipitation(&self) -> PrecipitationKind {
        match self.config.precipitation {
            PrecipitationKind::Dynamic => self.dynamic.effective(),
            other => other,
        }
    }

    pub fn rain_particles(&self) -> &[RainParticle] {
        self.rain.particles()
    }

    pub fn snow_particles(&self) -> &[SnowParticle] {
        self.snow.particles()
    }

    pub fn leaf_particles(&self) -> &[LeafParticle] {
        self.leaves.particles()
    }

    pub fn dynamic_state(&self) -> &DynamicWeatherDriver {
        &self.dynamic
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> &WeatherSettings {
        &self.settings
    }

    /// Switch the live identifiers and bring the pools in line with them.
    fn apply_identity(&mut self, config: WeatherConfig) {
        let was_dynamic = self.config.precipitation == PrecipitationKind::Dynamic;
        self.config = config;
        if config.precipitation == PrecipitationKind::Dynamic && !was_dynamic {
            self.dynamic.reset();
        }
        self.sync_pools();
    }

    /// Resize every pool to what the live identifiers call for. Pools that
    /// already match are left alone.
    fn sync_pools(&mut self) {
        let precipitation = self.particle_precipitation();
        let viewport = self.viewport;
        self.rain
            .ensure(rain_count(precipitation), (), &viewport, &mut self.rng);
        self.snow
            .ensure(snow_count(precipitation), (), &viewport, &mut self.rng);

        let kind = self.config.particles;
        let leaf_count = if kind == ParticleKind::None { 0 } else { self.settings.leaf_count() };
        self.leaves.ensure(leaf_count, kind, &viewport, &mut self.rng);
    }

    /// Sound for dynamic weather follows the driver's pick, and only once
    /// the live weather is actually dynamic.
    fn sound_precipitation(&self) -> PrecipitationKind {
        match self.effective_precipitation() {
            PrecipitationKind::Dynamic if self.config.precipitation == PrecipitationKind::Dynamic => {
                self.dynamic.effective()
            }
            PrecipitationKind::Dynamic => PrecipitationKind::None,
            other => other,
        }
    }

    fn notify_audio(&mut self) {
        let precipitation = self.sound_precipitation();
        let wind = self.effective_wind();
        if let Some(audio) = self.audio.as_deref_mut() {
            apply_weather_sounds(audio, precipitation, wind);
        }
    }
}
