//! Audio collaborator interface for weather and wind ambience.

use crate::kinds::{PrecipitationKind, WindKind};
use engine_core::TransitionTiming;
use std::cell::RefCell;
use std::rc::Rc;

/// Plays the looping weather and wind beds. Implemented by the audio backend;
/// the weather system works without one.
pub trait WeatherAudio {
    /// Start (or crossfade to) the bed for a precipitation id such as `"rain-heavy"`.
    fn play_weather_sound(&mut self, name: &str);
    fn stop_weather_sound(&mut self);
    /// Start (or crossfade to) the bed for a wind id such as `"medium"`.
    fn play_wind_sound(&mut self, name: &str);
    fn stop_wind_sound(&mut self);
    /// Fade length for both beds. Always the same value the visual
    /// crossfade uses.
    fn set_transition_timing(&mut self, timing: TransitionTiming);
}

/// Lets the game keep its own handle on an audio backend it also hands to
/// the weather system.
impl<T: WeatherAudio + ?Sized> WeatherAudio for Rc<RefCell<T>> {
    fn play_weather_sound(&mut self, name: &str) {
        self.borrow_mut().play_weather_sound(name);
    }

    fn stop_weather_sound(&mut self) {
        self.borrow_mut().stop_weather_sound();
    }

    fn play_wind_sound(&mut self, name: &str) {
        self.borrow_mut().play_wind_sound(name);
    }

    fn stop_wind_sound(&mut self) {
        self.borrow_mut().stop_wind_sound();
    }

    fn set_transition_timing(&mut self, timing: TransitionTiming) {
        self.borrow_mut().set_transition_timing(timing);
    }
}

/// Tell `audio` what should be audible now. `None` stops the matching bed.
pub fn apply_weather_sounds(audio: &mut dyn WeatherAudio, precipitation: PrecipitationKind, wind: WindKind) {
    match precipitation {
        PrecipitationKind::None => audio.stop_weather_sound(),
        other => audio.play_weather_sound(other.as_str()),
    }
    match wind {
        WindKind::None => audio.stop_wind_sound(),
        other => audio.play_wind_sound(other.as_str()),
    }
}

/// Records every call, for tests and headless runs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingAudio {
    pub calls: Vec<String>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WeatherAudio for RecordingAudio {
    fn play_weather_sound(&mut self, name: &str) {
        self.calls.push(format!("weather:{}", name));
    }

    fn stop_weather_sound(&mut self) {
        self.calls.push("weather:stop".to_string());
    }

    fn play_wind_sound(&mut self, name: &str) {
        self.calls.push(format!("wind:{}", name));
    }

    fn stop_wind_sound(&mut self) {
        self.calls.push("wind:stop".to_string());
    }

    fn set_transition_timing(&mut self, timing: TransitionTiming) {
        self.calls.push(format!("timing:{:.2}", timing.seconds()));
    }
}
