//! Weather ambience using Kira: one looping bed for precipitation and one
//! for wind, crossfaded over the shared transition duration.

use anyhow::Result;
use engine_core::TransitionTiming;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;
use weather::{PrecipitationKind, WeatherAudio, WindKind};

/// Every bed [`AudioSystem::load_weather_sounds`] looks for.
pub const BED_NAMES: [&str; 9] = [
    "rain-light",
    "rain-medium",
    "rain-heavy",
    "snow-light",
    "snow-medium",
    "snow-heavy",
    "wind-light",
    "wind-medium",
    "wind-heavy",
];

const SOUND_EXTENSIONS: [&str; 3] = ["ogg", "wav", "mp3"];

/// Bed that plays for a precipitation id. Clear and dynamic weather have
/// none of their own.
pub fn weather_bed(id: &str) -> Option<&'static str> {
    match id.parse::<PrecipitationKind>().ok()? {
        PrecipitationKind::None | PrecipitationKind::Dynamic => None,
        other => Some(other.as_str()),
    }
}

/// Bed that plays for a wind id. Dynamic wind uses the medium bed.
pub fn wind_bed(id: &str) -> Option<&'static str> {
    match id.parse::<WindKind>().ok()? {
        WindKind::None => None,
        WindKind::Light => Some("wind-light"),
        WindKind::Medium | WindKind::Dynamic => Some("wind-medium"),
        WindKind::Heavy => Some("wind-heavy"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Weather,
    Wind,
}

struct LoopingBed {
    name: &'static str,
    handle: StaticSoundHandle,
}

/// Owns the Kira manager and the two ambience channels.
pub struct AudioSystem {
    manager: AudioManager,
    sounds: HashMap<String, StaticSoundData>,
    weather: Option<LoopingBed>,
    wind: Option<LoopingBed>,
    timing: TransitionTiming,
}

impl AudioSystem {
    /// Create a new audio system.
    pub fn new(timing: TransitionTiming) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager,
            sounds: HashMap::new(),
            weather: None,
            wind: None,
            timing,
        })
    }

    /// Load a sound from a file.
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        let sound_data = StaticSoundData::from_file(path)?;
        self.sounds.insert(name.to_string(), sound_data);
        Ok(())
    }

    /// Load every known bed found in `dir` as `<name>.ogg` (or wav/mp3).
    /// Missing beds are skipped with a warning. Returns how many loaded.
    pub fn load_weather_sounds(&mut self, dir: &Path) -> usize {
        let mut loaded = 0;
        for name in BED_NAMES {
            let found = SOUND_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{}.{}", name, ext)))
                .find(|path| path.exists());
            let Some(path) = found else {
                log::warn!("No sound for {} in {:?}", name, dir);
                continue;
            };
            match self.load_sound(name, &path) {
                Ok(()) => loaded += 1,
                Err(e) => log::warn!("Failed to load {:?}: {}", path, e),
            }
        }
        log::info!("Loaded {}/{} weather sounds", loaded, BED_NAMES.len());
        loaded
    }

    fn fade(&self) -> Tween {
        Tween {
            duration: self.timing.as_duration(),
            ..Default::default()
        }
    }

    fn slot(&mut self, channel: Channel) -> &mut Option<LoopingBed> {
        match channel {
            Channel::Weather => &mut self.weather,
            Channel::Wind => &mut self.wind,
        }
    }

    /// Fade out whatever the channel plays and fade `bed` in. Asking for the
    /// bed already playing changes nothing.
    fn crossfade(&mut self, channel: Channel, bed: Option<&'static str>) {
        let current = self.slot(channel).as_ref().map(|b| b.name);
        if current == bed {
            return;
        }
        let fade = self.fade();
        if let Some(mut old) = self.slot(channel).take() {
            let _ = old.handle.stop(fade);
        }
        let Some(name) = bed else {
            return;
        };
        match self.start_loop(name, fade) {
            Ok(Some(handle)) => *self.slot(channel) = Some(LoopingBed { name, handle }),
            Ok(None) => log::warn!("Sound {} not loaded", name),
            Err(e) => log::warn!("Failed to play {}: {}", name, e),
        }
    }

    fn start_loop(&mut self, name: &str, fade: Tween) -> Result<Option<StaticSoundHandle>> {
        let Some(sound_data) = self.sounds.get(name) else {
            return Ok(None);
        };
        let settings = StaticSoundSettings::new().loop_region(..).fade_in_tween(fade);
        let handle = self.manager.play(sound_data.clone().with_settings(settings))?;
        Ok(Some(handle))
    }
}

impl WeatherAudio for AudioSystem {
    fn play_weather_sound(&mut self, name: &str) {
        self.crossfade(Channel::Weather, weather_bed(name));
    }

    fn stop_weather_sound(&mut self) {
        self.crossfade(Channel::Weather, None);
    }

    fn play_wind_sound(&mut self, name: &str) {
        self.crossfade(Channel::Wind, wind_bed(name));
    }

    fn stop_wind_sound(&mut self) {
        self.crossfade(Channel::Wind, None);
    }

    /// Applies to the next crossfade; fades already running keep their length.
    fn set_transition_timing(&mut self, timing: TransitionTiming) {
        self.timing = timing;
    }
}

// Re-export for convenience
pub use kira;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precipitation_ids_map_to_beds() {
        assert_eq!(weather_bed("rain-heavy"), Some("rain-heavy"));
        assert_eq!(weather_bed("snow-light"), Some("snow-light"));
        assert_eq!(weather_bed("none"), None);
        assert_eq!(weather_bed("dynamic"), None);
        assert_eq!(weather_bed("hail"), None);
    }

    #[test]
    fn wind_ids_map_to_beds() {
        assert_eq!(wind_bed("light"), Some("wind-light"));
        assert_eq!(wind_bed("dynamic"), Some("wind-medium"));
        assert_eq!(wind_bed("heavy"), Some("wind-heavy"));
        assert_eq!(wind_bed("none"), None);
    }

    #[test]
    fn every_bed_is_reachable() {
        let reachable: Vec<&str> = PrecipitationKind::ALL
            .iter()
            .filter_map(|p| weather_bed(p.as_str()))
            .chain(WindKind::ALL.iter().filter_map(|w| wind_bed(w.as_str())))
            .collect();
        for name in BED_NAMES {
            assert!(reachable.contains(&name), "{}", name);
        }
    }
}
