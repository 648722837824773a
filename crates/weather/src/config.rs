//! Weather configuration: the per-map [`WeatherConfig`] and the engine-level
//! [`WeatherSettings`]. Both load from RON.

use crate::error::WeatherResult;
use crate::kinds::{Intensity, ParticleKind, PrecipitationKind, WindKind};
use crate::particles::{DEFAULT_LEAF_COUNT, LEAF_CAPACITY};
use engine_core::TransitionTiming;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Weather a map asks for. Absent config means all `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub precipitation: PrecipitationKind,
    pub wind: WindKind,
    pub particles: ParticleKind,
}

/// Map weather exactly as authored, before the ids are checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthoredWeather {
    precipitation: String,
    wind: String,
    particles: String,
}

/// Map weather read field by field: a value of the wrong type only costs
/// that one field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LenientWeather {
    #[serde(deserialize_with = "lenient_id")]
    precipitation: Option<String>,
    #[serde(deserialize_with = "lenient_id")]
    wind: Option<String>,
    #[serde(deserialize_with = "lenient_id")]
    particles: Option<String>,
}

/// Accept any RON value; only a string is an id.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match ron::Value::deserialize(deserializer)? {
        ron::Value::String(id) => Ok(Some(id)),
        other => {
            log::warn!("Map weather value {:?} is not an id, using none", other);
            Ok(None)
        }
    }
}

impl WeatherConfig {
    /// Clear skies, no wind, no particles.
    pub const CLEAR: WeatherConfig = WeatherConfig {
        precipitation: PrecipitationKind::None,
        wind: WindKind::None,
        particles: ParticleKind::None,
    };

    pub fn new(precipitation: PrecipitationKind, wind: WindKind, particles: ParticleKind) -> Self {
        Self {
            precipitation,
            wind,
            particles,
        }
    }

    pub fn with_precipitation(precipitation: PrecipitationKind) -> Self {
        Self {
            precipitation,
            ..Self::CLEAR
        }
    }

    /// Build from raw map properties. Missing fields are `None`; unknown ids
    /// are logged and also become `None`.
    pub fn from_fields(precipitation: Option<&str>, wind: Option<&str>, particles: Option<&str>) -> Self {
        Self {
            precipitation: precipitation.map(PrecipitationKind::from_id).unwrap_or_default(),
            wind: wind.map(WindKind::from_id).unwrap_or_default(),
            particles: particles.map(ParticleKind::from_id).unwrap_or_default(),
        }
    }

    /// Strict parse: malformed RON or an unknown id is an error.
    pub fn from_ron_str(data: &str) -> WeatherResult<Self> {
        let authored: AuthoredWeather = ron::from_str(data)?;
        Ok(Self {
            precipitation: authored.precipitation.parse()?,
            wind: authored.wind.parse()?,
            particles: authored.particles.parse()?,
        })
    }

    /// Lenient parse for map data: any field that is unusable is logged and
    /// becomes `None`, without affecting the others.
    pub fn from_ron_str_lenient(data: &str) -> Self {
        match ron::from_str::<LenientWeather>(data) {
            Ok(authored) => Self::from_fields(
                authored.precipitation.as_deref(),
                authored.wind.as_deref(),
                authored.particles.as_deref(),
            ),
            Err(e) => {
                log::warn!("Invalid map weather ({}), using clear weather", e);
                Self::CLEAR
            }
        }
    }

    /// Strictly load a map weather file.
    pub fn load_file(path: &Path) -> WeatherResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron_str(&data)
    }

    /// Load a map weather file; a missing or broken file means clear weather.
    pub fn load_file_lenient(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => Self::from_ron_str_lenient(&data),
            Err(e) => {
                log::warn!("Could not read map weather {:?}: {}, using clear weather", path, e);
                Self::CLEAR
            }
        }
    }
}

/// Timer and candidate list for `dynamic` precipitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicWeatherSettings {
    /// Seconds before the first re-roll.
    pub initial_duration: f32,
    /// Lower bound (inclusive) of the re-roll interval.
    pub min_duration: f32,
    /// Upper bound (exclusive) of the re-roll interval.
    pub max_duration: f32,
    /// Weathers picked from, uniformly. Content data.
    pub candidates: Vec<PrecipitationKind>,
}

impl Default for DynamicWeatherSettings {
    fn default() -> Self {
        Self {
            initial_duration: 300.0,
            min_duration: 120.0,
            max_duration: 300.0,
            candidates: vec![
                PrecipitationKind::None,
                PrecipitationKind::Rain(Intensity::Light),
                PrecipitationKind::Rain(Intensity::Medium),
            ],
        }
    }
}

/// Engine-level weather settings, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// Crossfade length, shared with the audio and map-transition fades.
    pub timing: TransitionTiming,
    /// Number of leaves/petals when a map has decorative particles.
    pub leaf_count: i32,
    pub dynamic: DynamicWeatherSettings,
    /// Fixed RNG seed; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            timing: TransitionTiming::default(),
            leaf_count: DEFAULT_LEAF_COUNT as i32,
            dynamic: DynamicWeatherSettings::default(),
            seed: None,
        }
    }
}

impl WeatherSettings {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Leaf count clamped to the pool capacity.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count.clamp(0, LEAF_CAPACITY as i32) as usize
    }

    pub fn from_ron_str(data: &str) -> WeatherResult<Self> {
        Ok(ron::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeatherError;

    #[test]
    fn missing_fields_default_to_none() {
        let config = WeatherConfig::from_ron_str("(precipitation: \"snow-light\")").unwrap();
        assert_eq!(config.precipitation, PrecipitationKind::Snow(Intensity::Light));
        assert_eq!(config.wind, WindKind::None);
        assert_eq!(config.particles, ParticleKind::None);
        assert_eq!(WeatherConfig::from_ron_str("()").unwrap(), WeatherConfig::CLEAR);
    }

    #[test]
    fn strict_parse_rejects_unknown_ids() {
        let err = WeatherConfig::from_ron_str("(wind: \"hurricane\")");
        assert!(matches!(err, Err(WeatherError::UnknownIdentifier { field: "wind", .. })));
        assert!(matches!(
            WeatherConfig::from_ron_str("(precipitation: 3"),
            Err(WeatherError::Config(_))
        ));
    }

    #[test]
    fn lenient_parse_replaces_unknown_ids_with_none() {
        let config = WeatherConfig::from_ron_str_lenient(
            "(precipitation: \"rain-medium\", wind: \"hurricane\", particles: \"sakura\")",
        );
        assert_eq!(config.precipitation, PrecipitationKind::Rain(Intensity::Medium));
        assert_eq!(config.wind, WindKind::None);
        assert_eq!(config.particles, ParticleKind::Sakura);
        assert_eq!(WeatherConfig::from_ron_str_lenient("not ron at all"), WeatherConfig::CLEAR);
    }

    #[test]
    fn lenient_parse_keeps_good_fields_next_to_bad_ones() {
        let config = WeatherConfig::from_ron_str_lenient("(precipitation: \"rain-heavy\", wind: 3)");
        assert_eq!(config.precipitation, PrecipitationKind::Rain(Intensity::Heavy));
        assert_eq!(config.wind, WindKind::None);

        let config = WeatherConfig::from_ron_str_lenient(
            "(precipitation: [1, 2], wind: \"light\", particles: \"leaf-red\")",
        );
        assert_eq!(
            config,
            WeatherConfig::new(PrecipitationKind::None, WindKind::Light, ParticleKind::LeafRed)
        );
        assert!(WeatherConfig::from_ron_str("(precipitation: \"rain-heavy\", wind: 3)").is_err());
    }

    #[test]
    fn from_fields_accepts_clear_alias() {
        let config = WeatherConfig::from_fields(Some("clear"), Some("dynamic"), None);
        assert_eq!(config.precipitation, PrecipitationKind::None);
        assert_eq!(config.wind, WindKind::Dynamic);
    }

    #[test]
    fn config_serializes_with_ids() {
        let config = WeatherConfig::new(
            PrecipitationKind::Rain(Intensity::Heavy),
            WindKind::Heavy,
            ParticleKind::LeafRed,
        );
        let text = ron::to_string(&config).unwrap();
        assert!(text.contains("\"rain-heavy\""));
        assert_eq!(ron::from_str::<WeatherConfig>(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_is_clear_weather() {
        let config = WeatherConfig::load_file_lenient(Path::new("/nonexistent/map.ron"));
        assert_eq!(config, WeatherConfig::CLEAR);
        assert!(matches!(
            WeatherConfig::load_file(Path::new("/nonexistent/map.ron")),
            Err(WeatherError::Io(_))
        ));
    }

    #[test]
    fn settings_defaults_and_leaf_clamp() {
        let settings = WeatherSettings::from_ron_str("(leaf_count: 9000)").unwrap();
        assert_eq!(settings.leaf_count(), LEAF_CAPACITY);
        assert_eq!(settings.timing.seconds(), 5.0);
        assert_eq!(settings.dynamic.candidates.len(), 3);

        let negative = WeatherSettings { leaf_count: -4, ..WeatherSettings::default() };
        assert_eq!(negative.leaf_count(), 0);
        assert_eq!(WeatherSettings::default().leaf_count(), 20);
    }

    #[test]
    fn settings_read_candidates_and_timing() {
        let settings = WeatherSettings::from_ron_str(
            "(timing: (duration_seconds: 2.0), dynamic: (candidates: [\"clear\", \"snow-heavy\"]), seed: Some(7))",
        )
        .unwrap();
        assert_eq!(settings.timing.seconds(), 2.0);
        assert_eq!(
            settings.dynamic.candidates,
            vec![PrecipitationKind::None, PrecipitationKind::Snow(Intensity::Heavy)]
        );
        assert_eq!(settings.seed, Some(7));
    }
}
