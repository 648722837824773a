//! Weather identifiers as authored in map data.
//!
//! Maps name weather with short kebab-case ids (`"rain-heavy"`, `"leaf-red"`).
//! Strict parsing goes through [`std::str::FromStr`]; the lenient `from_id`
//! constructors used for map data log and fall back to `None` instead.

use crate::error::WeatherError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strength tier shared by rain and snow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Light, Intensity::Medium, Intensity::Heavy];

    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Medium => "medium",
            Intensity::Heavy => "heavy",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Intensity::Light),
            "medium" => Some(Intensity::Medium),
            "heavy" => Some(Intensity::Heavy),
            _ => None,
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}

fn is_none_alias(s: &str) -> bool {
    matches!(s, "" | "none" | "clear")
}

// ── Precipitation ───────────────────────────────────────────────────────────

/// What falls from the sky. Drives both the particle pool and the lighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrecipitationKind {
    #[default]
    None,
    /// Re-rolled periodically between a few content-defined states.
    Dynamic,
    Rain(Intensity),
    Snow(Intensity),
}

impl PrecipitationKind {
    pub const ALL: [PrecipitationKind; 8] = [
        PrecipitationKind::None,
        PrecipitationKind::Dynamic,
        PrecipitationKind::Rain(Intensity::Light),
        PrecipitationKind::Rain(Intensity::Medium),
        PrecipitationKind::Rain(Intensity::Heavy),
        PrecipitationKind::Snow(Intensity::Light),
        PrecipitationKind::Snow(Intensity::Medium),
        PrecipitationKind::Snow(Intensity::Heavy),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrecipitationKind::None => "none",
            PrecipitationKind::Dynamic => "dynamic",
            PrecipitationKind::Rain(Intensity::Light) => "rain-light",
            PrecipitationKind::Rain(Intensity::Medium) => "rain-medium",
            PrecipitationKind::Rain(Intensity::Heavy) => "rain-heavy",
            PrecipitationKind::Snow(Intensity::Light) => "snow-light",
            PrecipitationKind::Snow(Intensity::Medium) => "snow-medium",
            PrecipitationKind::Snow(Intensity::Heavy) => "snow-heavy",
        }
    }

    /// Tier of rain or snow; `None` for clear and dynamic weather.
    pub fn intensity(self) -> Option<Intensity> {
        match self {
            PrecipitationKind::Rain(i) | PrecipitationKind::Snow(i) => Some(i),
            PrecipitationKind::None | PrecipitationKind::Dynamic => None,
        }
    }

    pub fn is_rain(self) -> bool {
        matches!(self, PrecipitationKind::Rain(_))
    }

    pub fn is_snow(self) -> bool {
        matches!(self, PrecipitationKind::Snow(_))
    }

    /// Parse a map-authored id, logging and falling back to `None` when unknown.
    pub fn from_id(id: &str) -> Self {
        id.parse().unwrap_or_else(|e| {
            log::warn!("{}, using none", e);
            PrecipitationKind::None
        })
    }
}

impl FromStr for PrecipitationKind {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = normalize(s);
        if is_none_alias(&id) {
            return Ok(PrecipitationKind::None);
        }
        if id == "dynamic" {
            return Ok(PrecipitationKind::Dynamic);
        }
        let parsed = match id.split_once('-') {
            Some(("rain", tier)) => Intensity::parse(tier).map(PrecipitationKind::Rain),
            Some(("snow", tier)) => Intensity::parse(tier).map(PrecipitationKind::Snow),
            _ => None,
        };
        parsed.ok_or_else(|| WeatherError::UnknownIdentifier {
            field: "precipitation",
            value: s.to_string(),
        })
    }
}

// ── Wind ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WindKind {
    #[default]
    None,
    /// Strength oscillates slowly over time.
    Dynamic,
    Light,
    Medium,
    Heavy,
}

impl WindKind {
    pub const ALL: [WindKind; 5] = [
        WindKind::None,
        WindKind::Dynamic,
        WindKind::Light,
        WindKind::Medium,
        WindKind::Heavy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WindKind::None => "none",
            WindKind::Dynamic => "dynamic",
            WindKind::Light => "light",
            WindKind::Medium => "medium",
            WindKind::Heavy => "heavy",
        }
    }

    pub fn from_id(id: &str) -> Self {
        id.parse().unwrap_or_else(|e| {
            log::warn!("{}, using none", e);
            WindKind::None
        })
    }
}

impl FromStr for WindKind {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = normalize(s);
        if is_none_alias(&id) {
            return Ok(WindKind::None);
        }
        match id.as_str() {
            "dynamic" => Ok(WindKind::Dynamic),
            "light" => Ok(WindKind::Light),
            "medium" => Ok(WindKind::Medium),
            "heavy" => Ok(WindKind::Heavy),
            _ => Err(WeatherError::UnknownIdentifier {
                field: "wind",
                value: s.to_string(),
            }),
        }
    }
}

// ── Decorative particles ────────────────────────────────────────────────────

/// Falling leaves or petals layered on top of the precipitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParticleKind {
    #[default]
    None,
    LeafGreen,
    LeafOrange,
    LeafRed,
    LeafBrown,
    Sakura,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 6] = [
        ParticleKind::None,
        ParticleKind::LeafGreen,
        ParticleKind::LeafOrange,
        ParticleKind::LeafRed,
        ParticleKind::LeafBrown,
        ParticleKind::Sakura,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParticleKind::None => "none",
            ParticleKind::LeafGreen => "leaf-green",
            ParticleKind::LeafOrange => "leaf-orange",
            ParticleKind::LeafRed => "leaf-red",
            ParticleKind::LeafBrown => "leaf-brown",
            ParticleKind::Sakura => "sakura",
        }
    }

    pub fn from_id(id: &str) -> Self {
        id.parse().unwrap_or_else(|e| {
            log::warn!("{}, using none", e);
            ParticleKind::None
        })
    }
}

impl FromStr for ParticleKind {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = normalize(s);
        if is_none_alias(&id) {
            return Ok(ParticleKind::None);
        }
        match id.as_str() {
            "leaf-green" => Ok(ParticleKind::LeafGreen),
            "leaf-orange" => Ok(ParticleKind::LeafOrange),
            "leaf-red" => Ok(ParticleKind::LeafRed),
            "leaf-brown" => Ok(ParticleKind::LeafBrown),
            "sakura" => Ok(ParticleKind::Sakura),
            _ => Err(WeatherError::UnknownIdentifier {
                field: "particles",
                value: s.to_string(),
            }),
        }
    }
}

// Display, and the String conversions serde goes through.
macro_rules! id_conversions {
    ($($kind:ty),*) => {$(
        impl fmt::Display for $kind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<String> for $kind {
            fn from(id: String) -> Self {
                <$kind>::from_id(&id)
            }
        }

        impl From<$kind> for String {
            fn from(kind: $kind) -> Self {
                kind.as_str().to_string()
            }
        }
    )*};
}

id_conversions!(PrecipitationKind, WindKind, ParticleKind);
