//! Crossfade timing shared between the weather, lighting, and audio systems.
//!
//! A map change kicks off several crossfades at once. They all read the same
//! [`TransitionTiming`] so they finish on the same frame.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default length of a map/weather crossfade in seconds.
pub const DEFAULT_TRANSITION_SECONDS: f32 = 5.0;

/// Shortest duration accepted; anything below finishes on the next update.
const MIN_TRANSITION_SECONDS: f32 = 0.0;

/// Length of an engine-wide crossfade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTiming {
    /// Crossfade length in seconds.
    pub duration_seconds: f32,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_TRANSITION_SECONDS,
        }
    }
}

impl TransitionTiming {
    pub fn from_seconds(duration_seconds: f32) -> Self {
        let timing = Self { duration_seconds };
        if timing.seconds() != duration_seconds {
            log::warn!(
                "Transition duration {} is not usable, clamped to {}",
                duration_seconds,
                timing.seconds()
            );
        }
        timing
    }

    /// Duration in seconds, clamped to a finite non-negative value.
    pub fn seconds(&self) -> f32 {
        if self.duration_seconds.is_finite() {
            self.duration_seconds.max(MIN_TRANSITION_SECONDS)
        } else {
            DEFAULT_TRANSITION_SECONDS
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f32(self.seconds())
    }
}
