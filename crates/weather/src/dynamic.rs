//! Periodic re-rolling of the effective weather when a map asks for `dynamic`
//! precipitation.

use crate::config::DynamicWeatherSettings;
use crate::kinds::PrecipitationKind;
use engine_core::sanitize_delta;
use rand::seq::SliceRandom;
use rand::Rng;

/// Timer that picks a new effective precipitation every few minutes.
///
/// The reported precipitation stays `Dynamic`; only the particles follow
/// [`DynamicWeatherDriver::effective`].
#[derive(Debug, Clone)]
pub struct DynamicWeatherDriver {
    timer: f32,
    duration: f32,
    effective: PrecipitationKind,
    settings: DynamicWeatherSettings,
}

impl DynamicWeatherDriver {
    pub fn new(settings: DynamicWeatherSettings) -> Self {
        let mut settings = settings;
        let before = settings.candidates.len();
        settings.candidates.retain(|&c| c != PrecipitationKind::Dynamic);
        if settings.candidates.len() != before {
            log::warn!("Dynamic weather cannot pick itself, dropped from candidates");
        }
        if !(settings.min_duration.is_finite() && settings.min_duration >= 0.0) {
            settings.min_duration = 0.0;
        }
        if !(settings.max_duration.is_finite() && settings.max_duration >= settings.min_duration) {
            settings.max_duration = settings.min_duration;
        }
        Self {
            timer: 0.0,
            duration: settings.initial_duration,
            effective: PrecipitationKind::None,
            settings,
        }
    }

    /// Start over: clear weather, first re-roll after the initial duration.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.duration = self.settings.initial_duration;
        self.effective = PrecipitationKind::None;
    }

    /// Advance the timer. Returns the new effective weather when a re-roll
    /// lands on something different from the previous pick.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Option<PrecipitationKind> {
        self.timer += sanitize_delta(dt);
        if self.timer < self.duration {
            return None;
        }
        self.timer = 0.0;
        let (min, max) = (self.settings.min_duration, self.settings.max_duration);
        self.duration = if max > min { rng.gen_range(min..max) } else { min };

        let pick = self
            .settings
            .candidates
            .choose(rng)
            .copied()
            .unwrap_or(PrecipitationKind::None);
        log::debug!("Dynamic weather rolled {} (next roll in {:.0}s)", pick, self.duration);
        if pick == self.effective {
            return None;
        }
        self.effective = pick;
        Some(pick)
    }

    /// Weather the particles currently follow.
    pub fn effective(&self) -> PrecipitationKind {
        self.effective
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn candidates(&self) -> &[PrecipitationKind] {
        &self.settings.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Intensity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn starts_clear_with_initial_duration() {
        let driver = DynamicWeatherDriver::new(DynamicWeatherSettings::default());
        assert_eq!(driver.effective(), PrecipitationKind::None);
        assert_eq!(driver.duration(), 300.0);
        assert_eq!(driver.timer(), 0.0);
    }

    #[test]
    fn nothing_happens_before_duration() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut driver = DynamicWeatherDriver::new(DynamicWeatherSettings::default());
        assert_eq!(driver.update(299.0, &mut rng), None);
        assert_eq!(driver.timer(), 299.0);
    }

    #[test]
    fn reaching_duration_rerolls_and_resets_timer() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut driver = DynamicWeatherDriver::new(DynamicWeatherSettings::default());
        for _ in 0..50 {
            let _ = driver.update(driver.duration(), &mut rng);
            assert_eq!(driver.timer(), 0.0);
            assert!((120.0..300.0).contains(&driver.duration()), "{}", driver.duration());
            assert!(driver.candidates().contains(&driver.effective()));
        }
    }

    #[test]
    fn reports_only_changes() {
        let settings = DynamicWeatherSettings {
            candidates: vec![PrecipitationKind::Rain(Intensity::Medium)],
            ..DynamicWeatherSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut driver = DynamicWeatherDriver::new(settings);
        assert_eq!(
            driver.update(300.0, &mut rng),
            Some(PrecipitationKind::Rain(Intensity::Medium))
        );
        let next = driver.duration();
        assert_eq!(driver.update(next, &mut rng), None);
        assert_eq!(driver.effective(), PrecipitationKind::Rain(Intensity::Medium));
    }

    #[test]
    fn dynamic_and_empty_candidates_fall_back_to_clear() {
        let settings = DynamicWeatherSettings {
            candidates: vec![PrecipitationKind::Dynamic],
            min_duration: 10.0,
            max_duration: 5.0,
            ..DynamicWeatherSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut driver = DynamicWeatherDriver::new(settings);
        assert!(driver.candidates().is_empty());
        assert_eq!(driver.update(300.0, &mut rng), None);
        assert_eq!(driver.duration(), 10.0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut driver = DynamicWeatherDriver::new(DynamicWeatherSettings {
            candidates: vec![PrecipitationKind::Snow(Intensity::Light)],
            ..DynamicWeatherSettings::default()
        });
        driver.update(300.0, &mut rng);
        driver.update(10.0, &mut rng);
        driver.reset();
        assert_eq!(driver.effective(), PrecipitationKind::None);
        assert_eq!(driver.timer(), 0.0);
        assert_eq!(driver.duration(), 300.0);
    }
}
