//! Time management for the game loop.

use std::time::Duration;

/// Rate the per-tick particle constants are tuned for.
pub const REFERENCE_HZ: f32 = 60.0;

/// Convert a frame delta in seconds into reference ticks (`dt * 60`).
///
/// Non-finite or negative deltas count as zero ticks.
pub fn reference_ticks(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt * REFERENCE_HZ
    } else {
        0.0
    }
}

/// Sanitize a host-supplied frame delta: non-finite or negative values become zero.
pub fn sanitize_delta(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}

/// Manages frame timing and delta time calculation.
///
/// Stepped by the host with [`Time::advance`], one simulated delta per frame.
#[derive(Debug)]
pub struct Time {
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance by one frame of `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reference ticks covered by the last frame.
    pub fn reference_ticks(&self) -> f32 {
        reference_ticks(self.delta_seconds())
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}
