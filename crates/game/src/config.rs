//! Demo configuration (canvas, camera, weather schedule). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use weather::WeatherSettings;

/// A map change at a point in the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCue {
    /// Seconds of simulated time at which the map "loads".
    pub at_seconds: f32,
    /// Map weather file, relative to `maps_dir`.
    pub map: String,
    /// Skip the crossfade (e.g. a teleport rather than walking across a border).
    #[serde(default)]
    pub immediate: bool,
}

/// Persistent demo settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Canvas width in pixels.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    /// Canvas height in pixels.
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    /// Frames to simulate.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Simulated frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    /// Camera pan in world units per second.
    #[serde(default = "default_pan_velocity")]
    pub pan_velocity: [f32; 2],
    /// Write every n-th frame as PNG; 0 disables output.
    #[serde(default = "default_save_every")]
    pub save_every: u32,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_maps_dir")]
    pub maps_dir: String,
    /// Directory with the ambience beds. No audio when unset.
    #[serde(default)]
    pub sound_dir: Option<String>,
    /// Draw through the vertex batch instead of the raster canvas.
    #[serde(default)]
    pub gpu_batch: bool,
    #[serde(default)]
    pub weather: WeatherSettings,
    #[serde(default = "default_schedule")]
    pub schedule: Vec<WeatherCue>,
}

fn default_canvas_width() -> u32 {
    640
}
fn default_canvas_height() -> u32 {
    360
}
fn default_frames() -> u32 {
    1800
}
fn default_fps() -> u32 {
    60
}
fn default_zoom() -> f32 {
    1.0
}
fn default_pan_velocity() -> [f32; 2] {
    [40.0, 0.0]
}
fn default_save_every() -> u32 {
    30
}
fn default_output_dir() -> String {
    "frames".to_string()
}
fn default_maps_dir() -> String {
    "assets/maps".to_string()
}
fn default_schedule() -> Vec<WeatherCue> {
    vec![
        WeatherCue {
            at_seconds: 0.0,
            map: "meadow.ron".to_string(),
            immediate: true,
        },
        WeatherCue {
            at_seconds: 6.0,
            map: "storm.ron".to_string(),
            immediate: false,
        },
        WeatherCue {
            at_seconds: 16.0,
            map: "winter.ron".to_string(),
            immediate: false,
        },
    ]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            frames: default_frames(),
            fps: default_fps(),
            zoom: default_zoom(),
            pan_velocity: default_pan_velocity(),
            save_every: default_save_every(),
            output_dir: default_output_dir(),
            maps_dir: default_maps_dir(),
            sound_dir: None,
            gpu_batch: false,
            weather: WeatherSettings::default(),
            schedule: default_schedule(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Seconds per simulated frame.
    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Cues in the order they fire.
    pub fn sorted_schedule(&self) -> Vec<WeatherCue> {
        let mut cues = self.schedule.clone();
        cues.sort_by(|a, b| a.at_seconds.total_cmp(&b.at_seconds));
        cues
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
