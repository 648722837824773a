//! weather_demo - headless walk through a few maps with changing weather.
//!
//! The camera pans across a simple scene while a schedule of map loads
//! drives the weather. Frames are rendered on the CPU canvas, colour graded
//! with the weather lighting, and written out as PNGs.

mod config;

use anyhow::{Context, Result};
use audio::AudioSystem;
use config::{GameConfig, WeatherCue};
use engine_core::{Camera2D, Time};
use glam::Vec2;
use renderer::{rgba8, RasterCanvas, ShapeBatch, ShapePainter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use weather::{WeatherConfig, WeatherSystem, RAIN_CAPACITY};

/// Spacing between trees along the ground, in world units.
const TREE_SPACING: f32 = 160.0;
const GROUND_LEVEL: f32 = 260.0;

/// Paints the static backdrop: ground and a row of trees with shadows.
fn draw_scene(painter: &mut dyn ShapePainter, camera: &Camera2D, shadow_multiplier: f32) {
    let zoom = camera.effective_zoom();
    let visible = camera.visible_size();
    let left = camera.position.x;
    let ground_y = camera.world_to_screen(Vec2::new(0.0, GROUND_LEVEL)).y;
    let ground_depth = visible.y * zoom;
    painter.draw_line(
        Vec2::new(0.0, ground_y + ground_depth * 0.5),
        Vec2::new(visible.x * zoom, ground_y + ground_depth * 0.5),
        ground_depth,
        rgba8(86, 125, 70, 1.0),
    );

    let first = (left / TREE_SPACING).floor() as i64 - 1;
    let last = ((left + visible.x) / TREE_SPACING).ceil() as i64 + 1;
    for i in first..=last {
        let base = Vec2::new(i as f32 * TREE_SPACING, GROUND_LEVEL);
        let shadow = camera.world_to_screen(base + Vec2::new(18.0, 4.0));
        painter.draw_ellipse(
            shadow,
            Vec2::new(34.0, 8.0) * zoom,
            0.0,
            rgba8(0, 0, 0, 0.45 * shadow_multiplier),
        );
        painter.draw_line(
            camera.world_to_screen(base),
            camera.world_to_screen(base - Vec2::new(0.0, 40.0)),
            8.0 * zoom,
            rgba8(101, 67, 33, 1.0),
        );
        painter.draw_circle(
            camera.world_to_screen(base - Vec2::new(0.0, 62.0)),
            28.0 * zoom,
            rgba8(46, 110, 52, 1.0),
        );
    }
}

/// Fire every cue whose time has come.
fn apply_due_cues(weather: &mut WeatherSystem, cues: &[WeatherCue], next: &mut usize, now: f32, maps_dir: &Path) {
    while let Some(cue) = cues.get(*next) {
        if cue.at_seconds > now {
            break;
        }
        let map = WeatherConfig::load_file_lenient(&maps_dir.join(&cue.map));
        log::info!("t={:.1}s loading {} ({})", now, cue.map, map.precipitation);
        weather.set_weather(Some(map), cue.immediate);
        *next += 1;
    }
}

fn attach_audio(weather: &mut WeatherSystem, config: &GameConfig) {
    let Some(dir) = &config.sound_dir else {
        return;
    };
    match AudioSystem::new(config.weather.timing) {
        Ok(mut audio) => {
            audio.load_weather_sounds(Path::new(dir));
            weather.set_audio(Some(Box::new(audio)));
        }
        Err(e) => log::warn!("Audio unavailable, continuing without sound: {}", e),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let screen = Vec2::new(config.canvas_width as f32, config.canvas_height as f32);
    let mut camera = Camera2D::new(Vec2::ZERO, config.zoom, screen);
    let mut weather = WeatherSystem::new(config.weather.clone(), &camera);
    attach_audio(&mut weather, &config);

    let output_dir = PathBuf::from(&config.output_dir);
    if config.save_every > 0 {
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("creating output directory {:?}", output_dir))?;
    }

    let cues = config.sorted_schedule();
    let maps_dir = PathBuf::from(&config.maps_dir);
    let mut next_cue = 0;

    let mut canvas = RasterCanvas::new(config.canvas_width, config.canvas_height).with_background([150, 190, 230, 255]);
    let mut batch = ShapeBatch::with_capacity(RAIN_CAPACITY);
    batch.set_available(config.gpu_batch);

    let frame_delta = Duration::from_secs_f32(config.frame_seconds());
    let pan = Vec2::from(config.pan_velocity);
    let mut time = Time::new();
    let mut written = 0u32;

    log::info!(
        "Simulating {} frames at {} fps ({} cues)",
        config.frames,
        config.fps,
        cues.len()
    );

    for frame in 0..config.frames {
        time.advance(frame_delta);
        let dt = time.delta_seconds();
        apply_due_cues(&mut weather, &cues, &mut next_cue, time.elapsed_seconds(), &maps_dir);

        camera.pan(pan * dt);
        weather.update(dt, &camera);

        canvas.clear();
        batch.clear();
        draw_scene(&mut canvas, &camera, weather.shadow_multiplier());
        if !weather.render(&camera, Some(&mut batch), Some(&mut canvas)) {
            log::warn!("Frame {}: no painter could draw weather", frame);
        }
        if batch.triangle_count() > 0 {
            log::debug!(
                "Frame {}: {} triangles ({} bytes) batched",
                frame,
                batch.triangle_count(),
                batch.as_bytes().len()
            );
        }

        let lighting = weather.interpolated_lighting_params();
        canvas.grade(lighting.brightness, lighting.saturation, lighting.darkness_color);

        if config.save_every > 0 && frame % config.save_every == 0 {
            let path = output_dir.join(format!("frame_{:05}.png", frame));
            canvas.save_png(&path)?;
            written += 1;
        }

        if frame % config.fps.max(1) == 0 {
            log::info!(
                "t={:.1}s {} -> {} progress {:.2} intensity {:.2} wind {:.2} brightness {:.2}",
                time.elapsed_seconds(),
                weather.precipitation(),
                weather.target_config().precipitation,
                weather.progress(),
                weather.particle_intensity(),
                weather.wind_strength(),
                lighting.brightness
            );
        }
    }

    log::info!("Done: {} frames written to {:?}", written, output_dir);
    Ok(())
}
