//! Core engine types shared by the weather, audio, and render crates.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Frame timing and the 60 Hz reference tick
//! - The shared transition duration used by every crossfade
//! - The 2D camera and its padded world-space viewport

pub mod camera;
pub mod time;
pub mod timing;

pub use camera::*;
pub use time::*;
pub use timing::*;

// Re-export commonly used types
pub use glam::Vec2;
