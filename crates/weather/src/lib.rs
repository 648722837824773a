//! Atmospheric weather for the 2D overworld: rain, snow, wind, falling
//! leaves, and the lighting shift each weather state puts on the scene.
//!
//! [`WeatherSystem`] is the entry point. It crossfades between complete
//! weather states (lighting, shadow strength, and the particle population)
//! while the particle pools keep recycling around the moving camera.

pub mod config;
pub mod dynamic;
pub mod error;
pub mod kinds;
pub mod lighting;
pub mod particles;
pub mod render;
pub mod sound;
pub mod system;
pub mod transition;
pub mod wind;

pub use config::*;
pub use dynamic::*;
pub use error::*;
pub use kinds::*;
pub use lighting::*;
pub use particles::*;
pub use sound::*;
pub use system::*;
pub use transition::*;
pub use wind::*;
