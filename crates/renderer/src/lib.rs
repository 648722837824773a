//! 2D shape drawing backends for the weather effects.
//!
//! Two collaborators implement [`ShapePainter`]:
//! - [`ShapeBatch`]: tessellates shapes into a GPU-ready vertex batch
//! - [`RasterCanvas`]: CPU raster fallback used when the GPU path is unavailable

pub mod batch;
pub mod raster;
pub mod shapes;
pub mod vertex;

pub use batch::*;
pub use raster::*;
pub use shapes::*;
pub use vertex::*;
