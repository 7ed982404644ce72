//! Pool water surface.
//!
//! The slider drives a normalized level in `[0, 1]`, mapped affinely onto the
//! scene's water range. The surface itself is flat: only its height matters
//! to the buoyancy solver and the bubbles.

pub mod surface;

pub use surface::{WaterRange, WaterSurface};
