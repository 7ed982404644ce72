//! Bubble particles emitted while the body moves under water.
//!
//! Bubbles are never freed: an expired bubble goes back to a pool and is
//! relaunched by the next spawn, so the number of allocations is bounded by
//! the active cap.

pub mod config;
pub mod placement;
pub mod pool;

pub use config::*;
pub use placement::*;
pub use pool::*;
