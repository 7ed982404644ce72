//! Buoyancy physics for the object floating in the pool.

pub mod body;
pub mod buoyancy;
pub mod classifier;

pub use body::{FloatingBody, ObjectKind};
pub use buoyancy::{BuoyancyForces, BuoyancyModel, BuoyancyStep};
pub use classifier::{classify, ObjectStatus};
