use bevy::math::{bounding::Aabb3d, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::{DEFAULT_DENSITY, WATER_DENSITY};

/// Which object is floating in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ObjectKind {
    #[default]
    Duck,
    Ship,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Duck => "duck",
            ObjectKind::Ship => "ship",
        }
    }
}

/// The object currently floating in the pool.
///
/// Only vertical motion is simulated. `rotation` is cosmetic: `x` is pitch,
/// `y` is roll (about the Z axis).
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingBody {
    pub kind: ObjectKind,
    pub position: Vec3,
    pub velocity: f32,
    pub rotation: Vec2,
    size: Vec3,
    volume: f32,
    density: f32,
}

impl FloatingBody {
    /// Build a body from its bounding box size.
    ///
    /// `packing` is the share of the bounding box that actually displaces water.
    pub fn from_bounds(
        kind: ObjectKind,
        position: Vec3,
        size: Vec3,
        packing: f32,
        density: f32,
    ) -> Result<Self, SimulationError> {
        if !size.is_finite() || size.cmple(Vec3::ZERO).any() {
            return Err(SimulationError::InvalidBounds(size.to_array()));
        }
        let volume = size.x * size.y * size.z * packing;
        if !volume.is_finite() || volume <= 0.0 {
            return Err(SimulationError::InvalidVolume(volume));
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(SimulationError::InvalidDensity(density));
        }

        Ok(Self {
            kind,
            position,
            velocity: 0.0,
            rotation: Vec2::ZERO,
            size,
            volume,
            density,
        })
    }

    /// Size of the bounding box (full extent on every axis).
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Volume in m³.
    #[inline]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Density relative to water.
    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Mass in kg.
    #[inline]
    pub fn mass(&self) -> f32 {
        self.volume * self.density * WATER_DENSITY
    }

    /// Y of the lowest point of the bounding box.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.size.y / 2.0
    }

    /// World-space bounding box at the current position.
    pub fn aabb(&self) -> Aabb3d {
        Aabb3d::new(self.position, self.size / 2.0)
    }

    /// Replace the density. Non-positive or non-finite values are rejected and
    /// the previous value is kept.
    pub fn set_density(&mut self, density: f32) -> Result<(), SimulationError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(SimulationError::InvalidDensity(density));
        }
        self.density = density;
        Ok(())
    }

    /// Put the body back at `position` at rest and level.
    pub fn place_at_rest(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = 0.0;
        self.rotation = Vec2::ZERO;
    }

    /// Back to the freshly spawned state at `position` with the default density.
    pub fn reset(&mut self, position: Vec3) {
        self.density = DEFAULT_DENSITY;
        self.place_at_rest(position);
    }
}
