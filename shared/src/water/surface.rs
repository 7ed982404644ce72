//! Flat pool water surface driven by the water level slider.

use crate::error::SimulationError;
use crate::variant::VariantParams;
use crate::DEFAULT_WATER_LEVEL;

/// Physical range the water height can take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterRange {
    pub min_y: f32,
    pub max_y: f32,
}

impl WaterRange {
    pub fn new(min_y: f32, max_y: f32) -> Self {
        debug_assert!(min_y <= max_y);
        Self { min_y, max_y }
    }

    /// Map a slider value to an absolute height. Input is clamped to `[0, 1]`.
    #[inline]
    pub fn height_at(&self, normalized: f32) -> f32 {
        let level = normalized.clamp(0.0, 1.0);
        self.min_y + level * (self.max_y - self.min_y)
    }

    #[inline]
    pub fn contains(&self, y: f32) -> bool {
        (self.min_y..=self.max_y).contains(&y)
    }
}

impl From<&VariantParams> for WaterRange {
    fn from(params: &VariantParams) -> Self {
        Self::new(params.water_min_y, params.water_max_y)
    }
}

/// The water plane. Its height always lies inside its range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterSurface {
    range: WaterRange,
    level: f32,
    height: f32,
}

impl WaterSurface {
    /// Create a surface at the default (half-full) level.
    pub fn new(range: WaterRange) -> Self {
        Self::at_level(range, DEFAULT_WATER_LEVEL)
    }

    /// Create a surface at a finite normalized level, clamped to `[0, 1]`.
    pub(crate) fn at_level(range: WaterRange, normalized: f32) -> Self {
        debug_assert!(normalized.is_finite());
        let level = normalized.clamp(0.0, 1.0);
        Self {
            range,
            level,
            height: range.height_at(level),
        }
    }

    /// Back to the default level. Returns the new height.
    pub fn reset(&mut self) -> f32 {
        *self = Self::at_level(self.range, DEFAULT_WATER_LEVEL);
        self.height
    }

    /// Set the normalized level and return the resulting absolute height.
    pub fn set_level(&mut self, normalized: f32) -> Result<f32, SimulationError> {
        if !normalized.is_finite() {
            return Err(SimulationError::InvalidWaterLevel(normalized));
        }
        self.level = normalized.clamp(0.0, 1.0);
        self.height = self.range.height_at(self.level);
        Ok(self.height)
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Normalized slider value in `[0, 1]`.
    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn range(&self) -> WaterRange {
        self.range
    }
}
