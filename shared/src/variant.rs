//! Per-scene tuning of the pool simulation.
//!
//! Every scene shares the same force law; what differs between them is the
//! pool geometry, how strongly motion is damped, where the status thresholds
//! sit and how much of an object's bounding box counts as displaced volume.

use serde::{Deserialize, Serialize};

use crate::physics::ObjectKind;

/// Policy that pushes a very dense object down while it still pokes out of
/// the water.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinkBias {
    /// Relative density above which the nudge applies.
    pub density_threshold: f32,
    /// Velocity removed per step.
    pub nudge: f32,
}

impl Default for SinkBias {
    fn default() -> Self {
        Self {
            density_threshold: crate::SINK_BIAS_DENSITY_THRESHOLD,
            nudge: crate::SINK_BIAS_NUDGE,
        }
    }
}

/// Status thresholds used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierThresholds {
    /// Buoyancy must exceed `gravity * floating_factor` to count as floating.
    pub floating_factor: f32,
    /// Open submersion band for the suspended state (lower, upper).
    pub suspended_band: (f32, f32),
}

/// Complete set of scene constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantParams {
    /// Water height at slider 0.0.
    pub water_min_y: f32,
    /// Water height at slider 1.0.
    pub water_max_y: f32,
    /// Y of the pool floor.
    pub pool_bottom: f32,
    /// Per-step velocity multiplier (linear drag).
    pub damping: f32,
    pub thresholds: ClassifierThresholds,
    /// Fraction of the bounding box volume that displaces water.
    pub duck_packing: f32,
    pub ship_packing: f32,
    pub sink_bias: Option<SinkBias>,
}

impl VariantParams {
    pub fn packing(&self, kind: ObjectKind) -> f32 {
        match kind {
            ObjectKind::Duck => self.duck_packing,
            ObjectKind::Ship => self.ship_packing,
        }
    }
}

/// Known scene layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SceneVariant {
    /// Very deep pool, stronger damping, sink bias enabled.
    #[default]
    DeepPool,
    /// Shallow pool with lighter damping and a wider floating threshold.
    ShallowPool,
}

impl SceneVariant {
    pub fn to_params(self) -> VariantParams {
        match self {
            SceneVariant::DeepPool => VariantParams {
                water_min_y: -2.8,
                water_max_y: -0.9,
                pool_bottom: -8.0,
                damping: 0.96,
                thresholds: ClassifierThresholds {
                    floating_factor: 0.98,
                    suspended_band: (0.3, 0.85),
                },
                duck_packing: 0.6,
                ship_packing: 0.6,
                sink_bias: Some(SinkBias::default()),
            },
            SceneVariant::ShallowPool => VariantParams {
                water_min_y: -2.2,
                water_max_y: -0.6,
                pool_bottom: -3.5,
                damping: 0.98,
                thresholds: ClassifierThresholds {
                    floating_factor: 0.95,
                    suspended_band: (0.4, 0.8),
                },
                duck_packing: 0.5,
                ship_packing: 0.55,
                sink_bias: None,
            },
        }
    }
}
