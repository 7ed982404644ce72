use serde::{Deserialize, Serialize};

use crate::variant::ClassifierThresholds;

/// What the object is visibly doing in the water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectStatus {
    /// Buoyancy (nearly) outweighs gravity.
    Floating,
    /// Partly submerged without a net rising force.
    Suspended,
    Sunk,
}

impl ObjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ObjectStatus::Floating => "Floating",
            ObjectStatus::Suspended => "Suspended",
            ObjectStatus::Sunk => "Sunk",
        }
    }

    /// Label used by the Indonesian classroom display.
    pub fn label_id(&self) -> &'static str {
        match self {
            ObjectStatus::Floating => "Mengapung",
            ObjectStatus::Suspended => "Melayang",
            ObjectStatus::Sunk => "Tenggelam",
        }
    }
}

impl std::fmt::Display for ObjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a force reading. The floating check runs first and wins ties.
pub fn classify(
    buoyancy_force: f32,
    gravity_force: f32,
    submerged_ratio: f32,
    thresholds: &ClassifierThresholds,
) -> ObjectStatus {
    let (lower, upper) = thresholds.suspended_band;
    if buoyancy_force > gravity_force * thresholds.floating_factor {
        ObjectStatus::Floating
    } else if submerged_ratio > lower && submerged_ratio < upper {
        ObjectStatus::Suspended
    } else {
        ObjectStatus::Sunk
    }
}
