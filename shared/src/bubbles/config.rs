//! Bubble emitter configuration.

use serde::{Deserialize, Serialize};

/// Compile-time bubble tuning.
pub mod constants {
    /// Default cap on simultaneously active bubbles.
    pub const MAX_ACTIVE_BUBBLES: usize = 50;

    /// Bubbles only appear once this much of the body is under water.
    pub const MIN_SUBMERGED_RATIO: f32 = 0.2;

    /// Minimum vertical speed of the body for bubbles to appear.
    pub const MOTION_THRESHOLD: f32 = 0.001;

    /// Fixed scale applied to the per-frame spawn probability.
    pub const SPAWN_PROBABILITY_SCALE: f32 = 0.05;

    /// Rise per step, drawn once per bubble.
    pub const RISE_SPEED_RANGE: (f32, f32) = (0.015, 0.04);

    /// Lifetime in seconds, drawn once per bubble.
    pub const LIFETIME_RANGE: (f32, f32) = (4.0, 7.0);

    /// Horizontal wobble amplitude, drawn once per bubble.
    pub const WOBBLE_AMPLITUDE_RANGE: (f32, f32) = (0.005, 0.02);

    /// Horizontal wobble frequency (rad/s), drawn once per bubble.
    pub const WOBBLE_FREQUENCY_RANGE: (f32, f32) = (1.5, 3.0);

    /// Bubbles fade out over this distance below the surface.
    pub const SURFACE_FADE_DISTANCE: f32 = 0.3;

    pub const BASE_OPACITY: f32 = 0.6;

    /// Vertical jitter above the body bottom at spawn.
    pub const SPAWN_JITTER: f32 = 0.1;

    /// Ring radius as a share of the body width (ring placement).
    pub const RING_RADIUS_FACTOR: f32 = 0.3;

    /// Accepted range of the user intensity knob.
    pub const SPAWN_RATE_RANGE: (f32, f32) = (0.0, 10.0);
}

/// Runtime bubble settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    /// Whether bubbles are emitted at all.
    pub enabled: bool,

    /// Upper bound on active bubbles. Spawning stops at the cap.
    pub max_active: usize,

    /// User intensity knob; scales emission linearly.
    pub spawn_rate: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_active: constants::MAX_ACTIVE_BUBBLES,
            spawn_rate: 1.0,
        }
    }
}
