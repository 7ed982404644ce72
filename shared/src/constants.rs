use bevy::math::Vec3;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.8;
/// Density of the pool water (kg/m³).
pub const WATER_DENSITY: f32 = 1000.0;
/// Time step handed to the buoyancy solver every rendered frame.
///
/// Real elapsed time is not used, so motion speed follows the frame rate.
pub const FIXED_FRAME_DT: f32 = 0.016;

pub const DEFAULT_WATER_LEVEL: f32 = 0.5;
pub const DEFAULT_DENSITY: f32 = 0.5;
/// Range of the density slider, relative to water.
pub const DENSITY_RANGE: (f32, f32) = (0.1, 3.0);

/// Where a freshly switched or reset object is placed.
pub const OBJECT_SPAWN_POSITION: Vec3 = Vec3 {
    x: 0.0,
    y: -2.0,
    z: 0.0,
};

pub const SUSPENDED_WOBBLE_BAND: (f32, f32) = (0.3, 0.9);
pub const ROTATION_DECAY: f32 = 0.95;

pub const SINK_BIAS_DENSITY_THRESHOLD: f32 = 1.5;
pub const SINK_BIAS_NUDGE: f32 = 0.05;
