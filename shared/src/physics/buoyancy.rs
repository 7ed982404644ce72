//! Vertical buoyancy solver for a single floating body.
//!
//! The body is treated as a box: the submerged share of its height decides how
//! much of its volume displaces water. Velocity is integrated with
//! semi-implicit Euler and damped every step, which stands in for drag.

use bevy::math::Vec3;

use super::body::FloatingBody;
use crate::error::{ensure_finite, SimulationError};
use crate::variant::{SinkBias, VariantParams};
use crate::{GRAVITY, ROTATION_DECAY, SUSPENDED_WOBBLE_BAND, WATER_DENSITY};

/// Forces acting on a body at its current position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuoyancyForces {
    /// Upward force from displaced water (N).
    pub buoyancy_force: f32,
    /// Weight of the body (N).
    pub gravity_force: f32,
    /// Share of the body height below the water line (0.0 - 1.0).
    pub submerged_ratio: f32,
}

impl BuoyancyForces {
    #[inline]
    pub fn net_force(&self) -> f32 {
        self.buoyancy_force - self.gravity_force
    }
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuoyancyStep {
    pub buoyancy_force: f32,
    pub gravity_force: f32,
    pub submerged_ratio: f32,
    pub position: Vec3,
    pub velocity: f32,
}

/// Share of a box of height `height` centred at `center_y` lying below `water_y`.
#[inline]
pub fn submerged_ratio(center_y: f32, height: f32, water_y: f32) -> f32 {
    let bottom = center_y - height / 2.0;
    if bottom >= water_y {
        return 0.0;
    }
    let depth = height.min(water_y - bottom);
    (depth / height).clamp(0.0, 1.0)
}

/// Upward force of `displaced_volume` m³ of water.
#[inline]
pub fn buoyancy_force(displaced_volume: f32) -> f32 {
    WATER_DENSITY * displaced_volume * GRAVITY
}

/// Scene-tuned buoyancy solver.
#[derive(Debug, Clone, PartialEq)]
pub struct BuoyancyModel {
    pub damping: f32,
    pub pool_bottom: f32,
    pub sink_bias: Option<SinkBias>,
}

impl BuoyancyModel {
    pub fn new(damping: f32, pool_bottom: f32) -> Self {
        Self {
            damping,
            pool_bottom,
            sink_bias: None,
        }
    }

    pub fn with_sink_bias(mut self, sink_bias: Option<SinkBias>) -> Self {
        self.sink_bias = sink_bias;
        self
    }

    /// Forces at the body's current position, without moving it.
    pub fn forces(&self, body: &FloatingBody, water_y: f32) -> BuoyancyForces {
        let mass = body.mass();
        debug_assert!(mass > 0.0, "floating body with zero mass");

        let ratio = submerged_ratio(body.position.y, body.size().y, water_y);
        BuoyancyForces {
            buoyancy_force: buoyancy_force(body.volume() * ratio),
            gravity_force: mass * GRAVITY,
            submerged_ratio: ratio,
        }
    }

    /// Advance the body by `dt` and return the forces that moved it.
    ///
    /// `time` (seconds) only drives the cosmetic wobble.
    pub fn step(
        &self,
        body: &mut FloatingBody,
        water_y: f32,
        dt: f32,
        time: f32,
    ) -> Result<BuoyancyStep, SimulationError> {
        let forces = self.forces(body, water_y);
        let half_height = body.size().y / 2.0;
        let start_y = body.position.y;

        let acceleration = forces.net_force() / body.mass();
        body.velocity += acceleration * dt;
        body.velocity *= self.damping;
        body.position.y += body.velocity * dt;

        // Inelastic contact with the pool floor
        let min_y = self.pool_bottom + half_height;
        if body.position.y < min_y {
            body.position.y = min_y;
            body.velocity = 0.0;
        }

        if let Some(bias) = &self.sink_bias {
            if body.density() > bias.density_threshold && start_y > water_y - half_height {
                body.velocity -= bias.nudge;
            }
        }

        apply_wobble(body, forces.submerged_ratio, time);

        ensure_finite("buoyancy force", forces.buoyancy_force)?;
        ensure_finite("velocity", body.velocity)?;
        ensure_finite("position", body.position.y)?;

        Ok(BuoyancyStep {
            buoyancy_force: forces.buoyancy_force,
            gravity_force: forces.gravity_force,
            submerged_ratio: forces.submerged_ratio,
            position: body.position,
            velocity: body.velocity,
        })
    }
}

impl From<&VariantParams> for BuoyancyModel {
    fn from(params: &VariantParams) -> Self {
        Self::new(params.damping, params.pool_bottom).with_sink_bias(params.sink_bias)
    }
}

/// Gentle rocking while partly submerged, settling back to level otherwise.
fn apply_wobble(body: &mut FloatingBody, ratio: f32, time: f32) {
    let (lower, upper) = SUSPENDED_WOBBLE_BAND;
    if ratio > lower && ratio < upper {
        body.rotation.y = (time * 0.8).sin() * 0.05;
        body.rotation.x = time.cos() * 0.03;
    } else {
        body.rotation *= ROTATION_DECAY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ObjectKind;
    use crate::variant::SceneVariant;
    use crate::FIXED_FRAME_DT;
    use bevy::math::Vec2;

    fn unit_body(density: f32, y: f32) -> FloatingBody {
        // 1x1x1 box, packing 0.5 -> volume 0.5
        FloatingBody::from_bounds(
            ObjectKind::Duck,
            Vec3::new(0.0, y, 0.0),
            Vec3::ONE,
            0.5,
            density,
        )
        .unwrap()
    }

    #[test]
    fn test_submerged_ratio_bounds() {
        assert_eq!(submerged_ratio(5.0, 1.0, 0.0), 0.0);
        assert_eq!(submerged_ratio(0.0, 1.0, 0.0), 0.5);
        assert_eq!(submerged_ratio(-5.0, 1.0, 0.0), 1.0);
        // Bottom exactly at the water line
        assert_eq!(submerged_ratio(0.5, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_buoyancy_force_matches_archimedes() {
        for volume in [0.0, 0.1, 0.25, 0.5, 2.0] {
            assert_eq!(buoyancy_force(volume), 1000.0 * volume * 9.8);
        }

        let model = BuoyancyModel::new(0.96, -8.0);
        let body = unit_body(0.5, 0.0);
        let forces = model.forces(&body, 0.0);
        assert_eq!(forces.submerged_ratio, 0.5);
        assert_eq!(forces.buoyancy_force, 1000.0 * (0.5 * 0.5) * 9.8);
        assert_eq!(forces.gravity_force, 250.0 * 9.8);
    }

    #[test]
    fn test_fully_submerged_net_force() {
        let model = BuoyancyModel::new(0.96, -8.0);
        let body = unit_body(0.8, -3.0);
        let forces = model.forces(&body, 0.0);

        assert_eq!(forces.submerged_ratio, 1.0);
        let expected = 1000.0 * 0.5 * GRAVITY - body.mass() * GRAVITY;
        assert!((forces.net_force() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_half_density_settles_half_submerged() {
        let model = BuoyancyModel::new(0.96, -8.0);
        let mut body = unit_body(0.5, -2.0);
        let water_y = -1.85;

        let mut last = BuoyancyStep::default();
        for frame in 0..20_000 {
            last = model
                .step(&mut body, water_y, FIXED_FRAME_DT, frame as f32 * FIXED_FRAME_DT)
                .unwrap();
        }

        assert!((last.submerged_ratio - 0.5).abs() < 0.01);
        assert!((body.position.y - water_y).abs() < 0.01);
        assert!(last.velocity.abs() < 1e-3);
    }

    #[test]
    fn test_dense_body_rests_on_floor() {
        let model = BuoyancyModel::from(&SceneVariant::DeepPool.to_params());
        let mut body = unit_body(2.0, -2.0);
        let water_y = -1.85;

        for frame in 0..5_000 {
            model
                .step(&mut body, water_y, FIXED_FRAME_DT, frame as f32 * FIXED_FRAME_DT)
                .unwrap();
        }
        assert_eq!(body.position.y, -8.0 + 0.5);
        assert_eq!(body.velocity, 0.0);

        for frame in 0..100 {
            let step = model
                .step(&mut body, water_y, FIXED_FRAME_DT, frame as f32)
                .unwrap();
            assert_eq!(step.velocity, 0.0);
            assert_eq!(step.position.y, -7.5);
        }
    }

    #[test]
    fn test_sink_bias_applies_only_when_enabled() {
        let params = SceneVariant::DeepPool.to_params();
        let biased = BuoyancyModel::from(&params);
        let plain = BuoyancyModel::from(&params).with_sink_bias(None);

        // Dense body floating high above the water
        let mut a = unit_body(2.0, 0.0);
        let mut b = a.clone();
        let water_y = -2.0;

        let with_bias = biased.step(&mut a, water_y, FIXED_FRAME_DT, 0.0).unwrap();
        let without = plain.step(&mut b, water_y, FIXED_FRAME_DT, 0.0).unwrap();

        assert!((with_bias.velocity - (without.velocity - 0.05)).abs() < 1e-6);
    }

    #[test]
    fn test_sink_bias_ignored_below_density_threshold() {
        let model = BuoyancyModel::from(&SceneVariant::DeepPool.to_params());
        let plain = model.clone().with_sink_bias(None);
        let mut a = unit_body(1.2, 0.0);
        let mut b = a.clone();

        let s1 = model.step(&mut a, -2.0, FIXED_FRAME_DT, 0.0).unwrap();
        let s2 = plain.step(&mut b, -2.0, FIXED_FRAME_DT, 0.0).unwrap();
        assert_eq!(s1.velocity, s2.velocity);
    }

    #[test]
    fn test_wobble_inside_band_and_decay_outside() {
        let model = BuoyancyModel::new(0.96, -8.0);

        let mut body = unit_body(0.5, 0.0);
        model.step(&mut body, 0.0, FIXED_FRAME_DT, 2.0).unwrap();
        assert!((body.rotation.y - (1.6f32).sin() * 0.05).abs() < 1e-6);
        assert!((body.rotation.x - (2.0f32).cos() * 0.03).abs() < 1e-6);

        // Well above the water: rotation decays
        let mut dry = unit_body(0.5, 10.0);
        dry.rotation = Vec2::new(0.1, 0.2);
        model.step(&mut dry, 0.0, FIXED_FRAME_DT, 2.0).unwrap();
        assert!((dry.rotation.x - 0.095).abs() < 1e-6);
        assert!((dry.rotation.y - 0.19).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_state_is_reported() {
        let model = BuoyancyModel::new(0.96, -8.0);
        let mut body = unit_body(0.5, 0.0);
        body.velocity = f32::NAN;

        let err = model.step(&mut body, 0.0, FIXED_FRAME_DT, 0.0).unwrap_err();
        assert!(matches!(err, SimulationError::NonFinite { .. }));
    }
}
