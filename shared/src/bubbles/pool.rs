//! Pooled bubble particles rising from the submerged part of the body.

use bevy::math::{Vec2, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::config::{constants::*, BubbleConfig};
use super::placement::PlacementRegistry;
use crate::physics::FloatingBody;

/// A single bubble. Either active (simulated, visible) or waiting in the pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bubble {
    pub position: Vec3,
    /// X/Z point the wobble oscillates around
    anchor: Vec2,
    pub rise_speed: f32,
    wobble_phase: f32,
    wobble_amplitude: f32,
    wobble_frequency: f32,
    pub age: f32,
    pub max_lifetime: f32,
    pub opacity: f32,
    pub visible: bool,
}

impl Bubble {
    /// Reset every per-bubble parameter for a new life starting at `origin`.
    fn launch(&mut self, origin: Vec3, rng: &mut StdRng) {
        self.position = origin;
        self.anchor = Vec2::new(origin.x, origin.z);
        self.rise_speed = rng.gen_range(RISE_SPEED_RANGE.0..RISE_SPEED_RANGE.1);
        self.wobble_phase = rng.gen_range(0.0..std::f32::consts::TAU);
        self.wobble_amplitude = rng.gen_range(WOBBLE_AMPLITUDE_RANGE.0..WOBBLE_AMPLITUDE_RANGE.1);
        self.wobble_frequency = rng.gen_range(WOBBLE_FREQUENCY_RANGE.0..WOBBLE_FREQUENCY_RANGE.1);
        self.age = 0.0;
        self.max_lifetime = rng.gen_range(LIFETIME_RANGE.0..LIFETIME_RANGE.1);
        self.opacity = BASE_OPACITY;
        self.visible = true;
    }

    /// Move one step. Returns `true` when the bubble has reached the surface
    /// or outlived its lifetime.
    fn advance(&mut self, dt: f32, water_y: f32, time: f32) -> bool {
        self.position.y += self.rise_speed;
        let (sin, cos) = (time * self.wobble_frequency + self.wobble_phase).sin_cos();
        self.position.x = self.anchor.x + sin * self.wobble_amplitude;
        self.position.z = self.anchor.y + cos * self.wobble_amplitude;
        self.age += dt;

        if self.position.y >= water_y || self.age >= self.max_lifetime {
            return true;
        }

        let depth = water_y - self.position.y;
        if depth < SURFACE_FADE_DISTANCE {
            self.opacity = BASE_OPACITY * depth / SURFACE_FADE_DISTANCE;
        }
        false
    }

    fn deactivate(&mut self) {
        self.visible = false;
        self.opacity = 0.0;
    }
}

/// What happened to the bubbles during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BubbleFrameStats {
    pub spawned: bool,
    pub expired: usize,
}

/// Bubble emitter with a reuse pool.
///
/// Every bubble ever allocated is held in exactly one of `active` and
/// `pooled`, and `active.len()` never exceeds the configured cap.
#[derive(Debug)]
pub struct BubbleParticleSystem {
    config: BubbleConfig,
    active: Vec<Bubble>,
    pooled: Vec<Bubble>,
    allocated: usize,
    placements: PlacementRegistry,
    rng: StdRng,
}

impl BubbleParticleSystem {
    pub fn new(config: BubbleConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            active: Vec::new(),
            pooled: Vec::new(),
            allocated: 0,
            placements: PlacementRegistry::default(),
            rng,
        }
    }

    pub fn with_placements(mut self, placements: PlacementRegistry) -> Self {
        self.placements = placements;
        self
    }

    pub fn config(&self) -> &BubbleConfig {
        &self.config
    }

    /// Set the intensity knob, clamped to its accepted range.
    pub fn set_spawn_rate(&mut self, rate: f32) {
        if rate.is_finite() {
            self.config.spawn_rate = rate.clamp(SPAWN_RATE_RANGE.0, SPAWN_RATE_RANGE.1);
        }
    }

    pub fn active(&self) -> &[Bubble] {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn pooled_count(&self) -> usize {
        self.pooled.len()
    }

    /// Number of bubble instances ever created.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Activate a bubble at `origin`, reusing a pooled one when possible.
    ///
    /// Returns `false` when the active cap is reached; nothing is queued.
    pub fn spawn(&mut self, origin: Vec3) -> bool {
        if self.active.len() >= self.config.max_active {
            return false;
        }

        let mut bubble = match self.pooled.pop() {
            Some(bubble) => bubble,
            None => {
                self.allocated += 1;
                Bubble::default()
            }
        };
        bubble.launch(origin, &mut self.rng);
        self.active.push(bubble);
        true
    }

    /// Rise, wobble, age and fade every active bubble; return expired ones to
    /// the pool. Returns the number of bubbles deactivated.
    pub fn advance(&mut self, dt: f32, water_y: f32, time: f32) -> usize {
        let mut expired = 0;
        let mut i = 0;
        while i < self.active.len() {
            if self.active[i].advance(dt, water_y, time) {
                let mut bubble = self.active.swap_remove(i);
                bubble.deactivate();
                self.pooled.push(bubble);
                expired += 1;
            } else {
                i += 1;
            }
        }
        expired
    }

    /// Per-frame entry point: maybe emit one bubble from the body, then
    /// advance all active bubbles.
    pub fn spawn_and_advance(
        &mut self,
        body: &FloatingBody,
        submerged_ratio: f32,
        water_y: f32,
        dt: f32,
        time: f32,
    ) -> BubbleFrameStats {
        let spawned = self.try_emit(body, submerged_ratio);
        let expired = self.advance(dt, water_y, time);
        BubbleFrameStats { spawned, expired }
    }

    fn try_emit(&mut self, body: &FloatingBody, submerged_ratio: f32) -> bool {
        if !self.config.enabled {
            return false;
        }
        let speed = body.velocity.abs();
        if submerged_ratio <= MIN_SUBMERGED_RATIO || speed <= MOTION_THRESHOLD {
            return false;
        }

        let probability = self.config.spawn_rate
            * submerged_ratio
            * (speed * 10.0).min(1.0)
            * SPAWN_PROBABILITY_SCALE;
        if self.rng.gen::<f32>() >= probability {
            return false;
        }

        let origin = self
            .placements
            .get(body.kind)
            .emit_origin(&body.aabb(), &mut self.rng);
        self.spawn(origin)
    }

    /// Send every active bubble back to the pool.
    pub fn recycle_all(&mut self) {
        let count = self.active.len();
        for mut bubble in self.active.drain(..) {
            bubble.deactivate();
            self.pooled.push(bubble);
        }
        if count > 0 {
            log::debug!("Recycled {} active bubbles into the pool", count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubbles::BubblePlacement;
    use crate::physics::ObjectKind;
    use bevy::math::bounding::Aabb3d;

    fn system(max_active: usize) -> BubbleParticleSystem {
        BubbleParticleSystem::new(
            BubbleConfig {
                max_active,
                ..BubbleConfig::default()
            },
            Some(42),
        )
    }

    fn moving_body(kind: ObjectKind, velocity: f32) -> FloatingBody {
        let mut body =
            FloatingBody::from_bounds(kind, Vec3::new(0.0, -3.0, 0.0), Vec3::ONE, 0.5, 0.5)
                .unwrap();
        body.velocity = velocity;
        body
    }

    #[test]
    fn test_spawn_reuses_pooled_bubble() {
        let mut bubbles = system(10);
        assert!(bubbles.spawn(Vec3::new(0.0, -3.0, 0.0)));
        assert_eq!(bubbles.allocated(), 1);

        // Past the surface: expires on the next step
        bubbles.advance(0.016, -3.5, 0.0);
        assert_eq!(bubbles.active_count(), 0);
        assert_eq!(bubbles.pooled_count(), 1);

        assert!(bubbles.spawn(Vec3::new(0.0, -3.0, 0.0)));
        assert_eq!(bubbles.allocated(), 1);
        assert_eq!(bubbles.pooled_count(), 0);
        assert!(bubbles.active()[0].visible);
    }

    #[test]
    fn test_spawn_suppressed_at_cap() {
        let mut bubbles = system(3);
        for _ in 0..3 {
            assert!(bubbles.spawn(Vec3::ZERO));
        }
        assert!(!bubbles.spawn(Vec3::ZERO));
        assert_eq!(bubbles.active_count(), 3);
        assert_eq!(bubbles.allocated(), 3);
    }

    #[test]
    fn test_expired_by_age_regardless_of_position() {
        let mut bubbles = system(5);
        bubbles.spawn(Vec3::new(0.0, -100.0, 0.0));
        let lifetime = bubbles.active()[0].max_lifetime;
        assert!((4.0..7.0).contains(&lifetime));

        // One step longer than the lifetime, still far below the surface
        let expired = bubbles.advance(lifetime + 0.01, 0.0, 0.0);
        assert_eq!(expired, 1);
        assert_eq!(bubbles.active_count(), 0);
        assert_eq!(bubbles.pooled_count(), 1);
    }

    #[test]
    fn test_bubble_fades_near_surface() {
        let mut bubbles = system(5);
        bubbles.spawn(Vec3::new(0.0, -0.25, 0.0));
        bubbles.advance(0.016, 0.0, 0.0);

        let bubble = &bubbles.active()[0];
        assert!(bubble.opacity < BASE_OPACITY);
        assert!(bubble.opacity > 0.0);
    }

    #[test]
    fn test_bubble_rises_and_wobbles() {
        let mut bubbles = system(5);
        bubbles.spawn(Vec3::new(1.0, -5.0, 2.0));
        let speed = bubbles.active()[0].rise_speed;
        assert!((0.015..0.04).contains(&speed));

        bubbles.advance(0.016, 0.0, 1.0);
        let bubble = &bubbles.active()[0];
        assert!((bubble.position.y - (-5.0 + speed)).abs() < 1e-6);
        assert!((bubble.position.x - 1.0).abs() <= 0.02);
        assert!((bubble.position.z - 2.0).abs() <= 0.02);
    }

    #[test]
    fn test_no_spawn_when_gated() {
        let mut bubbles = system(50);
        let still = moving_body(ObjectKind::Duck, 0.0);
        let shallow = moving_body(ObjectKind::Duck, 1.0);

        for frame in 0..1_000 {
            bubbles.spawn_and_advance(&still, 1.0, 0.0, 0.016, frame as f32);
            bubbles.spawn_and_advance(&shallow, 0.2, 0.0, 0.016, frame as f32);
        }
        assert_eq!(bubbles.allocated(), 0);
    }

    #[test]
    fn test_spawn_rate_scales_emission() {
        let body = moving_body(ObjectKind::Ship, 1.0);
        let mut quiet = system(1_000);
        quiet.set_spawn_rate(0.0);
        let mut busy = system(1_000);
        busy.set_spawn_rate(10.0);

        let mut spawned = 0;
        for frame in 0..200 {
            quiet.spawn_and_advance(&body, 1.0, 10.0, 0.0, frame as f32);
            if busy.spawn_and_advance(&body, 1.0, 10.0, 0.0, frame as f32).spawned {
                spawned += 1;
            }
        }
        assert_eq!(quiet.allocated(), 0);
        // Probability 0.5 per frame
        assert!(spawned > 50 && spawned < 150);
    }

    #[test]
    fn test_pool_invariants_over_many_cycles() {
        let mut bubbles = system(50);
        let body = moving_body(ObjectKind::Duck, 0.5);
        bubbles.set_spawn_rate(10.0);

        let mut previous_total = 0;
        for frame in 0..5_000 {
            let time = frame as f32 * 0.016;
            bubbles.spawn_and_advance(&body, 0.8, -2.0, 0.016, time);

            let total = bubbles.active_count() + bubbles.pooled_count();
            assert!(bubbles.active_count() <= 50);
            assert!(total >= previous_total);
            assert_eq!(total, bubbles.allocated());
            assert!(bubbles.active().iter().all(|b| b.visible));
            previous_total = total;
        }
        assert!(bubbles.pooled_count() > 0);
    }

    #[derive(Debug)]
    struct FixedPlacement(Vec3);

    impl BubblePlacement for FixedPlacement {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn emit_origin(&self, _bounds: &Aabb3d, _rng: &mut StdRng) -> Vec3 {
            self.0
        }
    }

    #[test]
    fn test_custom_placement_is_used_for_its_kind() {
        let mut placements = PlacementRegistry::empty();
        placements.register(ObjectKind::Duck, FixedPlacement(Vec3::new(9.0, -3.0, -4.0)));
        let mut bubbles = system(50).with_placements(placements);
        bubbles.set_spawn_rate(10.0);
        let body = moving_body(ObjectKind::Duck, 1.0);

        for frame in 0..200 {
            bubbles.spawn_and_advance(&body, 1.0, 10.0, 0.0, frame as f32);
        }

        assert!(bubbles.active_count() > 0);
        for bubble in bubbles.active() {
            assert!((bubble.position.x - 9.0).abs() <= 0.02);
            assert!((bubble.position.z - (-4.0)).abs() <= 0.02);
        }
    }

    #[test]
    fn test_unregistered_kind_falls_back_to_footprint() {
        let mut placements = PlacementRegistry::empty();
        placements.register(ObjectKind::Duck, FixedPlacement(Vec3::new(9.0, -3.0, -4.0)));
        let mut bubbles = system(50).with_placements(placements);
        bubbles.set_spawn_rate(10.0);
        let ship = moving_body(ObjectKind::Ship, 1.0);

        for frame in 0..200 {
            bubbles.spawn_and_advance(&ship, 1.0, 10.0, 0.0, frame as f32);
        }

        assert!(bubbles.active_count() > 0);
        // Unit box centred on the origin
        for bubble in bubbles.active() {
            assert!(bubble.position.x.abs() <= 0.52);
            assert!(bubble.position.z.abs() <= 0.52);
        }
    }

    #[test]
    fn test_recycle_all() {
        let mut bubbles = system(5);
        bubbles.spawn(Vec3::ZERO);
        bubbles.spawn(Vec3::ZERO);
        bubbles.recycle_all();

        assert_eq!(bubbles.active_count(), 0);
        assert_eq!(bubbles.pooled_count(), 2);
    }
}
