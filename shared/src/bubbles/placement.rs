//! Where new bubbles appear, per object shape.

use bevy::math::{bounding::Aabb3d, Vec3};
use rand::{rngs::StdRng, Rng};
use std::collections::HashMap;
use std::f32::consts::TAU;

use super::config::constants::{RING_RADIUS_FACTOR, SPAWN_JITTER};
use crate::physics::ObjectKind;

/// Strategy choosing a bubble origin from the body bounds.
pub trait BubblePlacement: Send + Sync {
    fn name(&self) -> &'static str;

    fn emit_origin(&self, bounds: &Aabb3d, rng: &mut StdRng) -> Vec3;
}

#[inline]
fn jittered_bottom(bounds: &Aabb3d, rng: &mut StdRng) -> f32 {
    bounds.min.y + rng.gen_range(0.0..SPAWN_JITTER)
}

/// Ring around the centre of the footprint. Suits round hulls like the duck.
#[derive(Debug, Clone, Copy)]
pub struct RingPlacement {
    /// Ring radius as a share of the body width (X extent).
    pub radius_factor: f32,
}

impl Default for RingPlacement {
    fn default() -> Self {
        Self {
            radius_factor: RING_RADIUS_FACTOR,
        }
    }
}

impl BubblePlacement for RingPlacement {
    fn name(&self) -> &'static str {
        "ring"
    }

    fn emit_origin(&self, bounds: &Aabb3d, rng: &mut StdRng) -> Vec3 {
        let width = bounds.max.x - bounds.min.x;
        let radius = width * self.radius_factor;
        let center_x = (bounds.min.x + bounds.max.x) / 2.0;
        let center_z = (bounds.min.z + bounds.max.z) / 2.0;
        let angle = rng.gen_range(0.0..TAU);
        let (sin, cos) = angle.sin_cos();

        Vec3::new(
            center_x + cos * radius,
            jittered_bottom(bounds, rng),
            center_z + sin * radius,
        )
    }
}

/// Anywhere inside the footprint rectangle. Suits long hulls like the ship.
#[derive(Debug, Clone, Copy, Default)]
pub struct FootprintPlacement;

impl BubblePlacement for FootprintPlacement {
    fn name(&self) -> &'static str {
        "footprint"
    }

    fn emit_origin(&self, bounds: &Aabb3d, rng: &mut StdRng) -> Vec3 {
        let x = if bounds.max.x > bounds.min.x {
            rng.gen_range(bounds.min.x..bounds.max.x)
        } else {
            bounds.min.x
        };
        let z = if bounds.max.z > bounds.min.z {
            rng.gen_range(bounds.min.z..bounds.max.z)
        } else {
            bounds.min.z
        };

        Vec3::new(x, jittered_bottom(bounds, rng), z)
    }
}

/// Placement lookup by object kind. Unregistered kinds use the footprint.
pub struct PlacementRegistry {
    strategies: HashMap<ObjectKind, Box<dyn BubblePlacement>>,
    fallback: FootprintPlacement,
}

impl PlacementRegistry {
    /// Registry with no entries; everything uses the footprint.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
            fallback: FootprintPlacement,
        }
    }

    pub fn register(&mut self, kind: ObjectKind, strategy: impl BubblePlacement + 'static) {
        self.strategies.insert(kind, Box::new(strategy));
    }

    pub fn get(&self, kind: ObjectKind) -> &dyn BubblePlacement {
        match self.strategies.get(&kind) {
            Some(strategy) => strategy.as_ref(),
            None => &self.fallback,
        }
    }
}

impl Default for PlacementRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ObjectKind::Duck, RingPlacement::default());
        registry
    }
}

impl std::fmt::Debug for PlacementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (kind, strategy) in &self.strategies {
            map.entry(kind, &strategy.name());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn bounds() -> Aabb3d {
        Aabb3d::new(Vec3::new(1.0, -2.0, 0.5), Vec3::new(1.0, 0.5, 2.0))
    }

    #[test]
    fn test_ring_origin_on_ring() {
        let mut rng = StdRng::seed_from_u64(7);
        let aabb = bounds();
        for _ in 0..100 {
            let origin = RingPlacement::default().emit_origin(&aabb, &mut rng);
            let distance = ((origin.x - 1.0).powi(2) + (origin.z - 0.5).powi(2)).sqrt();
            assert!((distance - 0.6).abs() < 1e-4);
            assert!(origin.y >= -2.5 && origin.y <= -2.4);
        }
    }

    #[test]
    fn test_footprint_origin_inside_rectangle() {
        let mut rng = StdRng::seed_from_u64(11);
        let aabb = bounds();
        for _ in 0..100 {
            let origin = FootprintPlacement.emit_origin(&aabb, &mut rng);
            assert!(origin.x >= 0.0 && origin.x < 2.0);
            assert!(origin.z >= -1.5 && origin.z < 2.5);
            assert!(origin.y >= -2.5 && origin.y <= -2.4);
        }
    }

    #[test]
    fn test_registry_defaults() {
        let registry = PlacementRegistry::default();
        assert_eq!(registry.get(ObjectKind::Duck).name(), "ring");
        assert_eq!(registry.get(ObjectKind::Ship).name(), "footprint");
        assert_eq!(PlacementRegistry::empty().get(ObjectKind::Duck).name(), "footprint");
    }
}
