use bevy::math::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Size of the night sky.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldSettings {
    pub star_count: usize,
    /// Radius of the sky dome the stars sit on.
    pub radius: f32,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        Self {
            star_count: 800,
            radius: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub brightness: f32,
}

/// Stars scattered over the upper hemisphere. Built when night falls and
/// dropped at daybreak.
#[derive(Debug, Clone, PartialEq)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn generate(settings: &StarfieldSettings, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..settings.star_count)
            .map(|_| {
                let azimuth = rng.gen_range(0.0..TAU);
                // Angle from the zenith, above the horizon only
                let polar = rng.gen_range(0.0..FRAC_PI_2);
                let (sin_polar, cos_polar) = polar.sin_cos();
                let (sin_az, cos_az) = azimuth.sin_cos();
                Star {
                    position: Vec3::new(
                        settings.radius * sin_polar * cos_az,
                        settings.radius * cos_polar,
                        settings.radius * sin_polar * sin_az,
                    ),
                    brightness: rng.gen_range(0.4..1.0),
                }
            })
            .collect();

        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_on_upper_dome() {
        let settings = StarfieldSettings {
            star_count: 200,
            radius: 50.0,
        };
        let field = Starfield::generate(&settings, 3);

        assert_eq!(field.len(), 200);
        for star in field.stars() {
            assert!((star.position.length() - 50.0).abs() < 1e-2);
            assert!(star.position.y >= 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_sky() {
        let settings = StarfieldSettings::default();
        assert_eq!(
            Starfield::generate(&settings, 9),
            Starfield::generate(&settings, 9)
        );
    }
}
