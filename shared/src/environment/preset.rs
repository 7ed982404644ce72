//! Day and night lighting presets and how to blend between them.

use bevy::color::Srgba;
use serde::{Deserialize, Serialize};

/// Lighting and colour values for one time of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentPreset {
    pub background: Srgba,
    pub fog: Srgba,
    pub ambient_color: Srgba,
    pub ambient_intensity: f32,
    pub directional_color: Srgba,
    pub directional_intensity: f32,
    pub sky_top: Srgba,
    pub sky_bottom: Srgba,
    /// Intensity of the pool-side lamps (0.0 = off, 1.0 = full).
    pub lamp_intensity: f32,
}

impl EnvironmentPreset {
    pub fn day() -> Self {
        Self {
            background: Srgba::rgb_u8(0xec, 0xec, 0xec),
            fog: Srgba::rgb_u8(0xec, 0xec, 0xec),
            ambient_color: Srgba::WHITE,
            ambient_intensity: 0.7,
            directional_color: Srgba::WHITE,
            directional_intensity: 0.6,
            sky_top: Srgba::rgb_u8(0x87, 0xce, 0xeb),
            sky_bottom: Srgba::rgb_u8(0xf0, 0xf8, 0xff),
            lamp_intensity: 0.0,
        }
    }

    pub fn night() -> Self {
        Self {
            background: Srgba::rgb_u8(0x0b, 0x10, 0x26),
            fog: Srgba::rgb_u8(0x0b, 0x10, 0x26),
            ambient_color: Srgba::rgb_u8(0x33, 0x44, 0x66),
            ambient_intensity: 0.2,
            directional_color: Srgba::rgb_u8(0x88, 0x99, 0xcc),
            directional_intensity: 0.15,
            sky_top: Srgba::rgb_u8(0x05, 0x08, 0x14),
            sky_bottom: Srgba::rgb_u8(0x1a, 0x23, 0x40),
            lamp_intensity: 1.0,
        }
    }
}

/// The two environment modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

impl TimeOfDay {
    pub fn toggled(self) -> Self {
        match self {
            TimeOfDay::Day => TimeOfDay::Night,
            TimeOfDay::Night => TimeOfDay::Day,
        }
    }

    pub fn preset(self) -> EnvironmentPreset {
        match self {
            TimeOfDay::Day => EnvironmentPreset::day(),
            TimeOfDay::Night => EnvironmentPreset::night(),
        }
    }

    /// Glyph on the toggle button: it shows the mode the button switches to.
    pub fn toggle_glyph(self) -> &'static str {
        match self {
            TimeOfDay::Day => "🌙",
            TimeOfDay::Night => "☀️",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            TimeOfDay::Day => "Night mode",
            TimeOfDay::Night => "Day mode",
        }
    }
}

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from * (1.0 - t) + to * t
}

fn mix(from: Srgba, to: Srgba, t: f32) -> Srgba {
    Srgba::new(
        lerp(from.red, to.red, t),
        lerp(from.green, to.green, t),
        lerp(from.blue, to.blue, t),
        lerp(from.alpha, to.alpha, t),
    )
}

#[inline]
fn ease_in(t: f32) -> f32 {
    t * t
}

#[inline]
fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Blend `from` toward `to` at `progress` (0.0 - 1.0).
///
/// Colours move linearly. Intensities follow curves that depend on the
/// direction: heading into night the sun drops early and the lamps come on
/// late; heading into day the lamps go out early and the sun rises late.
pub fn blend(
    from: &EnvironmentPreset,
    to: &EnvironmentPreset,
    progress: f32,
    heading: TimeOfDay,
) -> EnvironmentPreset {
    let p = progress.clamp(0.0, 1.0);
    let (directional_t, lamp_t) = match heading {
        TimeOfDay::Night => (ease_out(p), ease_in(p)),
        TimeOfDay::Day => (ease_in(p), ease_out(p)),
    };

    EnvironmentPreset {
        background: mix(from.background, to.background, p),
        fog: mix(from.fog, to.fog, p),
        ambient_color: mix(from.ambient_color, to.ambient_color, p),
        ambient_intensity: lerp(from.ambient_intensity, to.ambient_intensity, p),
        directional_color: mix(from.directional_color, to.directional_color, p),
        directional_intensity: lerp(from.directional_intensity, to.directional_intensity, directional_t),
        sky_top: mix(from.sky_top, to.sky_top, p),
        sky_bottom: mix(from.sky_bottom, to.sky_bottom, p),
        lamp_intensity: lerp(from.lamp_intensity, to.lamp_intensity, lamp_t),
    }
}
