//! Day/night environment: presets, the ticketed cross-fade and the starfield.

pub mod preset;
pub mod starfield;
pub mod transition;

pub use preset::{blend, EnvironmentPreset, TimeOfDay};
pub use starfield::{Star, Starfield, StarfieldSettings};
pub use transition::{
    EnvironmentTransition, ScheduledStep, TransitionEvent, TransitionScheduler, TransitionSettings,
    TransitionTicket,
};
