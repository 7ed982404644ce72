use bevy::prelude::*;

/// Order of the simulation systems within `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationUpdateSet {
    Input,
    Physics,
    Environment,
}
