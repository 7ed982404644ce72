pub mod bubbles;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod physics;
pub mod plugin;
pub mod session;
pub mod sets;
pub mod variant;
pub mod water;

pub use config::{load_config, save_config, SimulationConfig};
pub use constants::*;
pub use error::{ConfigError, SimulationError};
pub use plugin::{
    BuoyancyPlugin, EnvironmentEvent, FrameReadoutEvent, SimulationCommand, SimulationFault,
};
pub use session::{FrameReadout, SimulationSession};
pub use variant::{SceneVariant, VariantParams};
