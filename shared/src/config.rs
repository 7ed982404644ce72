//! Runtime configuration of a simulation session, stored as RON.

use bevy_ecs::resource::Resource;
use bevy_log::info;
use ron::de::from_str;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::bubbles::BubbleConfig;
use crate::environment::{StarfieldSettings, TransitionSettings};
use crate::error::ConfigError;
use crate::variant::SceneVariant;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimulationConfig {
    pub variant: SceneVariant,
    pub bubbles: BubbleConfig,
    pub transition: TransitionSettings,
    pub starfield: StarfieldSettings,
    /// Fixed RNG seed for reproducible runs. Drawn from entropy when unset.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        Ok(from_str(contents)?)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty_config = PrettyConfig::new()
            .with_depth_limit(3)
            .with_separate_tuple_members(true)
            .with_enumerate_arrays(true);
        Ok(ron::ser::to_string_pretty(self, pretty_config)?)
    }
}

/// Read a config file. A missing file is not an error: defaults are used.
pub fn load_config(path: &Path) -> Result<SimulationConfig, ConfigError> {
    if !path.exists() {
        info!(
            "Simulation config not found: {}. Using defaults.",
            path.display()
        );
        return Ok(SimulationConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config = SimulationConfig::from_ron(&contents)?;
    info!("Loaded simulation config from {}", path.display());
    Ok(config)
}

pub fn save_config(config: &SimulationConfig, path: &Path) -> Result<(), ConfigError> {
    let serialized = config.to_ron()?;
    let mut file = File::create(path)?;
    file.write_all(serialized.as_bytes())?;
    info!("Simulation config saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("archimedes-no-such-config.ron");
        let config = load_config(&path).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let config = SimulationConfig {
            variant: SceneVariant::ShallowPool,
            bubbles: BubbleConfig {
                enabled: false,
                max_active: 20,
                spawn_rate: 2.5,
            },
            transition: TransitionSettings {
                steps: 30,
                duration_ms: 500,
            },
            starfield: StarfieldSettings::default(),
            seed: Some(42),
        };

        let path = std::env::temp_dir().join(format!(
            "archimedes-config-{}.ron",
            std::process::id()
        ));
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = SimulationConfig::from_ron("(variant: ShallowPool, seed: Some(7))").unwrap();
        assert_eq!(config.variant, SceneVariant::ShallowPool);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.transition, TransitionSettings::default());
        assert_eq!(config.bubbles, BubbleConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(matches!(
            SimulationConfig::from_ron("(variant: Ocean)"),
            Err(ConfigError::Ron(_))
        ));
    }
}
