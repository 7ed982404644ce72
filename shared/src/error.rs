use thiserror::Error;

/// Rejected user input or a numerically broken simulation step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Density must be finite and strictly positive.
    #[error("invalid density {0}: must be finite and > 0")]
    InvalidDensity(f32),
    /// Volume must be finite and strictly positive.
    #[error("invalid volume {0}: must be finite and > 0")]
    InvalidVolume(f32),
    /// Object bounds must have a finite, positive extent on every axis.
    #[error("invalid object bounds {0:?}")]
    InvalidBounds([f32; 3]),
    /// Normalized water level must be a finite number.
    #[error("invalid water level {0}")]
    InvalidWaterLevel(f32),
    /// A step produced NaN or infinity. Always a programming error.
    #[error("non-finite {quantity} after simulation step: {value}")]
    NonFinite { quantity: &'static str, value: f32 },
}

/// Failure while reading or writing a simulation config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
}

pub(crate) fn ensure_finite(quantity: &'static str, value: f32) -> Result<f32, SimulationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::NonFinite { quantity, value })
    }
}
