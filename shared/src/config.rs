use crate::{Vec2, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

/// Simulation parameters that depend on the host display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
        }
    }
}

impl SimConfig {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Result<Self, ConfigError> {
        let config = Self {
            viewport_width,
            viewport_height,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads a config from a JSON file; missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Spawn y is drawn from [0, height - SPAWN_Y_MARGIN).
        if !(self.viewport_width > 0.0 && self.viewport_height > crate::SPAWN_Y_MARGIN) {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        Ok(())
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let config = SimConfig::default();
        assert_eq!(config.viewport_width, VIEWPORT_WIDTH);
        assert_eq!(config.viewport_height, VIEWPORT_HEIGHT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_center() {
        let config = SimConfig::new(800.0, 600.0).unwrap();
        assert_eq!(config.center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_rejects_degenerate_viewport() {
        assert!(SimConfig::new(0.0, 600.0).is_err());
        assert!(SimConfig::new(800.0, 50.0).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"viewport_width": 640.0}"#).unwrap();
        assert_eq!(config.viewport_width, 640.0);
        assert_eq!(config.viewport_height, VIEWPORT_HEIGHT);
    }

    #[test]
    fn test_from_missing_file() {
        let result = SimConfig::from_json_file("/nonexistent/fragment-catch.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
