//! Renderer configuration
//!
//! Configuration for the scene renderer: culling behavior, shadow-map
//! extents, and light-count limits. Values can come from a TOML file or
//! from `Default`, and are validated before use.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors produced while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error while reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or type error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Structurally valid config with out-of-range values
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Scene renderer configuration
///
/// All fields have defaults, so a partial (or empty) TOML document is a
/// valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Enable frustum culling of objects in the main pass
    pub enable_frustum_culling: bool,

    /// Half-width and half-height of the sun's orthographic shadow box,
    /// in world units
    pub shadow_extent: f32,

    /// Half-depth of the sun's orthographic shadow box, in world units
    pub shadow_depth: f32,

    /// Soft cap on point lights; exceeding it logs a warning
    pub max_point_lights: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enable_frustum_culling: true,
            shadow_extent: 128.0,
            shadow_depth: 1024.0,
            max_point_lights: 64,
        }
    }
}

impl RendererConfig {
    /// Parse a configuration from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shadow_extent <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "shadow_extent must be positive, got {}",
                self.shadow_extent
            )));
        }
        if self.shadow_depth <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "shadow_depth must be positive, got {}",
                self.shadow_depth
            )));
        }
        Ok(())
    }
}
