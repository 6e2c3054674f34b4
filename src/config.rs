//! Renderer configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! [templates]
//! cache = true
//! capacity = 512
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Template cache capacity must be at least 1")]
    ZeroCapacity,
}

/// Configuration for a [`Renderer`](crate::Renderer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Keep parsed templates keyed by their text
    pub cache_templates: bool,
    /// Most templates kept before the cache is cleared
    pub cache_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cache_templates: false,
            cache_capacity: 256,
        }
    }
}

/// TOML file structure
#[derive(Debug, Deserialize)]
struct TomlConfig {
    templates: Option<TomlTemplates>,
}

#[derive(Debug, Deserialize)]
struct TomlTemplates {
    cache: Option<bool>,
    capacity: Option<usize>,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the parsed-template cache
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_templates = enabled;
        self
    }

    /// Set the template cache capacity
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    ///
    /// Missing keys keep their defaults.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(templates) = parsed.templates {
            if let Some(cache) = templates.cache {
                config.cache_templates = cache;
            }
            if let Some(capacity) = templates.capacity {
                if capacity == 0 {
                    return Err(ConfigError::ZeroCapacity);
                }
                config.cache_capacity = capacity;
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::new();
        assert!(!config.cache_templates);
        assert_eq!(config.cache_capacity, 256);
    }

    #[test]
    fn test_builder() {
        let config = RenderConfig::new().with_cache(true).with_cache_capacity(8);
        assert!(config.cache_templates);
        assert_eq!(config.cache_capacity, 8);
    }

    #[test]
    fn test_from_str() {
        let config = RenderConfig::from_str("[templates]\ncache = true\ncapacity = 16\n").unwrap();
        assert_eq!(config, RenderConfig::new().with_cache(true).with_cache_capacity(16));
    }

    #[test]
    fn test_from_str_empty_keeps_defaults() {
        assert_eq!(RenderConfig::from_str("").unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_from_str_errors() {
        assert!(matches!(
            RenderConfig::from_str("[templates]\ncapacity = 0\n"),
            Err(ConfigError::ZeroCapacity)
        ));
        assert!(matches!(
            RenderConfig::from_str("[templates]\ncache = \"yes\"\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let err = RenderConfig::from_file(Path::new("/nonexistent/label.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
