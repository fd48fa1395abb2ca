//! Configuration system
//!
//! Pool sizes for a [`Gfx`](crate::Gfx) context can be loaded from `.toml` or
//! `.ron` files. Missing keys fall back to the defaults.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::gfx::ResourceKind;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// # Errors
    /// IO errors, parse errors, and extensions other than `.toml`/`.ron`.
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Serialization and IO errors, and extensions other than `.toml`/`.ron`.
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Resource pool capacities of a graphics context
///
/// Every pool has a fixed capacity. Allocating past it yields the invalid
/// handle instead of growing the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GfxConfig {
    /// Maximum number of live buffers
    pub buffer_pool_size: usize,
    /// Maximum number of live images
    pub image_pool_size: usize,
    /// Maximum number of live samplers
    pub sampler_pool_size: usize,
    /// Maximum number of live shaders
    pub shader_pool_size: usize,
    /// Maximum number of live pipelines
    pub pipeline_pool_size: usize,
    /// Maximum number of live views
    pub view_pool_size: usize,
}

impl Default for GfxConfig {
    fn default() -> Self {
        Self {
            buffer_pool_size: 128,
            image_pool_size: 128,
            sampler_pool_size: 64,
            shader_pool_size: 32,
            pipeline_pool_size: 64,
            view_pool_size: 256,
        }
    }
}

impl GfxConfig {
    /// Pool capacity configured for `kind`
    #[must_use]
    pub const fn pool_size(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Buffer => self.buffer_pool_size,
            ResourceKind::Image => self.image_pool_size,
            ResourceKind::Sampler => self.sampler_pool_size,
            ResourceKind::Shader => self.shader_pool_size,
            ResourceKind::Pipeline => self.pipeline_pool_size,
            ResourceKind::View => self.view_pool_size,
        }
    }

    /// Set the pool capacity for `kind`
    #[must_use]
    pub fn with_pool_size(mut self, kind: ResourceKind, size: usize) -> Self {
        match kind {
            ResourceKind::Buffer => self.buffer_pool_size = size,
            ResourceKind::Image => self.image_pool_size = size,
            ResourceKind::Sampler => self.sampler_pool_size = size,
            ResourceKind::Shader => self.shader_pool_size = size,
            ResourceKind::Pipeline => self.pipeline_pool_size = size,
            ResourceKind::View => self.view_pool_size = size,
        }
        self
    }
}

impl Config for GfxConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gfx.toml");
        let config = GfxConfig::default().with_pool_size(ResourceKind::Shader, 8);

        config.save_to_file(&path).unwrap();
        let loaded = GfxConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gfx.ron");
        let config = GfxConfig::default().with_pool_size(ResourceKind::View, 4);

        config.save_to_file(&path).unwrap();
        let loaded = GfxConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.view_pool_size, 4);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "buffer_pool_size = 2\n").unwrap();

        let loaded = GfxConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.buffer_pool_size, 2);
        assert_eq!(loaded.image_pool_size, GfxConfig::default().image_pool_size);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gfx.json");
        std::fs::write(&path, "{}").unwrap();

        let err = GfxConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GfxConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_pool_size_lookup() {
        let config = GfxConfig::default();
        assert_eq!(config.pool_size(ResourceKind::Buffer), 128);
        assert_eq!(config.pool_size(ResourceKind::Shader), 32);
        assert_eq!(config.pool_size(ResourceKind::View), 256);
    }
}
