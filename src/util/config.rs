//! Engine configuration.
//!
//! The binding engine reads its own tuning from TOML, in two optional
//! locations:
//! - Global: `~/.propbind/config.toml` - User-wide defaults
//! - Project: `.propbind/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default number of cached results per accessor.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Binding engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Result cache settings
    pub cache: CacheConfig,

    /// Translation settings
    pub translation: TranslationConfig,
}

/// Result cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache zero-argument results
    pub enabled: bool,

    /// Entries kept per accessor before the oldest is dropped
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Effective capacity; zero when caching is disabled.
    pub fn effective_capacity(&self) -> usize {
        if self.enabled {
            self.capacity
        } else {
            0
        }
    }
}

/// Translation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Substitute call arguments into `{n}` placeholders of text values
    pub templating: bool,

    /// Also run templating for calls without arguments. Turn off to read
    /// zero-argument text verbatim
    pub templating_without_args: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            templating: true,
            templating_without_args: true,
        }
    }
}

/// Partial configuration as written in a file. Unset fields leave the
/// lower-precedence value untouched when merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub cache: CacheLayer,
    pub translation: TranslationLayer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheLayer {
    pub enabled: Option<bool>,
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationLayer {
    pub templating: Option<bool>,
    pub templating_without_args: Option<bool>,
}

impl ConfigLayer {
    /// Load a configuration layer from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load a layer, falling back to an empty one if the file is missing or
    /// broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}

impl EngineConfig {
    /// Load a complete configuration from a file, defaults filling the gaps.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = EngineConfig::default();
        config.merge(ConfigLayer::load(path)?);
        Ok(config)
    }

    /// Parse a complete configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let layer: ConfigLayer = toml::from_str(text).context("failed to parse config")?;
        let mut config = EngineConfig::default();
        config.merge(layer);
        Ok(config)
    }

    /// Merge a layer into this config (the layer takes precedence).
    pub fn merge(&mut self, layer: ConfigLayer) {
        if let Some(enabled) = layer.cache.enabled {
            self.cache.enabled = enabled;
        }
        if let Some(capacity) = layer.cache.capacity {
            self.cache.capacity = capacity;
        }
        if let Some(templating) = layer.translation.templating {
            self.translation.templating = templating;
        }
        if let Some(without_args) = layer.translation.templating_without_args {
            self.translation.templating_without_args = without_args;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.propbind/config.toml)
/// 2. Global config (~/.propbind/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> EngineConfig {
    let mut config = EngineConfig::default();

    config.merge(ConfigLayer::load_or_default(global_path));
    config.merge(ConfigLayer::load_or_default(project_path));

    config
}

/// Get the global config path (~/.propbind/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".propbind").join("config.toml"))
}

/// Get the project config path (.propbind/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".propbind").join("config.toml")
}
