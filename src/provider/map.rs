//! Snapshot provider backed by a hash map.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::value::Value;
use crate::error::ProviderError;
use crate::provider::{check_key, properties, toml_source, DataProvider};

/// Provider over a private copy of a key/value mapping.
///
/// Later changes to the mapping the provider was built from are not
/// observed.
#[derive(Debug, Clone, Default)]
pub struct MapProvider {
    entries: HashMap<String, Value>,
    name: String,
}

impl MapProvider {
    /// Copy `entries` into a new provider.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        MapProvider {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            name: "map".to_string(),
        }
    }

    /// An empty provider.
    pub fn empty() -> Self {
        MapProvider::new(std::iter::empty::<(String, Value)>())
    }

    /// Set the name shown in log output.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Parse `.properties` text.
    pub fn from_properties_str(text: &str) -> Result<Self, ProviderError> {
        let entries = properties::parse(text)?;
        Ok(MapProvider::new(entries).with_name("properties"))
    }

    /// Load a `.properties` file.
    pub fn load_properties(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read properties file: {}", path.display()))?;

        let provider = Self::from_properties_str(&contents)
            .with_context(|| format!("failed to parse properties file: {}", path.display()))?;

        Ok(provider.with_name(path.display().to_string()))
    }

    /// Parse a TOML document, flattening nested tables into dotted keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ProviderError> {
        let entries = toml_source::flatten_str(text)?;
        Ok(MapProvider::new(entries).with_name("toml"))
    }

    /// Load a TOML file, flattening nested tables into dotted keys.
    pub fn load_toml(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read TOML file: {}", path.display()))?;

        let provider = Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse TOML file: {}", path.display()))?;

        Ok(provider.with_name(path.display().to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl DataProvider for MapProvider {
    fn has(&self, key: &str) -> bool {
        check_key(key);
        self.entries.contains_key(key)
    }

    fn raw_value(&self, key: &str) -> Option<Value> {
        check_key(key);
        self.entries.get(key).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
