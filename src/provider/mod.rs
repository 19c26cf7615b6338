//! Data providers: the string-keyed sources accessors read from.
//!
//! A provider exposes exactly two operations, [`DataProvider::has`] and
//! [`DataProvider::raw_value`]. Callers must check `has` first; a provider
//! is free to return anything from `raw_value` for a key it does not have.
//!
//! - [`MapProvider`] - immutable snapshot of a key/value mapping, also
//!   populated from `.properties` text or TOML documents
//! - [`EnvironmentProvider`] - live view of the process environment
//! - [`CompoundProvider`] - ordered fallback over other providers

pub mod compound;
pub mod env;
pub mod map;
pub mod properties;
pub mod toml_source;

use std::sync::Arc;

use crate::core::value::Value;
use crate::error::ProviderError;

pub use compound::CompoundProvider;
pub use env::EnvironmentProvider;
pub use map::MapProvider;

/// A string-keyed source of raw values.
pub trait DataProvider: Send + Sync {
    /// Whether the source contains `key`.
    fn has(&self, key: &str) -> bool;

    /// The raw value for `key`. Only meaningful after `has(key)` returned
    /// true.
    fn raw_value(&self, key: &str) -> Option<Value>;

    /// Short name used in log output.
    fn name(&self) -> &str {
        "provider"
    }
}

impl<P: DataProvider + ?Sized> DataProvider for Arc<P> {
    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn raw_value(&self, key: &str) -> Option<Value> {
        (**self).raw_value(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: DataProvider + ?Sized> DataProvider for Box<P> {
    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn raw_value(&self, key: &str) -> Option<Value> {
        (**self).raw_value(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Keys handed to a provider must be non-empty.
///
/// # Panics
///
/// Panics on an empty key.
pub(crate) fn check_key(key: &str) {
    assert!(!key.is_empty(), "provider keys must not be empty");
}

/// Snapshot a mapping into a provider.
pub fn from_map<I, K, V>(entries: I) -> MapProvider
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    MapProvider::new(entries)
}

/// Live view of the process environment.
pub fn system_environment() -> EnvironmentProvider {
    EnvironmentProvider::new()
}

/// Ordered fallback over `providers`. Fails when `providers` is empty.
pub fn compound(
    providers: impl IntoIterator<Item = Arc<dyn DataProvider>>,
) -> Result<CompoundProvider, ProviderError> {
    CompoundProvider::new(providers)
}
