//! Ordered fallback over several providers.

use std::sync::Arc;

use crate::core::value::Value;
use crate::error::ProviderError;
use crate::provider::{check_key, DataProvider};

/// Queries its delegates in order; the first delegate that has a key
/// supplies its value.
#[derive(Clone)]
pub struct CompoundProvider {
    delegates: Arc<[Arc<dyn DataProvider>]>,
}

impl CompoundProvider {
    /// Build from at least one delegate.
    pub fn new(
        delegates: impl IntoIterator<Item = Arc<dyn DataProvider>>,
    ) -> Result<Self, ProviderError> {
        let delegates: Vec<_> = delegates.into_iter().collect();
        if delegates.is_empty() {
            return Err(ProviderError::EmptyCompound);
        }
        Ok(CompoundProvider {
            delegates: delegates.into(),
        })
    }

    /// Build from optional delegates, rejecting any missing entry.
    pub fn from_optional(
        delegates: impl IntoIterator<Item = Option<Arc<dyn DataProvider>>>,
    ) -> Result<Self, ProviderError> {
        let delegates = delegates
            .into_iter()
            .enumerate()
            .map(|(index, d)| d.ok_or(ProviderError::MissingDelegate { index }))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(delegates)
    }

    pub fn delegates(&self) -> &[Arc<dyn DataProvider>] {
        &self.delegates
    }

    fn first_having(&self, key: &str) -> Option<&Arc<dyn DataProvider>> {
        self.delegates.iter().find(|d| d.has(key))
    }
}

impl DataProvider for CompoundProvider {
    fn has(&self, key: &str) -> bool {
        check_key(key);
        self.first_having(key).is_some()
    }

    fn raw_value(&self, key: &str) -> Option<Value> {
        check_key(key);
        let delegate = self.first_having(key)?;
        tracing::trace!(key, provider = delegate.name(), "compound lookup hit");
        delegate.raw_value(key)
    }

    fn name(&self) -> &str {
        "compound"
    }
}

impl std::fmt::Debug for CompoundProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.delegates.iter().map(|d| d.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MapProvider;

    fn map(entries: &[(&str, &str)]) -> Arc<dyn DataProvider> {
        Arc::new(MapProvider::new(entries.iter().copied()))
    }

    #[test]
    fn test_falls_back_to_later_delegate() {
        let compound = CompoundProvider::new([map(&[("other", "x")]), map(&[("k", "v")])]).unwrap();
        assert!(compound.has("k"));
        assert_eq!(compound.raw_value("k"), Some(Value::from("v")));
    }

    #[test]
    fn test_first_delegate_wins() {
        let compound =
            CompoundProvider::new([map(&[("k", "first")]), map(&[("k", "second")])]).unwrap();
        assert_eq!(compound.raw_value("k"), Some(Value::from("first")));
    }

    #[test]
    fn test_absent_everywhere() {
        let compound = CompoundProvider::new([map(&[]), map(&[])]).unwrap();
        assert!(!compound.has("k"));
        assert_eq!(compound.raw_value("k"), None);
    }

    #[test]
    fn test_empty_delegate_list_fails() {
        let err = CompoundProvider::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ProviderError::EmptyCompound));
    }

    #[test]
    fn test_missing_delegate_fails() {
        let err = CompoundProvider::from_optional([Some(map(&[])), None]).unwrap_err();
        assert!(matches!(err, ProviderError::MissingDelegate { index: 1 }));
    }
}
