//! Test utilities for propbind unit tests.
//!
//! Fixture translators with fixed behaviour and a provider that counts how
//! often it is consulted.
//!
//! # Example
//!
//! ```rust,ignore
//! use propbind::test_support::{CountingProvider, FixedTranslator};
//!
//! #[test]
//! fn test_example() {
//!     let provider = CountingProvider::new([("port", "8080")]);
//!     let translator = FixedTranslator::new("fixed", 10, "out");
//!     // Bind an accessor and assert on provider.raw_value_calls()...
//! }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;

use crate::core::types::TargetType;
use crate::core::value::Value;
use crate::provider::{DataProvider, MapProvider};
use crate::translate::{Translation, TranslationContext, Translator};

/// Claims every target at a fixed priority and always produces the same
/// text.
#[derive(Debug, Clone)]
pub struct FixedTranslator {
    id: String,
    priority: u32,
    output: String,
}

impl FixedTranslator {
    pub fn new(id: &str, priority: u32, output: &str) -> Self {
        FixedTranslator {
            id: id.to_string(),
            priority,
            output: output.to_string(),
        }
    }
}

impl Translator for FixedTranslator {
    fn id(&self) -> &str {
        &self.id
    }

    fn support_priority(&self, _target: &TargetType) -> u32 {
        self.priority
    }

    fn translate(
        &self,
        _source: &Value,
        _target: &TargetType,
        _context: &TranslationContext<'_>,
    ) -> Result<Translation> {
        Ok(Translation::Value(Value::from(self.output.as_str())))
    }
}

/// Claims every target and answers with the explicit null.
#[derive(Debug, Clone)]
pub struct NullTranslator {
    priority: u32,
}

impl NullTranslator {
    pub fn new(priority: u32) -> Self {
        NullTranslator { priority }
    }
}

impl Translator for NullTranslator {
    fn id(&self) -> &str {
        "null"
    }

    fn support_priority(&self, _target: &TargetType) -> u32 {
        self.priority
    }

    fn translate(
        &self,
        _source: &Value,
        _target: &TargetType,
        _context: &TranslationContext<'_>,
    ) -> Result<Translation> {
        Ok(Translation::Null)
    }
}

/// Panics either while reporting its priority or while translating.
#[derive(Debug, Clone)]
pub struct PanickingTranslator {
    in_priority: bool,
}

impl PanickingTranslator {
    pub fn in_priority() -> Self {
        PanickingTranslator { in_priority: true }
    }

    pub fn in_translate() -> Self {
        PanickingTranslator { in_priority: false }
    }
}

impl Translator for PanickingTranslator {
    fn id(&self) -> &str {
        if self.in_priority {
            "panics-in-priority"
        } else {
            "panics-in-translate"
        }
    }

    fn support_priority(&self, _target: &TargetType) -> u32 {
        if self.in_priority {
            panic!("priority query failed");
        }
        50
    }

    fn translate(
        &self,
        _source: &Value,
        _target: &TargetType,
        _context: &TranslationContext<'_>,
    ) -> Result<Translation> {
        panic!("translation failed");
    }
}

/// A map provider that records how often it is queried.
#[derive(Debug)]
pub struct CountingProvider {
    inner: MapProvider,
    has_calls: AtomicUsize,
    raw_value_calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        CountingProvider {
            inner: MapProvider::new(entries),
            has_calls: AtomicUsize::new(0),
            raw_value_calls: AtomicUsize::new(0),
        }
    }

    pub fn has_calls(&self) -> usize {
        self.has_calls.load(Ordering::SeqCst)
    }

    pub fn raw_value_calls(&self) -> usize {
        self.raw_value_calls.load(Ordering::SeqCst)
    }

    /// Total number of queries of either kind.
    pub fn calls(&self) -> usize {
        self.has_calls() + self.raw_value_calls()
    }
}

impl DataProvider for CountingProvider {
    fn has(&self, key: &str) -> bool {
        self.has_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.has(key)
    }

    fn raw_value(&self, key: &str) -> Option<Value> {
        self.raw_value_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.raw_value(key)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_provider() {
        let provider = CountingProvider::new([("a", "1")]);
        assert!(provider.has("a"));
        assert!(!provider.has("b"));
        assert_eq!(provider.raw_value("a"), Some(Value::from("1")));
        assert_eq!(provider.has_calls(), 2);
        assert_eq!(provider.raw_value_calls(), 1);
        assert_eq!(provider.calls(), 3);
    }
}
