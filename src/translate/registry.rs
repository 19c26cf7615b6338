//! Pluggable translators and priority arbitration.
//!
//! Key principle: a misbehaving translator never breaks a lookup. Errors
//! and panics from discovery, priority queries or translation skip that
//! translator for the current call only.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use anyhow::Result;

use crate::core::contract::OperationId;
use crate::core::types::TargetType;
use crate::core::value::Value;
use crate::translate::builtin::{DurationTranslator, ListTranslator, PathTranslator};

/// Per-call information handed to a translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationContext<'a> {
    /// The operation being evaluated, when called through an accessor.
    pub operation: Option<&'a OperationId>,
    /// The resolved lookup key.
    pub key: Option<&'a str>,
    /// Call arguments.
    pub args: &'a [Value],
}

/// Outcome of a single translator invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// The translated value.
    Value(Value),
    /// The translator cannot handle this source; keep trying.
    NoMatch,
    /// The translation legitimately produced null.
    Null,
}

/// A pluggable conversion from raw values to a target type.
pub trait Translator: Send + Sync {
    /// Stable identifier, used for removal and log output.
    fn id(&self) -> &str;

    /// How strongly this translator wants to handle `target`. `0` means
    /// unsupported; higher values win.
    fn support_priority(&self, target: &TargetType) -> u32;

    fn translate(
        &self,
        source: &Value,
        target: &TargetType,
        context: &TranslationContext<'_>,
    ) -> Result<Translation>;
}

type Factory = Arc<dyn Fn() -> Result<Arc<dyn Translator>> + Send + Sync>;

#[derive(Clone)]
enum Entry {
    Instance(Arc<dyn Translator>),
    Factory { id: String, make: Factory },
}

impl Entry {
    fn id(&self) -> &str {
        match self {
            Entry::Instance(t) => t.id(),
            Entry::Factory { id, .. } => id,
        }
    }

    fn instantiate(&self) -> Result<Arc<dyn Translator>> {
        match self {
            Entry::Instance(t) => Ok(t.clone()),
            Entry::Factory { id, make } => {
                match panic::catch_unwind(AssertUnwindSafe(|| make())) {
                    Ok(result) => result,
                    Err(_) => anyhow::bail!("translator factory `{}` panicked", id),
                }
            }
        }
    }
}

static GLOBAL: LazyLock<Arc<TranslatorRegistry>> =
    LazyLock::new(|| Arc::new(TranslatorRegistry::with_builtins()));

/// Ordered set of translator sources.
///
/// Sources are ready instances or factories. Factories run again on every
/// discovery pass, so translators can be added or removed between calls.
#[derive(Default)]
pub struct TranslatorRegistry {
    entries: RwLock<Vec<Entry>>,
}

/// The translator chosen for a target, with the priority it reported.
#[derive(Clone)]
pub struct Selected {
    pub translator: Arc<dyn Translator>,
    pub priority: u32,
}

impl TranslatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        TranslatorRegistry {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// A registry holding the bundled translators.
    pub fn with_builtins() -> Self {
        let registry = TranslatorRegistry::new();
        registry.register(Arc::new(PathTranslator));
        registry.register(Arc::new(DurationTranslator));
        registry.register(Arc::new(ListTranslator));
        registry
    }

    /// The process-wide registry, pre-populated with the bundled
    /// translators.
    pub fn global() -> Arc<TranslatorRegistry> {
        GLOBAL.clone()
    }

    /// Register a ready translator.
    pub fn register(&self, translator: Arc<dyn Translator>) {
        tracing::debug!(id = translator.id(), "registered translator");
        self.write().push(Entry::Instance(translator));
    }

    /// Register a factory, invoked on every discovery pass.
    pub fn register_factory<F>(&self, id: impl Into<String>, make: F)
    where
        F: Fn() -> Result<Arc<dyn Translator>> + Send + Sync + 'static,
    {
        let id = id.into();
        tracing::debug!(id = %id, "registered translator factory");
        self.write().push(Entry::Factory {
            id,
            make: Arc::new(make),
        });
    }

    /// Remove every source with the given id. Returns whether anything was
    /// removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|e| e.id() != id);
        before != entries.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Instantiate every source, skipping those that fail.
    pub fn discover(&self) -> Vec<Arc<dyn Translator>> {
        // Factories run without holding the lock.
        let entries = self.read().clone();
        entries
            .iter()
            .filter_map(|entry| match entry.instantiate() {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!(id = entry.id(), error = %e, "skipping translator");
                    None
                }
            })
            .collect()
    }

    /// Discover translators and pick the one with the highest non-zero
    /// priority for `target`. Ties keep the first one discovered.
    pub fn select(&self, target: &TargetType) -> Option<Selected> {
        select_from(self.discover(), target)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Max-by-priority over `translators` with first-seen tie-break.
pub fn select_from(
    translators: impl IntoIterator<Item = Arc<dyn Translator>>,
    target: &TargetType,
) -> Option<Selected> {
    let mut best: Option<Selected> = None;

    for translator in translators {
        let priority =
            match panic::catch_unwind(AssertUnwindSafe(|| translator.support_priority(target))) {
                Ok(p) => p,
                Err(_) => {
                    tracing::warn!(id = translator.id(), "translator panicked reporting priority");
                    continue;
                }
            };

        if priority == 0 {
            continue;
        }
        if best.as_ref().map_or(true, |b| priority > b.priority) {
            best = Some(Selected {
                translator,
                priority,
            });
        }
    }

    best
}

/// Run a selected translator, mapping failures to `None` ("keep trying").
pub fn run(
    translator: &dyn Translator,
    source: &Value,
    target: &TargetType,
    context: &TranslationContext<'_>,
) -> Option<Translation> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        translator.translate(source, target, context)
    }));

    match outcome {
        Ok(Ok(Translation::NoMatch)) => None,
        Ok(Ok(translation)) => Some(translation),
        Ok(Err(e)) => {
            tracing::debug!(id = translator.id(), error = %e, "translator failed");
            None
        }
        Err(_) => {
            tracing::warn!(id = translator.id(), "translator panicked");
            None
        }
    }
}

impl std::fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.read().iter().map(|e| e.id().to_string()))
            .finish()
    }
}
