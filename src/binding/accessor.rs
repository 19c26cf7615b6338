//! Accessor instances and operation dispatch.
//!
//! An [`Accessor`] binds one [`DataProvider`] to one [`ContractDescriptor`].
//! Every invocation runs the same steps:
//!
//! 1. Operations declaring no parameters answer from the result cache when
//!    possible.
//! 2. The lookup key is resolved and the provider queried, falling back to
//!    the operation's declared default text.
//! 3. The raw value is translated into the declared return type.
//! 4. Results of parameterless operations are cached, nulls included.
//!
//! Invocations never fail: translation problems degrade to `None` or to
//! the return type's zero value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::binding::cache::ResultCache;
use crate::binding::resolver;
use crate::core::contract::{ContractDescriptor, OperationDescriptor, OperationId};
use crate::core::convert::Bindable;
use crate::core::value::Value;
use crate::provider::DataProvider;
use crate::translate::{TranslationContext, ValueTranslator};

/// A typed view generated for a contract.
///
/// Implemented by the structs the [`contract!`](crate::contract) macro
/// generates.
pub trait Contract: Sized {
    /// The contract's registration table.
    fn descriptor() -> ContractDescriptor;

    /// Wrap a bound accessor.
    fn from_accessor(accessor: Accessor) -> Self;

    fn accessor(&self) -> &Accessor;
}

/// A live binding of a provider to a contract.
///
/// Cheap to clone; clones share the provider and the result cache. Safe to
/// use from many threads at once.
#[derive(Clone)]
pub struct Accessor {
    inner: Arc<AccessorInner>,
}

struct AccessorInner {
    contract: ContractDescriptor,
    provider: Arc<dyn DataProvider>,
    translator: ValueTranslator,
    cache: ResultCache,
    by_id: HashMap<OperationId, usize>,
    by_name: HashMap<String, usize>,
}

impl Accessor {
    pub(crate) fn new(
        contract: ContractDescriptor,
        provider: Arc<dyn DataProvider>,
        translator: ValueTranslator,
        cache_capacity: usize,
    ) -> Self {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        for (index, op) in contract.operations().iter().enumerate() {
            by_id.entry(op.id()).or_insert(index);
            // Own operations come first and shadow inherited names.
            by_name.entry(op.name().to_string()).or_insert(index);
        }

        Accessor {
            inner: Arc::new(AccessorInner {
                contract,
                provider,
                translator,
                cache: ResultCache::new(cache_capacity),
                by_id,
                by_name,
            }),
        }
    }

    /// Invoke an operation by name.
    ///
    /// Unknown names yield `None`.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Option<Value> {
        match self.inner.by_name.get(name) {
            Some(&index) => self.dispatch(index, args),
            None => {
                tracing::warn!(
                    contract = self.inner.contract.name(),
                    operation = name,
                    "unknown operation"
                );
                None
            }
        }
    }

    /// Invoke an operation by identity. Inherited operations are identified
    /// by the contract that declared them.
    pub fn invoke_id(&self, id: &OperationId, args: &[Value]) -> Option<Value> {
        match self.inner.by_id.get(id) {
            Some(&index) => self.dispatch(index, args),
            None => {
                tracing::warn!(
                    contract = self.inner.contract.name(),
                    operation = %id,
                    "unknown operation"
                );
                None
            }
        }
    }

    /// Typed zero-argument call.
    pub fn get<T: Bindable>(&self, name: &str) -> T {
        T::from_translated(self.invoke(name, &[]))
    }

    /// Typed call with arguments.
    pub fn call<T: Bindable>(&self, name: &str, args: &[Value]) -> T {
        T::from_translated(self.invoke(name, args))
    }

    /// The key an operation resolves to right now, without translating.
    pub fn resolved_key(&self, name: &str) -> Option<String> {
        self.operation(name)
            .map(|op| resolver::resolve(op, self.inner.provider.as_ref()))
    }

    pub fn descriptor(&self) -> &ContractDescriptor {
        &self.inner.contract
    }

    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.inner
            .by_name
            .get(name)
            .map(|&index| &self.inner.contract.operations()[index])
    }

    pub fn provider(&self) -> &Arc<dyn DataProvider> {
        &self.inner.provider
    }

    /// Forget every cached result.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Number of cached results.
    pub fn cached_len(&self) -> usize {
        self.inner.cache.len()
    }

    fn dispatch(&self, index: usize, args: &[Value]) -> Option<Value> {
        let inner = &*self.inner;
        let op = &inner.contract.operations()[index];
        let id = op.id();
        let cacheable = !op.takes_arguments();

        if cacheable {
            if let Some(hit) = inner.cache.get(&id) {
                tracing::trace!(operation = %id, "cache hit");
                return hit;
            }
        }

        let key = resolver::resolve(op, inner.provider.as_ref());
        let raw = if inner.provider.has(&key) {
            inner.provider.raw_value(&key).filter(|v| !v.is_null())
        } else {
            None
        };
        let source = raw.or_else(|| {
            op.default_value().map(|text| {
                tracing::trace!(operation = %id, key = %key, "using declared default");
                Value::text(text)
            })
        });

        let context = TranslationContext {
            operation: Some(&id),
            key: Some(key.as_str()),
            args,
        };
        let result = inner
            .translator
            .translate(source, op.return_type(), &context);

        tracing::debug!(
            operation = %id,
            key = %key,
            provider = inner.provider.name(),
            found = result.is_some(),
            "evaluated operation"
        );

        if cacheable {
            inner.cache.insert(id, result)
        } else {
            result
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("contract", &self.inner.contract.name())
            .field("provider", &self.inner.provider.name())
            .field("cached", &self.inner.cache.len())
            .finish()
    }
}
