//! Constructor fallback.
//!
//! A value constructor builds a custom type from the raw value and,
//! optionally, the call arguments. Constructors are registered explicitly
//! together with their parameter signature; lookup follows assignability
//! of the runtime values to that signature.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use anyhow::Result;

use crate::core::types::{CustomType, EnumDescriptor, PrimitiveKind};
use crate::core::value::{Value, ValueKind};

/// A constructor parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Accepts any value, including null.
    Any,
    Text,
    Primitive(PrimitiveKind),
    Enum(EnumDescriptor),
    Type,
    Custom(CustomType),
}

impl ParamType {
    pub fn custom<T: 'static>() -> Self {
        ParamType::Custom(CustomType::of::<T>())
    }

    /// Whether `value` may be passed for this parameter. Null is accepted
    /// by every non-primitive parameter.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value.kind()) {
            (ParamType::Any, _) => true,
            (ParamType::Primitive(_), ValueKind::Null) => false,
            (_, ValueKind::Null) => true,
            (ParamType::Text, ValueKind::Text) => true,
            (ParamType::Primitive(p), ValueKind::Primitive(k)) => *p == k,
            (ParamType::Enum(e), ValueKind::Enum(k)) => *e == k,
            (ParamType::Type, ValueKind::Type) => true,
            (ParamType::Custom(c), ValueKind::Custom(k)) => *c == k,
            _ => false,
        }
    }
}

type ConstructFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync>;

#[derive(Clone)]
struct ValueConstructor {
    params: Vec<ParamType>,
    construct: ConstructFn,
}

impl ValueConstructor {
    fn matches(&self, source: &Value, args: &[Value]) -> bool {
        self.params.len() == args.len() + 1
            && self.params[0].accepts(source)
            && self.params[1..]
                .iter()
                .zip(args)
                .all(|(param, arg)| param.accepts(arg))
    }
}

static GLOBAL: LazyLock<Arc<ConstructorRegistry>> =
    LazyLock::new(|| Arc::new(ConstructorRegistry::new()));

/// Registered value constructors, keyed by the type they build.
#[derive(Default)]
pub struct ConstructorRegistry {
    by_type: RwLock<HashMap<CustomType, Vec<ValueConstructor>>>,
}

impl ConstructorRegistry {
    pub fn new() -> Self {
        ConstructorRegistry::default()
    }

    /// The process-wide registry.
    pub fn global() -> Arc<ConstructorRegistry> {
        GLOBAL.clone()
    }

    /// Register a constructor for `T` with the given parameter signature.
    /// The first parameter receives the raw value, the rest receive the
    /// call arguments at their own positions.
    ///
    /// # Panics
    ///
    /// Panics if `params` is empty.
    pub fn register<T, F>(&self, params: Vec<ParamType>, construct: F)
    where
        T: Any + Send + Sync + fmt::Debug,
        F: Fn(&Value, &[Value]) -> Result<T> + Send + Sync + 'static,
    {
        assert!(!params.is_empty(), "a constructor takes at least the raw value");
        let ty = CustomType::of::<T>();
        tracing::debug!(ty = ty.simple_name(), arity = params.len(), "registered constructor");

        let ctor = ValueConstructor {
            params,
            construct: Arc::new(move |source: &Value, args: &[Value]| {
                construct(source, args).map(Value::custom)
            }),
        };
        self.by_type
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(ty)
            .or_default()
            .push(ctor);
    }

    /// Register a one-parameter constructor from text.
    pub fn register_from_text<T, F>(&self, construct: F)
    where
        T: Any + Send + Sync + fmt::Debug,
        F: Fn(&str) -> Result<T> + Send + Sync + 'static,
    {
        self.register(vec![ParamType::Text], move |source, _| {
            construct(source.as_text().unwrap_or_default())
        });
    }

    /// Build a `target` from `source`.
    ///
    /// A one-parameter constructor accepting `source` is tried first. When
    /// `args` is non-empty, a constructor taking `(source, args...)` is
    /// tried next. Every matching constructor is tried in registration
    /// order until one succeeds; errors count as "not constructed".
    pub fn construct(&self, target: &CustomType, source: &Value, args: &[Value]) -> Option<Value> {
        let candidates = self
            .by_type
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .cloned()?;

        let no_args: &[Value] = &[];
        let mut attempts = vec![no_args];
        if !args.is_empty() {
            attempts.push(args);
        }

        for attempt in attempts {
            for ctor in candidates.iter().filter(|c| c.matches(source, attempt)) {
                match (ctor.construct)(source, attempt) {
                    Ok(value) => return Some(value),
                    Err(e) => {
                        tracing::debug!(ty = target.simple_name(), error = %e, "constructor failed");
                    }
                }
            }
        }

        None
    }

    pub fn contains(&self, target: &CustomType) -> bool {
        self.by_type
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(target)
    }
}

impl fmt::Debug for ConstructorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let by_type = self.by_type.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_map()
            .entries(by_type.iter().map(|(ty, ctors)| (ty.simple_name(), ctors.len())))
            .finish()
    }
}
