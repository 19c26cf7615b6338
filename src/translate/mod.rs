//! Value translation pipeline.
//!
//! Turns a raw provider value into an operation's declared return type.
//! Strategies run in a fixed order; the first one that handles the target
//! decides the result:
//!
//! ```text
//!   String target ──► templating / canonical text
//!   Primitive     ──► standard parse, zero value or None
//!   Enum          ──► case-insensitive member match
//!   Registry      ──► highest-priority plugin translator
//!   Constructor   ──► registered value constructors
//!   TypeRef       ──► type resolved by name
//!   otherwise     ──► None
//! ```

pub mod builtin;
pub mod constructor;
pub mod registry;
pub mod standard;
pub mod template;

use std::sync::Arc;

use crate::core::types::TargetType;
use crate::core::value::Value;
use crate::util::config::TranslationConfig;

pub use builtin::{DurationTranslator, ListTranslator, PathTranslator};
pub use constructor::{ConstructorRegistry, ParamType};
pub use registry::{Selected, Translation, TranslationContext, Translator, TranslatorRegistry};
pub use standard::Standard;

/// The translation pipeline, bound to a translator registry and a
/// constructor registry.
#[derive(Debug, Clone)]
pub struct ValueTranslator {
    translators: Arc<TranslatorRegistry>,
    constructors: Arc<ConstructorRegistry>,
    config: TranslationConfig,
}

impl ValueTranslator {
    pub fn new(
        translators: Arc<TranslatorRegistry>,
        constructors: Arc<ConstructorRegistry>,
        config: TranslationConfig,
    ) -> Self {
        ValueTranslator {
            translators,
            constructors,
            config,
        }
    }

    pub fn translators(&self) -> &Arc<TranslatorRegistry> {
        &self.translators
    }

    pub fn constructors(&self) -> &Arc<ConstructorRegistry> {
        &self.constructors
    }

    /// Translate `source` into `target`. `None` means null.
    ///
    /// Never fails: every failure degrades to `None` or to the target's
    /// zero value.
    pub fn translate(
        &self,
        source: Option<Value>,
        target: &TargetType,
        context: &TranslationContext<'_>,
    ) -> Option<Value> {
        let source = source.filter(|v| !v.is_null());

        if *target == TargetType::String {
            return Some(self.text_value(source, context.args));
        }

        if let Standard::Handled(result) = standard::translate(source.as_ref(), target) {
            return result;
        }

        let source = source?;

        if let Some(selected) = self.translators.select(target) {
            tracing::trace!(
                id = selected.translator.id(),
                priority = selected.priority,
                ty = %target,
                "selected translator"
            );
            match registry::run(selected.translator.as_ref(), &source, target, context) {
                Some(Translation::Value(value)) => return Some(value),
                Some(Translation::Null) => return None,
                Some(Translation::NoMatch) | None => {}
            }
        }

        if let TargetType::Custom(custom) = target {
            if let Some(value) = self.constructors.construct(custom, &source, context.args) {
                return Some(value);
            }
        }

        if *target == TargetType::TypeRef {
            if let Value::Text(name) = &source {
                if let Some(resolved) = TargetType::from_name(name) {
                    return Some(Value::Type(resolved));
                }
            }
        }

        tracing::debug!(ty = %target, key = context.key, "no translation strategy matched");
        None
    }

    fn text_value(&self, source: Option<Value>, args: &[Value]) -> Value {
        let text = match source {
            None => String::new(),
            Some(Value::Text(text)) => {
                if self.templating_applies(args) {
                    template::format(&text, args).unwrap_or_else(|e| {
                        tracing::debug!(error = %e, "template left unformatted");
                        text
                    })
                } else {
                    text
                }
            }
            Some(other) => other.to_text(),
        };
        Value::Text(text)
    }

    fn templating_applies(&self, args: &[Value]) -> bool {
        self.config.templating && (!args.is_empty() || self.config.templating_without_args)
    }
}

impl Default for ValueTranslator {
    fn default() -> Self {
        ValueTranslator::new(
            TranslatorRegistry::global(),
            ConstructorRegistry::global(),
            TranslationConfig::default(),
        )
    }
}
