//! Accessor construction.
//!
//! An [`AccessorFactory`] holds an ordered list of [`BindingContext`]s. Each
//! context is a complete environment for running a contract: translator
//! registry, constructor registry and engine settings. `create` tries the
//! contexts in order and returns the first successful binding; it fails
//! only when every context refuses.

use std::fmt;
use std::sync::Arc;

use crate::binding::accessor::{Accessor, Contract};
use crate::core::contract::ContractDescriptor;
use crate::error::BindError;
use crate::provider::DataProvider;
use crate::translate::{ConstructorRegistry, TranslatorRegistry, ValueTranslator};
use crate::util::config::EngineConfig;

type AcceptFn = Arc<dyn Fn(&ContractDescriptor) -> bool + Send + Sync>;

/// One candidate environment for binding contracts.
#[derive(Clone)]
pub struct BindingContext {
    name: String,
    translators: Arc<TranslatorRegistry>,
    constructors: Arc<ConstructorRegistry>,
    config: EngineConfig,
    accepts: Option<AcceptFn>,
}

impl BindingContext {
    /// A context over the process-wide registries and default settings.
    pub fn global() -> Self {
        BindingContext::new(
            "global",
            TranslatorRegistry::global(),
            ConstructorRegistry::global(),
        )
    }

    pub fn new(
        name: impl Into<String>,
        translators: Arc<TranslatorRegistry>,
        constructors: Arc<ConstructorRegistry>,
    ) -> Self {
        BindingContext {
            name: name.into(),
            translators,
            constructors,
            config: EngineConfig::default(),
            accepts: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Only bind contracts for which `accepts` returns true.
    pub fn accepting<F>(mut self, accepts: F) -> Self
    where
        F: Fn(&ContractDescriptor) -> bool + Send + Sync + 'static,
    {
        self.accepts = Some(Arc::new(accepts));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn translators(&self) -> &Arc<TranslatorRegistry> {
        &self.translators
    }

    pub fn constructors(&self) -> &Arc<ConstructorRegistry> {
        &self.constructors
    }

    /// Bind `provider` to `contract` in this context.
    pub fn bind(
        &self,
        contract: &ContractDescriptor,
        provider: Arc<dyn DataProvider>,
    ) -> Result<Accessor, BindError> {
        validate(contract)?;

        if let Some(accepts) = &self.accepts {
            if !accepts(contract) {
                return Err(BindError::Rejected {
                    context: self.name.clone(),
                    contract: contract.name().to_string(),
                });
            }
        }

        let translator = ValueTranslator::new(
            self.translators.clone(),
            self.constructors.clone(),
            self.config.translation.clone(),
        );

        Ok(Accessor::new(
            contract.clone(),
            provider,
            translator,
            self.config.cache.effective_capacity(),
        ))
    }
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("name", &self.name)
            .field("translators", &self.translators)
            .field("config", &self.config)
            .field("filtered", &self.accepts.is_some())
            .finish()
    }
}

/// Every operation, inherited ones included, must have a non-empty name
/// and non-empty aliases so that no lookup key is ever empty. Own
/// operation names must be distinct.
fn validate(contract: &ContractDescriptor) -> Result<(), BindError> {
    for op in contract.operations() {
        if op.name().is_empty() {
            return Err(BindError::EmptyOperationName {
                contract: contract.name().to_string(),
            });
        }
        if op.aliases().iter().any(String::is_empty) {
            return Err(BindError::EmptyAlias {
                contract: contract.name().to_string(),
                operation: op.name().to_string(),
            });
        }
    }

    let own = contract
        .operations()
        .iter()
        .filter(|op| Arc::ptr_eq(&op.declaring_type(), contract.declaring_type()));

    let mut seen = std::collections::HashSet::new();
    for op in own {
        if !seen.insert(op.name()) {
            return Err(BindError::DuplicateOperation {
                contract: contract.name().to_string(),
                operation: op.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Creates accessors, trying binding contexts in a fixed order.
#[derive(Debug, Clone)]
pub struct AccessorFactory {
    candidates: Vec<BindingContext>,
}

impl Default for AccessorFactory {
    fn default() -> Self {
        AccessorFactory {
            candidates: vec![BindingContext::global()],
        }
    }
}

impl AccessorFactory {
    /// A factory with only the global context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory over exactly the given contexts, tried in order.
    pub fn from_contexts(candidates: impl IntoIterator<Item = BindingContext>) -> Self {
        AccessorFactory {
            candidates: candidates.into_iter().collect(),
        }
    }

    /// Add a context tried before the global one.
    pub fn with_context(mut self, context: BindingContext) -> Self {
        let at = self
            .candidates
            .iter()
            .position(|c| c.name == "global")
            .unwrap_or(self.candidates.len());
        self.candidates.insert(at, context);
        self
    }

    pub fn contexts(&self) -> &[BindingContext] {
        &self.candidates
    }

    /// Bind `provider` to `contract` with the first context that accepts.
    pub fn create(
        &self,
        provider: Arc<dyn DataProvider>,
        contract: &ContractDescriptor,
    ) -> Result<Accessor, BindError> {
        let mut first_failure = None;

        for context in &self.candidates {
            match context.bind(contract, provider.clone()) {
                Ok(accessor) => {
                    tracing::debug!(
                        contract = contract.name(),
                        context = context.name(),
                        "bound accessor"
                    );
                    return Ok(accessor);
                }
                Err(e) => {
                    tracing::debug!(
                        contract = contract.name(),
                        context = context.name(),
                        error = %e,
                        "binding context refused contract"
                    );
                    first_failure.get_or_insert(e);
                }
            }
        }

        let source = first_failure.unwrap_or_else(|| BindError::Rejected {
            context: "<none>".to_string(),
            contract: contract.name().to_string(),
        });
        Err(BindError::Unbindable {
            contract: contract.name().to_string(),
            attempts: self.candidates.len(),
            source: Box::new(source),
        })
    }

    /// Bind `provider` to the typed contract `C`.
    pub fn create_typed<C: Contract>(
        &self,
        provider: Arc<dyn DataProvider>,
    ) -> Result<C, BindError> {
        self.create(provider, &C::descriptor())
            .map(C::from_accessor)
    }
}

/// Bind `provider` to the typed contract `C` using the global context.
pub fn create_accessor<C, P>(provider: P) -> Result<C, BindError>
where
    C: Contract,
    P: DataProvider + 'static,
{
    AccessorFactory::new().create_typed(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contract::OperationDescriptor;
    use crate::core::types::{PrimitiveKind, TargetType};
    use crate::provider::MapProvider;
    use crate::test_support::FixedTranslator;

    fn contract() -> ContractDescriptor {
        ContractDescriptor::builder("Limits")
            .prefix("limits")
            .operation(OperationDescriptor::new(
                "max",
                TargetType::primitive(PrimitiveKind::U32),
            ))
            .build()
    }

    fn provider() -> Arc<dyn DataProvider> {
        Arc::new(MapProvider::new([("limits.max", "12")]))
    }

    fn isolated(name: &str) -> BindingContext {
        BindingContext::new(
            name,
            Arc::new(TranslatorRegistry::with_builtins()),
            Arc::new(ConstructorRegistry::new()),
        )
    }

    #[test]
    fn test_create_with_global_context() {
        let accessor = AccessorFactory::new().create(provider(), &contract()).unwrap();
        assert_eq!(accessor.get::<u32>("max"), 12);
    }

    #[test]
    fn test_duplicate_operation_is_rejected() {
        let contract = ContractDescriptor::builder("Dup")
            .operation(OperationDescriptor::new("a", TargetType::String))
            .operation(OperationDescriptor::new("a", TargetType::String))
            .build();

        let err = isolated("only").bind(&contract, provider()).unwrap_err();
        assert!(matches!(err, BindError::DuplicateOperation { .. }));
    }

    #[test]
    fn test_empty_operation_name_is_rejected() {
        let contract = ContractDescriptor::builder("Blank")
            .operation(OperationDescriptor::new("", TargetType::String))
            .build();

        let err = isolated("only").bind(&contract, provider()).unwrap_err();
        assert!(matches!(err, BindError::EmptyOperationName { .. }));
    }

    #[test]
    fn test_empty_alias_is_rejected() {
        let contract = ContractDescriptor::builder("Ports")
            .operation(
                OperationDescriptor::new("port", TargetType::primitive(PrimitiveKind::I32))
                    .with_aliases(["http_port", ""]),
            )
            .build();

        let err = isolated("only").bind(&contract, provider()).unwrap_err();
        match err {
            BindError::EmptyAlias {
                contract,
                operation,
            } => {
                assert_eq!(contract, "Ports");
                assert_eq!(operation, "port");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_inherited_empty_alias_is_rejected() {
        let parent = ContractDescriptor::builder("Base")
            .operation(OperationDescriptor::new("host", TargetType::String).with_aliases([""]))
            .build();
        let child = ContractDescriptor::builder("Child")
            .extends(&parent)
            .operation(OperationDescriptor::new("port", TargetType::String))
            .build();

        let err = AccessorFactory::from_contexts([isolated("only")])
            .create(provider(), &child)
            .unwrap_err();
        assert!(matches!(
            err,
            BindError::Unbindable { ref source, .. }
                if matches!(**source, BindError::EmptyAlias { ref operation, .. } if operation == "host")
        ));
    }

    #[test]
    fn test_empty_explicit_key_uses_derived_key() {
        let contract = ContractDescriptor::builder("Limits")
            .prefix("limits")
            .operation(
                OperationDescriptor::new("getMax", TargetType::primitive(PrimitiveKind::U32))
                    .with_key("")
                    .with_aliases(["ceiling"]),
            )
            .build();

        let accessor = isolated("only").bind(&contract, provider()).unwrap();
        assert_eq!(accessor.resolved_key("getMax").as_deref(), Some("limits.max"));
        assert_eq!(accessor.get::<u32>("getMax"), 12);
    }

    #[test]
    fn test_first_accepting_context_wins() {
        let custom = TranslatorRegistry::new();
        custom.register(Arc::new(FixedTranslator::new("fixed", 1, "x")));
        let picky = BindingContext::new(
            "picky",
            Arc::new(custom),
            Arc::new(ConstructorRegistry::new()),
        )
        .accepting(|c| c.name() == "Other");

        let factory = AccessorFactory::from_contexts([picky, isolated("fallback")]);
        let accessor = factory.create(provider(), &contract()).unwrap();
        assert_eq!(accessor.get::<u32>("max"), 12);
    }

    #[test]
    fn test_with_context_goes_before_global() {
        let factory = AccessorFactory::new().with_context(isolated("mine"));
        let names: Vec<_> = factory.contexts().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["mine", "global"]);
    }

    #[test]
    fn test_all_contexts_refusing_is_unbindable() {
        let factory = AccessorFactory::from_contexts([
            isolated("a").accepting(|_| false),
            isolated("b").accepting(|_| false),
        ]);

        let err = factory.create(provider(), &contract()).unwrap_err();
        match err {
            BindError::Unbindable {
                contract,
                attempts,
                source,
            } => {
                assert_eq!(contract, "Limits");
                assert_eq!(attempts, 2);
                assert!(matches!(*source, BindError::Rejected { ref context, .. } if context == "a"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_context_config_applies() {
        let mut config = EngineConfig::default();
        config.cache.enabled = false;
        let factory = AccessorFactory::from_contexts([isolated("nocache").with_config(config)]);

        let accessor = factory.create(provider(), &contract()).unwrap();
        accessor.get::<u32>("max");
        assert_eq!(accessor.cached_len(), 0);
    }
}
