//! Access contract descriptors.
//!
//! A contract is the explicit registration table for a typed accessor: the
//! operations it exposes, their return types, and the declarative metadata
//! that steers key resolution. Contracts are usually produced by the
//! [`contract!`](crate::contract) macro, but can be assembled at runtime with
//! [`ContractDescriptor::builder`].

use std::fmt;
use std::sync::Arc;

use crate::core::types::TargetType;

/// Key prefix declared on a contract type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyPrefix {
    /// Keys are used as resolved.
    #[default]
    None,
    /// Keys are prefixed with the given text. A trailing `.` is added when
    /// missing.
    Explicit(String),
    /// Keys are prefixed with the contract's simple name.
    FromTypeName,
}

/// The contract an operation was originally declared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaringType {
    pub name: Arc<str>,
    pub prefix: KeyPrefix,
}

impl DeclaringType {
    /// The prefix to prepend to this type's keys, already terminated with
    /// the separator. Empty when no prefix is declared.
    pub fn key_prefix(&self) -> String {
        match &self.prefix {
            KeyPrefix::None => String::new(),
            KeyPrefix::Explicit(prefix) if prefix.is_empty() => String::new(),
            KeyPrefix::Explicit(prefix) if prefix.ends_with('.') => prefix.clone(),
            KeyPrefix::Explicit(prefix) => format!("{}.", prefix),
            KeyPrefix::FromTypeName => format!("{}.", self.name),
        }
    }
}

/// Identity of an operation within an accessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationId {
    contract: Arc<str>,
    name: Arc<str>,
}

impl OperationId {
    pub fn new(contract: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        OperationId {
            contract: contract.into(),
            name: name.into(),
        }
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.contract, self.name)
    }
}

/// One operation of a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    name: String,
    return_type: TargetType,
    params: Vec<TargetType>,
    key: Option<String>,
    aliases: Vec<String>,
    default_value: Option<String>,
    declaring: Option<Arc<DeclaringType>>,
}

impl OperationDescriptor {
    pub fn new(name: impl Into<String>, return_type: TargetType) -> Self {
        OperationDescriptor {
            name: name.into(),
            return_type,
            params: Vec::new(),
            key: None,
            aliases: Vec::new(),
            default_value: None,
            declaring: None,
        }
    }

    /// Declare the parameter types.
    pub fn with_params(mut self, params: impl IntoIterator<Item = TargetType>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Override the derived key name.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Fallback key names, tried in order.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Source text used when no key resolves in the provider.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &TargetType {
        &self.return_type
    }

    pub fn params(&self) -> &[TargetType] {
        &self.params
    }

    pub fn takes_arguments(&self) -> bool {
        !self.params.is_empty()
    }

    /// The explicit key name, when one was declared and is non-empty.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// The contract this operation was declared on.
    ///
    /// Operations that were never added to a contract report an anonymous
    /// declaring type without a prefix.
    pub fn declaring_type(&self) -> Arc<DeclaringType> {
        self.declaring.clone().unwrap_or_else(|| {
            Arc::new(DeclaringType {
                name: Arc::from(""),
                prefix: KeyPrefix::None,
            })
        })
    }

    pub fn id(&self) -> OperationId {
        let declaring = self.declaring_type();
        OperationId::new(declaring.name.clone(), self.name.as_str())
    }
}

/// A complete contract: its own operations plus everything inherited.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDescriptor {
    declaring: Arc<DeclaringType>,
    operations: Vec<OperationDescriptor>,
}

impl ContractDescriptor {
    /// Start describing a contract with the given simple name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        let name = name.into();
        assert!(!name.is_empty(), "contract name must not be empty");
        ContractBuilder {
            name,
            prefix: KeyPrefix::None,
            operations: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.declaring.name
    }

    pub fn prefix(&self) -> &KeyPrefix {
        &self.declaring.prefix
    }

    pub fn declaring_type(&self) -> &Arc<DeclaringType> {
        &self.declaring
    }

    /// All operations, own declarations first.
    pub fn operations(&self) -> &[OperationDescriptor] {
        &self.operations
    }

    /// Find an operation by name. Own declarations shadow inherited ones.
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Find an operation by identity.
    pub fn operation_by_id(&self, id: &OperationId) -> Option<&OperationDescriptor> {
        self.operations
            .iter()
            .find(|op| op.name == id.name() && *op.declaring_type().name == *id.contract())
    }
}

/// Builder for [`ContractDescriptor`].
#[derive(Debug)]
pub struct ContractBuilder {
    name: String,
    prefix: KeyPrefix,
    operations: Vec<OperationDescriptor>,
    parents: Vec<ContractDescriptor>,
}

impl ContractBuilder {
    /// Set an explicit key prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = KeyPrefix::Explicit(prefix.into());
        self
    }

    /// Prefix keys with the contract's simple name.
    pub fn prefix_from_type_name(mut self) -> Self {
        self.prefix = KeyPrefix::FromTypeName;
        self
    }

    pub fn key_prefix(mut self, prefix: KeyPrefix) -> Self {
        self.prefix = prefix;
        self
    }

    /// Declare an operation on this contract.
    pub fn operation(mut self, op: OperationDescriptor) -> Self {
        self.operations.push(op);
        self
    }

    /// Inherit every operation of `parent`. Inherited operations keep the
    /// prefix of the contract that declared them.
    pub fn extends(mut self, parent: &ContractDescriptor) -> Self {
        self.parents.push(parent.clone());
        self
    }

    pub fn build(self) -> ContractDescriptor {
        let declaring = Arc::new(DeclaringType {
            name: Arc::from(self.name.as_str()),
            prefix: self.prefix,
        });

        let mut operations: Vec<OperationDescriptor> = self
            .operations
            .into_iter()
            .map(|mut op| {
                op.declaring = Some(declaring.clone());
                op
            })
            .collect();

        // The same ancestor can be reached through several parents.
        for parent in self.parents {
            for op in parent.operations {
                let id = op.id();
                if !operations.iter().any(|existing| existing.id() == id) {
                    operations.push(op);
                }
            }
        }

        ContractDescriptor {
            declaring,
            operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PrimitiveKind;

    fn int() -> TargetType {
        TargetType::primitive(PrimitiveKind::I32)
    }

    #[test]
    fn test_key_prefix_adds_separator() {
        let declaring = DeclaringType {
            name: Arc::from("Server"),
            prefix: KeyPrefix::Explicit("server".to_string()),
        };
        assert_eq!(declaring.key_prefix(), "server.");

        let declaring = DeclaringType {
            name: Arc::from("Server"),
            prefix: KeyPrefix::Explicit("server.".to_string()),
        };
        assert_eq!(declaring.key_prefix(), "server.");

        let declaring = DeclaringType {
            name: Arc::from("Server"),
            prefix: KeyPrefix::FromTypeName,
        };
        assert_eq!(declaring.key_prefix(), "Server.");

        let declaring = DeclaringType {
            name: Arc::from("Server"),
            prefix: KeyPrefix::None,
        };
        assert_eq!(declaring.key_prefix(), "");
    }

    #[test]
    fn test_empty_explicit_key_is_ignored() {
        let op = OperationDescriptor::new("port", int()).with_key("");
        assert_eq!(op.key(), None);
    }

    #[test]
    fn test_inherited_operations_keep_declaring_type() {
        let server = ContractDescriptor::builder("Server")
            .prefix("server")
            .operation(OperationDescriptor::new("port", int()))
            .build();

        let app = ContractDescriptor::builder("App")
            .prefix("app")
            .operation(OperationDescriptor::new("name", TargetType::String))
            .extends(&server)
            .build();

        assert_eq!(app.operations().len(), 2);
        let port = app.operation("port").unwrap();
        assert_eq!(&*port.declaring_type().name, "Server");
        assert_eq!(port.declaring_type().key_prefix(), "server.");
        assert_eq!(port.id(), OperationId::new("Server", "port"));

        let name = app.operation("name").unwrap();
        assert_eq!(name.declaring_type().key_prefix(), "app.");
    }

    #[test]
    fn test_diamond_inheritance_is_deduplicated() {
        let base = ContractDescriptor::builder("Base")
            .operation(OperationDescriptor::new("id", int()))
            .build();
        let left = ContractDescriptor::builder("Left").extends(&base).build();
        let right = ContractDescriptor::builder("Right").extends(&base).build();
        let both = ContractDescriptor::builder("Both")
            .extends(&left)
            .extends(&right)
            .build();

        assert_eq!(both.operations().len(), 1);
        assert!(both
            .operation_by_id(&OperationId::new("Base", "id"))
            .is_some());
    }

    #[test]
    #[should_panic(expected = "contract name must not be empty")]
    fn test_empty_contract_name_panics() {
        let _ = ContractDescriptor::builder("");
    }
}
