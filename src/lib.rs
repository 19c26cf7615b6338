//! propbind - typed accessors over string-keyed property sources
//!
//! A caller declares an access contract (a set of named, typed read
//! operations) and binds it to a [`DataProvider`]. Each operation resolves
//! its lookup key from declarative metadata, reads the raw value, and
//! translates it into the declared return type through a pipeline of
//! standard conversions, pluggable [`Translator`]s and registered
//! constructors.
//!
//! ```rust,ignore
//! propbind::contract! {
//!     pub struct Server: prefix("server") {
//!         fn port() -> u16 = { default: "8080" };
//!     }
//! }
//!
//! let server: Server = propbind::create_accessor(propbind::system_environment())?;
//! let port = server.port();
//! ```

pub mod binding;
pub mod core;
pub mod error;
pub mod provider;
pub mod translate;
pub mod util;

/// Test utilities for propbind unit tests.
///
/// Fixture translators and a query-counting provider.
#[cfg(test)]
pub mod test_support;

pub use binding::{
    create_accessor, Accessor, AccessorFactory, BindingContext, Contract, ResultCache,
};
pub use core::{
    BindEnum, Bindable, ContractBuilder, ContractDescriptor, CustomType, CustomValue,
    DeclaringType, EnumDescriptor, EnumValue, FromValue, IntoValue, KeyPrefix,
    OperationDescriptor, OperationId, PrimitiveKind, TargetType, Value, ValueKind,
};
pub use error::{BindError, ProviderError};
pub use provider::{
    compound, from_map, system_environment, CompoundProvider, DataProvider, EnvironmentProvider,
    MapProvider,
};
pub use translate::{
    ConstructorRegistry, ParamType, Translation, TranslationContext, Translator,
    TranslatorRegistry, ValueTranslator,
};
pub use util::config::EngineConfig;
