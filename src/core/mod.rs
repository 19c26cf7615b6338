//! Core data structures for propbind.
//!
//! This module contains the foundational types used throughout the engine:
//! - Target types (primitives, enumerations, custom types)
//! - Dynamic values
//! - Contract and operation descriptors
//! - The typed surface mapping Rust types to both

pub mod contract;
pub mod convert;
pub mod types;
pub mod value;

pub use contract::{
    ContractBuilder, ContractDescriptor, DeclaringType, KeyPrefix, OperationDescriptor,
    OperationId,
};
pub use convert::{BindEnum, Bindable, FromValue, IntoValue};
pub use types::{CustomType, EnumDescriptor, PrimitiveKind, TargetType};
pub use value::{CustomValue, EnumValue, Value, ValueKind};
