//! Binding providers to contracts.
//!
//! This module turns a [`ContractDescriptor`](crate::ContractDescriptor) and a
//! [`DataProvider`](crate::DataProvider) into a live [`Accessor`]:
//! - Key resolution (derived keys, explicit keys, aliases, prefixes)
//! - Operation dispatch with the per-accessor result cache
//! - Accessor construction over ordered binding contexts
//! - The `contract!` and `enumeration!` macros

pub mod accessor;
pub mod cache;
pub mod factory;
mod macros;
pub mod resolver;

pub use accessor::{Accessor, Contract};
pub use cache::ResultCache;
pub use factory::{create_accessor, AccessorFactory, BindingContext};
