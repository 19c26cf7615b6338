//! Typed surface over [`Value`].
//!
//! [`Bindable`] is implemented by every type an operation may return. Scalars
//! and `String` absorb a missing translation into their zero value; anything
//! that can be missing is returned as `Option<T>` where `T: FromValue`.
//! Call arguments go the other way through [`IntoValue`].

use std::path::PathBuf;
use std::time::Duration;

use crate::core::types::{EnumDescriptor, PrimitiveKind, TargetType};
use crate::core::value::{EnumValue, Value};

/// A type that can be the declared return type of an operation.
pub trait Bindable: Sized {
    fn target_type() -> TargetType;

    /// Convert a translation result. `None` is a translation that produced
    /// null.
    fn from_translated(value: Option<Value>) -> Self;
}

/// A type that can appear inside `Option<T>` as a return type.
pub trait FromValue: Sized {
    /// The target type used when `Option<Self>` is requested.
    fn nullable_target_type() -> TargetType;

    fn from_value(value: Value) -> Option<Self>;
}

/// A type that can be passed as an operation argument.
pub trait IntoValue {
    /// The declared parameter type.
    fn param_type() -> TargetType;

    fn into_value(self) -> Value;
}

impl<T: FromValue> Bindable for Option<T> {
    fn target_type() -> TargetType {
        T::nullable_target_type()
    }

    fn from_translated(value: Option<Value>) -> Self {
        value.and_then(T::from_value)
    }
}

impl Bindable for String {
    fn target_type() -> TargetType {
        TargetType::String
    }

    fn from_translated(value: Option<Value>) -> Self {
        value.map(|v| v.to_text()).unwrap_or_default()
    }
}

impl FromValue for String {
    fn nullable_target_type() -> TargetType {
        TargetType::String
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value.to_text())
    }
}

impl IntoValue for String {
    fn param_type() -> TargetType {
        TargetType::String
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn param_type() -> TargetType {
        TargetType::String
    }

    fn into_value(self) -> Value {
        Value::text(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn param_type() -> TargetType {
        match T::param_type() {
            TargetType::Primitive { kind, .. } => TargetType::nullable(kind),
            other => other,
        }
    }

    fn into_value(self) -> Value {
        self.map(IntoValue::into_value).unwrap_or(Value::Null)
    }
}

macro_rules! bindable_primitive {
    ($($ty:ty => $kind:ident / $variant:ident),* $(,)?) => {
        $(
            impl Bindable for $ty {
                fn target_type() -> TargetType {
                    TargetType::primitive(PrimitiveKind::$kind)
                }

                fn from_translated(value: Option<Value>) -> Self {
                    value
                        .and_then(<$ty as FromValue>::from_value)
                        .unwrap_or_default()
                }
            }

            impl FromValue for $ty {
                fn nullable_target_type() -> TargetType {
                    TargetType::nullable(PrimitiveKind::$kind)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl IntoValue for $ty {
                fn param_type() -> TargetType {
                    TargetType::primitive(PrimitiveKind::$kind)
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

bindable_primitive! {
    bool => Bool / Bool,
    char => Char / Char,
    i8 => I8 / I8,
    i16 => I16 / I16,
    i32 => I32 / I32,
    i64 => I64 / I64,
    u8 => U8 / U8,
    u16 => U16 / U16,
    u32 => U32 / U32,
    u64 => U64 / U64,
    f32 => F32 / F32,
    f64 => F64 / F64,
}

impl FromValue for TargetType {
    fn nullable_target_type() -> TargetType {
        TargetType::TypeRef
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }
}

impl IntoValue for TargetType {
    fn param_type() -> TargetType {
        TargetType::TypeRef
    }

    fn into_value(self) -> Value {
        Value::Type(self)
    }
}

/// Rust enums usable as enumeration targets.
///
/// Usually implemented with the [`enumeration!`](crate::enumeration) macro.
pub trait BindEnum: Sized + Copy + 'static {
    const DESCRIPTOR: EnumDescriptor;

    fn from_index(index: usize) -> Option<Self>;

    fn index(self) -> usize;

    fn to_enum_value(self) -> EnumValue {
        EnumValue {
            descriptor: Self::DESCRIPTOR,
            index: self.index(),
        }
    }

    /// Convert an enumeration value of this type back into `Self`.
    fn from_enum_value(value: &Value) -> Option<Self> {
        match value {
            Value::Enum(e) if e.descriptor == Self::DESCRIPTOR => Self::from_index(e.index),
            _ => None,
        }
    }
}

/// Implement [`FromValue`] and [`IntoValue`] for types carried as
/// [`Value::Custom`]. The types must be `Clone + Debug + Send + Sync`.
#[macro_export]
macro_rules! custom_bindable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::FromValue for $ty {
                fn nullable_target_type() -> $crate::TargetType {
                    $crate::TargetType::custom::<$ty>()
                }

                fn from_value(value: $crate::Value) -> ::std::option::Option<Self> {
                    value.as_custom::<$ty>().cloned()
                }
            }

            impl $crate::IntoValue for $ty {
                fn param_type() -> $crate::TargetType {
                    $crate::TargetType::custom::<$ty>()
                }

                fn into_value(self) -> $crate::Value {
                    $crate::Value::custom(self)
                }
            }
        )*
    };
}

custom_bindable!(PathBuf, Duration, Vec<String>);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Value::custom(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::custom(value)
    }
}
