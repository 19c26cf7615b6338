//! Dynamic values flowing from providers through translation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::core::types::{CustomType, EnumDescriptor, PrimitiveKind, TargetType};

/// A member of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub descriptor: EnumDescriptor,
    pub index: usize,
}

impl EnumValue {
    pub fn name(&self) -> &'static str {
        self.descriptor.members[self.index]
    }
}

/// An opaque user value, tagged with its type.
#[derive(Clone)]
pub struct CustomValue {
    ty: CustomType,
    value: Arc<dyn Any + Send + Sync>,
    render: fn(&(dyn Any + Send + Sync)) -> String,
}

fn render_debug<T: Any + fmt::Debug>(value: &(dyn Any + Send + Sync)) -> String {
    value
        .downcast_ref::<T>()
        .map(|v| format!("{:?}", v))
        .unwrap_or_default()
}

fn render_display<T: Any + fmt::Display>(value: &(dyn Any + Send + Sync)) -> String {
    value
        .downcast_ref::<T>()
        .map(|v| v.to_string())
        .unwrap_or_default()
}

impl CustomValue {
    /// Wrap a value whose text form is its `Debug` rendering.
    pub fn new<T: Any + Send + Sync + fmt::Debug>(value: T) -> Self {
        CustomValue {
            ty: CustomType::of::<T>(),
            value: Arc::new(value),
            render: render_debug::<T>,
        }
    }

    /// Wrap a value whose text form is its `Display` rendering.
    pub fn displayed<T: Any + Send + Sync + fmt::Display>(value: T) -> Self {
        CustomValue {
            ty: CustomType::of::<T>(),
            value: Arc::new(value),
            render: render_display::<T>,
        }
    }

    pub fn custom_type(&self) -> CustomType {
        self.ty
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn to_text(&self) -> String {
        (self.render)(self.value.as_ref())
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.ty.simple_name(), self.to_text())
    }
}

/// The runtime kind of a [`Value`], used for constructor matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Text,
    Primitive(PrimitiveKind),
    Enum(EnumDescriptor),
    Type,
    Custom(CustomType),
}

/// An untyped value as stored by a provider or produced by translation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Only meaningful as a call argument. Translation results report
    /// "null" as `None`.
    Null,
    Text(String),
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Enum(EnumValue),
    Type(TargetType),
    Custom(CustomValue),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn custom<T: Any + Send + Sync + fmt::Debug>(value: T) -> Self {
        Value::Custom(CustomValue::new(value))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Text(_) => ValueKind::Text,
            Value::Bool(_) => ValueKind::Primitive(PrimitiveKind::Bool),
            Value::Char(_) => ValueKind::Primitive(PrimitiveKind::Char),
            Value::I8(_) => ValueKind::Primitive(PrimitiveKind::I8),
            Value::I16(_) => ValueKind::Primitive(PrimitiveKind::I16),
            Value::I32(_) => ValueKind::Primitive(PrimitiveKind::I32),
            Value::I64(_) => ValueKind::Primitive(PrimitiveKind::I64),
            Value::U8(_) => ValueKind::Primitive(PrimitiveKind::U8),
            Value::U16(_) => ValueKind::Primitive(PrimitiveKind::U16),
            Value::U32(_) => ValueKind::Primitive(PrimitiveKind::U32),
            Value::U64(_) => ValueKind::Primitive(PrimitiveKind::U64),
            Value::F32(_) => ValueKind::Primitive(PrimitiveKind::F32),
            Value::F64(_) => ValueKind::Primitive(PrimitiveKind::F64),
            Value::Enum(e) => ValueKind::Enum(e.descriptor),
            Value::Type(_) => ValueKind::Type,
            Value::Custom(c) => ValueKind::Custom(c.custom_type()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_custom<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(c) => c.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Canonical text representation.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Text(s) => s.clone(),
            Value::Bool(v) => v.to_string(),
            Value::Char(v) => v.to_string(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Enum(e) => e.name().to_string(),
            Value::Type(t) => t.to_string(),
            Value::Custom(c) => c.to_text(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

macro_rules! value_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from_scalar! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

impl From<TargetType> for Value {
    fn from(v: TargetType) -> Self {
        Value::Type(v)
    }
}

impl From<CustomValue> for Value {
    fn from(v: CustomValue) -> Self {
        Value::Custom(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_scalars() {
        assert_eq!(Value::from(5i32).kind(), ValueKind::Primitive(PrimitiveKind::I32));
        assert_eq!(Value::from("x").kind(), ValueKind::Text);
        assert_eq!(Value::Null.kind(), ValueKind::Null);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::from(true).to_text(), "true");
        assert_eq!(Value::from(42u64).to_text(), "42");
        assert_eq!(Value::from(1.5f64).to_text(), "1.5");
        assert_eq!(Value::Null.to_text(), "null");

        const LEVEL: EnumDescriptor = EnumDescriptor::new("Level", &["Low", "High"]);
        let high = Value::Enum(EnumValue {
            descriptor: LEVEL,
            index: 1,
        });
        assert_eq!(high.to_text(), "High");
    }

    #[test]
    fn test_custom_value_downcast() {
        let value = Value::custom(std::path::PathBuf::from("/tmp"));
        assert_eq!(
            value.as_custom::<std::path::PathBuf>(),
            Some(&std::path::PathBuf::from("/tmp"))
        );
        assert!(value.as_custom::<String>().is_none());
        assert_eq!(
            value.kind(),
            ValueKind::Custom(CustomType::of::<std::path::PathBuf>())
        );
    }

    #[test]
    fn test_custom_value_display_rendering() {
        let value = CustomValue::displayed(std::net::Ipv4Addr::LOCALHOST);
        assert_eq!(value.to_text(), "127.0.0.1");
    }
}
