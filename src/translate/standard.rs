//! Built-in translation of scalars and enumerations.
//!
//! Consulted before any registered translator. A primitive target is always
//! handled here: values that cannot be used fall back to the type's zero
//! value, or to `None` for the nullable form.

use std::str::FromStr;

use crate::core::types::{EnumDescriptor, PrimitiveKind, TargetType};
use crate::core::value::{EnumValue, Value};

/// Result of asking the standard translator about a target.
#[derive(Debug, Clone, PartialEq)]
pub enum Standard {
    /// The target is a standard type; this is the final result.
    Handled(Option<Value>),
    /// Not a standard type; later strategies decide.
    NotHandled,
}

/// Translate `source` if `target` is a primitive or an enumeration.
pub fn translate(source: Option<&Value>, target: &TargetType) -> Standard {
    match target {
        TargetType::Primitive { kind, nullable } => {
            let translated = source.and_then(|v| to_primitive(v, *kind));
            if translated.is_none() {
                tracing::trace!(ty = %target, "primitive translation fell back to default");
            }
            Standard::Handled(match translated {
                Some(v) => Some(v),
                None if *nullable => None,
                None => Some(zero(*kind)),
            })
        }
        TargetType::Enum(descriptor) => {
            Standard::Handled(source.and_then(|v| to_enum(v, descriptor)))
        }
        _ => Standard::NotHandled,
    }
}

/// The zero-equivalent of a primitive kind.
pub fn zero(kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Bool => Value::Bool(false),
        PrimitiveKind::Char => Value::Char('\0'),
        PrimitiveKind::I8 => Value::I8(0),
        PrimitiveKind::I16 => Value::I16(0),
        PrimitiveKind::I32 => Value::I32(0),
        PrimitiveKind::I64 => Value::I64(0),
        PrimitiveKind::U8 => Value::U8(0),
        PrimitiveKind::U16 => Value::U16(0),
        PrimitiveKind::U32 => Value::U32(0),
        PrimitiveKind::U64 => Value::U64(0),
        PrimitiveKind::F32 => Value::F32(0.0),
        PrimitiveKind::F64 => Value::F64(0.0),
    }
}

fn to_primitive(source: &Value, kind: PrimitiveKind) -> Option<Value> {
    match source {
        Value::Text(text) => parse(text, kind),
        Value::Bool(b) if kind == PrimitiveKind::Bool => Some(Value::Bool(*b)),
        Value::Char(c) if kind == PrimitiveKind::Char => Some(Value::Char(*c)),
        other => convert_number(other, kind),
    }
}

fn parse(text: &str, kind: PrimitiveKind) -> Option<Value> {
    let text = text.trim();
    match kind {
        PrimitiveKind::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
        PrimitiveKind::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        PrimitiveKind::I8 => parse_as::<i8>(text).map(Value::I8),
        PrimitiveKind::I16 => parse_as::<i16>(text).map(Value::I16),
        PrimitiveKind::I32 => parse_as::<i32>(text).map(Value::I32),
        PrimitiveKind::I64 => parse_as::<i64>(text).map(Value::I64),
        PrimitiveKind::U8 => parse_as::<u8>(text).map(Value::U8),
        PrimitiveKind::U16 => parse_as::<u16>(text).map(Value::U16),
        PrimitiveKind::U32 => parse_as::<u32>(text).map(Value::U32),
        PrimitiveKind::U64 => parse_as::<u64>(text).map(Value::U64),
        PrimitiveKind::F32 => parse_as::<f32>(text).map(Value::F32),
        PrimitiveKind::F64 => parse_as::<f64>(text).map(Value::F64),
    }
}

fn parse_as<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

/// Numeric values of another width are accepted when they fit.
fn convert_number(source: &Value, kind: PrimitiveKind) -> Option<Value> {
    enum Num {
        Int(i128),
        Float(f64),
    }

    let num = match source {
        Value::I8(v) => Num::Int(i128::from(*v)),
        Value::I16(v) => Num::Int(i128::from(*v)),
        Value::I32(v) => Num::Int(i128::from(*v)),
        Value::I64(v) => Num::Int(i128::from(*v)),
        Value::U8(v) => Num::Int(i128::from(*v)),
        Value::U16(v) => Num::Int(i128::from(*v)),
        Value::U32(v) => Num::Int(i128::from(*v)),
        Value::U64(v) => Num::Int(i128::from(*v)),
        Value::F32(v) => Num::Float(f64::from(*v)),
        Value::F64(v) => Num::Float(*v),
        _ => return None,
    };

    match (num, kind) {
        (Num::Int(i), PrimitiveKind::I8) => i8::try_from(i).ok().map(Value::I8),
        (Num::Int(i), PrimitiveKind::I16) => i16::try_from(i).ok().map(Value::I16),
        (Num::Int(i), PrimitiveKind::I32) => i32::try_from(i).ok().map(Value::I32),
        (Num::Int(i), PrimitiveKind::I64) => i64::try_from(i).ok().map(Value::I64),
        (Num::Int(i), PrimitiveKind::U8) => u8::try_from(i).ok().map(Value::U8),
        (Num::Int(i), PrimitiveKind::U16) => u16::try_from(i).ok().map(Value::U16),
        (Num::Int(i), PrimitiveKind::U32) => u32::try_from(i).ok().map(Value::U32),
        (Num::Int(i), PrimitiveKind::U64) => u64::try_from(i).ok().map(Value::U64),
        (Num::Int(i), PrimitiveKind::F32) => Some(Value::F32(i as f32)),
        (Num::Int(i), PrimitiveKind::F64) => Some(Value::F64(i as f64)),
        (Num::Float(f), PrimitiveKind::F32) => Some(Value::F32(f as f32)),
        (Num::Float(f), PrimitiveKind::F64) => Some(Value::F64(f)),
        _ => None,
    }
}

fn to_enum(source: &Value, descriptor: &EnumDescriptor) -> Option<Value> {
    match source {
        Value::Enum(e) if e.descriptor == *descriptor => Some(Value::Enum(*e)),
        Value::Text(text) => descriptor.position_of(text.trim()).map(|index| {
            Value::Enum(EnumValue {
                descriptor: *descriptor,
                index,
            })
        }),
        _ => None,
    }
}
