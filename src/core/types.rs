//! Target type descriptors.
//!
//! A [`TargetType`] describes what an operation's raw value must be
//! translated into. It is the runtime stand-in for a declared return type.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Primitive scalar kinds understood by the standard type translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
    ];

    /// Rust spelling of the kind (`i32`, `bool`, ...).
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
        }
    }

    /// Look up a kind by its Rust spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        PrimitiveKind::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of an enumeration: its name and member names in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub members: &'static [&'static str],
}

impl EnumDescriptor {
    pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
        EnumDescriptor { name, members }
    }

    /// Case-insensitive member lookup. First match wins.
    pub fn position_of(&self, text: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|member| member.eq_ignore_ascii_case(text))
    }
}

/// A user type identified by its `TypeId`.
///
/// Equality and hashing only consider the `TypeId`; the name is carried
/// for diagnostics and name-based lookups.
#[derive(Debug, Clone, Copy)]
pub struct CustomType {
    id: TypeId,
    name: &'static str,
}

impl CustomType {
    /// Describe the Rust type `T`.
    pub fn of<T: 'static>() -> Self {
        CustomType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name.
    pub fn simple_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CustomType {}

impl Hash for CustomType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

/// The declared return type of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Text.
    String,
    /// A scalar. `nullable` marks the `Option<T>` form.
    Primitive { kind: PrimitiveKind, nullable: bool },
    /// An enumeration.
    Enum(EnumDescriptor),
    /// Any other user type, translated by plugins or registered constructors.
    Custom(CustomType),
    /// A type named by text, resolved with [`TargetType::from_name`].
    TypeRef,
}

impl TargetType {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TargetType::Primitive {
            kind,
            nullable: false,
        }
    }

    pub fn nullable(kind: PrimitiveKind) -> Self {
        TargetType::Primitive {
            kind,
            nullable: true,
        }
    }

    pub fn custom<T: 'static>() -> Self {
        TargetType::Custom(CustomType::of::<T>())
    }

    /// Whether a translation to this type may legitimately produce `None`
    /// through the primitive strategy.
    pub fn is_nullable(&self) -> bool {
        !matches!(
            self,
            TargetType::Primitive {
                nullable: false,
                ..
            }
        )
    }

    /// Whether this is the target for a specific custom type.
    pub fn is_custom<T: 'static>(&self) -> bool {
        matches!(self, TargetType::Custom(c) if c.id() == TypeId::of::<T>())
    }

    /// Resolve a type from its textual name.
    ///
    /// Recognizes `String`/`string`/`str`, the primitive spellings, and
    /// `Option<primitive>`. Custom types cannot be resolved by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        match name {
            "String" | "string" | "str" | "&str" => return Some(TargetType::String),
            _ => {}
        }

        if let Some(inner) = name
            .strip_prefix("Option<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return PrimitiveKind::from_name(inner.trim()).map(TargetType::nullable);
        }

        PrimitiveKind::from_name(name).map(TargetType::primitive)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::String => f.write_str("String"),
            TargetType::Primitive {
                kind,
                nullable: false,
            } => write!(f, "{}", kind),
            TargetType::Primitive {
                kind,
                nullable: true,
            } => write!(f, "Option<{}>", kind),
            TargetType::Enum(desc) => f.write_str(desc.name),
            TargetType::Custom(custom) => f.write_str(custom.name()),
            TargetType::TypeRef => f.write_str("TargetType"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(TargetType::from_name("String"), Some(TargetType::String));
        assert_eq!(
            TargetType::from_name("i64"),
            Some(TargetType::primitive(PrimitiveKind::I64))
        );
        assert_eq!(
            TargetType::from_name("Option<bool>"),
            Some(TargetType::nullable(PrimitiveKind::Bool))
        );
        assert_eq!(TargetType::from_name("Option<String>"), None);
        assert_eq!(TargetType::from_name("java.lang.Object"), None);
    }

    #[test]
    fn test_display_round_trips_through_from_name() {
        for kind in PrimitiveKind::ALL {
            let plain = TargetType::primitive(kind);
            let opt = TargetType::nullable(kind);
            assert_eq!(TargetType::from_name(&plain.to_string()), Some(plain));
            assert_eq!(TargetType::from_name(&opt.to_string()), Some(opt));
        }
    }

    #[test]
    fn test_custom_type_identity() {
        struct Marker;
        let a = CustomType::of::<Marker>();
        let b = CustomType::of::<Marker>();
        assert_eq!(a, b);
        assert_ne!(a, CustomType::of::<std::path::PathBuf>());
        assert_eq!(a.simple_name(), "Marker");
        assert!(TargetType::Custom(a).is_custom::<Marker>());
    }

    #[test]
    fn test_enum_position_is_case_insensitive() {
        const COLOR: EnumDescriptor = EnumDescriptor::new("Color", &["Red", "Green"]);
        assert_eq!(COLOR.position_of("green"), Some(1));
        assert_eq!(COLOR.position_of("RED"), Some(0));
        assert_eq!(COLOR.position_of("blue"), None);
    }

    #[test]
    fn test_nullability() {
        assert!(!TargetType::primitive(PrimitiveKind::I32).is_nullable());
        assert!(TargetType::nullable(PrimitiveKind::I32).is_nullable());
        assert!(TargetType::String.is_nullable());
    }
}
