//! Declarative contract and enumeration definitions.

/// Declare a typed contract.
///
/// Generates a struct wrapping an [`Accessor`](crate::Accessor), one method
/// per operation, and the [`Contract`](crate::Contract) impl carrying the
/// registration table.
///
/// ```rust,ignore
/// propbind::contract! {
///     pub struct Server: prefix("server") {
///         fn host() -> String = { default: "localhost" };
///         fn port() -> u16 = { key: "listen.port", aliases: ["port"] };
///         fn timeout() -> Option<Duration>;
///     }
/// }
///
/// propbind::contract! {
///     pub struct App: prefix(Self) extends { server: Server } {
///         fn getName() -> String;
///         fn greeting(who: &str) -> String = { default: "Hello {0}" };
///     }
/// }
/// ```
///
/// `prefix(Self)` prefixes keys with the struct name; any other expression
/// is used as an explicit prefix. Each `extends` entry adds the parent's
/// operations and a method returning the parent's typed view.
#[macro_export]
macro_rules! contract {
    (@prefix $builder:ident, Self) => {
        $builder.prefix_from_type_name()
    };
    (@prefix $builder:ident, $prefix:expr) => {
        $builder.prefix($prefix)
    };

    (@bind $op:expr,) => {
        $op
    };
    (@bind $op:expr, key: $key:expr $(, $($rest:tt)*)?) => {
        $crate::contract!(@bind $op.with_key($key), $($($rest)*)?)
    };
    (@bind $op:expr, default: $default:expr $(, $($rest:tt)*)?) => {
        $crate::contract!(@bind $op.with_default($default), $($($rest)*)?)
    };
    (@bind $op:expr, aliases: [$($alias:expr),* $(,)?] $(, $($rest:tt)*)?) => {
        $crate::contract!(
            @bind $op.with_aliases::<::std::vec::Vec<&str>, &str>(::std::vec![$($alias),*]),
            $($($rest)*)?
        )
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: prefix($prefix:tt))?
            $(extends { $($pfield:ident : $parent:ident),* $(,)? })?
        {
            $(
                $(#[$opmeta:meta])*
                fn $op:ident($($arg:ident : $argty:ty),* $(,)?) -> $ret:ty $(= { $($bind:tt)* })?;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            accessor: $crate::Accessor,
        }

        #[allow(non_snake_case, dead_code)]
        impl $name {
            $(
                $(#[$opmeta])*
                pub fn $op(&self $(, $arg: $argty)*) -> $ret {
                    let args: ::std::vec::Vec<$crate::Value> =
                        ::std::vec![$($crate::IntoValue::into_value($arg)),*];
                    let id = $crate::OperationId::new(stringify!($name), stringify!($op));
                    <$ret as $crate::Bindable>::from_translated(
                        self.accessor.invoke_id(&id, &args),
                    )
                }
            )*

            $($(
                pub fn $pfield(&self) -> $parent {
                    <$parent as $crate::Contract>::from_accessor(self.accessor.clone())
                }
            )*)?
        }

        impl $crate::Contract for $name {
            fn descriptor() -> $crate::ContractDescriptor {
                let builder = $crate::ContractDescriptor::builder(stringify!($name));
                $(let builder = $crate::contract!(@prefix builder, $prefix);)?
                $($(
                    let builder = builder.extends(&<$parent as $crate::Contract>::descriptor());
                )*)?
                $(
                    let builder = builder.operation($crate::contract!(
                        @bind $crate::OperationDescriptor::new(
                            stringify!($op),
                            <$ret as $crate::Bindable>::target_type(),
                        )
                        .with_params(::std::vec![
                            $(<$argty as $crate::IntoValue>::param_type()),*
                        ]),
                        $($($bind)*)?
                    ));
                )*
                builder.build()
            }

            fn from_accessor(accessor: $crate::Accessor) -> Self {
                $name { accessor }
            }

            fn accessor(&self) -> &$crate::Accessor {
                &self.accessor
            }
        }
    };
}

/// Declare a fieldless enum usable as an enumeration target.
///
/// Members are matched case-insensitively against provider text. Use the
/// enum as `Option<E>` in a contract; a value that names no member is
/// `None`.
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::BindEnum for $name {
            const DESCRIPTOR: $crate::EnumDescriptor =
                $crate::EnumDescriptor::new(stringify!($name), &[$(stringify!($variant)),+]);

            fn from_index(index: usize) -> ::std::option::Option<Self> {
                const VARIANTS: &[$name] = &[$($name::$variant),+];
                VARIANTS.get(index).copied()
            }

            fn index(self) -> usize {
                self as usize
            }
        }

        impl $crate::FromValue for $name {
            fn nullable_target_type() -> $crate::TargetType {
                $crate::TargetType::Enum(<$name as $crate::BindEnum>::DESCRIPTOR)
            }

            fn from_value(value: $crate::Value) -> ::std::option::Option<Self> {
                <$name as $crate::BindEnum>::from_enum_value(&value)
            }
        }

        impl $crate::IntoValue for $name {
            fn param_type() -> $crate::TargetType {
                $crate::TargetType::Enum(<$name as $crate::BindEnum>::DESCRIPTOR)
            }

            fn into_value(self) -> $crate::Value {
                $crate::Value::Enum($crate::BindEnum::to_enum_value(self))
            }
        }
    };
}
