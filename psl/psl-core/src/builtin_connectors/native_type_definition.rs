/// Declares the native type enum of a connector.
///
/// Each line is a variant name, its arguments type in parentheses if any,
/// and the scalar types the native type can back:
///
/// ```ignore
/// crate::native_type_definition! {
///     /// The MySQL native type enum.
///     MySqlType;
///     Int -> Int,
///     Decimal(Option<(u32, u32)>) -> Decimal,
///     Bit(u32) -> Boolean | Bytes,
/// }
/// ```
///
/// The argument types implement `NativeTypeArguments`. The macro generates
/// the enum, its `CONSTRUCTORS` table, `from_parts()`, `to_parts()` and
/// `scalar_types()`.
#[macro_export]
macro_rules! native_type_definition {
    (@constructor $variant:ident ($params:ty) -> $($scalar:ident)|+) => {
        $crate::datamodel_connector::NativeTypeConstructor {
            name: stringify!($variant),
            number_of_args: <$params as $crate::datamodel_connector::NativeTypeArguments>::REQUIRED_ARGUMENTS_COUNT,
            number_of_optional_args:
                <$params as $crate::datamodel_connector::NativeTypeArguments>::OPTIONAL_ARGUMENTS_COUNT,
            prisma_types: &[$($crate::schema_graph::ScalarType::$scalar),+],
        }
    };
    (@constructor $variant:ident -> $($scalar:ident)|+) => {
        $crate::datamodel_connector::NativeTypeConstructor::without_args(
            stringify!($variant),
            &[$($crate::schema_graph::ScalarType::$scalar),+],
        )
    };
    (@parse $variant:ident ($params:ty), $args:expr, $span:expr, $diagnostics:expr) => {
        <$params as $crate::datamodel_connector::NativeTypeArguments>::from_parts(
            stringify!($variant),
            $args,
            $span,
            $diagnostics,
        )
        .map(Self::$variant)
    };
    (@parse $variant:ident, $args:expr, $span:expr, $diagnostics:expr) => {
        if $args.is_empty() {
            Some(Self::$variant)
        } else {
            $diagnostics.push_error($crate::diagnostics::DatamodelError::new_native_type_argument_count_mismatch_error(
                stringify!($variant),
                0,
                $args.len(),
                $span,
            ));
            None
        }
    };
    (@arguments $self:expr, $variant:ident ($params:ty)) => {
        if let Self::$variant(args) = $self {
            return (
                stringify!($variant),
                $crate::datamodel_connector::NativeTypeArguments::to_parts(args),
            );
        }
    };
    (@arguments $self:expr, $variant:ident) => {};
    (
        $(#[$docs:meta])*
        $enum_name:ident;
        $( $variant:ident $(($params:ty))? -> $($scalar:ident)|+ ),+ $(,)?
    ) => {
        $(#[$docs])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $enum_name {
            $( $variant $(($params))?, )+
        }

        impl $enum_name {
            /// Every native type of the connector, for lookups and completions.
            pub const CONSTRUCTORS: &'static [$crate::datamodel_connector::NativeTypeConstructor] = &[
                $( $crate::native_type_definition!(@constructor $variant $(($params))? -> $($scalar)|+), )+
            ];

            /// Parse a native type from its name and raw arguments. Errors
            /// name the connector.
            pub fn from_parts(
                connector_name: &str,
                name: &str,
                args: &[String],
                span: $crate::diagnostics::Span,
                diagnostics: &mut $crate::diagnostics::Diagnostics,
            ) -> Option<Self> {
                match name {
                    $( stringify!($variant) => {
                        $crate::native_type_definition!(@parse $variant $(($params))?, args, span, diagnostics)
                    } )+
                    _ => {
                        diagnostics.push_error($crate::diagnostics::DatamodelError::new_native_type_name_unknown(
                            connector_name,
                            name,
                            span,
                        ));
                        None
                    }
                }
            }

            /// The name and the stringified arguments.
            pub fn to_parts(&self) -> (&'static str, Vec<String>) {
                $( $crate::native_type_definition!(@arguments self, $variant $(($params))?); )+

                let name = match self {
                    $( Self::$variant { .. } => stringify!($variant), )+
                };

                (name, Vec::new())
            }

            /// The scalar types a field with this native type can have.
            pub fn scalar_types(&self) -> &'static [$crate::schema_graph::ScalarType] {
                match self {
                    $( Self::$variant { .. } => &[$($crate::schema_graph::ScalarType::$scalar),+], )+
                }
            }
        }
    };
}
