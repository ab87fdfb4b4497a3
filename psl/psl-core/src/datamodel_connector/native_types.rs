use diagnostics::{DatamodelError, Diagnostics, Span};
use schema_graph::ScalarType;
use std::fmt;

#[cfg(feature = "cockroachdb")]
use crate::builtin_connectors::CockroachType;
#[cfg(feature = "mongodb")]
use crate::builtin_connectors::MongoDbType;
#[cfg(feature = "mssql")]
use crate::builtin_connectors::MsSqlType;
#[cfg(feature = "mysql")]
use crate::builtin_connectors::MySqlType;
#[cfg(feature = "postgresql")]
use crate::builtin_connectors::PostgresType;

/// Represents an available native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeTypeConstructor {
    /// The name that is used in the schema to reference the native type.
    pub name: &'static str,

    /// The number of arguments that must be provided.
    pub number_of_args: usize,

    /// The number of optional arguments.
    pub number_of_optional_args: usize,

    /// The scalar types this native type is compatible with.
    pub prisma_types: &'static [ScalarType],
}

impl NativeTypeConstructor {
    pub const fn without_args(name: &'static str, prisma_types: &'static [ScalarType]) -> NativeTypeConstructor {
        NativeTypeConstructor {
            name,
            number_of_args: 0,
            number_of_optional_args: 0,
            prisma_types,
        }
    }

    pub const fn with_args(
        name: &'static str,
        number_of_args: usize,
        prisma_types: &'static [ScalarType],
    ) -> NativeTypeConstructor {
        NativeTypeConstructor {
            name,
            number_of_args,
            number_of_optional_args: 0,
            prisma_types,
        }
    }

    pub const fn with_optional_args(
        name: &'static str,
        number_of_optional_args: usize,
        prisma_types: &'static [ScalarType],
    ) -> NativeTypeConstructor {
        NativeTypeConstructor {
            name,
            number_of_args: 0,
            number_of_optional_args,
            prisma_types,
        }
    }

    /// True if a field of the given scalar type can use the native type.
    pub fn is_compatible_with(&self, scalar_type: ScalarType) -> bool {
        self.prisma_types.contains(&scalar_type)
    }
}

/// The arguments of a native type variant, as parsed from the strings in
/// the schema. Implemented for each argument shape used by the connectors.
pub trait NativeTypeArguments: Sized {
    const REQUIRED_ARGUMENTS_COUNT: usize;
    const OPTIONAL_ARGUMENTS_COUNT: usize;

    /// Parse the arguments. Pushes an error and returns `None` on arity or
    /// parsing errors.
    fn from_parts(native_type: &str, parts: &[String], span: Span, diagnostics: &mut Diagnostics) -> Option<Self>;

    fn to_parts(&self) -> Vec<String>;
}

pub(crate) fn parse_u32(raw: &str, span: Span, diagnostics: &mut Diagnostics) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push_error(DatamodelError::new_value_parser_error(
                "numeric",
                &err.to_string(),
                raw,
                span,
            ));
            None
        }
    }
}

impl NativeTypeArguments for u32 {
    const REQUIRED_ARGUMENTS_COUNT: usize = 1;
    const OPTIONAL_ARGUMENTS_COUNT: usize = 0;

    fn from_parts(native_type: &str, parts: &[String], span: Span, diagnostics: &mut Diagnostics) -> Option<Self> {
        match parts {
            [raw] => parse_u32(raw, span, diagnostics),
            _ => {
                diagnostics.push_error(DatamodelError::new_native_type_argument_count_mismatch_error(
                    native_type,
                    Self::REQUIRED_ARGUMENTS_COUNT,
                    parts.len(),
                    span,
                ));
                None
            }
        }
    }

    fn to_parts(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl NativeTypeArguments for Option<u32> {
    const REQUIRED_ARGUMENTS_COUNT: usize = 0;
    const OPTIONAL_ARGUMENTS_COUNT: usize = 1;

    fn from_parts(native_type: &str, parts: &[String], span: Span, diagnostics: &mut Diagnostics) -> Option<Self> {
        match parts {
            [] => Some(None),
            [raw] => parse_u32(raw, span, diagnostics).map(Some),
            _ => {
                diagnostics.push_error(DatamodelError::new_native_type_optional_argument_count_mismatch_error(
                    native_type,
                    Self::OPTIONAL_ARGUMENTS_COUNT,
                    parts.len(),
                    span,
                ));
                None
            }
        }
    }

    fn to_parts(&self) -> Vec<String> {
        self.iter().map(|arg| arg.to_string()).collect()
    }
}

impl NativeTypeArguments for Option<(u32, u32)> {
    const REQUIRED_ARGUMENTS_COUNT: usize = 0;
    const OPTIONAL_ARGUMENTS_COUNT: usize = 2;

    fn from_parts(native_type: &str, parts: &[String], span: Span, diagnostics: &mut Diagnostics) -> Option<Self> {
        match parts {
            [] => Some(None),
            [precision, scale] => {
                let precision = parse_u32(precision, span, diagnostics);
                let scale = parse_u32(scale, span, diagnostics);

                Some(Some((precision?, scale?)))
            }
            _ => {
                diagnostics.push_error(DatamodelError::new_native_type_optional_argument_count_mismatch_error(
                    native_type,
                    Self::OPTIONAL_ARGUMENTS_COUNT,
                    parts.len(),
                    span,
                ));
                None
            }
        }
    }

    fn to_parts(&self) -> Vec<String> {
        match self {
            Some((precision, scale)) => vec![precision.to_string(), scale.to_string()],
            None => Vec::new(),
        }
    }
}

/// A parsed native type, tagged with the connector it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeTypeInstance {
    #[cfg(feature = "postgresql")]
    Postgres(PostgresType),
    #[cfg(feature = "cockroachdb")]
    Cockroach(CockroachType),
    #[cfg(feature = "mysql")]
    Mysql(MySqlType),
    #[cfg(feature = "mssql")]
    MsSql(MsSqlType),
    #[cfg(feature = "mongodb")]
    MongoDb(MongoDbType),
}

impl NativeTypeInstance {
    /// The name and the stringified arguments of the native type.
    pub fn to_parts(&self) -> (&'static str, Vec<String>) {
        match *self {
            #[cfg(feature = "postgresql")]
            NativeTypeInstance::Postgres(ref nt) => nt.to_parts(),
            #[cfg(feature = "cockroachdb")]
            NativeTypeInstance::Cockroach(ref nt) => nt.to_parts(),
            #[cfg(feature = "mysql")]
            NativeTypeInstance::Mysql(ref nt) => nt.to_parts(),
            #[cfg(feature = "mssql")]
            NativeTypeInstance::MsSql(ref nt) => nt.to_parts(),
            #[cfg(feature = "mongodb")]
            NativeTypeInstance::MongoDb(ref nt) => nt.to_parts(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.to_parts().0
    }

    /// The scalar types a field may have when it carries this native type.
    pub fn allowed_scalar_types(&self) -> &'static [ScalarType] {
        match *self {
            #[cfg(feature = "postgresql")]
            NativeTypeInstance::Postgres(ref nt) => nt.scalar_types(),
            #[cfg(feature = "cockroachdb")]
            NativeTypeInstance::Cockroach(ref nt) => nt.scalar_types(),
            #[cfg(feature = "mysql")]
            NativeTypeInstance::Mysql(ref nt) => nt.scalar_types(),
            #[cfg(feature = "mssql")]
            NativeTypeInstance::MsSql(ref nt) => nt.scalar_types(),
            #[cfg(feature = "mongodb")]
            NativeTypeInstance::MongoDb(ref nt) => nt.scalar_types(),
        }
    }
}

impl fmt::Display for NativeTypeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, args) = self.to_parts();

        if args.is_empty() {
            f.write_str(name)
        } else {
            write!(f, "{name}({})", args.join(","))
        }
    }
}

/// Splits a rendered native type like `Decimal(10,2)` into its name and
/// arguments. The inverse of the `Display` implementation of
/// [`NativeTypeInstance`].
pub fn split_native_type_string(input: &str) -> (&str, Vec<String>) {
    let input = input.trim();

    match input.split_once('(') {
        Some((name, rest)) => {
            let args = rest.trim_end_matches(')');

            let args = if args.trim().is_empty() {
                Vec::new()
            } else {
                args.split(',').map(|arg| arg.trim().to_owned()).collect()
            };

            (name.trim(), args)
        }
        None => (input, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splitting_rendered_native_types() {
        assert_eq!(split_native_type_string("Text"), ("Text", vec![]));
        assert_eq!(
            split_native_type_string("Decimal(10,2)"),
            ("Decimal", vec!["10".to_owned(), "2".to_owned()])
        );
        assert_eq!(split_native_type_string("VarChar( Max )"), ("VarChar", vec!["Max".to_owned()]));
    }

    #[test]
    fn optional_precision_and_scale_take_zero_or_two_arguments() {
        let mut diagnostics = Diagnostics::new();
        let one = vec!["10".to_owned()];

        assert_eq!(
            <Option<(u32, u32)>>::from_parts("Decimal", &one, Span::empty(), &mut diagnostics),
            None
        );

        let message = diagnostics.errors().next().map(|err| err.message());
        assert_eq!(
            message.as_deref(),
            Some("Native type Decimal takes 2 optional arguments, but received 1.")
        );
    }

    #[test]
    fn non_numeric_arguments_are_rejected() {
        let mut diagnostics = Diagnostics::new();
        let args = vec!["ten".to_owned()];

        assert_eq!(u32::from_parts("VarChar", &args, Span::empty(), &mut diagnostics), None);

        let expected = expect_test::expect![[r#"
            Expected a numeric value, but failed while parsing "ten": invalid digit found in string."#]];
        expected.assert_eq(&diagnostics.errors().next().unwrap().message());
    }
}
