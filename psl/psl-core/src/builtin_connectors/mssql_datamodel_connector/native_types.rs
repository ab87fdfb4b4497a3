use crate::datamodel_connector::{NativeTypeArguments, parse_u32};
use diagnostics::{DatamodelError, Diagnostics, Span};
use std::fmt;

/// The length argument of the variable-length SQL Server types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsSqlTypeParameter {
    Number(u16),
    Max,
}

impl fmt::Display for MsSqlTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsSqlTypeParameter::Number(number) => write!(f, "{number}"),
            MsSqlTypeParameter::Max => f.write_str("Max"),
        }
    }
}

impl MsSqlTypeParameter {
    fn parse(raw: &str, span: Span, diagnostics: &mut Diagnostics) -> Option<Self> {
        if raw.trim().eq_ignore_ascii_case("max") {
            return Some(MsSqlTypeParameter::Max);
        }

        let number = parse_u32(raw, span, diagnostics)?;

        match u16::try_from(number) {
            Ok(number) => Some(MsSqlTypeParameter::Number(number)),
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
}

impl NativeTypeArguments for Option<MsSqlTypeParameter> {
    const REQUIRED_ARGUMENTS_COUNT: usize = 0;
    const OPTIONAL_ARGUMENTS_COUNT: usize = 1;

    fn from_parts(native_type: &str, parts: &[String], span: Span, diagnostics: &mut Diagnostics) -> Option<Self> {
        match parts {
            [] => Some(None),
            [raw] => MsSqlTypeParameter::parse(raw, span, diagnostics).map(Some),
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
        self.iter().map(|param| param.to_string()).collect()
    }
}

crate::native_type_definition! {
    /// The SQL Server native type enum.
    MsSqlType;
    TinyInt -> Int,
    SmallInt -> Int,
    Int -> Int,
    BigInt -> BigInt,
    Decimal(Option<(u32, u32)>) -> Decimal,
    Money -> Float,
    SmallMoney -> Float,
    Bit -> Boolean | Int,
    Float(Option<u32>) -> Float,
    Real -> Float,
    Date -> DateTime,
    Time(Option<u32>) -> DateTime,
    DateTime -> DateTime,
    DateTime2(Option<u32>) -> DateTime,
    DateTimeOffset(Option<u32>) -> DateTime,
    SmallDateTime -> DateTime,
    Char(Option<u32>) -> String,
    NChar(Option<u32>) -> String,
    VarChar(Option<MsSqlTypeParameter>) -> String,
    Text -> String,
    NVarChar(Option<MsSqlTypeParameter>) -> String,
    NText -> String,
    Binary(Option<u32>) -> Bytes,
    VarBinary(Option<MsSqlTypeParameter>) -> Bytes,
    Image -> Bytes,
    Xml -> String,
    UniqueIdentifier -> String,
}

impl MsSqlType {
    /// Fractional second digits of the time types written without an argument.
    pub(super) fn with_default_precision(self) -> Self {
        match self {
            MsSqlType::Time(None) => MsSqlType::Time(Some(7)),
            MsSqlType::DateTime2(None) => MsSqlType::DateTime2(Some(7)),
            MsSqlType::DateTimeOffset(None) => MsSqlType::DateTimeOffset(Some(7)),
            other => other,
        }
    }

    /// Types stored outside of the row, in the heap. They cannot be part
    /// of keys or normal indexes.
    pub(super) fn is_heap_allocated(&self) -> bool {
        use MsSqlTypeParameter::Max;

        matches!(
            self,
            MsSqlType::Text
                | MsSqlType::NText
                | MsSqlType::Image
                | MsSqlType::Xml
                | MsSqlType::VarBinary(Some(Max))
                | MsSqlType::VarChar(Some(Max))
                | MsSqlType::NVarChar(Some(Max))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_is_parsed_case_insensitively() {
        let mut diagnostics = Diagnostics::new();

        for raw in ["Max", "MAX", "max"] {
            let parsed = MsSqlType::from_parts("SQL Server", "NVarChar", &[raw.to_owned()], Span::empty(), &mut diagnostics);
            assert_eq!(parsed, Some(MsSqlType::NVarChar(Some(MsSqlTypeParameter::Max))));
        }

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn max_is_rejected_on_fixed_length_types() {
        let mut diagnostics = Diagnostics::new();
        let parsed = MsSqlType::from_parts("SQL Server", "Char", &["Max".to_owned()], Span::empty(), &mut diagnostics);

        assert_eq!(parsed, None);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn lengths_beyond_u16_are_rejected() {
        let mut diagnostics = Diagnostics::new();
        let parsed =
            MsSqlType::from_parts("SQL Server", "VarChar", &["70000".to_owned()], Span::empty(), &mut diagnostics);

        assert_eq!(parsed, None);
        assert_eq!(diagnostics.errors().count(), 1);
    }
}
