//! Read typed values out of configuration expressions, reporting a type
//! mismatch when the expression has the wrong shape.

use diagnostics::{DatamodelError, Diagnostics};
use schema_graph::Expression;

/// Coerce an expression to a string literal.
pub fn string<'a>(expr: &'a Expression, diagnostics: &mut Diagnostics) -> Option<&'a str> {
    string_with_span(expr, diagnostics).map(|(s, _)| s)
}

/// Coerce an expression to a string literal, keeping its span.
pub fn string_with_span<'a>(expr: &'a Expression, diagnostics: &mut Diagnostics) -> Option<(&'a str, diagnostics::Span)> {
    match expr.as_string_value() {
        Some(value) => Some(value),
        None => {
            diagnostics.push_error(type_mismatch("String", expr));
            None
        }
    }
}

/// Coerce an expression to a constant, like `true` or an enum value.
pub fn constant<'a>(expr: &'a Expression, diagnostics: &mut Diagnostics) -> Option<&'a str> {
    match expr.as_constant_value() {
        Some((value, _)) => Some(value),
        None => {
            diagnostics.push_error(type_mismatch("constant", expr));
            None
        }
    }
}

/// Coerce an expression to a boolean constant.
pub fn boolean(expr: &Expression, diagnostics: &mut Diagnostics) -> Option<bool> {
    match expr.as_constant_value() {
        Some(("true", _)) => Some(true),
        Some(("false", _)) => Some(false),
        _ => {
            diagnostics.push_error(type_mismatch("boolean", expr));
            None
        }
    }
}

/// Coerce an expression to an integer.
pub fn integer(expr: &Expression, diagnostics: &mut Diagnostics) -> Option<i64> {
    let (raw, span) = match expr.as_numeric_value() {
        Some(value) => value,
        None => {
            diagnostics.push_error(type_mismatch("numeric", expr));
            return None;
        }
    };

    match raw.parse::<i64>() {
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

/// Coerce an expression to an array, coercing each element. A single value
/// is read as an array of one. All elements are coerced, so every bad
/// element gets its own error.
pub fn array<'a, T>(
    expr: &'a Expression,
    coercion: impl Fn(&'a Expression, &mut Diagnostics) -> Option<T>,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<T>> {
    let items: &'a [Expression] = match expr {
        Expression::Array(items, _) => items,
        other => std::slice::from_ref(other),
    };

    let mut out = Vec::with_capacity(items.len());
    let mut is_valid = true;

    for item in items {
        match coercion(item, diagnostics) {
            Some(value) => out.push(value),
            None => is_valid = false,
        }
    }

    is_valid.then_some(out)
}

fn type_mismatch(expected: &str, expr: &Expression) -> DatamodelError {
    DatamodelError::new_type_mismatch_error(expected, expr.describe_value_type(), &expr.to_string(), expr.span())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::Span;

    #[test]
    fn strings_are_read_from_string_literals_only() {
        let mut diagnostics = Diagnostics::new();

        assert_eq!(string(&Expression::string("hi"), &mut diagnostics), Some("hi"));
        assert_eq!(string(&Expression::constant("hi"), &mut diagnostics), None);

        let messages: Vec<String> = diagnostics.errors().map(|e| e.message()).collect();
        assert_eq!(messages, ["Expected a String value, but received literal value `hi`."]);
    }

    #[test]
    fn arrays_report_every_bad_element() {
        let mut diagnostics = Diagnostics::new();
        let expr = Expression::Array(
            vec![Expression::string("a"), Expression::numeric("1"), Expression::constant("b")],
            Span::empty(),
        );

        assert_eq!(array(&expr, string, &mut diagnostics), None);
        assert_eq!(diagnostics.errors().count(), 2);
    }

    #[test]
    fn a_single_value_is_an_array_of_one() {
        let mut diagnostics = Diagnostics::new();

        assert_eq!(
            array(&Expression::string("a"), string, &mut diagnostics),
            Some(vec!["a"])
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn integers_must_fit() {
        let mut diagnostics = Diagnostics::new();

        assert_eq!(integer(&Expression::numeric("42"), &mut diagnostics), Some(42));
        assert_eq!(integer(&Expression::numeric("1.5"), &mut diagnostics), None);
        assert_eq!(boolean(&Expression::constant("true"), &mut diagnostics), Some(true));
        assert_eq!(diagnostics.errors().count(), 1);
    }
}
