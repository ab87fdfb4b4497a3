use crate::{
    datamodel_connector::ConnectorCapability, diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use schema_graph::{Expression, ScalarType, walkers::EnumWalker};
use std::str::FromStr;

const ATTRIBUTE_NAME: &str = "@default";

/// Function `auto()` works only on connectors generating ids in the database
/// driver.
pub(super) fn validate_auto_param(default_value: Option<&Expression>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::DefaultValueAuto) {
        return;
    }

    if let Some(Expression::Function(name, _, span)) = default_value {
        if name == "auto" {
            let message = "The current connector does not support the `auto()` function.";
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                message,
                ATTRIBUTE_NAME,
                *span,
            ));
        }
    }
}

/// Validates the @default attribute of a scalar field
pub(super) fn validate_default_value(
    default_value: Option<&Expression>,
    scalar_type: Option<ScalarType>,
    ctx: &mut Context<'_>,
) {
    let Some(scalar_type) = scalar_type else { return };
    let Some(expression) = default_value else { return };

    // For array expressions, validate each element in the array.
    if let Expression::Array(items, _) = expression {
        for item in items {
            validate_default_value(Some(item), Some(scalar_type), ctx);
        }

        return;
    }

    if let Expression::Function(name, args, span) = expression {
        validate_function(name, args, *span, scalar_type, ctx);
        return;
    }

    let result = match (scalar_type, expression) {
        (ScalarType::Json, Expression::StringValue(value, _)) => serde_json::from_str::<serde_json::Value>(value)
            .map(drop)
            .map_err(|err| format!("\"{value}\" is not a valid JSON string. ({err})")),
        (ScalarType::Bytes, Expression::StringValue(value, _)) => STANDARD
            .decode(value)
            .map(drop)
            .map_err(|err| format!("\"{value}\" is not a valid base64 string. ({err})")),
        (ScalarType::DateTime, Expression::StringValue(value, _)) => DateTime::<FixedOffset>::parse_from_rfc3339(value)
            .map(drop)
            .map_err(|err| format!("\"{value}\" is not a valid rfc3339 datetime string. ({err})")),
        (ScalarType::Int | ScalarType::BigInt, Expression::NumericValue(value, _)) => value
            .parse::<i64>()
            .map(drop)
            .map_err(|err| format!("\"{value}\" is not a valid integer. ({err})")),
        (ScalarType::Float, Expression::NumericValue(value, _)) => value
            .parse::<f64>()
            .map(drop)
            .map_err(|err| format!("\"{value}\" is not a valid float. ({err})")),
        (ScalarType::Decimal, Expression::NumericValue(value, _) | Expression::StringValue(value, _)) => {
            BigDecimal::from_str(value)
                .map(drop)
                .map_err(|err| format!("\"{value}\" is not a valid decimal. ({err})"))
        }
        (ScalarType::Boolean, Expression::ConstantValue(value, span)) => {
            if value != "true" && value != "false" {
                ctx.push_error(DatamodelError::new_type_mismatch_error(
                    "boolean",
                    "literal",
                    value,
                    *span,
                ));
            }

            return;
        }
        (ScalarType::String, Expression::StringValue(..)) => return,
        (_, expression) => {
            ctx.push_error(DatamodelError::new_type_mismatch_error(
                expected_value_type(scalar_type),
                expression.describe_value_type(),
                &expression.to_string(),
                expression.span(),
            ));

            return;
        }
    };

    if let Err(details) = result {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &format!("Parse error: {details}"),
            ATTRIBUTE_NAME,
            expression.span(),
        ));
    }
}

/// The default of an enum field must be one of its values.
pub(super) fn validate_enum_default_value(default_value: &Expression, r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    match default_value {
        Expression::Array(items, _) => {
            for item in items {
                validate_enum_default_value(item, r#enum, ctx);
            }
        }
        Expression::ConstantValue(value, span) => {
            if r#enum.values().any(|v| v.name() == value) {
                return;
            }

            ctx.push_error(DatamodelError::new_attribute_validation_error(
                &format!(
                    "The defined default value `{value}` is not a valid value of the enum specified for the field."
                ),
                ATTRIBUTE_NAME,
                *span,
            ));
        }
        Expression::Function(name, _, _) if name == "dbgenerated" => (),
        other => ctx.push_error(DatamodelError::new_type_mismatch_error(
            "enum value",
            other.describe_value_type(),
            &other.to_string(),
            other.span(),
        )),
    }
}

fn validate_function(
    name: &str,
    args: &[Expression],
    span: diagnostics::Span,
    scalar_type: ScalarType,
    ctx: &mut Context<'_>,
) {
    let allowed: &[ScalarType] = match name {
        "autoincrement" | "sequence" => &[ScalarType::Int, ScalarType::BigInt],
        "now" => &[ScalarType::DateTime],
        "uuid" | "cuid" | "nanoid" | "ulid" => &[ScalarType::String],
        "dbgenerated" => {
            validate_dbgenerated_args(args, span, ctx);
            return;
        }
        // Allowed on any type, gated on the connector elsewhere. Unknown
        // functions are reported by the connector.
        _ => return,
    };

    if allowed.contains(&scalar_type) {
        return;
    }

    let expected = allowed.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(" or ");

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        &format!("The function `{name}()` cannot be used on fields of type `{scalar_type}`. Expected a field of type {expected}."),
        ATTRIBUTE_NAME,
        span,
    ));
}

fn validate_dbgenerated_args(args: &[Expression], span: diagnostics::Span, ctx: &mut Context<'_>) {
    match args {
        [] => (),
        [Expression::StringValue(value, span)] if value.is_empty() => {
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                "dbgenerated() takes either no argument, or a single nonempty string argument.",
                ATTRIBUTE_NAME,
                *span,
            ));
        }
        [Expression::StringValue(..)] => (),
        _ => ctx.push_error(DatamodelError::new_attribute_validation_error(
            "dbgenerated() takes either no argument, or a single nonempty string argument.",
            ATTRIBUTE_NAME,
            span,
        )),
    }
}

fn expected_value_type(scalar_type: ScalarType) -> &'static str {
    match scalar_type {
        ScalarType::Int | ScalarType::BigInt => "integer",
        ScalarType::Float | ScalarType::Decimal => "numeric",
        ScalarType::Boolean => "boolean",
        ScalarType::String | ScalarType::DateTime | ScalarType::Json | ScalarType::Bytes => "string",
    }
}
