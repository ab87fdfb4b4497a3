use diagnostics::{DatamodelError, Diagnostics};
use schema_graph::{
    Expression, IndexAlgorithm, ScalarType,
    walkers::{IndexWalker, ModelWalker},
};

/// CockroachDB has no serial columns. `autoincrement()` maps to
/// `unique_rowid()`, a 64 bit value.
pub(super) fn autoincrement_validations(model: ModelWalker<'_>, diagnostics: &mut Diagnostics) {
    for field in model.scalar_fields() {
        let Some(default) = field.default_value() else { continue };

        if !default.is_autoincrement() || field.scalar_type() == Some(ScalarType::BigInt) {
            continue;
        }

        diagnostics.push_error(DatamodelError::new_attribute_validation_error(
            "The `autoincrement()` default function is defined only on BigInt fields on CockroachDB. Use sequence() if you want an autoincrementing Int field.",
            "default",
            default.span(),
        ));
    }
}

/// Inverted (Gin) indexes can only have their last column as a Json or
/// list column. The columns before it form a prefix.
pub(super) fn inverted_index_validations(index: IndexWalker<'_>, diagnostics: &mut Diagnostics) {
    if index.algorithm() != Some(IndexAlgorithm::Gin) {
        return;
    }

    let Some(last) = index.fields().last() else { return };
    let last_is_invertible = last.is_list() || last.scalar_field_type().is_json();

    if !last_is_invertible {
        diagnostics.push_error(DatamodelError::new_attribute_validation_error(
            "The last field of an inverted index must be a Json field or a list.",
            index.attribute_name(),
            index.span(),
        ));
    }

    let prefix_len = index.fields().len().saturating_sub(1);

    for field in index.fields().take(prefix_len) {
        if field.is_list() || field.scalar_field_type().is_json() {
            let msg = format!(
                "The field `{}` cannot be indexed in the prefix of an inverted index. Only the last field can be a Json field or a list.",
                field.name()
            );

            diagnostics.push_error(DatamodelError::new_attribute_validation_error(
                &msg,
                index.attribute_name(),
                index.span(),
            ));
        }
    }
}

/// The arguments of `sequence()`: integers, or a boolean for the virtual
/// flag.
pub(super) fn sequence_arguments(args: &[Expression], diagnostics: &mut Diagnostics) {
    for arg in args {
        let valid = match arg {
            Expression::NumericValue(value, _) => value.parse::<i64>().is_ok(),
            Expression::ConstantValue(value, _) => matches!(value.as_str(), "true" | "false"),
            _ => false,
        };

        if !valid {
            diagnostics.push_error(DatamodelError::new_static(
                "Unexpected argument in `sequence()` function call",
                arg.span(),
            ));
        }
    }
}
