use crate::{
    datamodel_connector::ConnectorCapability, diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use schema_graph::walkers::{ModelWalker, ScalarFieldWalker};

pub(super) fn validate_auto_increment(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    let autoincrement_fields = || model.scalar_fields().filter(|f| f.is_autoincrement());

    // Without a datasource we do not know what the database can generate.
    if ctx.datasource.is_none() || autoincrement_fields().next().is_none() {
        return;
    }

    if !ctx.has_capability(ConnectorCapability::AutoIncrement) {
        for field in autoincrement_fields() {
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                "The `autoincrement()` default value is used with a datasource that does not support it.",
                "@default",
                field.span(),
            ));
        }

        return;
    }

    if !ctx.has_capability(ConnectorCapability::AutoIncrementMultipleAllowed) && autoincrement_fields().count() > 1 {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            "The `autoincrement()` default value is used multiple times on this model even though the underlying datasource only supports one instance per table.",
            "@default",
            model.span(),
        ));
    }

    for field in autoincrement_fields() {
        if !ctx.has_capability(ConnectorCapability::AutoIncrementAllowedOnNonId) && !field.is_single_pk() {
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                "The `autoincrement()` default value is used on a non-id field even though the datasource does not support this.",
                "@default",
                field.span(),
            ));
        }

        if !ctx.has_capability(ConnectorCapability::AutoIncrementNonIndexedAllowed) && !is_indexed(field) {
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                "The `autoincrement()` default value is used on a non-indexed field even though the datasource does not support this.",
                "@default",
                field.span(),
            ));
        }
    }
}

/// The field leads the primary key or one of the indexes of the model.
fn is_indexed(field: ScalarFieldWalker<'_>) -> bool {
    let model = field.model();

    let leads = |first: Option<ScalarFieldWalker<'_>>| first.is_some_and(|first| first.id == field.id);

    let pk_first = model
        .primary_key()
        .and_then(|pk| pk.fields().next())
        .and_then(|f| f.as_scalar_field());

    leads(pk_first)
        || model
            .indexes()
            .any(|index| leads(index.fields().next().and_then(|f| f.as_scalar_field())))
}
