use crate::{
    PreviewFeature,
    datamodel_connector::ConnectorCapability,
    diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use schema_graph::{EnumId, walkers::EnumWalker};
use std::collections::{HashMap, HashSet};

pub(super) fn database_name_clashes(ctx: &mut Context<'_>) {
    let db = ctx.db;

    // (schema_name, enum_database_name) -> EnumId
    let mut database_names: HashMap<(Option<&str>, &str), EnumId> = HashMap::new();

    for r#enum in db.walk_enums() {
        let key = (r#enum.schema().map(|(name, _)| name), r#enum.database_name());

        if let Some(existing) = database_names.insert(key, r#enum.id) {
            let existing = db.walk(existing);

            let message = format!(
                "An enum with the same database name is already defined as `{}`.",
                existing.name()
            );

            ctx.push_error(DatamodelError::new_enum_validation_error(
                &message,
                r#enum.name(),
                r#enum.span(),
            ));
        }
    }
}

pub(super) fn has_a_value(r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    if r#enum.values().len() > 0 {
        return;
    }

    ctx.push_error(DatamodelError::new_enum_validation_error(
        "An enum must have at least one value.",
        r#enum.name(),
        r#enum.span(),
    ));
}

pub(super) fn value_names_are_unique(r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    let mut names = HashSet::with_capacity(r#enum.values().len());
    let mut database_names = HashSet::with_capacity(r#enum.values().len());

    for value in r#enum.values() {
        if !names.insert(value.name()) {
            let message = format!("Value `{}` is already defined on enum `{}`.", value.name(), r#enum.name());

            ctx.push_error(DatamodelError::new_enum_validation_error(
                &message,
                r#enum.name(),
                value.span(),
            ));

            continue;
        }

        if !database_names.insert(value.database_name()) {
            let message = format!(
                "Value `{}` is mapped to the database name `{}`, which is already used on enum `{}`.",
                value.name(),
                value.database_name(),
                r#enum.name(),
            );

            ctx.push_error(DatamodelError::new_enum_validation_error(
                &message,
                r#enum.name(),
                value.span(),
            ));
        }
    }
}

pub(super) fn schema_is_defined_in_the_datasource(r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_preview_feature(PreviewFeature::MultiSchema) || !ctx.has_capability(ConnectorCapability::MultiSchema) {
        return;
    }

    let Some(datasource) = ctx.datasource else { return };
    let Some((schema_name, span)) = r#enum.schema() else {
        return;
    };

    if datasource.has_schema(schema_name) {
        return;
    }

    ctx.push_error(DatamodelError::new_static(
        "This schema is not defined in the datasource. Read more on `@@schema` at https://pris.ly/d/multi-schema",
        span,
    ))
}

pub(super) fn schema_attribute_supported_in_connector(r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_preview_feature(PreviewFeature::MultiSchema) || ctx.has_capability(ConnectorCapability::MultiSchema) {
        return;
    }

    if let Some((_, span)) = r#enum.schema() {
        ctx.push_error(DatamodelError::new_static(
            "@@schema is not supported on the current datasource provider",
            span,
        ));
    }
}

pub(super) fn schema_attribute_missing(r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_preview_feature(PreviewFeature::MultiSchema) || !ctx.has_capability(ConnectorCapability::MultiSchema) {
        return;
    }

    // Enums are inline column types on MySQL.
    if ctx.connector.is_provider("mysql") {
        return;
    }

    let Some(datasource) = ctx.datasource else { return };

    if datasource.schemas_span().is_none() || r#enum.schema().is_some() {
        return;
    }

    ctx.push_error(DatamodelError::new_static(
        "This enum is missing an `@@schema` attribute.",
        r#enum.span(),
    ))
}

pub(super) fn multischema_feature_flag_needed(r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_preview_feature(PreviewFeature::MultiSchema) {
        return;
    }

    if let Some((_, span)) = r#enum.schema() {
        ctx.push_error(DatamodelError::new_static(
            "@@schema is only available with the `multiSchema` preview feature.",
            span,
        ));
    }
}

pub(super) fn connector_supports_enums(r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::Enums) {
        return;
    }

    let message = format!(
        "You defined the enum `{}`. But the current connector does not support enums.",
        r#enum.name()
    );

    ctx.push_error(DatamodelError::new_validation_error(&message, r#enum.span()));
}

pub(super) fn connector_specific(r#enum: EnumWalker<'_>, ctx: &mut Context<'_>) {
    ctx.connector.validate_enum(r#enum, ctx.diagnostics)
}
