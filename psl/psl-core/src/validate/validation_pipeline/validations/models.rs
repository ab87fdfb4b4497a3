use super::{constraint_namespace::ConstraintName, database_name::validate_db_name, names::Names};
use crate::{
    PreviewFeature,
    datamodel_connector::{ConnectorCapability, walker_ext_traits::*},
    diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use schema_graph::{ModelId, walkers::ModelWalker};
use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
};

/// A model must have either a primary key, or a unique criterion
/// with no optional or unsupported fields.
pub(super) fn has_a_strict_unique_criteria(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if model.is_ignored() || model.is_view() {
        return;
    }

    let strict_criteria = model
        .unique_criterias()
        .find(|c| c.is_strict_criteria() && !c.has_unsupported_fields());

    if strict_criteria.is_some() {
        return;
    }

    let mut loose_criterias = model
        .unique_criterias()
        .map(|c| {
            let field_names = c.fields().map(|c| c.name());
            format!("- {}", field_names.collect::<Vec<_>>().join(", "))
        })
        .peekable();

    let msg = "Each model must have at least one unique criteria that has only required fields. Either mark a single field with `@id`, `@unique` or add a multi field criterion with `@@id([])` or `@@unique([])` to the model.";

    let msg = if loose_criterias.peek().is_some() {
        let suffix = format!(
            "The following unique criterias were not considered as they contain fields that are not required:\n{}",
            loose_criterias.collect::<Vec<_>>().join("\n"),
        );

        Cow::from(format!("{msg} {suffix}"))
    } else {
        Cow::from(msg)
    };

    ctx.push_error(DatamodelError::new_model_validation_error(
        msg.as_ref(),
        model.block_type(),
        model.name(),
        model.span(),
    ))
}

/// A primary key name can be unique in different namespaces, depending on a database. Validates
/// model's primary key against the database requirements.
pub(super) fn has_a_unique_primary_key_name(model: ModelWalker<'_>, names: &Names<'_>, ctx: &mut Context<'_>) {
    let Some(pk) = model.primary_key() else { return };
    let Some(name) = pk.constraint_name(ctx.connector) else {
        return;
    };

    validate_db_name(
        model.name(),
        (pk.attribute_name(), pk.span()),
        pk.mapped_name(),
        ctx,
        !pk.is_defined_on_field(),
    );

    for violation in names.constraint_namespace.constraint_name_scope_violations(
        model.id,
        ConstraintName::PrimaryKey(name.as_ref()),
        ctx.connector,
    ) {
        let message = format!(
            "The given constraint name `{}` has to be unique in the following namespace: {}. Please provide a different name using the `map` argument.",
            name,
            violation.description(model.name())
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            pk.attribute_name(),
            pk.span(),
        ));
    }
}

/// The custom name argument makes its way into the generated client API. Therefore the name argument
/// needs to be unique per model. It can be found on the primary key or unique indexes.
pub(super) fn has_a_unique_custom_primary_key_name_per_model(
    model: ModelWalker<'_>,
    names: &Names<'_>,
    ctx: &mut Context<'_>,
) {
    let Some(pk) = model.primary_key() else { return };
    let Some(name) = pk.name() else { return };

    if !names
        .constraint_namespace
        .local_custom_name_scope_violations(model.id, name)
    {
        return;
    }

    let message = format!(
        "The given custom name `{name}` has to be unique on the model. Please provide a different name for the `name` argument."
    );

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        &message,
        pk.attribute_name(),
        pk.span(),
    ));
}

/// The database must support the primary key length prefix for it to be allowed in the data model.
pub(super) fn primary_key_length_prefix_supported(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::IndexColumnLengthPrefixing) {
        return;
    }

    let Some(pk) = model.primary_key() else { return };

    if pk.scalar_field_attributes().any(|f| f.length().is_some()) {
        let message = "The length argument is not supported in the primary key with the current connector";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            pk.attribute_name(),
            pk.span(),
        ));
    }
}

/// Not every database is allowing sort definition in the primary key.
pub(super) fn primary_key_sort_order_supported(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::PrimaryKeySortOrderDefinition) {
        return;
    }

    let Some(pk) = model.primary_key() else { return };

    if pk.scalar_field_attributes().any(|f| f.sort_order().is_some()) {
        let message = "The sort argument is not supported in the primary key with the current connector";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            pk.attribute_name(),
            pk.span(),
        ));
    }
}

pub(super) fn only_one_fulltext_attribute_allowed(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_capability(ConnectorCapability::FullTextIndex) {
        return;
    }

    if ctx.has_capability(ConnectorCapability::MultipleFullTextAttributesPerModel) {
        return;
    }

    let spans = model
        .indexes()
        .filter(|i| i.is_fulltext())
        .map(|i| i.span())
        .collect::<Vec<_>>();

    if spans.len() <= 1 {
        return;
    }

    for span in spans {
        let message = "The current connector only allows one fulltext attribute per model";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            "@@fulltext",
            span,
        ));
    }
}

/// Does the connector support named and compound primary keys at all?
pub(super) fn primary_key_connector_specific(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    let Some(primary_key) = model.primary_key() else {
        return;
    };

    if primary_key.mapped_name().is_some() && !ctx.has_capability(ConnectorCapability::NamedPrimaryKeys) {
        ctx.push_error(DatamodelError::new_model_validation_error(
            "You defined a database name for the primary key on the model. This is not supported by the provider.",
            model.block_type(),
            model.name(),
            model.span(),
        ));
    }

    if primary_key.fields().len() > 1 && !ctx.has_capability(ConnectorCapability::CompoundIds) {
        ctx.push_error(DatamodelError::new_model_validation_error(
            "The current connector does not support compound ids.",
            model.block_type(),
            model.name(),
            primary_key.span(),
        ));
    }
}

pub(super) fn connector_specific(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    ctx.connector.validate_model(model, ctx.relation_mode, ctx.diagnostics)
}

pub(super) fn id_has_fields(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    let Some(id) = model.primary_key() else { return };

    if id.fields().len() > 0 {
        return;
    }

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        "The list of fields in an `@@id()` attribute cannot be empty. Please specify at least one field.",
        id.attribute_name(),
        id.span(),
    ))
}

pub(super) fn id_client_name_does_not_clash_with_field(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    let Some(id) = model.primary_key() else { return };

    // Only compound ids without a custom name clash.
    if id.fields().len() <= 1 || id.name().is_some() {
        return;
    }

    let id_client_name = id.fields().map(|f| f.name()).collect::<Vec<_>>().join("_");

    if model.scalar_fields().any(|f| f.name() == id_client_name) {
        ctx.push_error(DatamodelError::new_model_validation_error(
            &format!(
                "The field `{id_client_name}` clashes with the `@@id` attribute's name. Please resolve the conflict by providing a custom id name: `@@id([...], name: \"custom_name\")`"
            ),
            model.block_type(),
            model.name(),
            id.span(),
        ));
    }
}

/// Scalar and relation fields share one namespace on the model.
pub(super) fn field_names_are_unique(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    let mut seen: HashSet<&str> = HashSet::with_capacity(model.scalar_fields().len() + model.relation_fields().len());

    let scalar_fields = model.scalar_fields().map(|f| (f.name(), f.span()));
    let relation_fields = model.relation_fields().map(|f| (f.name(), f.span()));

    for (name, span) in scalar_fields.chain(relation_fields) {
        if seen.insert(name) {
            continue;
        }

        ctx.push_error(DatamodelError::new_duplicate_field_error(
            model.block_type(),
            model.name(),
            name,
            span,
        ));
    }
}

pub(super) fn schema_is_defined_in_the_datasource(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_preview_feature(PreviewFeature::MultiSchema) {
        return;
    }

    if !ctx.has_capability(ConnectorCapability::MultiSchema) {
        return;
    }

    let Some(datasource) = ctx.datasource else { return };
    let Some((schema_name, span)) = model.schema() else {
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

pub(super) fn schema_attribute_supported_in_connector(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_preview_feature(PreviewFeature::MultiSchema) {
        return;
    }

    if ctx.has_capability(ConnectorCapability::MultiSchema) {
        return;
    }

    let Some((_, span)) = model.schema() else { return };

    ctx.push_error(DatamodelError::new_static(
        "@@schema is not supported on the current datasource provider",
        span,
    ));
}

pub(super) fn schema_attribute_missing(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_preview_feature(PreviewFeature::MultiSchema) {
        return;
    }

    if !ctx.has_capability(ConnectorCapability::MultiSchema) {
        return;
    }

    let Some(datasource) = ctx.datasource else { return };

    if datasource.schemas_span().is_none() {
        return;
    }

    // MySQL falls back to the database of the connection string.
    if ctx.connector.is_provider("mysql") {
        return;
    }

    if model.schema().is_some() {
        return;
    }

    ctx.push_error(DatamodelError::new_static(
        "This model is missing an `@@schema` attribute.",
        model.span(),
    ))
}

pub(super) fn multischema_feature_flag_needed(model: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_preview_feature(PreviewFeature::MultiSchema) {
        return;
    }

    if let Some((_, span)) = model.schema() {
        ctx.push_error(DatamodelError::new_static(
            "@@schema is only available with the `multiSchema` preview feature.",
            span,
        ));
    }
}

/// Two models cannot point to the same table in the same schema.
pub(super) fn database_name_clashes(ctx: &mut Context<'_>) {
    let db = ctx.db;

    // (schema_name, model_database_name) -> ModelId
    let mut database_names: HashMap<(Option<&str>, &str), ModelId> = HashMap::new();

    for model in db.walk_models() {
        let key = (model.schema_name(), model.database_name());

        let Some(existing) = database_names.insert(key, model.id) else {
            continue;
        };

        let existing = db.walk(existing);

        // The error goes on the model carrying the `@@map`.
        let (other_model, span) = if model.mapped_name().is_some() || existing.mapped_name().is_none() {
            (existing, model.span())
        } else {
            (model, existing.span())
        };

        ctx.push_error(DatamodelError::new_duplicate_model_database_name_error(
            model.database_name(),
            other_model.name(),
            span,
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        datamodel_connector::EmptyDatamodelConnector, diagnostics::Diagnostics,
        validate::validation_pipeline::context::Context,
    };
    use expect_test::expect;
    use schema_graph::{ScalarType, SchemaBuilder, SchemaGraph};

    fn run(db: &SchemaGraph, check: impl Fn(&mut Context<'_>)) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        let mut ctx = Context {
            db,
            datasource: None,
            preview_features: Default::default(),
            connector: &EmptyDatamodelConnector,
            relation_mode: Default::default(),
            diagnostics: &mut diagnostics,
        };

        check(&mut ctx);
        diagnostics
    }

    #[test]
    fn mapped_models_cannot_share_a_table() {
        let mut schema = SchemaBuilder::new();

        let user = schema.model("User");
        user.scalar("id", ScalarType::Int).id();

        let admin = schema.model("Admin");
        admin.scalar("id", ScalarType::Int).id();
        admin.map("User");

        let db = schema.finish().unwrap();
        let diagnostics = run(&db, |ctx| super::database_name_clashes(ctx));

        let messages: Vec<_> = diagnostics.errors().map(|e| e.message().to_owned()).collect();

        expect![[r#"
            [
                "The model with database name \"User\" could not be defined because another model or view with this name exists: \"User\"",
            ]
        "#]]
        .assert_debug_eq(&messages);
    }

    #[test]
    fn duplicate_field_names_are_reported_once_per_copy() {
        let mut schema = SchemaBuilder::new();

        let user = schema.model("User");
        user.scalar("id", ScalarType::Int).id();
        user.scalar("name", ScalarType::String);
        user.scalar("name", ScalarType::Int);

        let db = schema.finish().unwrap();
        let user = db.find_model("User").unwrap();
        let diagnostics = run(&db, |ctx| super::field_names_are_unique(user, ctx));

        assert_eq!(diagnostics.errors().count(), 1);
    }
}
