use super::{constraint_namespace::ConstraintName, database_name::validate_db_name, names::Names};
use crate::{
    datamodel_connector::{ConnectorCapability, walker_ext_traits::*},
    diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use schema_graph::{IndexAlgorithm, walkers::IndexWalker};

/// Different databases validate index and unique constraint names in a certain namespace.
/// Validates index and unique constraint names against the database requirements.
pub(super) fn has_a_unique_constraint_name(index: IndexWalker<'_>, names: &Names<'_>, ctx: &mut Context<'_>) {
    let name = index.constraint_name(ctx.connector);
    let model = index.model();

    for violation in names.constraint_namespace.constraint_name_scope_violations(
        model.id,
        ConstraintName::Index(name.as_ref()),
        ctx.connector,
    ) {
        let message = format!(
            "The given constraint name `{}` has to be unique in the following namespace: {}. Please provide a different name using the `map` argument.",
            name,
            violation.description(model.name()),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            index.attribute_name(),
            index.span(),
        ));
    }
}

/// The custom name argument makes its way into the generated client API. Therefore the name argument
/// needs to be unique per model. It can be found on the primary key or unique indexes.
pub(super) fn unique_index_has_a_unique_custom_name_per_model(
    index: IndexWalker<'_>,
    names: &Names<'_>,
    ctx: &mut Context<'_>,
) {
    if !index.is_unique() {
        return;
    }

    let Some(name) = index.name() else { return };

    if !names
        .constraint_namespace
        .local_custom_name_scope_violations(index.model().id, name)
    {
        return;
    }

    let message = format!(
        "The given custom name `{name}` has to be unique on the model. Please provide a different name for the `name` argument."
    );

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        &message,
        index.attribute_name(),
        index.span(),
    ));
}

/// The database must support the index length prefix for it to be allowed in the data model.
pub(super) fn field_length_prefix_supported(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::IndexColumnLengthPrefixing) {
        return;
    }

    if index.scalar_field_attributes().any(|f| f.length().is_some()) {
        let message = "The length argument is not supported in an index definition with the current connector";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            index.attribute_name(),
            index.span(),
        ));
    }
}

/// Is the `type` argument one of the algorithms of the database.
pub(super) fn index_algorithm_is_supported(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    let Some(algorithm) = index.algorithm() else {
        return;
    };

    if ctx.connector.supports_index_type(algorithm) {
        return;
    }

    let message = "The given type argument is not supported with the current connector";

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        message,
        index.attribute_name(),
        index.span(),
    ));
}

/// `@@fulltext` should only be available if we support it in the database.
pub(super) fn fulltext_index_supported(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::FullTextIndex) {
        return;
    }

    if index.is_fulltext() {
        let message = "Defining fulltext indexes is not supported with the current connector.";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            index.attribute_name(),
            index.span(),
        ));
    }
}

/// `@@fulltext` index columns should not define `length` argument.
pub(super) fn fulltext_columns_should_not_define_length(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_capability(ConnectorCapability::FullTextIndex) {
        return;
    }

    if !index.is_fulltext() {
        return;
    }

    if index.scalar_field_attributes().any(|f| f.length().is_some()) {
        let message = "The length argument is not supported in a @@fulltext attribute.";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            index.attribute_name(),
            index.span(),
        ));
    }
}

/// Only MongoDB supports sort order in a fulltext index.
pub(super) fn fulltext_column_sort_is_supported(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_capability(ConnectorCapability::FullTextIndex) {
        return;
    }

    if !index.is_fulltext() {
        return;
    }

    if ctx.has_capability(ConnectorCapability::SortOrderInFullTextIndex) {
        return;
    }

    if index.scalar_field_attributes().any(|f| f.sort_order().is_some()) {
        let message = "The sort argument is not supported in a @@fulltext attribute in the current connector.";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            index.attribute_name(),
            index.span(),
        ));
    }
}

/// Mongo wants all text keys to be bundled together, so e.g. this doesn't work:
///
/// ```ignore
/// @@fulltext([a(sort: Asc), b, c(sort: Asc), d])
/// ```
pub(super) fn fulltext_text_columns_should_be_bundled_together(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_capability(ConnectorCapability::FullTextIndex) {
        return;
    }

    if !index.is_fulltext() {
        return;
    }

    if !ctx.has_capability(ConnectorCapability::SortOrderInFullTextIndex) {
        return;
    }

    enum State {
        // The empty state in the beginning. Must move to another state in every case.
        Init,
        // We've only had sorted fields so far.
        SortParamHead,
        // The bundle of text fields, we can have only one per index.
        TextFieldBundle,
        // The sort params after one text bundle.
        SortParamTail,
    }

    let mut state = State::Init;

    for field in index.scalar_field_attributes() {
        let sorted = field.sort_order().is_some();

        state = match state {
            State::Init | State::SortParamHead if sorted => State::SortParamHead,
            State::TextFieldBundle | State::SortParamTail if sorted => State::SortParamTail,
            State::Init | State::SortParamHead | State::TextFieldBundle => State::TextFieldBundle,
            State::SortParamTail => {
                let message = "All index fields must be listed adjacently in the fields argument.";

                ctx.push_error(DatamodelError::new_attribute_validation_error(
                    message,
                    index.attribute_name(),
                    index.span(),
                ));

                return;
            }
        }
    }
}

/// The ordering is only possible with `BTree` access method.
pub(super) fn hash_index_must_not_use_sort_param(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_capability(ConnectorCapability::UsingHashIndex) {
        return;
    }

    if index.algorithm() != Some(IndexAlgorithm::Hash) {
        return;
    }

    if index.scalar_field_attributes().any(|f| f.sort_order().is_some()) {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            "Hash type does not support sort option.",
            index.attribute_name(),
            index.span(),
        ));
    }
}

pub(super) fn has_valid_mapped_name(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    validate_db_name(
        index.model().name(),
        (index.attribute_name(), index.span()),
        index.mapped_name(),
        ctx,
        !index.is_defined_on_field(),
    )
}

pub(super) fn has_fields(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if index.fields().len() > 0 {
        return;
    }

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        "The list of fields in an index cannot be empty. Please specify at least one field.",
        index.attribute_name(),
        index.span(),
    ))
}

pub(super) fn supports_clustering_setting(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::ClusteringSetting) {
        return;
    }

    if index.clustered().is_none() {
        return;
    }

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        "Defining clustering is not supported in the current connector.",
        index.attribute_name(),
        index.span(),
    ));
}

/// Only one index or key can be clustered per table.
pub(super) fn clustering_can_be_defined_only_once(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_capability(ConnectorCapability::ClusteringSetting) {
        return;
    }

    if index.clustered() != Some(true) {
        return;
    }

    let model = index.model();

    // A primary key is clustered unless said otherwise.
    if model.primary_key().is_some_and(|pk| pk.clustered() != Some(false)) {
        return;
    }

    let clustered_before = model
        .indexes()
        .take_while(|other| other.id() != index.id())
        .any(|other| other.clustered() == Some(true));

    if clustered_before {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            "A model can only hold one clustered index or key.",
            index.attribute_name(),
            index.span(),
        ));
    }
}

#[cfg(all(test, feature = "mongodb", feature = "mysql"))]
mod tests {
    use crate::{
        builtin_connectors::{MONGODB, MYSQL},
        datamodel_connector::Connector,
        diagnostics::Diagnostics,
        validate::validation_pipeline::context::Context,
    };
    use schema_graph::{IndexField, ScalarType, SchemaBuilder, SchemaGraph};

    fn run_on_indexes(
        db: &SchemaGraph,
        connector: &'static dyn Connector,
        check: fn(schema_graph::walkers::IndexWalker<'_>, &mut Context<'_>),
    ) -> Vec<String> {
        let mut diagnostics = Diagnostics::new();

        let mut ctx = Context {
            db,
            datasource: None,
            preview_features: Default::default(),
            connector,
            relation_mode: Default::default(),
            diagnostics: &mut diagnostics,
        };

        for index in db.walk_models().flat_map(|m| m.indexes()) {
            check(index, &mut ctx);
        }

        diagnostics.errors().map(|e| e.message()).collect()
    }

    #[test]
    fn text_columns_must_be_adjacent_in_a_mongo_fulltext_index() {
        let mut schema = SchemaBuilder::new();

        let post = schema.model("Post");
        post.scalar("id", ScalarType::String).id();
        post.scalar("a", ScalarType::String);
        post.scalar("b", ScalarType::String);
        post.scalar("c", ScalarType::String);
        post.scalar("d", ScalarType::String);
        post.fulltext([
            IndexField::new("a").asc(),
            IndexField::new("b"),
            IndexField::new("c").desc(),
            IndexField::new("d"),
        ]);

        let db = schema.finish().unwrap();
        let errors = run_on_indexes(&db, MONGODB, super::fulltext_text_columns_should_be_bundled_together);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("All index fields must be listed adjacently"));
    }

    #[test]
    fn sorted_head_and_tail_around_one_text_bundle_is_fine() {
        let mut schema = SchemaBuilder::new();

        let post = schema.model("Post");
        post.scalar("id", ScalarType::String).id();
        post.scalar("a", ScalarType::String);
        post.scalar("b", ScalarType::String);
        post.scalar("c", ScalarType::String);
        post.fulltext([IndexField::new("a").asc(), IndexField::new("b"), IndexField::new("c").desc()]);

        let db = schema.finish().unwrap();
        let errors = run_on_indexes(&db, MONGODB, super::fulltext_text_columns_should_be_bundled_together);

        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn hash_indexes_are_btree_only_on_mysql() {
        let mut schema = SchemaBuilder::new();

        let post = schema.model("Post");
        post.scalar("id", ScalarType::Int).id();
        post.scalar("a", ScalarType::Int);
        post.index(["a"]).algorithm(schema_graph::IndexAlgorithm::Hash);

        let db = schema.finish().unwrap();
        let errors = run_on_indexes(&db, MYSQL, super::index_algorithm_is_supported);

        assert_eq!(
            errors,
            vec!["Error parsing attribute \"@@index\": The given type argument is not supported with the current connector"]
        );
    }
}
