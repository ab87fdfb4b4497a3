mod autoincrement;
mod composite_types;
mod constraint_namespace;
mod database_name;
mod datasource;
mod default_value;
mod enums;
mod fields;
mod indexes;
mod models;
mod names;
mod relation_fields;
mod relations;
mod views;

use super::context::Context;
use crate::{
    builtin_connectors::can_have_capability,
    datamodel_connector::ConnectorCapability,
};
use names::Names;
use relations::{InlineRelation, RefinedRelation, many_to_many, one_to_many, one_to_one};
use schema_graph::walkers::ModelWalker;

pub(super) fn validate(ctx: &mut Context<'_>) {
    let db = ctx.db;

    tracing::debug!("validating the datasource");

    if let Some(source) = ctx.datasource {
        datasource::schemas_property_without_preview_feature(source, ctx);
        datasource::schemas_property_with_no_connector_support(source, ctx);
        datasource::connector_specific(source, ctx);
    }

    tracing::debug!("validating default functions");
    ctx.connector
        .validate_scalar_field_unknown_default_functions(db, ctx.diagnostics);

    tracing::debug!("validating composite types");
    composite_types::detect_composite_cycles(ctx);

    for composite_type in db.walk_composite_types() {
        composite_types::composite_types_support(composite_type, ctx);
        composite_types::more_than_one_field(composite_type, ctx);

        for field in composite_type.fields() {
            composite_types::validate_default_value(field, ctx);
            fields::validate_native_type_arguments(field.scalar_type(), field.raw_native_type(), ctx);
        }
    }

    tracing::debug!("validating models");

    let names = Names::new(db, ctx.connector);
    models::database_name_clashes(ctx);

    let mut ambiguous_relations = false;

    for model in db.walk_models_and_views() {
        validate_model(model, &names, ctx);

        for field in model.relation_fields() {
            // Relations that cannot be told apart are not classified.
            if let Err(error) = relation_fields::ambiguity(field, &names) {
                ctx.push_error(error);
                ambiguous_relations = true;
                continue;
            }

            fields::validate_client_name(model, field.name(), &names, ctx);
            relation_fields::relation_name_is_not_empty(field, ctx);
            relation_fields::ignored_related_model(field, ctx);
            relation_fields::referential_actions(field, ctx);
            relation_fields::map(field, ctx);
            relation_fields::has_a_unique_constraint_name(field, &names, ctx);
            relation_fields::validate_missing_relation_indexes(field, ctx);
            relation_fields::connector_specific(field, ctx);
        }
    }

    tracing::debug!("validating indexes");

    for index in db.walk_models().flat_map(|model| model.indexes()) {
        indexes::has_fields(index, ctx);
        indexes::has_a_unique_constraint_name(index, &names, ctx);
        indexes::unique_index_has_a_unique_custom_name_per_model(index, &names, ctx);
        indexes::has_valid_mapped_name(index, ctx);
        indexes::field_length_prefix_supported(index, ctx);
        indexes::index_algorithm_is_supported(index, ctx);
        indexes::hash_index_must_not_use_sort_param(index, ctx);
        indexes::fulltext_index_supported(index, ctx);
        indexes::fulltext_columns_should_not_define_length(index, ctx);
        indexes::fulltext_column_sort_is_supported(index, ctx);
        indexes::fulltext_text_columns_should_be_bundled_together(index, ctx);
        indexes::supports_clustering_setting(index, ctx);
        indexes::clustering_can_be_defined_only_once(index, ctx);

        for attribute in index.scalar_field_attributes() {
            fields::validate_length_used_with_correct_types(attribute, (index.attribute_name(), index.span()), ctx);
        }
    }

    tracing::debug!("validating enums");
    enums::database_name_clashes(ctx);

    for r#enum in db.walk_enums() {
        enums::connector_supports_enums(r#enum, ctx);
        enums::has_a_value(r#enum, ctx);
        enums::value_names_are_unique(r#enum, ctx);
        enums::schema_is_defined_in_the_datasource(r#enum, ctx);
        enums::schema_attribute_supported_in_connector(r#enum, ctx);
        enums::schema_attribute_missing(r#enum, ctx);
        enums::multischema_feature_flag_needed(r#enum, ctx);
        enums::connector_specific(r#enum, ctx);
    }

    if ambiguous_relations {
        tracing::debug!("ambiguous relations, skipping relation validation");
    } else {
        tracing::debug!("validating relations");

        for relation in db.walk_relations() {
            validate_relation(relations::refine(relation), ctx);
        }
    }

    tracing::debug!("validating views");

    for view in db.walk_views() {
        views::view_definition_without_preview_flag(view, ctx);
        views::views_supported_in_connector(view, ctx);

        if let Some(pk) = view.primary_key() {
            views::primary_key(pk, ctx);
        }

        for index in view.indexes() {
            views::index(index, ctx);
            views::index_field_attributes(index, ctx);
        }

        views::connector_specific(view, ctx);
    }
}

fn validate_model(model: ModelWalker<'_>, names: &Names<'_>, ctx: &mut Context<'_>) {
    models::has_a_strict_unique_criteria(model, ctx);
    models::field_names_are_unique(model, ctx);
    models::id_has_fields(model, ctx);
    models::id_client_name_does_not_clash_with_field(model, ctx);
    models::has_a_unique_primary_key_name(model, names, ctx);
    models::has_a_unique_custom_primary_key_name_per_model(model, names, ctx);
    models::primary_key_length_prefix_supported(model, ctx);
    models::primary_key_sort_order_supported(model, ctx);
    models::primary_key_connector_specific(model, ctx);
    models::only_one_fulltext_attribute_allowed(model, ctx);
    models::schema_is_defined_in_the_datasource(model, ctx);
    models::schema_attribute_supported_in_connector(model, ctx);
    models::schema_attribute_missing(model, ctx);
    models::multischema_feature_flag_needed(model, ctx);
    autoincrement::validate_auto_increment(model, ctx);

    if !model.is_view() {
        models::connector_specific(model, ctx);
    }

    if let Some(pk) = model.primary_key() {
        fields::id_supports_clustering_setting(pk, ctx);
        fields::clustering_can_be_defined_only_once(pk, ctx);

        for attribute in pk.scalar_field_attributes() {
            fields::validate_length_used_with_correct_types(attribute, (pk.attribute_name(), pk.span()), ctx);
        }
    }

    for field in model.scalar_fields() {
        fields::validate_client_name(model, field.name(), names, ctx);
        fields::has_a_unique_default_constraint_name(field, names, ctx);
        fields::validate_native_type_arguments(field.scalar_type(), field.raw_native_type(), ctx);
        fields::validate_default_value(field, ctx);
        fields::validate_scalar_field_connector_specific(field, ctx);
        fields::validate_unsupported_field_type(field, ctx);
    }
}

fn validate_relation(relation: RefinedRelation<'_>, ctx: &mut Context<'_>) {
    match relation {
        RefinedRelation::OneToOne(relation) => {
            validate_inline_relation(relation, ctx);

            one_to_one::both_sides_are_defined(relation, ctx);
            one_to_one::fields_and_references_are_defined(relation, ctx);
            one_to_one::fields_and_references_defined_on_one_side_only(relation, ctx);
            one_to_one::referential_actions(relation, ctx);
            one_to_one::fields_must_be_a_unique_constraint(relation, ctx);

            // Only on an otherwise valid relation.
            one_to_one::fields_references_mixups(relation, ctx);
            one_to_one::fields_and_references_on_wrong_side(relation, ctx);
            one_to_one::back_relation_arity_is_optional(relation, ctx);
        }
        RefinedRelation::OneToMany(relation) => {
            validate_inline_relation(relation, ctx);

            one_to_many::both_sides_are_defined(relation, ctx);
            one_to_many::fields_and_references_are_defined(relation, ctx);
            one_to_many::referential_actions(relation, ctx);
        }
        RefinedRelation::ImplicitManyToMany(relation) => {
            many_to_many::implicit::supports_implicit_relations(relation, ctx);
            many_to_many::implicit::not_on_views(relation, ctx);
            many_to_many::implicit::validate_singular_id(relation, ctx);
            many_to_many::implicit::validate_no_referential_actions(relation, ctx);
            many_to_many::implicit::cannot_define_references_argument(relation, ctx);
        }
        RefinedRelation::TwoWayEmbeddedManyToMany(relation) => {
            many_to_many::embedded::supports_embedded_relations(relation, ctx);

            if can_have_capability(ConnectorCapability::TwoWayEmbeddedManyToManyRelation) {
                many_to_many::embedded::defines_references_on_both_sides(relation, ctx);
                many_to_many::embedded::references_id_from_both_sides(relation, ctx);
                many_to_many::embedded::referencing_with_an_array_field_of_correct_type(relation, ctx);
            }
        }
    }
}

fn validate_inline_relation(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    if let Some(complete) = relation.as_complete() {
        relations::cycles(complete, ctx);
        relations::multiple_cascading_paths(complete, ctx);
        relations::field_arity(complete, ctx);
        relations::same_length_in_referencing_and_referenced(complete, ctx);
        relations::references_unique_fields(complete, ctx);
        relations::referencing_fields_in_correct_order(complete, ctx);
    }

    relations::referencing_scalar_field_types(relation, ctx);
}

/// True iff the first sequence is a prefix of the second, comparing element by element.
///
/// `[a, b]` is leftwise included in `[a, b, c]`, but not in `[b, a, c]` or `[a]`.
pub fn is_leftwise_included_it<T>(item: impl ExactSizeIterator<Item = T>, group: impl Iterator<Item = T>) -> bool
where
    T: PartialEq,
{
    let item_len = item.len();
    let mut group = group;
    let mut matched = 0;

    for left in item {
        match group.next() {
            Some(right) if left == right => matched += 1,
            _ => return false,
        }
    }

    matched == item_len
}

#[cfg(test)]
mod tests {
    use super::is_leftwise_included_it;

    #[test]
    fn test_is_left_wise_included() {
        let item = [1, 2];
        let group = [1, 2, 3, 4];
        assert!(is_leftwise_included_it(item.iter(), group.iter()));

        let item = [1, 2, 3, 4];
        let group = [1, 2, 3, 4];
        assert!(is_leftwise_included_it(item.iter(), group.iter()));

        let item = [1, 2, 3, 4];
        assert!(is_leftwise_included_it(item.iter(), group.iter()));

        let item = [4];
        assert!(!is_leftwise_included_it(item.iter(), group.iter()));

        let item = [1, 2, 3, 4, 5];
        let group = [1, 2, 3, 4];
        assert!(!is_leftwise_included_it(item.iter(), group.iter()));

        let item: [i32; 0] = [];
        assert!(is_leftwise_included_it(item.iter(), group.iter()));
    }

    #[test]
    fn leftwise_inclusion_matches_prefix_comparison_on_small_sequences() {
        let alphabet = [0u8, 1, 2];

        let sequences: Vec<Vec<u8>> = (0..=3)
            .flat_map(|len| {
                (0..alphabet.len().pow(len as u32)).map(move |mut n| {
                    (0..len)
                        .map(|_| {
                            let digit = alphabet[n % alphabet.len()];
                            n /= alphabet.len();
                            digit
                        })
                        .collect()
                })
            })
            .collect();

        for a in &sequences {
            for b in &sequences {
                let expected = a.len() <= b.len() && a[..] == b[..a.len()];
                assert_eq!(is_leftwise_included_it(a.iter(), b.iter()), expected, "{a:?} in {b:?}");
            }
        }
    }
}
