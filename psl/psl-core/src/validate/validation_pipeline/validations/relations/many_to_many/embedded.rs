use super::single_id_field;
use crate::validate::validation_pipeline::validations::relations::{ManyToManyRelation, RELATION_ATTRIBUTE_NAME};
use crate::{
    datamodel_connector::ConnectorCapability,
    diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};

pub(crate) fn supports_embedded_relations(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::TwoWayEmbeddedManyToManyRelation) {
        return;
    }

    let message = format!(
        "Embedded many-to-many relations are not supported on {}. Please use the syntax defined in https://pris.ly/d/relational-database-many-to-many",
        ctx.connector.name()
    );

    for field in relation.fields() {
        ctx.push_error(DatamodelError::new_validation_error(&message, field.span()));
    }
}

/// Each side stores the ids of the other side in one scalar list.
pub(crate) fn defines_references_on_both_sides(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    for field in relation.fields() {
        let fields_len = field.referencing_fields().map(|fields| fields.len());
        let references_len = field.referenced_fields().map(|fields| fields.len());

        if fields_len == Some(1) && references_len == Some(1) {
            continue;
        }

        let message = format!(
            "The relation field `{}` on Model `{}` must define `fields` and `references` arguments with exactly one field each in a two-way embedded many-to-many relation.",
            field.name(),
            field.model().name(),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            field.span(),
        ));
    }
}

pub(crate) fn references_id_from_both_sides(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    for field in relation.fields() {
        let Some(mut referenced) = field.referenced_fields() else {
            continue;
        };

        let Some(referenced) = referenced.next() else {
            continue;
        };

        let related_model = field.related_model();

        if single_id_field(related_model).is_some_and(|id| id.id == referenced.id) {
            continue;
        }

        let message = format!(
            "The `references` argument of the relation field `{}` on Model `{}` must point to the id field of the related model `{}`.",
            field.name(),
            field.model().name(),
            related_model.name(),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            field.span(),
        ));
    }
}

pub(crate) fn referencing_with_an_array_field_of_correct_type(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    for field in relation.fields() {
        let Some(referencing) = field.referencing_fields() else {
            continue;
        };

        for scalar in referencing.filter(|scalar| !scalar.is_list()) {
            let message = format!(
                "The `fields` argument of the relation field `{}` on Model `{}` must point to a scalar list, but `{}` is not a list.",
                field.name(),
                field.model().name(),
                scalar.name(),
            );

            ctx.push_error(DatamodelError::new_attribute_validation_error(
                &message,
                RELATION_ATTRIBUTE_NAME,
                field.span(),
            ));
        }
    }
}
