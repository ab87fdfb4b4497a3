use super::single_id_field;
use crate::validate::validation_pipeline::validations::relations::{ManyToManyRelation, RELATION_ATTRIBUTE_NAME};
use crate::{
    datamodel_connector::ConnectorCapability,
    diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use itertools::Itertools;
use schema_graph::walkers::RelationFieldWalker;

fn references_singular_id_field(field: RelationFieldWalker<'_>) -> bool {
    let Some(id_field) = single_id_field(field.related_model()) else {
        return false;
    };

    match field.referenced_fields() {
        None => true,
        Some(mut referenced) => referenced.len() == 1 && referenced.next().is_some_and(|f| f.id == id_field.id),
    }
}

/// The join table points to the ids of both models.
pub(crate) fn validate_singular_id(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    for relation_field in relation.fields() {
        let related_model = relation_field.related_model();
        let model = relation_field.model();

        if single_id_field(related_model).is_none() {
            let container = model.block_type();

            let message = format!(
                "The relation field `{}` on {container} `{}` references `{}` which does not have an `@id` field. Models without `@id` cannot be part of a many to many relation. Use an explicit intermediate Model to represent this relationship.",
                relation_field.name(),
                model.name(),
                related_model.name(),
            );

            ctx.push_error(DatamodelError::new_field_validation_error(
                &message,
                container,
                model.name(),
                relation_field.name(),
                relation_field.span(),
            ));

            continue;
        }

        if !references_singular_id_field(relation_field) {
            let referenced = relation_field
                .referenced_fields()
                .into_iter()
                .flatten()
                .map(|f| f.name())
                .join(", ");

            let message = format!(
                "Implicit many-to-many relations must always reference the id field of the related model. Change the argument `references` to use the id field of the related model `{}`. But it is referencing the following fields that are not the id: {referenced}",
                related_model.name(),
            );

            ctx.push_error(DatamodelError::new_validation_error(&message, relation_field.span()));
        }
    }
}

/// M:N relations cannot have referential actions defined.
pub(crate) fn validate_no_referential_actions(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    let spans = relation.fields().into_iter().flat_map(|field| {
        let on_delete = field.explicit_on_delete().map(|_| field.explicit_on_delete_span());
        let on_update = field.explicit_on_update().map(|_| field.explicit_on_update_span());

        [on_delete, on_update]
            .into_iter()
            .flatten()
            .map(move |span| span.unwrap_or_else(|| field.relation_attribute_span()))
    });

    for span in spans {
        ctx.push_error(DatamodelError::new_validation_error(
            "Referential actions on implicit many-to-many relations are not supported",
            span,
        ));
    }
}

/// Document databases have no join tables.
pub(crate) fn supports_implicit_relations(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::ImplicitManyToManyRelation) {
        return;
    }

    let message = format!(
        "Implicit many-to-many relations are not supported on {}. Please use the syntax defined in https://pris.ly/d/document-database-many-to-many",
        ctx.connector.name()
    );

    for field in relation.fields() {
        ctx.push_error(DatamodelError::new_validation_error(&message, field.span()));
    }
}

pub(crate) fn cannot_define_references_argument(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    let message = "Implicit many-to-many relation should not have references argument defined. Either remove it, or change the relation to one-to-many.";

    for field in relation.fields() {
        if field.referenced_fields().is_some() {
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                message,
                RELATION_ATTRIBUTE_NAME,
                field.span(),
            ));
        }
    }
}

/// A view has no table to join through.
pub(crate) fn not_on_views(relation: ManyToManyRelation<'_>, ctx: &mut Context<'_>) {
    for field in relation.fields() {
        let model = field.model();

        if !model.is_view() {
            continue;
        }

        let message = format!(
            "The relation field `{}` on view `{}` is part of an implicit many-to-many relation. Views cannot be part of a many-to-many relation. Use an explicit intermediate model to represent this relationship.",
            field.name(),
            model.name(),
        );

        ctx.push_error(DatamodelError::new_field_validation_error(
            &message,
            model.block_type(),
            model.name(),
            field.name(),
            field.span(),
        ));
    }
}
