use super::{InlineRelation, RELATION_ATTRIBUTE_NAME, is_empty_fields};
use crate::{diagnostics::DatamodelError, validate::validation_pipeline::context::Context};

pub(crate) fn both_sides_are_defined(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    if relation.back_relation_field().is_some() {
        return;
    }

    let field = relation.forward_relation_field();
    let model = field.model();
    let container = model.block_type();

    let message = format!(
        "The relation field `{}` on {container} `{}` is missing an opposite relation field on the model `{}`. Either run `prisma format` or add it manually.",
        field.name(),
        model.name(),
        field.related_model().name(),
    );

    ctx.push_error(DatamodelError::new_field_validation_error(
        &message,
        container,
        model.name(),
        field.name(),
        field.span(),
    ));
}

/// The singular side holds `fields` and `references`, the list side holds neither.
pub(crate) fn fields_and_references_are_defined(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    let forward = relation.forward_relation_field();
    let Some(back) = relation.back_relation_field() else {
        return;
    };

    if forward.is_list() {
        return;
    }

    for (argument, missing) in [
        ("fields", is_empty_fields(forward.referencing_fields())),
        ("references", is_empty_fields(forward.referenced_fields())),
    ] {
        if !missing {
            continue;
        }

        let message = format!(
            "The relation field `{}` on Model `{}` must specify the `{argument}` argument in the {RELATION_ATTRIBUTE_NAME} attribute. You can run `prisma format` to fix this automatically.",
            forward.name(),
            forward.model().name(),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            forward.span(),
        ));
    }

    if back.referencing_fields().is_some() || back.referenced_fields().is_some() {
        let message = format!(
            "The relation field `{}` on Model `{}` must not specify the `fields` or `references` argument in the {RELATION_ATTRIBUTE_NAME} attribute. You must only specify it on the opposite field `{}` on model `{}`, or in case of a many to many relation, in an explicit join table.",
            back.name(),
            back.model().name(),
            forward.name(),
            forward.model().name(),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            back.span(),
        ));
    }
}

/// Referential actions belong to the side holding the foreign key.
pub(crate) fn referential_actions(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    let forward = relation.forward_relation_field();
    let Some(back) = relation.back_relation_field() else {
        return;
    };

    if back.explicit_on_delete().is_none() && back.explicit_on_update().is_none() {
        return;
    }

    let message = format!(
        "The relation field `{}` on Model `{}` must not specify the `onDelete` or `onUpdate` argument in the {RELATION_ATTRIBUTE_NAME} attribute. You must only specify it on the opposite field `{}` on model `{}`, or in case of a many to many relation, in an explicit join table.",
        back.name(),
        back.model().name(),
        forward.name(),
        forward.model().name(),
    );

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        &message,
        RELATION_ATTRIBUTE_NAME,
        back.span(),
    ));
}
