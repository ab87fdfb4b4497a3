use super::{InlineRelation, RELATION_ATTRIBUTE_NAME, is_empty_fields};
use crate::{diagnostics::DatamodelError, validate::validation_pipeline::context::Context};

/// A relation should have the explicit and back-relation side defined.
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

/// The forward side must define `fields` and `references` in the `@relation` attribute.
pub(crate) fn fields_and_references_are_defined(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    let forward = relation.forward_relation_field();
    let Some(back) = relation.back_relation_field() else {
        return;
    };

    let missing = [
        (
            "fields",
            is_empty_fields(forward.referencing_fields()) && is_empty_fields(back.referencing_fields()),
        ),
        (
            "references",
            is_empty_fields(forward.referenced_fields()) && is_empty_fields(back.referenced_fields()),
        ),
    ];

    for (argument, _) in missing.into_iter().filter(|(_, missing)| *missing) {
        for (field, other) in [(forward, back), (back, forward)] {
            let message = format!(
                "The relation fields `{}` on Model `{}` and `{}` on Model `{}` do not provide the `{argument}` argument in the {RELATION_ATTRIBUTE_NAME} attribute. You have to provide it on one of the two fields.",
                field.name(),
                field.model().name(),
                other.name(),
                other.model().name(),
            );

            ctx.push_error(DatamodelError::new_attribute_validation_error(
                &message,
                RELATION_ATTRIBUTE_NAME,
                field.span(),
            ));
        }
    }
}

/// `fields` and `references` should only be defined in the forward side of the relation.
pub(crate) fn fields_and_references_defined_on_one_side_only(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    let forward = relation.forward_relation_field();
    let Some(back) = relation.back_relation_field() else {
        return;
    };

    let both_define = [
        (
            "references",
            !is_empty_fields(forward.referenced_fields()) && !is_empty_fields(back.referenced_fields()),
        ),
        (
            "fields",
            !is_empty_fields(forward.referencing_fields()) && !is_empty_fields(back.referencing_fields()),
        ),
    ];

    for (argument, _) in both_define.into_iter().filter(|(_, both)| *both) {
        let message = format!(
            "The relation fields `{}` on Model `{}` and `{}` on Model `{}` both provide the `{argument}` argument in the {RELATION_ATTRIBUTE_NAME} attribute. You have to provide it only on one of the two fields.",
            forward.name(),
            forward.model().name(),
            back.name(),
            back.model().name(),
        );

        for field in [forward, back] {
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                &message,
                RELATION_ATTRIBUTE_NAME,
                field.span(),
            ));
        }
    }
}

/// Referential actions must be defined in the forward side.
pub(crate) fn referential_actions(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    let forward = relation.forward_relation_field();
    let Some(back) = relation.back_relation_field() else {
        return;
    };

    let has_actions = |field: schema_graph::walkers::RelationFieldWalker<'_>| {
        field.explicit_on_delete().is_some() || field.explicit_on_update().is_some()
    };

    if has_actions(forward) && has_actions(back) {
        // We show the error on both fields.
        for (field, other) in [(back, forward), (forward, back)] {
            let message = format!(
                "The relation fields `{}` on Model `{}` and `{}` on Model `{}` both provide the `onDelete` or `onUpdate` argument in the {RELATION_ATTRIBUTE_NAME} attribute. You have to provide it only on one of the two fields.",
                field.name(),
                field.model().name(),
                other.name(),
                other.model().name(),
            );

            ctx.push_error(DatamodelError::new_attribute_validation_error(
                &message,
                RELATION_ATTRIBUTE_NAME,
                field.span(),
            ));
        }
    } else if has_actions(back) {
        let message = format!(
            "The relation field `{}` on Model `{}` must not specify the `onDelete` or `onUpdate` argument in the {RELATION_ATTRIBUTE_NAME} attribute. You must only specify it on the opposite field `{}` on model `{}`.",
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

/// Defining `fields` and `references` on different sides in the relation.
pub(crate) fn fields_references_mixups(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    if ctx.has_errors() {
        return;
    }

    let forward = relation.forward_relation_field();
    let Some(back) = relation.back_relation_field() else {
        return;
    };

    if !is_empty_fields(forward.referencing_fields()) && !is_empty_fields(back.referenced_fields()) {
        let message = format!(
            "The relation field `{}` on Model `{}` provides the `fields` argument in the {RELATION_ATTRIBUTE_NAME} attribute. And the related field `{}` on Model `{}` provides the `references` argument. You must provide both arguments on the same side.",
            forward.name(),
            forward.model().name(),
            back.name(),
            back.model().name(),
        );

        for field in [forward, back] {
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                &message,
                RELATION_ATTRIBUTE_NAME,
                field.span(),
            ));
        }
    }

    if !is_empty_fields(forward.referenced_fields()) && !is_empty_fields(back.referencing_fields()) {
        let message = format!(
            "The relation field `{}` on Model `{}` provides the `references` argument in the {RELATION_ATTRIBUTE_NAME} attribute. And the related field `{}` on Model `{}` provides the `fields` argument. You must provide both arguments on the same side.",
            forward.name(),
            forward.model().name(),
            back.name(),
            back.model().name(),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            forward.span(),
        ));
    }
}

/// An optional side holding `fields` or `references` against a required
/// side without them cannot be enforced.
pub(crate) fn fields_and_references_on_wrong_side(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    if ctx.has_errors() {
        return;
    }

    let forward = relation.forward_relation_field();
    let Some(back) = relation.back_relation_field() else {
        return;
    };

    let defines_arguments = |field: schema_graph::walkers::RelationFieldWalker<'_>| {
        !is_empty_fields(field.referencing_fields()) || !is_empty_fields(field.referenced_fields())
    };

    if back.is_required() && forward.is_optional() && defines_arguments(forward) && !defines_arguments(back) {
        let message = format!(
            "The relation field `{}.{}` defines the `fields` and/or `references` argument. You must set them on the required side of the relation (`{}.{}`) in order for the constraints to be enforced. Alternatively, you can change this field to be required and the opposite optional, or make both sides of the relation optional.",
            forward.model().name(),
            forward.name(),
            back.model().name(),
            back.name(),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            forward.span(),
        ));
    }
}

/// The back-relation side cannot be required.
pub(crate) fn back_relation_arity_is_optional(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    if ctx.has_errors() {
        return;
    }

    let forward = relation.forward_relation_field();
    let Some(back) = relation.back_relation_field() else {
        return;
    };

    if back.is_required() {
        let message = format!(
            "The relation field `{}` on Model `{}` is required. This is not valid because it's not possible to enforce this constraint on the database level. Please change the field type from `{}` to `{}?` to fix this.",
            back.name(),
            back.model().name(),
            forward.model().name(),
            forward.model().name(),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            back.span(),
        ));
    }
}

/// A 1:1 relation is enforced with a unique constraint. The
/// referencing side must use a unique constraint to enforce the
/// relation.
pub(crate) fn fields_must_be_a_unique_constraint(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    let Some(referencing_fields) = relation.referencing_fields() else {
        return;
    };

    if referencing_fields.len() == 0 {
        return;
    }

    let mut fields: Vec<_> = referencing_fields.map(|f| f.name()).collect();

    let mut sorted = fields.clone();
    sorted.sort_unstable();

    let is_unique = relation.referencing_model().unique_criterias().any(|c| {
        let mut criteria: Vec<_> = c.fields().map(|f| f.name()).collect();
        criteria.sort_unstable();
        criteria == sorted
    });

    if is_unique {
        return;
    }

    let message = if fields.len() == 1 {
        format!(
            "A one-to-one relation must use unique fields on the defining side. Either add an `@unique` attribute to the field `{}`, or change the relation to one-to-many.",
            fields.remove(0)
        )
    } else {
        format!(
            "A one-to-one relation must use unique fields on the defining side. Either add an `@@unique([{}])` attribute to the model, or change the relation to one-to-many.",
            fields.join(", ")
        )
    };

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        &message,
        RELATION_ATTRIBUTE_NAME,
        relation.forward_relation_field().span(),
    ));
}
