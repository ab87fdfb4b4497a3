use super::{constraint_namespace::ConstraintName, database_name::validate_db_name, names::Names};
use crate::{
    datamodel_connector::{ConnectorCapability, walker_ext_traits::*},
    diagnostics::{DatamodelError, DatamodelWarning},
    validate::validation_pipeline::{context::Context, validations::is_leftwise_included_it},
};
use itertools::Itertools;
use schema_graph::{
    ReferentialAction, RelationFieldId, SchemaGraph,
    walkers::{ModelWalker, RelationFieldWalker, RelationName},
};
use std::fmt;

pub(super) const RELATION_ATTRIBUTE_NAME: &str = "@relation";

struct Fields<'db> {
    fields: &'db [RelationFieldId],
    db: &'db SchemaGraph,
}

impl<'db> Fields<'db> {
    fn new(fields: &'db [RelationFieldId], db: &'db SchemaGraph) -> Self {
        Self { fields, db }
    }
}

impl fmt::Display for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = self.fields.iter().map(|id| self.db.walk(*id).name()).peekable();

        let Some(first) = fields.next() else {
            return Ok(());
        };

        write!(f, "`{first}`")?;

        while let Some(name) = fields.next() {
            if fields.peek().is_some() {
                write!(f, ", `{name}`")?;
            } else {
                write!(f, " and `{name}`")?;
            }
        }

        Ok(())
    }
}

/// Two relations between the same models must carry distinct names. A
/// self relation may have two fields under one name.
pub(super) fn ambiguity(field: RelationFieldWalker<'_>, names: &Names<'_>) -> Result<(), DatamodelError> {
    let model = field.model();
    let related_model = field.related_model();
    let identifier = (model.id, related_model.id, field.relation_name());

    let Some(fields) = names.relation_names.get(&identifier) else {
        return Ok(());
    };

    if fields.len() <= 1 {
        return Ok(());
    }

    let field_names = Fields::new(fields, field.db);
    let is_self_relation = model == related_model;

    let message = match identifier.2 {
        RelationName::Generated(..) if is_self_relation && fields.len() == 2 => format!(
            "Ambiguous self relation detected. The fields {} in model `{}` both refer to `{}`. If they are part of the same relation add the same relation name for them with `@relation(<name>)`.",
            field_names,
            model.name(),
            related_model.name(),
        ),
        RelationName::Generated(..) if is_self_relation => format!(
            "Unnamed self relation detected. The fields {} in model `{}` have no relation name. Please provide a relation name for one of them by adding `@relation(<name>).",
            field_names,
            model.name(),
        ),
        RelationName::Explicit(_) if is_self_relation && fields.len() > 2 => format!(
            "Wrongly named self relation detected. The fields {} in model `{}` have the same relation name. At most two relation fields can belong to the same relation and therefore have the same name. Please assign a different relation name to one of them.",
            field_names,
            model.name(),
        ),
        RelationName::Explicit(_) if is_self_relation => return Ok(()),
        RelationName::Generated(..) => format!(
            "Ambiguous relation detected. The fields {} in model `{}` both refer to `{}`. Please provide different relation names for them by adding `@relation(<name>).",
            field_names,
            model.name(),
            related_model.name(),
        ),
        RelationName::Explicit(_) => format!(
            "Wrongly named relation detected. The fields {} in model `{}` both use the same relation name. Please provide different relation names for them through `@relation(<name>).",
            field_names,
            model.name(),
        ),
    };

    Err(DatamodelError::new_model_validation_error(
        &message,
        model.block_type(),
        model.name(),
        field.span(),
    ))
}

pub(super) fn relation_name_is_not_empty(field: RelationFieldWalker<'_>, ctx: &mut Context<'_>) {
    if field.explicit_relation_name().is_some_and(|name| name.is_empty()) {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            "A relation cannot have an empty name.",
            RELATION_ATTRIBUTE_NAME,
            field.relation_attribute_span(),
        ));
    }
}

/// A relation to an ignored model must be ignored too.
pub(super) fn ignored_related_model(field: RelationFieldWalker<'_>, ctx: &mut Context<'_>) {
    let related_model = field.related_model();
    let model = field.model();

    if !related_model.is_ignored() || field.is_ignored() || model.is_ignored() {
        return;
    }

    let message = format!(
        "The relation field `{}` on {} `{}` must specify the `@ignore` attribute, because the {} {} it is pointing to is marked ignored.",
        field.name(),
        model.block_type(),
        model.name(),
        related_model.block_type(),
        related_model.name(),
    );

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        &message,
        "@ignore",
        field.span(),
    ));
}

/// The referential actions must be supported in the active relation mode,
/// and `SetNull` needs nullable referencing fields.
pub(super) fn referential_actions(field: RelationFieldWalker<'_>, ctx: &mut Context<'_>) {
    let connector = ctx.connector;
    let relation_mode = ctx.relation_mode;

    let allowed_values = || {
        connector
            .referential_actions(relation_mode)
            .iter()
            .map(|action| format!("`{}`", action.as_str()))
            .join(", ")
    };

    let actions = [
        ("onDelete", field.explicit_on_delete(), field.explicit_on_delete_span()),
        ("onUpdate", field.explicit_on_update(), field.explicit_on_update_span()),
    ];

    for (argument, action, span) in actions {
        let Some(action) = action else { continue };
        let span = span.unwrap_or_else(|| field.relation_attribute_span());

        if !connector.supports_referential_action(relation_mode, action) {
            let message = format!(
                "Invalid referential action: `{}`. Allowed values: ({})",
                action.as_str(),
                allowed_values(),
            );

            ctx.push_error(DatamodelError::new_attribute_validation_error(
                &message,
                RELATION_ATTRIBUTE_NAME,
                span,
            ));

            continue;
        }

        if action != ReferentialAction::SetNull {
            continue;
        }

        let required_fields = field
            .referencing_fields()
            .into_iter()
            .flatten()
            .filter(|f| !f.is_optional())
            .map(|f| f.name())
            .collect::<Vec<_>>();

        if required_fields.is_empty() {
            continue;
        }

        let message = format!(
            "The `{argument}` referential action of a relation must not be set to `SetNull` when a referenced field is required. Either choose another referential action, or make the referenced fields optional."
        );

        if connector.allows_set_null_referential_action_on_non_nullable_fields(relation_mode) {
            let model = field.model();

            ctx.push_warning(DatamodelWarning::new_field_validation(
                &message,
                model.name(),
                field.name(),
                span,
            ));
        } else {
            ctx.push_error(DatamodelError::new_attribute_validation_error(
                &message,
                RELATION_ATTRIBUTE_NAME,
                span,
            ));
        }
    }
}

/// A database name on the foreign key.
pub(super) fn map(field: RelationFieldWalker<'_>, ctx: &mut Context<'_>) {
    let Some(mapped_name) = field.mapped_name() else {
        return;
    };

    if !ctx.has_capability(ConnectorCapability::NamedForeignKeys) {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            "Your provider does not support named foreign keys.",
            RELATION_ATTRIBUTE_NAME,
            field.relation_attribute_span(),
        ));

        return;
    }

    validate_db_name(
        field.model().name(),
        (RELATION_ATTRIBUTE_NAME, field.relation_attribute_span()),
        Some(mapped_name),
        ctx,
        false,
    );
}

/// Foreign key names must not collide in the namespaces of the database.
pub(super) fn has_a_unique_constraint_name(field: RelationFieldWalker<'_>, names: &Names<'_>, ctx: &mut Context<'_>) {
    let Some(name) = field.constraint_name(ctx.connector) else {
        return;
    };

    let model = field.model();

    for violation in names.constraint_namespace.constraint_name_scope_violations(
        model.id,
        ConstraintName::Relation(name.as_ref()),
        ctx.connector,
    ) {
        let message = format!(
            "The given constraint name `{}` has to be unique in the following namespace: {}. Please provide a different name using the `map` argument.",
            name,
            violation.description(model.name()),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            field.relation_attribute_span(),
        ));
    }
}

pub(super) fn connector_specific(field: RelationFieldWalker<'_>, ctx: &mut Context<'_>) {
    ctx.connector.validate_relation_field(field, ctx.diagnostics)
}

/// Without foreign keys the database does not index the referencing
/// fields for us.
pub(super) fn validate_missing_relation_indexes(field: RelationFieldWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.relation_mode.is_prisma() || !ctx.connector.should_suggest_missing_referencing_fields_indexes() {
        return;
    }

    let Some(referencing_fields) = field.referencing_fields() else {
        return;
    };

    if referencing_fields.len() == 0 {
        return;
    }

    if is_covered_by_an_index(field.model(), field) {
        return;
    }

    ctx.push_warning(DatamodelWarning::new_missing_index_on_emulated_relation(
        field.relation_attribute_span(),
    ));
}

fn is_covered_by_an_index(model: ModelWalker<'_>, field: RelationFieldWalker<'_>) -> bool {
    let Some(referencing_fields) = field.referencing_fields() else {
        return true;
    };

    let referencing = || referencing_fields.clone().map(|f| Some(f.id));

    let covered_by_index = model.indexes().any(|index| {
        let index_fields = index.fields().map(|f| f.as_scalar_field().map(|f| f.id));
        is_leftwise_included_it(referencing(), index_fields)
    });

    let covered_by_pk = model.primary_key().is_some_and(|pk| {
        let pk_fields = pk.fields().map(|f| f.as_scalar_field().map(|f| f.id));
        is_leftwise_included_it(referencing(), pk_fields)
    });

    covered_by_index || covered_by_pk
}
