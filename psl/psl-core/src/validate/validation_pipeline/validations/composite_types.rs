use super::default_value;
use crate::{
    datamodel_connector::ConnectorCapability, diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use schema_graph::{
    CompositeTypeId, ScalarFieldType,
    walkers::{CompositeTypeFieldWalker, CompositeTypeWalker},
};
use std::{fmt, rc::Rc};

/// Detect compound type chains that form a cycle, that is not broken with either an optional or an
/// array type.
pub(super) fn detect_composite_cycles(ctx: &mut Context<'_>) {
    let mut visited: Vec<CompositeTypeId> = Vec::new();
    let mut errors: Vec<(Vec<CompositeTypeId>, DatamodelError)> = Vec::new();

    let mut fields_to_traverse: Vec<(CompositeTypeFieldWalker<'_>, Option<Rc<CompositeTypePath<'_>>>)> = ctx
        .db
        .walk_composite_types()
        .flat_map(|ct| ct.fields())
        .filter(|f| f.arity().is_required())
        .map(|f| (f, None))
        .collect();

    // Walk in declaration order.
    fields_to_traverse.reverse();

    while let Some((field, path)) = fields_to_traverse.pop() {
        let path = match path {
            Some(path) => path,
            None => {
                visited.clear();
                visited.push(field.composite_type().id);
                Rc::new(CompositeTypePath::root(field.composite_type()))
            }
        };

        match field.r#type() {
            ScalarFieldType::CompositeType(ctid) if field.composite_type().id == ctid => {
                let msg = "The type is the same as the parent and causes an endless cycle. Please change the field to be either optional or a list.";
                errors.push((
                    vec![ctid],
                    DatamodelError::new_composite_type_field_validation_error(
                        msg,
                        field.composite_type().name(),
                        field.name(),
                        field.span(),
                    ),
                ));
            }
            ScalarFieldType::CompositeType(ctid) if visited.first() == Some(&ctid) => {
                let path = path.link_to(ctx.db.walk(ctid));
                let msg = format!(
                    "The types cause an endless cycle in the path {path}. Please change one of the fields to be either optional or a list to break the cycle."
                );

                errors.push((
                    path.type_ids(),
                    DatamodelError::new_composite_type_field_validation_error(
                        &msg,
                        field.composite_type().name(),
                        field.name(),
                        field.span(),
                    ),
                ));
            }
            ScalarFieldType::CompositeType(ctid) if visited.contains(&ctid) => (),
            ScalarFieldType::CompositeType(ctid) => {
                visited.push(ctid);

                let next = Rc::new(path.link_to(ctx.db.walk(ctid)));

                for field in ctx.db.walk(ctid).fields().filter(|f| f.arity().is_required()).rev() {
                    fields_to_traverse.push((field, Some(next.clone())));
                }
            }
            _ => (),
        }
    }

    // A cycle is found once from every type on it. Report it from the first
    // type of the cycle only.
    let mut reported: Vec<Vec<CompositeTypeId>> = Vec::new();

    for (cycle, error) in errors {
        if reported.contains(&cycle) {
            continue;
        }

        reported.push(cycle);
        ctx.push_error(error);
    }
}

/// Does the connector support composite types.
pub(super) fn composite_types_support(composite_type: CompositeTypeWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::CompositeTypes) {
        return;
    }

    ctx.push_error(DatamodelError::new_validation_error(
        &format!("Composite types are not supported on {}.", ctx.connector.name()),
        composite_type.span(),
    ));
}

/// A composite type must have at least one field.
pub(super) fn more_than_one_field(composite_type: CompositeTypeWalker<'_>, ctx: &mut Context<'_>) {
    if composite_type.fields().len() > 0 {
        return;
    }

    ctx.push_error(DatamodelError::new_validation_error(
        "A type must have at least one field defined.",
        composite_type.span(),
    ));
}

/// Validates the @default attribute of a composite scalar field
pub(super) fn validate_default_value(field: CompositeTypeFieldWalker<'_>, ctx: &mut Context<'_>) {
    let Some(default_attribute) = field.default_attribute() else {
        return;
    };

    if default_attribute.mapped_name.is_some() {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            "A `map` argument for the default value of a field on a composite type is not allowed. Consider removing it.",
            "@default",
            default_attribute.span,
        ));
    }

    default_value::validate_default_value(Some(&default_attribute.value), field.scalar_type(), ctx);
}

struct CompositeTypePath<'db> {
    previous: Option<Rc<CompositeTypePath<'db>>>,
    current: CompositeTypeWalker<'db>,
}

impl<'db> CompositeTypePath<'db> {
    fn root(current: CompositeTypeWalker<'db>) -> Self {
        Self {
            previous: None,
            current,
        }
    }

    fn link_to(self: &Rc<Self>, current: CompositeTypeWalker<'db>) -> Self {
        Self {
            previous: Some(self.clone()),
            current,
        }
    }

    /// The types on the path, sorted and without duplicates.
    fn type_ids(&self) -> Vec<CompositeTypeId> {
        let mut ids = vec![self.current.id];
        let mut this = self;

        while let Some(next) = this.previous.as_ref() {
            ids.push(next.current.id);
            this = next;
        }

        ids.sort();
        ids.dedup();
        ids
    }
}

impl fmt::Display for CompositeTypePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut traversed = vec![self.current];
        let mut this = self;

        while let Some(next) = this.previous.as_ref() {
            traversed.push(next.current);
            this = next;
        }

        let path = traversed
            .into_iter()
            .rev()
            .map(|w| format!("`{}`", w.name()))
            .collect::<Vec<_>>()
            .join(" → ");

        f.write_str(&path)
    }
}
