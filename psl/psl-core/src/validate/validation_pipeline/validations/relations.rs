pub(super) mod many_to_many;
pub(super) mod one_to_many;
pub(super) mod one_to_one;

mod visited_relation;

use self::visited_relation::VisitedRelation;
use super::relation_fields::RELATION_ATTRIBUTE_NAME;
use crate::{
    datamodel_connector::ConnectorCapability,
    diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use either::Either;
use itertools::Itertools;
use schema_graph::{
    ReferentialAction,
    walkers::{ModelWalker, RelationFieldWalker, RelationWalker, ScalarFieldWalker},
};
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    iter,
    rc::Rc,
};

/// The shape of a relation, derived from the arity and the arguments of
/// its fields.
#[derive(Debug, Clone, Copy)]
pub(super) enum RefinedRelation<'db> {
    OneToOne(InlineRelation<'db>),
    OneToMany(InlineRelation<'db>),
    ImplicitManyToMany(ManyToManyRelation<'db>),
    TwoWayEmbeddedManyToMany(ManyToManyRelation<'db>),
}

pub(super) fn refine(relation: RelationWalker<'_>) -> RefinedRelation<'_> {
    let (field_a, field_b) = relation.fields();

    if let Some(field_b) = field_b {
        if field_a.is_list() && field_b.is_list() {
            let many_to_many = ManyToManyRelation { field_a, field_b };
            let defines_fields = field_a.referencing_fields().is_some() || field_b.referencing_fields().is_some();

            return if defines_fields {
                RefinedRelation::TwoWayEmbeddedManyToMany(many_to_many)
            } else {
                RefinedRelation::ImplicitManyToMany(many_to_many)
            };
        }
    }

    let (forward, back) = match field_b {
        Some(field_b) if field_a.referencing_fields().is_some() => (field_a, Some(field_b)),
        Some(field_b) if field_b.referencing_fields().is_some() => (field_b, Some(field_a)),
        Some(field_b) if field_a.is_list() => (field_b, Some(field_a)),
        other => (field_a, other),
    };

    let inline = InlineRelation { forward, back };

    match back {
        Some(back) if !forward.is_list() && !back.is_list() => RefinedRelation::OneToOne(inline),
        _ => RefinedRelation::OneToMany(inline),
    }
}

/// A one-to-one or one-to-many relation. The forward side holds the foreign key.
#[derive(Debug, Clone, Copy)]
pub(super) struct InlineRelation<'db> {
    forward: RelationFieldWalker<'db>,
    back: Option<RelationFieldWalker<'db>>,
}

impl<'db> InlineRelation<'db> {
    pub(super) fn forward_relation_field(self) -> RelationFieldWalker<'db> {
        self.forward
    }

    pub(super) fn back_relation_field(self) -> Option<RelationFieldWalker<'db>> {
        self.back
    }

    pub(super) fn referencing_model(self) -> ModelWalker<'db> {
        self.forward.model()
    }

    pub(super) fn referencing_fields(self) -> Option<impl ExactSizeIterator<Item = ScalarFieldWalker<'db>> + Clone> {
        self.forward.referencing_fields()
    }

    /// Both `fields` and `references` are defined on the forward side.
    pub(super) fn as_complete(self) -> Option<CompleteInlineRelation<'db>> {
        CompleteInlineRelation::new(self.forward)
    }
}

/// An inline relation with `fields` and `references` on the forward side.
#[derive(Debug, Clone, Copy)]
pub(super) struct CompleteInlineRelation<'db> {
    field: RelationFieldWalker<'db>,
}

impl<'db> CompleteInlineRelation<'db> {
    fn new(field: RelationFieldWalker<'db>) -> Option<Self> {
        let complete = !field.is_list() && field.referencing_fields().is_some() && field.referenced_fields().is_some();
        complete.then_some(Self { field })
    }

    pub(super) fn referencing_field(self) -> RelationFieldWalker<'db> {
        self.field
    }

    pub(super) fn referencing_model(self) -> ModelWalker<'db> {
        self.field.model()
    }

    pub(super) fn referenced_model(self) -> ModelWalker<'db> {
        self.field.related_model()
    }

    pub(super) fn referencing_fields(self) -> impl ExactSizeIterator<Item = ScalarFieldWalker<'db>> + Clone {
        match self.field.referencing_fields() {
            Some(fields) => Either::Left(fields),
            None => Either::Right(iter::empty()),
        }
    }

    pub(super) fn referenced_fields(self) -> impl ExactSizeIterator<Item = ScalarFieldWalker<'db>> + Clone {
        match self.field.referenced_fields() {
            Some(fields) => Either::Left(fields),
            None => Either::Right(iter::empty()),
        }
    }

    fn is_compound(self) -> bool {
        self.referencing_fields().len() > 1
    }

    /// The action on delete, defaulting to what the database does without
    /// an explicit action.
    fn on_delete(self, ctx: &Context<'_>) -> ReferentialAction {
        match self.field.effective_on_delete() {
            ReferentialAction::Restrict
                if !ctx
                    .connector
                    .supports_referential_action(ctx.relation_mode, ReferentialAction::Restrict) =>
            {
                ReferentialAction::NoAction
            }
            action => action,
        }
    }

    fn on_update(self) -> ReferentialAction {
        self.field.effective_on_update()
    }

    fn triggers_modification(self, ctx: &Context<'_>) -> bool {
        self.on_delete(ctx).triggers_modification() || self.on_update().triggers_modification()
    }
}

/// Both sides of the relation are lists.
#[derive(Debug, Clone, Copy)]
pub(super) struct ManyToManyRelation<'db> {
    field_a: RelationFieldWalker<'db>,
    field_b: RelationFieldWalker<'db>,
}

impl<'db> ManyToManyRelation<'db> {
    pub(super) fn field_a(self) -> RelationFieldWalker<'db> {
        self.field_a
    }

    pub(super) fn field_b(self) -> RelationFieldWalker<'db> {
        self.field_b
    }

    pub(super) fn fields(self) -> [RelationFieldWalker<'db>; 2] {
        [self.field_a, self.field_b]
    }
}

fn is_empty_fields<T>(fields: Option<impl ExactSizeIterator<Item = T>>) -> bool {
    fields.is_none_or(|fields| fields.len() == 0)
}

/// The complete inline relations starting from the model.
fn forward_relations(model: ModelWalker<'_>) -> impl Iterator<Item = CompleteInlineRelation<'_>> + '_ {
    model.relation_fields().filter_map(CompleteInlineRelation::new)
}

/// The `fields` and `references` should hold the same number of fields.
pub(super) fn same_length_in_referencing_and_referenced(relation: CompleteInlineRelation<'_>, ctx: &mut Context<'_>) {
    if relation.referenced_fields().len() == 0 || relation.referencing_fields().len() == 0 {
        return;
    }

    if relation.referenced_fields().len() == relation.referencing_fields().len() {
        return;
    }

    ctx.push_error(DatamodelError::new_validation_error(
        "You must specify the same number of fields in `fields` and `references`.",
        relation.referencing_field().relation_attribute_span(),
    ));
}

/// Validate that the arity of fields from `fields` is compatible with relation field arity.
pub(super) fn field_arity(relation: CompleteInlineRelation<'_>, ctx: &mut Context<'_>) {
    if !relation.referencing_field().is_required() {
        return;
    }

    if !relation.referencing_fields().any(|field| field.is_optional()) {
        return;
    }

    ctx.push_error(DatamodelError::new_validation_error(
        &format!(
            "The relation field `{}` uses the scalar fields {}. At least one of those fields is optional. Hence the relation field must be optional as well.",
            relation.referencing_field().name(),
            relation.referencing_fields().map(|field| field.name()).join(", "),
        ),
        relation.referencing_field().span(),
    ));
}

/// The foreign key must point to a unique criteria of the referenced model.
pub(super) fn references_unique_fields(relation: CompleteInlineRelation<'_>, ctx: &mut Context<'_>) {
    if relation.referenced_fields().len() == 0 || ctx.has_errors() {
        return;
    }

    let mut references_sorted: Vec<_> = relation.referenced_fields().map(|f| f.name()).collect();
    references_sorted.sort_unstable();

    let references_unique_criteria = relation.referenced_model().unique_criterias().any(|criteria| {
        let mut criteria_field_names: Vec<_> = criteria.fields().map(|f| f.name()).collect();
        criteria_field_names.sort_unstable();

        criteria_field_names == references_sorted
    });

    if references_unique_criteria {
        return;
    }

    ctx.push_error(DatamodelError::new_validation_error(
        &format!(
            "The argument `references` must refer to a unique criteria in the related model `{}`. But it is referencing the following fields that are not a unique criteria: {}",
            relation.referenced_model().name(),
            relation.referenced_fields().map(|f| f.name()).join(", ")
        ),
        relation.referencing_field().span(),
    ));
}

/// Some connectors want the fields and references in the same order as
/// the unique criteria they point to.
pub(super) fn referencing_fields_in_correct_order(relation: CompleteInlineRelation<'_>, ctx: &mut Context<'_>) {
    if relation.referenced_fields().len() == 0 || ctx.has_errors() {
        return;
    }

    if ctx.has_capability(ConnectorCapability::RelationFieldsInArbitraryOrder) || !relation.is_compound() {
        return;
    }

    let reference_order_correct = relation.referenced_model().unique_criterias().any(|criteria| {
        let criteria_fields = criteria.fields();

        if criteria_fields.len() != relation.referenced_fields().len() {
            return false;
        }

        let references = relation.referenced_fields().map(|f| f.name());
        criteria_fields.map(|f| f.name()).zip(references).all(|(a, b)| a == b)
    });

    if reference_order_correct {
        return;
    }

    ctx.push_error(DatamodelError::new_validation_error(
        &format!(
            "The argument `references` must refer to a unique criteria in the related model `{}` using the same order of fields. Please check the ordering in the following fields: `{}`.",
            relation.referenced_model().name(),
            relation.referenced_fields().map(|f| f.name()).join(", ")
        ),
        relation.referencing_field().span(),
    ));
}

/// The scalar fields on both ends of the foreign key must be of the same type.
pub(super) fn referencing_scalar_field_types(relation: InlineRelation<'_>, ctx: &mut Context<'_>) {
    let forward = relation.forward_relation_field();

    let (Some(referencing), Some(referenced)) = (forward.referencing_fields(), forward.referenced_fields()) else {
        return;
    };

    for (referencing, referenced) in referencing.zip(referenced) {
        if referencing.scalar_field_type() == referenced.scalar_field_type() {
            continue;
        }

        let message = format!(
            "The type of the field `{}` in the model `{}` is not matching the type of the referenced field `{}` in model `{}`.",
            referencing.name(),
            referencing.model().name(),
            referenced.name(),
            referenced.model().name(),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            RELATION_ATTRIBUTE_NAME,
            forward.relation_attribute_span(),
        ));
    }
}

fn cycle_detection_enabled(ctx: &Context<'_>) -> bool {
    ctx.has_capability(ConnectorCapability::ReferenceCycleDetection) && ctx.relation_mode.uses_foreign_keys()
}

/// Detects cyclical cascading referential actions.
pub(super) fn cycles(relation: CompleteInlineRelation<'_>, ctx: &mut Context<'_>) {
    if !cycle_detection_enabled(ctx) {
        return;
    }

    let parent_model = relation.referencing_model();
    let mut next_relations = vec![(relation, Rc::new(VisitedRelation::root(relation)))];

    while let Some((next_relation, visited_relations)) = next_relations.pop() {
        // A cycle has a meaning only if every relation in it triggers
        // modifications in the children.
        if !next_relation.triggers_modification(ctx) {
            continue;
        }

        let model = next_relation.referencing_model();
        let related_model = next_relation.referenced_model();

        if model == related_model {
            // Only the self relation itself, not one further down the path.
            if next_relation.referencing_field() == relation.referencing_field() {
                let msg = "A self-relation must have `onDelete` and `onUpdate` referential actions set to `NoAction` in one of the @relation attributes.";
                let error = cascade_error_with_default_values(relation, msg, ctx);
                ctx.push_error(error);
                return;
            }

            continue;
        }

        if related_model == parent_model {
            let msg = format!(
                "Reference causes a cycle. One of the @relation attributes in this cycle must have `onDelete` and `onUpdate` referential actions set to `NoAction`. Cycle path: {visited_relations}."
            );

            let error = cascade_error_with_default_values(relation, &msg, ctx);
            ctx.push_error(error);
            return;
        }

        // Cycles not passing through the parent are reported from their own models.
        if visited_relations.passes_through(related_model) {
            continue;
        }

        for relation in forward_relations(related_model) {
            next_relations.push((relation, Rc::new(visited_relations.link_next(relation))));
        }
    }
}

/// Two cascading paths from one model must not reach the same model.
pub(super) fn multiple_cascading_paths(relation: CompleteInlineRelation<'_>, ctx: &mut Context<'_>) {
    if !cycle_detection_enabled(ctx) {
        return;
    }

    if !relation.triggers_modification(ctx) {
        return;
    }

    let parent_model = relation.referencing_model();

    // Gather all paths from this model to any other model, skipping cyclical
    // relations. Paths crossing but not starting from here are handled from
    // their own models.
    let mut paths = Vec::new();

    let mut next_relations: Vec<_> = forward_relations(parent_model)
        .filter(|relation| relation.triggers_modification(ctx))
        .map(|relation| (relation, Rc::new(VisitedRelation::root(relation))))
        .collect();

    while let Some((next_relation, visited_relations)) = next_relations.pop() {
        let model = next_relation.referencing_model();
        let related_model = next_relation.referenced_model();

        // Self-relations and cycles are detected elsewhere.
        if model == related_model || related_model == parent_model {
            continue;
        }

        let mut forward = forward_relations(related_model)
            .filter(|relation| relation.triggers_modification(ctx))
            .filter(|relation| !visited_relations.passes_through(relation.referenced_model()))
            .map(|relation| (relation, Rc::new(visited_relations.link_next(relation))))
            .peekable();

        // The end of the path, store it for later inspection.
        if forward.peek().is_none() {
            paths.push(visited_relations);
            continue;
        }

        next_relations.extend(forward);
    }

    // The models reachable from each relation field of the parent model.
    let mut seen: HashMap<&str, HashSet<&str>> = HashMap::new();

    for path in paths.iter() {
        let relations = path.relations();
        let Some(first) = relations.first() else { continue };

        let seen_models = seen.entry(first.referencing_field().name()).or_default();

        for relation in relations.iter() {
            seen_models.insert(relation.referenced_model().name());
        }
    }

    // The models reachable from the given relation field and from any other
    // relation field of the same model.
    let mut reachable: BTreeSet<&str> = BTreeSet::new();

    if let Some(from_parent) = seen.remove(relation.referencing_field().name()) {
        for (_, from_other) in seen.into_iter() {
            reachable.extend(from_parent.intersection(&from_other));
        }
    }

    let models = reachable.iter().map(|model_name| format!("`{model_name}`")).join(", ");

    let msg = match reachable.len() {
        0 => return,
        1 => format!(
            "When any of the records in model {} is updated or deleted, the referential actions on the relations cascade to model `{}` through multiple paths. Please break one of these paths by setting the `onUpdate` and `onDelete` to `NoAction`.",
            models,
            parent_model.name()
        ),
        _ => format!(
            "When any of the records in models {} are updated or deleted, the referential actions on the relations cascade to model `{}` through multiple paths. Please break one of these paths by setting the `onUpdate` and `onDelete` to `NoAction`.",
            models,
            parent_model.name()
        ),
    };

    let error = cascade_error_with_default_values(relation, &msg, ctx);
    ctx.push_error(error);
}

fn cascade_error_with_default_values(relation: CompleteInlineRelation<'_>, msg: &str, ctx: &Context<'_>) -> DatamodelError {
    let field = relation.referencing_field();

    let on_delete = match field.explicit_on_delete() {
        None if relation.on_delete(ctx).triggers_modification() => Some(relation.on_delete(ctx)),
        _ => None,
    };

    let on_update = match field.explicit_on_update() {
        None if relation.on_update().triggers_modification() => Some(relation.on_update()),
        _ => None,
    };

    let mut msg = match (on_delete, on_update) {
        (Some(on_delete), Some(on_update)) => {
            format!("{msg} (Implicit default `onDelete`: `{on_delete}`, and `onUpdate`: `{on_update}`)")
        }
        (Some(on_delete), None) => format!("{msg} (Implicit default `onDelete`: `{on_delete}`)"),
        (None, Some(on_update)) => format!("{msg} (Implicit default `onUpdate`: `{on_update}`)"),
        (None, None) => msg.to_string(),
    };

    msg.push_str(" Read more at https://pris.ly/d/cyclic-referential-actions");

    DatamodelError::new_validation_error(&msg, field.span())
}
