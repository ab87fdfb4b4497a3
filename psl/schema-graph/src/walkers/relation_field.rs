use crate::{
    RelationFieldId,
    nodes::RelationField,
    types::{FieldArity, ReferentialAction},
    walkers::{ModelWalker, RelationWalker, ScalarFieldWalker, Walker},
};
use diagnostics::Span;

/// A relation field on a model.
pub type RelationFieldWalker<'db> = Walker<'db, RelationFieldId>;

impl<'db> RelationFieldWalker<'db> {
    fn attributes(self) -> &'db RelationField {
        self.db.relation_field(self.id)
    }

    /// The field name.
    pub fn name(self) -> &'db str {
        &self.attributes().name
    }

    /// The span of the field.
    pub fn span(self) -> Span {
        self.attributes().span
    }

    /// The span of the `@relation` attribute, or of the field if there is none.
    pub fn relation_attribute_span(self) -> Span {
        self.attributes().relation_attribute.unwrap_or_else(|| self.span())
    }

    /// Is there an `@relation` attribute on the field?
    pub fn has_relation_attribute(self) -> bool {
        self.attributes().relation_attribute.is_some()
    }

    /// The arity of the field.
    pub fn arity(self) -> FieldArity {
        self.attributes().arity
    }

    /// Is the field optional?
    pub fn is_optional(self) -> bool {
        self.arity().is_optional()
    }

    /// Is the field a list?
    pub fn is_list(self) -> bool {
        self.arity().is_list()
    }

    /// Is the field required?
    pub fn is_required(self) -> bool {
        self.arity().is_required()
    }

    /// Is there an `@ignore` attribute on the field?
    pub fn is_ignored(self) -> bool {
        self.attributes().is_ignored
    }

    /// The model containing the field.
    pub fn model(self) -> ModelWalker<'db> {
        self.walk(self.attributes().model_id)
    }

    /// The model the field points to.
    pub fn related_model(self) -> ModelWalker<'db> {
        self.walk(self.attributes().referenced_model)
    }

    /// The relation name as written in `@relation("name")`.
    pub fn explicit_relation_name(self) -> Option<&'db str> {
        self.attributes().relation_name.as_deref()
    }

    /// The `map` argument of the `@relation` attribute: the foreign key name.
    pub fn mapped_name(self) -> Option<&'db str> {
        self.attributes().mapped_name.as_deref()
    }

    /// The `onDelete` argument, if explicitly set.
    pub fn explicit_on_delete(self) -> Option<ReferentialAction> {
        self.attributes().on_delete.map(|(action, _)| action)
    }

    /// The span of the `onDelete` argument.
    pub fn explicit_on_delete_span(self) -> Option<Span> {
        self.attributes().on_delete.map(|(_, span)| span)
    }

    /// The `onUpdate` argument, if explicitly set.
    pub fn explicit_on_update(self) -> Option<ReferentialAction> {
        self.attributes().on_update.map(|(action, _)| action)
    }

    /// The span of the `onUpdate` argument.
    pub fn explicit_on_update_span(self) -> Option<Span> {
        self.attributes().on_update.map(|(_, span)| span)
    }

    /// The `onDelete` action in effect: the explicit one, or the default
    /// derived from the optionality of the referencing fields.
    pub fn effective_on_delete(self) -> ReferentialAction {
        self.explicit_on_delete().unwrap_or_else(|| {
            let required = self.referencing_fields().is_some_and(|mut fields| fields.all(|f| !f.is_optional()));

            if required {
                ReferentialAction::Restrict
            } else {
                ReferentialAction::SetNull
            }
        })
    }

    /// The `onUpdate` action in effect.
    pub fn effective_on_update(self) -> ReferentialAction {
        self.explicit_on_update().unwrap_or(ReferentialAction::Cascade)
    }

    /// The fields in the `fields: [...]` argument of `@relation`.
    pub fn referencing_fields(self) -> Option<impl ExactSizeIterator<Item = ScalarFieldWalker<'db>> + Clone + 'db> {
        let db = self.db;
        self.attributes()
            .fields
            .as_ref()
            .map(move |fields| fields.iter().map(move |id| db.walk(*id)))
    }

    /// The fields in the `references: [...]` argument of `@relation`.
    pub fn referenced_fields(self) -> Option<impl ExactSizeIterator<Item = ScalarFieldWalker<'db>> + Clone + 'db> {
        let db = self.db;
        self.attributes()
            .references
            .as_ref()
            .map(move |fields| fields.iter().map(move |id| db.walk(*id)))
    }

    /// The relation this field is part of.
    pub fn relation(self) -> RelationWalker<'db> {
        self.walk(self.db.field_relations[self.id.idx()])
    }

    /// The other field of the relation, if the relation is defined on both sides.
    pub fn opposite_relation_field(self) -> Option<RelationFieldWalker<'db>> {
        let (a, b) = self.relation().fields();

        if a.id == self.id { b } else { Some(a) }
    }

    /// The relation name: explicit, or derived from the model names.
    pub fn relation_name(self) -> RelationName<'db> {
        self.relation().relation_name()
    }
}

/// The name of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationName<'db> {
    /// A relation name specified in the AST.
    Explicit(&'db str),
    /// An inferred relation name.
    Generated(&'db str, &'db str),
}

impl std::fmt::Display for RelationName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationName::Explicit(name) => f.write_str(name),
            RelationName::Generated(a, b) if a < b => write!(f, "{a}To{b}"),
            RelationName::Generated(a, b) => write!(f, "{b}To{a}"),
        }
    }
}
