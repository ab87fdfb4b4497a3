use crate::{
    ModelId, SchemaGraph, ScalarFieldId,
    types::{FieldWithArgs, PrimaryKeyAttribute},
    walkers::{IndexFieldWalker, ModelWalker, ScalarFieldAttributeWalker, ScalarFieldWalker},
};
use diagnostics::Span;

/// An `@(@)id` attribute.
#[derive(Copy, Clone)]
pub struct PrimaryKeyWalker<'db> {
    pub(crate) model_id: ModelId,
    pub(crate) attribute: &'db PrimaryKeyAttribute,
    pub(crate) db: &'db SchemaGraph,
}

impl<'db> PrimaryKeyWalker<'db> {
    /// `@id` or `@@id`, depending on where the id is defined.
    pub fn attribute_name(self) -> &'static str {
        if self.is_defined_on_field() { "@id" } else { "@@id" }
    }

    /// The span of the attribute.
    pub fn span(self) -> Span {
        self.attribute.span
    }

    /// The `map` argument: the constraint name.
    pub fn mapped_name(self) -> Option<&'db str> {
        self.attribute.mapped_name.as_deref()
    }

    /// The `name` argument: the client name of the compound id.
    pub fn name(self) -> Option<&'db str> {
        self.attribute.name.as_deref()
    }

    /// The `clustered` argument.
    pub fn clustered(self) -> Option<bool> {
        self.attribute.clustered
    }

    /// Is the id defined with `@id` on a field?
    pub fn is_defined_on_field(self) -> bool {
        self.attribute.source_field.is_some()
    }

    /// The field carrying the `@id`, if it is defined on a field.
    pub fn source_field(self) -> Option<ScalarFieldWalker<'db>> {
        self.attribute.source_field.map(|id| self.db.walk(id))
    }

    /// The model the id is defined on.
    pub fn model(self) -> ModelWalker<'db> {
        self.db.walk(self.model_id)
    }

    /// The fields of the id.
    pub fn fields(self) -> impl ExactSizeIterator<Item = IndexFieldWalker<'db>> + Clone + 'db {
        let db = self.db;
        self.attribute
            .fields
            .iter()
            .map(move |field| IndexFieldWalker::from_path(db, &field.path))
    }

    /// The fields of the id, with their arguments.
    pub fn scalar_field_attributes(self) -> impl ExactSizeIterator<Item = ScalarFieldAttributeWalker<'db>> + 'db {
        let fields = self.fields_with_args();
        let db = self.db;

        (0..fields.len()).map(move |field_arg_id| ScalarFieldAttributeWalker {
            fields,
            db,
            field_arg_id,
        })
    }

    /// Is the id made of exactly the given fields, in that order?
    pub fn contains_exactly_fields_by_id(self, ids: &[ScalarFieldId]) -> bool {
        self.attribute.fields.len() == ids.len()
            && self
                .attribute
                .fields
                .iter()
                .zip(ids)
                .all(|(field, id)| field.path.path().is_empty() && field.path.root() == *id)
    }

    pub(crate) fn fields_with_args(self) -> &'db [FieldWithArgs] {
        &self.attribute.fields
    }
}
