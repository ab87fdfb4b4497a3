mod primary_key;
mod unique_criteria;

pub use primary_key::*;
pub use unique_criteria::*;

use super::{IndexWalker, RelationFieldWalker, ScalarFieldWalker, Walker};
use crate::{ModelId, ScalarFieldId, nodes::Model};
use diagnostics::Span;

/// A `model` or `view` declaration.
pub type ModelWalker<'db> = Walker<'db, ModelId>;

impl<'db> ModelWalker<'db> {
    fn node(self) -> &'db Model {
        self.db.model(self.id)
    }

    /// The name of the model.
    pub fn name(self) -> &'db str {
        &self.node().name
    }

    /// The span of the model name.
    pub fn span(self) -> Span {
        self.node().span
    }

    /// The `@@map` argument, if any.
    pub fn mapped_name(self) -> Option<&'db str> {
        self.node().mapped_name.as_deref()
    }

    /// The name of the table in the database. See crate docs for explanations on database names.
    pub fn database_name(self) -> &'db str {
        self.mapped_name().unwrap_or_else(|| self.name())
    }

    /// The `@@schema` argument and its span, if any.
    pub fn schema(self) -> Option<(&'db str, Span)> {
        self.node().schema.as_ref().map(|(name, span)| (name.as_str(), *span))
    }

    /// The name of the schema the model lives in, if explicitly set.
    pub fn schema_name(self) -> Option<&'db str> {
        self.schema().map(|(name, _)| name)
    }

    /// Is this a `view` rather than a `model`?
    pub fn is_view(self) -> bool {
        self.node().is_view
    }

    /// `model` or `view`, for error messages.
    pub fn block_type(self) -> &'static str {
        if self.is_view() { "view" } else { "model" }
    }

    /// Is the model `@@ignore`d?
    pub fn is_ignored(self) -> bool {
        self.node().is_ignored
    }

    /// The `///` comment on the model.
    pub fn documentation(self) -> Option<&'db str> {
        self.node().documentation.as_deref()
    }

    /// The scalar fields of the model, in declaration order.
    pub fn scalar_fields(self) -> impl ExactSizeIterator<Item = ScalarFieldWalker<'db>> + Clone + 'db {
        self.node().scalar_fields.iter().map(move |id| self.walk(*id))
    }

    /// The relation fields of the model, in declaration order.
    pub fn relation_fields(self) -> impl ExactSizeIterator<Item = RelationFieldWalker<'db>> + Clone + 'db {
        self.node().relation_fields.iter().map(move |id| self.walk(*id))
    }

    /// Does the model have any field at all?
    pub fn has_fields(self) -> bool {
        self.scalar_fields().len() + self.relation_fields().len() > 0
    }

    /// Find a scalar field by name.
    pub fn find_scalar_field(self, name: &str) -> Option<ScalarFieldWalker<'db>> {
        self.scalar_fields().find(|f| f.name() == name)
    }

    /// The `@id` or `@@id` of the model, if any.
    pub fn primary_key(self) -> Option<PrimaryKeyWalker<'db>> {
        self.node().primary_key.as_ref().map(|attribute| PrimaryKeyWalker {
            model_id: self.id,
            attribute,
            db: self.db,
        })
    }

    /// The indexes, unique and fulltext attributes of the model, field-level
    /// ones first.
    pub fn indexes(self) -> impl ExactSizeIterator<Item = IndexWalker<'db>> + Clone + 'db {
        let db = self.db;
        let model_id = self.id;

        self.node()
            .indexes
            .iter()
            .enumerate()
            .map(move |(position, index_attribute)| IndexWalker {
                model_id,
                position,
                db,
                index_attribute,
            })
    }

    /// Is the given field the only field of the primary key?
    pub fn field_is_single_pk(self, field: ScalarFieldId) -> bool {
        self.primary_key()
            .filter(|pk| pk.fields().len() == 1)
            .is_some_and(|pk| pk.contains_exactly_fields_by_id(&[field]))
    }

    /// Is the given field part of a primary key with more than one field?
    pub fn field_is_part_of_a_compound_pk(self, field: ScalarFieldId) -> bool {
        self.primary_key()
            .filter(|pk| pk.fields().len() > 1)
            .is_some_and(|pk| pk.fields().any(|f| f.as_scalar_field().map(|f| f.id) == Some(field)))
    }

    /// The primary key and the unique indexes of the model, strict ones only:
    /// no optional and no unsupported fields.
    pub fn required_unique_criterias(self) -> impl Iterator<Item = UniqueCriteriaWalker<'db>> + 'db {
        self.unique_criterias().filter(|c| c.is_strict_criteria())
    }

    /// The primary key and the unique indexes of the model.
    pub fn unique_criterias(self) -> impl Iterator<Item = UniqueCriteriaWalker<'db>> + 'db {
        let db = self.db;

        let from_pk = self
            .primary_key()
            .into_iter()
            .map(move |pk| UniqueCriteriaWalker { fields: pk.fields_with_args(), db });

        let from_indexes = self
            .indexes()
            .filter(|idx| idx.is_unique())
            .map(move |idx| UniqueCriteriaWalker {
                fields: idx.fields_with_args(),
                db,
            });

        from_pk.chain(from_indexes)
    }
}
