use crate::{
    SchemaGraph,
    types::FieldWithArgs,
    walkers::{IndexFieldWalker, ScalarFieldWalker},
};

/// Describes any unique criteria in a model. Can either be a primary
/// key, or a unique index.
#[derive(Copy, Clone)]
pub struct UniqueCriteriaWalker<'db> {
    pub(crate) fields: &'db [FieldWithArgs],
    pub(crate) db: &'db SchemaGraph,
}

impl<'db> UniqueCriteriaWalker<'db> {
    /// The fields of the criteria.
    pub fn fields(self) -> impl ExactSizeIterator<Item = IndexFieldWalker<'db>> + 'db {
        let db = self.db;
        self.fields
            .iter()
            .map(move |field| IndexFieldWalker::from_path(db, &field.path))
    }

    /// Required fields only, no unsupported types.
    pub fn is_strict_criteria(self) -> bool {
        !self.has_optional_fields() && !self.has_unsupported_fields()
    }

    pub(crate) fn has_optional_fields(self) -> bool {
        self.fields().any(|field| field.is_optional())
    }

    /// Does the criteria cover exactly the given fields, in that order?
    pub fn contains_exactly_fields(self, fields: impl ExactSizeIterator<Item = ScalarFieldWalker<'db>>) -> bool {
        if self.fields().len() != fields.len() {
            return false;
        }

        self.fields()
            .zip(fields)
            .all(|(left, right)| left.as_scalar_field() == Some(right))
    }

    /// Is one of the fields of an `Unsupported` type?
    pub fn has_unsupported_fields(self) -> bool {
        self.fields().any(|field| field.is_unsupported())
    }
}
