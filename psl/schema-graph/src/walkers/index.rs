use either::Either;

use super::{CompositeTypeFieldWalker, ModelWalker, ScalarFieldWalker};
use crate::{
    IndexId, ModelId, ScalarFieldType, SchemaGraph,
    types::{FieldWithArgs, IndexAlgorithm, IndexAttribute, IndexFieldPath, IndexType, RawNativeType, SortOrder},
};
use diagnostics::Span;

/// An index, unique or fulltext attribute.
#[derive(Copy, Clone)]
pub struct IndexWalker<'db> {
    pub(crate) model_id: ModelId,
    pub(crate) position: usize,
    pub(crate) db: &'db SchemaGraph,
    pub(crate) index_attribute: &'db IndexAttribute,
}

impl<'db> IndexWalker<'db> {
    /// The id of the index: its model and position.
    pub fn id(self) -> IndexId {
        (self.model_id, self.position)
    }

    /// The mapped name of the index.
    ///
    /// ```ignore
    /// @@index([a, b], map: "theName")
    ///                      ^^^^^^^^^
    /// ```
    pub fn mapped_name(self) -> Option<&'db str> {
        self.index_attribute.mapped_name.as_deref()
    }

    /// The attribute name: `"@unique"` for a field-level unique, `"@@unique"`,
    /// `"@@fulltext"` and `"@@index"` otherwise.
    pub fn attribute_name(self) -> &'static str {
        if self.is_unique() && self.is_defined_on_field() {
            "@unique"
        } else if self.is_unique() {
            "@@unique"
        } else if self.is_fulltext() {
            "@@fulltext"
        } else {
            "@@index"
        }
    }

    /// The index type.
    pub fn index_type(self) -> IndexType {
        self.index_attribute.r#type
    }

    /// The `name` argument of the index attribute. The client name.
    ///
    /// ```ignore
    /// @@unique([a, b], name: "theName")
    ///                        ^^^^^^^^^
    /// ```
    pub fn name(self) -> Option<&'db str> {
        self.index_attribute.name.as_deref()
    }

    /// The index algorithm, if a specific one was specified for the index.
    pub fn algorithm(self) -> Option<IndexAlgorithm> {
        self.index_attribute.algorithm
    }

    /// The span of the attribute.
    pub fn span(self) -> Span {
        self.index_attribute.span
    }

    /// The fields covered by the index.
    pub fn fields(self) -> impl ExactSizeIterator<Item = IndexFieldWalker<'db>> + Clone + 'db {
        let db = self.db;
        self.index_attribute
            .fields
            .iter()
            .map(move |field| IndexFieldWalker::from_path(db, &field.path))
    }

    /// The fields covered by the index, and their arguments.
    pub fn scalar_field_attributes(self) -> impl ExactSizeIterator<Item = ScalarFieldAttributeWalker<'db>> + 'db {
        let fields = self.fields_with_args();
        let db = self.db;

        (0..fields.len()).map(move |field_arg_id| ScalarFieldAttributeWalker {
            fields,
            db,
            field_arg_id,
        })
    }

    /// True, if given field is a part of the indexed fields.
    pub fn contains_field(self, field: ScalarFieldWalker<'db>) -> bool {
        self.fields().filter_map(|f| f.as_scalar_field()).any(|f| f == field)
    }

    /// True if the index contains exactly the same fields in the same order,
    /// and with the same attributes.
    pub fn contains_exactly_the_fields(
        self,
        fields: impl ExactSizeIterator<Item = ScalarFieldAttributeWalker<'db>>,
    ) -> bool {
        if self.scalar_field_attributes().len() != fields.len() {
            return false;
        }

        self.scalar_field_attributes().zip(fields).all(|(a, b)| {
            let same_attributes = a.sort_order() == b.sort_order() && a.length() == b.length();
            let same_path = a.as_path_to_indexed_field() == b.as_path_to_indexed_field();

            same_path && same_attributes
        })
    }

    /// Whether the index is defined on a single field (otherwise: on the model).
    pub fn is_defined_on_field(self) -> bool {
        self.index_attribute.source_field.is_some()
    }

    /// Is this an `@@unique`?
    pub fn is_unique(self) -> bool {
        self.index_attribute.is_unique()
    }

    /// Is this a `@@fulltext`?
    pub fn is_fulltext(self) -> bool {
        self.index_attribute.is_fulltext()
    }

    /// Is this an `@@index`?
    pub fn is_normal(self) -> bool {
        self.index_attribute.is_normal()
    }

    /// If true, the index defines the storage and ordering of the row. Mostly
    /// matters on SQL Server where one can change the clustering.
    pub fn clustered(self) -> Option<bool> {
        self.index_attribute.clustered
    }

    /// The model the index is defined on.
    pub fn model(self) -> ModelWalker<'db> {
        self.db.walk(self.model_id)
    }

    /// The field the index was defined on, if any.
    pub fn source_field(self) -> Option<ScalarFieldWalker<'db>> {
        self.index_attribute.source_field.map(|field_id| self.db.walk(field_id))
    }

    pub(crate) fn fields_with_args(self) -> &'db [FieldWithArgs] {
        &self.index_attribute.fields
    }
}

impl<'db> From<ScalarFieldWalker<'db>> for IndexFieldWalker<'db> {
    fn from(sf: ScalarFieldWalker<'db>) -> Self {
        Self::Scalar(sf)
    }
}

impl<'db> From<CompositeTypeFieldWalker<'db>> for IndexFieldWalker<'db> {
    fn from(cf: CompositeTypeFieldWalker<'db>) -> Self {
        Self::Composite(cf)
    }
}

/// A field in an index definition. It can point to a scalar field in the
/// current model, or through embedding a field in a composite type.
#[derive(Copy, Clone, PartialEq)]
pub enum IndexFieldWalker<'db> {
    /// A field on a model.
    Scalar(ScalarFieldWalker<'db>),
    /// The path to a field in a composite type.
    Composite(CompositeTypeFieldWalker<'db>),
}

impl<'db> IndexFieldWalker<'db> {
    pub(crate) fn from_path(db: &'db SchemaGraph, path: &IndexFieldPath) -> Self {
        match path.field_in_index() {
            Either::Left(id) => IndexFieldWalker::Scalar(db.walk(id)),
            Either::Right(id) => IndexFieldWalker::Composite(db.walk(id)),
        }
    }

    /// Is the field optional / nullable?
    pub fn is_optional(self) -> bool {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.is_optional(),
            IndexFieldWalker::Composite(cf) => cf.arity().is_optional(),
        }
    }

    /// Is the field a list?
    pub fn is_list(self) -> bool {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.is_list(),
            IndexFieldWalker::Composite(cf) => cf.arity().is_list(),
        }
    }

    /// Is the type of the field `Unsupported("...")`?
    pub fn is_unsupported(self) -> bool {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.is_unsupported(),
            IndexFieldWalker::Composite(cf) => cf.r#type().is_unsupported(),
        }
    }

    /// The name of the field.
    pub fn name(self) -> &'db str {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.name(),
            IndexFieldWalker::Composite(cf) => cf.name(),
        }
    }

    /// The final database name of the field. See crate docs for explanations on database names.
    pub fn database_name(self) -> &'db str {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.database_name(),
            IndexFieldWalker::Composite(cf) => cf.database_name(),
        }
    }

    /// The type of the field.
    pub fn scalar_field_type(self) -> ScalarFieldType {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.scalar_field_type(),
            IndexFieldWalker::Composite(cf) => cf.r#type(),
        }
    }

    /// Convert the walker to a scalar field, if the underlying field is in a
    /// model.
    pub fn as_scalar_field(self) -> Option<ScalarFieldWalker<'db>> {
        match self {
            IndexFieldWalker::Scalar(sf) => Some(sf),
            IndexFieldWalker::Composite(_) => None,
        }
    }

    /// Convert the walker to a composite field, if the underlying field is in a
    /// composite type.
    pub fn as_composite_field(self) -> Option<CompositeTypeFieldWalker<'db>> {
        match self {
            IndexFieldWalker::Scalar(_) => None,
            IndexFieldWalker::Composite(cf) => Some(cf),
        }
    }

    /// True if the index field is a composite field.
    pub fn is_composite_field(self) -> bool {
        matches!(self, IndexFieldWalker::Composite(_))
    }

    /// Does the field define a primary key by its own.
    pub fn is_single_pk(self) -> bool {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.is_single_pk(),
            IndexFieldWalker::Composite(_) => false,
        }
    }

    /// The native type annotation on the field, if any.
    pub fn raw_native_type(self) -> Option<&'db RawNativeType> {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.raw_native_type(),
            IndexFieldWalker::Composite(cf) => cf.raw_native_type(),
        }
    }

    /// The span of the field.
    pub fn span(self) -> Span {
        match self {
            IndexFieldWalker::Scalar(sf) => sf.span(),
            IndexFieldWalker::Composite(cf) => cf.span(),
        }
    }
}

/// A field as referenced in a key specification (id, index or unique), with
/// its arguments.
#[derive(Copy, Clone)]
pub struct ScalarFieldAttributeWalker<'db> {
    pub(crate) fields: &'db [FieldWithArgs],
    pub(crate) db: &'db SchemaGraph,
    pub(crate) field_arg_id: usize,
}

impl<'db> ScalarFieldAttributeWalker<'db> {
    fn args(self) -> &'db FieldWithArgs {
        &self.fields[self.field_arg_id]
    }

    /// The length argument on the field.
    ///
    /// ```ignore
    /// @@index(name(length: 10))
    ///                      ^^
    /// ```
    pub fn length(self) -> Option<u32> {
        self.args().length
    }

    /// The sort order (asc or desc) on the field.
    ///
    /// ```ignore
    /// @@index(name(sort: Desc))
    ///                    ^^^^
    /// ```
    pub fn sort_order(self) -> Option<SortOrder> {
        self.args().sort_order
    }

    /// The underlying field.
    pub fn as_index_field(self) -> IndexFieldWalker<'db> {
        IndexFieldWalker::from_path(self.db, &self.args().path)
    }

    /// Gives the full path from the current model to the field included in the index.
    /// For `@@index([b.a.field])`, through two composite types, the path is:
    ///
    /// ```ignore
    /// vec![("b", None), ("a", Some("B")), ("field", Some("A"))];
    /// ```
    ///
    /// The first part of the tuple is the name of the field, the second part is
    /// the name of the composite type.
    pub fn as_path_to_indexed_field(self) -> Vec<(&'db str, Option<&'db str>)> {
        let path = &self.args().path;
        let root_name = self.db.walk(path.root()).name();
        let mut result = vec![(root_name, None)];

        for id in path.path() {
            let field = self.db.walk(*id);
            result.push((field.name(), Some(field.composite_type().name())));
        }

        result
    }

    /// Same as [`as_path_to_indexed_field`](Self::as_path_to_indexed_field),
    /// with the database names of the fields.
    pub fn as_mapped_path_to_indexed_field(self) -> Vec<(&'db str, Option<&'db str>)> {
        let path = &self.args().path;
        let root_name = self.db.walk(path.root()).database_name();
        let mut result = vec![(root_name, None)];

        for id in path.path() {
            let field = self.db.walk(*id);
            result.push((field.database_name(), Some(field.composite_type().name())));
        }

        result
    }
}
