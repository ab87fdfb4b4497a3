use crate::{
    CompositeTypeFieldId, CompositeTypeId, ScalarFieldType, ScalarType,
    nodes::{CompositeType, CompositeTypeField},
    types::{DefaultAttribute, FieldArity, RawNativeType},
    walkers::Walker,
};
use diagnostics::Span;

/// A composite type, introduced with the `type` keyword in the schema.
///
/// Example:
///
/// ```prisma
/// type Address {
///     name String?
///     streetName String
///     streetNumber Int
///     city String
///     zipCode Int
///     countryCode String
/// }
/// ```
pub type CompositeTypeWalker<'db> = Walker<'db, CompositeTypeId>;

/// A field in a composite type.
pub type CompositeTypeFieldWalker<'db> = Walker<'db, CompositeTypeFieldId>;

impl<'db> CompositeTypeWalker<'db> {
    fn node(self) -> &'db CompositeType {
        self.db.composite_type(self.id)
    }

    /// The name of the composite type in the schema.
    pub fn name(self) -> &'db str {
        &self.node().name
    }

    /// The span of the name.
    pub fn span(self) -> Span {
        self.node().span
    }

    /// Iterator over all the fields of the composite type.
    pub fn fields(
        self,
    ) -> impl ExactSizeIterator<Item = CompositeTypeFieldWalker<'db>> + DoubleEndedIterator + Clone + 'db {
        (0..self.node().fields.len()).map(move |idx| self.walk((self.id, idx)))
    }
}

impl<'db> CompositeTypeFieldWalker<'db> {
    fn field(self) -> &'db CompositeTypeField {
        &self.db.composite_type(self.id.0).fields[self.id.1]
    }

    /// The composite type containing the field.
    pub fn composite_type(self) -> CompositeTypeWalker<'db> {
        self.walk(self.id.0)
    }

    /// The name of the field.
    pub fn name(self) -> &'db str {
        &self.field().name
    }

    /// The span of the field.
    pub fn span(self) -> Span {
        self.field().span
    }

    /// The `@map` argument.
    pub fn mapped_name(self) -> Option<&'db str> {
        self.field().mapped_name.as_deref()
    }

    /// The name of the field in the database.
    pub fn database_name(self) -> &'db str {
        self.mapped_name().unwrap_or_else(|| self.name())
    }

    /// The arity of the field.
    pub fn arity(self) -> FieldArity {
        self.field().arity
    }

    /// The type of the field.
    pub fn r#type(self) -> ScalarFieldType {
        self.field().r#type
    }

    /// The type of the field in case it is a scalar type (not an enum, not a composite type).
    pub fn scalar_type(self) -> Option<ScalarType> {
        self.r#type().as_builtin_scalar()
    }

    /// The name inside `Unsupported("...")`.
    pub fn unsupported_type_name(self) -> Option<&'db str> {
        self.field().unsupported_type.as_deref()
    }

    /// The native type annotation, e.g. `@db.String`.
    pub fn raw_native_type(self) -> Option<&'db RawNativeType> {
        self.field().native_type.as_ref()
    }

    /// The `@default()` attribute of the field, if any.
    pub fn default_attribute(self) -> Option<&'db DefaultAttribute> {
        self.field().default.as_ref()
    }
}
