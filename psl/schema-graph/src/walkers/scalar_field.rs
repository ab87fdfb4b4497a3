use crate::{
    ScalarFieldId, ScalarFieldType, ScalarType, SchemaGraph,
    nodes::ScalarField,
    types::{DefaultAttribute, Expression, FieldArity, RawNativeType},
    walkers::*,
};
use diagnostics::Span;

/// A scalar field, as part of a model.
pub type ScalarFieldWalker<'db> = Walker<'db, ScalarFieldId>;

impl<'db> ScalarFieldWalker<'db> {
    fn attributes(self) -> &'db ScalarField {
        self.db.scalar_field(self.id)
    }

    /// The name of the field.
    pub fn name(self) -> &'db str {
        &self.attributes().name
    }

    /// The span of the field.
    pub fn span(self) -> Span {
        self.attributes().span
    }

    /// The name in the `@map(<name>)` attribute.
    pub fn mapped_name(self) -> Option<&'db str> {
        self.attributes().mapped_name.as_deref()
    }

    /// The final database name of the field. See crate docs for explanations on database names.
    pub fn database_name(self) -> &'db str {
        self.mapped_name().unwrap_or_else(|| self.name())
    }

    /// The model that contains the field.
    pub fn model(self) -> ModelWalker<'db> {
        self.walk(self.attributes().model_id)
    }

    /// Is this field unique? This method will return true if:
    ///
    /// - The field has an `@id` or `@unique` attribute.
    /// - There is an `@@id` or `@@unique` on the model that contains __only__ this field.
    pub fn is_unique(self) -> bool {
        let model = self.model();

        if model.field_is_single_pk(self.id) {
            return true;
        }

        model.indexes().any(|idx| {
            let mut fields = idx.fields();
            idx.is_unique() && fields.len() == 1 && fields.next().and_then(|f| f.as_scalar_field()) == Some(self)
        })
    }

    /// Does the field have an `@default(autoincrement())` attribute?
    pub fn is_autoincrement(self) -> bool {
        self.default_value().is_some_and(|dv| dv.is_autoincrement())
    }

    /// Does the field define a primary key by its own.
    pub fn is_single_pk(self) -> bool {
        self.model().field_is_single_pk(self.id)
    }

    /// Is the field part of a compound primary key.
    pub fn is_part_of_a_compound_pk(self) -> bool {
        self.model().field_is_part_of_a_compound_pk(self.id)
    }

    /// Is there an `@ignore` attribute on the field?
    pub fn is_ignored(self) -> bool {
        self.attributes().is_ignored
    }

    /// The arity of the field.
    pub fn arity(self) -> FieldArity {
        self.attributes().arity
    }

    /// Is the field optional / nullable?
    pub fn is_optional(self) -> bool {
        self.arity().is_optional()
    }

    /// Is the field a list
    pub fn is_list(self) -> bool {
        self.arity().is_list()
    }

    /// Is there an `@updatedAt` attribute on the field?
    pub fn is_updated_at(self) -> bool {
        self.attributes().is_updated_at
    }

    /// Is this field's type an enum? If yes, walk the enum.
    pub fn field_type_as_enum(self) -> Option<EnumWalker<'db>> {
        self.scalar_field_type().as_enum().map(|id| self.db.walk(id))
    }

    /// Is this field's type a composite type? If yes, walk the composite type.
    pub fn field_type_as_composite_type(self) -> Option<CompositeTypeWalker<'db>> {
        self.scalar_field_type().as_composite_type().map(|id| self.db.walk(id))
    }

    /// The native type annotation, e.g. `@db.VarChar(10)`.
    pub fn raw_native_type(self) -> Option<&'db RawNativeType> {
        self.attributes().native_type.as_ref()
    }

    /// Is the type of the field `Unsupported("...")`?
    pub fn is_unsupported(self) -> bool {
        self.scalar_field_type().is_unsupported()
    }

    /// The name inside `Unsupported("...")`.
    pub fn unsupported_type_name(self) -> Option<&'db str> {
        self.attributes().unsupported_type.as_deref()
    }

    /// The `@default()` attribute of the field, if any.
    pub fn default_value(self) -> Option<DefaultValueWalker<'db>> {
        self.attributes().default.as_ref().map(|default| DefaultValueWalker {
            field_id: self.id,
            db: self.db,
            default,
        })
    }

    /// The type of the field.
    pub fn scalar_field_type(self) -> ScalarFieldType {
        self.attributes().r#type
    }

    /// The type of the field in case it is a scalar type (not an enum, not a composite type).
    pub fn scalar_type(self) -> Option<ScalarType> {
        self.scalar_field_type().as_builtin_scalar()
    }

    /// The type name as written in the schema.
    pub fn type_name(self) -> &'db str {
        match self.scalar_field_type() {
            ScalarFieldType::BuiltInScalar(st) => st.as_str(),
            ScalarFieldType::Enum(id) => self.db.walk(id).name(),
            ScalarFieldType::CompositeType(id) => self.db.walk(id).name(),
            ScalarFieldType::Unsupported => "Unsupported",
        }
    }
}

/// An `@default()` attribute on a field.
#[derive(Clone, Copy)]
pub struct DefaultValueWalker<'db> {
    pub(super) field_id: ScalarFieldId,
    pub(super) db: &'db SchemaGraph,
    pub(super) default: &'db DefaultAttribute,
}

impl<'db> DefaultValueWalker<'db> {
    /// The value expression in the `@default` attribute.
    ///
    /// ```ignore
    /// score Int @default(0)
    ///                    ^
    /// ```
    pub fn value(self) -> &'db Expression {
        &self.default.value
    }

    /// The span of the attribute.
    pub fn span(self) -> Span {
        self.default.span
    }

    fn is_function(self, expected: &str) -> bool {
        matches!(self.value(), Expression::Function(name, _, _) if name == expected)
    }

    /// Is this an `@default(autoincrement())`?
    pub fn is_autoincrement(self) -> bool {
        self.is_function("autoincrement")
    }

    /// Is this an `@default(dbgenerated())`?
    pub fn is_dbgenerated(self) -> bool {
        self.is_function("dbgenerated")
    }

    /// Is this an `@default(auto())`?
    pub fn is_auto(self) -> bool {
        self.is_function("auto")
    }

    /// Is this an `@default(now())`?
    pub fn is_now(self) -> bool {
        self.is_function("now")
    }

    /// Is this an `@default(sequence())`?
    pub fn is_sequence(self) -> bool {
        self.is_function("sequence")
    }

    /// The mapped name of the default value. Not applicable to all connectors.
    ///
    /// ```ignore
    /// name String @default("george", map: "name_default_to_george")
    ///                                     ^^^^^^^^^^^^^^^^^^^^^^^^
    /// ```
    pub fn mapped_name(self) -> Option<&'db str> {
        self.default.mapped_name.as_deref()
    }

    /// The field carrying the default attribute.
    pub fn field(self) -> ScalarFieldWalker<'db> {
        self.db.walk(self.field_id)
    }
}
