use crate::{CompositeTypeFieldId, CompositeTypeId, EnumId, ScalarFieldId};
use diagnostics::Span;
use either::Either;
use enumflags2::bitflags;
use std::fmt;

/// The built-in scalar types of the schema language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    Int,
    BigInt,
    Float,
    Boolean,
    String,
    DateTime,
    Json,
    Bytes,
    Decimal,
}

impl ScalarType {
    pub const ALL: &'static [ScalarType] = &[
        ScalarType::Int,
        ScalarType::BigInt,
        ScalarType::Float,
        ScalarType::Boolean,
        ScalarType::String,
        ScalarType::DateTime,
        ScalarType::Json,
        ScalarType::Bytes,
        ScalarType::Decimal,
    ];

    /// The string representation of the scalar type in the schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Int => "Int",
            ScalarType::BigInt => "BigInt",
            ScalarType::Float => "Float",
            ScalarType::Boolean => "Boolean",
            ScalarType::String => "String",
            ScalarType::DateTime => "DateTime",
            ScalarType::Json => "Json",
            ScalarType::Bytes => "Bytes",
            ScalarType::Decimal => "Decimal",
        }
    }

    pub fn try_from_str(s: &str) -> Option<ScalarType> {
        ScalarType::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    pub fn is_json(self) -> bool {
        matches!(self, ScalarType::Json)
    }

    pub fn is_string(self) -> bool {
        matches!(self, ScalarType::String)
    }

    pub fn is_bytes(self) -> bool {
        matches!(self, ScalarType::Bytes)
    }

    pub fn is_int(self) -> bool {
        matches!(self, ScalarType::Int)
    }

    pub fn is_bigint(self) -> bool {
        matches!(self, ScalarType::BigInt)
    }

    pub fn is_decimal(self) -> bool {
        matches!(self, ScalarType::Decimal)
    }

    pub fn is_datetime(self) -> bool {
        matches!(self, ScalarType::DateTime)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a field is required, optional or a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldArity {
    Required,
    Optional,
    List,
}

impl FieldArity {
    pub fn is_list(self) -> bool {
        matches!(self, FieldArity::List)
    }

    pub fn is_optional(self) -> bool {
        matches!(self, FieldArity::Optional)
    }

    pub fn is_required(self) -> bool {
        matches!(self, FieldArity::Required)
    }
}

/// The type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarFieldType {
    /// A composite type
    CompositeType(CompositeTypeId),
    /// An enum
    Enum(EnumId),
    /// A Prisma scalar type
    BuiltInScalar(ScalarType),
    /// An `Unsupported("...")` type. The name lives on the field.
    Unsupported,
}

impl ScalarFieldType {
    /// Try to interpret this field type as a known Prisma scalar type.
    pub fn as_builtin_scalar(self) -> Option<ScalarType> {
        match self {
            ScalarFieldType::BuiltInScalar(s) => Some(s),
            _ => None,
        }
    }

    /// Try to interpret this field type as a Composite Type.
    pub fn as_composite_type(self) -> Option<CompositeTypeId> {
        match self {
            ScalarFieldType::CompositeType(id) => Some(id),
            _ => None,
        }
    }

    /// Try to interpret this field type as an enum.
    pub fn as_enum(self) -> Option<EnumId> {
        match self {
            ScalarFieldType::Enum(id) => Some(id),
            _ => None,
        }
    }

    /// Is the type of the field `Unsupported("...")`?
    pub fn is_unsupported(self) -> bool {
        matches!(self, Self::Unsupported)
    }

    /// True if the field's type is Json.
    pub fn is_json(self) -> bool {
        matches!(self, Self::BuiltInScalar(ScalarType::Json))
    }

    /// True if the field's type is String.
    pub fn is_string(self) -> bool {
        matches!(self, Self::BuiltInScalar(ScalarType::String))
    }

    /// True if the field's type is Bytes.
    pub fn is_bytes(self) -> bool {
        matches!(self, Self::BuiltInScalar(ScalarType::Bytes))
    }
}

/// The referential actions that can be set on `onDelete` and `onUpdate`.
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferentialAction {
    /// Deletes record if dependent record is deleted. Updates relation scalar
    /// fields if referenced scalar fields of the dependent record are updated.
    Cascade,
    /// Prevents operations from succeeding if a record is still referenced.
    Restrict,
    /// Like `Restrict`, but checked at the end of the transaction on some
    /// databases.
    NoAction,
    /// Sets relation scalar fields to null if the relation is deleted or
    /// updated. Only usable on optional fields.
    SetNull,
    /// Sets relation scalar fields to their default values on update or
    /// delete of relation.
    SetDefault,
}

impl ReferentialAction {
    /// True if the action modifies the related items.
    pub fn triggers_modification(self) -> bool {
        !matches!(self, Self::NoAction | Self::Restrict)
    }

    /// The string representation of the referential action in the schema.
    pub fn as_str(self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "Cascade",
            ReferentialAction::Restrict => "Restrict",
            ReferentialAction::NoAction => "NoAction",
            ReferentialAction::SetNull => "SetNull",
            ReferentialAction::SetDefault => "SetDefault",
        }
    }

    pub fn try_from_str(s: &str) -> Option<ReferentialAction> {
        match s {
            "Cascade" => Some(ReferentialAction::Cascade),
            "Restrict" => Some(ReferentialAction::Restrict),
            "NoAction" => Some(ReferentialAction::NoAction),
            "SetNull" => Some(ReferentialAction::SetNull),
            "SetDefault" => Some(ReferentialAction::SetDefault),
            _ => None,
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The index algorithm (`type:` argument of `@@index`).
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexAlgorithm {
    /// Binary tree index (the default in most databases).
    BTree,
    /// Hash index.
    Hash,
    /// GiST index.
    Gist,
    /// GIN index.
    Gin,
    /// SP-GiST index.
    SpGist,
    /// BRIN index.
    Brin,
}

impl IndexAlgorithm {
    /// Is this an index algorithm that stores its values in order.
    pub fn supports_sort_order(self) -> bool {
        matches!(self, IndexAlgorithm::BTree)
    }
}

impl fmt::Display for IndexAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndexAlgorithm::BTree => "BTree",
            IndexAlgorithm::Hash => "Hash",
            IndexAlgorithm::Gist => "Gist",
            IndexAlgorithm::Gin => "Gin",
            IndexAlgorithm::SpGist => "SpGist",
            IndexAlgorithm::Brin => "Brin",
        };

        f.write_str(s)
    }
}

/// The kind of an index attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// `@@index`
    Normal,
    /// `@unique` or `@@unique`
    Unique,
    /// `@@fulltext`
    Fulltext,
}

/// The sort order of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A value as it appears in attribute arguments and configuration blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Any string value.
    StringValue(String, Span),
    /// Any numeric value, kept in its textual form.
    NumericValue(String, Span),
    /// An identifier: `true`, `false` or an enum value.
    ConstantValue(String, Span),
    /// A function call with its arguments.
    Function(String, Vec<Expression>, Span),
    /// An array of values.
    Array(Vec<Expression>, Span),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::StringValue(_, span)
            | Expression::NumericValue(_, span)
            | Expression::ConstantValue(_, span)
            | Expression::Function(_, _, span)
            | Expression::Array(_, span) => *span,
        }
    }

    pub fn as_string_value(&self) -> Option<(&str, Span)> {
        match self {
            Expression::StringValue(s, span) => Some((s, *span)),
            _ => None,
        }
    }

    pub fn as_numeric_value(&self) -> Option<(&str, Span)> {
        match self {
            Expression::NumericValue(s, span) => Some((s, *span)),
            _ => None,
        }
    }

    pub fn as_constant_value(&self) -> Option<(&str, Span)> {
        match self {
            Expression::ConstantValue(s, span) => Some((s, *span)),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<(&str, &[Expression], Span)> {
        match self {
            Expression::Function(name, args, span) => Some((name, args, *span)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<(&[Expression], Span)> {
        match self {
            Expression::Array(values, span) => Some((values, *span)),
            _ => None,
        }
    }

    /// `env("SOME_VAR")`
    pub fn is_env_expression(&self) -> bool {
        matches!(self, Expression::Function(name, _, _) if name == "env")
    }

    /// A name for the kind of value, for error messages.
    pub fn describe_value_type(&self) -> &'static str {
        match self {
            Expression::StringValue(..) => "string",
            Expression::NumericValue(..) => "numeric",
            Expression::ConstantValue(..) => "literal",
            Expression::Function(..) => "functional",
            Expression::Array(..) => "array",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::StringValue(s, _) => write!(f, "\"{s}\""),
            Expression::NumericValue(s, _) | Expression::ConstantValue(s, _) => f.write_str(s),
            Expression::Function(name, args, _) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expression::Array(values, _) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A `key = value` line in a datasource or generator block.
#[derive(Debug, Clone)]
pub struct ConfigBlockProperty {
    pub name: String,
    pub value: Expression,
    pub span: Span,
}

/// A `datasource` or `generator` block.
#[derive(Debug, Clone)]
pub struct ConfigBlock {
    pub name: String,
    pub properties: Vec<ConfigBlockProperty>,
    pub documentation: Option<String>,
    pub span: Span,
}

/// A native type annotation as written on the field: `@db.VarChar(10)`.
#[derive(Debug, Clone)]
pub struct RawNativeType {
    /// The datasource name in front of the type (`db`).
    pub scope: String,
    pub name: String,
    pub args: Vec<String>,
    pub span: Span,
}

/// The `@default(...)` attribute of a field.
#[derive(Debug, Clone)]
pub struct DefaultAttribute {
    pub value: Expression,
    /// The `map:` argument, naming the default constraint.
    pub mapped_name: Option<String>,
    pub span: Span,
}

/// The path from a model to a field in an index. Either a scalar field of
/// the model, or a field nested in composite types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFieldPath {
    pub(crate) root: ScalarFieldId,
    pub(crate) path: Vec<CompositeTypeFieldId>,
}

impl IndexFieldPath {
    pub(crate) fn new(root: ScalarFieldId) -> Self {
        Self { root, path: Vec::new() }
    }

    /// The model field the path starts from.
    pub fn root(&self) -> ScalarFieldId {
        self.root
    }

    /// The composite type fields walked after the root.
    pub fn path(&self) -> &[CompositeTypeFieldId] {
        &self.path
    }

    /// The field the index actually covers.
    pub fn field_in_index(&self) -> Either<ScalarFieldId, CompositeTypeFieldId> {
        self.path.last().map(|id| Either::Right(*id)).unwrap_or(Either::Left(self.root))
    }
}

/// A field in an index or id definition, with its arguments.
#[derive(Debug, Clone)]
pub struct FieldWithArgs {
    pub(crate) path: IndexFieldPath,
    pub(crate) sort_order: Option<SortOrder>,
    pub(crate) length: Option<u32>,
}

/// An `@@index`, `@@unique`, `@unique` or `@@fulltext` attribute.
#[derive(Debug, Clone)]
pub struct IndexAttribute {
    pub(crate) r#type: IndexType,
    pub(crate) fields: Vec<FieldWithArgs>,
    pub(crate) source_field: Option<ScalarFieldId>,
    pub(crate) name: Option<String>,
    pub(crate) mapped_name: Option<String>,
    pub(crate) algorithm: Option<IndexAlgorithm>,
    pub(crate) clustered: Option<bool>,
    pub(crate) span: Span,
}

impl IndexAttribute {
    pub(crate) fn is_unique(&self) -> bool {
        matches!(self.r#type, IndexType::Unique)
    }

    pub(crate) fn is_fulltext(&self) -> bool {
        matches!(self.r#type, IndexType::Fulltext)
    }

    pub(crate) fn is_normal(&self) -> bool {
        matches!(self.r#type, IndexType::Normal)
    }
}

/// An `@id` or `@@id` attribute.
#[derive(Debug, Clone)]
pub struct PrimaryKeyAttribute {
    pub(crate) fields: Vec<FieldWithArgs>,
    pub(crate) source_field: Option<ScalarFieldId>,
    pub(crate) name: Option<String>,
    pub(crate) mapped_name: Option<String>,
    pub(crate) clustered: Option<bool>,
    pub(crate) span: Span,
}
