//! Assembling a [`SchemaGraph`] in memory.
//!
//! ```
//! use schema_graph::{ReferentialAction, ScalarType, SchemaBuilder};
//!
//! let mut schema = SchemaBuilder::new();
//! schema.datasource("db").string("provider", "postgresql").string("url", "postgresql://localhost");
//!
//! let user = schema.model("User");
//! user.scalar("id", ScalarType::Int).id();
//! user.relation("posts", "Post").list();
//!
//! let post = schema.model("Post");
//! post.scalar("id", ScalarType::Int).id();
//! post.scalar("authorId", ScalarType::Int);
//! post.relation("author", "User")
//!     .fields(["authorId"])
//!     .references(["id"])
//!     .on_delete(ReferentialAction::Cascade);
//!
//! let graph = schema.finish().unwrap();
//! assert_eq!(graph.walk_relations().count(), 1);
//! ```

use crate::{
    CompositeTypeId, EnumId, ModelId, RelationFieldId, ScalarFieldId, SchemaGraph,
    nodes::{self, Model},
    relations,
    types::{
        ConfigBlock, ConfigBlockProperty, DefaultAttribute, Expression, FieldArity, FieldWithArgs, IndexAlgorithm,
        IndexAttribute, IndexFieldPath, IndexType, PrimaryKeyAttribute, RawNativeType, ReferentialAction,
        ScalarFieldType, ScalarType, SortOrder,
    },
};
use diagnostics::{FileId, Span};
use std::collections::HashMap;
use thiserror::Error;

/// A name that could not be resolved while finishing the graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A field type is neither a scalar type, an enum nor a composite type.
    #[error("Type \"{type_name}\" of field `{field}` in `{container}` is neither a built-in type, nor refers to another model, composite type, or enum.")]
    UnknownType {
        /// The model or composite type.
        container: String,
        /// The field.
        field: String,
        /// The unresolved type.
        type_name: String,
    },
    /// A relation field points to a model that does not exist.
    #[error("The relation field `{field}` on model `{model}` references the unknown model `{referenced_model}`.")]
    UnknownModel {
        /// The model holding the relation field.
        model: String,
        /// The relation field.
        field: String,
        /// The unresolved model.
        referenced_model: String,
    },
    /// A field named in `fields`, `references` or an index does not exist.
    #[error("The field `{field}` referenced in `{attribute}` does not exist on `{container}`.")]
    UnknownField {
        /// The model or composite type the field was looked up in.
        container: String,
        /// The attribute mentioning the field.
        attribute: &'static str,
        /// The unresolved field name.
        field: String,
    },
    /// A model defines both `@id` and `@@id`, or two `@id`s.
    #[error("Each model must have at most one id criteria. You can't have `@id` and `@@id` at the same time on `{model}`.")]
    MultipleIds {
        /// The model.
        model: String,
    },
}

impl Expression {
    /// A string literal.
    pub fn string(value: impl Into<String>) -> Self {
        Expression::StringValue(value.into(), Span::empty())
    }

    /// A numeric literal.
    pub fn numeric(value: impl ToString) -> Self {
        Expression::NumericValue(value.to_string(), Span::empty())
    }

    /// A bare identifier: `true`, `false` or an enum value.
    pub fn constant(value: impl Into<String>) -> Self {
        Expression::ConstantValue(value.into(), Span::empty())
    }

    /// A function call.
    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function(name.into(), args, Span::empty())
    }

    /// An array literal.
    pub fn array(values: Vec<Expression>) -> Self {
        Expression::Array(values, Span::empty())
    }

    /// `env("NAME")`
    pub fn env(var_name: impl Into<String>) -> Self {
        Expression::function("env", vec![Expression::string(var_name)])
    }
}

/// Hands out distinct, increasing spans, so every element of an in-memory
/// schema can be told apart in diagnostics.
struct SpanAllocator {
    file_id: FileId,
    cursor: usize,
}

impl SpanAllocator {
    fn next(&mut self, len: usize) -> Span {
        let span = Span::new(self.cursor, self.cursor + len.max(1), self.file_id);
        self.cursor = span.end + 1;
        span
    }

    fn respan(&mut self, expr: &mut Expression) {
        match expr {
            Expression::StringValue(value, span)
            | Expression::NumericValue(value, span)
            | Expression::ConstantValue(value, span) => *span = self.next(value.len()),
            Expression::Function(name, args, span) => {
                *span = self.next(name.len());
                for arg in args {
                    self.respan(arg);
                }
            }
            Expression::Array(values, span) => {
                *span = self.next(1);
                for value in values {
                    self.respan(value);
                }
            }
        }
    }
}

/// Builds a [`SchemaGraph`].
#[derive(Default)]
pub struct SchemaBuilder {
    file_id: FileId,
    datasources: Vec<ConfigBlockBuilder>,
    generators: Vec<ConfigBlockBuilder>,
    models: Vec<ModelBuilder>,
    enums: Vec<EnumBuilder>,
    composite_types: Vec<CompositeTypeBuilder>,
}

impl SchemaBuilder {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// The file id all the spans of the graph will point to.
    pub fn file_id(&mut self, file_id: FileId) -> &mut Self {
        self.file_id = file_id;
        self
    }

    /// Add a `datasource` block.
    pub fn datasource(&mut self, name: &str) -> &mut ConfigBlockBuilder {
        push_last(&mut self.datasources, ConfigBlockBuilder::new(name))
    }

    /// Add a `generator` block.
    pub fn generator(&mut self, name: &str) -> &mut ConfigBlockBuilder {
        push_last(&mut self.generators, ConfigBlockBuilder::new(name))
    }

    /// Add a `model` block.
    pub fn model(&mut self, name: &str) -> &mut ModelBuilder {
        push_last(&mut self.models, ModelBuilder::new(name, false))
    }

    /// Add a `view` block.
    pub fn view(&mut self, name: &str) -> &mut ModelBuilder {
        push_last(&mut self.models, ModelBuilder::new(name, true))
    }

    /// Add an `enum` block.
    pub fn enumeration(&mut self, name: &str) -> &mut EnumBuilder {
        push_last(&mut self.enums, EnumBuilder {
            name: name.to_owned(),
            mapped_name: None,
            schema: None,
            documentation: None,
            values: Vec::new(),
        })
    }

    /// Add a `type` block.
    pub fn composite_type(&mut self, name: &str) -> &mut CompositeTypeBuilder {
        push_last(&mut self.composite_types, CompositeTypeBuilder {
            name: name.to_owned(),
            fields: Vec::new(),
        })
    }

    /// Resolve all the names and pair up the relation fields.
    pub fn finish(self) -> Result<SchemaGraph, BuildError> {
        let mut spans = SpanAllocator {
            file_id: self.file_id,
            cursor: 0,
        };
        let mut graph = SchemaGraph::default();

        let model_ids: HashMap<&str, ModelId> = self
            .models
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.name.as_str(), ModelId::from_idx(idx)))
            .collect();
        let enum_ids: HashMap<&str, EnumId> = self
            .enums
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.name.as_str(), EnumId::from_idx(idx)))
            .collect();
        let composite_type_ids: HashMap<&str, CompositeTypeId> = self
            .composite_types
            .iter()
            .enumerate()
            .map(|(idx, ct)| (ct.name.as_str(), CompositeTypeId::from_idx(idx)))
            .collect();
        let resolver = TypeResolver {
            enums: &enum_ids,
            composite_types: &composite_type_ids,
        };

        for block in self.datasources {
            graph.datasources.push(block.finish(&mut spans));
        }

        for block in self.generators {
            graph.generators.push(block.finish(&mut spans));
        }

        for enm in &self.enums {
            let span = spans.next(enm.name.len());
            let schema = enm.schema.clone().map(|s| {
                let span = spans.next(s.len());
                (s, span)
            });
            let values = enm
                .values
                .iter()
                .map(|(name, mapped_name)| nodes::EnumValue {
                    span: spans.next(name.len()),
                    name: name.clone(),
                    mapped_name: mapped_name.clone(),
                })
                .collect();

            graph.enums.push(nodes::Enum {
                name: enm.name.clone(),
                span,
                mapped_name: enm.mapped_name.clone(),
                schema,
                documentation: enm.documentation.clone(),
                values,
            });
        }

        for ct in &self.composite_types {
            let span = spans.next(ct.name.len());
            let mut fields = Vec::with_capacity(ct.fields.len());

            for field in ct.fields.iter().map(|f| &f.inner) {
                let field_span = spans.next(field.name.len());
                let r#type = resolver.resolve(&field.r#type, &ct.name, &field.name)?;

                fields.push(nodes::CompositeTypeField {
                    name: field.name.clone(),
                    span: field_span,
                    arity: field.arity,
                    r#type,
                    unsupported_type: field.r#type.unsupported_name(),
                    mapped_name: field.mapped_name.clone(),
                    default: field.default.clone().map(|d| d.finish(&mut spans)),
                    native_type: field.native_type.clone().map(|nt| nt.finish(&mut spans)),
                });
            }

            graph.composite_types.push(nodes::CompositeType {
                name: ct.name.clone(),
                span,
                fields,
            });
        }

        // Scalar fields first: relation fields and indexes refer to them.
        for (idx, model) in self.models.iter().enumerate() {
            let model_id = ModelId::from_idx(idx);
            let span = spans.next(model.name.len());
            let schema = model.schema.clone().map(|s| {
                let span = spans.next(s.len());
                (s, span)
            });

            let mut scalar_fields = Vec::new();

            for field in &model.scalar_fields {
                let id = ScalarFieldId::from_idx(graph.scalar_fields.len());
                let inner = &field.inner;
                let field_span = spans.next(inner.name.len());
                let r#type = resolver.resolve(&inner.r#type, &model.name, &inner.name)?;

                graph.scalar_fields.push(nodes::ScalarField {
                    model_id,
                    name: inner.name.clone(),
                    span: field_span,
                    arity: inner.arity,
                    r#type,
                    unsupported_type: inner.r#type.unsupported_name(),
                    mapped_name: inner.mapped_name.clone(),
                    default: inner.default.clone().map(|d| d.finish(&mut spans)),
                    native_type: inner.native_type.clone().map(|nt| nt.finish(&mut spans)),
                    is_updated_at: field.is_updated_at,
                    is_ignored: field.is_ignored,
                });
                scalar_fields.push(id);
            }

            graph.models.push(Model {
                name: model.name.clone(),
                span,
                mapped_name: model.mapped_name.clone(),
                schema,
                is_view: model.is_view,
                is_ignored: model.is_ignored,
                documentation: model.documentation.clone(),
                scalar_fields,
                relation_fields: Vec::new(),
                primary_key: None,
                indexes: Vec::new(),
            });
        }

        for (idx, model) in self.models.iter().enumerate() {
            let model_id = ModelId::from_idx(idx);
            let mut primary_key = None;
            let mut field_indexes = Vec::new();

            for field in &model.scalar_fields {
                let field_id = find_scalar_field(&graph, model_id, &field.inner.name, "@id")?;

                if let Some(id) = &field.id {
                    if primary_key.is_some() {
                        return Err(BuildError::MultipleIds {
                            model: model.name.clone(),
                        });
                    }

                    let mut attr = id.finish_primary_key(&graph, model_id, "@id", &mut spans)?;
                    attr.source_field = Some(field_id);
                    primary_key = Some(attr);
                }

                if let Some(unique) = &field.unique {
                    let mut attr = unique.finish_index(&graph, model_id, &mut spans)?;
                    attr.source_field = Some(field_id);
                    field_indexes.push(attr);
                }
            }

            if let Some(id) = &model.id {
                if primary_key.is_some() {
                    return Err(BuildError::MultipleIds {
                        model: model.name.clone(),
                    });
                }

                primary_key = Some(id.finish_primary_key(&graph, model_id, "@@id", &mut spans)?);
            }

            let mut indexes = field_indexes;

            for index in &model.indexes {
                indexes.push(index.finish_index(&graph, model_id, &mut spans)?);
            }

            let model_node = &mut graph.models[idx];
            model_node.primary_key = primary_key;
            model_node.indexes = indexes;
        }

        for (idx, model) in self.models.iter().enumerate() {
            let model_id = ModelId::from_idx(idx);

            for field in &model.relation_fields {
                let referenced_model =
                    *model_ids
                        .get(field.referenced_model.as_str())
                        .ok_or_else(|| BuildError::UnknownModel {
                            model: model.name.clone(),
                            field: field.name.clone(),
                            referenced_model: field.referenced_model.clone(),
                        })?;

                let fields = field
                    .fields
                    .as_ref()
                    .map(|names| {
                        names
                            .iter()
                            .map(|name| find_scalar_field(&graph, model_id, name, "fields"))
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .transpose()?;

                let references = field
                    .references
                    .as_ref()
                    .map(|names| {
                        names
                            .iter()
                            .map(|name| find_scalar_field(&graph, referenced_model, name, "references"))
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .transpose()?;

                let span = spans.next(field.name.len());
                let relation_attribute = field.has_relation_attribute().then(|| spans.next("@relation".len()));
                let on_delete = field.on_delete.map(|action| (action, spans.next(action.as_str().len())));
                let on_update = field.on_update.map(|action| (action, spans.next(action.as_str().len())));

                let id = RelationFieldId::from_idx(graph.relation_fields.len());
                graph.relation_fields.push(nodes::RelationField {
                    model_id,
                    name: field.name.clone(),
                    span,
                    arity: field.arity,
                    referenced_model,
                    relation_name: field.relation_name.clone(),
                    fields,
                    references,
                    on_delete,
                    on_update,
                    mapped_name: field.mapped_name.clone(),
                    relation_attribute,
                    is_ignored: field.is_ignored,
                });
                graph.models[idx].relation_fields.push(id);
            }
        }

        relations::infer_relations(&mut graph);

        Ok(graph)
    }
}

struct TypeResolver<'a> {
    enums: &'a HashMap<&'a str, EnumId>,
    composite_types: &'a HashMap<&'a str, CompositeTypeId>,
}

impl TypeResolver<'_> {
    fn resolve(&self, spec: &TypeSpec, container: &str, field: &str) -> Result<ScalarFieldType, BuildError> {
        match spec {
            TypeSpec::Scalar(scalar_type) => Ok(ScalarFieldType::BuiltInScalar(*scalar_type)),
            TypeSpec::Unsupported(_) => Ok(ScalarFieldType::Unsupported),
            TypeSpec::Named(name) => {
                if let Some(scalar_type) = ScalarType::try_from_str(name) {
                    return Ok(ScalarFieldType::BuiltInScalar(scalar_type));
                }

                if let Some(id) = self.enums.get(name.as_str()) {
                    return Ok(ScalarFieldType::Enum(*id));
                }

                if let Some(id) = self.composite_types.get(name.as_str()) {
                    return Ok(ScalarFieldType::CompositeType(*id));
                }

                Err(BuildError::UnknownType {
                    container: container.to_owned(),
                    field: field.to_owned(),
                    type_name: name.clone(),
                })
            }
        }
    }
}

fn push_last<T>(items: &mut Vec<T>, item: T) -> &mut T {
    items.push(item);
    let last = items.len() - 1;
    &mut items[last]
}

fn find_scalar_field(
    graph: &SchemaGraph,
    model_id: ModelId,
    name: &str,
    attribute: &'static str,
) -> Result<ScalarFieldId, BuildError> {
    let model = &graph.models[model_id.idx()];

    model
        .scalar_fields
        .iter()
        .copied()
        .find(|id| graph.scalar_fields[id.idx()].name == name)
        .ok_or_else(|| BuildError::UnknownField {
            container: model.name.clone(),
            attribute,
            field: name.to_owned(),
        })
}

/// Resolves `a.b.c` through composite types.
fn resolve_index_path(
    graph: &SchemaGraph,
    model_id: ModelId,
    path: &str,
    attribute: &'static str,
) -> Result<IndexFieldPath, BuildError> {
    let mut segments = path.split('.');
    let root_name = segments.next().unwrap_or_default();
    let root = find_scalar_field(graph, model_id, root_name, attribute)?;
    let mut resolved = IndexFieldPath::new(root);
    let mut current_type = graph.scalar_fields[root.idx()].r#type.as_composite_type();

    for segment in segments {
        let unknown = || BuildError::UnknownField {
            container: graph.models[model_id.idx()].name.clone(),
            attribute,
            field: path.to_owned(),
        };

        let ctid = current_type.ok_or_else(unknown)?;
        let ct = &graph.composite_types[ctid.idx()];
        let position = ct.fields.iter().position(|f| f.name == segment).ok_or_else(unknown)?;

        resolved.path.push((ctid, position));
        current_type = ct.fields[position].r#type.as_composite_type();
    }

    Ok(resolved)
}

/// Builds a `datasource` or `generator` block.
pub struct ConfigBlockBuilder {
    name: String,
    documentation: Option<String>,
    properties: Vec<(String, Expression)>,
}

impl ConfigBlockBuilder {
    fn new(name: &str) -> Self {
        ConfigBlockBuilder {
            name: name.to_owned(),
            documentation: None,
            properties: Vec::new(),
        }
    }

    /// `key = value`, with any expression.
    pub fn property(&mut self, key: &str, value: Expression) -> &mut Self {
        self.properties.push((key.to_owned(), value));
        self
    }

    /// `key = "value"`
    pub fn string(&mut self, key: &str, value: &str) -> &mut Self {
        self.property(key, Expression::string(value))
    }

    /// `key = env("VAR")`
    pub fn env(&mut self, key: &str, var_name: &str) -> &mut Self {
        self.property(key, Expression::env(var_name))
    }

    /// `key = ["a", "b"]`
    pub fn array(&mut self, key: &str, values: &[&str]) -> &mut Self {
        let values = values.iter().map(|v| Expression::string(*v)).collect();
        self.property(key, Expression::array(values))
    }

    /// A `///` comment on the block.
    pub fn documentation(&mut self, documentation: &str) -> &mut Self {
        self.documentation = Some(documentation.to_owned());
        self
    }

    fn finish(self, spans: &mut SpanAllocator) -> ConfigBlock {
        let span = spans.next(self.name.len());
        let properties = self
            .properties
            .into_iter()
            .map(|(name, mut value)| {
                let span = spans.next(name.len());
                spans.respan(&mut value);
                ConfigBlockProperty { name, value, span }
            })
            .collect();

        ConfigBlock {
            name: self.name,
            properties,
            documentation: self.documentation,
            span,
        }
    }
}

#[derive(Clone)]
enum TypeSpec {
    Scalar(ScalarType),
    Named(String),
    Unsupported(String),
}

impl TypeSpec {
    fn unsupported_name(&self) -> Option<String> {
        match self {
            TypeSpec::Unsupported(name) => Some(name.clone()),
            _ => None,
        }
    }
}

/// Builds a model or a view.
pub struct ModelBuilder {
    name: String,
    is_view: bool,
    is_ignored: bool,
    mapped_name: Option<String>,
    schema: Option<String>,
    documentation: Option<String>,
    scalar_fields: Vec<ScalarFieldBuilder>,
    relation_fields: Vec<RelationFieldBuilder>,
    id: Option<IndexBuilder>,
    indexes: Vec<IndexBuilder>,
}

impl ModelBuilder {
    fn new(name: &str, is_view: bool) -> Self {
        ModelBuilder {
            name: name.to_owned(),
            is_view,
            is_ignored: false,
            mapped_name: None,
            schema: None,
            documentation: None,
            scalar_fields: Vec::new(),
            relation_fields: Vec::new(),
            id: None,
            indexes: Vec::new(),
        }
    }

    /// A field of a built-in scalar type.
    pub fn scalar(&mut self, name: &str, r#type: ScalarType) -> &mut ScalarFieldBuilder {
        self.push_scalar(name, TypeSpec::Scalar(r#type))
    }

    /// A field with a type given by name: scalar, enum or composite type.
    pub fn field(&mut self, name: &str, type_name: &str) -> &mut ScalarFieldBuilder {
        self.push_scalar(name, TypeSpec::Named(type_name.to_owned()))
    }

    /// An `Unsupported("...")` field.
    pub fn unsupported(&mut self, name: &str, type_name: &str) -> &mut ScalarFieldBuilder {
        self.push_scalar(name, TypeSpec::Unsupported(type_name.to_owned()))
    }

    fn push_scalar(&mut self, name: &str, r#type: TypeSpec) -> &mut ScalarFieldBuilder {
        push_last(&mut self.scalar_fields, ScalarFieldBuilder {
            inner: FieldBuilder::new(name, r#type),
            id: None,
            unique: None,
            is_updated_at: false,
            is_ignored: false,
        })
    }

    /// A relation field pointing to `referenced_model`.
    pub fn relation(&mut self, name: &str, referenced_model: &str) -> &mut RelationFieldBuilder {
        push_last(&mut self.relation_fields, RelationFieldBuilder {
            name: name.to_owned(),
            referenced_model: referenced_model.to_owned(),
            arity: FieldArity::Required,
            relation_name: None,
            fields: None,
            references: None,
            on_delete: None,
            on_update: None,
            mapped_name: None,
            is_ignored: false,
        })
    }

    /// `@@id([...])`
    pub fn id<I, F>(&mut self, fields: I) -> &mut IndexBuilder
    where
        I: IntoIterator<Item = F>,
        F: Into<IndexField>,
    {
        self.id.insert(IndexBuilder::new(IndexType::Unique, fields))
    }

    /// `@@unique([...])`
    pub fn unique<I, F>(&mut self, fields: I) -> &mut IndexBuilder
    where
        I: IntoIterator<Item = F>,
        F: Into<IndexField>,
    {
        self.push_index(IndexType::Unique, fields)
    }

    /// `@@index([...])`
    pub fn index<I, F>(&mut self, fields: I) -> &mut IndexBuilder
    where
        I: IntoIterator<Item = F>,
        F: Into<IndexField>,
    {
        self.push_index(IndexType::Normal, fields)
    }

    /// `@@fulltext([...])`
    pub fn fulltext<I, F>(&mut self, fields: I) -> &mut IndexBuilder
    where
        I: IntoIterator<Item = F>,
        F: Into<IndexField>,
    {
        self.push_index(IndexType::Fulltext, fields)
    }

    fn push_index<I, F>(&mut self, r#type: IndexType, fields: I) -> &mut IndexBuilder
    where
        I: IntoIterator<Item = F>,
        F: Into<IndexField>,
    {
        push_last(&mut self.indexes, IndexBuilder::new(r#type, fields))
    }

    /// `@@map("name")`
    pub fn map(&mut self, mapped_name: &str) -> &mut Self {
        self.mapped_name = Some(mapped_name.to_owned());
        self
    }

    /// `@@schema("name")`
    pub fn schema(&mut self, schema: &str) -> &mut Self {
        self.schema = Some(schema.to_owned());
        self
    }

    /// `@@ignore`
    pub fn ignore(&mut self) -> &mut Self {
        self.is_ignored = true;
        self
    }

    /// A `///` comment on the model.
    pub fn documentation(&mut self, documentation: &str) -> &mut Self {
        self.documentation = Some(documentation.to_owned());
        self
    }
}

/// The parts shared by model and composite type scalar fields.
#[derive(Clone)]
struct FieldBuilder {
    name: String,
    r#type: TypeSpec,
    arity: FieldArity,
    mapped_name: Option<String>,
    default: Option<DefaultSpec>,
    native_type: Option<NativeTypeSpec>,
}

impl FieldBuilder {
    fn new(name: &str, r#type: TypeSpec) -> Self {
        FieldBuilder {
            name: name.to_owned(),
            r#type,
            arity: FieldArity::Required,
            mapped_name: None,
            default: None,
            native_type: None,
        }
    }
}

#[derive(Clone)]
struct DefaultSpec {
    value: Expression,
    mapped_name: Option<String>,
}

impl DefaultSpec {
    fn finish(mut self, spans: &mut SpanAllocator) -> DefaultAttribute {
        let span = spans.next("@default".len());
        spans.respan(&mut self.value);

        DefaultAttribute {
            value: self.value,
            mapped_name: self.mapped_name,
            span,
        }
    }
}

#[derive(Clone)]
struct NativeTypeSpec {
    scope: String,
    name: String,
    args: Vec<String>,
}

impl NativeTypeSpec {
    fn finish(self, spans: &mut SpanAllocator) -> RawNativeType {
        let span = spans.next(self.scope.len() + self.name.len() + 2);

        RawNativeType {
            scope: self.scope,
            name: self.name,
            args: self.args,
            span,
        }
    }
}

macro_rules! field_builder_methods {
    () => {
        /// `Type?`
        pub fn optional(&mut self) -> &mut Self {
            self.inner.arity = FieldArity::Optional;
            self
        }

        /// `Type[]`
        pub fn list(&mut self) -> &mut Self {
            self.inner.arity = FieldArity::List;
            self
        }

        /// `@map("name")`
        pub fn map(&mut self, mapped_name: &str) -> &mut Self {
            self.inner.mapped_name = Some(mapped_name.to_owned());
            self
        }

        /// `@default(value)`
        pub fn default_value(&mut self, value: Expression) -> &mut Self {
            self.inner.default = Some(DefaultSpec {
                value,
                mapped_name: None,
            });
            self
        }

        /// `@default(name())`
        pub fn default_fn(&mut self, function_name: &str) -> &mut Self {
            self.default_value(Expression::function(function_name, Vec::new()))
        }

        /// `@default(value, map: "name")`
        pub fn named_default(&mut self, value: Expression, mapped_name: &str) -> &mut Self {
            self.inner.default = Some(DefaultSpec {
                value,
                mapped_name: Some(mapped_name.to_owned()),
            });
            self
        }

        /// `@scope.Name(args)`, for example `@db.VarChar(10)`.
        pub fn native_type(&mut self, scope: &str, name: &str, args: &[&str]) -> &mut Self {
            self.inner.native_type = Some(NativeTypeSpec {
                scope: scope.to_owned(),
                name: name.to_owned(),
                args: args.iter().map(|s| s.to_string()).collect(),
            });
            self
        }
    };
}

/// Builds a scalar field on a model.
pub struct ScalarFieldBuilder {
    inner: FieldBuilder,
    id: Option<IndexBuilder>,
    unique: Option<IndexBuilder>,
    is_updated_at: bool,
    is_ignored: bool,
}

impl ScalarFieldBuilder {
    field_builder_methods!();

    /// `@id`
    pub fn id(&mut self) -> &mut Self {
        self.id_with(|_| {})
    }

    /// `@id(...)` with arguments set on the given builder.
    pub fn id_with(&mut self, f: impl FnOnce(&mut IndexBuilder)) -> &mut Self {
        let mut builder = IndexBuilder::new(IndexType::Unique, [self.inner.name.as_str()]);
        f(&mut builder);
        self.id = Some(builder);
        self
    }

    /// `@unique`
    pub fn unique(&mut self) -> &mut Self {
        self.unique_with(|_| {})
    }

    /// `@unique(...)` with arguments set on the given builder.
    pub fn unique_with(&mut self, f: impl FnOnce(&mut IndexBuilder)) -> &mut Self {
        let mut builder = IndexBuilder::new(IndexType::Unique, [self.inner.name.as_str()]);
        f(&mut builder);
        self.unique = Some(builder);
        self
    }

    /// `@updatedAt`
    pub fn updated_at(&mut self) -> &mut Self {
        self.is_updated_at = true;
        self
    }

    /// `@ignore`
    pub fn ignore(&mut self) -> &mut Self {
        self.is_ignored = true;
        self
    }
}

/// Builds a relation field.
pub struct RelationFieldBuilder {
    name: String,
    referenced_model: String,
    arity: FieldArity,
    relation_name: Option<String>,
    fields: Option<Vec<String>>,
    references: Option<Vec<String>>,
    on_delete: Option<ReferentialAction>,
    on_update: Option<ReferentialAction>,
    mapped_name: Option<String>,
    is_ignored: bool,
}

impl RelationFieldBuilder {
    /// `Model?`
    pub fn optional(&mut self) -> &mut Self {
        self.arity = FieldArity::Optional;
        self
    }

    /// `Model[]`
    pub fn list(&mut self) -> &mut Self {
        self.arity = FieldArity::List;
        self
    }

    /// `@relation("name")`
    pub fn name(&mut self, relation_name: &str) -> &mut Self {
        self.relation_name = Some(relation_name.to_owned());
        self
    }

    /// `@relation(fields: [...])`
    pub fn fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fields = Some(fields.into_iter().map(|s| s.as_ref().to_owned()).collect());
        self
    }

    /// `@relation(references: [...])`
    pub fn references<I, S>(&mut self, references: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.references = Some(references.into_iter().map(|s| s.as_ref().to_owned()).collect());
        self
    }

    /// `@relation(onDelete: ...)`
    pub fn on_delete(&mut self, action: ReferentialAction) -> &mut Self {
        self.on_delete = Some(action);
        self
    }

    /// `@relation(onUpdate: ...)`
    pub fn on_update(&mut self, action: ReferentialAction) -> &mut Self {
        self.on_update = Some(action);
        self
    }

    /// `@relation(map: "...")`, the foreign key constraint name.
    pub fn map(&mut self, mapped_name: &str) -> &mut Self {
        self.mapped_name = Some(mapped_name.to_owned());
        self
    }

    /// `@ignore`
    pub fn ignore(&mut self) -> &mut Self {
        self.is_ignored = true;
        self
    }

    fn has_relation_attribute(&self) -> bool {
        self.relation_name.is_some()
            || self.fields.is_some()
            || self.references.is_some()
            || self.on_delete.is_some()
            || self.on_update.is_some()
            || self.mapped_name.is_some()
    }
}

/// A field in an index or id definition, with its arguments. Paths into
/// composite types are written with dots: `address.street`.
#[derive(Debug, Clone)]
pub struct IndexField {
    path: String,
    sort_order: Option<SortOrder>,
    length: Option<u32>,
}

impl IndexField {
    /// A field with no arguments.
    pub fn new(path: &str) -> Self {
        IndexField {
            path: path.to_owned(),
            sort_order: None,
            length: None,
        }
    }

    /// `field(sort: Asc)`
    pub fn asc(mut self) -> Self {
        self.sort_order = Some(SortOrder::Asc);
        self
    }

    /// `field(sort: Desc)`
    pub fn desc(mut self) -> Self {
        self.sort_order = Some(SortOrder::Desc);
        self
    }

    /// `field(length: n)`
    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

impl From<&str> for IndexField {
    fn from(path: &str) -> Self {
        IndexField::new(path)
    }
}

/// Builds an index, unique or id attribute.
pub struct IndexBuilder {
    r#type: IndexType,
    fields: Vec<IndexField>,
    name: Option<String>,
    mapped_name: Option<String>,
    algorithm: Option<IndexAlgorithm>,
    clustered: Option<bool>,
}

impl IndexBuilder {
    fn new<I, F>(r#type: IndexType, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<IndexField>,
    {
        IndexBuilder {
            r#type,
            fields: fields.into_iter().map(Into::into).collect(),
            name: None,
            mapped_name: None,
            algorithm: None,
            clustered: None,
        }
    }

    /// The `name:` argument, the client name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_owned());
        self
    }

    /// The `map:` argument, the constraint name.
    pub fn map(&mut self, mapped_name: &str) -> &mut Self {
        self.mapped_name = Some(mapped_name.to_owned());
        self
    }

    /// The `type:` argument.
    pub fn algorithm(&mut self, algorithm: IndexAlgorithm) -> &mut Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// The `clustered:` argument.
    pub fn clustered(&mut self, clustered: bool) -> &mut Self {
        self.clustered = Some(clustered);
        self
    }

    /// The `sort:` argument of a field-level attribute.
    pub fn sort(&mut self, sort_order: SortOrder) -> &mut Self {
        if let Some(field) = self.fields.first_mut() {
            field.sort_order = Some(sort_order);
        }
        self
    }

    /// The `length:` argument of a field-level attribute.
    pub fn length(&mut self, length: u32) -> &mut Self {
        if let Some(field) = self.fields.first_mut() {
            field.length = Some(length);
        }
        self
    }

    fn finish_fields(
        &self,
        graph: &SchemaGraph,
        model_id: ModelId,
        attribute: &'static str,
    ) -> Result<Vec<FieldWithArgs>, BuildError> {
        self.fields
            .iter()
            .map(|field| {
                Ok(FieldWithArgs {
                    path: resolve_index_path(graph, model_id, &field.path, attribute)?,
                    sort_order: field.sort_order,
                    length: field.length,
                })
            })
            .collect()
    }

    fn finish_primary_key(
        &self,
        graph: &SchemaGraph,
        model_id: ModelId,
        attribute: &'static str,
        spans: &mut SpanAllocator,
    ) -> Result<PrimaryKeyAttribute, BuildError> {
        Ok(PrimaryKeyAttribute {
            fields: self.finish_fields(graph, model_id, attribute)?,
            source_field: None,
            name: self.name.clone(),
            mapped_name: self.mapped_name.clone(),
            clustered: self.clustered,
            span: spans.next(attribute.len()),
        })
    }

    fn finish_index(
        &self,
        graph: &SchemaGraph,
        model_id: ModelId,
        spans: &mut SpanAllocator,
    ) -> Result<IndexAttribute, BuildError> {
        let attribute = match self.r#type {
            IndexType::Unique => "@@unique",
            IndexType::Normal => "@@index",
            IndexType::Fulltext => "@@fulltext",
        };

        Ok(IndexAttribute {
            r#type: self.r#type,
            fields: self.finish_fields(graph, model_id, attribute)?,
            source_field: None,
            name: self.name.clone(),
            mapped_name: self.mapped_name.clone(),
            algorithm: self.algorithm,
            clustered: self.clustered,
            span: spans.next(attribute.len()),
        })
    }
}

/// Builds an enum.
pub struct EnumBuilder {
    name: String,
    mapped_name: Option<String>,
    schema: Option<String>,
    documentation: Option<String>,
    values: Vec<(String, Option<String>)>,
}

impl EnumBuilder {
    /// A value.
    pub fn value(&mut self, name: &str) -> &mut Self {
        self.values.push((name.to_owned(), None));
        self
    }

    /// A value with `@map("...")`.
    pub fn mapped_value(&mut self, name: &str, mapped_name: &str) -> &mut Self {
        self.values.push((name.to_owned(), Some(mapped_name.to_owned())));
        self
    }

    /// `@@map("name")`
    pub fn map(&mut self, mapped_name: &str) -> &mut Self {
        self.mapped_name = Some(mapped_name.to_owned());
        self
    }

    /// `@@schema("name")`
    pub fn schema(&mut self, schema: &str) -> &mut Self {
        self.schema = Some(schema.to_owned());
        self
    }

    /// A `///` comment on the enum.
    pub fn documentation(&mut self, documentation: &str) -> &mut Self {
        self.documentation = Some(documentation.to_owned());
        self
    }
}

/// Builds a composite type.
pub struct CompositeTypeBuilder {
    name: String,
    fields: Vec<CompositeTypeFieldBuilder>,
}

impl CompositeTypeBuilder {
    /// A field of a built-in scalar type.
    pub fn scalar(&mut self, name: &str, r#type: ScalarType) -> &mut CompositeTypeFieldBuilder {
        self.push(name, TypeSpec::Scalar(r#type))
    }

    /// A field with a type given by name: scalar, enum or composite type.
    pub fn field(&mut self, name: &str, type_name: &str) -> &mut CompositeTypeFieldBuilder {
        self.push(name, TypeSpec::Named(type_name.to_owned()))
    }

    /// An `Unsupported("...")` field.
    pub fn unsupported(&mut self, name: &str, type_name: &str) -> &mut CompositeTypeFieldBuilder {
        self.push(name, TypeSpec::Unsupported(type_name.to_owned()))
    }

    fn push(&mut self, name: &str, r#type: TypeSpec) -> &mut CompositeTypeFieldBuilder {
        push_last(&mut self.fields, CompositeTypeFieldBuilder {
            inner: FieldBuilder::new(name, r#type),
        })
    }
}

/// Builds a field of a composite type.
pub struct CompositeTypeFieldBuilder {
    inner: FieldBuilder,
}

impl CompositeTypeFieldBuilder {
    field_builder_methods!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_field_types_are_reported() {
        let mut schema = SchemaBuilder::new();
        schema.model("User").field("role", "Role");

        let err = schema.finish().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Type \"Role\" of field `role` in `User` is neither a built-in type, nor refers to another model, composite type, or enum."
        );
    }

    #[test]
    fn named_types_resolve_to_enums_and_composite_types() {
        let mut schema = SchemaBuilder::new();
        schema.enumeration("Role").value("ADMIN").value("USER");
        schema.composite_type("Address").scalar("street", ScalarType::String);

        let user = schema.model("User");
        user.scalar("id", ScalarType::Int).id();
        user.field("role", "Role");
        user.field("address", "Address");
        user.field("name", "String");

        let graph = schema.finish().unwrap();
        let user = graph.find_model("User").unwrap();
        let types: Vec<&str> = user.scalar_fields().map(|f| f.type_name()).collect();

        assert_eq!(types, ["Int", "Role", "Address", "String"]);
        assert!(user.find_scalar_field("role").unwrap().field_type_as_enum().is_some());
    }

    #[test]
    fn field_and_model_level_ids_can_not_coexist() {
        let mut schema = SchemaBuilder::new();
        let model = schema.model("Pair");
        model.scalar("a", ScalarType::Int).id();
        model.scalar("b", ScalarType::Int);
        model.id(["a", "b"]);

        assert_eq!(
            schema.finish().unwrap_err(),
            BuildError::MultipleIds {
                model: "Pair".to_owned()
            }
        );
    }

    #[test]
    fn index_paths_go_through_composite_types() {
        let mut schema = SchemaBuilder::new();
        schema.composite_type("Address").scalar("street", ScalarType::String).map("st");

        let user = schema.model("User");
        user.scalar("id", ScalarType::String).id();
        user.field("address", "Address");
        user.index([IndexField::new("address.street").desc()]);

        let graph = schema.finish().unwrap();
        let index = graph.find_model("User").unwrap().indexes().next().unwrap();
        let field = index.scalar_field_attributes().next().unwrap();

        assert_eq!(field.as_path_to_indexed_field(), [("address", None), ("street", Some("Address"))]);
        assert_eq!(field.as_mapped_path_to_indexed_field(), [("address", None), ("st", Some("Address"))]);
        assert_eq!(field.sort_order(), Some(SortOrder::Desc));
        assert!(index.fields().next().unwrap().is_composite_field());
    }

    #[test]
    fn unknown_index_fields_are_reported() {
        let mut schema = SchemaBuilder::new();
        let user = schema.model("User");
        user.scalar("id", ScalarType::Int).id();
        user.unique(["email"]);

        assert_eq!(
            schema.finish().unwrap_err().to_string(),
            "The field `email` referenced in `@@unique` does not exist on `User`."
        );
    }

    #[test]
    fn spans_are_distinct() {
        let mut schema = SchemaBuilder::new();
        let user = schema.model("User");
        user.scalar("id", ScalarType::Int).id();
        user.scalar("email", ScalarType::String).unique();

        let graph = schema.finish().unwrap();
        let user = graph.find_model("User").unwrap();
        let spans: Vec<Span> = std::iter::once(user.span())
            .chain(user.scalar_fields().map(|f| f.span()))
            .chain(user.indexes().map(|i| i.span()))
            .collect();

        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                assert!(!a.overlaps(*b), "{a:?} overlaps {b:?}");
            }
        }
    }
}
