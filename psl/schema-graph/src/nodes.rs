//! The storage behind the walkers. Nothing in here is public: the graph is
//! read through walkers and written through the builder.

use crate::{
    CompositeTypeId, EnumId, ModelId, RelationFieldId, ScalarFieldId,
    types::{
        DefaultAttribute, FieldArity, IndexAttribute, PrimaryKeyAttribute, RawNativeType, ReferentialAction,
        ScalarFieldType,
    },
};
use diagnostics::Span;

#[derive(Debug, Clone)]
pub(crate) struct Model {
    pub(crate) name: String,
    pub(crate) span: Span,
    pub(crate) mapped_name: Option<String>,
    pub(crate) schema: Option<(String, Span)>,
    pub(crate) is_view: bool,
    pub(crate) is_ignored: bool,
    pub(crate) documentation: Option<String>,
    pub(crate) scalar_fields: Vec<ScalarFieldId>,
    pub(crate) relation_fields: Vec<RelationFieldId>,
    pub(crate) primary_key: Option<PrimaryKeyAttribute>,
    pub(crate) indexes: Vec<IndexAttribute>,
}

#[derive(Debug, Clone)]
pub(crate) struct ScalarField {
    pub(crate) model_id: ModelId,
    pub(crate) name: String,
    pub(crate) span: Span,
    pub(crate) arity: FieldArity,
    pub(crate) r#type: ScalarFieldType,
    pub(crate) unsupported_type: Option<String>,
    pub(crate) mapped_name: Option<String>,
    pub(crate) default: Option<DefaultAttribute>,
    pub(crate) native_type: Option<RawNativeType>,
    pub(crate) is_updated_at: bool,
    pub(crate) is_ignored: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RelationField {
    pub(crate) model_id: ModelId,
    pub(crate) name: String,
    pub(crate) span: Span,
    pub(crate) arity: FieldArity,
    pub(crate) referenced_model: ModelId,
    pub(crate) relation_name: Option<String>,
    pub(crate) fields: Option<Vec<ScalarFieldId>>,
    pub(crate) references: Option<Vec<ScalarFieldId>>,
    pub(crate) on_delete: Option<(ReferentialAction, Span)>,
    pub(crate) on_update: Option<(ReferentialAction, Span)>,
    pub(crate) mapped_name: Option<String>,
    pub(crate) relation_attribute: Option<Span>,
    pub(crate) is_ignored: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Enum {
    pub(crate) name: String,
    pub(crate) span: Span,
    pub(crate) mapped_name: Option<String>,
    pub(crate) schema: Option<(String, Span)>,
    pub(crate) documentation: Option<String>,
    pub(crate) values: Vec<EnumValue>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnumValue {
    pub(crate) name: String,
    pub(crate) mapped_name: Option<String>,
    pub(crate) span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct CompositeType {
    pub(crate) name: String,
    pub(crate) span: Span,
    pub(crate) fields: Vec<CompositeTypeField>,
}

#[derive(Debug, Clone)]
pub(crate) struct CompositeTypeField {
    pub(crate) name: String,
    pub(crate) span: Span,
    pub(crate) arity: FieldArity,
    pub(crate) r#type: ScalarFieldType,
    pub(crate) unsupported_type: Option<String>,
    pub(crate) mapped_name: Option<String>,
    pub(crate) default: Option<DefaultAttribute>,
    pub(crate) native_type: Option<RawNativeType>,
}

/// A relation, as paired up from its relation fields. `field_b` is missing
/// when the relation is only defined from one side.
#[derive(Debug, Clone)]
pub(crate) struct Relation {
    pub(crate) relation_name: Option<String>,
    pub(crate) model_a: ModelId,
    pub(crate) model_b: ModelId,
    pub(crate) field_a: RelationFieldId,
    pub(crate) field_b: Option<RelationFieldId>,
}

impl Relation {
    pub(crate) fn fields(&self) -> impl Iterator<Item = RelationFieldId> + '_ {
        std::iter::once(self.field_a).chain(self.field_b)
    }
}
