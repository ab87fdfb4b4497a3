mod native_types;
mod validations;

pub use native_types::MongoDbType;

use crate::{
    Datasource, PreviewFeatures,
    datamodel_connector::{
        CapabilityQueries, ConnectorCapabilities, ConnectorCapability, ConstraintScope, Flavour, NativeTypeConstructor,
        NativeTypeInstance, NativeTypes, RelationMode, UrlError, ValidationHooks, report_unknown_default_functions,
    },
};
use diagnostics::{Diagnostics, Span};
use enumflags2::BitFlags;
use schema_graph::{IndexAlgorithm, ReferentialAction, ScalarType, SchemaGraph, walkers};

pub(crate) const CAPABILITIES: ConnectorCapabilities = enumflags2::make_bitflags!(ConnectorCapability::{
    Json |
    Enums |
    RelationFieldsInArbitraryOrder |
    ScalarLists |
    JsonLists |
    CompositeTypes |
    FullTextIndex |
    SortOrderInFullTextIndex |
    DefaultValueAuto |
    TwoWayEmbeddedManyToManyRelation
});

const CONSTRAINT_SCOPES: &[ConstraintScope] = &[ConstraintScope::ModelKeyIndex];

const SCALAR_TYPE_DEFAULTS: &[(ScalarType, MongoDbType)] = &[
    (ScalarType::Int, MongoDbType::Int),
    (ScalarType::BigInt, MongoDbType::Long),
    (ScalarType::Float, MongoDbType::Double),
    (ScalarType::Boolean, MongoDbType::Bool),
    (ScalarType::String, MongoDbType::String),
    (ScalarType::DateTime, MongoDbType::Date),
    (ScalarType::Bytes, MongoDbType::BinData),
    (ScalarType::Json, MongoDbType::Json),
];

pub struct MongoDbDatamodelConnector;

impl CapabilityQueries for MongoDbDatamodelConnector {
    fn provider_name(&self) -> &'static str {
        "mongodb"
    }

    fn is_provider(&self, name: &str) -> bool {
        name == self.provider_name()
    }

    fn name(&self) -> &str {
        "MongoDB"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Mongo
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        CAPABILITIES
    }

    fn max_identifier_length(&self) -> usize {
        127
    }

    fn allowed_relation_mode_settings(&self) -> BitFlags<RelationMode> {
        RelationMode::Prisma.into()
    }

    fn default_relation_mode(&self) -> RelationMode {
        RelationMode::Prisma
    }

    fn foreign_key_referential_actions(&self) -> BitFlags<ReferentialAction> {
        BitFlags::empty()
    }

    fn emulated_referential_actions(&self) -> BitFlags<ReferentialAction> {
        RelationMode::allowed_emulated_referential_actions_default()
    }

    fn allows_set_null_referential_action_on_non_nullable_fields(&self, _: RelationMode) -> bool {
        false
    }

    fn supported_index_types(&self) -> BitFlags<IndexAlgorithm> {
        IndexAlgorithm::BTree.into()
    }

    fn should_suggest_missing_referencing_fields_indexes(&self) -> bool {
        false
    }

    fn constraint_violation_scopes(&self) -> &'static [ConstraintScope] {
        CONSTRAINT_SCOPES
    }

    fn validate_url(&self, url: &str) -> Result<(), UrlError> {
        if url.starts_with("env:") {
            return Ok(());
        }

        if !url.starts_with("mongodb://") && !url.starts_with("mongodb+srv://") {
            return Err(UrlError::WrongProtocol { expected: "`mongodb://` or `mongodb+srv://`" });
        }

        Ok(())
    }
}

impl NativeTypes for MongoDbDatamodelConnector {
    fn available_native_type_constructors(&self) -> &'static [NativeTypeConstructor] {
        MongoDbType::CONSTRUCTORS
    }

    fn parse_native_type(
        &self,
        name: &str,
        args: &[String],
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> Option<NativeTypeInstance> {
        MongoDbType::from_parts(self.name(), name, args, span, diagnostics).map(NativeTypeInstance::MongoDb)
    }

    fn scalar_type_for_native_type(&self, native_type: &NativeTypeInstance) -> Option<ScalarType> {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::MongoDb(native_type) = native_type else {
            return None;
        };

        let scalar_type = match native_type {
            MongoDbType::String | MongoDbType::ObjectId => ScalarType::String,
            MongoDbType::Double => ScalarType::Float,
            MongoDbType::BinData => ScalarType::Bytes,
            MongoDbType::Bool => ScalarType::Boolean,
            MongoDbType::Date | MongoDbType::Timestamp => ScalarType::DateTime,
            MongoDbType::Int => ScalarType::Int,
            MongoDbType::Long => ScalarType::BigInt,
            MongoDbType::Json => ScalarType::Json,
        };

        Some(scalar_type)
    }

    fn default_native_type_for_scalar_type(&self, scalar_type: ScalarType) -> Option<NativeTypeInstance> {
        SCALAR_TYPE_DEFAULTS
            .iter()
            .find(|(st, _)| *st == scalar_type)
            .map(|(_, native_type)| NativeTypeInstance::MongoDb(*native_type))
    }

    fn validate_native_type_arguments(&self, _: &NativeTypeInstance, _: ScalarType, _: Span, _: &mut Diagnostics) {}
}

impl ValidationHooks for MongoDbDatamodelConnector {
    fn validate_datasource(&self, _: PreviewFeatures, _: &Datasource, _: &mut Diagnostics) {}

    fn validate_model(&self, model: walkers::ModelWalker<'_>, _: RelationMode, errors: &mut Diagnostics) {
        validations::id_must_be_defined(model, errors);

        if let Some(pk) = model.primary_key() {
            validations::id_field_must_have_a_correct_mapped_name(pk, errors);
        }

        for field in model.scalar_fields() {
            validations::objectid_type_required_with_auto_attribute(field, errors);
            validations::auto_attribute_must_be_an_id(field, errors);
            validations::dbgenerated_attribute_is_not_allowed(field, errors);
            validations::field_name_uses_valid_characters(field, errors);
        }

        for index in model.indexes() {
            validations::index_is_not_defined_multiple_times_to_same_fields(index, errors);
            validations::unique_cannot_be_defined_to_id_field(index, errors);
        }
    }

    fn validate_view(&self, view: walkers::ModelWalker<'_>, errors: &mut Diagnostics) {
        for field in view.scalar_fields() {
            validations::dbgenerated_attribute_is_not_allowed(field, errors);
            validations::field_name_uses_valid_characters(field, errors);
        }
    }

    fn validate_enum(&self, _: walkers::EnumWalker<'_>, _: &mut Diagnostics) {}

    fn validate_relation_field(&self, field: walkers::RelationFieldWalker<'_>, errors: &mut Diagnostics) {
        validations::relation_same_native_type(field, errors);
    }

    fn validate_scalar_field_unknown_default_functions(&self, db: &SchemaGraph, diagnostics: &mut Diagnostics) {
        report_unknown_default_functions(db, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel_connector::Connector;
    use schema_graph::{Expression, SchemaBuilder};

    const MONGODB: &dyn Connector = &MongoDbDatamodelConnector;

    fn model_errors(schema: SchemaBuilder) -> Vec<String> {
        let graph = schema.finish().unwrap();
        let mut diagnostics = Diagnostics::new();

        for model in graph.walk_models() {
            MONGODB.validate_model(model, RelationMode::Prisma, &mut diagnostics);
        }

        diagnostics.errors().map(|e| e.message()).collect()
    }

    #[test]
    fn id_must_be_mapped_to_underscore_id() {
        let mut schema = SchemaBuilder::new();
        schema
            .model("User")
            .scalar("uid", ScalarType::String)
            .id()
            .default_value(Expression::function("auto", Vec::new()))
            .native_type("db", "ObjectId", &[]);

        let expected = expect_test::expect![[r#"
            [
                "Error validating field `uid` in model `User`: MongoDB model IDs must have a @map(\"_id\") annotations.",
            ]
        "#]];
        expected.assert_debug_eq(&model_errors(schema));
    }

    #[test]
    fn auto_requires_object_id_and_id() {
        let mut schema = SchemaBuilder::new();
        let model = schema.model("User");
        model.scalar("id", ScalarType::String).id().map("_id");
        model.scalar("other", ScalarType::String).default_value(Expression::function("auto", Vec::new()));

        let expected = expect_test::expect![[r#"
            [
                "Error validating field `other` in model `User`: MongoDB `@default(auto())` fields must have `ObjectId` native type.",
                "Error validating field `other` in model `User`: MongoDB `@default(auto())` fields must have the `@id` attribute.",
            ]
        "#]];
        expected.assert_debug_eq(&model_errors(schema));
    }

    #[test]
    fn models_need_an_id() {
        let mut schema = SchemaBuilder::new();
        schema.model("Log").scalar("message", ScalarType::String);

        let expected = expect_test::expect![[r#"
            [
                "Invalid model: MongoDB models require exactly one identity field annotated with @id",
            ]
        "#]];
        expected.assert_debug_eq(&model_errors(schema));
    }

    #[test]
    fn only_emulated_relations() {
        assert_eq!(MONGODB.allowed_relation_mode_settings(), BitFlags::from(RelationMode::Prisma));
        assert!(MONGODB.is_mongo());
        assert!(MONGODB.validate_url("mongodb+srv://cluster0.example.net").is_ok());
        assert!(MONGODB.validate_url("postgres://localhost").is_err());
    }
}
