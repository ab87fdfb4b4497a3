mod native_types;
mod validations;

pub use native_types::CockroachType;

use crate::{
    Datasource, PreviewFeatures,
    datamodel_connector::{
        CapabilityQueries, ConnectorCapabilities, ConnectorCapability, ConstraintScope, Flavour, NativeTypeConstructor,
        NativeTypeInstance, NativeTypes, RelationMode, UrlError, ValidationHooks,
        walk_scalar_field_defaults_with_unknown_function,
    },
};
use diagnostics::{DatamodelError, Diagnostics, Span};
use enumflags2::BitFlags;
use schema_graph::{IndexAlgorithm, ReferentialAction, ScalarType, SchemaGraph, walkers::ModelWalker, walkers};

const CONSTRAINT_SCOPES: &[ConstraintScope] = &[ConstraintScope::ModelPrimaryKeyKeyIndexForeignKey];

pub(crate) const CAPABILITIES: ConnectorCapabilities = enumflags2::make_bitflags!(ConnectorCapability::{
    AnyId |
    AutoIncrement |
    AutoIncrementAllowedOnNonId |
    AutoIncrementMultipleAllowed |
    AutoIncrementNonIndexedAllowed |
    CompoundIds |
    Enums |
    Json |
    NamedPrimaryKeys |
    NamedForeignKeys |
    RelationFieldsInArbitraryOrder |
    ScalarLists |
    ImplicitManyToManyRelation |
    DecimalType |
    MultiSchema |
    Views
});

const SCALAR_TYPE_DEFAULTS: &[(ScalarType, CockroachType)] = &[
    (ScalarType::Int, CockroachType::Int4),
    (ScalarType::BigInt, CockroachType::Int8),
    (ScalarType::Float, CockroachType::Float8),
    (ScalarType::Decimal, CockroachType::Decimal(Some((65, 30)))),
    (ScalarType::Boolean, CockroachType::Bool),
    (ScalarType::String, CockroachType::String(None)),
    (ScalarType::DateTime, CockroachType::Timestamp(Some(3))),
    (ScalarType::Bytes, CockroachType::Bytes),
    (ScalarType::Json, CockroachType::JsonB),
];

pub struct CockroachDatamodelConnector;

impl CapabilityQueries for CockroachDatamodelConnector {
    fn provider_name(&self) -> &'static str {
        "cockroachdb"
    }

    fn is_provider(&self, name: &str) -> bool {
        name == self.provider_name()
    }

    fn name(&self) -> &str {
        "CockroachDB"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Cockroach
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        CAPABILITIES
    }

    /// Same limit as Postgres, the wire protocol is shared.
    fn max_identifier_length(&self) -> usize {
        63
    }

    fn allowed_relation_mode_settings(&self) -> BitFlags<RelationMode> {
        BitFlags::all()
    }

    fn default_relation_mode(&self) -> RelationMode {
        RelationMode::ForeignKeys
    }

    fn foreign_key_referential_actions(&self) -> BitFlags<ReferentialAction> {
        use ReferentialAction::*;

        NoAction | Restrict | Cascade | SetNull | SetDefault
    }

    fn emulated_referential_actions(&self) -> BitFlags<ReferentialAction> {
        use ReferentialAction::*;

        Restrict | SetNull | Cascade
    }

    fn allows_set_null_referential_action_on_non_nullable_fields(&self, relation_mode: RelationMode) -> bool {
        relation_mode.uses_foreign_keys()
    }

    fn supported_index_types(&self) -> BitFlags<IndexAlgorithm> {
        IndexAlgorithm::BTree | IndexAlgorithm::Gin
    }

    fn should_suggest_missing_referencing_fields_indexes(&self) -> bool {
        true
    }

    fn constraint_violation_scopes(&self) -> &'static [ConstraintScope] {
        CONSTRAINT_SCOPES
    }

    fn validate_url(&self, url: &str) -> Result<(), UrlError> {
        if url.starts_with("env:") {
            return Ok(());
        }

        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(UrlError::WrongProtocol { expected: "`postgresql://` or `postgres://`" });
        }

        Ok(())
    }
}

impl NativeTypes for CockroachDatamodelConnector {
    fn available_native_type_constructors(&self) -> &'static [NativeTypeConstructor] {
        CockroachType::CONSTRUCTORS
    }

    fn parse_native_type(
        &self,
        name: &str,
        args: &[String],
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> Option<NativeTypeInstance> {
        CockroachType::from_parts(self.name(), name, args, span, diagnostics)
            .map(CockroachType::with_default_precision)
            .map(NativeTypeInstance::Cockroach)
    }

    fn scalar_type_for_native_type(&self, native_type: &NativeTypeInstance) -> Option<ScalarType> {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::Cockroach(native_type) = native_type else {
            return None;
        };

        let scalar_type = match native_type {
            // String
            CockroachType::Char(_)
            | CockroachType::CatalogSingleChar
            | CockroachType::String(_)
            | CockroachType::Bit(_)
            | CockroachType::VarBit(_)
            | CockroachType::Uuid
            | CockroachType::Inet => ScalarType::String,
            // Boolean
            CockroachType::Bool => ScalarType::Boolean,
            // Int
            CockroachType::Int2 | CockroachType::Int4 | CockroachType::Oid => ScalarType::Int,
            // BigInt
            CockroachType::Int8 => ScalarType::BigInt,
            // Float
            CockroachType::Float4 | CockroachType::Float8 => ScalarType::Float,
            // Decimal
            CockroachType::Decimal(_) => ScalarType::Decimal,
            // DateTime
            CockroachType::Timestamp(_)
            | CockroachType::Timestamptz(_)
            | CockroachType::Date
            | CockroachType::Time(_)
            | CockroachType::Timetz(_) => ScalarType::DateTime,
            // Json
            CockroachType::JsonB => ScalarType::Json,
            // Bytes
            CockroachType::Bytes => ScalarType::Bytes,
        };

        Some(scalar_type)
    }

    fn default_native_type_for_scalar_type(&self, scalar_type: ScalarType) -> Option<NativeTypeInstance> {
        SCALAR_TYPE_DEFAULTS
            .iter()
            .find(|(st, _)| *st == scalar_type)
            .map(|(_, native_type)| NativeTypeInstance::Cockroach(*native_type))
    }

    fn validate_native_type_arguments(
        &self,
        native_type_instance: &NativeTypeInstance,
        _scalar_type: ScalarType,
        span: Span,
        errors: &mut Diagnostics,
    ) {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::Cockroach(native_type) = native_type_instance else {
            return;
        };

        let error = self.native_instance_error(native_type_instance);

        match native_type {
            CockroachType::Decimal(Some((precision, scale))) if scale > precision => {
                errors.push_error(error.new_scale_larger_than_precision_error(span))
            }
            CockroachType::Decimal(Some((prec, _))) if *prec > 1000 || *prec == 0 => {
                errors.push_error(error.new_argument_m_out_of_range_error(
                    "Precision must be positive with a maximum value of 1000.",
                    span,
                ))
            }
            CockroachType::Bit(Some(0)) | CockroachType::VarBit(Some(0)) => {
                errors.push_error(error.new_argument_m_out_of_range_error("M must be a positive integer.", span))
            }
            CockroachType::Timestamp(Some(p))
            | CockroachType::Timestamptz(Some(p))
            | CockroachType::Time(Some(p))
            | CockroachType::Timetz(Some(p))
                if *p > 6 =>
            {
                errors.push_error(error.new_argument_m_out_of_range_error("M can range from 0 to 6.", span))
            }
            _ => (),
        }
    }
}

impl ValidationHooks for CockroachDatamodelConnector {
    fn validate_datasource(&self, _: PreviewFeatures, _: &Datasource, _: &mut Diagnostics) {}

    fn validate_model(&self, model: ModelWalker<'_>, _: RelationMode, diagnostics: &mut Diagnostics) {
        validations::autoincrement_validations(model, diagnostics);

        for index in model.indexes() {
            validations::inverted_index_validations(index, diagnostics);
        }
    }

    fn validate_view(&self, _: ModelWalker<'_>, _: &mut Diagnostics) {}

    fn validate_enum(&self, _: walkers::EnumWalker<'_>, _: &mut Diagnostics) {}

    fn validate_relation_field(&self, _: walkers::RelationFieldWalker<'_>, _: &mut Diagnostics) {}

    /// `sequence()` is a known default function on CockroachDB.
    fn validate_scalar_field_unknown_default_functions(&self, db: &SchemaGraph, diagnostics: &mut Diagnostics) {
        for default in walk_scalar_field_defaults_with_unknown_function(db) {
            let Some((func_name, args, span)) = default.value().as_function() else {
                continue;
            };

            match func_name {
                "sequence" => validations::sequence_arguments(args, diagnostics),
                _ => diagnostics.push_error(DatamodelError::new_default_unknown_function(func_name, span)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel_connector::Connector;
    use schema_graph::{Expression, SchemaBuilder};

    const COCKROACH: &dyn Connector = &CockroachDatamodelConnector;

    #[test]
    fn string_is_the_default_for_string_fields() {
        let native_type = COCKROACH.default_native_type_for_scalar_type(ScalarType::String).unwrap();

        assert_eq!(COCKROACH.native_type_to_string(&native_type), "String");
        assert_eq!(
            COCKROACH.native_type_to_string(&COCKROACH.default_native_type_for_scalar_type(ScalarType::DateTime).unwrap()),
            "Timestamp(3)"
        );
    }

    #[test]
    fn only_btree_and_gin_indexes() {
        assert!(COCKROACH.supports_index_type(IndexAlgorithm::Gin));
        assert!(!COCKROACH.supports_index_type(IndexAlgorithm::Hash));
        assert!(!COCKROACH.supports_index_type(IndexAlgorithm::SpGist));
    }

    #[test]
    fn sequence_is_a_known_default_function() {
        let mut schema = SchemaBuilder::new();
        let model = schema.model("Counter");
        model
            .scalar("id", ScalarType::BigInt)
            .id()
            .default_value(Expression::function("sequence", vec![Expression::numeric(10)]));
        model
            .scalar("other", ScalarType::Int)
            .default_value(Expression::function("serial", vec![]));

        let graph = schema.finish().unwrap();
        let mut diagnostics = Diagnostics::new();
        COCKROACH.validate_scalar_field_unknown_default_functions(&graph, &mut diagnostics);

        let messages: Vec<String> = diagnostics.errors().map(|err| err.message()).collect();
        let expected = expect_test::expect![[r#"
            [
                "Unknown function in @default(): `serial` is not known. You can read about the available functions here: https://pris.ly/d/attribute-functions",
            ]
        "#]];
        expected.assert_debug_eq(&messages);
    }

    #[test]
    fn autoincrement_needs_a_bigint() {
        let mut schema = SchemaBuilder::new();
        schema
            .model("Counter")
            .scalar("id", ScalarType::Int)
            .id()
            .default_fn("autoincrement");

        let graph = schema.finish().unwrap();
        let mut diagnostics = Diagnostics::new();
        let model = graph.walk_models().next().unwrap();
        COCKROACH.validate_model(model, RelationMode::ForeignKeys, &mut diagnostics);

        assert_eq!(diagnostics.errors().count(), 1);
    }
}
