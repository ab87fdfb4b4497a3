mod native_types;
mod validations;

pub use native_types::PostgresType;

use crate::{
    Datasource, PreviewFeatures,
    datamodel_connector::{
        CapabilityQueries, ConnectorCapabilities, ConnectorCapability, ConstraintScope, Flavour, NativeTypeConstructor,
        NativeTypeInstance, NativeTypes, RelationMode, UrlError, ValidationHooks, report_unknown_default_functions,
    },
};
use PostgresType::*;
use diagnostics::{Diagnostics, Span};
use enumflags2::BitFlags;
use schema_graph::{IndexAlgorithm, ReferentialAction, ScalarType, SchemaGraph, walkers};

const CONSTRAINT_SCOPES: &[ConstraintScope] = &[
    ConstraintScope::GlobalPrimaryKeyKeyIndex,
    ConstraintScope::ModelPrimaryKeyKeyIndexForeignKey,
];

pub(crate) const CAPABILITIES: ConnectorCapabilities = enumflags2::make_bitflags!(ConnectorCapability::{
    AnyId |
    AutoIncrement |
    AutoIncrementAllowedOnNonId |
    AutoIncrementMultipleAllowed |
    AutoIncrementNonIndexedAllowed |
    CompoundIds |
    Enums |
    Json |
    JsonLists |
    MultiSchema |
    NamedForeignKeys |
    NamedPrimaryKeys |
    RelationFieldsInArbitraryOrder |
    ScalarLists |
    ImplicitManyToManyRelation |
    DecimalType |
    UsingHashIndex |
    Views
});

pub struct PostgresDatamodelConnector;

const SCALAR_TYPE_DEFAULTS: &[(ScalarType, PostgresType)] = &[
    (ScalarType::Int, PostgresType::Integer),
    (ScalarType::BigInt, PostgresType::BigInt),
    (ScalarType::Float, PostgresType::DoublePrecision),
    (ScalarType::Decimal, PostgresType::Decimal(Some((65, 30)))),
    (ScalarType::Boolean, PostgresType::Boolean),
    (ScalarType::String, PostgresType::Text),
    (ScalarType::DateTime, PostgresType::Timestamp(Some(3))),
    (ScalarType::Bytes, PostgresType::ByteA),
    (ScalarType::Json, PostgresType::JsonB),
];

impl CapabilityQueries for PostgresDatamodelConnector {
    fn provider_name(&self) -> &'static str {
        "postgresql"
    }

    fn is_provider(&self, name: &str) -> bool {
        ["postgresql", "postgres"].contains(&name)
    }

    fn name(&self) -> &str {
        "Postgres"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Postgres
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        CAPABILITIES
    }

    /// The maximum length of postgres identifiers, in bytes.
    ///
    /// Reference: <https://www.postgresql.org/docs/12/limits.html>
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

    /// Postgres accepts table definitions with a SET NULL referential action referencing a non-nullable field,
    /// although that would lead to a runtime error once the action is actually triggered.
    fn allows_set_null_referential_action_on_non_nullable_fields(&self, relation_mode: RelationMode) -> bool {
        relation_mode.uses_foreign_keys()
    }

    fn supported_index_types(&self) -> BitFlags<IndexAlgorithm> {
        BitFlags::all()
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

        let accepted = ["postgres://", "postgresql://", "prisma+postgres://"];

        if !accepted.iter().any(|prefix| url.starts_with(prefix)) {
            return Err(UrlError::WrongProtocol { expected: "`postgresql://` or `postgres://`" });
        }

        Ok(())
    }
}

impl NativeTypes for PostgresDatamodelConnector {
    fn available_native_type_constructors(&self) -> &'static [NativeTypeConstructor] {
        PostgresType::CONSTRUCTORS
    }

    fn parse_native_type(
        &self,
        name: &str,
        args: &[String],
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> Option<NativeTypeInstance> {
        PostgresType::from_parts(self.name(), name, args, span, diagnostics)
            .map(PostgresType::with_default_precision)
            .map(NativeTypeInstance::Postgres)
    }

    fn scalar_type_for_native_type(&self, native_type: &NativeTypeInstance) -> Option<ScalarType> {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::Postgres(native_type) = native_type else {
            return None;
        };

        let scalar_type = match native_type {
            // String
            Text | Char(_) | VarChar(_) | Bit(_) | VarBit(_) | Uuid | Xml | Inet | Citext => ScalarType::String,
            // Boolean
            Boolean => ScalarType::Boolean,
            // Int
            SmallInt | Integer | Oid => ScalarType::Int,
            // BigInt
            BigInt => ScalarType::BigInt,
            // Float
            Real | DoublePrecision => ScalarType::Float,
            // Decimal
            Decimal(_) | Money => ScalarType::Decimal,
            // DateTime
            Timestamp(_) | Timestamptz(_) | Date | Time(_) | Timetz(_) => ScalarType::DateTime,
            // Json
            Json | JsonB => ScalarType::Json,
            // Bytes
            ByteA => ScalarType::Bytes,
        };

        Some(scalar_type)
    }

    fn default_native_type_for_scalar_type(&self, scalar_type: ScalarType) -> Option<NativeTypeInstance> {
        SCALAR_TYPE_DEFAULTS
            .iter()
            .find(|(st, _)| *st == scalar_type)
            .map(|(_, native_type)| NativeTypeInstance::Postgres(*native_type))
    }

    fn validate_native_type_arguments(
        &self,
        native_type_instance: &NativeTypeInstance,
        _scalar_type: ScalarType,
        span: Span,
        errors: &mut Diagnostics,
    ) {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::Postgres(native_type) = native_type_instance else {
            return;
        };

        let error = self.native_instance_error(native_type_instance);

        match native_type {
            Decimal(Some((precision, scale))) if scale > precision => {
                errors.push_error(error.new_scale_larger_than_precision_error(span))
            }
            Decimal(Some((prec, _))) if *prec > 1000 || *prec == 0 => {
                errors.push_error(error.new_argument_m_out_of_range_error(
                    "Precision must be positive with a maximum value of 1000.",
                    span,
                ))
            }
            Bit(Some(0)) | VarBit(Some(0)) => {
                errors.push_error(error.new_argument_m_out_of_range_error("M must be a positive integer.", span))
            }
            nt if nt.time_precision().is_some_and(|p| p > 6) => {
                errors.push_error(error.new_argument_m_out_of_range_error("M can range from 0 to 6.", span))
            }
            _ => (),
        }
    }
}

impl ValidationHooks for PostgresDatamodelConnector {
    fn validate_datasource(&self, _: PreviewFeatures, _: &Datasource, _: &mut Diagnostics) {}

    fn validate_model(&self, model: walkers::ModelWalker<'_>, _: RelationMode, errors: &mut Diagnostics) {
        for index in model.indexes() {
            validations::compatible_native_types(index, self, errors);
            validations::generalized_index_validations(index, self, errors);
            validations::spgist_indexed_column_count(index, errors);
        }
    }

    fn validate_view(&self, _: walkers::ModelWalker<'_>, _: &mut Diagnostics) {}

    fn validate_enum(&self, _: walkers::EnumWalker<'_>, _: &mut Diagnostics) {}

    fn validate_relation_field(&self, _: walkers::RelationFieldWalker<'_>, _: &mut Diagnostics) {}

    fn validate_scalar_field_unknown_default_functions(&self, db: &SchemaGraph, diagnostics: &mut Diagnostics) {
        report_unknown_default_functions(db, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel_connector::Connector;

    const POSTGRES: &dyn Connector = &PostgresDatamodelConnector;

    fn parse(name: &str, args: &[&str]) -> (Option<NativeTypeInstance>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        let parsed = POSTGRES.parse_native_type(name, &args, Span::empty(), &mut diagnostics);

        (parsed, diagnostics)
    }

    fn argument_errors(name: &str, args: &[&str], scalar_type: ScalarType) -> Vec<String> {
        let (parsed, _) = parse(name, args);
        let mut diagnostics = Diagnostics::new();

        POSTGRES.validate_native_type_arguments(&parsed.unwrap(), scalar_type, Span::empty(), &mut diagnostics);

        diagnostics.errors().map(|err| err.message()).collect()
    }

    #[test]
    fn decimal_precision_is_bounded() {
        let errors = argument_errors("Decimal", &["1001", "2"], ScalarType::Decimal);

        let expected = expect_test::expect![[r#"
            [
                "Argument M is out of range for native type `Decimal(1001,2)` of Postgres: Precision must be positive with a maximum value of 1000.",
            ]
        "#]];
        expected.assert_debug_eq(&errors);
    }

    #[test]
    fn bit_length_must_be_positive() {
        assert_eq!(argument_errors("VarBit", &["0"], ScalarType::String).len(), 1);
        assert!(argument_errors("VarBit", &["1"], ScalarType::String).is_empty());
    }

    #[test]
    fn time_precision_is_at_most_six() {
        assert!(argument_errors("Timestamptz", &["6"], ScalarType::DateTime).is_empty());
        assert_eq!(
            argument_errors("Timetz", &["7"], ScalarType::DateTime),
            vec!["Argument M is out of range for native type `Timetz(7)` of Postgres: M can range from 0 to 6."]
        );
    }

    #[test]
    fn both_provider_names_resolve() {
        assert!(POSTGRES.is_provider("postgres"));
        assert!(POSTGRES.is_provider("postgresql"));
        assert!(!POSTGRES.is_provider("cockroachdb"));
    }

    #[test]
    fn url_prefixes() {
        assert!(POSTGRES.validate_url("postgresql://localhost:5432/db").is_ok());
        assert!(POSTGRES.validate_url("prisma+postgres://accelerate.prisma-data.net").is_ok());
        assert_eq!(
            POSTGRES.validate_url("mysql://localhost").unwrap_err().to_string(),
            "must start with the protocol `postgresql://` or `postgres://`."
        );
    }

    #[test]
    fn defaults_round_trip_through_their_rendered_form() {
        for scalar_type in ScalarType::ALL {
            let native_type = POSTGRES.default_native_type_for_scalar_type(*scalar_type).unwrap();
            let rendered = POSTGRES.native_type_to_string(&native_type);
            let (name, args) = crate::datamodel_connector::split_native_type_string(&rendered);
            let (reparsed, diagnostics) = parse(name, &args.iter().map(String::as_str).collect::<Vec<_>>());

            assert!(!diagnostics.has_errors(), "{rendered}");
            assert_eq!(reparsed, Some(native_type));
            assert_eq!(POSTGRES.scalar_type_for_native_type(&native_type), Some(*scalar_type));
        }
    }
}
