mod native_types;
mod validations;

pub use native_types::MySqlType;

use crate::{
    Datasource, PreviewFeatures,
    datamodel_connector::{
        CapabilityQueries, ConnectorCapabilities, ConnectorCapability, ConstraintScope, Flavour, NativeTypeConstructor,
        NativeTypeInstance, NativeTypes, RelationMode, UrlError, ValidationHooks, report_unknown_default_functions,
    },
};
use MySqlType::*;
use diagnostics::{DatamodelError, Diagnostics, Span};
use enumflags2::BitFlags;
use schema_graph::{IndexAlgorithm, ReferentialAction, ScalarType, SchemaGraph, walkers};

pub(crate) const CAPABILITIES: ConnectorCapabilities = enumflags2::make_bitflags!(ConnectorCapability::{
    Enums |
    Json |
    AutoIncrementAllowedOnNonId |
    RelationFieldsInArbitraryOrder |
    AutoIncrement |
    CompoundIds |
    AnyId |
    NamedForeignKeys |
    IndexColumnLengthPrefixing |
    MultiSchema |
    FullTextIndex |
    MultipleFullTextAttributesPerModel |
    ImplicitManyToManyRelation |
    DecimalType |
    Views
});

const CONSTRAINT_SCOPES: &[ConstraintScope] = &[ConstraintScope::GlobalForeignKey, ConstraintScope::ModelKeyIndex];

pub struct MySqlDatamodelConnector;

const SCALAR_TYPE_DEFAULTS: &[(ScalarType, MySqlType)] = &[
    (ScalarType::Int, MySqlType::Int),
    (ScalarType::BigInt, MySqlType::BigInt),
    (ScalarType::Float, MySqlType::Double),
    (ScalarType::Decimal, MySqlType::Decimal(Some((65, 30)))),
    (ScalarType::Boolean, MySqlType::TinyInt),
    (ScalarType::String, MySqlType::VarChar(191)),
    (ScalarType::DateTime, MySqlType::DateTime(Some(3))),
    (ScalarType::Bytes, MySqlType::LongBlob),
    (ScalarType::Json, MySqlType::Json),
];

impl CapabilityQueries for MySqlDatamodelConnector {
    fn provider_name(&self) -> &'static str {
        "mysql"
    }

    fn is_provider(&self, name: &str) -> bool {
        name == self.provider_name()
    }

    fn name(&self) -> &str {
        "MySQL"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Mysql
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        CAPABILITIES
    }

    fn max_identifier_length(&self) -> usize {
        64
    }

    fn allowed_relation_mode_settings(&self) -> BitFlags<RelationMode> {
        BitFlags::all()
    }

    fn default_relation_mode(&self) -> RelationMode {
        RelationMode::ForeignKeys
    }

    fn foreign_key_referential_actions(&self) -> BitFlags<ReferentialAction> {
        use ReferentialAction::*;

        Restrict | Cascade | SetNull | NoAction | SetDefault
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
        true
    }

    fn constraint_violation_scopes(&self) -> &'static [ConstraintScope] {
        CONSTRAINT_SCOPES
    }

    fn validate_url(&self, url: &str) -> Result<(), UrlError> {
        if url.starts_with("env:") {
            return Ok(());
        }

        if !url.starts_with("mysql://") {
            return Err(UrlError::WrongProtocol { expected: "`mysql://`" });
        }

        Ok(())
    }
}

impl NativeTypes for MySqlDatamodelConnector {
    fn available_native_type_constructors(&self) -> &'static [NativeTypeConstructor] {
        MySqlType::CONSTRUCTORS
    }

    fn parse_native_type(
        &self,
        name: &str,
        args: &[String],
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> Option<NativeTypeInstance> {
        MySqlType::from_parts(self.name(), name, args, span, diagnostics)
            .map(MySqlType::with_default_precision)
            .map(NativeTypeInstance::Mysql)
    }

    fn scalar_type_for_native_type(&self, native_type: &NativeTypeInstance) -> Option<ScalarType> {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::Mysql(native_type) = native_type else {
            return None;
        };

        let scalar_type = match native_type {
            VarChar(_) | Text | Char(_) | TinyText | MediumText | LongText => ScalarType::String,
            Bit(1) => ScalarType::Boolean,
            Int | SmallInt | MediumInt | Year | TinyInt => ScalarType::Int,
            UnsignedInt | UnsignedSmallInt | UnsignedTinyInt | UnsignedMediumInt => ScalarType::Int,
            BigInt | UnsignedBigInt => ScalarType::BigInt,
            Float | Double => ScalarType::Float,
            Decimal(_) => ScalarType::Decimal,
            DateTime(_) | Date | Time(_) | Timestamp(_) => ScalarType::DateTime,
            Json => ScalarType::Json,
            LongBlob | Binary(_) | VarBinary(_) | TinyBlob | Blob | MediumBlob | Bit(_) => ScalarType::Bytes,
        };

        Some(scalar_type)
    }

    fn default_native_type_for_scalar_type(&self, scalar_type: ScalarType) -> Option<NativeTypeInstance> {
        SCALAR_TYPE_DEFAULTS
            .iter()
            .find(|(st, _)| *st == scalar_type)
            .map(|(_, native_type)| NativeTypeInstance::Mysql(*native_type))
    }

    fn validate_native_type_arguments(
        &self,
        native_type_instance: &NativeTypeInstance,
        scalar_type: ScalarType,
        span: Span,
        errors: &mut Diagnostics,
    ) {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::Mysql(native_type) = native_type_instance else {
            return;
        };

        let error = self.native_instance_error(native_type_instance);

        match native_type {
            Decimal(Some((precision, scale))) if scale > precision => {
                errors.push_error(error.new_scale_larger_than_precision_error(span))
            }
            Decimal(Some((precision, _))) if *precision == 0 || *precision > 65 => {
                errors.push_error(error.new_argument_m_out_of_range_error("Precision can range from 1 to 65.", span))
            }
            Decimal(Some((_, scale))) if *scale > 30 => {
                errors.push_error(error.new_argument_m_out_of_range_error("Scale can range from 0 to 30.", span))
            }
            Bit(length) if *length == 0 || *length > 64 => {
                errors.push_error(error.new_argument_m_out_of_range_error("M can range from 1 to 64.", span))
            }
            Char(length) if *length > 255 => {
                errors.push_error(error.new_argument_m_out_of_range_error("M can range from 0 to 255.", span))
            }
            VarChar(length) if *length > 65535 => {
                errors.push_error(error.new_argument_m_out_of_range_error("M can range from 0 to 65,535.", span))
            }
            Bit(n) if *n > 1 && scalar_type == ScalarType::Boolean => {
                errors.push_error(error.new_argument_m_out_of_range_error("only Bit(1) can be used as Boolean.", span))
            }
            nt if nt.timestamp_precision().is_some_and(|p| p > 6) => {
                errors.push_error(error.new_argument_m_out_of_range_error("M can range from 0 to 6.", span))
            }
            _ => (),
        }
    }
}

impl ValidationHooks for MySqlDatamodelConnector {
    fn validate_datasource(&self, _: PreviewFeatures, _: &Datasource, _: &mut Diagnostics) {}

    fn validate_model(&self, model: walkers::ModelWalker<'_>, relation_mode: RelationMode, errors: &mut Diagnostics) {
        for index in model.indexes() {
            validations::field_types_can_be_used_in_an_index(self, index, errors);
        }

        if let Some(pk) = model.primary_key() {
            validations::field_types_can_be_used_in_a_primary_key(self, pk, errors);
        }

        if relation_mode.uses_foreign_keys() {
            for field in model.relation_fields() {
                validations::uses_native_referential_action_set_default(self, field, errors);
            }
        }
    }

    fn validate_view(&self, _: walkers::ModelWalker<'_>, _: &mut Diagnostics) {}

    fn validate_enum(&self, r#enum: walkers::EnumWalker<'_>, diagnostics: &mut Diagnostics) {
        if let Some((_, span)) = r#enum.schema() {
            diagnostics.push_error(DatamodelError::new_static(
                "MySQL enums do not belong to a schema.",
                span,
            ));
        }
    }

    fn validate_relation_field(&self, _: walkers::RelationFieldWalker<'_>, _: &mut Diagnostics) {}

    fn validate_scalar_field_unknown_default_functions(&self, db: &SchemaGraph, diagnostics: &mut Diagnostics) {
        report_unknown_default_functions(db, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel_connector::Connector;

    const MYSQL: &dyn Connector = &MySqlDatamodelConnector;

    fn parse(name: &str, args: &[&str]) -> (Option<NativeTypeInstance>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        let parsed = MYSQL.parse_native_type(name, &args, Span::empty(), &mut diagnostics);

        (parsed, diagnostics)
    }

    #[test]
    fn bit_wider_than_one_cannot_back_a_boolean() {
        let (parsed, _) = parse("Bit", &["2"]);
        let mut diagnostics = Diagnostics::new();

        MYSQL.validate_native_type_arguments(&parsed.unwrap(), ScalarType::Boolean, Span::empty(), &mut diagnostics);

        let expected = expect_test::expect![[
            "Argument M is out of range for native type `Bit(2)` of MySQL: only Bit(1) can be used as Boolean."
        ]];
        expected.assert_eq(&diagnostics.errors().next().unwrap().message());
    }

    #[test]
    fn unknown_native_types_name_the_connector() {
        let (parsed, diagnostics) = parse("Money", &[]);

        assert!(parsed.is_none());
        assert_eq!(
            diagnostics.errors().next().unwrap().message(),
            "Native type Money is not supported for MySQL connector."
        );
    }

    #[test]
    fn every_scalar_type_has_a_default_native_type() {
        for scalar_type in ScalarType::ALL {
            let native_type = MYSQL.default_native_type_for_scalar_type(*scalar_type).unwrap();

            assert!(native_type.allowed_scalar_types().contains(scalar_type));
            assert!(MYSQL.native_type_is_default_for_scalar_type(&native_type, *scalar_type));
        }
    }

    #[test]
    fn precision_larger_than_six_is_rejected_on_time_types() {
        let (parsed, _) = parse("DateTime", &["7"]);
        let mut diagnostics = Diagnostics::new();

        MYSQL.validate_native_type_arguments(&parsed.unwrap(), ScalarType::DateTime, Span::empty(), &mut diagnostics);

        assert!(diagnostics.has_errors());
    }
}
