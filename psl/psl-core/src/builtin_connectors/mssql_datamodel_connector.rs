mod native_types;
mod validations;

pub use native_types::{MsSqlType, MsSqlTypeParameter};

use crate::{
    Datasource, PreviewFeatures,
    datamodel_connector::{
        CapabilityQueries, ConnectorCapabilities, ConnectorCapability, ConstraintScope, Flavour, NativeTypeConstructor,
        NativeTypeInstance, NativeTypes, RelationMode, UrlError, ValidationHooks, report_unknown_default_functions,
    },
};
use MsSqlType::*;
use MsSqlTypeParameter::*;
use diagnostics::{Diagnostics, Span};
use enumflags2::BitFlags;
use schema_graph::{IndexAlgorithm, ReferentialAction, ScalarType, SchemaGraph, walkers};

const CONSTRAINT_SCOPES: &[ConstraintScope] = &[
    ConstraintScope::GlobalPrimaryKeyForeignKeyDefault,
    ConstraintScope::ModelPrimaryKeyKeyIndex,
];

pub(crate) const CAPABILITIES: ConnectorCapabilities = enumflags2::make_bitflags!(ConnectorCapability::{
    AnyId |
    AutoIncrement |
    AutoIncrementAllowedOnNonId |
    AutoIncrementMultipleAllowed |
    AutoIncrementNonIndexedAllowed |
    CompoundIds |
    MultiSchema |
    NamedDefaultValues |
    NamedForeignKeys |
    NamedPrimaryKeys |
    ReferenceCycleDetection |
    PrimaryKeySortOrderDefinition |
    ImplicitManyToManyRelation |
    DecimalType |
    ClusteringSetting |
    Views
});

pub struct MsSqlDatamodelConnector;

const SCALAR_TYPE_DEFAULTS: &[(ScalarType, MsSqlType)] = &[
    (ScalarType::Int, MsSqlType::Int),
    (ScalarType::BigInt, MsSqlType::BigInt),
    (ScalarType::Float, MsSqlType::Float(Some(53))),
    (ScalarType::Decimal, MsSqlType::Decimal(Some((32, 16)))),
    (ScalarType::Boolean, MsSqlType::Bit),
    (ScalarType::String, MsSqlType::NVarChar(Some(MsSqlTypeParameter::Number(1000)))),
    (ScalarType::DateTime, MsSqlType::DateTime2(Some(7))),
    (ScalarType::Bytes, MsSqlType::VarBinary(Some(MsSqlTypeParameter::Max))),
    (ScalarType::Json, MsSqlType::NVarChar(Some(MsSqlTypeParameter::Number(1000)))),
];

impl CapabilityQueries for MsSqlDatamodelConnector {
    fn provider_name(&self) -> &'static str {
        "sqlserver"
    }

    fn is_provider(&self, name: &str) -> bool {
        name == self.provider_name()
    }

    fn name(&self) -> &str {
        "SQL Server"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Sqlserver
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        CAPABILITIES
    }

    fn max_identifier_length(&self) -> usize {
        128
    }

    fn allowed_relation_mode_settings(&self) -> BitFlags<RelationMode> {
        BitFlags::all()
    }

    fn default_relation_mode(&self) -> RelationMode {
        RelationMode::ForeignKeys
    }

    fn foreign_key_referential_actions(&self) -> BitFlags<ReferentialAction> {
        use ReferentialAction::*;

        NoAction | Cascade | SetNull | SetDefault
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

        if !url.starts_with("sqlserver://") {
            return Err(UrlError::WrongProtocol { expected: "`sqlserver://`" });
        }

        Ok(())
    }
}

impl NativeTypes for MsSqlDatamodelConnector {
    fn available_native_type_constructors(&self) -> &'static [NativeTypeConstructor] {
        MsSqlType::CONSTRUCTORS
    }

    fn parse_native_type(
        &self,
        name: &str,
        args: &[String],
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> Option<NativeTypeInstance> {
        MsSqlType::from_parts(self.name(), name, args, span, diagnostics)
            .map(MsSqlType::with_default_precision)
            .map(NativeTypeInstance::MsSql)
    }

    fn scalar_type_for_native_type(&self, native_type: &NativeTypeInstance) -> Option<ScalarType> {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::MsSql(native_type) = native_type else {
            return None;
        };

        let scalar_type = match native_type {
            //String
            Char(_) | NChar(_) | VarChar(_) | NVarChar(_) | Text | NText | Xml | UniqueIdentifier => {
                ScalarType::String
            }
            //Int
            TinyInt | SmallInt | Int => ScalarType::Int,
            //BigInt
            BigInt => ScalarType::BigInt,
            //Float
            Float(_) | SmallMoney | Money | Real => ScalarType::Float,
            //Decimal
            Decimal(_) => ScalarType::Decimal,
            //DateTime
            Date | Time(_) | DateTime | DateTime2(_) | SmallDateTime | DateTimeOffset(_) => ScalarType::DateTime,
            //Bytes
            Binary(_) | VarBinary(_) | Image => ScalarType::Bytes,
            //Boolean
            Bit => ScalarType::Boolean,
        };

        Some(scalar_type)
    }

    fn default_native_type_for_scalar_type(&self, scalar_type: ScalarType) -> Option<NativeTypeInstance> {
        SCALAR_TYPE_DEFAULTS
            .iter()
            .find(|(st, _)| *st == scalar_type)
            .map(|(_, native_type)| NativeTypeInstance::MsSql(*native_type))
    }

    fn validate_native_type_arguments(
        &self,
        native_type: &NativeTypeInstance,
        _scalar_type: ScalarType,
        span: Span,
        errors: &mut Diagnostics,
    ) {
        #[allow(irrefutable_let_patterns)]
        let NativeTypeInstance::MsSql(r#type) = native_type else {
            return;
        };

        let error = self.native_instance_error(native_type);

        match r#type {
            Decimal(Some((precision, scale))) if scale > precision => {
                errors.push_error(error.new_scale_larger_than_precision_error(span));
            }
            Decimal(Some((prec, _))) if *prec == 0 || *prec > 38 => {
                errors.push_error(error.new_argument_m_out_of_range_error("Precision can range from 1 to 38.", span));
            }
            Decimal(Some((_, scale))) if *scale > 38 => {
                errors.push_error(error.new_argument_m_out_of_range_error("Scale can range from 0 to 38.", span))
            }
            Float(Some(bits)) if *bits == 0 || *bits > 53 => {
                errors.push_error(error.new_argument_m_out_of_range_error("Bits can range from 1 to 53.", span))
            }
            NVarChar(Some(Number(p))) if *p == 0 || *p > 4000 => {
                errors.push_error(error.new_argument_m_out_of_range_error(
                    "Length can range from 1 to 4000. For larger sizes, use the `Max` variant.",
                    span,
                ))
            }
            VarChar(Some(Number(p))) | VarBinary(Some(Number(p))) if *p == 0 || *p > 8000 => {
                errors.push_error(error.new_argument_m_out_of_range_error(
                    r#"Length can range from 1 to 8000. For larger sizes, use the `Max` variant."#,
                    span,
                ))
            }
            NChar(Some(p)) if *p == 0 || *p > 4000 => {
                errors.push_error(error.new_argument_m_out_of_range_error("Length can range from 1 to 4000.", span))
            }
            Char(Some(p)) | Binary(Some(p)) if *p == 0 || *p > 8000 => {
                errors.push_error(error.new_argument_m_out_of_range_error("Length can range from 1 to 8000.", span))
            }
            Time(Some(p)) | DateTime2(Some(p)) | DateTimeOffset(Some(p)) if *p > 7 => {
                errors.push_error(error.new_argument_m_out_of_range_error("Precision can range from 0 to 7.", span))
            }
            _ => (),
        }
    }
}

impl ValidationHooks for MsSqlDatamodelConnector {
    fn validate_datasource(&self, _: PreviewFeatures, _: &Datasource, _: &mut Diagnostics) {}

    fn validate_model(&self, model: walkers::ModelWalker<'_>, _: RelationMode, errors: &mut Diagnostics) {
        for index in model.indexes() {
            validations::index_uses_correct_field_types(self, index, errors);
        }

        if let Some(pk) = model.primary_key() {
            validations::primary_key_uses_correct_field_types(self, pk, errors);
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
    use schema_graph::SchemaBuilder;

    const MSSQL: &dyn Connector = &MsSqlDatamodelConnector;

    fn argument_errors(name: &str, args: &[&str]) -> Vec<String> {
        let mut diagnostics = Diagnostics::new();
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        let parsed = MSSQL.parse_native_type(name, &args, Span::empty(), &mut diagnostics).unwrap();

        let constructor = MSSQL.find_native_type_constructor(name).unwrap();
        MSSQL.validate_native_type_arguments(&parsed, constructor.prisma_types[0], Span::empty(), &mut diagnostics);

        diagnostics.errors().map(|err| err.message()).collect()
    }

    #[test]
    fn nvarchar_length_points_to_max() {
        let expected = expect_test::expect![[r#"
            [
                "Argument M is out of range for native type `NVarChar(4001)` of SQL Server: Length can range from 1 to 4000. For larger sizes, use the `Max` variant.",
            ]
        "#]];
        expected.assert_debug_eq(&argument_errors("NVarChar", &["4001"]));

        assert!(argument_errors("NVarChar", &["Max"]).is_empty());
    }

    #[test]
    fn float_bits_and_decimal_precision() {
        assert_eq!(argument_errors("Float", &["54"]).len(), 1);
        assert_eq!(argument_errors("Decimal", &["39", "2"]).len(), 1);
        assert!(argument_errors("Decimal", &["38", "38"]).is_empty());
    }

    #[test]
    fn json_is_stored_as_nvarchar() {
        let native_type = MSSQL.default_native_type_for_scalar_type(ScalarType::Json).unwrap();

        assert_eq!(MSSQL.native_type_to_string(&native_type), "NVarChar(1000)");
        assert_eq!(
            MSSQL.native_type_to_parts(&MSSQL.default_native_type_for_scalar_type(ScalarType::Bytes).unwrap()),
            ("VarBinary", vec!["Max".to_owned()])
        );
    }

    #[test]
    fn heap_allocated_columns_cannot_be_indexed() {
        let mut schema = SchemaBuilder::new();
        let model = schema.model("Post");
        model.scalar("id", ScalarType::Int).id();
        model.scalar("body", ScalarType::String).native_type("db", "NVarChar", &["Max"]);
        model.index(["body"]);

        let graph = schema.finish().unwrap();
        let mut diagnostics = Diagnostics::new();
        MSSQL.validate_model(graph.walk_models().next().unwrap(), RelationMode::ForeignKeys, &mut diagnostics);

        let expected = expect_test::expect![[r#"
            [
                "You cannot define an index on fields with native type `NVarChar(Max)` of SQL Server.",
            ]
        "#]];
        expected.assert_debug_eq(&diagnostics.errors().map(|e| e.message()).collect::<Vec<_>>());
    }
}
