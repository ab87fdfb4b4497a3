use crate::{
    Datasource, PreviewFeatures,
    datamodel_connector::{
        CapabilityQueries, ConnectorCapabilities, ConnectorCapability, ConstraintScope, Flavour, NativeTypeConstructor,
        NativeTypeInstance, RelationMode, NativeTypes, UrlError, ValidationHooks, report_unknown_default_functions,
    },
};
use diagnostics::{DatamodelError, Diagnostics, Span};
use enumflags2::BitFlags;
use schema_graph::{IndexAlgorithm, ReferentialAction, ScalarType, SchemaGraph, walkers};

const NATIVE_TYPE_CONSTRUCTORS: &[NativeTypeConstructor] = &[];
const CONSTRAINT_SCOPES: &[ConstraintScope] = &[ConstraintScope::GlobalKeyIndex];
pub(crate) const CAPABILITIES: ConnectorCapabilities = enumflags2::make_bitflags!(ConnectorCapability::{
    AnyId |
    AutoIncrement |
    CompoundIds |
    RelationFieldsInArbitraryOrder |
    ImplicitManyToManyRelation |
    DecimalType |
    Json |
    Views
});

pub struct SqliteDatamodelConnector;

impl CapabilityQueries for SqliteDatamodelConnector {
    fn provider_name(&self) -> &'static str {
        "sqlite"
    }

    fn is_provider(&self, name: &str) -> bool {
        name == self.provider_name()
    }

    fn name(&self) -> &str {
        "sqlite"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Sqlite
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        CAPABILITIES
    }

    fn max_identifier_length(&self) -> usize {
        10000
    }

    fn allowed_relation_mode_settings(&self) -> BitFlags<RelationMode> {
        BitFlags::all()
    }

    fn default_relation_mode(&self) -> RelationMode {
        RelationMode::ForeignKeys
    }

    fn foreign_key_referential_actions(&self) -> BitFlags<ReferentialAction> {
        use ReferentialAction::*;

        SetNull | SetDefault | Cascade | Restrict | NoAction
    }

    fn emulated_referential_actions(&self) -> BitFlags<ReferentialAction> {
        use ReferentialAction::*;

        Restrict | SetNull | Cascade
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

        if !url.starts_with("file:") {
            return Err(UrlError::WrongProtocol { expected: "`file:`" });
        }

        Ok(())
    }
}

impl NativeTypes for SqliteDatamodelConnector {
    fn available_native_type_constructors(&self) -> &'static [NativeTypeConstructor] {
        NATIVE_TYPE_CONSTRUCTORS
    }

    fn parse_native_type(
        &self,
        _name: &str,
        _args: &[String],
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> Option<NativeTypeInstance> {
        diagnostics.push_error(DatamodelError::new_native_types_not_supported(
            self.name().to_owned(),
            span,
        ));
        None
    }

    fn scalar_type_for_native_type(&self, _native_type: &NativeTypeInstance) -> Option<ScalarType> {
        None
    }

    fn default_native_type_for_scalar_type(&self, _scalar_type: ScalarType) -> Option<NativeTypeInstance> {
        None
    }

    fn validate_native_type_arguments(&self, _: &NativeTypeInstance, _: ScalarType, _: Span, _: &mut Diagnostics) {}
}

impl ValidationHooks for SqliteDatamodelConnector {
    fn validate_datasource(&self, _: PreviewFeatures, _: &Datasource, _: &mut Diagnostics) {}

    fn validate_model(&self, _: walkers::ModelWalker<'_>, _: RelationMode, _: &mut Diagnostics) {}

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

    const SQLITE: &dyn Connector = &SqliteDatamodelConnector;

    #[test]
    fn native_types_are_rejected_with_the_connector_name() {
        let mut diagnostics = Diagnostics::new();
        let parsed = SQLITE.parse_native_type("VarChar", &["10".to_owned()], Span::empty(), &mut diagnostics);

        assert!(parsed.is_none());

        let expected = expect_test::expect!["Native types are not supported with sqlite connector"];
        expected.assert_eq(&diagnostics.errors().next().unwrap().message());
    }

    #[test]
    fn urls_use_the_file_scheme() {
        assert!(SQLITE.validate_url("file:./dev.db").is_ok());
        assert_eq!(
            SQLITE.validate_url("sqlite://dev.db"),
            Err(UrlError::WrongProtocol { expected: "`file:`" })
        );
        assert_eq!(
            SQLITE.validate_url("sqlite://dev.db").unwrap_err().to_string(),
            "must start with the protocol `file:`."
        );
    }

    #[test]
    fn enums_and_scalar_lists_are_not_supported() {
        assert!(!SQLITE.has_capability(ConnectorCapability::Enums));
        assert!(!SQLITE.has_capability(ConnectorCapability::ScalarLists));
        assert!(SQLITE.supports_referential_action(RelationMode::ForeignKeys, ReferentialAction::SetDefault));
        assert!(!SQLITE.supports_referential_action(RelationMode::Prisma, ReferentialAction::SetDefault));
    }
}
