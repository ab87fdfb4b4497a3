use crate::{Datasource, PreviewFeatures, datamodel_connector::*};
use diagnostics::{DatamodelError, Diagnostics, Span};
use enumflags2::BitFlags;
use schema_graph::{IndexAlgorithm, ReferentialAction, ScalarType, SchemaGraph, walkers::*};

/// A [Connector](/trait.Connector.html) implementor meant to
/// be used as a default when no datasource is defined.
pub struct EmptyDatamodelConnector;

impl CapabilityQueries for EmptyDatamodelConnector {
    fn provider_name(&self) -> &'static str {
        "empty"
    }

    fn is_provider(&self, name: &str) -> bool {
        name == self.provider_name()
    }

    fn name(&self) -> &str {
        "empty"
    }

    fn flavour(&self) -> Flavour {
        Flavour::Sqlite
    }

    fn capabilities(&self) -> ConnectorCapabilities {
        BitFlags::all()
    }

    fn max_identifier_length(&self) -> usize {
        usize::MAX
    }

    fn allowed_relation_mode_settings(&self) -> BitFlags<RelationMode> {
        BitFlags::all()
    }

    fn default_relation_mode(&self) -> RelationMode {
        RelationMode::ForeignKeys
    }

    fn foreign_key_referential_actions(&self) -> BitFlags<ReferentialAction> {
        BitFlags::all()
    }

    fn emulated_referential_actions(&self) -> BitFlags<ReferentialAction> {
        BitFlags::all()
    }

    fn allows_set_null_referential_action_on_non_nullable_fields(&self, _: RelationMode) -> bool {
        false
    }

    fn supported_index_types(&self) -> BitFlags<IndexAlgorithm> {
        BitFlags::all()
    }

    fn should_suggest_missing_referencing_fields_indexes(&self) -> bool {
        false
    }

    fn constraint_violation_scopes(&self) -> &'static [ConstraintScope] {
        &[]
    }

    fn validate_url(&self, _url: &str) -> Result<(), UrlError> {
        Ok(())
    }
}

impl NativeTypes for EmptyDatamodelConnector {
    fn available_native_type_constructors(&self) -> &'static [NativeTypeConstructor] {
        &[]
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

    fn scalar_type_for_native_type(&self, _: &NativeTypeInstance) -> Option<ScalarType> {
        None
    }

    fn default_native_type_for_scalar_type(&self, _: ScalarType) -> Option<NativeTypeInstance> {
        None
    }

    fn validate_native_type_arguments(&self, _: &NativeTypeInstance, _: ScalarType, _: Span, _: &mut Diagnostics) {}
}

impl ValidationHooks for EmptyDatamodelConnector {
    fn validate_datasource(&self, _: PreviewFeatures, _: &Datasource, _: &mut Diagnostics) {}

    fn validate_model(&self, _: ModelWalker<'_>, _: RelationMode, _: &mut Diagnostics) {}

    fn validate_view(&self, _: ModelWalker<'_>, _: &mut Diagnostics) {}

    fn validate_enum(&self, _: EnumWalker<'_>, _: &mut Diagnostics) {}

    fn validate_relation_field(&self, _: RelationFieldWalker<'_>, _: &mut Diagnostics) {}

    fn validate_scalar_field_unknown_default_functions(&self, db: &SchemaGraph, diagnostics: &mut Diagnostics) {
        report_unknown_default_functions(db, diagnostics);
    }
}
