use crate::{
    Span,
    pretty_print::{DatamodelErrorColorer, pretty_print},
};
use std::{borrow::Cow, fmt};
use thiserror::Error;

/// A validation error. Construct one through the `new_*` functions; the
/// message is fixed at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatamodelError(DatamodelErrorKind);

impl fmt::Display for DatamodelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for DatamodelError {}

impl From<DatamodelErrorKind> for DatamodelError {
    fn from(kind: DatamodelErrorKind) -> Self {
        DatamodelError(kind)
    }
}

// No format for this enum, on purpose.
// Line breaks make the declarations very hard to read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[rustfmt::skip]
enum DatamodelErrorKind {
  #[error("Native types are not supported with {connector_name} connector")]
  NativeTypesNotSupported { connector_name: String, span: Span },

  #[error("Argument \"{argument_name}\" is missing in data source block \"{source_name}\".")]
  SourceArgumentNotFound { argument_name: String, source_name: String, span: Span },

  #[error("Argument \"{argument_name}\" is missing in generator block \"{generator_name}\".")]
  GeneratorArgumentNotFound { argument_name: String, generator_name: String, span: Span },

  #[error("The model with database name \"{model_database_name}\" could not be defined because another model or view with this name exists: \"{existing_model_name}\"")]
  DuplicateModelDatabaseName { model_database_name: String, existing_model_name: String, span: Span },

  #[error("Native type {native_type} takes {required_count} arguments, but received {given_count}.")]
  NativeTypeArgumentCountMismatch { native_type: String, required_count: usize, given_count: usize, span: Span },

  #[error("Native type {native_type} takes {optional_count} optional arguments, but received {given_count}.")]
  NativeTypeOptionalArgumentCountMismatch { native_type: String, optional_count: usize, given_count: usize, span: Span },

  #[error("Field \"{field_name}\" in {container_type} \"{container_name}\" can't be a list. The current connector does not support lists of primitive types.")]
  ScalarListFieldsAreNotSupported { container_type: &'static str, container_name: String, field_name: String, span: Span },

  #[error("Field \"{field_name}\" is already defined on {container_type} \"{container_name}\".")]
  DuplicateField { container_type: &'static str, container_name: String, field_name: String, span: Span },

  #[error("Property not known: \"{property_name}\".")]
  PropertyNotKnown { property_name: String, span: Span },

  #[error("Datasource provider not known: \"{provider}\".")]
  DatasourceProviderNotKnown { provider: String, span: Span },

  #[error("The preview feature \"{preview_feature}\" is not known. Expected one of: {expected_preview_features}")]
  PreviewFeatureNotKnown { preview_feature: String, expected_preview_features: String, span: Span },

  #[error("Environment variable not found: {var_name}.")]
  EnvironmentFunctionalEvaluation { var_name: String, span: Span },

  #[error("Expected a {expected_type} value, but received {received_type} value `{raw}`.")]
  TypeMismatch { expected_type: String, received_type: String, raw: String, span: Span },

  #[error("Expected a {expected_type} value, but failed while parsing \"{raw}\": {parser_error}.")]
  ValueParser { expected_type: String, parser_error: String, raw: String, span: Span },

  #[error("Error validating {block_type} \"{model_name}\": {message}")]
  ModelValidation { message: String, block_type: &'static str, model_name: String, span: Span },

  #[error("Error validating composite type \"{composite_type_name}\": {message}")]
  CompositeTypeValidation { message: String, composite_type_name: String, span: Span },

  #[error("Error validating field `{field}` in {container_type} `{container_name}`: {message}")]
  FieldValidation { message: String, container_type: &'static str, container_name: String, field: String, span: Span },

  #[error("Error validating datasource `{datasource}`: {message}")]
  SourceValidation { message: String, datasource: String, span: Span },

  #[error("Error validating enum `{enum_name}`: {message}")]
  EnumValidation { message: String, enum_name: String, span: Span },

  #[error("Error validating: {message}")]
  Validation { message: String, span: Span },

  #[error("{message}")]
  Raw { message: Cow<'static, str>, span: Span },
}

impl DatamodelError {
    pub fn new(message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        DatamodelError(DatamodelErrorKind::Raw {
            message: message.into(),
            span,
        })
    }

    pub fn new_static(message: &'static str, span: Span) -> Self {
        Self::new(message, span)
    }

    pub fn new_attribute_validation_error(message: &str, attribute_name: &str, span: Span) -> DatamodelError {
        Self::new(format!("Error parsing attribute \"{attribute_name}\": {message}"), span)
    }

    pub fn new_model_validation_error(
        message: &str,
        block_type: &'static str,
        model_name: &str,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::ModelValidation {
            message: message.to_owned(),
            block_type,
            model_name: model_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_composite_type_validation_error(message: &str, composite_type_name: &str, span: Span) -> Self {
        DatamodelErrorKind::CompositeTypeValidation {
            message: message.to_owned(),
            composite_type_name: composite_type_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_composite_type_field_validation_error(
        message: &str,
        composite_type_name: &str,
        field: &str,
        span: Span,
    ) -> Self {
        Self::new_field_validation_error(message, "composite type", composite_type_name, field, span)
    }

    pub fn new_field_validation_error(
        message: &str,
        container_type: &'static str,
        container_name: &str,
        field: &str,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::FieldValidation {
            message: message.to_owned(),
            container_type,
            container_name: container_name.to_owned(),
            field: field.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_enum_validation_error(message: &str, enum_name: &str, span: Span) -> DatamodelError {
        DatamodelErrorKind::EnumValidation {
            message: message.to_owned(),
            enum_name: enum_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_source_validation_error(message: &str, source: &str, span: Span) -> DatamodelError {
        DatamodelErrorKind::SourceValidation {
            message: message.to_owned(),
            datasource: source.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_validation_error(message: &str, span: Span) -> DatamodelError {
        DatamodelErrorKind::Validation {
            message: message.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_invalid_model_error(message: &str, span: Span) -> DatamodelError {
        Self::new(format!("Invalid model: {message}"), span)
    }

    pub fn new_source_argument_not_found_error(argument_name: &str, source_name: &str, span: Span) -> DatamodelError {
        DatamodelErrorKind::SourceArgumentNotFound {
            argument_name: argument_name.to_owned(),
            source_name: source_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_generator_argument_not_found_error(
        argument_name: &str,
        generator_name: &str,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::GeneratorArgumentNotFound {
            argument_name: argument_name.to_owned(),
            generator_name: generator_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_property_not_known_error(property_name: &str, span: Span) -> DatamodelError {
        DatamodelErrorKind::PropertyNotKnown {
            property_name: property_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_datasource_provider_not_known_error(provider: &str, span: Span) -> DatamodelError {
        DatamodelErrorKind::DatasourceProviderNotKnown {
            provider: provider.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_preview_feature_not_known_error(
        preview_feature: &str,
        expected_preview_features: String,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::PreviewFeatureNotKnown {
            preview_feature: preview_feature.to_owned(),
            expected_preview_features,
            span,
        }
        .into()
    }

    pub fn new_functional_evaluation_error(message: impl Into<Cow<'static, str>>, span: Span) -> DatamodelError {
        Self::new(message, span)
    }

    pub fn new_environment_functional_evaluation_error(var_name: String, span: Span) -> DatamodelError {
        DatamodelErrorKind::EnvironmentFunctionalEvaluation { var_name, span }.into()
    }

    pub fn new_referential_integrity_and_relation_mode_cooccur_error(span: Span) -> DatamodelError {
        Self::new_static(
            "The `referentialIntegrity` and `relationMode` attributes cannot be used together. Please use only `relationMode` instead.",
            span,
        )
    }

    pub fn new_schemas_array_empty_error(span: Span) -> DatamodelError {
        Self::new_static("If provided, the schemas array can not be empty.", span)
    }

    pub fn new_type_mismatch_error(expected_type: &str, received_type: &str, raw: &str, span: Span) -> DatamodelError {
        DatamodelErrorKind::TypeMismatch {
            expected_type: expected_type.to_owned(),
            received_type: received_type.to_owned(),
            raw: raw.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_value_parser_error(expected_type: &str, parser_error: &str, raw: &str, span: Span) -> DatamodelError {
        DatamodelErrorKind::ValueParser {
            expected_type: expected_type.to_owned(),
            parser_error: parser_error.to_owned(),
            raw: raw.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_duplicate_model_database_name_error(
        model_database_name: &str,
        existing_model_name: &str,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::DuplicateModelDatabaseName {
            model_database_name: model_database_name.to_owned(),
            existing_model_name: existing_model_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_scalar_list_fields_are_not_supported(
        container_type: &'static str,
        container_name: &str,
        field_name: &str,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::ScalarListFieldsAreNotSupported {
            container_type,
            container_name: container_name.to_owned(),
            field_name: field_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_duplicate_field_error(
        container_type: &'static str,
        container_name: &str,
        field_name: &str,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::DuplicateField {
            container_type,
            container_name: container_name.to_owned(),
            field_name: field_name.to_owned(),
            span,
        }
        .into()
    }

    pub fn new_default_unknown_function(function_name: &str, span: Span) -> DatamodelError {
        Self::new(
            format!(
                "Unknown function in @default(): `{function_name}` is not known. You can read about the available functions here: https://pris.ly/d/attribute-functions"
            ),
            span,
        )
    }

    pub fn new_native_types_not_supported(connector_name: String, span: Span) -> DatamodelError {
        DatamodelErrorKind::NativeTypesNotSupported { connector_name, span }.into()
    }

    pub fn new_native_type_name_unknown(connector_name: &str, native_type: &str, span: Span) -> DatamodelError {
        Self::new(
            format!("Native type {native_type} is not supported for {connector_name} connector."),
            span,
        )
    }

    pub fn new_native_type_argument_count_mismatch_error(
        native_type: &str,
        required_count: usize,
        given_count: usize,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::NativeTypeArgumentCountMismatch {
            native_type: native_type.to_owned(),
            required_count,
            given_count,
            span,
        }
        .into()
    }

    pub fn new_native_type_optional_argument_count_mismatch_error(
        native_type: &str,
        optional_count: usize,
        given_count: usize,
        span: Span,
    ) -> DatamodelError {
        DatamodelErrorKind::NativeTypeOptionalArgumentCountMismatch {
            native_type: native_type.to_owned(),
            optional_count,
            given_count,
            span,
        }
        .into()
    }

    pub fn new_incompatible_native_type(
        native_type: &str,
        field_type: &str,
        expected_types: &str,
        span: Span,
    ) -> DatamodelError {
        Self::new(
            format!(
                "Native type {native_type} is not compatible with declared field type {field_type}, expected field type {expected_types}."
            ),
            span,
        )
    }

    pub fn new_invalid_prefix_for_native_types(
        given_prefix: &str,
        expected_prefix: &str,
        suggestion: &str,
        span: Span,
    ) -> DatamodelError {
        Self::new(
            format!(
                "The prefix {given_prefix} is invalid. It must be equal to the name of an existing datasource e.g. {expected_prefix}. Did you mean to use {suggestion}?"
            ),
            span,
        )
    }

    pub fn span(&self) -> Span {
        match &self.0 {
            DatamodelErrorKind::NativeTypesNotSupported { span, .. }
            | DatamodelErrorKind::SourceArgumentNotFound { span, .. }
            | DatamodelErrorKind::GeneratorArgumentNotFound { span, .. }
            | DatamodelErrorKind::DuplicateModelDatabaseName { span, .. }
            | DatamodelErrorKind::NativeTypeArgumentCountMismatch { span, .. }
            | DatamodelErrorKind::NativeTypeOptionalArgumentCountMismatch { span, .. }
            | DatamodelErrorKind::ScalarListFieldsAreNotSupported { span, .. }
            | DatamodelErrorKind::DuplicateField { span, .. }
            | DatamodelErrorKind::PropertyNotKnown { span, .. }
            | DatamodelErrorKind::DatasourceProviderNotKnown { span, .. }
            | DatamodelErrorKind::PreviewFeatureNotKnown { span, .. }
            | DatamodelErrorKind::EnvironmentFunctionalEvaluation { span, .. }
            | DatamodelErrorKind::TypeMismatch { span, .. }
            | DatamodelErrorKind::ValueParser { span, .. }
            | DatamodelErrorKind::ModelValidation { span, .. }
            | DatamodelErrorKind::CompositeTypeValidation { span, .. }
            | DatamodelErrorKind::FieldValidation { span, .. }
            | DatamodelErrorKind::SourceValidation { span, .. }
            | DatamodelErrorKind::EnumValidation { span, .. }
            | DatamodelErrorKind::Validation { span, .. }
            | DatamodelErrorKind::Raw { span, .. } => *span,
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn pretty_print(&self, f: &mut dyn std::io::Write, file_name: &str, text: &str) -> std::io::Result<()> {
        pretty_print(f, file_name, text, self.span(), &self.message(), &DatamodelErrorColorer)
    }
}
