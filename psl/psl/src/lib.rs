#![doc = "Schema validation with every built-in connector enabled by the crate features."]
#![deny(rust_2018_idioms, unsafe_code, missing_docs)]

pub use psl_core::{
    ALL_PREVIEW_FEATURES, Configuration, ConnectorRegistry, Datasource, FeatureMap, FeatureMapWithProvider, Generator,
    GeneratorConfigValue, NativeTypeBindings, PreviewFeature, PreviewFeatures, StringFromEnvVar, ValidatedSchema,
    builtin_connectors, datamodel_connector,
    diagnostics::{self, Diagnostics},
    is_leftwise_included_it,
    schema_graph::{self, SchemaGraph},
};

use psl_core::builtin_connectors::BUILTIN_CONNECTORS;

/// Validates the graph against the connector of its datasource, keeping
/// the graph and the diagnostics whether it is valid or not.
pub fn validate(graph: SchemaGraph) -> ValidatedSchema {
    psl_core::validate(graph, BUILTIN_CONNECTORS)
}

/// Validates the graph, failing if there is any error. Warnings are kept
/// in the returned schema.
pub fn parse_schema(graph: SchemaGraph) -> Result<ValidatedSchema, Diagnostics> {
    let mut schema = validate(graph);

    schema.diagnostics.to_result().map(|_| schema)
}

/// Loads the configuration blocks of the graph with the built-in connectors.
pub fn parse_configuration(graph: &SchemaGraph) -> Result<Configuration, Diagnostics> {
    psl_core::parse_configuration(graph, BUILTIN_CONNECTORS)
}

/// Loads the configuration blocks of the graph, returning what could be
/// loaded together with the diagnostics.
pub fn error_tolerant_parse_configuration(graph: &SchemaGraph) -> (Configuration, Diagnostics) {
    psl_core::error_tolerant_parse_configuration(graph, BUILTIN_CONNECTORS)
}
