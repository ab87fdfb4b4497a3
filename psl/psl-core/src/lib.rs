//! Connector-aware semantic validation of schema graphs.
//!
//! [`validate()`] loads the configuration blocks of a [`SchemaGraph`],
//! resolves the connector of the datasource and runs every validation pass
//! against it. Problems are collected in [`Diagnostics`], validation never
//! stops at the first one.

#![deny(rust_2018_idioms, unsafe_code)]
#![allow(clippy::derive_partial_eq_without_eq)]

pub mod builtin_connectors;
pub mod datamodel_connector;

mod coerce;
mod common;
mod configuration;
mod validate;

pub use crate::{
    common::{ALL_PREVIEW_FEATURES, FeatureMap, FeatureMapWithProvider, PreviewFeature, PreviewFeatures},
    configuration::{Configuration, Datasource, Generator, GeneratorConfigValue, StringFromEnvVar},
    validate::{NativeTypeBindings, is_leftwise_included_it},
};
pub use diagnostics;
pub use schema_graph;

use self::validate::{datasource_loader, generator_loader};
use diagnostics::Diagnostics;
use schema_graph::SchemaGraph;

/// The collection of all available connectors.
pub type ConnectorRegistry<'a> = &'a [&'static dyn datamodel_connector::Connector];

/// A schema graph together with its configuration and everything the
/// validation found out about it.
pub struct ValidatedSchema {
    pub configuration: Configuration,
    pub graph: SchemaGraph,
    pub connector: &'static dyn datamodel_connector::Connector,
    pub diagnostics: Diagnostics,
    pub native_types: NativeTypeBindings,
    relation_mode: datamodel_connector::RelationMode,
}

impl std::fmt::Debug for ValidatedSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<validated schema>")
    }
}

impl ValidatedSchema {
    pub fn relation_mode(&self) -> datamodel_connector::RelationMode {
        self.relation_mode
    }

    /// Render the diagnostics against the source text the graph was built from.
    pub fn render_diagnostics(&self, file_name: &str, source: &str) -> String {
        let mut out = self.diagnostics.to_pretty_string(file_name, source);
        out.push_str(&self.diagnostics.warnings_to_pretty_string(file_name, source));
        out
    }
}

/// The most general API for dealing with schemas. It accumulates what analysis and
/// validation information it can, and returns it along with any error and warning diagnostics.
pub fn validate(graph: SchemaGraph, connectors: ConnectorRegistry<'_>) -> ValidatedSchema {
    let (configuration, diagnostics) = error_tolerant_parse_configuration(&graph, connectors);
    let out = validate::validate(
        graph,
        &configuration.datasources,
        configuration.preview_features(),
        diagnostics,
    );

    ValidatedSchema {
        configuration,
        graph: out.graph,
        connector: out.connector,
        diagnostics: out.diagnostics,
        native_types: out.native_types,
        relation_mode: out.relation_mode,
    }
}

/// Loads the `datasource` and `generator` blocks of the graph, failing on
/// the first configuration error.
pub fn parse_configuration(
    graph: &SchemaGraph,
    connectors: ConnectorRegistry<'_>,
) -> Result<Configuration, diagnostics::Diagnostics> {
    let (configuration, mut diagnostics) = error_tolerant_parse_configuration(graph, connectors);
    diagnostics.to_result().map(|_| configuration)
}

/// Loads the `datasource` and `generator` blocks of the graph, keeping
/// whatever could be loaded next to the diagnostics.
pub fn error_tolerant_parse_configuration(
    graph: &SchemaGraph,
    connectors: ConnectorRegistry<'_>,
) -> (Configuration, Diagnostics) {
    let mut diagnostics = Diagnostics::new();

    let datasources = datasource_loader::load_datasources_from_graph(graph.datasources(), &mut diagnostics, connectors);

    // Preview features can be renamed or stabilized for one provider only.
    let feature_map = FeatureMapWithProvider::new(datasources.first().map(|ds| ds.active_provider));

    let generators = generator_loader::load_generators_from_graph(graph.generators(), &mut diagnostics, &feature_map);

    tracing::debug!(
        datasources = datasources.len(),
        generators = generators.len(),
        "loaded configuration"
    );

    let warnings = diagnostics.warnings().cloned().collect();

    (Configuration::new(generators, datasources, warnings), diagnostics)
}
