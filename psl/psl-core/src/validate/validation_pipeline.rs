mod context;
mod validations;

pub use validations::is_leftwise_included_it;

use crate::{
    Datasource, PreviewFeatures,
    datamodel_connector::{
        Connector, EmptyDatamodelConnector, NativeTypeInstance, RelationMode, walker_ext_traits::ScalarFieldWalkerExt,
    },
    diagnostics::Diagnostics,
};
use schema_graph::{ScalarFieldId, SchemaGraph};
use std::collections::HashMap;

/// The parsed `@db.*` annotation of every scalar field that has a valid one.
#[derive(Debug, Clone, Default)]
pub struct NativeTypeBindings {
    connector_name: String,
    bindings: HashMap<ScalarFieldId, NativeTypeInstance>,
}

impl NativeTypeBindings {
    fn collect(graph: &SchemaGraph, connector: &dyn Connector) -> Self {
        let bindings = graph
            .walk_models_and_views()
            .flat_map(|model| model.scalar_fields())
            .filter_map(|field| field.native_type_instance(connector).map(|nt| (field.id, nt)))
            .collect();

        NativeTypeBindings {
            connector_name: connector.name().to_owned(),
            bindings,
        }
    }

    pub fn get(&self, field: ScalarFieldId) -> Option<&NativeTypeInstance> {
        self.bindings.get(&field)
    }

    /// The native type name and its arguments, e.g. `("VarChar", ["10"])`.
    pub fn to_parts(&self, field: ScalarFieldId) -> Option<(&'static str, Vec<String>)> {
        self.get(field).map(|nt| nt.to_parts())
    }

    /// The native type as written in the schema, without the datasource prefix.
    pub fn to_string(&self, field: ScalarFieldId) -> Option<String> {
        self.get(field).map(|nt| nt.to_string())
    }

    /// The name of the connector the types were parsed with.
    pub fn connector_name(&self) -> &str {
        &self.connector_name
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

pub struct ValidateOutput {
    pub graph: SchemaGraph,
    pub diagnostics: Diagnostics,
    pub relation_mode: RelationMode,
    pub connector: &'static dyn Connector,
    pub native_types: NativeTypeBindings,
}

/// Validate a schema graph against its datasource.
pub(crate) fn validate(
    graph: SchemaGraph,
    sources: &[Datasource],
    preview_features: PreviewFeatures,
    diagnostics: Diagnostics,
) -> ValidateOutput {
    let source = sources.first();
    let connector = source.map(|s| s.active_connector).unwrap_or(&EmptyDatamodelConnector);
    let relation_mode = source.map(|s| s.relation_mode()).unwrap_or_default();

    tracing::debug!(connector = connector.name(), %relation_mode, "validating schema");

    let mut output = ValidateOutput {
        graph,
        diagnostics,
        relation_mode,
        connector,
        native_types: NativeTypeBindings::default(),
    };

    // Configuration errors do not stop the schema passes. An unknown
    // provider leaves the empty connector in place.
    if output.diagnostics.has_errors() {
        tracing::debug!("configuration has errors, validating the schema anyway");
    }

    let mut context = context::Context {
        db: &output.graph,
        datasource: source,
        preview_features,
        connector,
        relation_mode,
        diagnostics: &mut output.diagnostics,
    };

    validations::validate(&mut context);

    output.native_types = NativeTypeBindings::collect(&output.graph, connector);

    output
}
