use crate::{
    Datasource, PreviewFeature, PreviewFeatures,
    datamodel_connector::{Connector, ConnectorCapability, RelationMode},
    diagnostics::{DatamodelError, DatamodelWarning, Diagnostics},
};
use schema_graph::SchemaGraph;

/// The validation context. The lifetime parameter is _not_ the schema
/// lifetime, but the subtype of all relevant lifetimes.
pub(crate) struct Context<'a> {
    pub(super) db: &'a SchemaGraph,
    pub(super) datasource: Option<&'a Datasource>,
    pub(super) preview_features: PreviewFeatures,
    pub(super) connector: &'static dyn Connector,
    pub(super) relation_mode: RelationMode,
    pub(super) diagnostics: &'a mut Diagnostics,
}

impl Context<'_> {
    pub(super) fn push_error(&mut self, error: DatamodelError) {
        self.diagnostics.push_error(error);
    }

    pub(super) fn push_warning(&mut self, warning: DatamodelWarning) {
        self.diagnostics.push_warning(warning);
    }

    /// Pure convenience method. Forwards to Connector::has_capability().
    pub(super) fn has_capability(&self, capability: ConnectorCapability) -> bool {
        self.connector.has_capability(capability)
    }

    pub(super) fn has_preview_feature(&self, feature: PreviewFeature) -> bool {
        self.preview_features.contains(feature)
    }

    /// Errors pushed by earlier passes. Some checks only make sense on an
    /// otherwise valid schema.
    pub(super) fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}
