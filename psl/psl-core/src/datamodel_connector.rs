//! The interface implemented by connectors for schema validation.
//!
//! A connector is split in three traits:
//!
//! - [`CapabilityQueries`]: identity, capabilities and limits of the database.
//! - [`NativeTypes`]: the native type catalog and its mapping to scalar types.
//! - [`ValidationHooks`]: connector specific checks called by the validation pipeline.
//!
//! Everything the validator needs is reachable through the [`Connector`]
//! supertrait, which the registry hands out as `&'static dyn Connector`.

/// Connector capabilities
pub mod capabilities;
/// Constraint name defaults.
pub mod constraint_names;
/// Extensions for schema graph walkers with context from the connector.
pub mod walker_ext_traits;

mod empty_connector;
mod native_types;
mod relation_mode;

pub use self::{
    capabilities::{ConnectorCapabilities, ConnectorCapability},
    empty_connector::EmptyDatamodelConnector,
    native_types::{NativeTypeArguments, NativeTypeConstructor, NativeTypeInstance, split_native_type_string},
    relation_mode::RelationMode,
};

#[cfg(feature = "mssql")]
pub(crate) use self::native_types::parse_u32;

use crate::{Datasource, PreviewFeatures};
use diagnostics::{DatamodelError, Diagnostics, NativeTypeErrorFactory, Span};
use enumflags2::BitFlags;
use schema_graph::{IndexAlgorithm, ReferentialAction, ScalarType, SchemaGraph, walkers};
use std::borrow::Cow;
use thiserror::Error;

/// A connection string the connector cannot use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("must start with the protocol {expected}.")]
    WrongProtocol { expected: &'static str },
}

/// Identity, capabilities and limits of a connector.
pub trait CapabilityQueries {
    /// The name of the provider, for string comparisons determining which connector we are on.
    fn provider_name(&self) -> &'static str;

    /// Must return true whenever the passed in provider name is a match.
    fn is_provider(&self, name: &str) -> bool;

    /// The name of the connector. Can be used in error messages.
    fn name(&self) -> &str;

    /// The database flavour.
    fn flavour(&self) -> Flavour;

    /// The static list of capabilities for the connector.
    fn capabilities(&self) -> ConnectorCapabilities;

    fn has_capability(&self, capability: ConnectorCapability) -> bool {
        self.capabilities().contains(capability)
    }

    /// The maximum length of constraint names in bytes.
    fn max_identifier_length(&self) -> usize;

    /// The relation modes that can be set through the `relationMode`
    /// datasource argument.
    fn allowed_relation_mode_settings(&self) -> BitFlags<RelationMode>;

    /// The relation mode to assume when the datasource does not set one.
    fn default_relation_mode(&self) -> RelationMode;

    /// The referential actions supported by the database foreign keys.
    fn foreign_key_referential_actions(&self) -> BitFlags<ReferentialAction>;

    /// The referential actions supported when using `relationMode = "prisma"`.
    fn emulated_referential_actions(&self) -> BitFlags<ReferentialAction>;

    fn referential_actions(&self, relation_mode: RelationMode) -> BitFlags<ReferentialAction> {
        match relation_mode {
            RelationMode::ForeignKeys => self.foreign_key_referential_actions(),
            RelationMode::Prisma => self.emulated_referential_actions(),
        }
    }

    fn supports_referential_action(&self, relation_mode: RelationMode, action: ReferentialAction) -> bool {
        self.referential_actions(relation_mode).contains(action)
    }

    /// Most SQL databases reject a SET NULL referential action on a
    /// non-nullable column. Postgres accepts the definition and fails when
    /// the action triggers.
    fn allows_set_null_referential_action_on_non_nullable_fields(&self, relation_mode: RelationMode) -> bool;

    fn supported_index_types(&self) -> BitFlags<IndexAlgorithm>;

    fn supports_index_type(&self, algo: IndexAlgorithm) -> bool {
        self.supported_index_types().contains(algo)
    }

    /// Whether to warn about referencing fields that are not covered by an
    /// index when foreign keys are emulated.
    fn should_suggest_missing_referencing_fields_indexes(&self) -> bool;

    /// The scopes in which a constraint name should be validated. If empty,
    /// doesn't check for name clashes in the validation phase.
    fn constraint_violation_scopes(&self) -> &'static [ConstraintScope];

    /// Check the connection string scheme. The error completes the sentence
    /// "the URL ...".
    fn validate_url(&self, url: &str) -> Result<(), UrlError>;

    fn is_sql(&self) -> bool {
        self.flavour().is_sql()
    }

    fn is_mongo(&self) -> bool {
        self.flavour().is_mongo()
    }
}

/// The native type catalog of a connector.
pub trait NativeTypes: CapabilityQueries {
    /// Returns all available native type constructors available through this connector.
    fn available_native_type_constructors(&self) -> &'static [NativeTypeConstructor];

    fn find_native_type_constructor(&self, name: &str) -> Option<&'static NativeTypeConstructor> {
        self.available_native_type_constructors()
            .iter()
            .find(|constructor| constructor.name == name)
    }

    /// Parse a native type annotation. Pushes an error and returns `None`
    /// when the name is unknown or the arguments are invalid.
    fn parse_native_type(
        &self,
        name: &str,
        args: &[String],
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> Option<NativeTypeInstance>;

    /// The canonical scalar type for the given native type. `None` for
    /// instances of another connector.
    fn scalar_type_for_native_type(&self, native_type: &NativeTypeInstance) -> Option<ScalarType>;

    /// On each connector, each built-in scalar type has a corresponding
    /// native type.
    fn default_native_type_for_scalar_type(&self, scalar_type: ScalarType) -> Option<NativeTypeInstance>;

    /// Same mapping as `default_native_type_for_scalar_type()`, but in the
    /// opposite direction.
    fn native_type_is_default_for_scalar_type(&self, native_type: &NativeTypeInstance, scalar_type: ScalarType) -> bool {
        self.default_native_type_for_scalar_type(scalar_type).as_ref() == Some(native_type)
    }

    /// Validate that the arguments passed to a native type attribute are valid.
    fn validate_native_type_arguments(
        &self,
        native_type: &NativeTypeInstance,
        scalar_type: ScalarType,
        span: Span,
        diagnostics: &mut Diagnostics,
    );

    fn native_type_to_parts(&self, native_type: &NativeTypeInstance) -> (&'static str, Vec<String>) {
        native_type.to_parts()
    }

    fn native_type_to_string(&self, native_type: &NativeTypeInstance) -> String {
        native_type.to_string()
    }

    fn native_instance_error(&self, native_type: &NativeTypeInstance) -> NativeTypeErrorFactory {
        NativeTypeErrorFactory::new(self.native_type_to_string(native_type), self.name().to_owned())
    }
}

/// Connector specific checks, called by the validation pipeline.
pub trait ValidationHooks: CapabilityQueries {
    fn validate_datasource(&self, preview_features: PreviewFeatures, datasource: &Datasource, diagnostics: &mut Diagnostics);

    fn validate_model(&self, model: walkers::ModelWalker<'_>, relation_mode: RelationMode, diagnostics: &mut Diagnostics);

    fn validate_view(&self, view: walkers::ModelWalker<'_>, diagnostics: &mut Diagnostics);

    fn validate_enum(&self, r#enum: walkers::EnumWalker<'_>, diagnostics: &mut Diagnostics);

    fn validate_relation_field(&self, field: walkers::RelationFieldWalker<'_>, diagnostics: &mut Diagnostics);

    /// Report `@default` functions the validator does not know about. Some
    /// connectors know extra functions.
    fn validate_scalar_field_unknown_default_functions(&self, db: &SchemaGraph, diagnostics: &mut Diagnostics);
}

/// The `@default` functions every connector understands.
pub const KNOWN_DEFAULT_FUNCTIONS: &[&str] = &["autoincrement", "now", "uuid", "cuid", "nanoid", "ulid", "dbgenerated", "auto"];

/// The defaults calling a function outside of [`KNOWN_DEFAULT_FUNCTIONS`].
pub fn walk_scalar_field_defaults_with_unknown_function(
    db: &SchemaGraph,
) -> impl Iterator<Item = walkers::DefaultValueWalker<'_>> + '_ {
    db.walk_models_and_views()
        .flat_map(|model| model.scalar_fields())
        .filter_map(|field| field.default_value())
        .filter(|default| {
            default
                .value()
                .as_function()
                .is_some_and(|(name, _, _)| !KNOWN_DEFAULT_FUNCTIONS.contains(&name))
        })
}

/// Push an error for every default calling an unknown function.
pub fn report_unknown_default_functions(db: &SchemaGraph, diagnostics: &mut Diagnostics) {
    for default in walk_scalar_field_defaults_with_unknown_function(db) {
        if let Some((name, _, span)) = default.value().as_function() {
            diagnostics.push_error(DatamodelError::new_default_unknown_function(name, span));
        }
    }
}

/// The datamodel connector API.
pub trait Connector: CapabilityQueries + NativeTypes + ValidationHooks + Send + Sync {}

impl<T> Connector for T where T: CapabilityQueries + NativeTypes + ValidationHooks + Send + Sync {}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Flavour {
    Cockroach,
    Mongo,
    Sqlserver,
    Mysql,
    Postgres,
    Sqlite,
}

impl Flavour {
    pub fn is_sql(&self) -> bool {
        !self.is_mongo()
    }

    pub fn is_mongo(&self) -> bool {
        matches!(self, Flavour::Mongo)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum ConstraintType {
    PrimaryKey,
    ForeignKey,
    KeyOrIdx,
    Default,
}

/// A scope where a constraint name must be unique.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy)]
pub enum ConstraintScope {
    /// Globally indices and unique constraints
    GlobalKeyIndex,
    /// Globally foreign keys
    GlobalForeignKey,
    /// Globally primary keys, indices and unique constraints
    GlobalPrimaryKeyKeyIndex,
    /// Globally primary keys, foreign keys and default constraints
    GlobalPrimaryKeyForeignKeyDefault,
    /// Per model indices and unique constraints
    ModelKeyIndex,
    /// Per model primary keys, indices and unique constraints
    ModelPrimaryKeyKeyIndex,
    /// Per model primary keys, foreign keys, indices and unique constraints
    ModelPrimaryKeyKeyIndexForeignKey,
}

impl ConstraintScope {
    /// A beefed-up display for errors.
    pub fn description(self, model_name: &str) -> Cow<'static, str> {
        match self {
            ConstraintScope::GlobalKeyIndex => Cow::from("global for indexes and unique constraints"),
            ConstraintScope::GlobalForeignKey => Cow::from("global for foreign keys"),
            ConstraintScope::GlobalPrimaryKeyKeyIndex => {
                Cow::from("global for primary key, indexes and unique constraints")
            }
            ConstraintScope::GlobalPrimaryKeyForeignKeyDefault => {
                Cow::from("global for primary keys, foreign keys and default constraints")
            }
            ConstraintScope::ModelKeyIndex => {
                Cow::from(format!("on model `{model_name}` for indexes and unique constraints"))
            }
            ConstraintScope::ModelPrimaryKeyKeyIndex => Cow::from(format!(
                "on model `{model_name}` for primary key, indexes and unique constraints"
            )),
            ConstraintScope::ModelPrimaryKeyKeyIndexForeignKey => Cow::from(format!(
                "on model `{model_name}` for primary key, indexes, unique constraints and foreign keys"
            )),
        }
    }

    /// The constraint types that live in this scope.
    pub fn constraint_types(self) -> &'static [ConstraintType] {
        use ConstraintType::*;

        match self {
            ConstraintScope::GlobalKeyIndex | ConstraintScope::ModelKeyIndex => &[KeyOrIdx],
            ConstraintScope::GlobalForeignKey => &[ForeignKey],
            ConstraintScope::GlobalPrimaryKeyKeyIndex | ConstraintScope::ModelPrimaryKeyKeyIndex => {
                &[PrimaryKey, KeyOrIdx]
            }
            ConstraintScope::GlobalPrimaryKeyForeignKeyDefault => &[PrimaryKey, ForeignKey, Default],
            ConstraintScope::ModelPrimaryKeyKeyIndexForeignKey => &[PrimaryKey, KeyOrIdx, ForeignKey],
        }
    }

    pub fn is_global(self) -> bool {
        matches!(
            self,
            ConstraintScope::GlobalKeyIndex
                | ConstraintScope::GlobalForeignKey
                | ConstraintScope::GlobalPrimaryKeyKeyIndex
                | ConstraintScope::GlobalPrimaryKeyForeignKeyDefault
        )
    }
}
