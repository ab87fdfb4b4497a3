#![deny(unsafe_code, rust_2018_idioms)]
#![allow(clippy::derive_partial_eq_without_eq)]

//! A read-only graph of a parsed schema: datasources, generators, models,
//! views, enums, composite types and the relations between models.
//!
//! The graph is what the validator consumes. Text parsing happens elsewhere;
//! this crate only offers:
//!
//! - The [`SchemaBuilder`], to assemble a graph in memory. Names used in
//!   `fields`, `references`, indexes and field types are resolved when the
//!   builder finishes, and relation fields are paired up into relations.
//! - Walkers, to navigate the graph. A [`Walker`] is a reference to the
//!   graph plus the id of the element it focuses on. The walkers know about
//!   the structure of the schema, nothing about connectors.
//!
//! ## Database names
//!
//! Models, fields and enums have a name in the schema and a name in the
//! database. The latter is the `@map`/`@@map` argument when present, and the
//! schema name otherwise. Walkers expose both as `name()` and
//! `database_name()`.

mod builder;
mod ids;
mod nodes;
mod relations;
mod types;

/// Navigation of the graph.
pub mod walkers;

pub use builder::{
    BuildError, CompositeTypeBuilder, CompositeTypeFieldBuilder, ConfigBlockBuilder, EnumBuilder, IndexBuilder,
    IndexField, ModelBuilder, RelationFieldBuilder, ScalarFieldBuilder, SchemaBuilder,
};
pub use diagnostics;
pub use ids::*;
pub use types::{
    ConfigBlock, ConfigBlockProperty, DefaultAttribute, Expression, FieldArity, IndexAlgorithm, IndexFieldPath,
    IndexType, RawNativeType, ReferentialAction, ScalarFieldType, ScalarType, SortOrder,
};
pub use walkers::Walker;

use nodes::{CompositeType, Enum, Model, Relation, RelationField, ScalarField};

/// The schema graph. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    pub(crate) datasources: Vec<ConfigBlock>,
    pub(crate) generators: Vec<ConfigBlock>,
    pub(crate) models: Vec<Model>,
    pub(crate) scalar_fields: Vec<ScalarField>,
    pub(crate) relation_fields: Vec<RelationField>,
    pub(crate) enums: Vec<Enum>,
    pub(crate) composite_types: Vec<CompositeType>,
    pub(crate) relations: Vec<Relation>,
    /// Indexed by relation field id.
    pub(crate) field_relations: Vec<RelationId>,
}

impl SchemaGraph {
    /// The `datasource` blocks, in declaration order.
    pub fn datasources(&self) -> &[ConfigBlock] {
        &self.datasources
    }

    /// The `generator` blocks, in declaration order.
    pub fn generators(&self) -> &[ConfigBlock] {
        &self.generators
    }
}

impl SchemaGraph {
    pub(crate) fn model(&self, id: ModelId) -> &Model {
        &self.models[id.idx()]
    }

    pub(crate) fn scalar_field(&self, id: ScalarFieldId) -> &ScalarField {
        &self.scalar_fields[id.idx()]
    }

    pub(crate) fn relation_field(&self, id: RelationFieldId) -> &RelationField {
        &self.relation_fields[id.idx()]
    }

    pub(crate) fn enum_node(&self, id: EnumId) -> &Enum {
        &self.enums[id.idx()]
    }

    pub(crate) fn composite_type(&self, id: CompositeTypeId) -> &CompositeType {
        &self.composite_types[id.idx()]
    }

    pub(crate) fn relation(&self, id: RelationId) -> &Relation {
        &self.relations[id.idx()]
    }
}
