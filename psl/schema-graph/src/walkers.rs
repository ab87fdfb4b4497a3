//! Convenient access to a schema graph.
//!
//! The walkers:
//! - Know about specific types and what kind they are (models, enums, etc.)
//! - Know about attributes and which ones are defined on what.
//! - Know about relations.
//! - Do not know anything about connectors, they are generic.

mod composite_type;
mod r#enum;
mod index;
mod model;
mod relation;
mod relation_field;
mod scalar_field;

pub use composite_type::*;
pub use index::*;
pub use model::*;
pub use r#enum::*;
pub use relation::*;
pub use relation_field::*;
pub use scalar_field::*;

use crate::{EnumId, ModelId, RelationId, SchemaGraph};

/// A generic walker. Only walkers instantiated with a concrete ID type (`I`) are useful.
#[derive(Clone, Copy)]
pub struct Walker<'db, I> {
    /// The graph being traversed.
    pub db: &'db SchemaGraph,
    /// The identifier of the focused element.
    pub id: I,
}

impl<'db, I> Walker<'db, I> {
    /// Traverse something else in the same schema.
    pub fn walk<J>(self, other: J) -> Walker<'db, J> {
        self.db.walk(other)
    }
}

impl<I: std::fmt::Debug> std::fmt::Debug for Walker<'_, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Walker").field(&self.id).finish()
    }
}

impl<I> PartialEq for Walker<'_, I>
where
    I: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.id.eq(&other.id)
    }
}

impl SchemaGraph {
    /// Traverse a schema element by id.
    pub fn walk<I>(&self, id: I) -> Walker<'_, I> {
        Walker { db: self, id }
    }

    /// Find a model or view by name.
    pub fn find_model(&self, name: &str) -> Option<ModelWalker<'_>> {
        self.models
            .iter()
            .position(|m| m.name == name)
            .map(|idx| self.walk(ModelId::from_idx(idx)))
    }

    /// Find an enum by name.
    pub fn find_enum(&self, name: &str) -> Option<EnumWalker<'_>> {
        self.enums
            .iter()
            .position(|e| e.name == name)
            .map(|idx| self.walk(EnumId::from_idx(idx)))
    }

    /// Walk all the models in the schema.
    pub fn walk_models(&self) -> impl Iterator<Item = ModelWalker<'_>> + '_ {
        self.walk_models_and_views().filter(|m| !m.is_view())
    }

    /// Walk all the views in the schema.
    pub fn walk_views(&self) -> impl Iterator<Item = ModelWalker<'_>> + '_ {
        self.walk_models_and_views().filter(|m| m.is_view())
    }

    /// Walk models and views, in declaration order.
    pub fn walk_models_and_views(&self) -> impl Iterator<Item = ModelWalker<'_>> + '_ {
        (0..self.models.len()).map(move |idx| self.walk(ModelId::from_idx(idx)))
    }

    /// Walk all enums in the schema.
    pub fn walk_enums(&self) -> impl Iterator<Item = EnumWalker<'_>> + '_ {
        (0..self.enums.len()).map(move |idx| self.walk(EnumId::from_idx(idx)))
    }

    /// Walk all the composite types in the schema.
    pub fn walk_composite_types(&self) -> impl Iterator<Item = CompositeTypeWalker<'_>> + '_ {
        (0..self.composite_types.len()).map(move |idx| self.walk(crate::CompositeTypeId::from_idx(idx)))
    }

    /// Walk all the relations in the schema. A relation may be defined by one or two fields; in
    /// both cases, it is still a single relation.
    pub fn walk_relations(&self) -> impl ExactSizeIterator<Item = RelationWalker<'_>> + Clone + '_ {
        (0..self.relations.len()).map(move |idx| self.walk(RelationId::from_idx(idx)))
    }
}
