use crate::datamodel_connector::{
    Connector, ConstraintScope, ConstraintType,
    walker_ext_traits::{DefaultValueExt, IndexWalkerExt, PrimaryKeyWalkerExt, RelationFieldWalkerExt},
};
use schema_graph::{ModelId, SchemaGraph};
use std::{borrow::Cow, collections::HashMap};

/// A constraint name, tagged with the kind of constraint it names.
#[derive(Debug, Clone, Copy)]
pub(super) enum ConstraintName<'a> {
    Index(&'a str),
    Relation(&'a str),
    Default(&'a str),
    PrimaryKey(&'a str),
}

impl<'a> ConstraintName<'a> {
    fn as_str(self) -> &'a str {
        match self {
            ConstraintName::Index(name)
            | ConstraintName::Relation(name)
            | ConstraintName::Default(name)
            | ConstraintName::PrimaryKey(name) => name,
        }
    }

    fn constraint_type(self) -> ConstraintType {
        match self {
            ConstraintName::Index(_) => ConstraintType::KeyOrIdx,
            ConstraintName::Relation(_) => ConstraintType::ForeignKey,
            ConstraintName::Default(_) => ConstraintType::Default,
            ConstraintName::PrimaryKey(_) => ConstraintType::PrimaryKey,
        }
    }
}

/// Constraint names with the number of times they occur, per scope.
#[derive(Debug, Default)]
pub(super) struct ConstraintNamespace<'db> {
    global: HashMap<(ConstraintScope, Cow<'db, str>), usize>,
    local: HashMap<(ModelId, ConstraintScope, Cow<'db, str>), usize>,
    local_custom_name: HashMap<(ModelId, &'db str), usize>,
}

impl<'db> ConstraintNamespace<'db> {
    /// The scopes in which the given name is used more than once, global
    /// scopes first.
    pub(super) fn constraint_name_scope_violations(
        &self,
        model_id: ModelId,
        name: ConstraintName<'_>,
        connector: &dyn Connector,
    ) -> Vec<ConstraintScope> {
        let constraint_type = name.constraint_type();
        let name = name.as_str();

        connector
            .constraint_violation_scopes()
            .iter()
            .copied()
            .filter(|scope| scope.constraint_types().contains(&constraint_type))
            .filter(|scope| {
                let count = if scope.is_global() {
                    self.global.get(&(*scope, Cow::Borrowed(name)))
                } else {
                    self.local.get(&(model_id, *scope, Cow::Borrowed(name)))
                };

                count.is_some_and(|count| *count > 1)
            })
            .collect()
    }

    /// Is the `name` argument of a primary key or unique used more than
    /// once on the model?
    pub(super) fn local_custom_name_scope_violations(&self, model_id: ModelId, name: &str) -> bool {
        self.local_custom_name
            .get(&(model_id, name))
            .is_some_and(|count| *count > 1)
    }

    fn add_global(&mut self, scope: ConstraintScope, name: Cow<'db, str>) {
        *self.global.entry((scope, name)).or_default() += 1;
    }

    fn add_local(&mut self, model_id: ModelId, scope: ConstraintScope, name: Cow<'db, str>) {
        *self.local.entry((model_id, scope, name)).or_default() += 1;
    }

    /// Add all index and unique constraints from the data model to a global validation scope.
    pub(super) fn add_global_indexes(&mut self, db: &'db SchemaGraph, connector: &dyn Connector, scope: ConstraintScope) {
        for index in db.walk_models().flat_map(|m| m.indexes()) {
            self.add_global(scope, index.constraint_name(connector));
        }
    }

    /// Add all foreign key constraints from the data model to a global validation scope.
    pub(super) fn add_global_relations(&mut self, db: &'db SchemaGraph, connector: &dyn Connector, scope: ConstraintScope) {
        for field in db.walk_models().flat_map(|m| m.relation_fields()) {
            if let Some(name) = field.constraint_name(connector) {
                self.add_global(scope, name);
            }
        }
    }

    /// Add all primary key constraints from the data model to a global validation scope.
    pub(super) fn add_global_primary_keys(&mut self, db: &'db SchemaGraph, connector: &dyn Connector, scope: ConstraintScope) {
        for pk in db.walk_models().filter_map(|m| m.primary_key()) {
            if let Some(name) = pk.constraint_name(connector) {
                self.add_global(scope, name);
            }
        }
    }

    /// Add all default constraints from the data model to a global validation scope.
    pub(super) fn add_global_default_constraints(
        &mut self,
        db: &'db SchemaGraph,
        connector: &dyn Connector,
        scope: ConstraintScope,
    ) {
        let defaults = db
            .walk_models()
            .flat_map(|m| m.scalar_fields())
            .filter_map(|f| f.default_value());

        for default in defaults {
            if let Some(name) = default.constraint_name(connector) {
                self.add_global(scope, name);
            }
        }
    }

    /// Add all index and unique constraints to separate namespaces per model.
    pub(super) fn add_local_indexes(&mut self, db: &'db SchemaGraph, connector: &dyn Connector, scope: ConstraintScope) {
        for model in db.walk_models() {
            for index in model.indexes() {
                self.add_local(model.id, scope, index.constraint_name(connector));
            }
        }
    }

    /// Add all primary key constraints to separate namespaces per model.
    pub(super) fn add_local_primary_keys(&mut self, db: &'db SchemaGraph, connector: &dyn Connector, scope: ConstraintScope) {
        for model in db.walk_models() {
            if let Some(name) = model.primary_key().and_then(|pk| pk.constraint_name(connector)) {
                self.add_local(model.id, scope, name);
            }
        }
    }

    /// Add all foreign key constraints to separate namespaces per model.
    pub(super) fn add_local_relations(&mut self, db: &'db SchemaGraph, connector: &dyn Connector, scope: ConstraintScope) {
        for model in db.walk_models() {
            for name in model.relation_fields().filter_map(|f| f.constraint_name(connector)) {
                self.add_local(model.id, scope, name);
            }
        }
    }

    /// Client names of compound ids and uniques share a namespace per model.
    pub(super) fn add_local_custom_names_for_primary_keys_and_uniques(&mut self, db: &'db SchemaGraph) {
        for model in db.walk_models() {
            let pk_name = model.primary_key().and_then(|pk| pk.name());
            let unique_names = model.indexes().filter(|i| i.is_unique()).filter_map(|i| i.name());

            for name in pk_name.into_iter().chain(unique_names) {
                *self.local_custom_name.entry((model.id, name)).or_default() += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel_connector::EmptyDatamodelConnector;
    use schema_graph::{ScalarType, SchemaBuilder};

    #[test]
    fn custom_names_are_counted_per_model() {
        let mut schema = SchemaBuilder::new();

        let user = schema.model("User");
        user.scalar("a", ScalarType::Int);
        user.scalar("b", ScalarType::Int);
        user.id(["a", "b"]).name("compound");
        user.unique(["b", "a"]).name("compound");

        let post = schema.model("Post");
        post.scalar("a", ScalarType::Int);
        post.unique(["a"]).name("compound");

        let db = schema.finish().unwrap();
        let mut namespace = ConstraintNamespace::default();
        namespace.add_local_custom_names_for_primary_keys_and_uniques(&db);

        let [user, post] = [db.find_model("User").unwrap(), db.find_model("Post").unwrap()];

        assert!(namespace.local_custom_name_scope_violations(user.id, "compound"));
        assert!(!namespace.local_custom_name_scope_violations(post.id, "compound"));
    }

    #[test]
    fn generated_index_names_collide_globally() {
        let mut schema = SchemaBuilder::new();

        let a = schema.model("A");
        a.scalar("id", ScalarType::Int).id();
        a.scalar("x", ScalarType::Int);
        a.index(["x"]).map("shared");

        let b = schema.model("B");
        b.scalar("id", ScalarType::Int).id();
        b.scalar("x", ScalarType::Int);
        b.index(["x"]).map("shared");

        let db = schema.finish().unwrap();
        let connector = &EmptyDatamodelConnector;
        let mut namespace = ConstraintNamespace::default();
        namespace.add_global_indexes(&db, connector, ConstraintScope::GlobalKeyIndex);

        assert_eq!(namespace.global.get(&(ConstraintScope::GlobalKeyIndex, Cow::Borrowed("shared"))), Some(&2));
    }
}
