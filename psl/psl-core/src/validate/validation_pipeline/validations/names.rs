use super::constraint_namespace::ConstraintNamespace;
use crate::datamodel_connector::{Connector, ConstraintScope};
use schema_graph::{ModelId, RelationFieldId, SchemaGraph, walkers::RelationName};
use std::collections::{HashMap, HashSet};

type RelationIdentifier<'db> = (ModelId, ModelId, RelationName<'db>);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum NameTaken {
    Index,
    Unique,
    PrimaryKey,
}

pub(super) struct Names<'db> {
    pub(super) relation_names: HashMap<RelationIdentifier<'db>, Vec<RelationFieldId>>,
    index_names: HashMap<ModelId, HashSet<&'db str>>,
    unique_names: HashMap<ModelId, HashSet<&'db str>>,
    primary_key_names: HashMap<ModelId, &'db str>,
    pub(super) constraint_namespace: ConstraintNamespace<'db>,
}

impl<'db> Names<'db> {
    pub(super) fn new(db: &'db SchemaGraph, connector: &dyn Connector) -> Self {
        let mut relation_names: HashMap<RelationIdentifier<'db>, Vec<RelationFieldId>> = HashMap::new();
        let mut index_names: HashMap<ModelId, HashSet<&'db str>> = HashMap::new();
        let mut unique_names: HashMap<ModelId, HashSet<&'db str>> = HashMap::new();
        let mut primary_key_names: HashMap<ModelId, &'db str> = HashMap::new();

        for model in db.walk_models_and_views() {
            for field in model.relation_fields() {
                let identifier = (model.id, field.related_model().id, field.relation_name());
                relation_names.entry(identifier).or_default().push(field.id);
            }

            for index in model.indexes() {
                let Some(name) = index.name() else { continue };

                if index.is_unique() {
                    unique_names.entry(model.id).or_default().insert(name);
                } else {
                    index_names.entry(model.id).or_default().insert(name);
                }
            }

            if let Some(name) = model.primary_key().and_then(|pk| pk.name()) {
                primary_key_names.insert(model.id, name);
            }
        }

        Self {
            relation_names,
            index_names,
            unique_names,
            primary_key_names,
            constraint_namespace: infer_namespaces(db, connector),
        }
    }

    /// The client names on the model clashing with the given field name.
    pub(super) fn name_taken(&self, model_id: ModelId, name: &str) -> Vec<NameTaken> {
        let mut result = Vec::new();

        if self.index_names.get(&model_id).is_some_and(|names| names.contains(name)) {
            result.push(NameTaken::Index);
        }

        if self.unique_names.get(&model_id).is_some_and(|names| names.contains(name)) {
            result.push(NameTaken::Unique);
        }

        if self.primary_key_names.get(&model_id).is_some_and(|pk| *pk == name) {
            result.push(NameTaken::PrimaryKey);
        }

        result
    }
}

/// Generate namespaces per database requirements, and add the names to it from the constraints
/// part of the namespace.
fn infer_namespaces<'db>(db: &'db SchemaGraph, connector: &dyn Connector) -> ConstraintNamespace<'db> {
    let mut namespaces = ConstraintNamespace::default();

    for scope in connector.constraint_violation_scopes() {
        match scope {
            ConstraintScope::GlobalKeyIndex => {
                namespaces.add_global_indexes(db, connector, *scope);
            }
            ConstraintScope::GlobalForeignKey => {
                namespaces.add_global_relations(db, connector, *scope);
            }
            ConstraintScope::GlobalPrimaryKeyKeyIndex => {
                namespaces.add_global_primary_keys(db, connector, *scope);
                namespaces.add_global_indexes(db, connector, *scope);
            }
            ConstraintScope::GlobalPrimaryKeyForeignKeyDefault => {
                namespaces.add_global_primary_keys(db, connector, *scope);
                namespaces.add_global_relations(db, connector, *scope);
                namespaces.add_global_default_constraints(db, connector, *scope);
            }
            ConstraintScope::ModelKeyIndex => {
                namespaces.add_local_indexes(db, connector, *scope);
            }
            ConstraintScope::ModelPrimaryKeyKeyIndex => {
                namespaces.add_local_primary_keys(db, connector, *scope);
                namespaces.add_local_indexes(db, connector, *scope);
            }
            ConstraintScope::ModelPrimaryKeyKeyIndexForeignKey => {
                namespaces.add_local_primary_keys(db, connector, *scope);
                namespaces.add_local_indexes(db, connector, *scope);
                namespaces.add_local_relations(db, connector, *scope);
            }
        }
    }

    namespaces.add_local_custom_names_for_primary_keys_and_uniques(db);

    namespaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel_connector::EmptyDatamodelConnector;
    use schema_graph::{ScalarType, SchemaBuilder};

    #[test]
    fn client_names_are_looked_up_per_model() {
        let mut schema = SchemaBuilder::new();

        let user = schema.model("User");
        user.scalar("a", ScalarType::Int);
        user.scalar("b", ScalarType::Int);
        user.id(["a", "b"]).name("ab");
        user.index(["b"]).name("b_idx");

        let db = schema.finish().unwrap();
        let names = Names::new(&db, &EmptyDatamodelConnector);
        let user = db.find_model("User").unwrap();

        assert_eq!(names.name_taken(user.id, "ab"), vec![NameTaken::PrimaryKey]);
        assert_eq!(names.name_taken(user.id, "b_idx"), vec![NameTaken::Index]);
        assert!(names.name_taken(user.id, "a").is_empty());
    }
}
